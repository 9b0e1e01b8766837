use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::hand::HandRank;

use super::hand_rank::{describe_hand, HandCategory};
use super::lookup_tables::tables;

/// Результат оценки: ранг + лучшие 5 карт.
///
/// `player_cards` / `board_cards` показывают, откуда взялись карты лучшей
/// пятёрки. Заполняются только там, где известно деление на руку и борд
/// (`evaluate_best_hand`, омаха); у `evaluate_cards` они пустые.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluatedCards {
    pub rank: HandRank,
    pub cards: [Card; 5],
    pub player_cards: Vec<Card>,
    pub board_cards: Vec<Card>,
}

impl EvaluatedCards {
    pub fn category(&self) -> HandCategory {
        self.rank.category()
    }

    pub fn describe(&self) -> String {
        describe_hand(self.rank)
    }
}

/// Канонический порядок карт: ранг по убыванию, затем масть.
pub(crate) fn canonical_order(a: &Card, b: &Card) -> Ordering {
    b.rank.cmp(&a.rank).then(a.suit.cmp(&b.suit))
}

pub(crate) fn sorted(cards: &[Card]) -> Vec<Card> {
    let mut v = cards.to_vec();
    v.sort_by(canonical_order);
    v
}

/// Оценка строго 5-карточной комбинации за O(1).
///
/// Флеш ищется по маске рангов, всё остальное – по произведению простых.
/// Карты должны быть различными: пять одинаковых рангов – ошибка вызывающего.
pub fn evaluate5(cards: &[Card; 5]) -> HandRank {
    let t = tables();
    let suit = cards[0].suit;

    if cards.iter().all(|c| c.suit == suit) {
        let mask = cards.iter().fold(0u16, |m, c| m | c.rank_bit());
        if let Some(r) = t.flush_rank(mask) {
            return HandRank(r);
        }
    }

    let product: u32 = cards.iter().map(Card::prime).product();
    match t.unsuited_rank(product) {
        Some(r) => HandRank(r),
        None => panic!("evaluate5: not a valid five-card hand: {cards:?}"),
    }
}

/// Лучшая пятёрка из 6 карт (6 комбинаций).
pub fn evaluate6(cards: &[Card; 6]) -> EvaluatedCards {
    evaluate_cards(cards)
}

/// Лучшая пятёрка из 7 карт (21 комбинация).
pub fn evaluate7(cards: &[Card; 7]) -> EvaluatedCards {
    evaluate_cards(cards)
}

/// Лучшая пятёрка из 5–7 карт.
///
/// Карты сперва приводятся к каноническому порядку, поэтому и ранг, и
/// выбранная пятёрка не зависят от порядка на входе.
///
/// # Panics
/// Если карт меньше 5 или больше 7.
pub fn evaluate_cards(cards: &[Card]) -> EvaluatedCards {
    assert!(
        (5..=7).contains(&cards.len()),
        "evaluate_cards ожидает от 5 до 7 карт, получено {}",
        cards.len()
    );

    let (five, rank) = best_of_all_5card_combinations(&sorted(cards));
    EvaluatedCards {
        rank,
        cards: five,
        player_cards: Vec::new(),
        board_cards: Vec::new(),
    }
}

/// Главная функция холдема: лучшая 5-карточная рука из hole + board.
///
/// Ожидается 5–7 карт в сумме (обычно 2 + 5).
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> EvaluatedCards {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);

    let mut best = evaluate_cards(&all_cards);
    let (player_cards, board_cards) = split_sources(&best.cards, hole);
    best.player_cards = player_cards;
    best.board_cards = board_cards;
    best
}

/// Разделить пятёрку на карты игрока и карты борда.
pub(crate) fn split_sources(five: &[Card; 5], hole: &[Card]) -> (Vec<Card>, Vec<Card>) {
    five.iter().partition(|c| hole.contains(c))
}

/// Перебираем все комбинации 5 карт из N (N=5–7) и выбираем лучшую.
/// При равенстве остаётся первая найденная.
fn best_of_all_5card_combinations(cards: &[Card]) -> ([Card; 5], HandRank) {
    let n = cards.len();
    let mut best: Option<([Card; 5], HandRank)> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate5(&five);
                        match best {
                            Some((_, br)) if !r.beats(br) => {}
                            _ => best = Some((five, r)),
                        }
                    }
                }
            }
        }
    }

    best.expect("должна быть хотя бы одна 5-карточная комбинация")
}
