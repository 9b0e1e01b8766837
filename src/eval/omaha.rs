use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

use super::evaluator::{evaluate5, sorted, EvaluatedCards};
use super::lookup_tables::{low_bit, tables};
use super::variant::HandEvaluation;

/// Лоу-рука (хай-лоу, "8 or better").
///
/// `rank`: 1 = A-2-3-4-5 (лучшая), 56 = 4-5-6-7-8. Меньше = лучше.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LowHand {
    pub rank: u8,
    pub cards: [Card; 5],
    pub player_cards: Vec<Card>,
    pub board_cards: Vec<Card>,
}

/// Ранг лоу для пятёрки: все пять рангов ≤ 8 (туз младший) и без пар.
pub fn evaluate_low5(cards: &[Card; 5]) -> Option<u8> {
    let mut mask = 0u8;
    for card in cards {
        mask |= low_bit(card.rank)?;
    }
    if mask.count_ones() != 5 {
        return None;
    }
    tables().low_rank(mask)
}

/// Омаха: ровно 2 карты из руки + ровно 3 с борда.
///
/// Перебираются все пары карт игрока × тройки борда (6 × 10 = 60 при полном
/// борде), лучшая хай-комбинация остаётся в `hi`. При `hi_lo` среди тех же
/// комбинаций ищется лучшая квалифицированная лоу.
///
/// # Panics
/// Если в руке меньше 2 карт или на борде не 3–5 карт.
pub fn evaluate_omaha(hole: &[Card], board: &[Card], hi_lo: bool) -> HandEvaluation {
    assert!(hole.len() >= 2, "омаха: в руке минимум 2 карты");
    assert!(
        (3..=5).contains(&board.len()),
        "омаха: на борде должно быть 3–5 карт, получено {}",
        board.len()
    );

    let hole = sorted(hole);
    let board = sorted(board);

    let mut hi: Option<EvaluatedCards> = None;
    let mut low: Option<LowHand> = None;

    for a in 0..hole.len() {
        for b in (a + 1)..hole.len() {
            for c in 0..board.len() {
                for d in (c + 1)..board.len() {
                    for e in (d + 1)..board.len() {
                        let five = [hole[a], hole[b], board[c], board[d], board[e]];
                        let player_cards = vec![hole[a], hole[b]];
                        let board_cards = vec![board[c], board[d], board[e]];

                        let rank = evaluate5(&five);
                        if hi.as_ref().map_or(true, |h| rank.beats(h.rank)) {
                            hi = Some(EvaluatedCards {
                                rank,
                                cards: five,
                                player_cards: player_cards.clone(),
                                board_cards: board_cards.clone(),
                            });
                        }

                        if !hi_lo {
                            continue;
                        }
                        if let Some(low_rank) = evaluate_low5(&five) {
                            if low.as_ref().map_or(true, |l| low_rank < l.rank) {
                                low = Some(LowHand {
                                    rank: low_rank,
                                    cards: five,
                                    player_cards,
                                    board_cards,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    HandEvaluation {
        hi: hi.expect("омаха: хотя бы одна комбинация"),
        low,
    }
}
