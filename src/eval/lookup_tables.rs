//! Таблицы поиска для оценщика рук.
//!
//! Строятся один раз на процесс (`OnceLock`) и дальше только читаются,
//! поэтому синхронизация при параллельной оценке не нужна.
//!
//! Раскладка рангов (меньше = сильнее):
//!   стрит-флеш 1..=10, каре 11..=166, фулл-хаус 167..=322,
//!   флеш 323..=1599, стрит 1600..=1609, сет 1610..=2467,
//!   две пары 2468..=3325, пара 3326..=6185, старшая карта 6186..=7462.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::card::{Rank, RANK_PRIMES};

/// Битовая маска рангов.
///
/// Используем 13 бит (от 2 до A):
/// бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Маска "низких" рангов для хай-лоу: бит 0 = туз, бит 1 = двойка, ..., бит 7 = восьмёрка.
pub type LowMask = u8;

pub const MAX_STRAIGHT_FLUSH: u16 = 10;
pub const MAX_FOUR_OF_A_KIND: u16 = 166;
pub const MAX_FULL_HOUSE: u16 = 322;
pub const MAX_FLUSH: u16 = 1599;
pub const MAX_STRAIGHT: u16 = 1609;
pub const MAX_THREE_OF_A_KIND: u16 = 2467;
pub const MAX_TWO_PAIR: u16 = 3325;
pub const MAX_ONE_PAIR: u16 = 6185;
pub const MAX_HIGH_CARD: u16 = 7462;

/// Сколько всего бывает различных лоу-рук (C(8,5)).
pub const LOW_HAND_COUNT: u8 = 56;

/// Константы масок для всех возможных стритов (5 подряд).
/// Индексация по "старшей карте" стрита.
///
/// Индексы:
///   0: A-5 (wheel)     : A2345
///   1: 6-2             : 23456
///   ...
///   9: A-T (broadway)  : TJQKA
pub const STRAIGHT_MASKS: [RankMask; 10] = [
    mask_from_ranks(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]),
    mask_from_ranks(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six]),
    mask_from_ranks(&[Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven]),
    mask_from_ranks(&[Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight]),
    mask_from_ranks(&[Rank::Five, Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine]),
    mask_from_ranks(&[Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten]),
    mask_from_ranks(&[Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack]),
    mask_from_ranks(&[Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen]),
    mask_from_ranks(&[Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King]),
    mask_from_ranks(&[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]),
];

/// Получить битовую маску для одного ранга.
pub fn rank_to_bit(rank: Rank) -> RankMask {
    1u16 << rank.index()
}

/// Построить маску из списка рангов.
pub const fn mask_from_ranks(ranks: &[Rank]) -> RankMask {
    let mut mask: RankMask = 0;
    let mut i = 0;
    while i < ranks.len() {
        mask |= 1 << ranks[i].index();
        i += 1;
    }
    mask
}

/// Найти стрит в битовой маске рангов.
/// Возвращает старшую карту стрита, если он есть.
///
/// Особый случай: wheel (A2345) → возвращаем Rank::Five.
pub fn detect_straight(rank_mask: RankMask) -> Option<Rank> {
    // Проверяем от самого сильного (broadway) к слабейшему.
    for (i, sm) in STRAIGHT_MASKS.iter().enumerate().rev() {
        if rank_mask & sm == *sm {
            // i = 0 → пятёрка (wheel), i = 9 → туз.
            return Rank::from_index(i as u8 + 3);
        }
    }
    None
}

/// Бит ранга в лоу-маске (туз младший). Девятка и выше – None.
pub fn low_bit(rank: Rank) -> Option<LowMask> {
    match rank {
        Rank::Ace => Some(1),
        r if r <= Rank::Eight => Some(1 << (r as u8 - 1)),
        _ => None,
    }
}

fn mask_product(mask: RankMask) -> u32 {
    (0..13)
        .filter(|i| mask & (1 << i) != 0)
        .map(|i| RANK_PRIMES[i])
        .product()
}

/// Все таблицы оценщика.
#[derive(Debug)]
pub struct LookupTables {
    /// Ранг флеша по маске рангов (8192 ячейки, 0 = не 5 разных рангов).
    flush: Vec<u16>,
    /// Ранг руки без флеша по произведению простых чисел рангов.
    unsuited: HashMap<u32, u16>,
    /// Ранг лоу-руки по маске из 5 низких рангов (0 = нет лоу).
    low: [u8; 256],
}

static TABLES: OnceLock<LookupTables> = OnceLock::new();

/// Общие таблицы процесса. Первый вызов строит их, остальные только читают.
pub fn tables() -> &'static LookupTables {
    TABLES.get_or_init(LookupTables::build)
}

impl LookupTables {
    /// Полное построение таблиц. Ранги раздаются подряд в порядке силы.
    pub fn build() -> Self {
        let mut flush = vec![0u16; 1 << 13];
        let mut unsuited = HashMap::with_capacity(4888);

        // Стриты: от бродвея к колесу.
        for (i, &mask) in STRAIGHT_MASKS.iter().rev().enumerate() {
            flush[mask as usize] = 1 + i as u16;
            unsuited.insert(mask_product(mask), MAX_FLUSH + 1 + i as u16);
        }

        // Остальные 5 разных рангов: по убыванию маски = по убыванию силы.
        let plain = (0..(1u16 << 13))
            .rev()
            .filter(|m| m.count_ones() == 5 && !STRAIGHT_MASKS.contains(m));
        for (i, mask) in plain.enumerate() {
            flush[mask as usize] = MAX_FULL_HOUSE + 1 + i as u16;
            unsuited.insert(mask_product(mask), MAX_ONE_PAIR + 1 + i as u16);
        }

        let p = |i: usize| RANK_PRIMES[i];
        let desc = || (0..13usize).rev();

        // Каре.
        let mut next = MAX_STRAIGHT_FLUSH + 1;
        for quad in desc() {
            for kicker in desc().filter(|&k| k != quad) {
                unsuited.insert(p(quad).pow(4) * p(kicker), next);
                next += 1;
            }
        }
        debug_assert_eq!(next, MAX_FOUR_OF_A_KIND + 1);

        // Фулл-хаус.
        for trips in desc() {
            for pair in desc().filter(|&k| k != trips) {
                unsuited.insert(p(trips).pow(3) * p(pair).pow(2), next);
                next += 1;
            }
        }
        debug_assert_eq!(next, MAX_FULL_HOUSE + 1);

        // Сет.
        let mut next = MAX_STRAIGHT + 1;
        for trips in desc() {
            for k1 in desc().filter(|&k| k != trips) {
                for k2 in (0..k1).rev().filter(|&k| k != trips) {
                    unsuited.insert(p(trips).pow(3) * p(k1) * p(k2), next);
                    next += 1;
                }
            }
        }
        debug_assert_eq!(next, MAX_THREE_OF_A_KIND + 1);

        // Две пары.
        for high in desc() {
            for low in (0..high).rev() {
                for kicker in desc().filter(|&k| k != high && k != low) {
                    unsuited.insert(p(high).pow(2) * p(low).pow(2) * p(kicker), next);
                    next += 1;
                }
            }
        }
        debug_assert_eq!(next, MAX_TWO_PAIR + 1);

        // Пара.
        for pair in desc() {
            for k1 in desc().filter(|&k| k != pair) {
                for k2 in (0..k1).rev().filter(|&k| k != pair) {
                    for k3 in (0..k2).rev().filter(|&k| k != pair) {
                        unsuited.insert(p(pair).pow(2) * p(k1) * p(k2) * p(k3), next);
                        next += 1;
                    }
                }
            }
        }
        debug_assert_eq!(next, MAX_ONE_PAIR + 1);

        // Лоу: по возрастанию маски = от лучшей (A2345) к худшей (45678).
        let mut low = [0u8; 256];
        let mut low_rank = 1u8;
        for mask in 0..=255u8 {
            if mask.count_ones() == 5 {
                low[mask as usize] = low_rank;
                low_rank += 1;
            }
        }
        debug_assert_eq!(low_rank, LOW_HAND_COUNT + 1);

        Self {
            flush,
            unsuited,
            low,
        }
    }

    pub fn flush_rank(&self, mask: RankMask) -> Option<u16> {
        self.flush
            .get(mask as usize)
            .copied()
            .filter(|&r| r != 0)
    }

    pub fn unsuited_rank(&self, prime_product: u32) -> Option<u16> {
        self.unsuited.get(&prime_product).copied()
    }

    pub fn low_rank(&self, mask: LowMask) -> Option<u8> {
        Some(self.low[mask as usize]).filter(|&r| r != 0)
    }
}
