use serde::{Deserialize, Serialize};

use crate::domain::hand::HandRank;

use super::lookup_tables::{
    MAX_FLUSH, MAX_FOUR_OF_A_KIND, MAX_FULL_HOUSE, MAX_ONE_PAIR, MAX_STRAIGHT,
    MAX_STRAIGHT_FLUSH, MAX_THREE_OF_A_KIND, MAX_TWO_PAIR,
};

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandRank {
    /// Категория по границам диапазонов рангов.
    pub fn category(&self) -> HandCategory {
        const BOUNDS: [(u16, HandCategory); 8] = [
            (MAX_STRAIGHT_FLUSH, HandCategory::StraightFlush),
            (MAX_FOUR_OF_A_KIND, HandCategory::FourOfAKind),
            (MAX_FULL_HOUSE, HandCategory::FullHouse),
            (MAX_FLUSH, HandCategory::Flush),
            (MAX_STRAIGHT, HandCategory::Straight),
            (MAX_THREE_OF_A_KIND, HandCategory::ThreeOfAKind),
            (MAX_TWO_PAIR, HandCategory::TwoPair),
            (MAX_ONE_PAIR, HandCategory::OnePair),
        ];

        BOUNDS
            .iter()
            .find(|(max, _)| self.0 <= *max)
            .map(|(_, cat)| *cat)
            .unwrap_or(HandCategory::HighCard)
    }
}

/// Удобная функция – получить категорию из HandRank.
pub fn hand_category(rank: HandRank) -> HandCategory {
    rank.category()
}

/// Человеческое описание руки по категории.
pub fn describe_hand(rank: HandRank) -> String {
    if rank.0 == 1 {
        return "Royal flush".to_string();
    }
    let cat = rank.category();
    match cat {
        HandCategory::HighCard => "High card".to_string(),
        HandCategory::OnePair => "One pair".to_string(),
        HandCategory::TwoPair => "Two pair".to_string(),
        HandCategory::ThreeOfAKind => "Three of a kind".to_string(),
        HandCategory::Straight => "Straight".to_string(),
        HandCategory::Flush => "Flush".to_string(),
        HandCategory::FullHouse => "Full house".to_string(),
        HandCategory::FourOfAKind => "Four of a kind".to_string(),
        HandCategory::StraightFlush => "Straight flush".to_string(),
    }
}
