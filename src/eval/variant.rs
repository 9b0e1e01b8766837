use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::table::GameType;

use super::evaluator::{evaluate_best_hand, EvaluatedCards};
use super::omaha::{evaluate_omaha, LowHand};

/// Оценка руки одного места: хай + (для хай-лоу) лоу, если она есть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvaluation {
    pub hi: EvaluatedCards,
    pub low: Option<LowHand>,
}

impl HandEvaluation {
    pub fn low_found(&self) -> bool {
        self.low.is_some()
    }
}

impl GameType {
    /// Сколько карманных карт получает каждый игрок.
    pub fn hole_cards(self) -> usize {
        match self {
            GameType::Holdem => 2,
            GameType::Omaha | GameType::OmahaHiLo => 4,
        }
    }

    pub fn is_hi_lo(self) -> bool {
        matches!(self, GameType::OmahaHiLo)
    }

    /// Единая точка оценки для любого варианта игры.
    pub fn evaluate(self, hole: &[Card], board: &[Card]) -> HandEvaluation {
        match self {
            GameType::Holdem => HandEvaluation {
                hi: evaluate_best_hand(hole, board),
                low: None,
            },
            GameType::Omaha => evaluate_omaha(hole, board, false),
            GameType::OmahaHiLo => evaluate_omaha(hole, board, true),
        }
    }
}
