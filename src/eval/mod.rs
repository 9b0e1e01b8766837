//! Модуль оценки силы покерных рук: холдем (5–7 карт) и омаха (хай и хай-лоу).
//!
//! Основные функции:
//!   `evaluate5`, `evaluate_cards`, `evaluate_best_hand`, `evaluate_omaha`,
//!   `GameType::evaluate`

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;
pub mod omaha;
pub mod variant;

pub use evaluator::{
    evaluate5, evaluate6, evaluate7, evaluate_best_hand, evaluate_cards, EvaluatedCards,
};
pub use hand_rank::{describe_hand, hand_category, HandCategory};
pub use omaha::{evaluate_low5, evaluate_omaha, LowHand};
pub use variant::HandEvaluation;
