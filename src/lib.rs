//! Покерный движок раздачи для многопользовательского кард-рума.
//!
//! - `domain` – карты, колода, фишки, стол, итог раздачи;
//! - `eval` – оценка рук (холдем, омаха, хай-лоу);
//! - `engine` – машина состояний раздачи, сайд-поты, шоудаун, сессия стола;
//! - `infra` – RNG и хранилище активных раздач.

pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;

pub use domain::{Card, Chips, Deck, GameType, HandResult, Table, TableConfig};
pub use engine::{EngineError, HandState, PlayerAction, PlayerActionKind, TableSession};
