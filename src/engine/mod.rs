//! Покерный движок одной раздачи: ставки, переход улиц, сайд-поты, шоудаун.
//!
//! Высокоуровневый объект: `HandState`
//! Основные операции:
//!   - `HandState::initialize` – запустить новую раздачу
//!   - `HandState::prepare_next_action` – легальные действия текущего игрока
//!   - `HandState::action_received` – применить действие игрока
//!   - `HandState::action_timed_out` – принудительный check/fold по таймауту
//!   - `HandState::result_for` – итог раздачи для нужной аудитории

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod showdown;
pub mod side_pots;
pub mod table_manager;
pub mod validation;

pub use actions::{ActionLog, ActionLogEntry, LoggedAction, PlayerAction, PlayerActionKind};
pub use betting::{AvailableAction, BettingState, NextSeatAction};
pub use errors::EngineError;
pub use game_loop::{HandState, SeatState};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use showdown::ResultAudience;
pub use side_pots::{add_chips_to_pot, Pot, SeatBet, UncalledBet};
pub use table_manager::{HandProgress, SessionError, TableSession};

/// RNG интерфейс для engine.
/// Реализации лежат в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
