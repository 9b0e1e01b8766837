use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::actions::PlayerActionKind;

use thiserror::Error;

/// Ошибки движка покера.
///
/// Всё, кроме `NotEnoughPlayers`, – нарушения протокола со стороны клиента:
/// действие отклоняется, состояние раздачи не меняется.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("В колоде {left} карт, для раздачи нужно {needed}")]
    DeckTooSmall { needed: usize, left: usize },

    #[error("Раздача уже завершена")]
    HandFinished,

    #[error("Сейчас не ход места {seat} (ходит {expected:?})")]
    NotSeatsTurn {
        seat: SeatIndex,
        expected: Option<SeatIndex>,
    },

    #[error("Игрок {player_id} не сидит на месте {seat}")]
    PlayerNotAtSeat { player_id: PlayerId, seat: SeatIndex },

    #[error("Недопустимое действие {0:?} в текущем состоянии раздачи")]
    IllegalAction(PlayerActionKind),

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания или не хватает стека")]
    CannotCall,

    #[error("Ставка {amount} меньше минимальной {min}")]
    RaiseTooSmall { amount: Chips, min: Chips },

    #[error("Ставка {amount} больше максимальной {max}")]
    RaiseTooLarge { amount: Chips, max: Chips },

    #[error("Недостаточно фишек для этой ставки")]
    NotEnoughChips,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
