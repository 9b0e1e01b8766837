use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Статус игрока в контексте стола (между раздачами).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Игрок готов играть следующую раздачу.
    Active,
    /// Игрок сидит за столом, но не участвует в раздаче (sit out).
    SittingOut,
    /// Стек закончился.
    Busted,
}

/// Состояние игрока за конкретным столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTable {
    pub player_id: PlayerId,
    /// Текущий стек за столом.
    pub stack: Chips,
    pub status: PlayerStatus,
}

impl PlayerAtTable {
    pub fn new(player_id: PlayerId, stack: Chips) -> Self {
        Self {
            player_id,
            stack,
            status: PlayerStatus::Active,
        }
    }

    /// Может ли игрок получить карты в следующей раздаче.
    pub fn can_be_dealt_in(&self) -> bool {
        self.status == PlayerStatus::Active && !self.stack.is_zero()
    }
}

/// Статус места внутри раздачи. Пустое место – это `None` в списке мест.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatStatus {
    /// Игрок в раздаче и может делать ставки.
    Active,
    /// Игрок сфолдил и больше не претендует на банк.
    Folded,
    /// Игрок поставил весь стек – больше не действует, но претендует на банк.
    AllIn,
}
