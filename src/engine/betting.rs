use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{PlayerId, SeatIndex};

/// Состояние раунда ставок (на конкретной улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Улица, к которой относится этот раунд.
    pub street: Street,
    /// Текущая целевая ставка, до которой должны дотянуться игроки (BB, bet, raise).
    pub current_bet: Chips,
    /// Минимальная итоговая ставка для рейза (2 × текущая ставка).
    pub min_raise: Chips,
    /// Seat последнего агрессора (bet/raise/all-in сверх ставки).
    pub last_aggressor: Option<SeatIndex>,
}

impl BettingState {
    pub fn new(street: Street, current_bet: Chips) -> Self {
        Self {
            street,
            current_bet,
            min_raise: current_bet.times(2),
            last_aggressor: None,
        }
    }

    /// Обновить состояние после повышения ставки.
    pub fn on_raise(&mut self, seat: SeatIndex, new_bet: Chips) {
        self.current_bet = new_bet;
        self.min_raise = new_bet.times(2);
        self.last_aggressor = Some(seat);
    }
}

/// Легальное действие для текущего игрока.
///
/// Суммы `Bet`/`Raise`/`Straddle` – итоговая ставка на улице,
/// `Call`/`AllIn` – сколько фишек добавится из стека.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AvailableAction {
    Fold,
    Check,
    Call(Chips),
    Bet { min: Chips, max: Chips },
    Raise { min: Chips, max: Chips },
    AllIn(Chips),
    Straddle(Chips),
}

/// Кто ходит и что ему можно. Всегда выводится из `HandState`, не хранится.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextSeatAction {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub street: Street,
    pub to_call: Chips,
    pub actions: Vec<AvailableAction>,
}

impl NextSeatAction {
    pub fn can_check(&self) -> bool {
        self.actions.contains(&AvailableAction::Check)
    }

    pub fn call_amount(&self) -> Option<Chips> {
        self.actions.iter().find_map(|a| match a {
            AvailableAction::Call(c) => Some(*c),
            _ => None,
        })
    }

    pub fn bet_range(&self) -> Option<(Chips, Chips)> {
        self.actions.iter().find_map(|a| match a {
            AvailableAction::Bet { min, max } => Some((*min, *max)),
            _ => None,
        })
    }

    pub fn raise_range(&self) -> Option<(Chips, Chips)> {
        self.actions.iter().find_map(|a| match a {
            AvailableAction::Raise { min, max } => Some((*min, *max)),
            _ => None,
        })
    }

    pub fn all_in_amount(&self) -> Option<Chips> {
        self.actions.iter().find_map(|a| match a {
            AvailableAction::AllIn(c) => Some(*c),
            _ => None,
        })
    }

    pub fn straddle_amount(&self) -> Option<Chips> {
        self.actions.iter().find_map(|a| match a {
            AvailableAction::Straddle(c) => Some(*c),
            _ => None,
        })
    }
}
