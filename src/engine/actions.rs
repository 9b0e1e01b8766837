use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{PlayerId, SeatIndex};

/// Тип действия игрока.
///
/// Суммы в `Bet` и `Raise` – итоговая ставка игрока на улице ("raise to"),
/// а не прибавка к ней.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet на новой улице (когда ещё нет текущей ставки).
    Bet(Chips),
    /// Raise существующей ставки.
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
    /// Добровольный страддл (2 × BB) первым после большого блайнда.
    Straddle,
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    /// Какой игрок действует.
    pub player_id: PlayerId,
    /// В каком месте он сидит (0..max_seats-1).
    pub seat: SeatIndex,
    /// Само действие.
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(player_id: PlayerId, seat: SeatIndex, kind: PlayerActionKind) -> Self {
        Self {
            player_id,
            seat,
            kind,
        }
    }
}

/// Что попало в лог раздачи: действия игроков плюс принудительные блайнды.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoggedAction {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    Straddle,
}

impl From<PlayerActionKind> for LoggedAction {
    fn from(kind: PlayerActionKind) -> Self {
        match kind {
            PlayerActionKind::Fold => LoggedAction::Fold,
            PlayerActionKind::Check => LoggedAction::Check,
            PlayerActionKind::Call => LoggedAction::Call,
            PlayerActionKind::Bet(_) => LoggedAction::Bet,
            PlayerActionKind::Raise(_) => LoggedAction::Raise,
            PlayerActionKind::AllIn => LoggedAction::AllIn,
            PlayerActionKind::Straddle => LoggedAction::Straddle,
        }
    }
}

/// Одна запись в логе действий.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLogEntry {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub action: LoggedAction,
    /// Сколько фишек игрок добавил этим действием.
    pub added: Chips,
    /// Ставка игрока на улице после действия.
    pub street_bet: Chips,
    /// Стек после действия.
    pub balance: Chips,
    /// Действие выбрано движком по таймауту.
    #[serde(default)]
    pub timed_out: bool,
}

/// Лог действий по улицам.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLog {
    pub preflop: Vec<ActionLogEntry>,
    pub flop: Vec<ActionLogEntry>,
    pub turn: Vec<ActionLogEntry>,
    pub river: Vec<ActionLogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn street(&self, street: Street) -> &[ActionLogEntry] {
        match street {
            Street::Preflop => self.preflop.as_slice(),
            Street::Flop => self.flop.as_slice(),
            Street::Turn => self.turn.as_slice(),
            Street::River => self.river.as_slice(),
            Street::Showdown | Street::Result => &[],
        }
    }

    /// Добавить запись. На улицах без торговли записи не пишутся.
    pub fn push(&mut self, street: Street, entry: ActionLogEntry) {
        let log = match street {
            Street::Preflop => &mut self.preflop,
            Street::Flop => &mut self.flop,
            Street::Turn => &mut self.turn,
            Street::River => &mut self.river,
            Street::Showdown | Street::Result => return,
        };
        log.push(entry);
    }

    /// Было ли на улице хоть одно добровольное действие (не блайнд).
    pub fn has_voluntary_action(&self, street: Street) -> bool {
        self.street(street)
            .iter()
            .any(|e| !matches!(e.action, LoggedAction::SmallBlind | LoggedAction::BigBlind))
    }

    pub fn len(&self) -> usize {
        self.preflop.len() + self.flop.len() + self.turn.len() + self.river.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
