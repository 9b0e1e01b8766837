use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::hand::HandResult;
use crate::domain::player::{PlayerAtTable, PlayerStatus};
use crate::domain::{HandId, TableId};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Вариант игры. Выбирается при создании раздачи и не меняется до её конца.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameType {
    Holdem,
    Omaha,
    OmahaHiLo,
}

/// Лимит ставок.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BettingLimit {
    #[default]
    NoLimit,
    PotLimit,
}

/// Стейки стола (SB/BB).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

/// Рейк: процент от основного банка с потолком.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RakeConfig {
    /// Процент (0..=100).
    pub percent: u8,
    /// Максимальный рейк с раздачи.
    pub cap: Chips,
    /// Не брать рейк, если раздача закончилась до флопа.
    #[serde(default)]
    pub no_flop_no_drop: bool,
}

impl RakeConfig {
    pub fn none() -> Self {
        Self::default()
    }

    /// Рейк с основного банка заданного размера.
    pub fn rake_for(&self, main_pot: Chips) -> Chips {
        let raw = Chips(main_pot.0.saturating_mul(self.percent as u64) / 100);
        raw.min(self.cap)
    }
}

/// Ошибки конфигурации стола.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_seats must be in 2..=10, got {0}")]
    BadSeatCount(u8),

    #[error("small blind must be positive")]
    ZeroSmallBlind,

    #[error("big blind ({big}) must be greater than small blind ({small})")]
    BlindsOutOfOrder { small: Chips, big: Chips },

    #[error("rake percent must be at most 100, got {0}")]
    BadRakePercent(u8),

    #[error("bad config json: {0}")]
    Json(String),
}

/// Конфиг стола: сколько мест, какая игра, лимиты, рейк.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (обычно 2–9).
    pub max_seats: u8,
    pub game_type: GameType,
    #[serde(default)]
    pub betting_limit: BettingLimit,
    pub stakes: TableStakes,
    /// Разрешён ли добровольный страддл.
    #[serde(default)]
    pub allow_straddle: bool,
    #[serde(default)]
    pub rake: RakeConfig,
}

impl TableConfig {
    pub fn new(max_seats: u8, game_type: GameType, stakes: TableStakes) -> Self {
        Self {
            max_seats,
            game_type,
            betting_limit: BettingLimit::NoLimit,
            stakes,
            allow_straddle: false,
            rake: RakeConfig::none(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=10).contains(&self.max_seats) {
            return Err(ConfigError::BadSeatCount(self.max_seats));
        }
        if self.stakes.small_blind.is_zero() {
            return Err(ConfigError::ZeroSmallBlind);
        }
        if self.stakes.big_blind <= self.stakes.small_blind {
            return Err(ConfigError::BlindsOutOfOrder {
                small: self.stakes.small_blind,
                big: self.stakes.big_blind,
            });
        }
        if self.rake.percent > 100 {
            return Err(ConfigError::BadRakePercent(self.rake.percent));
        }
        Ok(())
    }

    /// Прочитать и провалидировать конфиг из JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Стол: места, кнопка, счётчик раздач.
///
/// Стол владеет игроками; раздача (`HandState`) только копирует нужное
/// на своё время жизни и возвращает итог через `apply_result`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex.
    /// None – место пустое.
    pub seats: Vec<Option<PlayerAtTable>>,

    /// Кнопка прошлой раздачи или None, если раздач ещё не было.
    pub dealer_button: Option<SeatIndex>,

    /// Сколько раздач сыграно за столом.
    pub hands_played: u64,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: String, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name,
            config,
            seats,
            dealer_button: None,
            hands_played: 0,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    /// Посадить игрока. Возвращает false, если место занято или не существует.
    pub fn seat_player(&mut self, index: SeatIndex, player: PlayerAtTable) -> bool {
        match self.seats.get_mut(index as usize) {
            Some(slot) if slot.is_none() => {
                *slot = Some(player);
                true
            }
            _ => false,
        }
    }

    /// Сколько игроков получат карты в следующей раздаче.
    pub fn dealable_count(&self) -> usize {
        self.seats
            .iter()
            .flatten()
            .filter(|p| p.can_be_dealt_in())
            .count()
    }

    /// Сумма стеков всех игроков за столом.
    pub fn total_chips(&self) -> Chips {
        self.seats.iter().flatten().map(|p| p.stack).sum()
    }

    /// ID следующей раздачи за этим столом.
    pub fn next_hand_id(&self) -> HandId {
        self.hands_played + 1
    }

    /// Перенести итог раздачи на стол: стеки, кнопка, вылеты.
    pub fn apply_result(&mut self, result: &HandResult) {
        for pr in &result.players {
            if let Some(Some(p)) = self.seats.get_mut(pr.seat as usize) {
                if p.player_id != pr.player_id {
                    continue;
                }
                p.stack = pr.balance_after;
                if p.stack.is_zero() && p.status == PlayerStatus::Active {
                    p.status = PlayerStatus::Busted;
                }
            }
        }
        self.dealer_button = Some(result.button);
        self.hands_played = self.hands_played.max(result.hand_id);
    }
}
