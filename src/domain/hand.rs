use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::table::GameType;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::ActionLog;
use crate::eval::{EvaluatedCards, HandCategory, LowHand};

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Result,
}

impl Street {
    /// Следующая улица; после ривера – шоудаун, после шоудауна – результат.
    pub fn next(self) -> Street {
        match self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River => Street::Showdown,
            Street::Showdown | Street::Result => Street::Result,
        }
    }

    /// Сколько карт борда открывается при переходе НА эту улицу.
    pub fn cards_to_deal(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            _ => 0,
        }
    }

    /// Идёт ли на этой улице торговля.
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Street::Preflop | Street::Flop | Street::Turn | Street::River
        )
    }
}

/// Сила руки. Меньше = сильнее (1 = роял-флеш, 7462 = худший хай-кард).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u16);

impl HandRank {
    pub fn beats(self, other: HandRank) -> bool {
        self.0 < other.0
    }
}

/// Результат конкретного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHandResult {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub balance_before: Chips,
    pub balance_after: Chips,
    /// Сколько фишек игрок забрал из банков (без вычета своих ставок).
    pub won: Chips,
    pub folded: bool,
    /// Карманные карты – только если их можно показывать этой аудитории.
    pub hole_cards: Option<Vec<Card>>,
    pub best_hand: Option<EvaluatedCards>,
    pub category: Option<HandCategory>,
    pub low_hand: Option<LowHand>,
}

impl PlayerHandResult {
    pub fn is_winner(&self) -> bool {
        !self.won.is_zero()
    }

    /// Чистый результат раздачи (может быть отрицательным).
    pub fn net(&self) -> i64 {
        self.balance_after.0 as i64 - self.balance_before.0 as i64
    }
}

/// Доля банка, доставшаяся одному месту.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotShare {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub amount: Chips,
}

/// Как был разыгран один банк (основной или сайд-пот).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotResult {
    /// 0 = основной банк.
    pub index: usize,
    pub amount: Chips,
    pub rake: Chips,
    pub eligible_seats: Vec<SeatIndex>,
    pub hi_winners: Vec<PotShare>,
    pub low_winners: Vec<PotShare>,
}

/// Итог раздачи. Сериализуется целиком: для истории, реплея и базы.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandResult {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub game_type: GameType,
    pub button: SeatIndex,
    pub small_blind_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,
    pub board: Vec<Card>,
    /// Последняя улица с торговлей (или Showdown, если дошли до вскрытия).
    pub street_reached: Street,
    /// Борд был доразложен без торговли (все в олл-ине).
    pub run_out: bool,
    pub rake: Chips,
    pub pots: Vec<PotResult>,
    pub players: Vec<PlayerHandResult>,
    pub action_log: ActionLog,
}

impl HandResult {
    pub fn total_pot(&self) -> Chips {
        self.pots.iter().map(|p| p.amount).sum()
    }

    pub fn balances_before(&self) -> Chips {
        self.players.iter().map(|p| p.balance_before).sum()
    }

    pub fn balances_after(&self) -> Chips {
        self.players.iter().map(|p| p.balance_after).sum()
    }

    /// Сумма стеков до == сумма стеков после + рейк.
    pub fn is_conserved(&self) -> bool {
        self.balances_before() == self.balances_after() + self.rake
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&PlayerHandResult> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn winners(&self) -> Vec<SeatIndex> {
        self.players
            .iter()
            .filter(|p| p.is_winner())
            .map(|p| p.seat)
            .collect()
    }
}
