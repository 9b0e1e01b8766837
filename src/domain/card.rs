use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Масть карты.
///
/// Битовое значение масти (`bit()`) используется в байтовом формате колоды:
/// пики = 1, червы = 2, бубны = 4, трефы = 8.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,   // ♠
    Hearts,   // ♥
    Diamonds, // ♦
    Clubs,    // ♣
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub const fn bit(self) -> u8 {
        match self {
            Suit::Spades => 1,
            Suit::Hearts => 2,
            Suit::Diamonds => 4,
            Suit::Clubs => 8,
        }
    }

    pub fn from_bit(bit: u8) -> Option<Suit> {
        match bit {
            1 => Some(Suit::Spades),
            2 => Some(Suit::Hearts),
            4 => Some(Suit::Diamonds),
            8 => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// Ранг карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// Простые числа по рангам (двойка → 2, туз → 41).
/// Произведение простых однозначно задаёт мультимножество рангов руки.
pub const RANK_PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

impl Rank {
    /// От младшего к старшему.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Индекс 0..12 (двойка = 0, туз = 12).
    pub const fn index(self) -> u8 {
        self as u8 - 2
    }

    pub fn from_index(index: u8) -> Option<Rank> {
        Rank::ALL.get(index as usize).copied()
    }
}

/// Ошибки разбора карты (из строки или из байта).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("card string must have length 2, got {0:?}")]
    BadLength(String),

    #[error("invalid rank: {0}")]
    InvalidRank(char),

    #[error("invalid suit: {0}")]
    InvalidSuit(char),

    #[error("invalid card byte: {0:#04x}")]
    InvalidByte(u8),
}

/// Обычная покерная карта (52-карточная колода).
///
/// Неизменяемое значение; маска ранга и простое число вычисляются на лету.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Бит ранга в 13-битной маске (бит 0 = двойка, бит 12 = туз).
    pub const fn rank_bit(&self) -> u16 {
        1u16 << self.rank.index()
    }

    /// Простое число ранга для таблицы "непарных по масти" рук.
    pub const fn prime(&self) -> u32 {
        RANK_PRIMES[self.rank.index() as usize]
    }

    /// Один байт на карту: старший полубайт = индекс ранга, младший = бит масти.
    pub const fn to_byte(&self) -> u8 {
        (self.rank.index() << 4) | self.suit.bit()
    }

    pub fn from_byte(byte: u8) -> Result<Card, CardError> {
        let rank = Rank::from_index(byte >> 4).ok_or(CardError::InvalidByte(byte))?;
        let suit = Suit::from_bit(byte & 0x0F).ok_or(CardError::InvalidByte(byte))?;
        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Card {
    /// Формат вида `Ah`, `Td`, `7c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Парсинг строки вида "Ah", "Td", "7c".
impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (r_ch, s_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => (r, s),
            _ => return Err(CardError::BadLength(s.to_string())),
        };

        let rank = match r_ch {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' | 't' => Rank::Ten,
            'J' | 'j' => Rank::Jack,
            'Q' | 'q' => Rank::Queen,
            'K' | 'k' => Rank::King,
            'A' | 'a' => Rank::Ace,
            _ => return Err(CardError::InvalidRank(r_ch)),
        };

        let suit = match s_ch {
            'c' | 'C' => Suit::Clubs,
            'd' | 'D' => Suit::Diamonds,
            'h' | 'H' => Suit::Hearts,
            's' | 'S' => Suit::Spades,
            _ => return Err(CardError::InvalidSuit(s_ch)),
        };

        Ok(Card { rank, suit })
    }
}

/// Разобрать список карт через пробел: "As Kd 7c".
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardError> {
    s.split_whitespace().map(Card::from_str).collect()
}
