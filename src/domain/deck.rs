use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::{Card, CardError, Rank, Suit};
use crate::engine::RandomSource;
use crate::infra::rng::SystemRng;

/// Размер стандартной колоды.
pub const DECK_SIZE: usize = 52;

/// Ошибки восстановления колоды (из байтов или из скрипта).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error(transparent)]
    Card(#[from] CardError),

    #[error("card {0} occurs more than once")]
    DuplicateCard(Card),

    #[error("deck holds {len} cards, but {drawn} are marked as drawn")]
    DrawnOutOfRange { drawn: usize, len: usize },

    #[error("deck has {0} cards, at most 52 allowed")]
    TooManyCards(usize),

    #[error("scripted players must all hold the same number of cards")]
    UnevenHoleCards,

    #[error("script does not fit into one deck")]
    ScriptTooLarge,
}

/// Колода карт: порядок выдачи + курсор уже выданных карт.
///
/// Карты выдаются с начала (`cards[drawn..]` – ещё в колоде).
/// Выдача необратима в пределах раздачи. В serde колода пишется
/// в байтовом виде (`DeckSnapshot`), чтобы после падения продолжить
/// раздачу ровно с той же карты.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeckSnapshot", into = "DeckSnapshot")]
pub struct Deck {
    cards: Vec<Card>,
    drawn: usize,
}

/// Персистентная форма колоды: 1 байт на карту + число выданных карт.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub bytes: Vec<u8>,
    pub drawn: usize,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Spades 2..A, Hearts 2..A, Diamonds 2..A, Clubs 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards, drawn: 0 }
    }

    /// Свежая перемешанная колода. Всегда строится из канонических 52 карт,
    /// остаток прошлой раздачи не переиспользуется.
    pub fn shuffled<R: RandomSource>(rng: &mut R) -> Self {
        let mut deck = Deck::standard_52();
        rng.shuffle(&mut deck.cards);
        deck
    }

    /// Перемешать системным (OS-seeded) генератором.
    pub fn new_shuffled() -> Self {
        Deck::shuffled(&mut SystemRng)
    }

    /// Сколько карт ещё в колоде.
    pub fn len(&self) -> usize {
        self.cards.len() - self.drawn
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Сколько карт уже выдано.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Карты, которые ещё не выданы, в порядке выдачи.
    pub fn remaining(&self) -> &[Card] {
        &self.cards[self.drawn..]
    }

    /// Взять n карт сверху.
    ///
    /// # Panics
    /// Если в колоде меньше `n` карт: количество задаёт сам вызывающий код
    /// (тип игры, улица), так что это ошибка программы.
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        assert!(
            n <= self.len(),
            "draw({n}) from a deck with {} cards left",
            self.len()
        );
        let taken = self.cards[self.drawn..self.drawn + n].to_vec();
        self.drawn += n;
        taken
    }

    /// Взять одну карту сверху (паникует на пустой колоде).
    pub fn draw_one(&mut self) -> Card {
        self.draw(1)[0]
    }

    /// Байтовая форма полного порядка колоды (включая выданные карты).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cards.iter().map(Card::to_byte).collect()
    }

    /// Восстановить колоду из байтов + число уже выданных карт.
    pub fn from_bytes(bytes: &[u8], drawn: usize) -> Result<Self, DeckError> {
        if bytes.len() > DECK_SIZE {
            return Err(DeckError::TooManyCards(bytes.len()));
        }
        if drawn > bytes.len() {
            return Err(DeckError::DrawnOutOfRange {
                drawn,
                len: bytes.len(),
            });
        }

        let mut seen = HashSet::with_capacity(bytes.len());
        let mut cards = Vec::with_capacity(bytes.len());
        for &b in bytes {
            let card = Card::from_byte(b)?;
            if !seen.insert(card) {
                return Err(DeckError::DuplicateCard(card));
            }
            cards.push(card);
        }

        Ok(Deck { cards, drawn })
    }

    /// Колода с заранее заданными картами на позициях выдачи.
    ///
    /// Карманные карты раздаются по кругу, поэтому карта `j` игрока `i`
    /// лежит на позиции `j * players + i`. Следом идут флоп (3), тёрн и ривер.
    /// Остальные позиции заполняются свежим перемешиванием; заданные карты
    /// переставляются на свои места обменом, так что каждая карта встречается
    /// ровно один раз.
    pub fn from_script<R: RandomSource>(
        player_cards: &[Vec<Card>],
        flop: &[Card],
        turn: Option<Card>,
        river: Option<Card>,
        rng: &mut R,
    ) -> Result<Self, DeckError> {
        let players = player_cards.len();
        let per_player = player_cards.first().map(|c| c.len()).unwrap_or(0);
        if player_cards.iter().any(|c| c.len() != per_player) {
            return Err(DeckError::UnevenHoleCards);
        }

        let mut placements: Vec<(usize, Card)> = Vec::new();
        for (i, cards) in player_cards.iter().enumerate() {
            for (j, card) in cards.iter().enumerate() {
                placements.push((j * players + i, *card));
            }
        }

        let board: Vec<Card> = flop
            .iter()
            .copied()
            .chain(turn)
            .chain(river)
            .collect();
        if flop.len() > 3 {
            return Err(DeckError::ScriptTooLarge);
        }
        let board_start = players * per_player;
        // Тёрн и ривер стоят на фиксированных местах даже без флопа в скрипте.
        let board_positions = (0..flop.len())
            .map(|k| board_start + k)
            .chain(turn.map(|_| board_start + 3))
            .chain(river.map(|_| board_start + 4));
        placements.extend(board_positions.zip(board));

        if placements.iter().any(|(pos, _)| *pos >= DECK_SIZE) {
            return Err(DeckError::ScriptTooLarge);
        }

        let mut seen = HashSet::with_capacity(placements.len());
        for (_, card) in &placements {
            if !seen.insert(*card) {
                return Err(DeckError::DuplicateCard(*card));
            }
        }

        let mut deck = Deck::shuffled(rng);
        for (pos, card) in placements {
            // Карта есть в колоде всегда: колода полная, дубликаты отсеяны.
            if let Some(current) = deck.cards.iter().position(|c| *c == card) {
                deck.cards.swap(pos, current);
            }
        }

        Ok(deck)
    }
}

impl From<Deck> for DeckSnapshot {
    fn from(deck: Deck) -> Self {
        DeckSnapshot {
            bytes: deck.to_bytes(),
            drawn: deck.drawn,
        }
    }
}

impl TryFrom<DeckSnapshot> for Deck {
    type Error = DeckError;

    fn try_from(snapshot: DeckSnapshot) -> Result<Self, Self::Error> {
        Deck::from_bytes(&snapshot.bytes, snapshot.drawn)
    }
}
