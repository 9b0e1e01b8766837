// src/engine/table_manager.rs

use thiserror::Error;

use crate::domain::deck::Deck;
use crate::domain::hand::HandResult;
use crate::domain::table::Table;
use crate::domain::{SeatIndex, TableId};
use crate::engine::actions::PlayerAction;
use crate::engine::betting::NextSeatAction;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::HandState;
use crate::engine::hand_history::HandEvent;
use crate::engine::showdown::ResultAudience;
use crate::engine::RandomSource;
use crate::infra::persistence::{HandStore, PersistenceError};
use crate::infra::rng::SystemRng;

/// Ошибки уровня сессии стола (над движком одной раздачи).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("table {0}: a hand is already in progress")]
    HandInProgress(TableId),

    #[error("table {0}: no active hand")]
    NoActiveHand(TableId),

    /// Проброшенная ошибка из движка.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Проброшенная ошибка хранилища.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Статус раздачи для внешнего кода.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandProgress {
    /// Раздача идёт, ходит этот игрок.
    Ongoing(NextSeatAction),
    /// Раздача завершена, итог для игроков за столом.
    Finished(HandResult),
}

/// Сессия одного стола: стол + текущая раздача + хранилище.
///
/// - после каждого принятого действия раздача сохраняется (`HandStore::commit`);
/// - по завершении итог переносится на стол, сохранённая раздача удаляется;
/// - после рестарта раздача поднимается через `resume`.
pub struct TableSession<S: HandStore> {
    table: Table,
    hand: Option<HandState>,
    store: S,
    last_result: Option<HandResult>,
}

impl<S: HandStore> TableSession<S> {
    pub fn new(table: Table, store: S) -> Self {
        Self {
            table,
            hand: None,
            store,
            last_result: None,
        }
    }

    /// Поднять сессию после рестарта: если для стола сохранена раздача,
    /// она продолжается с того же места.
    pub fn resume(table: Table, store: S) -> Result<Self, SessionError> {
        let hand = match store.recover(table.id) {
            Ok(hand) if !hand.is_finished() => {
                log::info!(
                    "table {}: resumed hand {} at {:?}",
                    table.id,
                    hand.hand_id,
                    hand.street
                );
                Some(hand)
            }
            Ok(_) | Err(PersistenceError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            table,
            hand,
            store,
            last_result: None,
        })
    }

    pub fn table_id(&self) -> TableId {
        self.table.id
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Стол можно менять только между раздачами.
    pub fn table_mut(&mut self) -> Option<&mut Table> {
        if self.hand.is_some() {
            None
        } else {
            Some(&mut self.table)
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    pub fn has_active_hand(&self) -> bool {
        self.hand.is_some()
    }

    /// Текущий актёр на столе (если есть активная раздача).
    pub fn current_actor_seat(&self) -> Option<SeatIndex> {
        self.hand.as_ref().and_then(|h| h.acting_seat)
    }

    pub fn next_action(&self) -> Option<NextSeatAction> {
        self.hand
            .as_ref()
            .and_then(|h| h.prepare_next_action().ok())
    }

    /// События текущей раздачи начиная с номера `from`.
    pub fn events_since(&self, from: u32) -> Vec<HandEvent> {
        self.hand
            .as_ref()
            .map(|h| h.history.since(from).to_vec())
            .unwrap_or_default()
    }

    /// Итог последней завершённой раздачи (архивный).
    pub fn last_result(&self) -> Option<&HandResult> {
        self.last_result.as_ref()
    }

    /// Новая раздача с колодой, перемешанной системным RNG.
    pub fn start_hand(&mut self) -> Result<HandProgress, SessionError> {
        self.start_hand_with_rng(&mut SystemRng)
    }

    pub fn start_hand_with_rng<R: RandomSource>(
        &mut self,
        rng: &mut R,
    ) -> Result<HandProgress, SessionError> {
        self.start_hand_with_deck(Deck::shuffled(rng))
    }

    /// Новая раздача с заданной колодой (скрипты, тесты, реплей).
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<HandProgress, SessionError> {
        if self.hand.is_some() {
            return Err(SessionError::HandInProgress(self.table.id));
        }
        let hand_id = self.table.next_hand_id();
        let hand = HandState::initialize(&self.table, hand_id, deck)?;
        self.store_change(hand)
    }

    /// Применить действие игрока.
    ///
    /// Действие применяется к копии раздачи; сессия переходит на неё только
    /// после записи в хранилище, так что при сбое хранилища раздача остаётся
    /// в последнем сохранённом состоянии.
    pub fn act(&mut self, action: PlayerAction) -> Result<HandProgress, SessionError> {
        let mut hand = self
            .hand
            .clone()
            .ok_or(SessionError::NoActiveHand(self.table.id))?;
        hand.action_received(action)?;
        self.store_change(hand)
    }

    /// Таймаут текущего игрока.
    pub fn time_out(&mut self) -> Result<HandProgress, SessionError> {
        let mut hand = self
            .hand
            .clone()
            .ok_or(SessionError::NoActiveHand(self.table.id))?;
        hand.action_timed_out()?;
        self.store_change(hand)
    }

    /// Бросить текущую раздачу целиком: стол остаётся как до неё.
    pub fn abandon_hand(&mut self) -> Result<Option<HandState>, SessionError> {
        if self.hand.is_none() {
            return Ok(None);
        }
        self.store.remove(self.table.id)?;
        let hand = self.hand.take();
        if let Some(h) = &hand {
            log::warn!(
                "table {}: hand {} abandoned at {:?}",
                self.table.id,
                h.hand_id,
                h.street
            );
        }
        Ok(hand)
    }

    /// Сохранить новую версию раздачи или, если она закончилась, закрыть её.
    fn store_change(&mut self, hand: HandState) -> Result<HandProgress, SessionError> {
        let table_id = self.table.id;

        if !hand.is_finished() {
            self.store.commit(table_id, &hand)?;
            let next = hand.prepare_next_action()?;
            self.hand = Some(hand);
            return Ok(HandProgress::Ongoing(next));
        }

        let archive = hand
            .result_for(ResultAudience::Archive)
            .ok_or(EngineError::Internal("finished hand without result"))?;
        let visible = hand
            .result_for(ResultAudience::Players)
            .ok_or(EngineError::Internal("finished hand without result"))?;

        self.store.remove(table_id)?;
        self.table.apply_result(&archive);
        self.hand = None;
        self.last_result = Some(archive);

        Ok(HandProgress::Finished(visible))
    }
}
