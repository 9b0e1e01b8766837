// tests/infra_test.rs

//! Хранилище активной раздачи и сессия стола поверх него:
//! - двухфазная запись и восстановление с откатом на клон;
//! - продолжение раздачи после рестарта;
//! - закрытие раздачи: итог на столе, запись удалена.

use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::hand::Street;
use poker_hand_engine::domain::player::PlayerAtTable;
use poker_hand_engine::domain::table::{GameType, Table, TableConfig, TableStakes};
use poker_hand_engine::domain::SeatIndex;
use poker_hand_engine::engine::{
    EngineError, HandEventKind, HandProgress, PlayerAction, PlayerActionKind, SessionError,
    TableSession,
};
use poker_hand_engine::infra::{DeterministicRng, HandStore, InMemoryHandStore, PersistenceError};

const TABLE_ID: u64 = 42;

fn make_table() -> Table {
    let config = TableConfig::new(6, GameType::Holdem, TableStakes::new(Chips(5), Chips(10)));
    let mut table = Table::new(TABLE_ID, "Infra table".to_string(), config);
    for seat in 0..3u8 {
        table.seat_player(seat, PlayerAtTable::new(100 + seat as u64, Chips(1000)));
    }
    table
}

fn started_session(seed: u64) -> TableSession<InMemoryHandStore> {
    let mut session = TableSession::new(make_table(), InMemoryHandStore::new());
    session
        .start_hand_with_rng(&mut DeterministicRng::from_u64(seed))
        .expect("start hand");
    session
}

/// Действие текущего актёра.
fn act_current(
    session: &mut TableSession<InMemoryHandStore>,
    kind: PlayerActionKind,
) -> HandProgress {
    let next = session.next_action().expect("hand in progress");
    session
        .act(PlayerAction::new(next.player_id, next.seat, kind))
        .expect("action accepted")
}

// ---------------------------------------------------------
// HandStore
// ---------------------------------------------------------

#[test]
fn commit_writes_both_copies_and_recover_reads_primary() {
    let session = started_session(1);
    let hand = session.hand().expect("hand").clone();
    let store = session.store();

    assert!(store.contains(TABLE_ID));
    assert!(store.load(TABLE_ID).expect("load").is_some());
    assert!(store.load_clone(TABLE_ID).expect("load clone").is_some());
    assert_eq!(store.recover(TABLE_ID).expect("recover"), hand);
}

#[test]
fn recover_falls_back_to_clone() {
    let mut session = started_session(2);
    let hand = session.hand().expect("hand").clone();

    // Основная копия пропала между шагами записи.
    session.store_mut().drop_primary(TABLE_ID);
    assert_eq!(session.store().recover(TABLE_ID).expect("from clone"), hand);

    // Основная копия повреждена.
    session
        .store_mut()
        .write_raw_primary(TABLE_ID, b"{ definitely not a hand".to_vec());
    assert_eq!(session.store().recover(TABLE_ID).expect("from clone"), hand);
}

#[test]
fn recover_errors() {
    let mut store = InMemoryHandStore::new();
    assert!(matches!(
        store.recover(TABLE_ID),
        Err(PersistenceError::NotFound(TABLE_ID))
    ));

    store
        .save_clone(TABLE_ID, b"garbage".to_vec())
        .expect("save clone");
    assert!(matches!(
        store.recover(TABLE_ID),
        Err(PersistenceError::Decode { table_id: TABLE_ID, .. })
    ));
}

// ---------------------------------------------------------
// TableSession
// ---------------------------------------------------------

#[test]
fn every_accepted_action_is_committed() {
    let mut session = started_session(3);
    act_current(&mut session, PlayerActionKind::Call);

    let stored = session.store().recover(TABLE_ID).expect("recover");
    assert_eq!(Some(&stored), session.hand());
    assert_eq!(stored.action_log.street(Street::Preflop).len(), 3);
}

#[test]
fn rejected_action_leaves_stored_hand_untouched() {
    let mut session = started_session(4);
    let before = session.store().load(TABLE_ID).expect("load");

    let err = session
        .act(PlayerAction::new(101, 1, PlayerActionKind::Call))
        .expect_err("out of turn");
    assert!(matches!(
        err,
        SessionError::Engine(EngineError::NotSeatsTurn { seat: 1, .. })
    ));
    assert_eq!(session.store().load(TABLE_ID).expect("load"), before);
}

#[test]
fn resumed_session_continues_the_same_hand() {
    let mut session = started_session(5);
    act_current(&mut session, PlayerActionKind::Call);
    act_current(&mut session, PlayerActionKind::Call);

    // "Рестарт": стол как до раздачи, хранилище как на диске.
    let table = session.table().clone();
    let store = session.store().clone();
    let original = session.hand().cloned();
    drop(session);

    let mut resumed = TableSession::resume(table, store).expect("resume");
    assert_eq!(resumed.hand().cloned(), original);
    assert_eq!(resumed.current_actor_seat(), Some(2));

    let mut progress = act_current(&mut resumed, PlayerActionKind::Check);
    while let HandProgress::Ongoing(next) = progress {
        let kind = if next.can_check() {
            PlayerActionKind::Check
        } else {
            PlayerActionKind::Call
        };
        progress = resumed
            .act(PlayerAction::new(next.player_id, next.seat, kind))
            .expect("action");
    }

    assert!(!resumed.has_active_hand());
    assert!(!resumed.store().contains(TABLE_ID));
    assert_eq!(resumed.table().total_chips(), Chips(3000));
    assert_eq!(resumed.table().hands_played, 1);
}

#[test]
fn resume_without_saved_hand_starts_idle() {
    let session = TableSession::resume(make_table(), InMemoryHandStore::new()).expect("resume");
    assert!(!session.has_active_hand());
    assert_eq!(session.next_action(), None);
}

#[test]
fn finished_hand_is_applied_to_table_and_removed_from_store() {
    let mut session = started_session(6);

    act_current(&mut session, PlayerActionKind::Fold);
    let progress = act_current(&mut session, PlayerActionKind::Fold);

    let HandProgress::Finished(visible) = progress else {
        panic!("hand should be over");
    };
    // Игрокам карты без вскрытия не показываются, архиву показываются.
    assert!(visible.players.iter().all(|p| p.hole_cards.is_none()));
    let archive = session.last_result().expect("archived result");
    assert!(archive.players.iter().all(|p| p.hole_cards.is_some()));

    assert!(!session.has_active_hand());
    assert!(!session.store().contains(TABLE_ID));

    let table = session.table();
    assert_eq!(table.dealer_button, Some(0));
    assert_eq!(table.hands_played, 1);
    let stack = |seat: SeatIndex| table.seats[seat as usize].as_ref().map(|p| p.stack);
    assert_eq!(stack(0), Some(Chips(1000)));
    assert_eq!(stack(1), Some(Chips(995)));
    assert_eq!(stack(2), Some(Chips(1005)));
}

#[test]
fn session_guards_hand_lifecycle() {
    let mut session = TableSession::new(make_table(), InMemoryHandStore::new());
    assert!(matches!(
        session.time_out(),
        Err(SessionError::NoActiveHand(TABLE_ID))
    ));

    session
        .start_hand_with_rng(&mut DeterministicRng::from_u64(7))
        .expect("start");
    assert!(session.table_mut().is_none());
    assert!(matches!(
        session.start_hand_with_rng(&mut DeterministicRng::from_u64(8)),
        Err(SessionError::HandInProgress(TABLE_ID))
    ));

    let progress = session.time_out().expect("timeout");
    assert!(matches!(progress, HandProgress::Ongoing(_)));
    let events = session.events_since(0);
    assert!(events.iter().any(|e| matches!(
        e.kind,
        HandEventKind::PlayerActed {
            seat: 0,
            action: PlayerActionKind::Fold,
            timed_out: true,
            ..
        }
    )));
    assert!(session.events_since(events.len() as u32).is_empty());
}

#[test]
fn abandoned_hand_leaves_table_as_before() {
    let mut session = started_session(9);
    act_current(&mut session, PlayerActionKind::Raise(Chips(50)));

    let abandoned = session
        .abandon_hand()
        .expect("store available")
        .expect("active hand");
    assert_eq!(abandoned.street, Street::Preflop);

    assert!(!session.has_active_hand());
    assert!(!session.store().contains(TABLE_ID));
    assert_eq!(session.table().total_chips(), Chips(3000));
    assert_eq!(session.table().hands_played, 0);
    assert!(session.table_mut().is_some());
    assert!(session.abandon_hand().expect("store available").is_none());
}

// ---------------------------------------------------------
// СБОИ ХРАНИЛИЩА
// ---------------------------------------------------------

/// Хранилище, у которого можно "сломать" запись клона или основной копии.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryHandStore,
    fail_clone_writes: bool,
    fail_primary_writes: bool,
    fail_removes: bool,
}

fn backend(table_id: u64, what: &str) -> PersistenceError {
    PersistenceError::Backend {
        table_id,
        message: format!("{what} unavailable"),
    }
}

impl HandStore for FlakyStore {
    fn load(&self, table_id: u64) -> Result<Option<Vec<u8>>, PersistenceError> {
        self.inner.load(table_id)
    }

    fn save(&mut self, table_id: u64, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        if self.fail_primary_writes {
            return Err(backend(table_id, "primary"));
        }
        self.inner.save(table_id, bytes)
    }

    fn load_clone(&self, table_id: u64) -> Result<Option<Vec<u8>>, PersistenceError> {
        self.inner.load_clone(table_id)
    }

    fn save_clone(&mut self, table_id: u64, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        if self.fail_clone_writes {
            return Err(backend(table_id, "clone"));
        }
        self.inner.save_clone(table_id, bytes)
    }

    fn remove(&mut self, table_id: u64) -> Result<(), PersistenceError> {
        if self.fail_removes {
            return Err(backend(table_id, "remove"));
        }
        self.inner.remove(table_id)
    }
}

fn flaky_session(seed: u64) -> TableSession<FlakyStore> {
    let mut session = TableSession::new(make_table(), FlakyStore::default());
    session
        .start_hand_with_rng(&mut DeterministicRng::from_u64(seed))
        .expect("start hand");
    session
}

fn current_action(session: &TableSession<FlakyStore>, kind: PlayerActionKind) -> PlayerAction {
    let next = session.next_action().expect("hand in progress");
    PlayerAction::new(next.player_id, next.seat, kind)
}

#[test]
fn clone_write_failure_reaches_caller_and_keeps_primary() {
    let mut session = flaky_session(11);
    let hand_before = session.hand().cloned();
    let primary_before = session.store().load(TABLE_ID).expect("load");

    session.store_mut().fail_clone_writes = true;
    let action = current_action(&session, PlayerActionKind::Call);
    let err = session.act(action.clone()).expect_err("clone write fails");
    assert!(matches!(
        err,
        SessionError::Persistence(PersistenceError::Backend { table_id: TABLE_ID, .. })
    ));

    // Основная копия не тронута, сессия на последнем сохранённом состоянии.
    assert_eq!(session.store().load(TABLE_ID).expect("load"), primary_before);
    assert_eq!(session.hand().cloned(), hand_before);

    // Хранилище ожило – то же действие проходит.
    session.store_mut().fail_clone_writes = false;
    session.act(action).expect("retry accepted");
    assert_ne!(session.hand().cloned(), hand_before);
    assert_eq!(
        session.store().recover(TABLE_ID).expect("recover"),
        session.hand().cloned().expect("hand")
    );
}

#[test]
fn primary_write_failure_leaves_last_committed_hand_authoritative() {
    let mut session = flaky_session(12);
    let hand_before = session.hand().cloned().expect("hand");

    session.store_mut().fail_primary_writes = true;
    let action = current_action(&session, PlayerActionKind::Call);
    assert!(matches!(
        session.act(action),
        Err(SessionError::Persistence(PersistenceError::Backend { .. }))
    ));

    // Клон уже новее, но восстановление читает основную копию.
    assert_eq!(session.hand(), Some(&hand_before));
    assert_eq!(session.store().recover(TABLE_ID).expect("recover"), hand_before);
}

#[test]
fn remove_failure_keeps_hand_open() {
    let mut session = flaky_session(13);
    session.store_mut().fail_removes = true;

    let action = current_action(&session, PlayerActionKind::Fold);
    session.act(action).expect("first fold");
    let action = current_action(&session, PlayerActionKind::Fold);
    assert!(matches!(
        session.act(action.clone()),
        Err(SessionError::Persistence(PersistenceError::Backend { .. }))
    ));
    // Итог на стол не перенесён, раздача ждёт повтора.
    assert!(session.has_active_hand());
    assert_eq!(session.table().hands_played, 0);
    assert!(matches!(
        session.abandon_hand(),
        Err(SessionError::Persistence(PersistenceError::Backend { .. }))
    ));

    session.store_mut().fail_removes = false;
    let progress = session.act(action).expect("retry closes the hand");
    assert!(matches!(progress, HandProgress::Finished(_)));
    assert_eq!(session.table().hands_played, 1);
    assert_eq!(session.table().total_chips(), Chips(3000));
}
