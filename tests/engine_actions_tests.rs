// tests/engine_actions_tests.rs

//! Тесты action-логики покерного движка:
//! - список легальных действий (call/raise/all-in для короткого стека);
//! - отклонение нелегальных действий без изменения состояния;
//! - страддл;
//! - пот-лимит;
//! - таймаут (check или fold).

use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::deck::Deck;
use poker_hand_engine::domain::hand::Street;
use poker_hand_engine::domain::player::{PlayerAtTable, SeatStatus};
use poker_hand_engine::domain::table::{BettingLimit, GameType, Table, TableConfig, TableStakes};
use poker_hand_engine::domain::SeatIndex;
use poker_hand_engine::engine::{
    AvailableAction, EngineError, HandEventKind, HandState, LoggedAction, PlayerAction,
    PlayerActionKind,
};
use poker_hand_engine::infra::DeterministicRng;

/// Хелпер: стол 5/10 с игроками на местах 0..n (player_id = 100 + seat).
fn make_table(stacks: &[u64], limit: BettingLimit, allow_straddle: bool) -> Table {
    let mut config = TableConfig::new(6, GameType::Holdem, TableStakes::new(Chips(5), Chips(10)));
    config.betting_limit = limit;
    config.allow_straddle = allow_straddle;

    let mut table = Table::new(1, "Actions test table".to_string(), config);
    for (seat, &stack) in stacks.iter().enumerate() {
        table.seat_player(seat as SeatIndex, PlayerAtTable::new(100 + seat as u64, Chips(stack)));
    }
    table
}

fn start(table: &Table) -> HandState {
    let deck = Deck::shuffled(&mut DeterministicRng::from_u64(77));
    HandState::initialize(table, 1, deck).expect("start hand")
}

fn action(hand: &HandState, seat: SeatIndex, kind: PlayerActionKind) -> PlayerAction {
    let player_id = hand.seat(seat).expect("seat in hand").player_id;
    PlayerAction::new(player_id, seat, kind)
}

fn act(hand: &mut HandState, seat: SeatIndex, kind: PlayerActionKind) {
    let a = action(hand, seat, kind);
    hand.action_received(a)
        .unwrap_or_else(|e| panic!("seat {seat} {kind:?} rejected: {e}"));
}

//
// ЛЕГАЛЬНЫЕ ДЕЙСТВИЯ
//

/// Первый ход префлоп без страддла: fold / call / raise / all-in.
#[test]
fn preflop_first_actor_options() {
    let table = make_table(&[1000, 1000, 1000], BettingLimit::NoLimit, false);
    let hand = start(&table);

    let next = hand.prepare_next_action().expect("next action");
    assert_eq!(next.seat, 0);
    assert_eq!(next.player_id, 100);
    assert_eq!(next.street, Street::Preflop);
    assert_eq!(next.to_call, Chips(10));
    assert_eq!(
        next.actions,
        vec![
            AvailableAction::Fold,
            AvailableAction::Call(Chips(10)),
            AvailableAction::Raise {
                min: Chips(20),
                max: Chips(1000)
            },
            AvailableAction::AllIn(Chips(1000)),
        ]
    );
}

/// Стека не хватает даже на колл: остаются только fold и all-in.
#[test]
fn short_stack_facing_raise_can_only_fold_or_shove() {
    let table = make_table(&[1000, 50, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);

    act(&mut hand, 0, PlayerActionKind::Raise(Chips(100)));

    let next = hand.prepare_next_action().expect("sb to act");
    assert_eq!(next.seat, 1);
    assert_eq!(next.to_call, Chips(95));
    assert_eq!(
        next.actions,
        vec![AvailableAction::Fold, AvailableAction::AllIn(Chips(45))]
    );

    act(&mut hand, 1, PlayerActionKind::AllIn);
    let sb = hand.seat(1).expect("sb");
    assert_eq!(sb.status, SeatStatus::AllIn);
    assert!(sb.balance.is_zero());
    // Олл-ин на меньшую сумму не меняет текущую ставку.
    assert_eq!(hand.betting.current_bet, Chips(100));
    assert_eq!(hand.acting_seat, Some(2));
}

/// Бет на постфлопе: минимум BB, максимум стек.
#[test]
fn postflop_bet_range() {
    let table = make_table(&[1000, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);
    act(&mut hand, 0, PlayerActionKind::Call);
    act(&mut hand, 1, PlayerActionKind::Check);

    let next = hand.prepare_next_action().expect("flop action");
    assert_eq!(next.seat, 1);
    assert!(next.can_check());
    assert_eq!(next.bet_range(), Some((Chips(10), Chips(990))));
    assert_eq!(next.raise_range(), None);

    act(&mut hand, 1, PlayerActionKind::Bet(Chips(40)));
    let next = hand.prepare_next_action().expect("response");
    assert_eq!(next.to_call, Chips(40));
    assert_eq!(next.raise_range(), Some((Chips(80), Chips(990))));
}

//
// НЕЛЕГАЛЬНЫЕ ДЕЙСТВИЯ
//

#[test]
fn out_of_turn_action_is_rejected_and_state_is_untouched() {
    let table = make_table(&[1000, 1000, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);
    let before = hand.clone();

    let a = action(&hand, 1, PlayerActionKind::Call);
    assert_eq!(
        hand.action_received(a),
        Err(EngineError::NotSeatsTurn {
            seat: 1,
            expected: Some(0)
        })
    );
    assert_eq!(hand, before);
}

#[test]
fn illegal_actions_are_rejected() {
    let table = make_table(&[1000, 1000, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);
    let before = hand.clone();

    let cases = [
        (PlayerActionKind::Check, EngineError::CannotCheck),
        (
            PlayerActionKind::Raise(Chips(15)),
            EngineError::RaiseTooSmall {
                amount: Chips(15),
                min: Chips(20),
            },
        ),
        (
            PlayerActionKind::Raise(Chips(1001)),
            EngineError::RaiseTooLarge {
                amount: Chips(1001),
                max: Chips(1000),
            },
        ),
        (
            PlayerActionKind::Bet(Chips(50)),
            EngineError::IllegalAction(PlayerActionKind::Bet(Chips(50))),
        ),
        (
            PlayerActionKind::Straddle,
            EngineError::IllegalAction(PlayerActionKind::Straddle),
        ),
    ];

    for (kind, expected) in cases {
        let a = action(&hand, 0, kind);
        assert_eq!(hand.action_received(a), Err(expected), "{kind:?}");
    }

    // Чужой player_id на правильном месте.
    assert_eq!(
        hand.action_received(PlayerAction::new(999, 0, PlayerActionKind::Call)),
        Err(EngineError::PlayerNotAtSeat {
            player_id: 999,
            seat: 0
        })
    );

    assert_eq!(hand, before);
}

#[test]
fn call_is_not_offered_without_a_bet() {
    let table = make_table(&[1000, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);
    act(&mut hand, 0, PlayerActionKind::Call);

    let a = action(&hand, 1, PlayerActionKind::Call);
    assert_eq!(hand.action_received(a), Err(EngineError::CannotCall));
}

//
// СТРАДДЛ
//

#[test]
fn straddle_acts_as_a_raise_to_two_big_blinds() {
    let table = make_table(&[1000, 1000, 1000, 1000], BettingLimit::NoLimit, true);
    let mut hand = start(&table);

    // Первый после BB (место 3) может страддлить.
    let next = hand.prepare_next_action().expect("utg");
    assert_eq!(next.seat, 3);
    assert_eq!(next.straddle_amount(), Some(Chips(20)));

    act(&mut hand, 3, PlayerActionKind::Straddle);
    assert_eq!(hand.betting.current_bet, Chips(20));
    assert_eq!(hand.betting.min_raise, Chips(40));
    assert_eq!(
        hand.action_log.street(Street::Preflop).last().map(|e| e.action),
        Some(LoggedAction::Straddle)
    );

    // Больше страддл никому не предлагается.
    let next = hand.prepare_next_action().expect("button");
    assert_eq!(next.seat, 0);
    assert_eq!(next.straddle_amount(), None);
    assert_eq!(next.to_call, Chips(20));

    act(&mut hand, 0, PlayerActionKind::Call);
    act(&mut hand, 1, PlayerActionKind::Call);
    act(&mut hand, 2, PlayerActionKind::Call);

    // У страддлера опциона нет: улица закрыта.
    assert_eq!(hand.street, Street::Flop);
    assert_eq!(hand.pots[0].amount, Chips(80));
    assert_eq!(hand.acting_seat, Some(1));
}

#[test]
fn straddle_not_available_after_voluntary_action_or_when_disabled() {
    let disabled = make_table(&[1000, 1000, 1000, 1000], BettingLimit::NoLimit, false);
    let hand = start(&disabled);
    assert_eq!(hand.prepare_next_action().ok().and_then(|n| n.straddle_amount()), None);

    // Короткий стек: меньше 2 × BB.
    let short = make_table(&[1000, 1000, 1000, 15], BettingLimit::NoLimit, true);
    let hand = start(&short);
    assert_eq!(hand.prepare_next_action().ok().and_then(|n| n.straddle_amount()), None);

    // После колла первого игрока следующий страддлить не может.
    let table = make_table(&[1000, 1000, 1000, 1000], BettingLimit::NoLimit, true);
    let mut hand = start(&table);
    act(&mut hand, 3, PlayerActionKind::Call);
    let next = hand.prepare_next_action().expect("button");
    assert_eq!(next.straddle_amount(), None);
}

//
// ПОТ-ЛИМИТ
//

#[test]
fn pot_limit_caps_raise_and_hides_all_in() {
    let table = make_table(&[1000, 1000], BettingLimit::PotLimit, false);
    let mut hand = start(&table);

    // Кнопка: колл 5, банк 15 + 5 → рейз до 10 + 15 + 5 = 30.
    let next = hand.prepare_next_action().expect("button");
    assert_eq!(next.raise_range(), Some((Chips(20), Chips(30))));
    assert_eq!(next.all_in_amount(), None);

    let over = action(&hand, 0, PlayerActionKind::Raise(Chips(31)));
    assert_eq!(
        hand.action_received(over),
        Err(EngineError::RaiseTooLarge {
            amount: Chips(31),
            max: Chips(30)
        })
    );
    let shove = action(&hand, 0, PlayerActionKind::AllIn);
    assert_eq!(
        hand.action_received(shove),
        Err(EngineError::IllegalAction(PlayerActionKind::AllIn))
    );

    act(&mut hand, 0, PlayerActionKind::Raise(Chips(30)));
    act(&mut hand, 1, PlayerActionKind::Call);

    // Флоп: банк 60, бет не больше банка.
    let next = hand.prepare_next_action().expect("flop");
    assert_eq!(next.bet_range(), Some((Chips(10), Chips(60))));
}

#[test]
fn pot_limit_allows_all_in_when_stack_fits_in_pot() {
    let table = make_table(&[1000, 25], BettingLimit::PotLimit, false);
    let mut hand = start(&table);

    // Стек BB (25) меньше потолка после рейза кнопки.
    act(&mut hand, 0, PlayerActionKind::Raise(Chips(30)));
    let next = hand.prepare_next_action().expect("bb");
    assert_eq!(next.seat, 1);
    assert_eq!(next.all_in_amount(), Some(Chips(15)));
}

//
// ТАЙМАУТ
//

#[test]
fn timeout_folds_when_facing_a_bet() {
    let table = make_table(&[1000, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);

    hand.action_timed_out().expect("timeout");

    assert!(hand.is_finished());
    assert_eq!(hand.seat(0).map(|s| s.status), Some(SeatStatus::Folded));
    let last = hand.action_log.street(Street::Preflop).last().cloned().expect("entry");
    assert_eq!(last.action, LoggedAction::Fold);
    assert!(last.timed_out);

    let result = hand.result.clone().expect("result");
    assert_eq!(result.player(1).map(|p| p.balance_after), Some(Chips(1005)));
}

#[test]
fn timeout_checks_when_possible() {
    let table = make_table(&[1000, 1000, 1000], BettingLimit::NoLimit, false);
    let mut hand = start(&table);
    act(&mut hand, 0, PlayerActionKind::Call);
    act(&mut hand, 1, PlayerActionKind::Call);

    hand.action_timed_out().expect("bb timeout");

    assert_eq!(hand.street, Street::Flop);
    assert_eq!(hand.seat(2).map(|s| s.status), Some(SeatStatus::Active));
    let last = hand.action_log.street(Street::Preflop).last().cloned().expect("entry");
    assert_eq!(last.action, LoggedAction::Check);
    assert!(last.timed_out);

    let timed_out_events = hand
        .history
        .since(0)
        .iter()
        .filter(|e| matches!(e.kind, HandEventKind::PlayerActed { timed_out: true, .. }))
        .count();
    assert_eq!(timed_out_events, 1);
}
