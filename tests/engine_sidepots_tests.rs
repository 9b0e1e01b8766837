//! Side pot tests:
//! - раскладка ставок улицы по банкам (`add_chips_to_pot`);
//! - мёртвые деньги сфолдивших, неуравненный излишек, сбор при конце раздачи;
//! - сайд-поты через настоящую раздачу: олл-ины префлоп и на флопе.

use poker_hand_engine::domain::card::{parse_cards, Card};
use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::deck::Deck;
use poker_hand_engine::domain::hand::Street;
use poker_hand_engine::domain::player::{PlayerAtTable, SeatStatus};
use poker_hand_engine::domain::table::{GameType, Table, TableConfig, TableStakes};
use poker_hand_engine::domain::SeatIndex;
use poker_hand_engine::engine::{
    add_chips_to_pot, HandEventKind, HandState, PlayerAction, PlayerActionKind, Pot, SeatBet,
    UncalledBet,
};
use poker_hand_engine::infra::DeterministicRng;

fn bet(seat: SeatIndex, amount: u64) -> SeatBet {
    SeatBet::new(seat, Chips(amount), false)
}

fn folded(seat: SeatIndex, amount: u64) -> SeatBet {
    SeatBet::new(seat, Chips(amount), true)
}

fn pot(amount: u64, eligible: &[SeatIndex]) -> Pot {
    Pot {
        amount: Chips(amount),
        eligible_seats: eligible.to_vec(),
    }
}

// ---------------------------------------------------------
// add_chips_to_pot
// ---------------------------------------------------------

#[test]
fn three_all_ins_of_different_size() {
    let mut pots = vec![Pot::new()];
    let bets = [bet(0, 50), bet(1, 120), bet(2, 300), bet(3, 300)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, false), None);
    assert_eq!(
        pots,
        vec![
            pot(200, &[0, 1, 2, 3]),
            pot(210, &[1, 2, 3]),
            pot(360, &[2, 3]),
        ]
    );
}

#[test]
fn dead_money_larger_than_live_bets_stays_in_last_pot() {
    let mut pots = vec![Pot::new()];
    let bets = [folded(0, 200), bet(1, 100), bet(2, 100)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, false), None);
    assert_eq!(pots, vec![pot(400, &[1, 2])]);
}

#[test]
fn lone_live_bet_covers_dead_money_and_returns_excess() {
    let mut pots = vec![Pot::new()];
    let bets = [folded(0, 50), bet(1, 200)];

    let uncalled = add_chips_to_pot(&mut pots, &bets, false);

    assert_eq!(
        uncalled,
        Some(UncalledBet {
            seat: 1,
            amount: Chips(150)
        })
    );
    assert_eq!(pots, vec![pot(100, &[1])]);
}

#[test]
fn hand_end_sweeps_everything_into_the_pot() {
    let mut pots = vec![pot(30, &[0, 1, 2])];
    let bets = [folded(0, 50), bet(1, 200), bet(2, 0)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, true), None);
    assert_eq!(pots, vec![pot(280, &[0, 1, 2])]);
}

#[test]
fn folded_chips_above_a_short_all_in_open_a_side_pot() {
    let mut pots = vec![Pot::new()];
    let bets = [folded(0, 100), bet(1, 40), bet(2, 100)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, false), None);
    // Место 1 (олл-ин на 40) не претендует на фишки сверх своего уровня.
    assert_eq!(pots, vec![pot(120, &[1, 2]), pot(120, &[2])]);
}

#[test]
fn later_street_adds_to_matching_side_pot() {
    // После префлопа: место 3 в олл-ине на 50.
    let mut pots = vec![pot(150, &[1, 2, 3]), pot(100, &[1, 2])];
    let bets = [bet(1, 60), bet(2, 60), bet(3, 0)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, false), None);
    assert_eq!(pots, vec![pot(150, &[1, 2, 3]), pot(220, &[1, 2])]);
}

#[test]
fn bets_on_a_new_street_open_a_side_pot_past_an_earlier_all_in() {
    let mut pots = vec![pot(300, &[0, 1, 2])];
    let bets = [bet(0, 80), bet(1, 0), bet(2, 80)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, false), None);
    assert_eq!(pots, vec![pot(300, &[0, 1, 2]), pot(160, &[0, 2])]);
}

#[test]
fn empty_street_changes_nothing() {
    let mut pots = vec![pot(40, &[0, 1])];
    let bets = [bet(0, 0), bet(1, 0)];

    assert_eq!(add_chips_to_pot(&mut pots, &bets, false), None);
    assert_eq!(pots, vec![pot(40, &[0, 1])]);
}

// ---------------------------------------------------------
// САЙД-ПОТЫ В РАЗДАЧЕ
// ---------------------------------------------------------

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid cards")
}

fn make_table(stacks: &[u64]) -> Table {
    let config = TableConfig::new(6, GameType::Holdem, TableStakes::new(Chips(5), Chips(10)));
    let mut table = Table::new(3, "Side pot table".to_string(), config);
    for (seat, &stack) in stacks.iter().enumerate() {
        table.seat_player(seat as SeatIndex, PlayerAtTable::new(100 + seat as u64, Chips(stack)));
    }
    table
}

/// Колода по скрипту: игроки в порядке раздачи (слева от кнопки).
fn scripted(players: &[&str], board: &str) -> Deck {
    let mut rng = DeterministicRng::from_u64(5);
    let hole: Vec<Vec<Card>> = players.iter().map(|p| cards(p)).collect();
    let board = cards(board);
    Deck::from_script(&hole, &board[..3], board.get(3).copied(), board.get(4).copied(), &mut rng)
        .expect("valid script")
}

fn act(hand: &mut HandState, seat: SeatIndex, kind: PlayerActionKind) {
    let player_id = hand.seat(seat).expect("seat in hand").player_id;
    hand.action_received(PlayerAction::new(player_id, seat, kind))
        .unwrap_or_else(|e| panic!("seat {seat} {kind:?} rejected: {e}"));
}

#[test]
fn preflop_all_ins_run_out_with_side_pot_and_refund() {
    let table = make_table(&[300, 100, 200]);
    // Порядок раздачи: 1, 2, 0.
    let deck = scripted(&["Ah Ad", "Kh Kd", "Qh Qd"], "2c 7d 9h Jc 3s");
    let mut hand = HandState::initialize(&table, 1, deck).expect("start");

    act(&mut hand, 0, PlayerActionKind::AllIn);
    act(&mut hand, 1, PlayerActionKind::AllIn);
    act(&mut hand, 2, PlayerActionKind::AllIn);

    assert!(hand.is_finished());
    assert_eq!(hand.board.len(), 5);

    let result = hand.result.clone().expect("result");
    assert!(result.run_out);
    assert_eq!(result.street_reached, Street::Showdown);
    assert_eq!(result.pots.len(), 2);

    let main = &result.pots[0];
    assert_eq!(main.amount, Chips(300));
    assert_eq!(main.eligible_seats, vec![0, 1, 2]);
    assert_eq!(main.hi_winners.len(), 1);
    assert_eq!(main.hi_winners[0].seat, 1);

    let side = &result.pots[1];
    assert_eq!(side.amount, Chips(200));
    assert_eq!(side.eligible_seats, vec![0, 2]);
    assert_eq!(side.hi_winners[0].seat, 2);

    // Неуравненные 100 вернулись месту 0.
    assert!(hand.history.since(0).iter().any(|e| e.kind
        == HandEventKind::UncalledBetReturned {
            seat: 0,
            amount: Chips(100)
        }));
    assert_eq!(result.player(0).map(|p| p.balance_after), Some(Chips(100)));
    assert_eq!(result.player(1).map(|p| p.balance_after), Some(Chips(300)));
    assert_eq!(result.player(2).map(|p| p.balance_after), Some(Chips(200)));
    assert!(result.is_conserved());
}

#[test]
fn flop_all_in_builds_side_pot_and_betting_continues() {
    let table = make_table(&[1000, 200, 1000]);
    let deck = scripted(&["As Ah", "Ks Kh", "2c 7d"], "Qd 8c 5s 3h Jd");
    let mut hand = HandState::initialize(&table, 1, deck).expect("start");

    act(&mut hand, 0, PlayerActionKind::Call);
    act(&mut hand, 1, PlayerActionKind::Call);
    act(&mut hand, 2, PlayerActionKind::Check);
    assert_eq!(hand.street, Street::Flop);

    act(&mut hand, 1, PlayerActionKind::AllIn);
    act(&mut hand, 2, PlayerActionKind::Call);
    act(&mut hand, 0, PlayerActionKind::Raise(Chips(400)));
    act(&mut hand, 2, PlayerActionKind::Call);

    assert_eq!(hand.street, Street::Turn);
    assert_eq!(hand.seat(1).map(|s| s.status), Some(SeatStatus::AllIn));
    assert_eq!(hand.pots, vec![pot(600, &[0, 1, 2]), pot(420, &[0, 2])]);
    // Место 1 в олл-ине, торгуются 2 и 0.
    assert_eq!(hand.acting_seat, Some(2));

    for _ in 0..2 {
        act(&mut hand, 2, PlayerActionKind::Check);
        act(&mut hand, 0, PlayerActionKind::Check);
    }

    let result = hand.result.clone().expect("result");
    assert!(!result.run_out);
    assert_eq!(result.pots[0].hi_winners[0].seat, 1);
    assert_eq!(result.pots[1].hi_winners[0].seat, 2);
    assert_eq!(result.player(1).map(|p| p.balance_after), Some(Chips(600)));
    assert_eq!(result.player(2).map(|p| p.balance_after), Some(Chips(1020)));
    assert_eq!(result.player(0).map(|p| p.balance_after), Some(Chips(600)));
    assert!(result.is_conserved());
}

#[test]
fn covering_shove_is_refunded_down_to_the_call() {
    let table = make_table(&[1000, 300]);
    let deck = Deck::shuffled(&mut DeterministicRng::from_u64(21));
    let mut hand = HandState::initialize(&table, 1, deck).expect("start");

    act(&mut hand, 0, PlayerActionKind::AllIn);
    act(&mut hand, 1, PlayerActionKind::AllIn);

    assert!(hand.is_finished());
    assert!(hand.history.since(0).iter().any(|e| e.kind
        == HandEventKind::UncalledBetReturned {
            seat: 0,
            amount: Chips(700)
        }));

    let result = hand.result.clone().expect("result");
    assert!(result.run_out);
    assert_eq!(result.total_pot(), Chips(600));
    assert_eq!(hand.seat(0).map(|s| s.total_bet), Some(Chips(300)));
    assert!(result.is_conserved());
}
