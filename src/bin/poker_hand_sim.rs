// src/bin/poker_hand_sim.rs
//
// Симуляция: несколько столов, случайные боты, проверка сохранения фишек.
//
//   poker_hand_sim [tables] [hands_per_table] [seed]
//
// Логи – через RUST_LOG (например RUST_LOG=info).

use rand::Rng;

use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::player::PlayerAtTable;
use poker_hand_engine::domain::table::{BettingLimit, GameType, RakeConfig, Table, TableConfig, TableStakes};
use poker_hand_engine::domain::TableId;
use poker_hand_engine::engine::{AvailableAction, HandProgress, NextSeatAction, PlayerAction, PlayerActionKind, TableSession};
use poker_hand_engine::infra::{DeterministicRng, InMemoryHandStore};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tables: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
    let hands: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(200);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    println!("poker_hand_sim: {tables} столов × {hands} раздач, seed={seed}");

    let mut rng = DeterministicRng::from_u64(seed);
    let mut failures = 0;

    for n in 0..tables {
        let table = build_table(n + 1);
        let before = table.total_chips();
        let mut session = TableSession::new(table, InMemoryHandStore::new());

        let mut played = 0;
        let mut rake = Chips::ZERO;
        for _ in 0..hands {
            if session.table().dealable_count() < 2 {
                break;
            }
            match play_hand(&mut session, &mut rng) {
                Ok(hand_rake) => {
                    rake += hand_rake;
                    played += 1;
                }
                Err(e) => {
                    eprintln!("[SIM] стол {}: раздача прервана: {e}", session.table_id());
                    failures += 1;
                    break;
                }
            }
        }

        let after = session.table().total_chips();
        let ok = before == after + rake;
        if !ok {
            failures += 1;
        }
        println!(
            "[SIM] стол {} ({:?}): {played} раздач, фишек до {before}, после {after}, рейк {rake} – {}",
            session.table_id(),
            session.table().config.game_type,
            if ok { "OK" } else { "НАРУШЕНО" }
        );
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Стол с 6 ботами; вариант игры чередуется по номеру стола.
fn build_table(id: TableId) -> Table {
    let game_type = match id % 3 {
        1 => GameType::Holdem,
        2 => GameType::Omaha,
        _ => GameType::OmahaHiLo,
    };
    let mut config = TableConfig::new(6, game_type, TableStakes::new(Chips(5), Chips(10)));
    if game_type != GameType::Holdem {
        config.betting_limit = BettingLimit::PotLimit;
    }
    config.allow_straddle = true;
    config.rake = RakeConfig {
        percent: 5,
        cap: Chips(30),
        no_flop_no_drop: true,
    };

    let mut table = Table::new(id, format!("SIM TABLE {id}"), config);
    for seat in 0..6u8 {
        let player_id = id * 100 + seat as u64;
        table.seat_player(seat, PlayerAtTable::new(player_id, Chips(1_000)));
    }
    table
}

/// Сыграть одну раздачу до конца. Возвращает взятый рейк.
fn play_hand(
    session: &mut TableSession<InMemoryHandStore>,
    rng: &mut DeterministicRng,
) -> Result<Chips, Box<dyn std::error::Error>> {
    let mut progress = session.start_hand_with_rng(rng)?;
    loop {
        match progress {
            HandProgress::Finished(result) => return Ok(result.rake),
            HandProgress::Ongoing(next) => {
                if rng.gen_ratio(1, 50) {
                    progress = session.time_out()?;
                    continue;
                }
                let kind = pick_action(&next, rng);
                progress = session.act(PlayerAction::new(next.player_id, next.seat, kind))?;
            }
        }
    }
}

/// Бот: чаще пассивен, иногда агрессивен, изредка фолдит.
fn pick_action(next: &NextSeatAction, rng: &mut DeterministicRng) -> PlayerActionKind {
    let roll: u32 = rng.gen_range(0..100);

    for action in &next.actions {
        match *action {
            AvailableAction::Straddle(_) if roll < 10 => return PlayerActionKind::Straddle,
            AvailableAction::Raise { min, max } if roll < 15 => {
                return PlayerActionKind::Raise(Chips(rng.gen_range(min.0..=max.0)))
            }
            AvailableAction::Bet { min, max } if roll < 25 => {
                return PlayerActionKind::Bet(Chips(rng.gen_range(min.0..=max.0)))
            }
            AvailableAction::AllIn(_) if roll < 3 => return PlayerActionKind::AllIn,
            _ => {}
        }
    }

    if next.can_check() {
        PlayerActionKind::Check
    } else if next.call_amount().is_some() && roll < 85 {
        PlayerActionKind::Call
    } else if next.all_in_amount().is_some() && roll < 40 {
        PlayerActionKind::AllIn
    } else {
        PlayerActionKind::Fold
    }
}
