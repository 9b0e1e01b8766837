//! Шоудаун и итог раздачи: рейк, дележ банков, нечётные фишки, хай-лоу.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, HandResult, PlayerHandResult, PotResult, PotShare, Street};
use crate::domain::SeatIndex;
use crate::engine::game_loop::HandState;
use crate::engine::positions::clockwise_from_button;
use crate::eval::HandEvaluation;

/// Кому показывается итог раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResultAudience {
    /// Игрокам за столом: карты только тех, кто дошёл до вскрытия.
    Players,
    /// Архив / база: все карты, включая сфолдивших.
    Archive,
}

/// Как разыграны банки. Считается без мутаций, применяется `HandState`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub rake: Chips,
    /// Банки в порядке "основной → сайд-поты".
    pub pots: Vec<PotResult>,
    /// Оценки рук всех мест (пусто, если вскрытия не было).
    pub evaluations: BTreeMap<SeatIndex, HandEvaluation>,
}

impl Settlement {
    /// Сколько место получает из всех банков.
    pub fn won_by(&self, seat: SeatIndex) -> Chips {
        self.pots
            .iter()
            .flat_map(|p| p.hi_winners.iter().chain(p.low_winners.iter()))
            .filter(|s| s.seat == seat)
            .map(|s| s.amount)
            .sum()
    }
}

/// Рейк раздачи: процент с основного банка с потолком.
/// Не берётся, если раздача кончилась до флопа и включён no-flop-no-drop.
pub fn rake_for_hand(state: &HandState) -> Chips {
    if state.rake.no_flop_no_drop && state.street_reached == Street::Preflop {
        return Chips::ZERO;
    }
    let main = state.pots.first().map(|p| p.amount).unwrap_or(Chips::ZERO);
    state.rake.rake_for(main)
}

/// Поделить сумму между победителями, уже упорядоченными по часовой
/// стрелке от кнопки. Остаток раздаётся по одной фишке с начала списка.
pub fn split_pot(amount: Chips, winners: &[SeatIndex]) -> Vec<(SeatIndex, Chips)> {
    let (share, remainder) = amount.split(winners.len());
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| {
            let odd = if (i as u64) < remainder.0 { Chips(1) } else { Chips::ZERO };
            (seat, share + odd)
        })
        .collect()
}

/// Разыграть все банки раздачи.
pub fn settle(state: &HandState) -> Settlement {
    let max_seats = state.seats.len();
    let live = state.live_seats();
    let contested = live.len() >= 2;

    let mut evaluations = BTreeMap::new();
    if contested && state.board.len() >= 3 {
        for (seat, s) in state.occupied_seats() {
            evaluations.insert(seat, state.game_type.evaluate(&s.hole_cards, &state.board));
        }
    }

    let rake = rake_for_hand(state);
    let mut pots = Vec::with_capacity(state.pots.len());

    // Разыгрываем с последнего сайд-пота к основному.
    for (index, pot) in state.pots.iter().enumerate().rev() {
        let pot_rake = if index == 0 { rake } else { Chips::ZERO };
        let payable = pot.amount - pot_rake;

        let mut contenders: Vec<SeatIndex> = pot
            .eligible_seats
            .iter()
            .copied()
            .filter(|s| live.contains(s))
            .collect();
        if contenders.is_empty() {
            contenders = live.clone();
        }
        let contenders = clockwise_from_button(&contenders, state.button, max_seats);

        let (hi, low) = if contenders.len() == 1 || evaluations.is_empty() {
            (split_pot(payable, &contenders), Vec::new())
        } else {
            let hi_winners = best_high(&contenders, &evaluations);
            let low_winners = if state.game_type.is_hi_lo() {
                best_low(&contenders, &evaluations)
            } else {
                Vec::new()
            };

            if low_winners.is_empty() {
                (split_pot(payable, &hi_winners), Vec::new())
            } else {
                // Нечётная фишка деления пополам – той половине, чей победитель
                // первым сидит по часовой стрелке от кнопки (при равенстве – хай).
                let half = Chips(payable.0 / 2);
                let odd = payable - half.times(2);
                let position = |seat: SeatIndex| contenders.iter().position(|&s| s == seat);
                let low_first = match (hi_winners.first(), low_winners.first()) {
                    (Some(&h), Some(&l)) => position(l) < position(h),
                    _ => false,
                };
                let (hi_half, low_half) = if low_first {
                    (half, half + odd)
                } else {
                    (half + odd, half)
                };
                (
                    split_pot(hi_half, &hi_winners),
                    split_pot(low_half, &low_winners),
                )
            }
        };

        pots.push(PotResult {
            index,
            amount: pot.amount,
            rake: pot_rake,
            eligible_seats: pot.eligible_seats.clone(),
            hi_winners: to_shares(state, &hi),
            low_winners: to_shares(state, &low),
        });
    }
    pots.sort_by_key(|p| p.index);

    Settlement {
        rake,
        pots,
        evaluations,
    }
}

fn best_high(contenders: &[SeatIndex], evals: &BTreeMap<SeatIndex, HandEvaluation>) -> Vec<SeatIndex> {
    let rank_of = |s: &SeatIndex| evals.get(s).map(|e| e.hi.rank).unwrap_or(HandRank(u16::MAX));
    let best = contenders.iter().map(rank_of).min().unwrap_or(HandRank(u16::MAX));
    contenders
        .iter()
        .copied()
        .filter(|s| rank_of(s) == best)
        .collect()
}

fn best_low(contenders: &[SeatIndex], evals: &BTreeMap<SeatIndex, HandEvaluation>) -> Vec<SeatIndex> {
    let low_of = |s: &SeatIndex| evals.get(s).and_then(|e| e.low.as_ref()).map(|l| l.rank);
    let Some(best) = contenders.iter().filter_map(low_of).min() else {
        return Vec::new();
    };
    contenders
        .iter()
        .copied()
        .filter(|s| low_of(s) == Some(best))
        .collect()
}

fn to_shares(state: &HandState, split: &[(SeatIndex, Chips)]) -> Vec<PotShare> {
    split
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .filter_map(|&(seat, amount)| {
            state.seat(seat).map(|s| PotShare {
                seat,
                player_id: s.player_id,
                amount,
            })
        })
        .collect()
}

/// Полный (архивный) итог раздачи. Вызывается после зачисления выигрышей.
pub fn build_result(state: &HandState, settlement: &Settlement) -> HandResult {
    let players = state
        .occupied_seats()
        .map(|(seat, s)| {
            let eval = settlement.evaluations.get(&seat);
            PlayerHandResult {
                seat,
                player_id: s.player_id,
                balance_before: s.starting_balance,
                balance_after: s.balance,
                won: settlement.won_by(seat),
                folded: !s.is_live(),
                hole_cards: Some(s.hole_cards.clone()),
                best_hand: eval.map(|e| e.hi.clone()),
                category: eval.map(|e| e.hi.category()),
                low_hand: eval.and_then(|e| e.low.clone()),
            }
        })
        .collect();

    HandResult {
        hand_id: state.hand_id,
        table_id: state.table_id,
        game_type: state.game_type,
        button: state.button,
        small_blind_seat: state.small_blind_seat,
        big_blind_seat: state.big_blind_seat,
        board: state.board.clone(),
        street_reached: state.street_reached,
        run_out: state.run_out,
        rake: settlement.rake,
        pots: settlement.pots.clone(),
        players,
        action_log: state.action_log.clone(),
    }
}

/// Итог в том виде, в каком его можно показать аудитории.
pub fn visible_to(result: &HandResult, audience: ResultAudience) -> HandResult {
    let mut visible = result.clone();
    if audience == ResultAudience::Archive {
        return visible;
    }

    let showdown = visible.players.iter().filter(|p| !p.folded).count() >= 2;
    for p in visible.players.iter_mut() {
        if p.folded || !showdown {
            p.hole_cards = None;
            p.best_hand = None;
            p.category = None;
            p.low_hand = None;
        }
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_chips_go_from_left_of_button() {
        let shares = split_pot(Chips(101), &[4, 1]);
        assert_eq!(shares, vec![(4, Chips(51)), (1, Chips(50))]);

        let shares = split_pot(Chips(11), &[2, 0, 1]);
        assert_eq!(shares, vec![(2, Chips(4)), (0, Chips(4)), (1, Chips(3))]);
    }
}
