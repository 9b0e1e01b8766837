use serde::{Deserialize, Serialize};

use crate::domain::{chips::Chips, SeatIndex};

/// Банк: основной (первый) или сайд-пот.
/// Разыгрывается только между `eligible_seats`, которые не сфолдили.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Пот только что открыт: ни фишек, ни претендентов.
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero() && self.eligible_seats.is_empty()
    }

    pub fn is_eligible(&self, seat: SeatIndex) -> bool {
        self.eligible_seats.contains(&seat)
    }

    fn add_eligible(&mut self, seats: &[SeatIndex]) {
        for &seat in seats {
            if !self.eligible_seats.contains(&seat) {
                self.eligible_seats.push(seat);
            }
        }
        self.eligible_seats.sort_unstable();
    }
}

/// Ставка места на закрывающейся улице.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatBet {
    pub seat: SeatIndex,
    pub amount: Chips,
    /// Сфолдившее место отдаёт фишки, но ни на что не претендует.
    pub folded: bool,
}

impl SeatBet {
    pub fn new(seat: SeatIndex, amount: Chips, folded: bool) -> Self {
        Self {
            seat,
            amount,
            folded,
        }
    }
}

/// Часть ставки, которую никто из живых соперников не смог уравнять.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UncalledBet {
    pub seat: SeatIndex,
    pub amount: Chips,
}

/// Разложить ставки закрывшейся улицы по банкам.
///
/// Слой за слоем: берём минимальную ненулевую ставку среди живых мест и
/// снимаем до неё с каждого места, у которого ещё остались фишки. Живые
/// участники слоя становятся претендентами. Слой докладывается в последний
/// банк, если тот пуст или его живые претенденты совпадают с участниками
/// слоя; иначе открывается новый сайд-пот.
///
/// Когда фишки остались только у одного живого места:
/// - `hand_ended` – всё остаток (и мёртвые деньги) уходит в текущий банк;
/// - иначе мёртвые деньги и та часть ставки, что их покрывает, идут в банк
///   только этого места, а неуравненный излишек возвращается как `UncalledBet`.
pub fn add_chips_to_pot(
    pots: &mut Vec<Pot>,
    street_bets: &[SeatBet],
    hand_ended: bool,
) -> Option<UncalledBet> {
    if pots.is_empty() {
        pots.push(Pot::new());
    }

    let folded: Vec<SeatIndex> = street_bets
        .iter()
        .filter(|b| b.folded)
        .map(|b| b.seat)
        .collect();

    let mut remaining: Vec<SeatBet> = street_bets
        .iter()
        .filter(|b| !b.amount.is_zero())
        .copied()
        .collect();

    loop {
        let live: Vec<SeatBet> = remaining
            .iter()
            .filter(|b| !b.folded && !b.amount.is_zero())
            .copied()
            .collect();
        let dead: Chips = remaining
            .iter()
            .filter(|b| b.folded)
            .map(|b| b.amount)
            .sum();

        match live.as_slice() {
            [] => {
                // Остались только мёртвые деньги – в текущий банк.
                if !dead.is_zero() {
                    last_pot(pots).amount += dead;
                }
                return None;
            }
            [single] => {
                if hand_ended {
                    let pot = last_pot(pots);
                    pot.amount += single.amount + dead;
                    pot.add_eligible(&[single.seat]);
                    return None;
                }

                let max_dead = remaining
                    .iter()
                    .filter(|b| b.folded)
                    .map(|b| b.amount)
                    .max()
                    .unwrap_or(Chips::ZERO);
                let matched = single.amount.min(max_dead);
                let uncalled = single.amount - matched;

                let tier = matched + dead;
                if !tier.is_zero() {
                    put_tier(pots, tier, &[single.seat], &folded);
                }

                return if uncalled.is_zero() {
                    None
                } else {
                    Some(UncalledBet {
                        seat: single.seat,
                        amount: uncalled,
                    })
                };
            }
            _ => {}
        }

        let level = live
            .iter()
            .map(|b| b.amount)
            .min()
            .unwrap_or(Chips::ZERO);

        let mut tier = Chips::ZERO;
        let mut contributors = Vec::new();
        for bet in remaining.iter_mut() {
            let take = bet.amount.min(level);
            if take.is_zero() {
                continue;
            }
            bet.amount -= take;
            tier += take;
            if !bet.folded {
                contributors.push(bet.seat);
            }
        }
        contributors.sort_unstable();

        put_tier(pots, tier, &contributors, &folded);
    }
}

fn last_pot(pots: &mut Vec<Pot>) -> &mut Pot {
    if pots.is_empty() {
        pots.push(Pot::new());
    }
    let last = pots.len() - 1;
    &mut pots[last]
}

/// Положить слой в последний банк или открыть новый.
fn put_tier(pots: &mut Vec<Pot>, amount: Chips, contributors: &[SeatIndex], folded: &[SeatIndex]) {
    let pot = last_pot(pots);

    let live_eligible: Vec<SeatIndex> = pot
        .eligible_seats
        .iter()
        .copied()
        .filter(|s| !folded.contains(s))
        .collect();

    if pot.is_empty() || live_eligible == contributors {
        pot.amount += amount;
        pot.add_eligible(contributors);
    } else {
        let mut eligible_seats = contributors.to_vec();
        eligible_seats.sort_unstable();
        pots.push(Pot {
            amount,
            eligible_seats,
        });
    }
}
