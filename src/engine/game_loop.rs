use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandResult, Street};
use crate::domain::player::SeatStatus;
use crate::domain::table::{BettingLimit, GameType, RakeConfig, Table, TableStakes};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{ActionLog, ActionLogEntry, LoggedAction, PlayerAction, PlayerActionKind};
use crate::engine::betting::{AvailableAction, BettingState, NextSeatAction};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{next_dealer, next_seat_where, seats_after};
use crate::engine::showdown::{self, ResultAudience};
use crate::engine::side_pots::{add_chips_to_pot, Pot, SeatBet};
use crate::engine::validation::validate_action;

/// Место в раздаче. Стол и его `PlayerAtTable` не трогаются до конца
/// раздачи: всё, что меняется по ходу, живёт здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatState {
    pub player_id: PlayerId,
    /// Стек на момент начала раздачи.
    pub starting_balance: Chips,
    /// Текущий стек (за вычетом поставленного).
    pub balance: Chips,
    pub status: SeatStatus,
    pub hole_cards: Vec<Card>,
    /// Ставка на текущей улице.
    pub street_bet: Chips,
    /// Всего внесено за раздачу.
    pub total_bet: Chips,
    /// Игрок уже действовал на этой улице после последнего повышения.
    pub acted: bool,
}

impl SeatState {
    fn new(player_id: PlayerId, balance: Chips) -> Self {
        Self {
            player_id,
            starting_balance: balance,
            balance,
            status: SeatStatus::Active,
            hole_cards: Vec::new(),
            street_bet: Chips::ZERO,
            total_bet: Chips::ZERO,
            acted: false,
        }
    }

    /// Ещё претендует на банк (не сфолдил).
    pub fn is_live(&self) -> bool {
        self.status != SeatStatus::Folded
    }

    /// Может делать ставки.
    pub fn can_act(&self) -> bool {
        self.status == SeatStatus::Active
    }
}

/// Состояние одной раздачи: от блайндов до итога.
///
/// Единственный владелец всего, что происходит в раздаче. Меняется только
/// через свои методы; после `Street::Result` хранит итог в `result`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandState {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub game_type: GameType,
    pub betting_limit: BettingLimit,
    pub stakes: TableStakes,
    pub allow_straddle: bool,
    pub rake: RakeConfig,

    /// Места раздачи: индекс = SeatIndex, None – место пустое или не в игре.
    pub seats: Vec<Option<SeatState>>,

    pub button: SeatIndex,
    pub small_blind_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,

    pub street: Street,
    /// Последняя улица с торговлей или Showdown, если дошли до вскрытия.
    pub street_reached: Street,
    pub betting: BettingState,
    /// Чей сейчас ход (seat).
    pub acting_seat: Option<SeatIndex>,

    pub action_log: ActionLog,
    pub pots: Vec<Pot>,
    pub board: Vec<Card>,
    pub deck: Deck,
    /// Борд доразложен без торговли.
    pub run_out: bool,

    /// Архивный итог; `Some` только после `Street::Result`.
    pub result: Option<HandResult>,
    /// История раздачи.
    pub history: HandHistory,
}

impl HandState {
    /// Старт новой раздачи:
    /// - выбирает кнопку и блайнды;
    /// - раздаёт карманные карты;
    /// - постит блайнды;
    /// - находит первого ходящего.
    pub fn initialize(table: &Table, hand_id: HandId, deck: Deck) -> Result<Self, EngineError> {
        let max = table.seats.len();
        let seats: Vec<Option<SeatState>> = table
            .seats
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .filter(|p| p.can_be_dealt_in())
                    .map(|p| SeatState::new(p.player_id, p.stack))
            })
            .collect();

        let dealt = seats.iter().flatten().count();
        if dealt < 2 {
            log::error!(
                "table {}: cannot start hand {} with {} player(s)",
                table.id,
                hand_id,
                dealt
            );
            return Err(EngineError::NotEnoughPlayers);
        }

        let game_type = table.config.game_type;
        let needed = dealt * game_type.hole_cards() + 5;
        if deck.len() < needed {
            log::error!(
                "table {}: deck has {} cards, hand {} needs {}",
                table.id,
                deck.len(),
                hand_id,
                needed
            );
            return Err(EngineError::DeckTooSmall {
                needed,
                left: deck.len(),
            });
        }

        let button = next_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;
        let (small_blind_seat, big_blind_seat) = {
            let in_hand = |s: SeatIndex| matches!(seats.get(s as usize), Some(Some(_)));
            if dealt == 2 {
                // Хедз-ап: кнопка ставит малый блайнд.
                let bb = next_seat_where(button, max, in_hand)
                    .ok_or(EngineError::Internal("heads-up without big blind"))?;
                (button, bb)
            } else {
                let sb = next_seat_where(button, max, in_hand)
                    .ok_or(EngineError::Internal("no small blind seat"))?;
                let bb = next_seat_where(sb, max, in_hand)
                    .ok_or(EngineError::Internal("no big blind seat"))?;
                (sb, bb)
            }
        };

        let mut state = HandState {
            hand_id,
            table_id: table.id,
            game_type,
            betting_limit: table.config.betting_limit,
            stakes: table.config.stakes.clone(),
            allow_straddle: table.config.allow_straddle,
            rake: table.config.rake.clone(),
            seats,
            button,
            small_blind_seat,
            big_blind_seat,
            street: Street::Preflop,
            street_reached: Street::Preflop,
            betting: BettingState::new(Street::Preflop, Chips::ZERO),
            acting_seat: None,
            action_log: ActionLog::new(),
            pots: vec![Pot::new()],
            board: Vec::new(),
            deck,
            run_out: false,
            result: None,
            history: HandHistory::new(),
        };

        state.history.push(HandEventKind::HandStarted {
            table_id: state.table_id,
            hand_id,
            game_type,
        });
        log::info!(
            "table {}: hand {} started ({:?}, {} players, button {})",
            state.table_id,
            hand_id,
            game_type,
            dealt,
            button
        );

        state.deal_hole_cards();
        state.post_blinds();

        state.acting_seat = state.next_seat_needing_action(big_blind_seat);
        if state.acting_seat.is_none() {
            // Все в олл-ине уже на блайндах.
            state.advance_street();
        }

        Ok(state)
    }

    // ------------------------------------------------------------------
    // Доступ к местам
    // ------------------------------------------------------------------

    pub fn seat(&self, seat: SeatIndex) -> Option<&SeatState> {
        self.seats.get(seat as usize).and_then(|s| s.as_ref())
    }

    fn seat_mut(&mut self, seat: SeatIndex) -> Option<&mut SeatState> {
        self.seats.get_mut(seat as usize).and_then(|s| s.as_mut())
    }

    /// Все места, участвующие в раздаче.
    pub fn occupied_seats(&self) -> impl Iterator<Item = (SeatIndex, &SeatState)> + '_ {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i as SeatIndex, s)))
    }

    /// Места, которые ещё претендуют на банк.
    pub fn live_seats(&self) -> Vec<SeatIndex> {
        self.occupied_seats()
            .filter(|(_, s)| s.is_live())
            .map(|(i, _)| i)
            .collect()
    }

    /// Сколько мест ещё могут делать ставки.
    pub fn active_count(&self) -> usize {
        self.occupied_seats().filter(|(_, s)| s.can_act()).count()
    }

    fn others_can_act(&self, seat: SeatIndex) -> bool {
        self.occupied_seats()
            .any(|(i, s)| i != seat && s.can_act())
    }

    /// До какой ставки месту нужно дотянуться на этой улице.
    ///
    /// Если кроме него ставить больше некому, потолок – самая большая ставка
    /// живых соперников (например, короткий BB в олл-ине): сверх неё колл не нужен.
    fn bet_to_match(&self, seat: SeatIndex) -> Chips {
        let current = self.betting.current_bet;
        if self.others_can_act(seat) {
            return current;
        }
        self.occupied_seats()
            .filter(|&(i, s)| i != seat && s.is_live())
            .map(|(_, s)| s.street_bet)
            .max()
            .unwrap_or(Chips::ZERO)
            .min(current)
    }

    /// Нужно ли месту действовать на этой улице.
    pub fn needs_action(&self, seat: SeatIndex) -> bool {
        match self.seat(seat) {
            Some(s) if s.can_act() => {
                s.street_bet < self.bet_to_match(seat) || (!s.acted && self.others_can_act(seat))
            }
            _ => false,
        }
    }

    fn next_seat_needing_action(&self, after: SeatIndex) -> Option<SeatIndex> {
        next_seat_where(after, self.seats.len(), |s| self.needs_action(s))
    }

    /// Банки + ставки текущей улицы.
    pub fn pot_total(&self) -> Chips {
        let pots: Chips = self.pots.iter().map(|p| p.amount).sum();
        let bets: Chips = self.occupied_seats().map(|(_, s)| s.street_bet).sum();
        pots + bets
    }

    /// Все фишки раздачи: стеки + ставки + банки. До итога равно сумме
    /// стартовых стеков; после – сумме стартовых стеков минус рейк.
    pub fn chips_in_play(&self) -> Chips {
        let stacks: Chips = self.occupied_seats().map(|(_, s)| s.balance).sum();
        let result_pots = if self.is_finished() {
            Chips::ZERO
        } else {
            self.pot_total()
        };
        stacks + result_pots
    }

    pub fn is_finished(&self) -> bool {
        self.street == Street::Result
    }

    // ------------------------------------------------------------------
    // Старт раздачи
    // ------------------------------------------------------------------

    /// Раздача карманных карт по кругу, начиная слева от кнопки.
    fn deal_hole_cards(&mut self) {
        let order: Vec<SeatIndex> = seats_after(self.button, self.seats.len())
            .filter(|&s| self.seat(s).is_some())
            .collect();

        for _round in 0..self.game_type.hole_cards() {
            for &seat in &order {
                let card = self.deck.draw_one();
                if let Some(s) = self.seat_mut(seat) {
                    s.hole_cards.push(card);
                }
            }
        }

        for &seat in &order {
            let cards = self.seat(seat).map(|s| s.hole_cards.clone()).unwrap_or_default();
            self.history.push(HandEventKind::HoleCardsDealt { seat, cards });
        }
    }

    /// Блайнды. Короткий стек ставит сколько есть и уходит в олл-ин.
    fn post_blinds(&mut self) {
        let stakes = self.stakes.clone();
        let sb = self.post_forced(self.small_blind_seat, stakes.small_blind, LoggedAction::SmallBlind);
        let bb = self.post_forced(self.big_blind_seat, stakes.big_blind, LoggedAction::BigBlind);

        self.betting = BettingState::new(Street::Preflop, stakes.big_blind);
        self.betting.last_aggressor = Some(self.big_blind_seat);

        self.history.push(HandEventKind::BlindsPosted {
            dealer: self.button,
            small_blind: (self.small_blind_seat, sb),
            big_blind: (self.big_blind_seat, bb),
        });
    }

    fn post_forced(&mut self, seat: SeatIndex, amount: Chips, action: LoggedAction) -> Chips {
        let paid = self.put_chips(seat, amount);
        self.log_action(seat, action, paid, false);
        paid
    }

    /// Взять из стека не более `amount` в ставку улицы.
    fn put_chips(&mut self, seat: SeatIndex, amount: Chips) -> Chips {
        let Some(s) = self.seat_mut(seat) else {
            return Chips::ZERO;
        };
        let paid = amount.min(s.balance);
        s.balance -= paid;
        s.street_bet += paid;
        s.total_bet += paid;
        if s.balance.is_zero() {
            s.status = SeatStatus::AllIn;
        }
        paid
    }

    fn log_action(&mut self, seat: SeatIndex, action: LoggedAction, added: Chips, timed_out: bool) {
        let Some(s) = self.seat(seat) else {
            return;
        };
        let entry = ActionLogEntry {
            seat,
            player_id: s.player_id,
            action,
            added,
            street_bet: s.street_bet,
            balance: s.balance,
            timed_out,
        };
        self.action_log.push(self.street, entry);
    }

    // ------------------------------------------------------------------
    // Легальные действия
    // ------------------------------------------------------------------

    /// Кто ходит и какие действия ему доступны.
    pub fn prepare_next_action(&self) -> Result<NextSeatAction, EngineError> {
        if !self.street.is_betting() {
            return Err(EngineError::HandFinished);
        }
        let seat_idx = self.acting_seat.ok_or(EngineError::HandFinished)?;
        let seat = self
            .seat(seat_idx)
            .ok_or(EngineError::Internal("acting seat is empty"))?;

        let bb = self.stakes.big_blind;
        let current = self.betting.current_bet;
        let to_call = self.bet_to_match(seat_idx).saturating_sub(seat.street_bet);
        let balance = seat.balance;
        let stack = seat.street_bet + balance;
        let others = self.others_can_act(seat_idx);
        let pot_limit = self.betting_limit == BettingLimit::PotLimit;

        // Потолок пот-лимита: ставка в банк / рейз на размер банка после колла.
        let pot_cap = if current.is_zero() {
            self.pot_total().max(bb)
        } else {
            current + self.pot_total() + to_call
        };

        let mut actions = vec![AvailableAction::Fold];

        if to_call.is_zero() {
            actions.push(AvailableAction::Check);
        } else if balance > to_call {
            actions.push(AvailableAction::Call(to_call));
        }

        if others {
            if current.is_zero() {
                if balance > bb {
                    let max = if pot_limit { pot_cap.min(balance) } else { balance };
                    actions.push(AvailableAction::Bet { min: bb, max });
                }
            } else {
                let min = self.betting.min_raise;
                if stack > min {
                    let max = if pot_limit { pot_cap.max(min).min(stack) } else { stack };
                    actions.push(AvailableAction::Raise { min, max });
                }
            }
        }

        let all_in_allowed = if !others {
            balance <= to_call
        } else if pot_limit {
            balance <= to_call || stack <= pot_cap
        } else {
            true
        };
        if all_in_allowed && !balance.is_zero() {
            actions.push(AvailableAction::AllIn(balance));
        }

        if others && self.can_straddle(seat_idx) {
            actions.push(AvailableAction::Straddle(bb.times(2)));
        }

        Ok(NextSeatAction {
            seat: seat_idx,
            player_id: seat.player_id,
            street: self.street,
            to_call,
            actions,
        })
    }

    /// Страддл: префлоп, первым после большого блайнда, до любых добровольных
    /// действий, при стеке не меньше 2 × BB.
    fn can_straddle(&self, seat: SeatIndex) -> bool {
        if !self.allow_straddle
            || self.street != Street::Preflop
            || seat == self.small_blind_seat
            || self.betting.current_bet != self.stakes.big_blind
            || self.action_log.has_voluntary_action(Street::Preflop)
        {
            return false;
        }
        let first_after_bb = next_seat_where(self.big_blind_seat, self.seats.len(), |s| {
            self.seat(s).is_some()
        });
        if first_after_bb != Some(seat) {
            return false;
        }
        self.seat(seat)
            .map(|s| s.balance >= self.stakes.big_blind.times(2))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Действия
    // ------------------------------------------------------------------

    /// Применить действие игрока.
    ///
    /// Нелегальное действие отклоняется, состояние раздачи не меняется.
    pub fn action_received(&mut self, action: PlayerAction) -> Result<(), EngineError> {
        self.apply_action(action, false)
    }

    /// Таймаут текущего игрока: check, если можно, иначе fold.
    pub fn action_timed_out(&mut self) -> Result<(), EngineError> {
        let next = self.prepare_next_action()?;
        let kind = if next.can_check() {
            PlayerActionKind::Check
        } else {
            PlayerActionKind::Fold
        };
        log::info!(
            "table {}: hand {} seat {} timed out, forcing {:?}",
            self.table_id,
            self.hand_id,
            next.seat,
            kind
        );
        self.apply_action(PlayerAction::new(next.player_id, next.seat, kind), true)
    }

    fn apply_action(&mut self, action: PlayerAction, timed_out: bool) -> Result<(), EngineError> {
        let next = self
            .prepare_next_action()
            .map_err(|e| self.reject(&action, e))?;

        if action.seat != next.seat {
            return Err(self.reject(
                &action,
                EngineError::NotSeatsTurn {
                    seat: action.seat,
                    expected: Some(next.seat),
                },
            ));
        }
        if action.player_id != next.player_id {
            return Err(self.reject(
                &action,
                EngineError::PlayerNotAtSeat {
                    player_id: action.player_id,
                    seat: action.seat,
                },
            ));
        }
        validate_action(&next, &action.kind).map_err(|e| self.reject(&action, e))?;

        let seat = action.seat;
        let street_bet = self.seat(seat).map(|s| s.street_bet).unwrap_or(Chips::ZERO);
        let balance = self.seat(seat).map(|s| s.balance).unwrap_or(Chips::ZERO);

        let added = match action.kind {
            PlayerActionKind::Fold => {
                if let Some(s) = self.seat_mut(seat) {
                    s.status = SeatStatus::Folded;
                }
                Chips::ZERO
            }
            PlayerActionKind::Check => Chips::ZERO,
            PlayerActionKind::Call => self.put_chips(seat, next.to_call),
            PlayerActionKind::Bet(total) | PlayerActionKind::Raise(total) => {
                self.put_chips(seat, total - street_bet)
            }
            PlayerActionKind::AllIn => self.put_chips(seat, balance),
            PlayerActionKind::Straddle => {
                self.put_chips(seat, self.stakes.big_blind.times(2) - street_bet)
            }
        };

        let new_street_bet = match self.seat_mut(seat) {
            Some(s) => {
                s.acted = true;
                s.street_bet
            }
            None => return Err(EngineError::Internal("acting seat vanished")),
        };

        if new_street_bet > self.betting.current_bet {
            self.betting.on_raise(seat, new_street_bet);
            // Сумма к коллу выросла – остальные должны ответить заново.
            for (i, slot) in self.seats.iter_mut().enumerate() {
                if let Some(s) = slot {
                    if i as SeatIndex != seat && s.status == SeatStatus::Active {
                        s.acted = false;
                    }
                }
            }
        }

        self.log_action(seat, LoggedAction::from(action.kind), added, timed_out);
        let new_stack = self.seat(seat).map(|s| s.balance).unwrap_or(Chips::ZERO);
        self.history.push(HandEventKind::PlayerActed {
            player_id: action.player_id,
            seat,
            action: action.kind,
            new_stack,
            pot_after: self.pot_total(),
            timed_out,
        });
        log::debug!(
            "table {}: hand {} {:?} seat {} {:?} (+{}, stack {})",
            self.table_id,
            self.hand_id,
            self.street,
            seat,
            action.kind,
            added,
            new_stack
        );

        self.after_action(seat);
        Ok(())
    }

    fn reject(&self, action: &PlayerAction, err: EngineError) -> EngineError {
        log::warn!(
            "table {}: hand {} rejected {:?} from seat {} (player {}): {}",
            self.table_id,
            self.hand_id,
            action.kind,
            action.seat,
            action.player_id,
            err
        );
        err
    }

    fn after_action(&mut self, seat: SeatIndex) {
        if self.live_seats().len() <= 1 {
            self.finish_uncontested();
            return;
        }
        match self.next_seat_needing_action(seat) {
            Some(next) => self.acting_seat = Some(next),
            None => self.advance_street(),
        }
    }

    // ------------------------------------------------------------------
    // Переход улиц
    // ------------------------------------------------------------------

    /// Улица закрыта: собрать банки и перейти дальше
    /// (следующая улица, доразложение борда или шоудаун).
    fn advance_street(&mut self) {
        self.acting_seat = None;
        self.collect_street_bets(false);
        self.street_reached = self.street;

        if self.street == Street::River {
            self.go_to_showdown();
            return;
        }
        if self.active_count() <= 1 {
            self.run_out_board();
            self.go_to_showdown();
            return;
        }

        let street = self.street.next();
        self.street = street;
        self.deal_board(street);
        self.betting = BettingState::new(street, Chips::ZERO);
        self.history.push(HandEventKind::StreetChanged { street });
        log::info!(
            "table {}: hand {} -> {:?}, board {:?}",
            self.table_id,
            self.hand_id,
            street,
            self.board
        );

        // На постфлопе первым ходит первый активный игрок слева от кнопки.
        self.acting_seat = self.next_seat_needing_action(self.button);
        if self.acting_seat.is_none() {
            self.advance_street();
        }
    }

    /// Разложить ставки улицы по банкам и вернуть неуравненное.
    fn collect_street_bets(&mut self, hand_ended: bool) {
        let bets: Vec<SeatBet> = self
            .occupied_seats()
            .map(|(i, s)| SeatBet::new(i, s.street_bet, !s.is_live()))
            .collect();

        if let Some(uncalled) = add_chips_to_pot(&mut self.pots, &bets, hand_ended) {
            self.return_uncalled(uncalled.seat, uncalled.amount);
        }

        for s in self.seats.iter_mut().flatten() {
            s.street_bet = Chips::ZERO;
            s.acted = false;
        }
        log::debug!(
            "table {}: hand {} pots after {:?}: {:?}",
            self.table_id,
            self.hand_id,
            self.street,
            self.pots
        );
    }

    fn deal_board(&mut self, street: Street) {
        let cards = self.deck.draw(street.cards_to_deal());
        self.board.extend(cards);
        self.history.push(HandEventKind::BoardDealt {
            street,
            cards: self.board.clone(),
        });
    }

    /// Торговаться больше некому – открываем оставшиеся карты подряд.
    fn run_out_board(&mut self) {
        while self.board.len() < 5 && self.street != Street::River {
            self.run_out = true;
            let street = self.street.next();
            self.street = street;
            self.deal_board(street);
        }
    }

    fn go_to_showdown(&mut self) {
        self.street = Street::Showdown;
        self.street_reached = Street::Showdown;
        self.history.push(HandEventKind::StreetChanged {
            street: Street::Showdown,
        });

        let live = self.live_seats();
        for seat in live {
            let Some(s) = self.seat(seat) else { continue };
            let hole_cards = s.hole_cards.clone();
            let player_id = s.player_id;
            let rank = self.game_type.evaluate(&hole_cards, &self.board).hi.rank;
            self.history.push(HandEventKind::ShowdownReveal {
                seat,
                player_id,
                hole_cards,
                rank,
            });
        }

        self.finish();
    }

    /// Вернуть месту фишки, которые никто не уравнял.
    fn return_uncalled(&mut self, seat: SeatIndex, amount: Chips) {
        if let Some(s) = self.seat_mut(seat) {
            s.balance += amount;
            s.total_bet -= amount;
            if s.status == SeatStatus::AllIn && !s.balance.is_zero() {
                s.status = SeatStatus::Active;
            }
        }
        self.history.push(HandEventKind::UncalledBetReturned { seat, amount });
        log::debug!(
            "table {}: hand {} returned uncalled {} to seat {}",
            self.table_id,
            self.hand_id,
            amount,
            seat
        );
    }

    /// Все, кроме одного, сфолдили: банк без вскрытия.
    ///
    /// Излишек ставки оставшегося игрока над самой большой ставкой улицы
    /// у соперников возвращается до сбора банка, рейк с него не берётся.
    fn finish_uncontested(&mut self) {
        self.acting_seat = None;

        if let Some(&winner) = self.live_seats().first() {
            let top_other = self
                .occupied_seats()
                .filter(|&(i, _)| i != winner)
                .map(|(_, s)| s.street_bet)
                .max()
                .unwrap_or(Chips::ZERO);
            let excess = self
                .seat(winner)
                .map(|s| s.street_bet.saturating_sub(top_other))
                .unwrap_or(Chips::ZERO);
            if !excess.is_zero() {
                if let Some(s) = self.seat_mut(winner) {
                    s.street_bet -= excess;
                }
                self.return_uncalled(winner, excess);
            }
        }

        self.collect_street_bets(true);
        self.street_reached = self.street;
        self.finish();
    }

    /// Разыграть банки, зачислить выигрыши, собрать итог.
    fn finish(&mut self) {
        let settlement = showdown::settle(self);

        if !settlement.rake.is_zero() {
            self.history.push(HandEventKind::RakeTaken {
                amount: settlement.rake,
            });
        }

        for pot in &settlement.pots {
            for share in pot.hi_winners.iter().chain(pot.low_winners.iter()) {
                if let Some(s) = self.seat_mut(share.seat) {
                    s.balance += share.amount;
                }
                self.history.push(HandEventKind::PotAwarded {
                    pot_index: pot.index,
                    seat: share.seat,
                    player_id: share.player_id,
                    amount: share.amount,
                });
            }
        }

        self.street = Street::Result;
        self.acting_seat = None;

        let result = showdown::build_result(self, &settlement);
        self.history.push(HandEventKind::HandFinished {
            hand_id: self.hand_id,
            table_id: self.table_id,
        });
        log::info!(
            "table {}: hand {} finished at {:?}, pot {}, rake {}, winners {:?}",
            self.table_id,
            self.hand_id,
            result.street_reached,
            result.total_pot(),
            result.rake,
            result.winners()
        );
        if !result.is_conserved() {
            log::error!(
                "table {}: hand {} chips not conserved: before {}, after {}, rake {}",
                self.table_id,
                self.hand_id,
                result.balances_before(),
                result.balances_after(),
                result.rake
            );
        }

        self.result = Some(result);
    }

    // ------------------------------------------------------------------
    // Итог и сериализация
    // ------------------------------------------------------------------

    /// Итог раздачи для аудитории (None, пока раздача идёт).
    pub fn result_for(&self, audience: ResultAudience) -> Option<HandResult> {
        self.result
            .as_ref()
            .map(|r| showdown::visible_to(r, audience))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
