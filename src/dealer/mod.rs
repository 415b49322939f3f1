//! The betting state machine: a parameterized multi-street dealer.

pub mod observation;
pub mod payout;

use itertools::Itertools;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::card::Card;
use crate::config::{DealerConfig, RaiseSize};
use crate::deck::Deck;
use crate::error::PokerError;
use crate::evaluate::Evaluator;

pub use observation::{Observation, Snapshot};

/// Completion counts above this are folded in parallel via rayon; below it,
/// the per-thread setup cost isn't worth it.
const PARALLEL_COMPLETION_THRESHOLD: usize = 2_000;

pub struct Dealer {
    config: DealerConfig,
    evaluator: Evaluator,
    deck: Deck,
    rng: Box<dyn RngCore + Send>,

    button: usize,
    action: i32,
    street: usize,
    active: Vec<bool>,
    stacks: Vec<i64>,
    pot: i64,
    pot_commits: Vec<i64>,
    street_commits: Vec<i64>,
    street_option: Vec<bool>,
    street_raises: u32,
    largest_raise: i64,
    community_cards: Vec<Card>,
    hole_cards: Vec<Vec<Card>>,
    history: Vec<(usize, i64, bool)>,
    last_payouts: Vec<i64>,
    has_reset: bool,
}

impl Dealer {
    pub fn new(config: DealerConfig, rng: Box<dyn RngCore + Send>) -> Result<Self, PokerError> {
        config.validate()?;
        let evaluator = Evaluator::new(
            config.num_suits,
            config.num_ranks,
            config.num_cards_for_hand,
            config.mandatory_num_hole_cards,
            config.low_end_straight,
            config.order.as_deref(),
        )?;
        let deck = Deck::new(config.num_suits, config.num_ranks)?;
        let n = config.num_players;
        Ok(Dealer {
            button: 0,
            action: -1,
            street: 0,
            active: vec![false; n],
            stacks: vec![0; n],
            pot: 0,
            pot_commits: vec![0; n],
            street_commits: vec![0; n],
            street_option: vec![false; n],
            street_raises: 0,
            largest_raise: 0,
            community_cards: Vec::new(),
            hole_cards: vec![Vec::new(); n],
            history: Vec::new(),
            last_payouts: vec![0; n],
            has_reset: false,
            config,
            evaluator,
            deck,
            rng,
        })
    }

    /// Convenience constructor seeding a deterministic RNG from a `u64`.
    pub fn seeded(config: DealerConfig, seed: u64) -> Result<Self, PokerError> {
        Dealer::new(config, Box::new(rand::rngs::StdRng::seed_from_u64(seed)))
    }

    pub fn config(&self) -> &DealerConfig {
        &self.config
    }

    /// Forces the next `reset`'s shuffle to place `prefix` first, for
    /// scripted/deterministic scenarios. See [`Deck::trick`].
    pub fn trick(&mut self, prefix: Vec<Card>) {
        self.deck.trick(prefix);
    }

    pub fn untrick(&mut self) {
        self.deck.untrick();
    }

    fn num_players(&self) -> usize {
        self.config.num_players
    }

    /// Advances `from` by 1..N seats, wrapping, stopping at the first active
    /// seat. Seats skipped along the way are credited `street_option = true`
    /// so they never block `all_agreed`.
    fn move_action(&mut self, from: usize) -> usize {
        let n = self.num_players();
        let mut seat = from;
        for _ in 0..n {
            seat = (seat + 1) % n;
            if self.active[seat] {
                return seat;
            }
            self.street_option[seat] = true;
        }
        from
    }

    pub fn reset(&mut self, reset_button: bool, reset_stacks: bool) -> Result<Observation, PokerError> {
        let n = self.num_players();

        if reset_stacks {
            self.stacks = vec![self.config.start_stack as i64; n];
            self.active = vec![true; n];
        } else {
            self.active = self.stacks.iter().map(|&s| s > 0).collect();
            if self.active.iter().filter(|&&a| a).count() < 2 {
                return Err(PokerError::TooFewActivePlayers);
            }
        }

        self.button = if reset_button { 0 } else { (self.button + 1) % n };

        self.deck.shuffle(&mut *self.rng);
        let first_street_cards = self.config.num_community_cards[0] as usize;
        self.community_cards = self.deck.draw(first_street_cards);
        self.hole_cards = (0..n).map(|_| self.deck.draw(self.config.num_hole_cards)).collect();

        self.street = 0;
        self.pot_commits = vec![0; n];
        self.street_commits = vec![0; n];
        self.street_option = vec![false; n];
        self.street_raises = 0;
        self.largest_raise = self.config.big_blind() as i64;
        self.pot = 0;
        self.history.clear();
        self.last_payouts = vec![0; n];

        let mut action = self.button;
        if n > 2 {
            action = self.move_action(action);
        }

        for i in 0..n {
            let ante = self.config.antes[i] as i64;
            if ante <= 0 {
                continue;
            }
            let seat = (self.button + i) % n;
            let collected = ante.min(self.stacks[seat]);
            self.stacks[seat] -= collected;
            self.pot += collected;
            self.pot_commits[seat] += collected;
        }
        for i in 0..n {
            let blind = self.config.blinds[i] as i64;
            if blind <= 0 {
                continue;
            }
            let seat = (self.button + i) % n;
            let collected = blind.min(self.stacks[seat]);
            self.stacks[seat] -= collected;
            self.pot += collected;
            self.pot_commits[seat] += collected;
            self.street_commits[seat] += collected;
        }

        action = self.move_action(action);
        action = self.move_action(action);
        self.action = action as i32;
        self.street_option = vec![false; n];
        self.has_reset = true;

        debug!(button = self.button, action = self.action, pot = self.pot, "hand reset");
        Ok(self.observation())
    }

    pub fn step(&mut self, bet: f64) -> Result<(Observation, Vec<i64>, Vec<bool>), PokerError> {
        if !self.has_reset {
            return Err(PokerError::TableResetError);
        }
        if self.action < 0 {
            // Idempotent: the hand already settled, hand back the cached result.
            let n = self.num_players();
            return Ok((self.observation(), self.last_payouts.clone(), vec![true; n]));
        }
        let seat = self.action as usize;
        let fold = bet < 0.0;
        let mut bet_amt = bet.round() as i64;

        let (call, min_raise, max_raise) = self.bet_sizes(seat);
        let candidates = [0i64, call, min_raise, max_raise];
        let mut snapped = candidates[0];
        let mut best_dist = (bet_amt - snapped).abs();
        for &c in &candidates[1..] {
            let d = (bet_amt - c).abs();
            if d < best_dist {
                best_dist = d;
                snapped = c;
            }
        }
        bet_amt = snapped;
        if bet_amt == min_raise || bet_amt == max_raise {
            bet_amt = bet_amt.clamp(min_raise.min(max_raise), min_raise.max(max_raise));
        }

        let mut folded = false;
        if call > 0 && (bet_amt < call || fold) {
            self.active[seat] = false;
            bet_amt = 0;
            folded = true;
        }

        if bet_amt > 0 && (bet_amt - call) >= self.largest_raise {
            self.largest_raise = bet_amt - call;
            self.street_raises += 1;
        }

        let collected = bet_amt.min(self.stacks[seat]);
        self.stacks[seat] -= collected;
        self.pot += collected;
        self.pot_commits[seat] += collected;
        self.street_commits[seat] += collected;

        self.history.push((seat, collected, folded));
        self.street_option[seat] = true;
        trace!(seat, bet = collected, folded, "action recorded");

        self.action = self.move_action(seat) as i32;

        if self.all_agreed() {
            self.advance_street();
        }

        let (payouts, done) = self.maybe_settle()?;
        Ok((self.observation(), payouts, done))
    }

    fn bet_sizes(&self, seat: usize) -> (i64, i64, i64) {
        let max_commit = self.street_commits.iter().copied().max().unwrap_or(0);
        let call = max_commit - self.street_commits[seat];
        let bb = self.config.big_blind() as i64;

        let (mut min_raise, mut max_raise) = match self.config.raise_sizes[self.street] {
            RaiseSize::Fixed(amount) => {
                let r = amount as i64 + call;
                (r, r)
            }
            RaiseSize::Pot => (bb.max(self.largest_raise + call), self.pot + 2 * call),
            RaiseSize::Unlimited => (bb.max(self.largest_raise + call), self.stacks[seat]),
        };

        let reopen_blocked = self.config.num_raises[self.street].is_exhausted(self.street_raises)
            || (self.street_raises > 0 && call < self.largest_raise);
        if reopen_blocked {
            min_raise = 0;
            max_raise = 0;
        }

        let cap = self.stacks[seat];
        (call.min(cap), min_raise.min(cap), max_raise.min(cap))
    }

    fn all_agreed(&self) -> bool {
        let max_commit = self.street_commits.iter().copied().max().unwrap_or(0);
        (0..self.num_players()).all(|i| {
            self.street_option[i]
                && (self.street_commits[i] == max_commit || self.stacks[i] == 0 || !self.active[i])
        })
    }

    fn advance_street(&mut self) {
        let n = self.num_players();
        loop {
            self.street += 1;
            if self.street >= self.config.num_streets {
                break;
            }
            let action = self.move_action(self.button);

            let n_cards = self.config.num_community_cards[self.street] as usize;
            let dealt = self.deck.draw(n_cards);
            self.community_cards.extend(dealt);
            self.street_commits = vec![0; n];
            self.street_raises = 0;
            for i in 0..n {
                self.street_option[i] = !self.active[i];
            }
            self.action = action as i32;

            let non_all_in_active =
                (0..n).filter(|&i| self.active[i] && self.stacks[i] > 0).count();
            debug!(street = self.street, non_all_in_active, "street advanced");
            if non_all_in_active > 1 {
                break;
            }
        }
    }

    fn maybe_settle(&mut self) -> Result<(Vec<i64>, Vec<bool>), PokerError> {
        let n = self.num_players();
        let active_count = self.active.iter().filter(|&&a| a).count();
        let all_streets_done = self.street >= self.config.num_streets;

        if active_count <= 1 || all_streets_done {
            let payouts = self.payouts()?;
            for i in 0..n {
                self.stacks[i] += payouts[i] + self.pot_commits[i];
            }
            self.pot = 0;
            self.action = -1;
            self.last_payouts = payouts.clone();
            debug!(?payouts, "hand settled");
            return Ok((payouts, vec![true; n]));
        }

        let done: Vec<bool> = (0..n).map(|i| !self.active[i] || self.stacks[i] == 0).collect();
        Ok((vec![0; n], done))
    }

    fn payouts(&self) -> Result<Vec<i64>, PokerError> {
        let n = self.num_players();
        let active_seats: Vec<usize> = (0..n).filter(|&i| self.active[i]).collect();

        if active_seats.len() == 1 {
            let winner = active_seats[0];
            let mut net = vec![0i64; n];
            for i in 0..n {
                net[i] =
                    if i == winner { self.pot - self.pot_commits[i] } else { -self.pot_commits[i] };
            }
            return Ok(net);
        }

        let max_rank = self.evaluator.max_rank();
        let hands: Vec<payout::Standing> = (0..n)
            .map(|seat| {
                let strength = if self.active[seat] {
                    self.evaluator.evaluate(&self.hole_cards[seat], &self.community_cards)?
                } else {
                    max_rank + 1
                };
                Ok::<_, PokerError>((seat, strength, self.pot_commits[seat]))
            })
            .collect::<Result<_, _>>()?;

        let (mut gross, remainder) = payout::divide_pots(&hands, max_rank);
        payout::assign_remainder(&mut gross, remainder, self.button, n);

        let net: Vec<i64> =
            (0..n).map(|seat| gross.get(&seat).copied().unwrap_or(0) - self.pot_commits[seat]).collect();
        Ok(net)
    }

    fn observation(&self) -> Observation {
        let (call, min_raise, max_raise) = if self.action >= 0 {
            self.bet_sizes(self.action as usize)
        } else {
            (0, 0, 0)
        };
        Observation {
            action: self.action,
            active: self.active.clone(),
            button: self.button,
            call,
            community_cards: self.community_cards.clone(),
            hole_cards: if self.action >= 0 {
                self.hole_cards[self.action as usize].clone()
            } else {
                Vec::new()
            },
            max_raise,
            min_raise,
            pot: self.pot,
            stacks: self.stacks.clone(),
            street_commits: self.street_commits.clone(),
        }
    }

    pub fn render_snapshot(&self) -> Snapshot {
        let n = self.num_players();
        Snapshot {
            action: self.action,
            active: self.active.clone(),
            all_in: (0..n).map(|i| self.active[i] && self.stacks[i] == 0).collect(),
            community_cards: self.community_cards.clone(),
            button: self.button,
            done: self.action < 0,
            hole_cards: self.hole_cards.clone(),
            pot: self.pot,
            payouts: self.last_payouts.clone(),
            prev_action: self.history.last().copied(),
            street_commits: self.street_commits.clone(),
            stacks: self.stacks.clone(),
        }
    }

    /// Enumerates every completion of the board given the remaining deck and
    /// reports each active seat's share of wins (ties count for every tied
    /// seat), normalized by the number of completions.
    pub fn win_probabilities(&self) -> Result<Vec<f64>, PokerError> {
        let n = self.num_players();
        let active_seats: Vec<usize> = (0..n).filter(|&i| self.active[i]).collect();
        let mut probs = vec![0.0; n];
        if active_seats.len() < 2 {
            if let Some(&only) = active_seats.first() {
                probs[only] = 1.0;
            }
            return Ok(probs);
        }

        let total_board_size: usize =
            self.config.num_community_cards.iter().map(|&c| c as usize).sum();
        let needed = total_board_size.saturating_sub(self.community_cards.len());
        let remaining_deck = self.deck.remaining_cards().to_vec();
        let completions: Vec<Vec<Card>> = remaining_deck.into_iter().combinations(needed).collect();
        let total = completions.len() as f64;
        if total == 0.0 {
            return Ok(probs);
        }

        let evaluate_completion = |combo: &[Card]| -> Vec<usize> {
            let mut board = self.community_cards.clone();
            board.extend_from_slice(combo);
            let mut best = i32::MAX;
            let mut winners = Vec::new();
            for &seat in &active_seats {
                let rank = self
                    .evaluator
                    .evaluate(&self.hole_cards[seat], &board)
                    .expect("hole/community sizes are fixed by a validated config");
                if rank < best {
                    best = rank;
                    winners.clear();
                    winners.push(seat);
                } else if rank == best {
                    winners.push(seat);
                }
            }
            winners
        };

        let mut counts = vec![0.0f64; n];
        if completions.len() > PARALLEL_COMPLETION_THRESHOLD {
            let folded: Vec<f64> = completions
                .par_iter()
                .fold(
                    || vec![0.0f64; n],
                    |mut acc, combo| {
                        for seat in evaluate_completion(combo) {
                            acc[seat] += 1.0;
                        }
                        acc
                    },
                )
                .reduce(
                    || vec![0.0f64; n],
                    |mut a, b| {
                        for i in 0..n {
                            a[i] += b[i];
                        }
                        a
                    },
                );
            counts = folded;
        } else {
            for combo in &completions {
                for seat in evaluate_completion(combo) {
                    counts[seat] += 1.0;
                }
            }
        }

        for seat in &active_seats {
            probs[*seat] = counts[*seat] / total;
        }
        Ok(probs)
    }
}
