//! Deck construction, shuffling, and scripted ("tricked") prefixes.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::card::{Card, SUITS};
use crate::error::PokerError;

/// An ordered sequence of distinct [`Card`]s drawn from the subset of a full
/// deck with the first `num_ranks` ranks (highest kept) and the first
/// `num_suits` suits (S, H, D, C order).
#[derive(Debug, Clone)]
pub struct Deck {
    num_suits: usize,
    num_ranks: usize,
    /// The full deck this instance draws from, in canonical order.
    full: Vec<Card>,
    /// The cards remaining to be drawn, front = top of deck.
    cards: Vec<Card>,
    /// When `Some`, the exact prefix `shuffle` must place at positions
    /// `0..prefix.len()`.
    trick: Option<Vec<Card>>,
}

impl Deck {
    /// Builds a deck over the first `num_suits` suits and the top
    /// `num_ranks` ranks, in `shuffle`-ready (unshuffled, canonical) order.
    pub fn new(num_suits: usize, num_ranks: usize) -> Result<Self, PokerError> {
        if !(1..=4).contains(&num_suits) || !(1..=13).contains(&num_ranks) {
            return Err(PokerError::InvalidDeckParams { num_suits, num_ranks });
        }
        let all_ranks = crate::card::STR_RANKS.len();
        let rank_indices = (all_ranks - num_ranks)..all_ranks;

        let mut full = Vec::with_capacity(num_suits * num_ranks);
        for rank_index in rank_indices {
            for suit_idx in 0..num_suits {
                full.push(Card::new(rank_index as u8, 1u8 << suit_idx));
            }
        }

        Ok(Deck { num_suits, num_ranks, full: full.clone(), cards: full, trick: None })
    }

    pub fn num_suits(&self) -> usize {
        self.num_suits
    }

    pub fn num_ranks(&self) -> usize {
        self.num_ranks
    }

    pub fn full_size(&self) -> usize {
        self.full.len()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards
    }

    /// Records a prefix that every subsequent `shuffle` must place first.
    pub fn trick(&mut self, prefix: Vec<Card>) {
        self.trick = Some(prefix);
    }

    /// Clears a previously recorded trick.
    pub fn untrick(&mut self) {
        self.trick = None;
    }

    /// Uniformly permutes the full deck, unless a trick is active, in which
    /// case the trick's prefix is placed first and the remaining cards are
    /// uniformly shuffled beneath it.
    pub fn shuffle<R: RngCore>(&mut self, rng: &mut R) {
        match &self.trick {
            None => {
                self.cards = self.full.clone();
                self.cards.shuffle(rng);
            }
            Some(prefix) => {
                let mut rest: Vec<Card> =
                    self.full.iter().copied().filter(|c| !prefix.contains(c)).collect();
                rest.shuffle(rng);
                let mut cards = prefix.clone();
                cards.extend(rest);
                self.cards = cards;
            }
        }
    }

    /// Removes and returns up to `n` cards from the top of the deck. Returns
    /// fewer if the deck is exhausted; never fails.
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        self.cards.drain(..take).collect()
    }
}
