//! Hand-strength evaluation over a parameterized deck.

pub mod category;
pub mod combinatorics;
pub mod lookup;

use itertools::Itertools;

use crate::card::{prime_product_from_rank_bits, Card};
use crate::error::PokerError;
pub use category::Category;
use lookup::LookupTable;

/// Evaluates hand strength for a fixed `(suits, ranks, cards_for_hand)` deck
/// shape. Construction builds the full lookup table once; `evaluate` is then
/// a handful of hash lookups per call.
#[derive(Debug, Clone)]
pub struct Evaluator {
    suits: usize,
    ranks: usize,
    cards_for_hand: usize,
    mandatory_hole_cards: usize,
    table: LookupTable,
}

impl Evaluator {
    pub fn new(
        suits: usize,
        ranks: usize,
        cards_for_hand: usize,
        mandatory_hole_cards: usize,
        low_end_straight: bool,
        order: Option<&[Category]>,
    ) -> Result<Self, PokerError> {
        if !(1..=5).contains(&cards_for_hand) {
            return Err(PokerError::InvalidHandSize(cards_for_hand));
        }
        if mandatory_hole_cards > cards_for_hand {
            return Err(PokerError::InvalidConfig {
                field: "mandatory_num_hole_cards",
                expected: cards_for_hand,
                found: mandatory_hole_cards,
            });
        }
        let table = LookupTable::new(suits, ranks, cards_for_hand, low_end_straight, order)?;
        Ok(Evaluator { suits, ranks, cards_for_hand, mandatory_hole_cards, table })
    }

    pub fn max_rank(&self) -> i32 {
        self.table.max_rank
    }

    pub fn get_rank_class(&self, rank: i32) -> Result<Category, PokerError> {
        self.table.get_rank_class(rank)
    }

    /// Best (lowest) rank over every legal combination of `hole` and
    /// `community` cards, honoring `mandatory_hole_cards`.
    pub fn evaluate(&self, hole: &[Card], community: &[Card]) -> Result<i32, PokerError> {
        let combos = self.legal_combinations(hole, community)?;
        combos
            .into_iter()
            .map(|combo| self.rank_combination(&combo))
            .min()
            .ok_or(PokerError::InvalidHandSize(0))
    }

    fn legal_combinations(&self, hole: &[Card], community: &[Card]) -> Result<Vec<Vec<Card>>, PokerError> {
        if self.mandatory_hole_cards == 0 {
            let all: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();
            if all.len() < self.cards_for_hand {
                return Err(PokerError::InvalidHandSize(all.len()));
            }
            Ok(all.into_iter().combinations(self.cards_for_hand).collect())
        } else {
            if hole.len() < self.mandatory_hole_cards {
                return Err(PokerError::InvalidHandSize(hole.len()));
            }
            let remaining = self.cards_for_hand - self.mandatory_hole_cards;
            let mut combos = Vec::new();
            for hole_combo in hole.iter().copied().combinations(self.mandatory_hole_cards) {
                let pool: Vec<Card> = hole
                    .iter()
                    .filter(|c| !hole_combo.contains(c))
                    .chain(community.iter())
                    .copied()
                    .collect();
                if pool.len() < remaining {
                    continue;
                }
                for rest in pool.into_iter().combinations(remaining) {
                    let mut combo = hole_combo.clone();
                    combo.extend(rest);
                    combos.push(combo);
                }
            }
            if combos.is_empty() {
                return Err(PokerError::InvalidHandSize(hole.len() + community.len()));
            }
            Ok(combos)
        }
    }

    fn rank_combination(&self, cards: &[Card]) -> i32 {
        let flush_bits = cards.iter().fold(0xFFFFu32, |acc, c| acc & c.0) & 0xF000;
        if self.suits > 1 && flush_bits != 0 {
            let bits = cards.iter().fold(0u32, |acc, c| acc | c.bitrank());
            let product = prime_product_from_rank_bits(bits);
            if let Some(&rank) = self.table.suited_lookup.get(&product) {
                return rank;
            }
        }
        let product: u64 = cards.iter().fold(1u64, |acc, c| acc * c.prime() as u64);
        *self.table.unsuited_lookup.get(&product).expect("every rank-multiset is present in the table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        Card::from_str(s).unwrap()
    }

    #[test]
    fn standard_evaluator_max_rank() {
        let eval = Evaluator::new(4, 13, 5, 0, true, None).unwrap();
        assert_eq!(eval.max_rank(), 7462);
    }

    #[test]
    fn royal_flush_beats_everything() {
        let eval = Evaluator::new(4, 13, 5, 0, true, None).unwrap();
        let royal = [card("As"), card("Ks"), card("Qs"), card("Js"), card("Ts")];
        let rank = eval.rank_combination(&royal);
        assert_eq!(rank, 0);
        assert_eq!(eval.get_rank_class(rank).unwrap(), Category::StraightFlush);
    }

    #[test]
    fn wheel_straight_flush_is_a_straight_flush() {
        let eval = Evaluator::new(4, 13, 5, 0, true, None).unwrap();
        let wheel = [card("As"), card("2s"), card("3s"), card("4s"), card("5s")];
        assert_eq!(eval.get_rank_class(eval.rank_combination(&wheel)).unwrap(), Category::StraightFlush);
    }

    #[test]
    fn pair_beats_high_card() {
        let eval = Evaluator::new(4, 13, 5, 0, true, None).unwrap();
        let pair = [card("2h"), card("2s"), card("9c"), card("Jd"), card("4h")];
        let high = [card("2h"), card("5s"), card("9c"), card("Jd"), card("4h")];
        assert!(eval.rank_combination(&pair) < eval.rank_combination(&high));
    }

    #[test]
    fn seven_card_evaluate_picks_best_five() {
        let eval = Evaluator::new(4, 13, 5, 0, true, None).unwrap();
        let hole = [card("Ah"), card("Kh")];
        let community = [card("Qh"), card("Jh"), card("Th"), card("2c"), card("3d")];
        let rank = eval.evaluate(&hole, &community).unwrap();
        assert_eq!(rank, 0);
    }

    #[test]
    fn mandatory_hole_cards_restricts_combinations() {
        // Leduc-style: exactly one hole card must be used, plus one of the
        // board cards, out of a 2-card hand.
        let eval = Evaluator::new(4, 13, 2, 1, false, None).unwrap();
        let hole = [card("Qs")];
        let community = [card("Ks")];
        let rank = eval.evaluate(&hole, &community).unwrap();
        assert!(eval.get_rank_class(rank).is_ok());
    }
}
