//! Lookup table construction: maps a prime product to a totally ordered
//! integer hand rank (lower is better).

use std::collections::HashMap;

use itertools::Itertools;

use crate::card::PRIMES;
use crate::error::PokerError;
use crate::evaluate::category::{self, Category};
use crate::evaluate::combinatorics::{
    category_counts, gen_flushes, gen_straight_flushes, n_choose_r,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryEntry {
    pub suited: i64,
    pub unsuited: i64,
    pub cumulative_unsuited: i64,
    /// Position in `ranked_hands`, only meaningful when `unsuited > 0` (or,
    /// equivalently, when `cumulative_unsuited > 0`).
    pub rank: usize,
}

#[derive(Debug, Clone)]
pub struct LookupTable {
    pub suited_lookup: HashMap<u64, i32>,
    pub unsuited_lookup: HashMap<u64, i32>,
    pub hand_dict: HashMap<Category, CategoryEntry>,
    /// Non-empty categories, best to worst.
    pub ranked_hands: Vec<Category>,
    pub max_rank: i32,
}

impl LookupTable {
    pub fn new(
        suits: usize,
        ranks: usize,
        cards_for_hand: usize,
        low_end_straight: bool,
        order: Option<&[Category]>,
    ) -> Result<Self, PokerError> {
        if !(1..=5).contains(&cards_for_hand) {
            return Err(PokerError::InvalidHandSize(cards_for_hand));
        }
        if let Some(order) = order {
            category::validate_order(order)?;
        }

        let counts = category_counts(suits as i64, ranks as i64, cards_for_hand as i64, low_end_straight);
        let mut hand_dict: HashMap<Category, CategoryEntry> = HashMap::new();
        let pairs: [(Category, (i64, i64)); 9] = [
            (Category::StraightFlush, counts.straight_flush),
            (Category::FourOfAKind, counts.four_of_a_kind),
            (Category::FullHouse, counts.full_house),
            (Category::Flush, counts.flush),
            (Category::Straight, counts.straight),
            (Category::ThreeOfAKind, counts.three_of_a_kind),
            (Category::TwoPair, counts.two_pair),
            (Category::Pair, counts.pair),
            (Category::HighCard, counts.high_card),
        ];
        for (cat, (suited, unsuited)) in pairs {
            hand_dict.insert(cat, CategoryEntry { suited, unsuited, cumulative_unsuited: 0, rank: 0 });
        }

        // Order the nine categories: either by ascending suited count (tie
        // broken by tag string, matching the classical ordering falling out
        // of a plain tuple sort), or by the caller's explicit permutation.
        let mut s_hands: Vec<Category> = category::all();
        match order {
            None => {
                s_hands.sort_by(|a, b| {
                    let sa = hand_dict[a].suited;
                    let sb = hand_dict[b].suited;
                    sa.cmp(&sb).then_with(|| a.tag().cmp(b.tag()))
                });
            }
            Some(order) => {
                s_hands = order.to_vec();
            }
        }

        let mut ranked_hands = Vec::new();
        let mut rank = 0usize;
        let mut cumulative = 0i64;
        for cat in &s_hands {
            cumulative += hand_dict[cat].unsuited;
            hand_dict.get_mut(cat).unwrap().cumulative_unsuited = cumulative;
            if cumulative > 0 {
                hand_dict.get_mut(cat).unwrap().rank = rank;
                rank += 1;
                ranked_hands.push(*cat);
            }
        }
        let max_rank = cumulative as i32;

        let get_base_rank = |hand_dict: &HashMap<Category, CategoryEntry>, cat: Category| -> i32 {
            let entry = hand_dict[&cat];
            if entry.rank == 0 {
                0
            } else {
                let better = ranked_hands[entry.rank - 1];
                hand_dict[&better].cumulative_unsuited as i32 + 1
            }
        };

        // Flush-keyed table: straight flushes / straights share patterns,
        // flushes / high cards share the (non-straight) patterns.
        let straight_flushes = if hand_dict[&Category::StraightFlush].cumulative_unsuited > 0
            || hand_dict[&Category::Straight].cumulative_unsuited > 0
        {
            gen_straight_flushes(cards_for_hand as i64, ranks as i64, low_end_straight)
        } else {
            Vec::new()
        };
        let flushes = if hand_dict[&Category::Flush].cumulative_unsuited > 0
            || hand_dict[&Category::HighCard].cumulative_unsuited > 0
        {
            let mut f = gen_flushes(cards_for_hand as i64, ranks as i64, &straight_flushes);
            f.reverse();
            f
        } else {
            Vec::new()
        };

        let mut suited_lookup: HashMap<u64, i32> = HashMap::new();
        let mut unsuited_lookup: HashMap<u64, i32> = HashMap::new();

        let mut insert_patterns = |cat: Category, patterns: &[u32], into: &mut HashMap<u64, i32>| {
            if hand_dict[&cat].cumulative_unsuited == 0 {
                return;
            }
            let mut hand_rank = get_base_rank(&hand_dict, cat);
            for &bits in patterns {
                let product = crate::card::prime_product_from_rank_bits(bits);
                into.insert(product, hand_rank);
                hand_rank += 1;
            }
        };
        insert_patterns(Category::StraightFlush, &straight_flushes, &mut suited_lookup);
        insert_patterns(Category::Flush, &flushes, &mut suited_lookup);
        insert_patterns(Category::Straight, &straight_flushes, &mut unsuited_lookup);
        insert_patterns(Category::HighCard, &flushes, &mut unsuited_lookup);

        // Multiples table: four of a kind, full house, three of a kind,
        // two pair, pair.
        let backwards_ranks: Vec<i64> = (0..ranks as i64).map(|i| 12 - i).collect();
        let multiples_spec: [(Category, &[i64]); 5] = [
            (Category::FourOfAKind, &[4]),
            (Category::FullHouse, &[3, 2]),
            (Category::ThreeOfAKind, &[3]),
            (Category::TwoPair, &[2, 2]),
            (Category::Pair, &[2]),
        ];
        for (cat, multiples) in multiples_spec {
            if hand_dict[&cat].cumulative_unsuited == 0 {
                continue;
            }
            let mut hand_rank = get_base_rank(&hand_dict, cat);
            let distinct_multiples = multiples.iter().collect::<std::collections::HashSet<_>>().len() > 1;
            let combos: Vec<Vec<i64>> = if distinct_multiples {
                backwards_ranks.iter().copied().permutations(multiples.len()).collect()
            } else {
                backwards_ranks.iter().copied().combinations(multiples.len()).collect()
            };
            let kickers_needed = cards_for_hand as i64 - multiples.iter().sum::<i64>();
            for chosen in combos {
                let mut base_product: u64 = 1;
                for (&rank_idx, &mult) in chosen.iter().zip(multiples.iter()) {
                    base_product *= (PRIMES[rank_idx as usize] as u64).pow(mult as u32);
                }
                if kickers_needed > 0 {
                    let kickers: Vec<i64> =
                        backwards_ranks.iter().copied().filter(|r| !chosen.contains(r)).collect();
                    for kicker_combo in kickers.into_iter().combinations(kickers_needed as usize) {
                        let mut product = base_product;
                        for k in &kicker_combo {
                            product *= PRIMES[*k as usize] as u64;
                        }
                        unsuited_lookup.insert(product, hand_rank);
                        hand_rank += 1;
                    }
                } else {
                    unsuited_lookup.insert(base_product, hand_rank);
                    hand_rank += 1;
                }
            }
        }

        if hand_dict[&Category::Flush].cumulative_unsuited == 0 {
            suited_lookup = unsuited_lookup.clone();
        }

        tracing::debug!(
            suits, ranks, cards_for_hand, max_rank, categories = ranked_hands.len(),
            "built poker lookup table"
        );

        Ok(LookupTable { suited_lookup, unsuited_lookup, hand_dict, ranked_hands, max_rank })
    }

    /// Returns the category tag for a given hand rank.
    pub fn get_rank_class(&self, hand_rank: i32) -> Result<Category, PokerError> {
        if hand_rank < 0 {
            return Err(PokerError::InvalidHandRank { rank: hand_rank, max_rank: self.max_rank });
        }
        for &cat in &self.ranked_hands {
            if hand_rank <= self.hand_dict[&cat].cumulative_unsuited as i32 {
                return Ok(cat);
            }
        }
        Err(PokerError::InvalidHandRank { rank: hand_rank, max_rank: self.max_rank })
    }
}

/// `n choose r` re-exported for evaluator-level callers.
pub fn binomial(n: i64, r: i64) -> i64 {
    n_choose_r(n, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_deck_max_rank_is_7462() {
        let table = LookupTable::new(4, 13, 5, true, None).unwrap();
        assert_eq!(table.max_rank, 7462);
    }

    #[test]
    fn every_rank_has_exactly_one_key() {
        let table = LookupTable::new(4, 13, 5, true, None).unwrap();
        let mut ranks: Vec<i32> = table
            .suited_lookup
            .values()
            .chain(table.unsuited_lookup.values())
            .copied()
            .collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), table.max_rank as usize + 1);
        assert_eq!(*ranks.first().unwrap(), 0);
        assert_eq!(*ranks.last().unwrap(), table.max_rank);
    }

    #[test]
    fn get_rank_class_sanity() {
        let table = LookupTable::new(4, 13, 5, true, None).unwrap();
        assert_eq!(table.get_rank_class(0).unwrap(), Category::StraightFlush);
        assert!(table.get_rank_class(-1).is_err());
        assert!(table.get_rank_class(table.max_rank + 1).is_err());
    }

    #[test]
    fn custom_order_must_be_a_permutation() {
        let bad = [Category::StraightFlush, Category::Flush];
        assert!(LookupTable::new(4, 13, 5, true, Some(&bad)).is_err());
    }
}
