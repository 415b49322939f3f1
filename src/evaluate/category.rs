//! The nine poker hand categories and their default/custom ordering.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::PokerError;

/// A closed set of poker hand categories, from best to worst in the
/// classical ordering. Custom orderings are expressed as a permutation of
/// this set (§9 of the design notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Category {
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    Pair,
    HighCard,
}

/// All nine tags, in the tag order used to resolve a custom `order` list
/// (matches `ORDER_STRINGS` in the source this table is ported from).
pub fn all() -> Vec<Category> {
    Category::iter().collect()
}

impl Category {
    pub fn tag(self) -> &'static str {
        match self {
            Category::StraightFlush => "straight flush",
            Category::FourOfAKind => "four of a kind",
            Category::FullHouse => "full house",
            Category::Flush => "flush",
            Category::Straight => "straight",
            Category::ThreeOfAKind => "three of a kind",
            Category::TwoPair => "two pair",
            Category::Pair => "pair",
            Category::HighCard => "high card",
        }
    }
}

/// Validates that `order` is a permutation of the nine categories and
/// returns it resolved to `Category` values, in the same order.
pub fn validate_order(order: &[Category]) -> Result<(), PokerError> {
    let expected = all();
    if order.len() != expected.len() {
        return Err(PokerError::InvalidOrder);
    }
    for cat in expected {
        if order.iter().filter(|c| **c == cat).count() != 1 {
            return Err(PokerError::InvalidOrder);
        }
    }
    Ok(())
}
