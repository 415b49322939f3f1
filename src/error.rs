//! A single closed error type for every fallible entry point in the crate.
//!
//! Mirrors the manual `Display`/`Error` impl style used by hand-evaluation
//! crates in this space rather than reaching for a derive macro: the set of
//! variants is small, fixed, and each one reports a single misuse.

use std::fmt;

/// Every way a caller can misuse this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokerError {
    /// A card string's rank character was not one of `23456789TJQKA`.
    InvalidRank { original_input: String, incorrect_char: char },
    /// A card string's suit character was not one of `SHDC`.
    InvalidSuit { original_input: String, incorrect_char: char },
    /// `num_suits` or `num_ranks` fell outside `1..=4` / `1..=13`.
    InvalidDeckParams { num_suits: usize, num_ranks: usize },
    /// `cards_for_hand` was not in `1..=5`.
    InvalidHandSize(usize),
    /// A custom category `order` was not a permutation of the nine tags.
    InvalidOrder,
    /// A scalar-or-list config field had the wrong list length.
    InvalidConfig { field: &'static str, expected: usize, found: usize },
    /// A `raise_sizes` element was not an integer, `"pot"`, or `"inf"`.
    InvalidRaiseSize(String),
    /// `get_rank_class` was called with a rank outside `[0, max_rank]`.
    InvalidHandRank { rank: i32, max_rank: i32 },
    /// `reset(reset_stacks=false)` was called with fewer than two seats
    /// holding chips.
    TooFewActivePlayers,
    /// `step` was called before the first `reset`.
    TableResetError,
    /// An external rendering front-end rejected an unknown mode.
    InvalidRenderMode(String),
}

impl fmt::Display for PokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { original_input, incorrect_char } => write!(
                f,
                "invalid rank character '{incorrect_char}' in card string '{original_input}', \
                 expected one of 23456789TJQKA"
            ),
            Self::InvalidSuit { original_input, incorrect_char } => write!(
                f,
                "invalid suit character '{incorrect_char}' in card string '{original_input}', \
                 expected one of SHDC"
            ),
            Self::InvalidDeckParams { num_suits, num_ranks } => write!(
                f,
                "invalid deck parameters: num_suits={num_suits} (must be 1..=4), \
                 num_ranks={num_ranks} (must be 1..=13)"
            ),
            Self::InvalidHandSize(k) => {
                write!(f, "cards_for_hand must be in 1..=5, got {k}")
            }
            Self::InvalidOrder => {
                write!(f, "custom category order is not a permutation of the nine category tags")
            }
            Self::InvalidConfig { field, expected, found } => write!(
                f,
                "config field '{field}' has length {found}, expected {expected}"
            ),
            Self::InvalidRaiseSize(s) => write!(
                f,
                "invalid raise_sizes element '{s}', expected an integer, \"pot\", or \"inf\""
            ),
            Self::InvalidHandRank { rank, max_rank } => write!(
                f,
                "hand rank {rank} out of range [0, {max_rank}]"
            ),
            Self::TooFewActivePlayers => {
                write!(f, "fewer than two seats have chips and reset_stacks=false")
            }
            Self::TableResetError => write!(f, "step() called before the first reset()"),
            Self::InvalidRenderMode(mode) => write!(f, "unknown render mode '{mode}'"),
        }
    }
}

impl std::error::Error for PokerError {}

pub type Result<T> = std::result::Result<T, PokerError>;
