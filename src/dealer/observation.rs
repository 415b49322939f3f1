//! Read-only views into dealer state: the per-action [`Observation`] handed
//! back from `reset`/`step`, and the full-knowledge [`Snapshot`] for
//! external renderers.

use serde::Serialize;

use crate::card::Card;

/// What the acting seat (or the seat that just acted) can see: its own hole
/// cards only, matching the partial-knowledge policy chosen for this API.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub action: i32,
    pub active: Vec<bool>,
    pub button: usize,
    pub call: i64,
    pub community_cards: Vec<Card>,
    pub hole_cards: Vec<Card>,
    pub max_raise: i64,
    pub min_raise: i64,
    pub pot: i64,
    pub stacks: Vec<i64>,
    pub street_commits: Vec<i64>,
}

/// Full-knowledge, read-only render snapshot. Never mutated by consumers.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub action: i32,
    pub active: Vec<bool>,
    pub all_in: Vec<bool>,
    pub community_cards: Vec<Card>,
    pub button: usize,
    pub done: bool,
    pub hole_cards: Vec<Vec<Card>>,
    pub pot: i64,
    pub payouts: Vec<i64>,
    pub prev_action: Option<(usize, i64, bool)>,
    pub street_commits: Vec<i64>,
    pub stacks: Vec<i64>,
}
