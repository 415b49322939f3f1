//! Typed, validated dealer configuration.
//!
//! The wire schema allows scalars to stand in for a per-street or per-seat
//! list (`blinds: 2` broadcasts to every seat); this module normalizes that
//! ambiguity once, at construction, so the rest of the crate only ever sees
//! plain `Vec<_>` fields.

use serde::{Deserialize, Serialize};

use crate::error::PokerError;
use crate::evaluate::Category;

/// A street's raise-size rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaiseSize {
    Fixed(u64),
    Pot,
    #[serde(rename = "inf")]
    Unlimited,
}

/// A street's raise-count cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaiseCount {
    Finite(u32),
    #[serde(rename = "inf")]
    Unlimited,
}

impl RaiseCount {
    pub fn is_exhausted(self, street_raises: u32) -> bool {
        match self {
            RaiseCount::Finite(n) => street_raises >= n,
            RaiseCount::Unlimited => false,
        }
    }
}

/// The raw, pre-validation configuration as it arrives from a config file or
/// embedding application. Scalars are accepted wherever a list is logically
/// required; [`DealerConfig::from_raw`] normalizes and validates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    pub num_players: usize,
    pub num_streets: usize,
    pub blinds: ScalarOrListValue,
    pub antes: ScalarOrListValue,
    pub raise_sizes: ScalarOrListRaise,
    pub num_raises: ScalarOrListCount,
    pub num_suits: usize,
    pub num_ranks: usize,
    pub num_hole_cards: usize,
    pub num_community_cards: ScalarOrListValue,
    pub num_cards_for_hand: usize,
    pub mandatory_num_hole_cards: usize,
    pub start_stack: u64,
    pub low_end_straight: bool,
    pub order: Option<Vec<Category>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrListValue {
    Scalar(u64),
    List(Vec<u64>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrListRaise {
    Scalar(RaiseSizeWire),
    List(Vec<RaiseSizeWire>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RaiseSizeWire {
    Fixed(u64),
    Tag(String),
}

impl RaiseSizeWire {
    fn resolve(&self) -> Result<RaiseSize, PokerError> {
        match self {
            RaiseSizeWire::Fixed(n) => Ok(RaiseSize::Fixed(*n)),
            RaiseSizeWire::Tag(tag) => match tag.as_str() {
                "pot" => Ok(RaiseSize::Pot),
                "inf" => Ok(RaiseSize::Unlimited),
                other => Err(PokerError::InvalidRaiseSize(other.to_owned())),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrListCount {
    Scalar(RaiseCountWire),
    List(Vec<RaiseCountWire>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RaiseCountWire {
    Finite(u32),
    Tag(String),
}

impl RaiseCountWire {
    fn resolve(&self) -> Result<RaiseCount, PokerError> {
        match self {
            RaiseCountWire::Finite(n) => Ok(RaiseCount::Finite(*n)),
            RaiseCountWire::Tag(tag) if tag == "inf" => Ok(RaiseCount::Unlimited),
            RaiseCountWire::Tag(other) => Err(PokerError::InvalidRaiseSize(other.clone())),
        }
    }
}

/// The validated, normalized configuration every other module consumes.
#[derive(Debug, Clone)]
pub struct DealerConfig {
    pub num_players: usize,
    pub num_streets: usize,
    pub blinds: Vec<u64>,
    pub antes: Vec<u64>,
    pub raise_sizes: Vec<RaiseSize>,
    pub num_raises: Vec<RaiseCount>,
    pub num_suits: usize,
    pub num_ranks: usize,
    pub num_hole_cards: usize,
    pub num_community_cards: Vec<u64>,
    pub num_cards_for_hand: usize,
    pub mandatory_num_hole_cards: usize,
    pub start_stack: u64,
    pub low_end_straight: bool,
    pub order: Option<Vec<Category>>,
}

impl DealerConfig {
    pub fn big_blind(&self) -> u64 {
        self.blinds.get(1).copied().unwrap_or(0)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, PokerError> {
        let expand_u64 = |v: ScalarOrListValue, len: usize| -> Vec<u64> {
            match v {
                ScalarOrListValue::Scalar(s) => vec![s; len],
                ScalarOrListValue::List(l) => l,
            }
        };

        let blinds = expand_u64(raw.blinds, raw.num_players);
        let antes = expand_u64(raw.antes, raw.num_players);
        let num_community_cards = expand_u64(raw.num_community_cards, raw.num_streets);

        let raise_sizes: Vec<RaiseSize> = match raw.raise_sizes {
            ScalarOrListRaise::Scalar(w) => {
                let resolved = w.resolve()?;
                vec![resolved; raw.num_streets]
            }
            ScalarOrListRaise::List(ws) => {
                ws.iter().map(|w| w.resolve()).collect::<Result<_, _>>()?
            }
        };
        let num_raises: Vec<RaiseCount> = match raw.num_raises {
            ScalarOrListCount::Scalar(w) => {
                let resolved = w.resolve()?;
                vec![resolved; raw.num_streets]
            }
            ScalarOrListCount::List(ws) => {
                ws.iter().map(|w| w.resolve()).collect::<Result<_, _>>()?
            }
        };

        let config = DealerConfig {
            num_players: raw.num_players,
            num_streets: raw.num_streets,
            blinds,
            antes,
            raise_sizes,
            num_raises,
            num_suits: raw.num_suits,
            num_ranks: raw.num_ranks,
            num_hole_cards: raw.num_hole_cards,
            num_community_cards,
            num_cards_for_hand: raw.num_cards_for_hand,
            mandatory_num_hole_cards: raw.mandatory_num_hole_cards,
            start_stack: raw.start_stack,
            low_end_straight: raw.low_end_straight,
            order: raw.order,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PokerError> {
        if self.num_players < 2 {
            return Err(PokerError::InvalidConfig {
                field: "num_players",
                expected: 2,
                found: self.num_players,
            });
        }
        if self.blinds.len() != self.num_players {
            return Err(PokerError::InvalidConfig {
                field: "blinds",
                expected: self.num_players,
                found: self.blinds.len(),
            });
        }
        if self.antes.len() != self.num_players {
            return Err(PokerError::InvalidConfig {
                field: "antes",
                expected: self.num_players,
                found: self.antes.len(),
            });
        }
        if self.raise_sizes.len() != self.num_streets {
            return Err(PokerError::InvalidConfig {
                field: "raise_sizes",
                expected: self.num_streets,
                found: self.raise_sizes.len(),
            });
        }
        if self.num_raises.len() != self.num_streets {
            return Err(PokerError::InvalidConfig {
                field: "num_raises",
                expected: self.num_streets,
                found: self.num_raises.len(),
            });
        }
        if self.num_community_cards.len() != self.num_streets {
            return Err(PokerError::InvalidConfig {
                field: "num_community_cards",
                expected: self.num_streets,
                found: self.num_community_cards.len(),
            });
        }
        if !(1..=4).contains(&self.num_suits) || !(1..=13).contains(&self.num_ranks) {
            return Err(PokerError::InvalidDeckParams {
                num_suits: self.num_suits,
                num_ranks: self.num_ranks,
            });
        }
        if !(1..=5).contains(&self.num_cards_for_hand) {
            return Err(PokerError::InvalidHandSize(self.num_cards_for_hand));
        }
        if self.mandatory_num_hole_cards > self.num_cards_for_hand {
            return Err(PokerError::InvalidConfig {
                field: "mandatory_num_hole_cards",
                expected: self.num_cards_for_hand,
                found: self.mandatory_num_hole_cards,
            });
        }
        if let Some(order) = &self.order {
            crate::evaluate::category::validate_order(order)?;
        }
        Ok(())
    }
}
