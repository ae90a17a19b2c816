//! Comparison engine
//!
//! Only the winning role and its address leave this module; the values and
//! their margin do not.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Address, InputValue, PartyRole};

/// What to do when both inputs are equal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// No winner; the comparison fails
    #[default]
    Reject,
    /// Role A wins ties
    FavorA,
    /// Role B wins ties
    FavorB,
}

impl From<&str> for TieBreak {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "favor_a" | "a" => Self::FavorA,
            "favor_b" | "b" => Self::FavorB,
            _ => Self::Reject,
        }
    }
}

/// Role owning the strictly larger value
///
/// Equal values are resolved by `tie_break`; `None` only under
/// [`TieBreak::Reject`].
pub fn compare(a: InputValue, b: InputValue, tie_break: TieBreak) -> Option<PartyRole> {
    match a.cmp(&b) {
        Ordering::Greater => Some(PartyRole::A),
        Ordering::Less => Some(PartyRole::B),
        Ordering::Equal => match tie_break {
            TieBreak::Reject => None,
            TieBreak::FavorA => Some(PartyRole::A),
            TieBreak::FavorB => Some(PartyRole::B),
        },
    }
}

/// Disclosed outcome of a comparison
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub winner_role: PartyRole,
    pub winner_address: Address,
}
