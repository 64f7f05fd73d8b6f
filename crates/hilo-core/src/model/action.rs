use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The two guesses available against a dealer card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    High,
    Low,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::High, Action::Low];

    /// Whether `drawn` makes this guess correct against `dealer`. Equal ranks never win.
    pub fn wins(self, dealer: Rank, drawn: Rank) -> bool {
        match self {
            Action::High => drawn > dealer,
            Action::Low => drawn < dealer,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::High => "HIGH",
            Action::Low => "LOW",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
