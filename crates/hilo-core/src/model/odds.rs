//! Exact win/tie probabilities derived from the remaining counts.

use crate::model::action::Action;
use serde::{Deserialize, Serialize};

/// Remaining cards split around a reference rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub lower: u32,
    pub higher: u32,
    pub equal: u32,
    pub total: u32,
}

impl Partition {
    pub const fn new(lower: u32, higher: u32, equal: u32) -> Self {
        Self {
            lower,
            higher,
            equal,
            total: lower + higher + equal,
        }
    }

    /// Cards that would make `action` correct.
    pub const fn winners(&self, action: Action) -> u32 {
        match action {
            Action::High => self.higher,
            Action::Low => self.lower,
        }
    }

    /// Compact `L:24 H:24` label for overlays.
    pub fn label(&self) -> String {
        format!("L:{} H:{}", self.lower, self.higher)
    }
}

/// Immediate probabilities for the next card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Odds {
    pub p_high: f64,
    pub p_low: f64,
    pub p_tie: f64,
}

impl Odds {
    pub const ZERO: Odds = Odds {
        p_high: 0.0,
        p_low: 0.0,
        p_tie: 0.0,
    };

    /// Evaluates a partition. An empty partition yields all zeros.
    pub fn evaluate(partition: Partition) -> Self {
        if partition.total == 0 {
            return Self::ZERO;
        }
        let total = partition.total as f64;
        Self {
            p_high: partition.higher as f64 / total,
            p_low: partition.lower as f64 / total,
            p_tie: partition.equal as f64 / total,
        }
    }

    pub fn p_win(&self, action: Action) -> f64 {
        match action {
            Action::High => self.p_high,
            Action::Low => self.p_low,
        }
    }

    pub fn edge(&self) -> f64 {
        (self.p_high - self.p_low).abs()
    }

    pub fn best(&self) -> f64 {
        self.p_high.max(self.p_low)
    }

    /// The strictly more likely guess, or `None` on an exact tie.
    pub fn favoured(&self) -> Option<Action> {
        if self.p_high > self.p_low {
            Some(Action::High)
        } else if self.p_low > self.p_high {
            Some(Action::Low)
        } else {
            None
        }
    }

    pub fn is_tied(&self) -> bool {
        self.p_high == self.p_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_partition_yields_zero_odds() {
        let odds = Odds::evaluate(Partition::new(0, 0, 0));
        assert_eq!(odds, Odds::ZERO);
        assert_eq!(odds.edge(), 0.0);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let odds = Odds::evaluate(Partition::new(17, 21, 3));
        let sum = odds.p_high + odds.p_low + odds.p_tie;
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(odds.favoured(), Some(Action::High));
    }

    #[test]
    fn ace_dealer_partition_favours_low() {
        let partition = Partition::new(48, 0, 3);
        assert_eq!(partition.total, 51);
        let odds = Odds::evaluate(partition);
        assert_eq!(odds.p_high, 0.0);
        assert!((odds.p_low - 48.0 / 51.0).abs() < 1e-12);
        assert_eq!(odds.favoured(), Some(Action::Low));
    }

    #[test]
    fn balanced_partition_is_tied() {
        let odds = Odds::evaluate(Partition::new(24, 24, 3));
        assert!(odds.is_tied());
        assert_eq!(odds.favoured(), None);
        assert_eq!(Partition::new(24, 24, 3).label(), "L:24 H:24");
    }
}
