use hilo_core::game::settings::Mode;
use serde::{Deserialize, Serialize};

/// Share of the pot paid out when cashing out before a hand.
pub const CASH_OUT_BASELINE: f64 = 0.5;

/// Cash-out hint for the current hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub message: String,
    pub ev_factor: f64,
    pub cash_out: bool,
    /// Pot expected after playing the hand.
    pub expected_pot: f64,
    /// Pot banked by cashing out instead.
    pub cash_out_value: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitModel;

impl ProfitModel {
    /// Compares the expected pot factor of playing on against the half-cash baseline.
    ///
    /// Returns `None` outside profit mode or while the modifier or pot is unknown.
    pub fn hint(
        p_win: f64,
        p_tie: f64,
        modifier: Option<f64>,
        pot: Option<f64>,
        tie_is_push: bool,
        mode: Mode,
    ) -> Option<Advisory> {
        if mode != Mode::Profit {
            return None;
        }
        let (modifier, pot) = (modifier?, pot?);
        let push = if tie_is_push { p_tie } else { 0.0 };
        let ev_factor = p_win * (1.0 + modifier) + push;
        let cash_out = ev_factor < CASH_OUT_BASELINE;
        let message = if cash_out {
            format!(
                "Cash out: playing returns {:.2}x the pot, half-cash returns {:.2}x",
                ev_factor, CASH_OUT_BASELINE
            )
        } else {
            format!("Keep playing: expected {:.2}x the pot", ev_factor)
        };
        Some(Advisory {
            message,
            ev_factor,
            cash_out,
            expected_pot: pot * ev_factor,
            cash_out_value: pot * CASH_OUT_BASELINE,
        })
    }
}
