//! Routing configuration shared by the search and courier layers.

use crate::{CoreError, CoreResult};

/// Knobs for path search and courier tour planning.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed down to the planners.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Seconds added whenever consecutive segments belong to different
    /// streets.  Default: 15.
    pub turn_penalty_secs: f64,

    /// How many adjacent stop pairs, counted back from the end of a courier
    /// tour, the tail-swap improvement may try.  0 disables it.  Default: 3.
    pub tail_swap_window: usize,

    /// Build the courier path matrix with one Rayon task per point of
    /// interest.  Only honoured when `sm-courier` is built with `parallel`.
    pub parallel_matrix: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            turn_penalty_secs: 15.0,
            tail_swap_window: 3,
            parallel_matrix: false,
        }
    }
}

impl RoutingConfig {
    pub fn with_turn_penalty(turn_penalty_secs: f64) -> Self {
        Self { turn_penalty_secs, ..Self::default() }
    }

    /// Reject values that would break the search's cost ordering.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.turn_penalty_secs.is_finite() || self.turn_penalty_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "turn_penalty_secs must be a finite, non-negative number of seconds (got {})",
                self.turn_penalty_secs
            )));
        }
        Ok(())
    }
}
