//! Stagnation and stability tracking for the generation controller.
//!
//! Two counters run side by side:
//!
//! - `without_improvement`: consecutive generations whose best fitness did
//!   not strictly increase. Drives termination.
//! - `under_threshold`: consecutive generations whose improvement stayed
//!   below `improvement_epsilon`. Drives rate bumps and the stable state.

use serde::{Deserialize, Serialize};

use super::config::AdaptiveConfig;

/// Live operator rates, adjusted while the run stalls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorRates {
    pub low_mutation: f64,
    pub high_mutation: f64,
    pub crossover: f64,
}

impl OperatorRates {
    /// Raises every rate by its configured bump, clamped to 1.0.
    pub fn bump(&mut self, adaptation: &AdaptiveConfig) {
        self.low_mutation = (self.low_mutation + adaptation.low_mutation_bump).min(1.0);
        self.high_mutation = (self.high_mutation + adaptation.high_mutation_bump).min(1.0);
        self.crossover = (self.crossover + adaptation.crossover_bump).min(1.0);
    }
}

/// What changed during one [`StabilityTracker::observe`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StabilityUpdate {
    /// Best fitness strictly increased.
    pub improved: bool,
    /// The stall reached `rate_bump_after`; rates should be raised.
    pub bump_rates: bool,
    /// The tracker entered the stable state.
    pub became_stable: bool,
    /// The tracker left the stable state.
    pub left_stable: bool,
}

/// Exploring/stable state machine.
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    epsilon: f64,
    window: usize,
    bump_after: usize,
    under_threshold: usize,
    without_improvement: usize,
    stable: bool,
}

impl StabilityTracker {
    /// Creates a tracker in the exploring state.
    pub fn new(adaptation: &AdaptiveConfig) -> Self {
        Self {
            epsilon: adaptation.improvement_epsilon,
            window: adaptation.stability_window,
            bump_after: adaptation.rate_bump_after,
            under_threshold: 0,
            without_improvement: 0,
            stable: false,
        }
    }

    /// Records one generation's best fitness before and after.
    pub fn observe(&mut self, before: f64, after: f64) -> StabilityUpdate {
        let was_stable = self.stable;
        let mut update = StabilityUpdate::default();

        if after <= before {
            self.without_improvement += 1;
        } else {
            self.without_improvement = 0;
            self.stable = false;
            update.improved = true;
        }

        if after - before < self.epsilon {
            self.under_threshold += 1;
            if self.under_threshold == self.bump_after {
                update.bump_rates = true;
            }
            if self.under_threshold == self.window {
                self.stable = true;
                self.under_threshold = 0;
            }
        } else {
            self.under_threshold = 0;
            self.stable = false;
        }

        update.became_stable = !was_stable && self.stable;
        update.left_stable = was_stable && !self.stable;
        update
    }

    /// Whether the search is in the stable state.
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// Consecutive generations without strict improvement.
    pub fn without_improvement(&self) -> usize {
        self.without_improvement
    }

    /// Consecutive generations below the improvement threshold.
    pub fn under_threshold(&self) -> usize {
        self.under_threshold
    }
}
