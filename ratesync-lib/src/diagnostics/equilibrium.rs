//! Closed-form steady-state check for a rate control configuration.

use serde::Serialize;

use crate::control::RateControlConfig;

const REACH_EPSILON: f64 = 1e-12;

/// Steady-state analysis of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquilibriumReport {
    /// Adjustment at which production exactly matches consumption.
    pub required_adjust: f64,
    /// Smallest adjustment the law can emit (empty buffer), after clamping.
    pub achievable_min: f64,
    /// Largest adjustment the law can emit (full buffer), after clamping.
    pub achievable_max: f64,
    /// Whether `required_adjust` lies within the achievable range.
    pub reachable: bool,
    /// Fill ratio the loop settles at, when reachable with a non-zero gain.
    pub equilibrium_fill: Option<f64>,
    /// Net samples per frame once the adjust is pinned at the nearest
    /// achievable bound, when unreachable. Negative drains the buffer.
    pub drift_per_frame: Option<f64>,
}

/// Net samples per frame when the controller emits `adjust`.
///
/// Positive means the buffer grows.
pub fn drift_at(config: &RateControlConfig, adjust: f64) -> f64 {
    config.input_samples_per_frame() * config.base_ratio() / adjust - config.consumed_per_frame()
}

/// Check whether the loop can reach steady state under `config`.
///
/// An unreachable equilibrium means fill will drift monotonically until the
/// buffer saturates: the clock mismatch exceeds what the gain and clamp can
/// absorb.
pub fn analyze_equilibrium(config: &RateControlConfig) -> EquilibriumReport {
    let base_output = config.input_samples_per_frame() * config.base_ratio();
    let required_adjust = base_output / config.consumed_per_frame();

    let gain = config.feedback_gain();
    let correction = config.display_correction();
    let (lower, upper) = config.adjust_bounds();
    let achievable_min = (correction * (1.0 - gain)).clamp(lower, upper);
    let achievable_max = (correction * (1.0 + gain)).clamp(lower, upper);

    let reachable = required_adjust >= achievable_min - REACH_EPSILON
        && required_adjust <= achievable_max + REACH_EPSILON;

    let equilibrium_fill = if reachable && gain > 0.0 {
        let rate_adjust = required_adjust / correction;
        Some(((1.0 - (1.0 - rate_adjust) / gain) / 2.0).clamp(0.0, 1.0))
    } else {
        None
    };

    let drift_per_frame = if reachable {
        None
    } else if required_adjust < achievable_min {
        Some(drift_at(config, achievable_min))
    } else {
        Some(drift_at(config, achievable_max))
    };

    EquilibriumReport {
        required_adjust,
        achievable_min,
        achievable_max,
        reachable,
        equilibrium_fill,
        drift_per_frame,
    }
}
