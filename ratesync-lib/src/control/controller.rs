//! Per-frame rate control law.
//!
//! Each frame the controller reads the buffer fill, derives a proportional
//! correction around the 50% setpoint, compensates for the display draining
//! at a different cadence than the core produces, clamps the result and
//! feeds the frame's produced/consumed sample counts back into the buffer.

use serde::Serialize;

use super::{BufferState, RateControlConfig, Saturation};

/// Outcome of one controller step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectionResult {
    /// Clamped adjustment handed to the resampler for this frame.
    pub corrected_adjust: f64,
    /// Buffer fill ratio after this frame's update.
    pub fill_ratio: f64,
    /// Output samples produced this frame.
    pub produced: f64,
    /// Output samples consumed this frame.
    pub consumed: f64,
    /// Set when the update pinned the buffer to a bound.
    pub saturation: Option<Saturation>,
}

/// Proportional feedback law: `1 - (1 - 2*fill) * gain`.
///
/// Below the setpoint the result drops under 1.0, and since production is
/// divided by it the core's output gets stretched to refill the buffer.
pub fn rate_adjust(fill: f64, feedback_gain: f64) -> f64 {
    1.0 - (1.0 - 2.0 * fill) * feedback_gain
}

/// Run one frame of rate control against `buffer`.
///
/// `produced_input_samples` is the number of core samples emitted this frame;
/// callers without a live measurement pass
/// [`RateControlConfig::input_samples_per_frame`]. A negative or non-finite
/// count is treated as zero.
pub fn compute_and_apply_correction(
    buffer: &mut BufferState,
    config: &RateControlConfig,
    produced_input_samples: f64,
) -> CorrectionResult {
    let fill = buffer.read_fill_ratio();
    let adjust = rate_adjust(fill, config.feedback_gain());

    let (lower, upper) = config.adjust_bounds();
    let corrected_adjust = (adjust * config.display_correction()).clamp(lower, upper);

    let input = if produced_input_samples.is_finite() {
        produced_input_samples.max(0.0)
    } else {
        log::debug!("rate control: ignoring produced input {}", produced_input_samples);
        0.0
    };
    let produced = input * config.base_ratio() / corrected_adjust;
    let consumed = config.consumed_per_frame();
    let saturation = buffer.apply(produced, consumed);

    if let Some(event) = saturation {
        log::debug!(
            "rate control: buffer {:?} (fill {:.3} -> {:.3}, adjust {:.5})",
            event,
            fill,
            buffer.read_fill_ratio(),
            corrected_adjust
        );
    }

    CorrectionResult {
        corrected_adjust,
        fill_ratio: buffer.read_fill_ratio(),
        produced,
        consumed,
        saturation,
    }
}

/// Rate controller bound to one session's configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateController {
    config: RateControlConfig,
}

impl RateController {
    pub fn new(config: RateControlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RateControlConfig {
        &self.config
    }

    /// Replace the configuration, e.g. after a new display measurement.
    pub fn set_config(&mut self, config: RateControlConfig) {
        self.config = config;
    }

    /// Feedback term for the given fill ratio under this config.
    pub fn rate_adjust(&self, fill: f64) -> f64 {
        rate_adjust(fill, self.config.feedback_gain())
    }

    /// Run one frame assuming the core produced its nominal sample count.
    pub fn step(&self, buffer: &mut BufferState) -> CorrectionResult {
        self.step_with_input(buffer, self.config.input_samples_per_frame())
    }

    /// Run one frame with an explicit produced-input sample count.
    pub fn step_with_input(
        &self,
        buffer: &mut BufferState,
        produced_input_samples: f64,
    ) -> CorrectionResult {
        compute_and_apply_correction(buffer, &self.config, produced_input_samples)
    }
}
