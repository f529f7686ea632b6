//! Validated rate control configuration.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::constants::{
    DEFAULT_CORE_AUDIO_RATE, DEFAULT_CORE_FRAME_RATE, DEFAULT_DISPLAY_REFRESH_RATE,
    DEFAULT_FEEDBACK_GAIN, DEFAULT_HOST_AUDIO_RATE, DEFAULT_SAFETY_CLAMP,
};

/// Serialized rate control parameters.
///
/// The two overrides are optional here and resolved into explicit fields
/// by [`RateControlConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateControlSettings {
    pub core_audio_rate: f64,
    pub host_audio_rate: f64,
    pub core_frame_rate: f64,
    pub display_refresh_rate: f64,
    /// What the frontend believes the display runs at. Defaults to
    /// `display_refresh_rate`.
    pub measured_display_refresh_rate: Option<f64>,
    /// Rate at which the output device really drains samples. Defaults to
    /// `host_audio_rate`.
    pub actual_consumption_rate: Option<f64>,
    pub feedback_gain: f64,
    pub safety_clamp: f64,
}

impl Default for RateControlSettings {
    fn default() -> Self {
        Self {
            core_audio_rate: DEFAULT_CORE_AUDIO_RATE,
            host_audio_rate: DEFAULT_HOST_AUDIO_RATE,
            core_frame_rate: DEFAULT_CORE_FRAME_RATE,
            display_refresh_rate: DEFAULT_DISPLAY_REFRESH_RATE,
            measured_display_refresh_rate: None,
            actual_consumption_rate: None,
            feedback_gain: DEFAULT_FEEDBACK_GAIN,
            safety_clamp: DEFAULT_SAFETY_CLAMP,
        }
    }
}

/// Immutable per-session rate control configuration.
///
/// Only constructible through [`RateControlConfig::new`], so every instance
/// satisfies: all rates finite and positive, `feedback_gain >= 0`,
/// `0 <= safety_clamp < 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateControlConfig {
    core_audio_rate: f64,
    host_audio_rate: f64,
    core_frame_rate: f64,
    display_refresh_rate: f64,
    measured_display_refresh_rate: f64,
    actual_consumption_rate: f64,
    feedback_gain: f64,
    safety_clamp: f64,
}

impl RateControlConfig {
    /// Validate settings and resolve the optional overrides.
    ///
    /// # Errors
    /// Returns the first invalid field found.
    pub fn new(settings: &RateControlSettings) -> Result<Self, ConfigError> {
        let measured = settings
            .measured_display_refresh_rate
            .unwrap_or(settings.display_refresh_rate);
        let actual = settings
            .actual_consumption_rate
            .unwrap_or(settings.host_audio_rate);

        let config = Self {
            core_audio_rate: positive_rate("core_audio_rate", settings.core_audio_rate)?,
            host_audio_rate: positive_rate("host_audio_rate", settings.host_audio_rate)?,
            core_frame_rate: positive_rate("core_frame_rate", settings.core_frame_rate)?,
            display_refresh_rate: positive_rate(
                "display_refresh_rate",
                settings.display_refresh_rate,
            )?,
            measured_display_refresh_rate: positive_rate(
                "measured_display_refresh_rate",
                measured,
            )?,
            actual_consumption_rate: positive_rate("actual_consumption_rate", actual)?,
            feedback_gain: settings.feedback_gain,
            safety_clamp: settings.safety_clamp,
        };

        if !config.feedback_gain.is_finite() || config.feedback_gain < 0.0 {
            return Err(ConfigError::InvalidFeedbackGain(config.feedback_gain));
        }
        if !config.safety_clamp.is_finite() || !(0.0..1.0).contains(&config.safety_clamp) {
            return Err(ConfigError::InvalidSafetyClamp(config.safety_clamp));
        }

        Ok(config)
    }

    /// Copy of this config with a new measured display rate.
    ///
    /// # Errors
    /// Returns an error if `measured_hz` is not a positive rate.
    pub fn with_measured_display_rate(&self, measured_hz: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            measured_display_refresh_rate: positive_rate(
                "measured_display_refresh_rate",
                measured_hz,
            )?,
            ..*self
        })
    }

    /// Settings that reproduce this config.
    pub fn settings(&self) -> RateControlSettings {
        RateControlSettings {
            core_audio_rate: self.core_audio_rate,
            host_audio_rate: self.host_audio_rate,
            core_frame_rate: self.core_frame_rate,
            display_refresh_rate: self.display_refresh_rate,
            measured_display_refresh_rate: Some(self.measured_display_refresh_rate),
            actual_consumption_rate: Some(self.actual_consumption_rate),
            feedback_gain: self.feedback_gain,
            safety_clamp: self.safety_clamp,
        }
    }

    pub fn core_audio_rate(&self) -> f64 {
        self.core_audio_rate
    }

    pub fn host_audio_rate(&self) -> f64 {
        self.host_audio_rate
    }

    pub fn core_frame_rate(&self) -> f64 {
        self.core_frame_rate
    }

    pub fn display_refresh_rate(&self) -> f64 {
        self.display_refresh_rate
    }

    pub fn measured_display_refresh_rate(&self) -> f64 {
        self.measured_display_refresh_rate
    }

    pub fn actual_consumption_rate(&self) -> f64 {
        self.actual_consumption_rate
    }

    pub fn feedback_gain(&self) -> f64 {
        self.feedback_gain
    }

    pub fn safety_clamp(&self) -> f64 {
        self.safety_clamp
    }

    /// Nominal input samples the core emits per frame (`r`).
    pub fn input_samples_per_frame(&self) -> f64 {
        self.core_audio_rate / self.core_frame_rate
    }

    /// Resampling ratio with no correction applied.
    pub fn base_ratio(&self) -> f64 {
        self.host_audio_rate / self.core_audio_rate
    }

    /// Factor compensating for the display draining at a different cadence
    /// than the core produces, based on the measured display rate.
    pub fn display_correction(&self) -> f64 {
        self.measured_display_refresh_rate / self.core_frame_rate
    }

    /// Output samples the device really drains per display frame.
    pub fn consumed_per_frame(&self) -> f64 {
        self.actual_consumption_rate / self.display_refresh_rate
    }

    /// Inclusive bounds for the final adjustment.
    pub fn adjust_bounds(&self) -> (f64, f64) {
        (1.0 - self.safety_clamp, 1.0 + self.safety_clamp)
    }

    /// Relative difference between the display rate and the core frame rate.
    pub fn display_mismatch(&self) -> f64 {
        (self.display_refresh_rate - self.core_frame_rate) / self.core_frame_rate
    }
}

fn positive_rate(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveRate { name, value })
    }
}
