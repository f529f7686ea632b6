//! Offline simulation harness for the rate controller.
//!
//! Runs the exact per-frame controller math over synthetic frames so that
//! conclusions about convergence carry over to live playback.

use serde::{Deserialize, Serialize};

use super::telemetry::FillTelemetry;
use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_SIMULATION_FRAMES, TARGET_FILL};
use crate::control::{
    BufferState, ConfigError, CorrectionResult, RateControlConfig, RateControlSettings,
    RateController,
};

/// Buffer and run-length parameters for a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub capacity: usize,
    pub frames: usize,
    pub initial_fill: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUFFER_CAPACITY,
            frames: DEFAULT_SIMULATION_FRAMES,
            initial_fill: TARGET_FILL,
        }
    }
}

/// Complete serialized simulation input: controller and run parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationProfile {
    pub rate_control: RateControlSettings,
    pub simulation: SimulationSettings,
}

/// Trajectory and summary of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub initial_fill: f64,
    /// Post-update fill ratio for every frame.
    pub fill_history: Vec<f64>,
    /// Corrected adjustment emitted for every frame.
    pub adjust_history: Vec<f64>,
    pub min_fill: f64,
    pub max_fill: f64,
    pub final_fill: f64,
    pub underrun_frames: usize,
    pub overrun_frames: usize,
    pub longest_saturation_streak: usize,
    pub input_samples_per_frame: f64,
    pub base_ratio: f64,
    pub display_correction: f64,
    pub base_output: f64,
    pub consumed_per_frame: f64,
}

impl SimulationResult {
    /// True when the buffer never touched either bound.
    pub fn stayed_within_bounds(&self) -> bool {
        self.min_fill > 0.0 && self.max_fill < 1.0
    }

    /// Largest distance of any frame's fill from `target`.
    pub fn max_deviation_from(&self, target: f64) -> f64 {
        (self.max_fill - target).abs().max((self.min_fill - target).abs())
    }
}

/// Simulate `settings.frames` frames of rate control.
///
/// # Errors
/// Returns an error if the buffer parameters are invalid.
pub fn simulate(
    config: &RateControlConfig,
    settings: &SimulationSettings,
) -> Result<SimulationResult, ConfigError> {
    simulate_with(config, settings, |_, _| {})
}

/// Simulate and call `on_frame` with each frame index and result.
///
/// # Errors
/// Returns an error if the buffer parameters are invalid.
pub fn simulate_with<F>(
    config: &RateControlConfig,
    settings: &SimulationSettings,
    mut on_frame: F,
) -> Result<SimulationResult, ConfigError>
where
    F: FnMut(usize, &CorrectionResult),
{
    let mut buffer = BufferState::new(settings.capacity, settings.initial_fill)?;
    let controller = RateController::new(*config);
    let mut telemetry = FillTelemetry::new();
    let mut fill_history = Vec::with_capacity(settings.frames);
    let mut adjust_history = Vec::with_capacity(settings.frames);

    for frame in 0..settings.frames {
        let result = controller.step(&mut buffer);
        telemetry.record_correction(&result);
        fill_history.push(result.fill_ratio);
        adjust_history.push(result.corrected_adjust);
        on_frame(frame, &result);
    }

    // Min and max span the starting fill as well as every post-update fill.
    let initial_fill = settings.initial_fill;
    let (min_fill, max_fill, final_fill) = match telemetry.range() {
        Some((min, max, last)) => (min.min(initial_fill), max.max(initial_fill), last),
        None => (initial_fill, initial_fill, initial_fill),
    };

    Ok(SimulationResult {
        initial_fill,
        fill_history,
        adjust_history,
        min_fill,
        max_fill,
        final_fill,
        underrun_frames: telemetry.underrun_frames,
        overrun_frames: telemetry.overrun_frames,
        longest_saturation_streak: telemetry.longest_saturation_streak,
        input_samples_per_frame: config.input_samples_per_frame(),
        base_ratio: config.base_ratio(),
        display_correction: config.display_correction(),
        base_output: config.input_samples_per_frame() * config.base_ratio(),
        consumed_per_frame: config.consumed_per_frame(),
    })
}

/// Validate a profile and simulate it.
///
/// # Errors
/// Returns an error if either the rate control or buffer settings are invalid.
pub fn simulate_profile(profile: &SimulationProfile) -> Result<SimulationResult, ConfigError> {
    let config = RateControlConfig::new(&profile.rate_control)?;
    simulate(&config, &profile.simulation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rate_control: RateControlSettings, simulation: SimulationSettings) -> SimulationResult {
        simulate_profile(&SimulationProfile {
            rate_control,
            simulation,
        })
        .expect("simulate")
    }

    #[test]
    fn matched_clocks_hold_the_setpoint() {
        let result = run(
            RateControlSettings {
                core_frame_rate: 60.0,
                display_refresh_rate: 60.0,
                ..RateControlSettings::default()
            },
            SimulationSettings {
                frames: 2000,
                ..SimulationSettings::default()
            },
        );
        assert_eq!(result.fill_history.len(), 2000);
        assert!(result.max_deviation_from(0.5) < 0.01);
    }

    #[test]
    fn mismatched_display_does_not_saturate() {
        let result = run(
            RateControlSettings::default(),
            SimulationSettings::default(),
        );
        assert_eq!(result.fill_history.len(), 3000);
        assert!(result.fill_history.iter().all(|&fill| fill > 0.0 && fill < 1.0));
        assert!(result.final_fill > 0.0 && result.final_fill < 1.0);
        assert_eq!(result.underrun_frames, 0);
        assert_eq!(result.overrun_frames, 0);
    }

    #[test]
    fn scenario_32040_to_48000_stays_inside_buffer() {
        let result = run(
            RateControlSettings {
                core_audio_rate: 32_040.0,
                host_audio_rate: 48_000.0,
                core_frame_rate: 60.10,
                display_refresh_rate: 59.71,
                feedback_gain: 0.005,
                safety_clamp: 0.05,
                ..RateControlSettings::default()
            },
            SimulationSettings {
                capacity: 4096,
                frames: 3000,
                initial_fill: 0.5,
            },
        );
        assert!(result.final_fill > 0.0 && result.final_fill < 1.0);
        assert!(result.stayed_within_bounds());
    }

    #[test]
    fn off_center_start_recovers_toward_setpoint() {
        let result = run(
            RateControlSettings {
                core_frame_rate: 60.0,
                display_refresh_rate: 60.0,
                feedback_gain: 0.02,
                ..RateControlSettings::default()
            },
            SimulationSettings {
                frames: 3000,
                initial_fill: 0.2,
                ..SimulationSettings::default()
            },
        );
        assert!((result.final_fill - 0.5).abs() < (0.2_f64 - 0.5).abs());
        assert!(result.stayed_within_bounds());
    }

    #[test]
    fn min_and_max_include_initial_fill() {
        let result = run(
            RateControlSettings {
                core_frame_rate: 60.0,
                display_refresh_rate: 60.0,
                feedback_gain: 0.02,
                ..RateControlSettings::default()
            },
            SimulationSettings {
                frames: 200,
                initial_fill: 0.2,
                ..SimulationSettings::default()
            },
        );
        // Fill only rises from a low start, so the first history entry is
        // already above the starting point.
        assert!(result.fill_history[0] > 0.2);
        assert_eq!(result.min_fill, 0.2);
        assert!(result.max_fill <= 0.5);
    }

    #[test]
    fn wrong_display_belief_underruns() {
        let result = run(
            RateControlSettings {
                measured_display_refresh_rate: Some(60.10),
                ..RateControlSettings::default()
            },
            SimulationSettings::default(),
        );
        assert_eq!(result.final_fill, 0.0);
        assert!(result.underrun_frames > 0);
        assert!(result.longest_saturation_streak > 100);
    }

    #[test]
    fn adjust_history_stays_within_clamp() {
        let result = run(
            RateControlSettings {
                core_frame_rate: 50.0,
                display_refresh_rate: 60.0,
                ..RateControlSettings::default()
            },
            SimulationSettings::default(),
        );
        assert!(result
            .adjust_history
            .iter()
            .all(|&adjust| (0.95..=1.05).contains(&adjust)));
    }

    #[test]
    fn zero_frames_reports_initial_fill() {
        let result = run(
            RateControlSettings::default(),
            SimulationSettings {
                frames: 0,
                initial_fill: 0.3,
                ..SimulationSettings::default()
            },
        );
        assert!(result.fill_history.is_empty());
        assert_eq!(result.final_fill, 0.3);
        assert_eq!(result.min_fill, 0.3);
    }

    #[test]
    fn rejects_invalid_buffer() {
        let profile = SimulationProfile {
            simulation: SimulationSettings {
                capacity: 0,
                ..SimulationSettings::default()
            },
            ..SimulationProfile::default()
        };
        assert_eq!(simulate_profile(&profile), Err(ConfigError::InvalidCapacity));
    }

    #[test]
    fn frame_callback_sees_every_frame() {
        let config = RateControlConfig::new(&RateControlSettings::default()).expect("config");
        let mut seen = 0;
        let result = simulate_with(
            &config,
            &SimulationSettings {
                frames: 10,
                ..SimulationSettings::default()
            },
            |frame, step| {
                assert_eq!(frame, seen);
                assert!(step.fill_ratio > 0.0);
                seen += 1;
            },
        )
        .expect("simulate");
        assert_eq!(seen, 10);
        assert_eq!(result.adjust_history.len(), 10);
    }

    #[test]
    fn profile_deserializes_partial_json() {
        let json = r#"{"simulation":{"frames":500},"rate_control":{"feedback_gain":0.01}}"#;
        let profile: SimulationProfile = serde_json::from_str(json).expect("deserialize");
        assert_eq!(profile.simulation.frames, 500);
        assert_eq!(profile.simulation.capacity, 4096);
        assert_eq!(profile.rate_control.feedback_gain, 0.01);
    }
}
