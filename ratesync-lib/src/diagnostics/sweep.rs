//! Parameter sweeps over the simulation harness.

use super::simulation::{simulate, SimulationResult, SimulationSettings};
use crate::control::{ConfigError, RateControlConfig, RateControlSettings};

/// Simulate the same scenario once per feedback gain.
///
/// # Errors
/// Returns an error if any gain produces an invalid configuration.
pub fn sweep_feedback_gain(
    base: &RateControlSettings,
    simulation: &SimulationSettings,
    gains: &[f64],
) -> Result<Vec<(f64, SimulationResult)>, ConfigError> {
    let mut results = Vec::with_capacity(gains.len());
    for &feedback_gain in gains {
        let settings = RateControlSettings {
            feedback_gain,
            ..base.clone()
        };
        let config = RateControlConfig::new(&settings)?;
        results.push((feedback_gain, simulate(&config, simulation)?));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_result_per_gain_in_order() {
        let gains = [0.002, 0.005, 0.01];
        let results = sweep_feedback_gain(
            &RateControlSettings::default(),
            &SimulationSettings {
                frames: 200,
                ..SimulationSettings::default()
            },
            &gains,
        )
        .expect("sweep");
        let swept: Vec<f64> = results.iter().map(|(gain, _)| *gain).collect();
        assert_eq!(swept, gains);
        assert!(results.iter().all(|(_, result)| result.fill_history.len() == 200));
    }

    #[test]
    fn larger_gain_tolerates_wrong_display_belief() {
        let base = RateControlSettings {
            measured_display_refresh_rate: Some(60.10),
            ..RateControlSettings::default()
        };
        let results =
            sweep_feedback_gain(&base, &SimulationSettings::default(), &[0.005, 0.02])
                .expect("sweep");
        assert_eq!(results[0].1.final_fill, 0.0);
        assert!(results[1].1.stayed_within_bounds());
    }

    #[test]
    fn invalid_gain_fails_the_sweep() {
        let result = sweep_feedback_gain(
            &RateControlSettings::default(),
            &SimulationSettings::default(),
            &[0.005, -1.0],
        );
        assert_eq!(result.unwrap_err(), ConfigError::InvalidFeedbackGain(-1.0));
    }
}
