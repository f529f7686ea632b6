//! Synthetic vsync timestamps for exercising the display rate meter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Shape of a synthetic vsync timestamp stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VsyncSettings {
    /// True refresh rate of the simulated display.
    pub refresh_hz: f64,
    /// Number of timestamps to generate.
    pub samples: usize,
    /// Maximum absolute timing jitter per vsync, in microseconds.
    pub jitter_us: f64,
    /// Probability that a vsync is missed and the interval doubles.
    pub drop_probability: f64,
    pub seed: u64,
}

impl Default for VsyncSettings {
    fn default() -> Self {
        Self {
            refresh_hz: 59.71,
            samples: 600,
            jitter_us: 250.0,
            drop_probability: 0.01,
            seed: 0x5eed,
        }
    }
}

/// Generate monotonically increasing vsync timestamps in microseconds.
///
/// Jitter is applied to each vsync's ideal position, not accumulated, so the
/// long-run average matches `refresh_hz`.
pub fn synthetic_vsync_timestamps(settings: &VsyncSettings) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let period_us = 1_000_000.0 / settings.refresh_hz.max(f64::MIN_POSITIVE);
    let jitter = settings.jitter_us.abs().min(period_us * 0.25);
    let drop_probability = settings.drop_probability.clamp(0.0, 1.0);

    let mut timestamps = Vec::with_capacity(settings.samples);
    let mut slot = 1_u64;
    let mut last = 0_u64;

    while timestamps.len() < settings.samples {
        if drop_probability > 0.0 && rng.gen_bool(drop_probability) {
            slot += 1;
        }
        let offset = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        let ideal = slot as f64 * period_us + offset;
        let timestamp = (ideal.max(0.0) as u64).max(last.saturating_add(1));
        timestamps.push(timestamp);
        last = timestamp;
        slot += 1;
    }

    timestamps
}
