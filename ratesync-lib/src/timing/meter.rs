//! Display refresh rate measurement from vsync timestamps.

use crate::constants::{VSYNC_EMA_ALPHA, VSYNC_MAX_HZ, VSYNC_MIN_HZ, VSYNC_WARMUP_SAMPLES};

/// Exponential moving average of the observed vsync rate.
///
/// Intervals implying a rate outside `[VSYNC_MIN_HZ, VSYNC_MAX_HZ]` are
/// treated as dropped frames or early presents and ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayRateMeter {
    last_vsync_us: Option<u64>,
    average_hz: Option<f64>,
    samples: u32,
}

/// What happened to a recorded vsync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsyncSample {
    /// First timestamp; nothing to measure yet.
    First,
    /// Interval folded into the average.
    Accepted,
    /// Zero or negative interval, or an implausible rate.
    Rejected,
}

impl DisplayRateMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vsync at `timestamp_us` microseconds.
    pub fn record_vsync(&mut self, timestamp_us: u64) -> VsyncSample {
        let Some(last) = self.last_vsync_us.replace(timestamp_us) else {
            return VsyncSample::First;
        };
        if timestamp_us <= last {
            return VsyncSample::Rejected;
        }

        let interval = (timestamp_us - last) as f64 / 1_000_000.0;
        let hz = 1.0 / interval;
        if !(VSYNC_MIN_HZ..=VSYNC_MAX_HZ).contains(&hz) {
            return VsyncSample::Rejected;
        }

        self.average_hz = Some(match self.average_hz {
            Some(average) => average * (1.0 - VSYNC_EMA_ALPHA) + hz * VSYNC_EMA_ALPHA,
            None => hz,
        });
        self.samples = self.samples.saturating_add(1);
        VsyncSample::Accepted
    }

    /// Accepted samples so far.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// True once enough samples were accepted to trust the average.
    pub fn is_stable(&self) -> bool {
        self.samples >= VSYNC_WARMUP_SAMPLES
    }

    /// Current average, even before it is stable.
    pub fn current_hz(&self) -> Option<f64> {
        self.average_hz
    }

    /// Measured rate, only once stable.
    pub fn measured_hz(&self) -> Option<f64> {
        if self.is_stable() {
            self.average_hz
        } else {
            None
        }
    }

    /// Forget all measurements.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
