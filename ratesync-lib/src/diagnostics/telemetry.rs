//! Rolling fill statistics for detecting drift and saturation.

use serde::Serialize;

use crate::control::{CorrectionResult, Saturation};

/// Fill ratio statistics over a diagnostic window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillTelemetry {
    pub frames: usize,
    pub min_fill: f64,
    pub max_fill: f64,
    pub last_fill: f64,
    pub underrun_frames: usize,
    pub overrun_frames: usize,
    pub current_saturation_streak: usize,
    pub longest_saturation_streak: usize,
}

impl Default for FillTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl FillTelemetry {
    pub fn new() -> Self {
        Self {
            frames: 0,
            min_fill: f64::INFINITY,
            max_fill: f64::NEG_INFINITY,
            last_fill: 0.0,
            underrun_frames: 0,
            overrun_frames: 0,
            current_saturation_streak: 0,
            longest_saturation_streak: 0,
        }
    }

    /// Record one frame's fill ratio and saturation state.
    pub fn record(&mut self, fill: f64, saturation: Option<Saturation>) {
        self.frames += 1;
        self.min_fill = self.min_fill.min(fill);
        self.max_fill = self.max_fill.max(fill);
        self.last_fill = fill;

        match saturation {
            Some(Saturation::Underrun) => self.underrun_frames += 1,
            Some(Saturation::Overrun) => self.overrun_frames += 1,
            None => {}
        }

        if saturation.is_some() {
            self.current_saturation_streak += 1;
            self.longest_saturation_streak = self
                .longest_saturation_streak
                .max(self.current_saturation_streak);
        } else {
            self.current_saturation_streak = 0;
        }
    }

    /// Record a controller step.
    pub fn record_correction(&mut self, result: &CorrectionResult) {
        self.record(result.fill_ratio, result.saturation);
    }

    /// True if any frame in the window saturated.
    pub fn saturated(&self) -> bool {
        self.underrun_frames > 0 || self.overrun_frames > 0
    }

    /// `(min, max, last)` fill, or `None` before the first frame.
    pub fn range(&self) -> Option<(f64, f64, f64)> {
        if self.frames == 0 {
            None
        } else {
            Some((self.min_fill, self.max_fill, self.last_fill))
        }
    }

    /// Start a new diagnostic window.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_has_no_range() {
        let telemetry = FillTelemetry::new();
        assert_eq!(telemetry.range(), None);
        assert!(!telemetry.saturated());
    }

    #[test]
    fn tracks_min_max_and_last() {
        let mut telemetry = FillTelemetry::new();
        for fill in [0.5, 0.42, 0.61, 0.55] {
            telemetry.record(fill, None);
        }
        assert_eq!(telemetry.range(), Some((0.42, 0.61, 0.55)));
        assert_eq!(telemetry.frames, 4);
    }

    #[test]
    fn counts_saturation_streaks() {
        let mut telemetry = FillTelemetry::new();
        telemetry.record(0.0, Some(Saturation::Underrun));
        telemetry.record(0.0, Some(Saturation::Underrun));
        telemetry.record(0.01, None);
        telemetry.record(1.0, Some(Saturation::Overrun));
        assert_eq!(telemetry.underrun_frames, 2);
        assert_eq!(telemetry.overrun_frames, 1);
        assert_eq!(telemetry.longest_saturation_streak, 2);
        assert_eq!(telemetry.current_saturation_streak, 1);
        assert!(telemetry.saturated());
    }

    #[test]
    fn reset_clears_window() {
        let mut telemetry = FillTelemetry::new();
        telemetry.record(1.0, Some(Saturation::Overrun));
        telemetry.reset();
        assert_eq!(telemetry, FillTelemetry::new());
    }
}
