//! Runtime choice between audio-clock and vsync timing.
//!
//! Sessions start on the audio clock, which works on any display. Once the
//! display rate has been measured, and it sits within tolerance of the
//! core's frame rate, timing switches to vsync with light rate control.
//! A display that later drifts out of tolerance falls back to the audio
//! clock.

use serde::Serialize;

use super::meter::{DisplayRateMeter, VsyncSample};
use crate::constants::{FALLBACK_DISPLAY_HZ, SYNC_MODE_TOLERANCE, VSYNC_DRIFT_CHECK_INTERVAL};

/// Which clock paces the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncMode {
    /// Blocking audio writes provide backpressure; no rate control.
    AudioClock,
    /// Display vsync paces frames; rate control keeps the buffer centered.
    Vsync,
}

impl SyncMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AudioClock => "Audio Clock",
            Self::Vsync => "Vsync",
        }
    }
}

/// A mode change caused by a vsync measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyncTransition {
    pub from: SyncMode,
    pub to: SyncMode,
    pub measured_hz: f64,
}

/// Sync mode state machine fed by vsync timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncManager {
    mode: SyncMode,
    game_fps: f64,
    display_hz: f64,
    meter: DisplayRateMeter,
    measurement_stable: bool,
    frames_since_drift_check: u32,
}

impl SyncManager {
    /// Start in audio-clock mode for the given core and reported display rates.
    pub fn new(game_fps: f64, display_hz: f64) -> Self {
        let display_hz = if display_hz > 0.0 {
            display_hz
        } else {
            FALLBACK_DISPLAY_HZ
        };
        let manager = Self {
            mode: SyncMode::AudioClock,
            game_fps,
            display_hz,
            meter: DisplayRateMeter::new(),
            measurement_stable: false,
            frames_since_drift_check: 0,
        };
        log::info!(
            "sync: starting in {} mode ({:.2}fps @ {:.1}Hz reported)",
            manager.mode.name(),
            game_fps,
            display_hz
        );
        manager
    }

    /// Record a vsync and switch modes if the measurement calls for it.
    pub fn record_vsync(&mut self, timestamp_us: u64) -> Option<SyncTransition> {
        if self.meter.record_vsync(timestamp_us) != VsyncSample::Accepted {
            return None;
        }
        let measured = self.meter.current_hz()?;
        let mut transition = None;

        if !self.measurement_stable && self.meter.is_stable() {
            self.measurement_stable = true;
            log::info!(
                "sync: measurement stable after {} samples: {:.3}Hz (reported {:.1}Hz, diff {:.2}%)",
                self.meter.samples(),
                measured,
                self.display_hz,
                (measured - self.display_hz).abs() / self.display_hz * 100.0
            );

            let mismatch = self.mismatch(measured);
            if mismatch < SYNC_MODE_TOLERANCE {
                transition = Some(self.switch_to(SyncMode::Vsync, measured));
            } else {
                log::info!(
                    "sync: staying in {} mode ({:.3}Hz differs by {:.2}% from {:.2}fps)",
                    self.mode.name(),
                    measured,
                    mismatch * 100.0,
                    self.game_fps
                );
            }
        }

        if self.measurement_stable && self.mode == SyncMode::Vsync {
            self.frames_since_drift_check += 1;
            if self.frames_since_drift_check >= VSYNC_DRIFT_CHECK_INTERVAL {
                self.frames_since_drift_check = 0;
                let mismatch = self.mismatch(measured);
                if mismatch >= SYNC_MODE_TOLERANCE {
                    log::warn!(
                        "sync: drift detected, {:.3}Hz now differs by {:.2}% from {:.2}fps",
                        measured,
                        mismatch * 100.0,
                        self.game_fps
                    );
                    return Some(self.switch_to(SyncMode::AudioClock, measured));
                }
            }
        }

        transition
    }

    fn mismatch(&self, measured_hz: f64) -> f64 {
        (measured_hz - self.game_fps).abs() / self.game_fps
    }

    fn switch_to(&mut self, mode: SyncMode, measured_hz: f64) -> SyncTransition {
        let transition = SyncTransition {
            from: self.mode,
            to: mode,
            measured_hz,
        };
        self.mode = mode;
        log::info!(
            "sync: switching to {} mode at {:.3}Hz",
            mode.name(),
            measured_hz
        );
        transition
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn game_fps(&self) -> f64 {
        self.game_fps
    }

    /// Reported display rate, after the fallback for non-positive input.
    pub fn display_hz(&self) -> f64 {
        self.display_hz
    }

    /// Measured display rate, once stable.
    pub fn measured_hz(&self) -> Option<f64> {
        self.meter.measured_hz()
    }

    pub fn is_measurement_stable(&self) -> bool {
        self.measurement_stable
    }

    /// The core runs every frame in both modes.
    pub fn should_run_core(&self) -> bool {
        true
    }

    pub fn should_use_rate_control(&self) -> bool {
        self.mode == SyncMode::Vsync
    }

    pub fn should_block_audio(&self) -> bool {
        self.mode == SyncMode::AudioClock
    }
}
