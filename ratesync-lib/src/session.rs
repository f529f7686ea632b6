//! One playback session's rate control state.

use crate::control::{BufferState, ConfigError, CorrectionResult, RateControlConfig, RateController};
use crate::diagnostics::equilibrium::{analyze_equilibrium, EquilibriumReport};
use crate::diagnostics::telemetry::FillTelemetry;
use crate::timing::{SyncManager, SyncMode, SyncTransition};

/// Owns the buffer counter, controller, sync mode and telemetry for a
/// session. Driven once per frame from the frame pacing loop.
#[derive(Debug, Clone)]
pub struct SyncSession {
    buffer: BufferState,
    controller: RateController,
    sync: SyncManager,
    telemetry: FillTelemetry,
}

impl SyncSession {
    /// Start a session with the buffer at `initial_fill`.
    ///
    /// # Errors
    /// Returns an error if the buffer parameters are invalid.
    pub fn new(
        config: RateControlConfig,
        capacity: usize,
        initial_fill: f64,
    ) -> Result<Self, ConfigError> {
        let buffer = BufferState::new(capacity, initial_fill)?;
        let sync = SyncManager::new(config.core_frame_rate(), config.display_refresh_rate());
        let session = Self {
            buffer,
            controller: RateController::new(config),
            sync,
            telemetry: FillTelemetry::new(),
        };
        session.log_equilibrium();
        Ok(session)
    }

    /// Record a vsync timestamp (microseconds).
    ///
    /// When the display measurement first becomes stable the controller
    /// adopts the measured rate for its display correction.
    pub fn record_vsync(&mut self, timestamp_us: u64) -> Option<SyncTransition> {
        let was_stable = self.sync.is_measurement_stable();
        let transition = self.sync.record_vsync(timestamp_us);

        if !was_stable && self.sync.is_measurement_stable() {
            if let Some(measured) = self.sync.measured_hz() {
                match self.controller.config().with_measured_display_rate(measured) {
                    Ok(config) => {
                        self.controller.set_config(config);
                        self.log_equilibrium();
                    }
                    Err(err) => log::warn!("session: ignoring measured display rate: {}", err),
                }
            }
        }

        transition
    }

    /// Run rate control for one frame.
    ///
    /// Returns `None` in audio-clock mode, where blocking writes pace the
    /// loop and the resampler runs at its nominal ratio.
    pub fn frame(&mut self, produced_input_samples: f64) -> Option<CorrectionResult> {
        if !self.sync.should_use_rate_control() {
            return None;
        }
        let result = self
            .controller
            .step_with_input(&mut self.buffer, produced_input_samples);
        self.telemetry.record_correction(&result);
        Some(result)
    }

    /// Run one frame with the core's nominal sample count.
    pub fn nominal_frame(&mut self) -> Option<CorrectionResult> {
        let input = self.controller.config().input_samples_per_frame();
        self.frame(input)
    }

    pub fn mode(&self) -> SyncMode {
        self.sync.mode()
    }

    pub fn config(&self) -> &RateControlConfig {
        self.controller.config()
    }

    pub fn buffer(&self) -> &BufferState {
        &self.buffer
    }

    pub fn telemetry(&self) -> &FillTelemetry {
        &self.telemetry
    }

    /// Take the current telemetry window and start a new one.
    pub fn take_telemetry(&mut self) -> FillTelemetry {
        std::mem::take(&mut self.telemetry)
    }

    pub fn equilibrium(&self) -> EquilibriumReport {
        analyze_equilibrium(self.controller.config())
    }

    fn log_equilibrium(&self) {
        let report = self.equilibrium();
        if report.reachable {
            log::info!(
                "session: equilibrium adjust {:.5} reachable in [{:.5}, {:.5}]",
                report.required_adjust,
                report.achievable_min,
                report.achievable_max
            );
        } else {
            log::warn!(
                "session: equilibrium adjust {:.5} outside [{:.5}, {:.5}], buffer will drift",
                report.required_adjust,
                report.achievable_min,
                report.achievable_max
            );
        }
    }
}
