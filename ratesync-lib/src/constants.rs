//! Shared constants for rate control and sync defaults.

/// Buffer fill the controller steers toward.
pub const TARGET_FILL: f64 = 0.5;

/// Default proportional feedback gain (`d`).
///
/// Pitch changes of about 0.5% are inaudible to most listeners, which keeps
/// the feedback swing (`±d` around the setpoint) below that threshold.
pub const DEFAULT_FEEDBACK_GAIN: f64 = 0.005;

/// Default maximum deviation of the final adjustment from 1.0.
pub const DEFAULT_SAFETY_CLAMP: f64 = 0.05;

/// Default core audio sample rate (Hz).
pub const DEFAULT_CORE_AUDIO_RATE: f64 = 32_040.0;

/// Default host audio sample rate (Hz).
pub const DEFAULT_HOST_AUDIO_RATE: f64 = 48_000.0;

/// Default core frame cadence (Hz).
pub const DEFAULT_CORE_FRAME_RATE: f64 = 60.10;

/// Default display refresh rate (Hz).
pub const DEFAULT_DISPLAY_REFRESH_RATE: f64 = 59.71;

/// Default sample buffer capacity used by the simulator.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Default number of simulated frames.
pub const DEFAULT_SIMULATION_FRAMES: usize = 3000;

/// Refresh rate assumed when the platform reports none.
pub const FALLBACK_DISPLAY_HZ: f64 = 60.0;

/// Accepted vsync samples before a display measurement is trusted.
///
/// About two seconds at 60Hz: enough for the moving average to settle.
pub const VSYNC_WARMUP_SAMPLES: u32 = 120;

/// Accepted vsync samples between drift checks while in vsync mode.
pub const VSYNC_DRIFT_CHECK_INTERVAL: u32 = 300;

/// Relative fps/Hz mismatch below which vsync timing is used.
pub const SYNC_MODE_TOLERANCE: f64 = 0.01;

/// Smoothing factor of the measured refresh rate moving average.
pub const VSYNC_EMA_ALPHA: f64 = 0.01;

/// Lowest plausible refresh rate; slower intervals are dropped frames.
pub const VSYNC_MIN_HZ: f64 = 50.0;

/// Highest plausible refresh rate; faster intervals are early presents.
pub const VSYNC_MAX_HZ: f64 = 120.0;
