//! # RateSync Library
//!
//! Dynamic audio rate control for emulator frontends. A core produces audio
//! at its own sample rate and frame cadence while the output device drains
//! it on the display's clock; this library picks, every frame, the
//! resampling adjustment that keeps the buffer between them half full.
//! It includes the controller itself, display rate measurement, sync mode
//! selection and offline simulation tooling.

pub mod constants;
pub mod control;
pub mod diagnostics;
pub mod session;
pub mod timing;

pub use control::{
    compute_and_apply_correction, BufferState, ConfigError, CorrectionResult, RateControlConfig,
    RateControlSettings, RateController, Saturation,
};
pub use session::SyncSession;
