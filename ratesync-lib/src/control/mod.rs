//! Buffer-fill feedback control of the audio resampling ratio.

mod buffer;
mod config;
mod controller;
mod error;

pub use buffer::{BufferState, Saturation};
pub use config::{RateControlConfig, RateControlSettings};
pub use controller::{compute_and_apply_correction, rate_adjust, CorrectionResult, RateController};
pub use error::ConfigError;
