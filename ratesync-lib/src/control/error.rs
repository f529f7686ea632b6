use std::fmt::{Display, Formatter};

/// Error type for invalid rate control or buffer configuration.
///
/// Raised once at session setup. The per-frame path never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveRate { name: &'static str, value: f64 },
    InvalidFeedbackGain(f64),
    InvalidSafetyClamp(f64),
    InvalidCapacity,
    InvalidInitialFill(f64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveRate { name, value } => {
                write!(f, "{} must be a positive rate, got {}", name, value)
            }
            Self::InvalidFeedbackGain(value) => {
                write!(f, "feedback gain must be finite and >= 0, got {}", value)
            }
            Self::InvalidSafetyClamp(value) => {
                write!(f, "safety clamp must be in [0, 1), got {}", value)
            }
            Self::InvalidCapacity => write!(f, "buffer capacity must be greater than zero"),
            Self::InvalidInitialFill(value) => {
                write!(f, "initial fill must be in [0, 1], got {}", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
