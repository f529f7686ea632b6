use std::fmt::{Display, Formatter};

use ratesync_lib::ConfigError;

/// Error type for a `ratesim` run.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidArgument(String),
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {}", err),
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Json(err) => write!(f, "json error: {}", err),
            Self::InvalidArgument(err) => write!(f, "invalid argument: {}", err),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<std::io::Error> for RunError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RunError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
