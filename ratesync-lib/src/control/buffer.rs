//! Logical fill counter for the sample buffer between producer and consumer.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Which bound the buffer level was pinned to during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Saturation {
    /// The consumer asked for more than was buffered.
    Underrun,
    /// The producer delivered more than fits.
    Overrun,
}

/// Fill level of a fixed-capacity sample buffer.
///
/// `level` always stays within `[0, capacity]`. Updates that would leave
/// that range are clamped, never rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferState {
    capacity: usize,
    level: f64,
}

impl BufferState {
    /// Create a buffer holding `initial_fill` of its capacity.
    ///
    /// # Errors
    /// Returns an error if `capacity` is zero or `initial_fill` is not a
    /// finite value in `[0, 1]`.
    pub fn new(capacity: usize, initial_fill: f64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if !initial_fill.is_finite() || !(0.0..=1.0).contains(&initial_fill) {
            return Err(ConfigError::InvalidInitialFill(initial_fill));
        }

        Ok(Self {
            capacity,
            level: capacity as f64 * initial_fill,
        })
    }

    /// Buffer size in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current fill in samples.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Current fill as a fraction of capacity, in `[0, 1]`.
    pub fn read_fill_ratio(&self) -> f64 {
        (self.level / self.capacity as f64).clamp(0.0, 1.0)
    }

    /// Add `produced` samples and drain `consumed` samples.
    ///
    /// The result is clamped to `[0, capacity]`. When clamping kicks in the
    /// excess (overrun) or the deficit (underrun) is lost, and the matching
    /// [`Saturation`] is returned so callers can surface the glitch risk.
    /// A non-finite net change leaves the level untouched.
    pub fn apply(&mut self, produced: f64, consumed: f64) -> Option<Saturation> {
        let capacity = self.capacity as f64;
        let next = self.level + produced - consumed;
        if !next.is_finite() {
            return None;
        }

        let saturation = if next < 0.0 {
            Some(Saturation::Underrun)
        } else if next > capacity {
            Some(Saturation::Overrun)
        } else {
            None
        };

        self.level = next.clamp(0.0, capacity);
        saturation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_requested_fill() {
        let buffer = BufferState::new(4096, 0.5).expect("buffer");
        assert_eq!(buffer.level(), 2048.0);
        assert_eq!(buffer.read_fill_ratio(), 0.5);
    }

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(
            BufferState::new(0, 0.5).unwrap_err(),
            ConfigError::InvalidCapacity
        );
    }

    #[test]
    fn rejects_out_of_range_initial_fill() {
        assert!(BufferState::new(16, -0.1).is_err());
        assert!(BufferState::new(16, 1.5).is_err());
        assert!(BufferState::new(16, f64::NAN).is_err());
    }

    #[test]
    fn apply_moves_level_by_net_samples() {
        let mut buffer = BufferState::new(1000, 0.5).expect("buffer");
        assert_eq!(buffer.apply(120.0, 20.0), None);
        assert_eq!(buffer.level(), 600.0);
        assert_eq!(buffer.read_fill_ratio(), 0.6);
    }

    #[test]
    fn apply_clamps_and_reports_underrun() {
        let mut buffer = BufferState::new(1000, 0.1).expect("buffer");
        assert_eq!(buffer.apply(0.0, 250.0), Some(Saturation::Underrun));
        assert_eq!(buffer.level(), 0.0);
        assert_eq!(buffer.read_fill_ratio(), 0.0);
    }

    #[test]
    fn apply_ignores_non_finite_updates() {
        let mut buffer = BufferState::new(1000, 0.4).expect("buffer");
        assert_eq!(buffer.apply(f64::NAN, 10.0), None);
        assert_eq!(buffer.apply(f64::INFINITY, 0.0), None);
        assert_eq!(buffer.apply(0.0, f64::NEG_INFINITY), None);
        assert_eq!(buffer.level(), 400.0);
        assert_eq!(buffer.apply(0.0, 100.0), None);
        assert_eq!(buffer.level(), 300.0);
    }

    #[test]
    fn apply_clamps_and_reports_overrun() {
        let mut buffer = BufferState::new(1000, 0.9).expect("buffer");
        assert_eq!(buffer.apply(500.0, 0.0), Some(Saturation::Overrun));
        assert_eq!(buffer.level(), 1000.0);
        assert_eq!(buffer.read_fill_ratio(), 1.0);
    }

    #[test]
    fn landing_exactly_on_a_bound_is_not_saturation() {
        let mut buffer = BufferState::new(1000, 0.5).expect("buffer");
        assert_eq!(buffer.apply(0.0, 500.0), None);
        assert_eq!(buffer.level(), 0.0);
    }
}
