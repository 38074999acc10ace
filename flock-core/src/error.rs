//! Error types for the flock engine.
//!
//! Every refused operation leaves the [`FlockState`](crate::FlockState) it was
//! called on untouched, so all of these are recoverable by the caller.

use core::fmt;

use crate::flock::Lifecycle;

/// The first configuration rule a candidate [`FlockConfig`](crate::FlockConfig) violates.
///
/// Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No candidate configuration was supplied.
    Missing,
    /// `number_of_boids` is zero.
    InvalidBoidCount,
    /// The flock bounds have a non-positive width or height.
    InvalidBounds,
    /// Speed clamping is on and `0 <= minimum_speed <= maximum_speed` does not hold.
    InvalidSpeedRange,
    /// One of the three force ranges is negative.
    InvalidRange,
}

impl ConfigError {
    /// Human-readable explanation, suitable for a log line or a panel tooltip.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing => "configuration is missing",
            Self::InvalidBoidCount => "number of boids must be greater than 0",
            Self::InvalidBounds => "flock bounds must have a positive width and height",
            Self::InvalidSpeedRange => {
                "speed range invalid: minimum must be non-negative and no greater than maximum"
            }
            Self::InvalidRange => "force ranges must be non-negative",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors returned by [`FlockState`](crate::FlockState) operations and the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlockError {
    /// The supplied configuration failed validation.
    ConfigInvalid(ConfigError),
    /// A boid or steering buffer could not be allocated.
    AllocationFailure {
        /// Number of elements that were requested.
        requested: usize,
    },
    /// The operation needs a `Ready` flock.
    InvalidState {
        /// Name of the refused operation.
        operation: &'static str,
        /// Lifecycle state at the time of the call.
        state: Lifecycle,
    },
    /// A boid index past the end of the flock.
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigInvalid(reason) => write!(f, "invalid flock config: {reason}"),
            Self::AllocationFailure { requested } => {
                write!(f, "failed to allocate buffers for {requested} boids")
            }
            Self::InvalidState { operation, state } => {
                write!(f, "{operation} is not allowed while the flock is {state:?}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "boid index {index} out of range for flock of {len}")
            }
        }
    }
}

impl From<ConfigError> for FlockError {
    fn from(reason: ConfigError) -> Self {
        Self::ConfigInvalid(reason)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for FlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigInvalid(reason) => Some(reason),
            _ => None,
        }
    }
}
