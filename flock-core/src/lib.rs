//! Flock simulation engine.
//!
//! Boids steer by three local rules (separation, alignment, cohesion)
//! evaluated against every other boid each tick, then move inside a wrapping
//! rectangular world. [`FlockState`] owns the flock and drives its lifecycle.
//!
//! ```
//! use flock_core::{FlockConfig, FlockState};
//!
//! let mut flock = FlockState::new();
//! flock.initialize(FlockConfig::default(), 0.0).unwrap();
//! flock.update(1.0 / 60.0).unwrap();
//! assert_eq!(flock.boids().len(), 100);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod boid;
pub mod config;
pub mod error;
pub mod flock;
pub mod spawn;
pub mod steering;
pub mod vector;

pub use boid::Boid;
pub use config::{validate, Bounds, FlockConfig};
pub use error::{ConfigError, FlockError};
pub use flock::{FlockState, Lifecycle};
pub use spawn::spawn;
pub use steering::{ForceBreakdown, SteeringSample};
pub use vector::Vector2D;
