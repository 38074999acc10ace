//! Headless frame loop for `flock-core`.
//!
//! Stands in for the window and parameter panel: it owns the flock, feeds it a
//! fixed time step and applies scripted config updates between frames.

pub mod driver;
pub mod settings;

pub use driver::{FrameDriver, UpdateOutcome};
pub use settings::{load_schedule, load_settings};
