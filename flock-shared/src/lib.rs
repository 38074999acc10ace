#![cfg_attr(not(feature = "std"), no_std)]

use flock_core::{Boid, Bounds, FlockConfig, FlockState, Lifecycle};
use serde::{Deserialize, Serialize};

/// Serializable form of [`Bounds`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoundsSettings {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for BoundsSettings {
    fn default() -> Self {
        Bounds::default().into()
    }
}

impl From<Bounds> for BoundsSettings {
    fn from(bounds: Bounds) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }
    }
}

impl From<BoundsSettings> for Bounds {
    fn from(settings: BoundsSettings) -> Self {
        Bounds::new(settings.x, settings.y, settings.width, settings.height)
    }
}

/// Flock configuration as edited by a parameter panel or stored in a settings file.
///
/// Missing fields take the engine defaults. Nothing is validated here; the
/// flock validates when the settings are applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub bounds: BoundsSettings,
    pub number_of_boids: usize,
    pub separation_factor: f32,
    pub alignment_factor: f32,
    pub cohesion_factor: f32,
    pub separation_range: f32,
    pub alignment_range: f32,
    pub cohesion_range: f32,
    pub normalize_forces: bool,
    pub clamp_speed: bool,
    pub minimum_speed: f32,
    pub maximum_speed: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        FlockConfig::default().into()
    }
}

impl From<FlockConfig> for FlockSettings {
    fn from(config: FlockConfig) -> Self {
        Self {
            bounds: config.flock_bounds.into(),
            number_of_boids: config.number_of_boids,
            separation_factor: config.separation_factor,
            alignment_factor: config.alignment_factor,
            cohesion_factor: config.cohesion_factor,
            separation_range: config.separation_range,
            alignment_range: config.alignment_range,
            cohesion_range: config.cohesion_range,
            normalize_forces: config.normalize_forces,
            clamp_speed: config.clamp_speed,
            minimum_speed: config.minimum_speed,
            maximum_speed: config.maximum_speed,
        }
    }
}

impl From<FlockSettings> for FlockConfig {
    fn from(settings: FlockSettings) -> Self {
        Self {
            flock_bounds: settings.bounds.into(),
            number_of_boids: settings.number_of_boids,
            separation_factor: settings.separation_factor,
            alignment_factor: settings.alignment_factor,
            cohesion_factor: settings.cohesion_factor,
            separation_range: settings.separation_range,
            alignment_range: settings.alignment_range,
            cohesion_range: settings.cohesion_range,
            normalize_forces: settings.normalize_forces,
            clamp_speed: settings.clamp_speed,
            minimum_speed: settings.minimum_speed,
            maximum_speed: settings.maximum_speed,
        }
    }
}

/// What a parameter panel hands back each frame: an optional candidate
/// config and whether the user asked for the boids to be respawned.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigUpdate {
    pub settings: Option<FlockSettings>,
    pub reset: bool,
}

/// A [`ConfigUpdate`] to apply before the given tick runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScheduledUpdate {
    pub at_tick: u64,
    #[serde(flatten)]
    pub update: ConfigUpdate,
}

/// Read-only view of one boid for renderers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl From<&Boid> for BoidSnapshot {
    fn from(boid: &Boid) -> Self {
        Self {
            x: boid.position.x,
            y: boid.position.y,
            vx: boid.velocity.x,
            vy: boid.velocity.y,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Uninitialized,
    Ready,
    Destroyed,
}

impl From<Lifecycle> for LifecycleStatus {
    fn from(lifecycle: Lifecycle) -> Self {
        match lifecycle {
            Lifecycle::Uninitialized => Self::Uninitialized,
            Lifecycle::Ready => Self::Ready,
            Lifecycle::Destroyed => Self::Destroyed,
        }
    }
}

/// Status of a running flock, for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    pub lifecycle: LifecycleStatus,
    pub boid_count: usize,
    pub ticks: u64,
    pub collision_rate: f64,
    pub paused: bool,
}

impl StatusReport {
    pub fn capture(flock: &FlockState, now: f64) -> Self {
        Self {
            lifecycle: flock.lifecycle().into(),
            boid_count: flock.len(),
            ticks: flock.ticks(),
            collision_rate: flock.collision_rate(now),
            paused: flock.is_paused(),
        }
    }
}

#[cfg(feature = "std")]
impl FlockSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
