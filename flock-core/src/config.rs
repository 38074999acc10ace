use crate::error::ConfigError;
use crate::vector::Vector2D;

/// Axis-aligned rectangle the flock lives in. Boids leaving one edge re-enter at the opposite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1600.0, 900.0)
    }
}

/// Tunables for the flock simulation.
///
/// Invariants are only enforced by [`validate`] at the boundaries of
/// [`FlockState`](crate::FlockState); fields can be freely edited in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub flock_bounds: Bounds,
    pub number_of_boids: usize,

    pub separation_factor: f32,
    pub alignment_factor: f32,
    pub cohesion_factor: f32,

    pub separation_range: f32,
    pub alignment_range: f32,
    pub cohesion_range: f32,

    /// Normalize each of the three force vectors before weighting
    pub normalize_forces: bool,

    pub clamp_speed: bool,
    pub minimum_speed: f32,
    pub maximum_speed: f32,
}

impl FlockConfig {
    pub fn with_bounds(flock_bounds: Bounds) -> Self {
        Self {
            flock_bounds,
            number_of_boids: 100,
            separation_factor: 1.0,
            alignment_factor: 0.01,
            cohesion_factor: 0.005,
            separation_range: 50.0,
            alignment_range: 100.0,
            cohesion_range: 100.0,
            normalize_forces: false,
            clamp_speed: true,
            minimum_speed: 50.0,
            maximum_speed: 100.0,
        }
    }

    /// Speed newly spawned boids start with: the middle of the speed range.
    pub fn start_speed(&self) -> f32 {
        // Halved first so two large finite speeds do not overflow
        self.minimum_speed / 2.0 + self.maximum_speed / 2.0
    }

    /// Whether switching from `self` to `other` needs a destroy + reinitialize
    /// rather than an in-place config swap.
    pub fn requires_respawn(&self, other: &FlockConfig) -> bool {
        self.number_of_boids != other.number_of_boids
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(Some(self))
    }
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self::with_bounds(Bounds::default())
    }
}

/// Checks a candidate configuration and reports the first rule it breaks.
///
/// NaN fails every check. Every edge of the bounds and both speeds must be
/// finite, since the spawner samples positions between the edges and starts
/// boids at the mid speed. Force factors are never rejected, negative weights
/// are a valid way to invert a rule.
pub fn validate(config: Option<&FlockConfig>) -> Result<(), ConfigError> {
    let config = config.ok_or(ConfigError::Missing)?;

    if config.number_of_boids == 0 {
        return Err(ConfigError::InvalidBoidCount);
    }

    let bounds = &config.flock_bounds;
    let has_area = bounds.width > 0.0 && bounds.height > 0.0;
    let edges = [bounds.x, bounds.y, bounds.right(), bounds.bottom()];
    if !has_area || !edges.iter().all(|edge| edge.is_finite()) {
        return Err(ConfigError::InvalidBounds);
    }

    let speeds_finite = config.minimum_speed.is_finite() && config.maximum_speed.is_finite();
    let speeds_ordered =
        config.minimum_speed >= 0.0 && config.minimum_speed <= config.maximum_speed;
    if !speeds_finite || (config.clamp_speed && !speeds_ordered) {
        return Err(ConfigError::InvalidSpeedRange);
    }

    let ranges = [
        config.separation_range,
        config.alignment_range,
        config.cohesion_range,
    ];
    if ranges.iter().any(|range| range.is_nan() || *range < 0.0) {
        return Err(ConfigError::InvalidRange);
    }

    Ok(())
}
