use crate::config::{Bounds, FlockConfig};
use crate::vector::Vector2D;

/// A single boid entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Applies one tick's steering and moves the boid.
    ///
    /// Steering is added to the velocity as is, only the position step is scaled by `dt`.
    pub fn integrate(&mut self, steering: Vector2D, dt: f32, config: &FlockConfig) {
        self.velocity += steering;
        if config.clamp_speed {
            self.clamp_speed(config.minimum_speed, config.maximum_speed);
        }
        self.position += self.velocity * dt;
        self.wrap_edges(&config.flock_bounds);
    }

    /// A stationary boid keeps its zero velocity.
    pub fn clamp_speed(&mut self, minimum: f32, maximum: f32) {
        self.velocity = self.velocity.clamp_magnitude(minimum, maximum);
    }

    /// Toroidal wrap. A boid sitting exactly on an edge stays put.
    pub fn wrap_edges(&mut self, bounds: &Bounds) {
        if self.position.x < bounds.x {
            self.position.x = bounds.right();
        } else if self.position.x > bounds.right() {
            self.position.x = bounds.x;
        }

        if self.position.y < bounds.y {
            self.position.y = bounds.bottom();
        } else if self.position.y > bounds.bottom() {
            self.position.y = bounds.y;
        }
    }
}
