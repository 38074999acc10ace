//! Separation, alignment and cohesion for a single boid.
//!
//! Each boid scans the whole flock on its own. A pair is evaluated once from
//! each side and no force is shared between the two, so results do not depend
//! on the order boids are visited in.

use crate::boid::Boid;
use crate::config::FlockConfig;
use crate::vector::Vector2D;

/// Closer neighbours than this are skipped by separation to avoid dividing by zero.
pub const SEPARATION_EPSILON: f32 = 1e-6;

/// Neighbours closer than this count towards collision telemetry.
pub const COLLISION_DISTANCE: f32 = 5.0;

/// The three weighted rule outputs for one boid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceBreakdown {
    pub separation: Vector2D,
    pub alignment: Vector2D,
    pub cohesion: Vector2D,
}

impl ForceBreakdown {
    pub fn total(&self) -> Vector2D {
        self.separation + self.alignment + self.cohesion
    }
}

/// Result of evaluating one boid against the flock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringSample {
    pub forces: ForceBreakdown,
    /// `dt` summed once per neighbour within [`COLLISION_DISTANCE`].
    pub collision_time: f32,
}

impl SteeringSample {
    pub fn steering(&self) -> Vector2D {
        self.forces.total()
    }
}

/// Computes the steering for `boids[index]` from a snapshot of the flock.
pub fn evaluate(index: usize, boids: &[Boid], config: &FlockConfig, dt: f32) -> SteeringSample {
    let boid = &boids[index];

    let mut separation = Vector2D::zero();
    let mut alignment = Vector2D::zero();
    let mut cohesion = Vector2D::zero();
    let mut alignment_count = 0usize;
    let mut cohesion_count = 0usize;
    let mut collision_time = 0.0;

    for (other_index, other) in boids.iter().enumerate() {
        if other_index == index {
            continue;
        }

        let distance = boid.position.distance(&other.position);

        // Zero at the edge of the range, unbounded as the distance closes
        if distance < config.separation_range && distance > SEPARATION_EPSILON {
            let offset = boid.position - other.position;
            let magnitude = config.separation_range / distance - 1.0;
            separation += offset.normalize() * magnitude;
        }

        if distance < config.alignment_range {
            alignment += other.velocity;
            alignment_count += 1;
        }

        if distance < config.cohesion_range {
            cohesion += other.position;
            cohesion_count += 1;
        }

        if distance < COLLISION_DISTANCE {
            collision_time += dt;
        }
    }

    if alignment_count > 0 {
        alignment = alignment / alignment_count as f32;
    }

    if cohesion_count > 0 {
        cohesion = cohesion / cohesion_count as f32 - boid.position;
    }

    if config.normalize_forces {
        separation = separation.normalize();
        alignment = alignment.normalize();
        cohesion = cohesion.normalize();
    }

    SteeringSample {
        forces: ForceBreakdown {
            separation: separation * config.separation_factor,
            alignment: alignment * config.alignment_factor,
            cohesion: cohesion * config.cohesion_factor,
        },
        collision_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated(separation: f32, alignment: f32, cohesion: f32) -> FlockConfig {
        FlockConfig {
            separation_factor: separation,
            alignment_factor: alignment,
            cohesion_factor: cohesion,
            separation_range: 50.0,
            alignment_range: 100.0,
            cohesion_range: 100.0,
            clamp_speed: false,
            ..FlockConfig::default()
        }
    }

    fn at(x: f32, y: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::zero())
    }

    fn assert_close(actual: Vector2D, expected: Vector2D) {
        assert!(
            (actual - expected).magnitude() < 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_separation_linear_falloff() {
        let boids = [at(0.0, 0.0), at(10.0, 0.0)];
        let sample = evaluate(0, &boids, &isolated(1.0, 0.0, 0.0), 0.0);

        // (50 / 10) - 1 = 4, pointing away from the neighbour
        assert_close(sample.steering(), Vector2D::new(-4.0, 0.0));
    }

    #[test]
    fn test_separation_vanishes_at_range_edge() {
        let boids = [at(0.0, 0.0), at(50.0, 0.0)];
        let sample = evaluate(0, &boids, &isolated(1.0, 0.0, 0.0), 0.0);

        assert_eq!(sample.forces.separation, Vector2D::zero());
    }

    #[test]
    fn test_coincident_boids_skip_separation() {
        let boids = [at(5.0, 5.0), at(5.0, 5.0)];
        let sample = evaluate(0, &boids, &isolated(1.0, 0.0, 0.0), 0.0);

        assert_eq!(sample.forces.separation, Vector2D::zero());
    }

    #[test]
    fn test_separation_sums_neighbours() {
        let boids = [at(0.0, 0.0), at(10.0, 0.0), at(0.0, 25.0)];
        let sample = evaluate(0, &boids, &isolated(2.0, 0.0, 0.0), 0.0);

        // -x: 4, -y: (50 / 25) - 1 = 1, then doubled by the factor
        assert_close(sample.forces.separation, Vector2D::new(-8.0, -2.0));
    }

    #[test]
    fn test_alignment_averages_neighbour_velocity() {
        let boids = [
            Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(100.0, 100.0)),
            Boid::new(Vector2D::new(10.0, 0.0), Vector2D::new(2.0, 0.0)),
            Boid::new(Vector2D::new(0.0, 10.0), Vector2D::new(0.0, 4.0)),
            Boid::new(Vector2D::new(500.0, 500.0), Vector2D::new(50.0, 50.0)),
        ];
        let sample = evaluate(0, &boids, &isolated(0.0, 0.5, 0.0), 0.0);

        // Own velocity and the out-of-range boid are ignored
        assert_close(sample.forces.alignment, Vector2D::new(0.5, 1.0));
    }

    #[test]
    fn test_cohesion_points_to_local_centre() {
        let boids = [at(10.0, 10.0), at(20.0, 10.0), at(10.0, 30.0)];
        let sample = evaluate(0, &boids, &isolated(0.0, 0.0, 1.0), 0.0);

        // Centre of (20,10) and (10,30) is (15,20)
        assert_close(sample.forces.cohesion, Vector2D::new(5.0, 10.0));
    }

    #[test]
    fn test_lonely_boid_has_no_steering() {
        let boids = [at(0.0, 0.0), at(1000.0, 1000.0)];
        let sample = evaluate(0, &boids, &isolated(1.0, 1.0, 1.0), 1.0);

        assert_eq!(sample, SteeringSample::default());
    }

    #[test]
    fn test_normalized_forces() {
        let boids = [
            Boid::new(Vector2D::new(0.0, 0.0), Vector2D::zero()),
            Boid::new(Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 30.0)),
        ];
        let config = FlockConfig {
            normalize_forces: true,
            ..isolated(2.0, 3.0, 4.0)
        };
        let sample = evaluate(0, &boids, &config, 0.0);

        assert_close(sample.forces.separation, Vector2D::new(-2.0, 0.0));
        assert_close(sample.forces.alignment, Vector2D::new(0.0, 3.0));
        assert_close(sample.forces.cohesion, Vector2D::new(4.0, 0.0));
    }

    #[test]
    fn test_normalizing_zero_force_stays_zero() {
        let boids = [at(0.0, 0.0)];
        let config = FlockConfig {
            normalize_forces: true,
            ..isolated(1.0, 1.0, 1.0)
        };
        let sample = evaluate(0, &boids, &config, 0.0);

        assert_eq!(sample.steering(), Vector2D::zero());
        assert!(!sample.steering().x.is_nan());
    }

    #[test]
    fn test_collision_time_counts_close_neighbours() {
        let boids = [at(0.0, 0.0), at(3.0, 0.0), at(0.0, 4.0), at(6.0, 0.0)];
        let sample = evaluate(0, &boids, &isolated(0.0, 0.0, 0.0), 0.25);

        assert_eq!(sample.collision_time, 0.5);
    }

    #[test]
    fn test_collisions_do_not_feed_steering() {
        let boids = [at(0.0, 0.0), at(3.0, 0.0)];
        let config = isolated(1.0, 0.0, 0.0);

        let still = evaluate(0, &boids, &config, 0.0);
        let moving = evaluate(0, &boids, &config, 1.0);

        assert_eq!(still.forces, moving.forces);
        assert!(moving.collision_time > still.collision_time);
    }

    #[test]
    fn test_shared_config_pairs_register_each_other() {
        let boids = [at(0.0, 0.0), at(18.0, 24.0)];
        let config = isolated(1.0, 0.0, 0.0);

        let a = evaluate(0, &boids, &config, 0.0);
        let b = evaluate(1, &boids, &config, 0.0);

        assert_close(a.forces.separation, -b.forces.separation);
        assert!(a.forces.separation.magnitude() > 0.0);
    }
}
