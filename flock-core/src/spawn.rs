use alloc::vec::Vec;

use rand::Rng;

use crate::boid::Boid;
use crate::config::Bounds;
use crate::error::FlockError;
use crate::vector::Vector2D;

/// Half-width of the square random headings are drawn from.
const HEADING_EXTENT: f32 = 100.0;
const HEADING_ATTEMPTS: usize = 8;
/// Used when every heading draw came out as the zero vector.
const FALLBACK_HEADING: Vector2D = Vector2D { x: 1.0, y: 0.0 };

/// Spawns `count` boids uniformly inside `bounds` (edges included), each
/// heading in a random direction at `start_speed`.
pub fn spawn<R: Rng + ?Sized>(
    count: usize,
    bounds: &Bounds,
    start_speed: f32,
    rng: &mut R,
) -> Result<Vec<Boid>, FlockError> {
    let mut boids = Vec::new();
    boids
        .try_reserve_exact(count)
        .map_err(|_| FlockError::AllocationFailure { requested: count })?;

    for _ in 0..count {
        let position = Vector2D::new(
            rng.gen_range(bounds.x..=bounds.right()),
            rng.gen_range(bounds.y..=bounds.bottom()),
        );
        boids.push(Boid::new(position, random_heading(rng) * start_speed));
    }

    Ok(boids)
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vector2D {
    (0..HEADING_ATTEMPTS)
        .map(|_| {
            Vector2D::new(
                rng.gen_range(-HEADING_EXTENT..=HEADING_EXTENT),
                rng.gen_range(-HEADING_EXTENT..=HEADING_EXTENT),
            )
        })
        .find_map(unit_heading)
        .unwrap_or(FALLBACK_HEADING)
}

fn unit_heading(raw: Vector2D) -> Option<Vector2D> {
    if raw.is_zero() {
        None
    } else {
        Some(raw.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_count_and_speed() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Bounds::new(0.0, 0.0, 800.0, 600.0);

        let boids = spawn(50, &bounds, 75.0, &mut rng).unwrap();

        assert_eq!(boids.len(), 50);
        for boid in &boids {
            assert!((boid.speed() - 75.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_start_speed() {
        let mut rng = StdRng::seed_from_u64(1);
        let boids = spawn(5, &Bounds::default(), 0.0, &mut rng).unwrap();

        assert!(boids.iter().all(|boid| boid.velocity == Vector2D::zero()));
    }

    #[test]
    fn test_zero_draw_is_rejected() {
        assert_eq!(unit_heading(Vector2D::zero()), None);

        let heading = unit_heading(Vector2D::new(0.0, -3.0)).unwrap();
        assert_eq!(heading, Vector2D::new(0.0, -1.0));
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let bounds = Bounds::default();
        let a = spawn(10, &bounds, 10.0, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = spawn(10, &bounds, 10.0, &mut StdRng::seed_from_u64(99)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_spawn_allocation_failure() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = spawn(usize::MAX, &Bounds::default(), 1.0, &mut rng);

        assert_eq!(
            result,
            Err(FlockError::AllocationFailure {
                requested: usize::MAX
            })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10_000))]

        #[test]
        fn spawned_boids_stay_in_bounds(
            seed in any::<u64>(),
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            width in 0.5f32..1000.0,
            height in 0.5f32..1000.0,
        ) {
            let bounds = Bounds::new(x, y, width, height);
            let mut rng = StdRng::seed_from_u64(seed);

            let boids = spawn(4, &bounds, 1.0, &mut rng).unwrap();

            for boid in &boids {
                prop_assert!(bounds.contains(boid.position), "{:?} outside {:?}", boid.position, bounds);
            }
        }
    }
}
