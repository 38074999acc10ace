//! Flock lifecycle: initialization, live reconfiguration, ticking and teardown.
//!
//! A tick runs in two phases. Every boid's steering is computed from the
//! unchanged flock into a scratch buffer, then all boids are integrated. No
//! boid sees another boid's state from the current tick.

use alloc::vec::Vec;

use rand::Rng;

use crate::boid::Boid;
use crate::config::{validate, FlockConfig};
use crate::error::{ConfigError, FlockError};
use crate::spawn::spawn;
use crate::steering::{self, ForceBreakdown};
use crate::vector::Vector2D;

/// Where a [`FlockState`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Destroyed,
}

/// The live flock: boids, the steering scratch buffer, the active config and telemetry.
#[derive(Debug)]
pub struct FlockState {
    lifecycle: Lifecycle,
    boids: Vec<Boid>,
    scratch: Vec<Vector2D>,
    config: FlockConfig,
    collision_time: f64,
    measurement_start: f64,
    diagnostics: Option<Vec<ForceBreakdown>>,
    paused: bool,
    step_requested: bool,
    ticks: u64,
}

impl Default for FlockState {
    fn default() -> Self {
        Self::new()
    }
}

impl FlockState {
    /// An uninitialized flock. Call one of the `initialize` methods before ticking.
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            boids: Vec::new(),
            scratch: Vec::new(),
            config: FlockConfig::default(),
            collision_time: 0.0,
            measurement_start: 0.0,
            diagnostics: None,
            paused: false,
            step_requested: false,
            ticks: 0,
        }
    }

    /// Spawns a fresh flock using the thread-local RNG.
    #[cfg(feature = "std")]
    pub fn initialize(&mut self, config: FlockConfig, now: f64) -> Result<(), FlockError> {
        self.initialize_with_rng(config, &mut rand::thread_rng(), now)
    }

    /// Validates `config`, spawns `number_of_boids` boids and starts a new
    /// collision measurement at `now` (seconds). A fresh flock is never paused.
    ///
    /// On failure the flock is left exactly as it was.
    pub fn initialize_with_rng<R: Rng + ?Sized>(
        &mut self,
        config: FlockConfig,
        rng: &mut R,
        now: f64,
    ) -> Result<(), FlockError> {
        if let Err(reason) = validate(Some(&config)) {
            log::error!("initialize: refused invalid flock config, {reason}");
            return Err(reason.into());
        }

        let boids = spawn(
            config.number_of_boids,
            &config.flock_bounds,
            config.start_speed(),
            rng,
        )
        .map_err(|err| {
            log::error!("initialize: failed to spawn boids, {err}");
            err
        })?;

        self.install(config, boids, now)
    }

    /// Like [`initialize_with_rng`](Self::initialize_with_rng) but with caller-placed boids.
    ///
    /// `boids.len()` must match `config.number_of_boids`.
    pub fn initialize_with_boids(
        &mut self,
        config: FlockConfig,
        boids: Vec<Boid>,
        now: f64,
    ) -> Result<(), FlockError> {
        if let Err(reason) = validate(Some(&config)) {
            log::error!("initialize: refused invalid flock config, {reason}");
            return Err(reason.into());
        }
        if boids.len() != config.number_of_boids {
            log::error!(
                "initialize: got {} boids for a config of {}",
                boids.len(),
                config.number_of_boids
            );
            return Err(ConfigError::InvalidBoidCount.into());
        }

        self.install(config, boids, now)
    }

    fn install(&mut self, config: FlockConfig, boids: Vec<Boid>, now: f64) -> Result<(), FlockError> {
        let count = boids.len();
        let scratch = zeroed(count).map_err(|err| {
            log::error!("initialize: failed to allocate steering buffer, {err}");
            err
        })?;
        let diagnostics = match self.diagnostics {
            Some(_) => Some(zeroed(count).map_err(|err| {
                log::error!("initialize: failed to allocate diagnostics buffer, {err}");
                err
            })?),
            None => None,
        };

        self.boids = boids;
        self.scratch = scratch;
        self.diagnostics = diagnostics;
        self.config = config;
        self.collision_time = 0.0;
        self.measurement_start = now;
        self.paused = false;
        self.step_requested = false;
        self.ticks = 0;
        self.lifecycle = Lifecycle::Ready;

        log::info!("initialize: flock of {count} boids ready");
        Ok(())
    }

    /// Swaps in a new config for live tuning. Boid buffers are left alone, so
    /// a change of `number_of_boids` needs [`destroy`](Self::destroy) and a fresh initialize.
    pub fn modify_config(&mut self, config: FlockConfig) -> Result<(), FlockError> {
        self.require_ready("modify_config")?;

        if let Err(reason) = validate(Some(&config)) {
            log::error!("modify_config: keeping previous config, {reason}");
            return Err(reason.into());
        }
        if self.config.requires_respawn(&config) {
            log::error!(
                "modify_config: boid count change {} -> {} needs a reinitialize",
                self.config.number_of_boids,
                config.number_of_boids
            );
            return Err(ConfigError::InvalidBoidCount.into());
        }

        self.config = config;
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Outside `Ready` this does nothing and reports [`FlockError::InvalidState`].
    /// While paused it only runs if a step was requested.
    pub fn update(&mut self, dt: f32) -> Result<(), FlockError> {
        if let Err(err) = self.require_ready("update") {
            log::warn!("update: skipped, {err}");
            return Err(err);
        }

        if self.paused {
            if !self.step_requested {
                return Ok(());
            }
            self.step_requested = false;
        }

        let collision_time = self.compute_steering(dt);
        self.collision_time += f64::from(collision_time);

        let config = &self.config;
        for (boid, steering) in self.boids.iter_mut().zip(self.scratch.iter()) {
            boid.integrate(*steering, dt, config);
        }

        self.ticks += 1;
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_steering(&mut self, dt: f32) -> f32 {
        let Self {
            boids,
            scratch,
            config,
            diagnostics,
            ..
        } = self;
        let boids: &[Boid] = boids;
        let config: &FlockConfig = config;

        let mut collision_time = 0.0;
        for (index, slot) in scratch.iter_mut().enumerate() {
            let sample = steering::evaluate(index, boids, config, dt);
            *slot = sample.steering();
            if let Some(diagnostics) = diagnostics.as_mut() {
                diagnostics[index] = sample.forces;
            }
            collision_time += sample.collision_time;
        }
        collision_time
    }

    #[cfg(feature = "parallel")]
    fn compute_steering(&mut self, dt: f32) -> f32 {
        use rayon::prelude::*;

        let Self {
            boids,
            scratch,
            config,
            diagnostics,
            ..
        } = self;
        let boids: &[Boid] = boids;
        let config: &FlockConfig = config;

        match diagnostics.as_mut() {
            Some(diagnostics) => scratch
                .par_iter_mut()
                .zip(diagnostics.par_iter_mut())
                .enumerate()
                .map(|(index, (slot, forces))| {
                    let sample = steering::evaluate(index, boids, config, dt);
                    *slot = sample.steering();
                    *forces = sample.forces;
                    sample.collision_time
                })
                .sum::<f32>(),
            None => scratch
                .par_iter_mut()
                .enumerate()
                .map(|(index, slot)| {
                    let sample = steering::evaluate(index, boids, config, dt);
                    *slot = sample.steering();
                    sample.collision_time
                })
                .sum::<f32>(),
        }
    }

    /// Releases both buffers. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            log::debug!("destroy: flock already destroyed");
            return;
        }

        self.boids = Vec::new();
        self.scratch = Vec::new();
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            *diagnostics = Vec::new();
        }
        self.lifecycle = Lifecycle::Destroyed;
        log::info!("destroy: flock released");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// The active config, or the last one used if the flock was destroyed.
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn boid(&self, index: usize) -> Result<&Boid, FlockError> {
        self.boids.get(index).ok_or(FlockError::IndexOutOfRange {
            index,
            len: self.boids.len(),
        })
    }

    /// Number of ticks since the last initialize.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.step_requested = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Lets exactly one tick through while paused.
    pub fn request_step(&mut self) {
        if self.paused {
            self.step_requested = true;
        }
    }

    /// Turns the per-boid force breakdown on or off. The breakdown is filled by
    /// the next tick.
    pub fn set_diagnostics(&mut self, enabled: bool) -> Result<(), FlockError> {
        match (enabled, self.diagnostics.is_some()) {
            (true, false) => self.diagnostics = Some(zeroed(self.boids.len())?),
            (false, true) => self.diagnostics = None,
            _ => {}
        }
        Ok(())
    }

    /// Weighted separation, alignment and cohesion from the last tick, when diagnostics are on.
    pub fn force_breakdown(&self, index: usize) -> Option<&ForceBreakdown> {
        self.diagnostics.as_ref()?.get(index)
    }

    /// Seconds of near-collision accumulated since the measurement started.
    pub fn collision_time(&self) -> f64 {
        self.collision_time
    }

    /// Collision time per second of wall-clock time since the measurement started.
    pub fn collision_rate(&self, now: f64) -> f64 {
        let elapsed = now - self.measurement_start;
        if elapsed > 0.0 {
            self.collision_time / elapsed
        } else {
            0.0
        }
    }

    pub fn reset_collision_measurement(&mut self, now: f64) {
        self.collision_time = 0.0;
        self.measurement_start = now;
    }

    fn require_ready(&self, operation: &'static str) -> Result<(), FlockError> {
        if self.lifecycle == Lifecycle::Ready {
            Ok(())
        } else {
            Err(FlockError::InvalidState {
                operation,
                state: self.lifecycle,
            })
        }
    }
}

fn zeroed<T: Default + Clone>(count: usize) -> Result<Vec<T>, FlockError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(count)
        .map_err(|_| FlockError::AllocationFailure { requested: count })?;
    buffer.resize(count, T::default());
    Ok(buffer)
}
