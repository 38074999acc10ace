use flock_core::{FlockConfig, FlockError, FlockState};
use flock_shared::{BoidSnapshot, ConfigUpdate, StatusReport};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// What [`FrameDriver::apply`] did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing to apply.
    Unchanged,
    /// The config was swapped in place.
    Modified,
    /// The flock was destroyed and spawned again.
    Respawned,
}

/// Owns the flock and drives it one frame at a time.
pub struct FrameDriver {
    flock: FlockState,
    rng: StdRng,
}

impl FrameDriver {
    /// Creates the first flock. There is nothing to simulate if this fails.
    pub fn new(config: FlockConfig, seed: Option<u64>, now: f64) -> Result<Self, FlockError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut flock = FlockState::new();
        flock.initialize_with_rng(config, &mut rng, now)?;

        Ok(Self { flock, rng })
    }

    /// Applies a parameter panel result.
    ///
    /// A reset request or a new boid count respawns the flock, anything else
    /// is a live config swap. Invalid settings are refused before the current
    /// flock is torn down.
    pub fn apply(&mut self, update: &ConfigUpdate, now: f64) -> Result<UpdateOutcome, FlockError> {
        let current = *self.flock.config();
        let candidate = update.settings.map(FlockConfig::from);

        let respawn =
            update.reset || candidate.is_some_and(|config| current.requires_respawn(&config));

        if respawn {
            let config = candidate.unwrap_or(current);
            if let Err(reason) = config.validate() {
                log::error!("Keeping current flock, new settings are invalid: {reason}");
                return Err(reason.into());
            }

            self.flock.destroy();
            self.flock.initialize_with_rng(config, &mut self.rng, now)?;
            log::info!("Respawned flock with {} boids", config.number_of_boids);
            return Ok(UpdateOutcome::Respawned);
        }

        match candidate {
            Some(config) if config != current => {
                self.flock.modify_config(config)?;
                log::debug!("Applied live config change");
                Ok(UpdateOutcome::Modified)
            }
            _ => Ok(UpdateOutcome::Unchanged),
        }
    }

    pub fn tick(&mut self, dt: f32) -> Result<(), FlockError> {
        self.flock.update(dt)
    }

    pub fn flock(&self) -> &FlockState {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut FlockState {
        &mut self.flock
    }

    pub fn status(&self, now: f64) -> StatusReport {
        StatusReport::capture(&self.flock, now)
    }

    pub fn snapshots(&self) -> Vec<BoidSnapshot> {
        self.flock.boids().iter().map(BoidSnapshot::from).collect()
    }
}
