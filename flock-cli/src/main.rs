use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use flock_cli::{load_schedule, load_settings, FrameDriver, UpdateOutcome};
use flock_core::FlockConfig;
use flock_shared::{BoidSnapshot, FlockSettings, StatusReport};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flock simulation", long_about = None)]
struct Args {
    /// JSON settings file; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of `{ "at_tick", "settings", "reset" }` updates to apply while running
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Override the number of boids
    #[arg(short, long)]
    boids: Option<usize>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Log a status line every N frames (0 disables)
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,

    /// Measure collision rate against the wall clock instead of simulated time
    #[arg(long)]
    wall_clock: bool,

    /// Write the final boids and status to this JSON file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Serialize)]
struct FlockDump<'a> {
    status: StatusReport,
    boids: &'a [BoidSnapshot],
}

/// Simulated time advances by `dt` per frame, wall time is read from the clock.
struct FrameClock {
    started: Instant,
    simulated: f64,
    wall_clock: bool,
}

impl FrameClock {
    fn new(wall_clock: bool) -> Self {
        Self {
            started: Instant::now(),
            simulated: 0.0,
            wall_clock,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.simulated += f64::from(dt);
    }

    fn now(&self) -> f64 {
        if self.wall_clock {
            self.started.elapsed().as_secs_f64()
        } else {
            self.simulated
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => FlockSettings::default(),
    };
    if let Some(boids) = args.boids {
        settings.number_of_boids = boids;
    }
    let schedule = match &args.schedule {
        Some(path) => load_schedule(path)?,
        None => Vec::new(),
    };

    log::info!("Flock simulation starting...");
    log::info!("Boids: {}", settings.number_of_boids);
    log::info!("Frames: {} at dt {:.4}s", args.ticks, args.dt);

    let mut clock = FrameClock::new(args.wall_clock);
    let mut driver = FrameDriver::new(FlockConfig::from(settings), args.seed, clock.now())
        .context("Failed to initialize flock")?;

    let mut pending = schedule.iter().peekable();
    for frame in 0..args.ticks {
        while let Some(scheduled) = pending.next_if(|scheduled| scheduled.at_tick <= frame) {
            match driver.apply(&scheduled.update, clock.now()) {
                Ok(UpdateOutcome::Unchanged) => {}
                Ok(outcome) => log::info!("Frame {frame}: update applied ({outcome:?})"),
                Err(e) => log::warn!("Frame {frame}: update refused: {e}"),
            }
        }

        driver.tick(args.dt).context("Flock stopped ticking")?;
        clock.advance(args.dt);

        if args.report_every > 0 && (frame + 1) % args.report_every == 0 {
            let status = driver.status(clock.now());
            log::info!(
                "Frame {}: {} boids, collision rate {:.4}",
                frame + 1,
                status.boid_count,
                status.collision_rate
            );
        }
    }

    let status = driver.status(clock.now());
    println!("{}", serde_json::to_string_pretty(&status)?);

    if let Some(path) = &args.dump {
        let boids = driver.snapshots();
        let dump = FlockDump {
            status,
            boids: &boids,
        };
        fs::write(path, serde_json::to_string_pretty(&dump)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {} boids to {}", boids.len(), path.display());
    }

    Ok(())
}
