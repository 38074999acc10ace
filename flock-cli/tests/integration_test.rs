use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use flock_cli::{load_schedule, load_settings, FrameDriver, UpdateOutcome};
use flock_core::{FlockConfig, Lifecycle};
use flock_shared::{ConfigUpdate, FlockSettings, LifecycleStatus};

/// Writes `contents` to a file unique to this test in the temp dir
fn temp_file(name: &str, contents: &str) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("flock-cli-{}-{}", std::process::id(), name));
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn test_settings_file_drives_first_flock() -> Result<()> {
    let path = temp_file(
        "settings.json",
        r#"{
            "number_of_boids": 16,
            "bounds": { "x": -100.0, "y": -100.0, "width": 200.0, "height": 200.0 },
            "minimum_speed": 10.0,
            "maximum_speed": 20.0
        }"#,
    )?;

    let settings = load_settings(&path)?;
    let mut driver = FrameDriver::new(settings.into(), Some(7), 0.0)?;

    for _ in 0..120 {
        driver.tick(1.0 / 60.0)?;
    }

    let bounds = driver.flock().config().flock_bounds;
    for boid in driver.flock().boids() {
        assert!(bounds.contains(boid.position), "{:?} escaped", boid.position);
        assert!(boid.speed() <= 20.0 + 1e-3);
    }

    let status = driver.status(2.0);
    assert_eq!(status.lifecycle, LifecycleStatus::Ready);
    assert_eq!(status.boid_count, 16);
    assert_eq!(status.ticks, 120);

    fs::remove_file(path)?;
    Ok(())
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let path = std::env::temp_dir().join("flock-cli-does-not-exist.json");
    assert!(load_settings(&path).is_err());
}

#[test]
fn test_schedule_is_sorted_by_tick() -> Result<()> {
    let path = temp_file(
        "schedule.json",
        r#"[
            { "at_tick": 90, "reset": true },
            { "at_tick": 10, "settings": { "separation_factor": 4.0 } }
        ]"#,
    )?;

    let schedule = load_schedule(&path)?;

    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0].at_tick, 10);
    assert_eq!(schedule[1].at_tick, 90);
    assert!(schedule[1].update.reset);

    fs::remove_file(path)?;
    Ok(())
}

#[test]
fn test_live_tuning_keeps_boids() -> Result<()> {
    let mut driver = FrameDriver::new(FlockConfig::default(), Some(3), 0.0)?;
    driver.tick(1.0 / 60.0)?;
    let before = driver.snapshots();

    let tuned = FlockSettings {
        separation_factor: 2.0,
        cohesion_range: 40.0,
        ..FlockSettings::default()
    };
    let outcome = driver.apply(
        &ConfigUpdate {
            settings: Some(tuned),
            reset: false,
        },
        1.0,
    )?;

    assert_eq!(outcome, UpdateOutcome::Modified);
    assert_eq!(driver.flock().config().separation_factor, 2.0);
    assert_eq!(driver.snapshots(), before);
    assert_eq!(driver.flock().ticks(), 1);
    Ok(())
}

#[test]
fn test_boid_count_change_respawns() -> Result<()> {
    let mut driver = FrameDriver::new(FlockConfig::default(), Some(5), 0.0)?;

    let outcome = driver.apply(
        &ConfigUpdate {
            settings: Some(FlockSettings {
                number_of_boids: 12,
                ..FlockSettings::default()
            }),
            reset: false,
        },
        0.5,
    )?;

    assert_eq!(outcome, UpdateOutcome::Respawned);
    assert_eq!(driver.flock().lifecycle(), Lifecycle::Ready);
    assert_eq!(driver.flock().len(), 12);
    driver.tick(1.0 / 60.0)?;
    Ok(())
}

#[test]
fn test_invalid_live_update_keeps_config() -> Result<()> {
    let mut driver = FrameDriver::new(FlockConfig::default(), Some(8), 0.0)?;
    let before = *driver.flock().config();

    let result = driver.apply(
        &ConfigUpdate {
            settings: Some(FlockSettings {
                alignment_range: -5.0,
                ..FlockSettings::default()
            }),
            reset: false,
        },
        0.0,
    );

    assert!(result.is_err());
    assert_eq!(driver.flock().config(), &before);
    Ok(())
}

#[test]
fn test_seeded_runs_are_reproducible() -> Result<()> {
    let run = |seed| -> Result<_> {
        let mut driver = FrameDriver::new(FlockConfig::default(), Some(seed), 0.0)?;
        for _ in 0..30 {
            driver.tick(1.0 / 60.0)?;
        }
        Ok(driver.snapshots())
    };

    assert_eq!(run(11)?, run(11)?);
    assert_ne!(run(11)?, run(12)?);
    Ok(())
}
