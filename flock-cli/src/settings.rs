use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use flock_shared::{FlockSettings, ScheduledUpdate};

/// Reads a JSON settings file. Fields left out take the engine defaults.
pub fn load_settings(path: &Path) -> Result<FlockSettings> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = FlockSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

/// Reads a JSON array of scheduled updates, sorted by tick.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduledUpdate>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule file {}", path.display()))?;
    let mut schedule: Vec<ScheduledUpdate> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid schedule in {}", path.display()))?;
    schedule.sort_by_key(|scheduled| scheduled.at_tick);
    log::debug!("Loaded {} scheduled updates", schedule.len());
    Ok(schedule)
}
