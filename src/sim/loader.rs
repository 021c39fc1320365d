//! Configuration and Trace Loading.
//!
//! Reads scenario configurations (TOML) and signal records (JSON) from disk,
//! and writes recorded traces back out for later replay.

use crate::common::SignalRecord;
use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Loads and validates a scenario configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;

    config.channel.validate()?;
    if let Some(out) = &config.buffer.output_channel {
        out.validate()?;
    }
    Ok(config)
}

/// Loads a signal record written by [`save_json`].
pub fn load_record(path: impl AsRef<Path>) -> Result<SignalRecord> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse trace {}", path.display()))
}

/// Writes any serializable value (signal records, trace ROMs) as JSON.
pub fn save_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote JSON");
    Ok(())
}
