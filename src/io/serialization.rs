// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings serialization and deserialization.
//!
//! This module handles reading and writing crop settings in YAML and JSON
//! formats, chosen by file extension.

use crate::models::settings::CropSettings;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "RATIOCROP_CONFIG";

/// Settings file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ratiocrop.yaml";

/// Export settings to YAML format.
pub fn export_yaml(settings: &CropSettings, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export settings to JSON format.
pub fn export_json(settings: &CropSettings, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import settings from YAML format.
pub fn import_yaml(path: &Path) -> Result<CropSettings> {
    let yaml = std::fs::read_to_string(path)?;
    let settings = serde_yaml::from_str(&yaml)?;
    Ok(settings)
}

/// Import settings from JSON format.
pub fn import_json(path: &Path) -> Result<CropSettings> {
    let json = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&json)?;
    Ok(settings)
}

/// Import and validate settings, dispatching on the file extension.
pub fn load_settings(path: &Path) -> Result<CropSettings> {
    let extension = path.extension().and_then(|s| s.to_str());
    let settings = match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => bail!("Unsupported settings extension: {:?}", extension),
    }
    .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Export settings, choosing the format from the file extension.
pub fn save_settings(settings: &CropSettings, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => export_json(settings, path),
        _ => export_yaml(settings, path),
    }
    .with_context(|| format!("Failed to write settings to {}", path.display()))
}

/// Resolve the settings for this run: an explicit path wins, then the
/// default file in `dir` if it exists, then built-in defaults.
pub fn resolve_settings(explicit: Option<&Path>, dir: &Path) -> Result<CropSettings> {
    if let Some(path) = explicit {
        log::info!("Loading settings from {}", path.display());
        return load_settings(path);
    }

    let fallback = dir.join(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        log::info!("Loading settings from {}", fallback.display());
        return load_settings(&fallback);
    }

    log::debug!("No settings file found, using defaults");
    Ok(CropSettings::default())
}
