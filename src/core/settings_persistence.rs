//! Settings persistence
//!
//! Saves and loads [`CoachSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! `settings.json` in the user's configuration directory, e.g.
//! `~/.config/coachboard/settings.json`. Falls back to the working
//! directory if no config directory can be determined.
//!
//! # Error Handling
//!
//! - Load failures fall back to default settings with a warning
//! - Save failures are returned to the caller

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{info, warn};

use crate::core::error::CoreResult;
use crate::core::settings::CoachSettings;

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Path to `settings.json` in the user's configuration directory
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "coachboard") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Load settings from `path`, using defaults if it is missing or invalid
pub fn load_settings_from(path: &Path) -> CoachSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return CoachSettings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<CoachSettings>(&contents) {
            Ok(settings) => {
                info!("[SETTINGS] Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!(
                    "[SETTINGS] Failed to parse settings file at {:?}: {}. Using defaults.",
                    path, e
                );
                CoachSettings::default()
            }
        },
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to read settings file at {:?}: {}. Using defaults.",
                path, e
            );
            CoachSettings::default()
        }
    }
}

/// Write settings to `path`, creating parent directories as needed
pub fn save_settings_to(path: &Path, settings: &CoachSettings) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}

pub fn load_settings() -> CoachSettings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &CoachSettings) -> CoreResult<()> {
    save_settings_to(&settings_path(), settings)
}
