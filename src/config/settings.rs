// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Settings for cfglayer itself, read from `cfglayer.toml`.
//!
//! These are not the documents being layered; they only change where the
//! tool looks for documents and where it writes the generated accessor.

use crate::error::{CfgError, Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file names to search for, in order of priority.
const SETTINGS_FILES: &[&str] = &["cfglayer.toml", ".cfglayer.toml", ".config/cfglayer.toml"];

/// Name of the generated accessor file inside the source directory.
pub const GENERATED_FILE_NAME: &str = "cfglayer_auto_gen.rs";

/// Default name of the root accessor type.
pub const DEFAULT_ROOT_TYPE: &str = "Config";

/// Top-level settings structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Build settings.
    pub build: BuildSettings,

    /// UI/UX settings.
    pub ui: UiSettings,
}

/// Where documents live and where the accessor goes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    /// Directory holding the configuration documents (defaults to the current directory).
    pub source_dir: Option<PathBuf>,

    /// Output path for the generated accessor (defaults to a file in `source_dir`).
    pub output: Option<PathBuf>,

    /// Name of the root accessor type.
    pub root_type: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            source_dir: None,
            output: None,
            root_type: DEFAULT_ROOT_TYPE.to_string(),
        }
    }
}

impl BuildSettings {
    /// The document directory, falling back to the current directory.
    pub fn source_dir(&self) -> PathBuf {
        self.source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve relative paths against `base`, the directory the settings came from.
    pub fn anchor_to(&mut self, base: &Path) {
        for path in [self.source_dir.as_mut(), self.output.as_mut()]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// The output path, falling back to the conventional location in `source_dir`.
    pub fn output_for(&self, source_dir: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| source_dir.join(GENERATED_FILE_NAME))
    }
}

/// UI/UX settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    /// Whether to use colors.
    pub color: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Settings {
    /// Load settings from the default locations.
    pub fn load() -> Result<Self> {
        match find_settings_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No settings file found, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading settings from: {:?}", path);

        if !path.exists() {
            return Err(CfgError::Settings(SettingsError::NotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CfgError::Settings(SettingsError::ParseError {
                message: format!("Failed to read settings file: {}", e),
            })
        })?;

        let mut settings = parse_settings(&content)?;
        settings.build.anchor_to(&settings_root(path));
        Ok(settings)
    }
}

/// Directory that relative settings paths are resolved against.
///
/// A file under `.config/` belongs to the directory holding `.config`.
fn settings_root(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    match parent.file_name() {
        Some(name) if name == ".config" => parent.parent().unwrap_or(parent).to_path_buf(),
        _ => parent.to_path_buf(),
    }
}

/// Find the settings file in the current directory or its parents.
pub fn find_settings_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_settings_file_from(&current_dir)
}

/// Find the settings file starting from a specific directory.
pub fn find_settings_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for name in SETTINGS_FILES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    // Fall back to the user's home, then XDG config directory
    let home_settings = dirs::home_dir().map(|home| home.join(".cfglayer.toml"));
    let user_settings = dirs::config_dir().map(|dir| dir.join("cfglayer").join("config.toml"));
    [home_settings, user_settings]
        .into_iter()
        .flatten()
        .find(|path| path.is_file())
}

/// Parse settings from a TOML string.
pub fn parse_settings(content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| {
        CfgError::Settings(SettingsError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}
