//! Host configuration — TOML-based, platform-aware paths.
//!
//! The alarm color itself is fixed; only the surroundings are configurable.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# RedAlert configuration — changes made outside the app may be overwritten.\n\n";

/// Largest custom alarm sound accepted (bytes).
pub const MAX_SOUND_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Play the alarm sound when the switch turns on.
    #[serde(default = "default_true")]
    pub sound_enabled: bool,

    /// Path to a custom alarm WAV file. Empty = built-in tone.
    #[serde(default)]
    pub alarm_sound_path: String,

    /// Map snapshot file. Empty = `state.json` in the config directory.
    #[serde(default)]
    pub state_file: String,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sound_enabled: true,
            alarm_sound_path: String::new(),
            state_file: String::new(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `alarm_sound_path` is set but unusable.
    InvalidSoundPath(String),
    /// `state_file` points at a directory.
    StateFileIsDirectory(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidSoundPath(e) => write!(f, "Invalid alarm_sound_path: {e}"),
            ValidationError::StateFileIsDirectory(p) => {
                write!(f, "Invalid state_file: {p} is a directory")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("redalert"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Snapshot path: `state_file` if set, else the default in the config dir.
    pub fn state_path(&self) -> Option<PathBuf> {
        let configured = self.state_file.trim();
        if configured.is_empty() {
            Self::dir().map(|d| d.join("state.json"))
        } else {
            Some(PathBuf::from(configured))
        }
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Validate a sound file path. Empty = built-in (always Ok).
    /// Checks: file exists, .wav extension, size <= max_size_bytes.
    pub fn validate_sound_path(path: &str, max_size_bytes: u64) -> crate::error::Result<()> {
        let path = path.trim();
        if path.is_empty() {
            return Ok(());
        }
        let p = Path::new(path);
        if !p.exists() {
            return Err(crate::RedAlertError::Config(format!(
                "File not found: {path}"
            )));
        }
        match p.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("wav") => {}
            _ => {
                return Err(crate::RedAlertError::Config(format!(
                    "Not a .wav file: {path}"
                )));
            }
        }
        let meta = std::fs::metadata(p)?;
        if meta.len() > max_size_bytes {
            return Err(crate::RedAlertError::Config(format!(
                "File too large: {} bytes (max {max_size_bytes})",
                meta.len()
            )));
        }
        Ok(())
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_sound_path(&self.alarm_sound_path, MAX_SOUND_BYTES) {
            errors.push(ValidationError::InvalidSoundPath(e.to_string()));
        }

        let state_file = self.state_file.trim();
        if !state_file.is_empty() && Path::new(state_file).is_dir() {
            errors.push(ValidationError::StateFileIsDirectory(state_file.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
