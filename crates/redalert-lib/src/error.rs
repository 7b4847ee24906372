//! Unified error type for the redalert-lib crate.
//!
//! [`RedAlertError`] covers color decoding, snapshot persistence and
//! configuration problems. `From` impls allow `?` to propagate I/O and JSON
//! errors without manual mapping.

use std::fmt;

/// Unified error type for redalert-lib operations.
#[derive(Debug)]
pub enum RedAlertError {
    /// Malformed hex color string.
    Color(String),
    /// Standard I/O error (snapshot or config file read/write).
    Io(std::io::Error),
    /// Snapshot (de)serialization error.
    Save(serde_json::Error),
    /// Configuration validation error.
    Config(String),
    /// A switch or fixture id that does not exist on the map.
    NotFound(String),
    /// A switch or fixture id that is already taken on the map.
    Duplicate(String),
}

impl fmt::Display for RedAlertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedAlertError::Color(e) => write!(f, "Color error: {e}"),
            RedAlertError::Io(e) => write!(f, "I/O error: {e}"),
            RedAlertError::Save(e) => write!(f, "Snapshot error: {e}"),
            RedAlertError::Config(e) => write!(f, "Config error: {e}"),
            RedAlertError::NotFound(id) => write!(f, "No such thing on the map: {id}"),
            RedAlertError::Duplicate(id) => write!(f, "Id already in use: {id}"),
        }
    }
}

impl std::error::Error for RedAlertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RedAlertError::Io(e) => Some(e),
            RedAlertError::Save(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RedAlertError {
    fn from(e: std::io::Error) -> Self {
        RedAlertError::Io(e)
    }
}

impl From<serde_json::Error> for RedAlertError {
    fn from(e: serde_json::Error) -> Self {
        RedAlertError::Save(e)
    }
}

/// Crate-level Result alias using [`RedAlertError`].
pub type Result<T> = std::result::Result<T, RedAlertError>;
