//! Override registry — original glow colors of every fixture currently forced
//! to the alarm color on one map.
//!
//! The registry is map-wide, not per switch: two switches activating the
//! alarm share one set, and a fixture's original is saved at most once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::color::{Color32, format_color, parse_color};
use crate::error::Result;

/// Fixture id → original color encoded as `RRGGBB`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideRegistry {
    entries: BTreeMap<String, String>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `color` as the original of `id`, unless one is already saved.
    ///
    /// Returns `true` if an entry was inserted.
    pub fn save_if_absent(&mut self, id: &str, color: &Color32) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        self.entries.insert(id.to_string(), format_color(color));
        true
    }

    /// Remove the entry for `id` and decode it.
    ///
    /// An undecodable entry is removed all the same.
    pub fn take(&mut self, id: &str) -> Result<Option<Color32>> {
        match self.entries.remove(id) {
            Some(hex) => parse_color(&hex).map(Some),
            None => Ok(None),
        }
    }

    /// Decode the entry for `id` without removing it.
    pub fn get(&self, id: &str) -> Result<Option<Color32>> {
        match self.entries.get(id) {
            Some(hex) => parse_color(hex).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, encoded color)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Insert a raw encoded entry, bypassing the codec.
    ///
    /// Raw insert for tests and tools that need to seed an arbitrary value;
    /// malformed values surface later as restore failures.
    pub fn insert_raw(&mut self, id: &str, hex: &str) {
        self.entries.insert(id.to_string(), hex.to_string());
    }
}
