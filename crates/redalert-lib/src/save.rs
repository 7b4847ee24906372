//! Map snapshots — JSON persistence of the map, its override registry and
//! the alert switches placed on it.
//!
//! Loading runs the cross-reference pass on every switch once all entities
//! are in memory, so confirmed switch states always follow their flick
//! mechanisms after a reload.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::MapContext;
use crate::error::{RedAlertError, Result};
use crate::glow::OverrideRegistry;
use crate::map::GridMap;
use crate::power::{AlarmSound, FlickSwitch, PowerNet};
use crate::switch::{AlertSwitch, SwitchAction};

/// Everything persisted for one map.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub map: GridMap,
    /// Originals of fixtures currently forced to the alarm color.
    #[serde(default)]
    pub override_registry: OverrideRegistry,
    #[serde(default)]
    pub switches: Vec<AlertSwitch>,
}

impl MapSnapshot {
    /// Empty snapshot of a `width × height` map.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            map: GridMap::new(width, height),
            ..Self::default()
        }
    }

    /// Parse a snapshot and resolve switch states against their mechanisms.
    ///
    /// Fixtures and switches go through the same checks as when they are
    /// placed: ids are unique across both and every fixture is in bounds.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: MapSnapshot = serde_json::from_str(json)?;
        snapshot.check_ids()?;
        for switch in &mut snapshot.switches {
            switch.resolve_cross_refs();
        }
        Ok(snapshot)
    }

    fn check_ids(&self) -> Result<()> {
        self.map.check()?;
        let mut seen = BTreeSet::new();
        for switch in &self.switches {
            if !seen.insert(switch.id()) || self.map.fixture(switch.id()).is_some() {
                return Err(RedAlertError::Duplicate(switch.id().to_string()));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot from `path`. A missing file yields an empty snapshot.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no snapshot at {}, starting empty", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let contents = self.to_json()?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &contents)?;
        if std::fs::rename(&tmp, path).is_err() {
            // Rename can fail across filesystems; fall back to direct write + cleanup
            let result = std::fs::write(path, &contents);
            let _ = std::fs::remove_file(&tmp);
            result?;
        }
        Ok(())
    }

    pub fn switch(&self, id: &str) -> Option<&AlertSwitch> {
        self.switches.iter().find(|s| s.id() == id)
    }

    /// Run `f` with one switch and a context over this map.
    pub fn with_switch<R>(
        &mut self,
        id: &str,
        power_net: &mut dyn PowerNet,
        sound: &dyn AlarmSound,
        f: impl FnOnce(&mut AlertSwitch, &mut MapContext<'_>) -> R,
    ) -> Result<R> {
        let switch = self
            .switches
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| RedAlertError::NotFound(id.to_string()))?;
        let mut ctx = MapContext::new(
            &mut self.map,
            &mut self.override_registry,
            power_net,
            sound,
        );
        Ok(f(switch, &mut ctx))
    }

    /// Place and spawn a new switch with a default flick mechanism.
    ///
    /// The flick requested at spawn is delivered straight away.
    pub fn place_switch(
        &mut self,
        id: &str,
        power_net: &mut dyn PowerNet,
        sound: &dyn AlarmSound,
    ) -> Result<SwitchAction> {
        if self.switch(id).is_some() || self.map.fixture(id).is_some() {
            return Err(RedAlertError::Duplicate(id.to_string()));
        }
        self.switches
            .push(AlertSwitch::new(id, FlickSwitch::default()));
        self.with_switch(id, power_net, sound, |switch, ctx| {
            match switch.spawn_setup() {
                Some(signal) => switch.receive_signal(signal, ctx),
                None => SwitchAction::NoChange,
            }
        })
    }

    /// Toggle a switch's flick mechanism and deliver the resulting signal.
    pub fn flick_switch(
        &mut self,
        id: &str,
        power_net: &mut dyn PowerNet,
        sound: &dyn AlarmSound,
    ) -> Result<SwitchAction> {
        self.with_switch(id, power_net, sound, |switch, ctx| match switch.toggle() {
            Some(signal) => switch.receive_signal(signal, ctx),
            None => SwitchAction::NoChange,
        })
    }

    /// Remove a switch, reverting the alarm first if it was on.
    pub fn remove_switch(
        &mut self,
        id: &str,
        power_net: &mut dyn PowerNet,
        sound: &dyn AlarmSound,
    ) -> Result<()> {
        let idx = self
            .switches
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| RedAlertError::NotFound(id.to_string()))?;
        let switch = self.switches.remove(idx);
        let mut ctx = MapContext::new(
            &mut self.map,
            &mut self.override_registry,
            power_net,
            sound,
        );
        switch.destroy(&mut ctx);
        Ok(())
    }
}
