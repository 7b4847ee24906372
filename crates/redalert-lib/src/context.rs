//! Map context — the per-map services a switch transition touches.
//!
//! Bundles the glow map, the map's override registry, the power network and
//! the alarm sound so the engine and the switch never reach for globals.

use crate::glow::OverrideRegistry;
use crate::map::GlowMap;
use crate::power::{AlarmSound, PowerNet};

/// Borrowed services for one map during a single tick.
pub struct MapContext<'a> {
    pub map: &'a mut dyn GlowMap,
    pub registry: &'a mut OverrideRegistry,
    pub power_net: &'a mut dyn PowerNet,
    pub sound: &'a dyn AlarmSound,
}

impl<'a> MapContext<'a> {
    pub fn new(
        map: &'a mut dyn GlowMap,
        registry: &'a mut OverrideRegistry,
        power_net: &'a mut dyn PowerNet,
        sound: &'a dyn AlarmSound,
    ) -> Self {
        Self {
            map,
            registry,
            power_net,
            sound,
        }
    }

    /// Whether any fixture on this map is currently forced to the alarm color.
    pub fn alarm_active(&self) -> bool {
        !self.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glow::Color32;
    use crate::map::GridMap;
    use crate::power::{PowerNetJournal, SilentAlarm};

    #[test]
    fn alarm_active_follows_registry() {
        let mut map = GridMap::new(1, 1);
        let mut registry = OverrideRegistry::new();
        let mut net = PowerNetJournal::default();
        let sound = SilentAlarm;

        let ctx = MapContext::new(&mut map, &mut registry, &mut net, &sound);
        assert!(!ctx.alarm_active());

        registry.save_if_absent("lamp", &Color32::rgb(1, 2, 3));
        let ctx = MapContext::new(&mut map, &mut registry, &mut net, &sound);
        assert!(ctx.alarm_active());
    }
}
