//! Power-side collaborators — flick mechanism, power network, alarm sound.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Signals ──

/// Signal a flick mechanism broadcasts to its parent device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSignal {
    FlickedOn,
    FlickedOff,
}

impl SwitchSignal {
    pub fn for_state(on: bool) -> Self {
        if on {
            SwitchSignal::FlickedOn
        } else {
            SwitchSignal::FlickedOff
        }
    }
}

impl fmt::Display for SwitchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchSignal::FlickedOn => write!(f, "FlickedOn"),
            SwitchSignal::FlickedOff => write!(f, "FlickedOff"),
        }
    }
}

impl FromStr for SwitchSignal {
    type Err = String;

    /// Parse a raw component signal name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, String> {
        if s.eq_ignore_ascii_case("FlickedOn") {
            Ok(SwitchSignal::FlickedOn)
        } else if s.eq_ignore_ascii_case("FlickedOff") {
            Ok(SwitchSignal::FlickedOff)
        } else {
            Err(format!("unknown switch signal: {s}"))
        }
    }
}

// ── Traits ──

/// Toggle capability attached to a device.
pub trait FlickMechanism {
    fn switch_is_on(&self) -> bool;
    /// Toggle the switch and return the signal it broadcasts.
    fn do_flick(&mut self) -> SwitchSignal;
}

/// The power network the switch transmits through.
pub trait PowerNet {
    fn notify_transmitter_output_changed(&mut self, transmitter_id: &str);
}

/// One-shot alarm sound. Fire-and-forget.
pub trait AlarmSound {
    fn play_one_shot(&self);
}

// ── Shipped implementations ──

/// Plain two-state flick component.
///
/// Defaults to on, so the flick requested at spawn leaves a fresh switch off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickSwitch {
    switch_on: bool,
}

impl FlickSwitch {
    pub fn new(switch_on: bool) -> Self {
        Self { switch_on }
    }
}

impl Default for FlickSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FlickMechanism for FlickSwitch {
    fn switch_is_on(&self) -> bool {
        self.switch_on
    }

    fn do_flick(&mut self) -> SwitchSignal {
        self.switch_on = !self.switch_on;
        SwitchSignal::for_state(self.switch_on)
    }
}

/// Power network that records which transmitters changed output.
#[derive(Debug, Default)]
pub struct PowerNetJournal {
    pub notifications: Vec<String>,
}

impl PowerNet for PowerNetJournal {
    fn notify_transmitter_output_changed(&mut self, transmitter_id: &str) {
        log::debug!("power net: transmitter {transmitter_id} output changed");
        self.notifications.push(transmitter_id.to_string());
    }
}

/// Alarm sound that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarm;

impl AlarmSound for SilentAlarm {
    fn play_one_shot(&self) {}
}

// ── Test doubles ──

/// Counting doubles for unit and integration tests.
pub mod mock {
    use super::*;
    use std::cell::Cell;

    /// Flick mechanism that counts `do_flick` calls.
    #[derive(Debug, Default)]
    pub struct CountingFlick {
        pub on: bool,
        pub flicks: u32,
    }

    impl CountingFlick {
        pub fn new(on: bool) -> Self {
            Self { on, flicks: 0 }
        }
    }

    impl FlickMechanism for CountingFlick {
        fn switch_is_on(&self) -> bool {
            self.on
        }

        fn do_flick(&mut self) -> SwitchSignal {
            self.flicks += 1;
            self.on = !self.on;
            SwitchSignal::for_state(self.on)
        }
    }

    /// Alarm sound that counts plays.
    #[derive(Debug, Default)]
    pub struct CountingAlarm {
        plays: Cell<u32>,
    }

    impl CountingAlarm {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn plays(&self) -> u32 {
            self.plays.get()
        }
    }

    impl AlarmSound for CountingAlarm {
        fn play_one_shot(&self) {
            self.plays.set(self.plays.get() + 1);
        }
    }
}
