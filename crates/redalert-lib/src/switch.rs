//! Alert switch state machine — flick signals in, alarm passes out.
//!
//! The switch tracks its own confirmed state separately from the flick
//! mechanism so echoed or duplicate signals are ignored. Only a real
//! transition notifies the power network and runs an alarm pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::MapContext;
use crate::glow;
use crate::power::{FlickMechanism, FlickSwitch, SwitchSignal};

/// Confirmed switch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlickState {
    /// Never flicked; only seen between placement and spawn.
    #[default]
    Unset,
    Off,
    On,
}

impl fmt::Display for FlickState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlickState::Unset => write!(f, "unset"),
            FlickState::Off => write!(f, "off"),
            FlickState::On => write!(f, "on"),
        }
    }
}

/// What a signal did to the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    /// Entered `On`; the alarm was applied.
    Activated,
    /// Entered `Off`; the alarm was reverted.
    Deactivated,
    /// Signal ignored.
    NoChange,
}

impl fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchAction::Activated => write!(f, "activated"),
            SwitchAction::Deactivated => write!(f, "deactivated"),
            SwitchAction::NoChange => write!(f, "no change"),
        }
    }
}

/// A placed alert switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSwitch<F = FlickSwitch> {
    id: String,
    #[serde(default)]
    state: FlickState,
    flick: Option<F>,
}

impl<F: FlickMechanism> AlertSwitch<F> {
    /// A freshly placed switch with its flick mechanism.
    pub fn new(id: impl Into<String>, flick: F) -> Self {
        Self {
            id: id.into(),
            state: FlickState::Unset,
            flick: Some(flick),
        }
    }

    /// A switch whose flick mechanism is missing.
    pub fn without_flick(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: FlickState::Unset,
            flick: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> FlickState {
        self.state
    }

    pub fn flick(&self) -> Option<&F> {
        self.flick.as_ref()
    }

    /// Settle a never-flicked switch into a definite state.
    ///
    /// Marks the switch `Off` and requests exactly one flick. The signal the
    /// mechanism broadcasts is returned for the host to deliver through
    /// [`receive_signal`](Self::receive_signal). Later calls do nothing.
    pub fn spawn_setup(&mut self) -> Option<SwitchSignal> {
        if self.state != FlickState::Unset {
            return None;
        }
        self.state = FlickState::Off;
        match self.flick.as_mut() {
            Some(flick) => Some(flick.do_flick()),
            None => {
                log::warn!("switch {} spawned without a flick mechanism", self.id);
                None
            }
        }
    }

    /// Toggle the flick mechanism, as a colonist would.
    ///
    /// Returns the broadcast signal, or `None` without a mechanism.
    pub fn toggle(&mut self) -> Option<SwitchSignal> {
        self.flick.as_mut().map(|f| f.do_flick())
    }

    /// Whether the switch transmits power right now.
    pub fn transmits_power_now(&self) -> bool {
        self.flick.as_ref().is_some_and(|f| f.switch_is_on())
    }

    /// Gate a signal against the confirmed state and record the transition.
    ///
    /// `FlickedOff` only counts while `On` and `FlickedOn` only while `Off`;
    /// everything else is an echo.
    pub fn update(&mut self, signal: SwitchSignal) -> SwitchAction {
        match (signal, self.state) {
            (SwitchSignal::FlickedOff, FlickState::On) => {
                self.state = FlickState::Off;
                SwitchAction::Deactivated
            }
            (SwitchSignal::FlickedOn, FlickState::Off) => {
                self.state = FlickState::On;
                SwitchAction::Activated
            }
            _ => SwitchAction::NoChange,
        }
    }

    /// Handle a flick signal: gate it, then notify the power network and run
    /// the matching alarm pass.
    pub fn receive_signal(
        &mut self,
        signal: SwitchSignal,
        ctx: &mut MapContext<'_>,
    ) -> SwitchAction {
        let action = self.update(signal);
        match action {
            SwitchAction::Activated => {
                log::info!("switch {}: alarm on", self.id);
                ctx.power_net.notify_transmitter_output_changed(&self.id);
                glow::apply_alarm(ctx);
            }
            SwitchAction::Deactivated => {
                log::info!("switch {}: alarm off", self.id);
                ctx.power_net.notify_transmitter_output_changed(&self.id);
                glow::revert_alarm(ctx, true);
            }
            SwitchAction::NoChange => {
                log::debug!("switch {}: ignored {signal} in {:?}", self.id, self.state);
            }
        }
        action
    }

    /// Handle a raw component signal name. Unknown names are ignored.
    pub fn receive_signal_str(
        &mut self,
        signal: &str,
        ctx: &mut MapContext<'_>,
    ) -> SwitchAction {
        match signal.parse::<SwitchSignal>() {
            Ok(signal) => self.receive_signal(signal, ctx),
            Err(e) => {
                log::debug!("switch {}: {e}", self.id);
                SwitchAction::NoChange
            }
        }
    }

    /// Re-derive the confirmed state from the flick mechanism after a load.
    ///
    /// Run once every entity is loaded. Without a mechanism the loaded state
    /// is kept.
    pub fn resolve_cross_refs(&mut self) {
        if let Some(flick) = self.flick.as_ref() {
            self.state = if flick.switch_is_on() {
                FlickState::On
            } else {
                FlickState::Off
            };
        }
    }

    /// Tear the switch down, reverting the alarm first if it is on.
    pub fn destroy(self, ctx: &mut MapContext<'_>) {
        if self.state == FlickState::On {
            log::info!("switch {} removed while on, reverting alarm", self.id);
            glow::revert_alarm(ctx, true);
        }
    }

    /// One-line status for the inspect pane.
    pub fn inspect_string(&self) -> String {
        let on = self.transmits_power_now();
        format!("Alarm: {}", if on { "on" } else { "off" })
    }
}
