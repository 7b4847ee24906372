//! Switch subcommands — place, flick, raw signal and remove.

use super::{
    GlobalOpts, RedAlertError, Result, Session, SwitchAction, SwitchOutput, SwitchSignal, kv,
    kv_width, print_json, sound,
};

/// Map a CLI signal word onto a raw component signal name.
fn signal_name(word: &str) -> &str {
    if word.eq_ignore_ascii_case("on") {
        "FlickedOn"
    } else if word.eq_ignore_ascii_case("off") {
        "FlickedOff"
    } else {
        word
    }
}

/// Save the session and report what a switch command did.
fn finish(session: &Session, id: &str, action: SwitchAction, json: bool) -> Result<()> {
    session.save()?;

    let switch = session
        .snapshot
        .switch(id)
        .ok_or_else(|| RedAlertError::NotFound(id.to_string()))?;
    let output = SwitchOutput {
        id: id.to_string(),
        action: action.to_string(),
        state: switch.state(),
        transmitting: switch.transmits_power_now(),
        power_net_notified: session.power_net.notifications.iter().any(|n| n == id),
        overridden: session.snapshot.override_registry.len(),
    };

    if json {
        return print_json(&output);
    }

    let w = kv_width(&["Switch:", "Action:", "State:", "Overridden:"], &[]);
    kv("Switch:", &output.id, w);
    kv("Action:", &output.action, w);
    kv("State:", switch.inspect_string(), w);
    kv("Overridden:", format_args!("{} fixtures", output.overridden), w);
    Ok(())
}

pub(super) fn cmd_place_switch(opts: &GlobalOpts, id: &str) -> Result<()> {
    let mut session = Session::open(opts)?;
    let alarm = sound::alarm_for(&session.config);
    let action = session
        .snapshot
        .place_switch(id, &mut session.power_net, alarm.as_ref())?;
    finish(&session, id, action, opts.json)
}

pub(super) fn cmd_flick(opts: &GlobalOpts, id: &str) -> Result<()> {
    let mut session = Session::open(opts)?;
    let alarm = sound::alarm_for(&session.config);
    let action = session
        .snapshot
        .flick_switch(id, &mut session.power_net, alarm.as_ref())?;
    finish(&session, id, action, opts.json)
}

pub(super) fn cmd_signal(opts: &GlobalOpts, id: &str, signal: &str) -> Result<()> {
    let name = signal_name(signal);
    if name.parse::<SwitchSignal>().is_err() {
        log::warn!("unknown signal `{signal}`, the switch will ignore it");
    }

    let mut session = Session::open(opts)?;
    let alarm = sound::alarm_for(&session.config);
    let action = session.snapshot.with_switch(
        id,
        &mut session.power_net,
        alarm.as_ref(),
        |switch, ctx| switch.receive_signal_str(name, ctx),
    )?;
    finish(&session, id, action, opts.json)
}

pub(super) fn cmd_remove_switch(opts: &GlobalOpts, id: &str) -> Result<()> {
    let mut session = Session::open(opts)?;
    let alarm = sound::alarm_for(&session.config);
    session
        .snapshot
        .remove_switch(id, &mut session.power_net, alarm.as_ref())?;
    session.save()?;
    println!("Removed switch {id}");
    Ok(())
}
