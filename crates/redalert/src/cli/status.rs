//! `status` subcommand — show switches, fixtures and the override registry.

use std::collections::BTreeMap;

use super::{
    Capabilities, FixtureJson, GlobalOpts, MapSnapshot, Result, Session, StatusOutput, SwitchJson,
    glow, kv, kv_indent, kv_width, print_json,
};

/// Collect the status of a loaded snapshot.
fn collect_status(snapshot: &MapSnapshot, state_file: String) -> StatusOutput {
    let registry = &snapshot.override_registry;
    let override_registry: BTreeMap<String, String> = registry
        .iter()
        .map(|(id, hex)| (id.to_string(), hex.to_string()))
        .collect();

    let switches = snapshot
        .switches
        .iter()
        .map(|s| SwitchJson {
            id: s.id().to_string(),
            state: s.state(),
            transmitting: s.transmits_power_now(),
            inspect: s.inspect_string(),
        })
        .collect();

    let fixtures = snapshot
        .map
        .fixtures()
        .iter()
        .map(|f| FixtureJson {
            id: f.id.clone(),
            x: f.position.x,
            z: f.position.z,
            color: glow::format_color(&f.color),
            glower: f.is_glower(),
            powered: f.capabilities.contains(Capabilities::POWER_TRADER),
            original: override_registry.get(&f.id).cloned(),
        })
        .collect();

    StatusOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        state_file,
        width: snapshot.map.width(),
        height: snapshot.map.height(),
        alarm_active: !registry.is_empty(),
        switches,
        fixtures,
        override_registry,
    }
}

/// Describe a fixture's capabilities in a couple of words.
fn fixture_kind(f: &FixtureJson) -> &'static str {
    match (f.glower, f.powered) {
        (true, true) => "lit, powered",
        (true, false) => "lit, unpowered",
        (false, true) => "dark, powered",
        (false, false) => "dark",
    }
}

fn print_status(status: &StatusOutput) {
    let ids: Vec<&str> = status
        .switches
        .iter()
        .map(|s| s.id.as_str())
        .chain(status.fixtures.iter().map(|f| f.id.as_str()))
        .collect();
    let w = kv_width(
        &["Version:", "State file:", "Map:", "Alarm:", "Switches:", "Fixtures:"],
        &ids,
    );
    kv("Version:", &status.version, w);
    kv("State file:", &status.state_file, w);
    kv("Map:", format_args!("{} × {}", status.width, status.height), w);
    if status.alarm_active {
        kv(
            "Alarm:",
            format_args!("active ({} overridden)", status.override_registry.len()),
            w,
        );
    } else {
        kv("Alarm:", "inactive", w);
    }
    println!();

    if status.switches.is_empty() {
        kv("Switches:", "(none)", w);
    } else {
        println!("Switches:");
        for s in &status.switches {
            kv_indent(&s.id, format_args!("{} [{}]", s.state, s.inspect), w);
        }
    }
    println!();

    if status.fixtures.is_empty() {
        kv("Fixtures:", "(none)", w);
        return;
    }
    println!("Fixtures:");
    for f in &status.fixtures {
        let saved = match &f.original {
            Some(hex) => format!(", was {hex}"),
            None => String::new(),
        };
        kv_indent(
            &f.id,
            format_args!("({}, {})  {}  {}{saved}", f.x, f.z, f.color, fixture_kind(f)),
            w,
        );
    }
}

pub(super) fn cmd_status(opts: &GlobalOpts) -> Result<()> {
    let session = Session::open(opts)?;
    let status = collect_status(&session.snapshot, session.state_path.display().to_string());
    if opts.json {
        return print_json(&status);
    }
    print_status(&status);
    Ok(())
}
