//! CLI subcommands — map setup, switch control, status and config.

mod config_cmd;
mod map_cmd;
mod status;
mod switch_cmd;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use redalert_lib::config::Config;
pub(super) use redalert_lib::error::{RedAlertError, Result};
pub(super) use redalert_lib::glow;
pub(super) use redalert_lib::map::{Capabilities, Cell, Fixture, MAX_MAP_SIDE};
pub(super) use redalert_lib::power::{PowerNetJournal, SwitchSignal};
pub(super) use redalert_lib::save::MapSnapshot;
pub(super) use redalert_lib::switch::{FlickState, SwitchAction};

pub(super) use crate::sound;

const PADDING: usize = 2;

/// Flags shared by every subcommand.
pub struct GlobalOpts {
    pub json: bool,
    pub config: Option<PathBuf>,
    pub state: Option<PathBuf>,
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w.saturating_sub(2));
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Config and snapshot plumbing ──

/// Load the config from `custom_path` or the default location, logging parse warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let Some(path) = custom_path else {
        return Config::load();
    };
    let (config, warnings) = Config::load_from(path);
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

/// Snapshot path: `--state`, then `state_file` from the config.
pub(super) fn resolve_state_path(opts: &GlobalOpts, config: &Config) -> Result<PathBuf> {
    opts.state
        .clone()
        .or_else(|| config.state_path())
        .ok_or_else(|| {
            RedAlertError::Config("no config directory found; pass --state PATH".into())
        })
}

/// A loaded map plus everything needed to act on it and write it back.
pub(super) struct Session {
    pub config: Config,
    pub state_path: PathBuf,
    pub snapshot: MapSnapshot,
    pub power_net: PowerNetJournal,
}

impl Session {
    pub(super) fn open(opts: &GlobalOpts) -> Result<Self> {
        let config = load_config(opts.config.as_deref());
        let state_path = resolve_state_path(opts, &config)?;
        let snapshot = MapSnapshot::load_from(&state_path)?;
        log::debug!(
            "loaded {} ({} fixtures, {} switches)",
            state_path.display(),
            snapshot.map.fixtures().len(),
            snapshot.switches.len()
        );
        Ok(Self {
            config,
            state_path,
            snapshot,
            power_net: PowerNetJournal::default(),
        })
    }

    pub(super) fn save(&self) -> Result<()> {
        self.snapshot.save_to(&self.state_path)
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct SwitchOutput {
    pub id: String,
    pub action: String,
    pub state: FlickState,
    pub transmitting: bool,
    pub power_net_notified: bool,
    pub overridden: usize,
}

#[derive(Serialize)]
pub(super) struct FixtureJson {
    pub id: String,
    pub x: i32,
    pub z: i32,
    pub color: String,
    pub glower: bool,
    pub powered: bool,
    /// Saved original while the alarm holds this fixture.
    pub original: Option<String>,
}

#[derive(Serialize)]
pub(super) struct SwitchJson {
    pub id: String,
    pub state: FlickState,
    pub transmitting: bool,
    pub inspect: String,
}

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub state_file: String,
    pub width: i32,
    pub height: i32,
    pub alarm_active: bool,
    pub switches: Vec<SwitchJson>,
    pub fixtures: Vec<FixtureJson>,
    pub override_registry: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub alarm_sound: String,
    pub files: ConfigFilesJson,
    pub problems: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct ConfigFilesJson {
    pub state_file: Option<String>,
    pub state_file_exists: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new, empty map snapshot
    Init {
        /// Map width in cells
        #[arg(long)]
        width: i32,
        /// Map height in cells
        #[arg(long)]
        height: i32,
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },

    /// Place a light fixture on the map
    PlaceFixture {
        /// Unique fixture id
        id: String,
        #[arg(long)]
        x: i32,
        #[arg(long)]
        z: i32,
        /// Glow color: hex (RRGGBB, RRGGBBAA, #, 0x) or a name like "blue"
        #[arg(long)]
        color: String,
        /// Fixture draws no power (never overridden by the alarm)
        #[arg(long)]
        unpowered: bool,
        /// Fixture does not glow
        #[arg(long)]
        dark: bool,
    },

    /// Place an alert switch (it flicks once on spawn)
    PlaceSwitch {
        /// Unique switch id
        id: String,
    },

    /// Flick an alert switch, as a colonist would
    Flick {
        /// Switch id
        id: String,
    },

    /// Deliver a raw flick signal to a switch (on, off, FlickedOn, FlickedOff)
    Signal {
        /// Switch id
        id: String,
        /// Signal to deliver
        signal: String,
    },

    /// Remove an alert switch, reverting the alarm if it is on
    RemoveSwitch {
        /// Switch id
        id: String,
    },

    /// Show switches, fixtures and the override registry
    Status,

    /// Show current configuration and file paths
    Config,
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, opts: &GlobalOpts) -> Result<()> {
    match cmd {
        Command::Init {
            width,
            height,
            force,
        } => {
            if opts.json {
                warn_json_unsupported("init");
            }
            map_cmd::cmd_init(opts, width, height, force)
        }
        Command::PlaceFixture {
            id,
            x,
            z,
            color,
            unpowered,
            dark,
        } => {
            if opts.json {
                warn_json_unsupported("place-fixture");
            }
            let fixture = map_cmd::FixtureArgs {
                id,
                cell: Cell::new(x, z),
                color,
                unpowered,
                dark,
            };
            map_cmd::cmd_place_fixture(opts, fixture)
        }
        Command::PlaceSwitch { id } => switch_cmd::cmd_place_switch(opts, &id),
        Command::Flick { id } => switch_cmd::cmd_flick(opts, &id),
        Command::Signal { id, signal } => switch_cmd::cmd_signal(opts, &id, &signal),
        Command::RemoveSwitch { id } => {
            if opts.json {
                warn_json_unsupported("remove-switch");
            }
            switch_cmd::cmd_remove_switch(opts, &id)
        }
        Command::Status => status::cmd_status(opts),
        Command::Config => config_cmd::cmd_config(opts),
    }
}
