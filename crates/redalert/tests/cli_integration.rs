//! Integration tests for the `redalert-cli` binary.
//!
//! Each test works on a snapshot and config inside its own temp dir, so the
//! user's real config directory is never touched.

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("redalert-cli")
}

/// A temp dir holding `config.toml` (sound off) and `state.json`.
struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "sound_enabled = false\n").unwrap();
        Self { dir }
    }

    fn state(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cli();
        cmd.arg("--config")
            .arg(self.config())
            .arg("--state")
            .arg(self.state());
        cmd
    }

    fn run(&self, args: &[&str]) {
        self.cmd().args(args).assert().success();
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("--json should produce valid JSON")
    }

    /// 3×1 map with a blue, a red and a green lamp.
    fn with_three_lamps(self) -> Self {
        self.run(&["init", "--width", "3", "--height", "1"]);
        self.run(&["place-fixture", "blue", "--x", "0", "--z", "0", "--color", "0000FF"]);
        self.run(&["place-fixture", "red", "--x", "1", "--z", "0", "--color", "red"]);
        self.run(&["place-fixture", "green", "--x", "2", "--z", "0", "--color", "#00FF00"]);
        self
    }
}

fn fixture_color(status: &serde_json::Value, id: &str) -> String {
    status["fixtures"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == id)
        .map(|f| f["color"].as_str().unwrap().to_string())
        .unwrap()
}

// ── Basics ──

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("redalert-cli"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_verbose_flag_accepted() {
    let ws = Workspace::new();
    ws.cmd().args(["-v", "config"]).assert().success();
    ws.cmd().args(["--verbose", "config"]).assert().success();
}

#[test]
fn cli_config_json_produces_valid_json() {
    let ws = Workspace::new();
    let json = ws.json(&["config"]);
    assert!(json["settings"].is_object());
    assert_eq!(json["settings"]["sound_enabled"], false);
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["alarm_sound"], "off");
    assert!(json["problems"].as_array().unwrap().is_empty());
}

// ── Map setup ──

#[test]
fn init_creates_snapshot() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["init", "--width", "4", "--height", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 4 × 2 map"));
    assert!(ws.state().exists());

    let status = ws.json(&["status"]);
    assert_eq!(status["width"], 4);
    assert_eq!(status["height"], 2);
    assert_eq!(status["alarm_active"], false);
}

#[test]
fn init_twice_needs_force() {
    let ws = Workspace::new();
    ws.run(&["init", "--width", "2", "--height", "2"]);
    ws.cmd()
        .args(["init", "--width", "2", "--height", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    ws.run(&["init", "--width", "2", "--height", "2", "--force"]);
}

#[test]
fn place_fixture_rejects_bad_color() {
    let ws = Workspace::new();
    ws.run(&["init", "--width", "2", "--height", "2"]);
    ws.cmd()
        .args(["place-fixture", "lamp", "--x", "0", "--z", "0", "--color", "ZZ00FF"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn place_fixture_out_of_bounds_fails() {
    let ws = Workspace::new();
    ws.run(&["init", "--width", "2", "--height", "2"]);
    ws.cmd()
        .args(["place-fixture", "lamp", "--x", "5", "--z", "0", "--color", "blue"])
        .assert()
        .failure();
}

// ── Alarm cycle ──

#[test]
fn flick_cycle_recolors_and_restores() {
    let ws = Workspace::new().with_three_lamps();

    let placed = ws.json(&["place-switch", "sw"]);
    assert_eq!(placed["state"], "off");
    assert_eq!(placed["action"], "no change");

    let on = ws.json(&["flick", "sw"]);
    assert_eq!(on["action"], "activated");
    assert_eq!(on["state"], "on");
    assert_eq!(on["power_net_notified"], true);
    assert_eq!(on["overridden"], 2);

    let status = ws.json(&["status"]);
    assert_eq!(status["alarm_active"], true);
    assert_eq!(fixture_color(&status, "blue"), "FF0000");
    assert_eq!(fixture_color(&status, "green"), "FF0000");
    assert_eq!(status["override_registry"]["blue"], "0000FF");
    assert!(status["override_registry"]["red"].is_null());

    let off = ws.json(&["flick", "sw"]);
    assert_eq!(off["action"], "deactivated");
    assert_eq!(off["overridden"], 0);

    let status = ws.json(&["status"]);
    assert_eq!(status["alarm_active"], false);
    assert_eq!(fixture_color(&status, "blue"), "0000FF");
    assert_eq!(fixture_color(&status, "red"), "FF0000");
    assert_eq!(fixture_color(&status, "green"), "00FF00");
}

#[test]
fn echoed_signal_is_ignored() {
    let ws = Workspace::new().with_three_lamps();
    ws.run(&["place-switch", "sw"]);

    let echo = ws.json(&["signal", "sw", "off"]);
    assert_eq!(echo["action"], "no change");
    assert_eq!(echo["power_net_notified"], false);

    let unknown = ws.json(&["signal", "sw", "Explode"]);
    assert_eq!(unknown["action"], "no change");
}

#[test]
fn raw_signal_on_applies_alarm() {
    let ws = Workspace::new().with_three_lamps();
    ws.run(&["place-switch", "sw"]);

    let on = ws.json(&["signal", "sw", "FLICKEDON"]);
    assert_eq!(on["action"], "activated");
    // The mechanism itself was not flicked
    assert_eq!(on["transmitting"], false);
    assert_eq!(fixture_color(&ws.json(&["status"]), "blue"), "FF0000");
}

#[test]
fn remove_switch_while_on_restores_colors() {
    let ws = Workspace::new().with_three_lamps();
    ws.run(&["place-switch", "sw"]);
    ws.run(&["flick", "sw"]);

    ws.cmd()
        .args(["remove-switch", "sw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed switch sw"));

    let status = ws.json(&["status"]);
    assert!(status["switches"].as_array().unwrap().is_empty());
    assert_eq!(fixture_color(&status, "blue"), "0000FF");
    assert_eq!(status["alarm_active"], false);
}

#[test]
fn unknown_switch_is_an_error() {
    let ws = Workspace::new().with_three_lamps();
    ws.cmd()
        .args(["flick", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such thing on the map: ghost"));
}

#[test]
fn duplicate_switch_is_an_error() {
    let ws = Workspace::new().with_three_lamps();
    ws.run(&["place-switch", "sw"]);
    ws.cmd()
        .args(["place-switch", "sw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Id already in use: sw"));
    ws.cmd().args(["place-switch", "blue"]).assert().failure();
}

#[test]
fn status_human_output() {
    let ws = Workspace::new().with_three_lamps();
    ws.run(&["place-switch", "sw"]);
    ws.run(&["flick", "sw"]);
    ws.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("active (2 overridden)"))
        .stdout(predicate::str::contains("Alarm: on"))
        .stdout(predicate::str::contains("was 0000FF"));
}
