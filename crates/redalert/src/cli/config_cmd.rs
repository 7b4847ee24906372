//! `config` subcommand — show current configuration and file paths.

use super::{
    Config, ConfigFilesJson, ConfigOutput, GlobalOpts, Result, glow, kv, kv_indent, kv_width,
    load_config, print_json, sound,
};

pub(super) fn cmd_config(opts: &GlobalOpts) -> Result<()> {
    let custom_path = opts.config.as_deref();
    let config = load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    let state_file = opts.state.clone().or_else(|| config.state_path());
    let state_file_exists = state_file.as_ref().is_some_and(|p| p.exists());

    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };
    let alarm_sound = sound::describe(&config);

    if opts.json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            alarm_sound: alarm_sound.to_string(),
            files: ConfigFilesJson {
                state_file: state_file.as_ref().map(|p| p.display().to_string()),
                state_file_exists,
            },
            problems,
        };
        return print_json(&output);
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &[
            "sound_enabled:",
            "alarm_sound_path:",
            "state_file:",
            "Alarm color:",
            "Alarm sound:",
            "State file:",
        ],
    );

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("sound_enabled:", config.sound_enabled, w);
    let or_default = |value: &str, default: &'static str| {
        if value.trim().is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };
    kv_indent(
        "alarm_sound_path:",
        or_default(&config.alarm_sound_path, "(built-in)"),
        w,
    );
    kv_indent("state_file:", or_default(&config.state_file, "(default)"), w);
    println!();

    println!("Alarm:");
    kv_indent(
        "Alarm color:",
        format_args!("{} (fixed)", glow::format_color(&glow::ALARM_COLOR)),
        w,
    );
    kv_indent("Alarm sound:", alarm_sound, w);
    println!();

    println!("Files:");
    match &state_file {
        Some(p) => {
            let status = if state_file_exists {
                "present"
            } else {
                "not found"
            };
            kv_indent("State file:", format_args!("{} ({status})", p.display()), w);
        }
        None => kv_indent("State file:", "(no config directory)", w),
    }

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}
