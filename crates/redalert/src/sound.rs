//! Alarm sound backends for the command-line host.
//!
//! The default build rings the terminal bell. With the `audio` feature the
//! alarm is a short two-tone klaxon (or a custom WAV) played through rodio.

use std::io::Write;

use redalert_lib::config::Config;
use redalert_lib::power::{AlarmSound, SilentAlarm};

/// Rings the terminal bell on stderr, leaving stdout clean for `--json`.
pub(crate) struct TerminalBell;

impl AlarmSound for TerminalBell {
    fn play_one_shot(&self) {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

/// Human-readable name of the sound `alarm_for` would pick.
pub(crate) fn describe(config: &Config) -> &'static str {
    if !config.sound_enabled {
        "off"
    } else if cfg!(feature = "audio") {
        if config.alarm_sound_path.trim().is_empty() {
            "built-in tone"
        } else {
            "custom WAV"
        }
    } else {
        "terminal bell"
    }
}

/// Pick the alarm sound for this run.
pub(crate) fn alarm_for(config: &Config) -> Box<dyn AlarmSound> {
    if !config.sound_enabled {
        log::debug!("[sound] disabled in config");
        return Box::new(SilentAlarm);
    }
    #[cfg(feature = "audio")]
    if let Some(tone) = tone::RodioAlarm::open(&config.alarm_sound_path) {
        return Box::new(tone);
    }
    Box::new(TerminalBell)
}

#[cfg(feature = "audio")]
mod tone {
    use std::io::Cursor;
    use std::time::Duration;

    use rodio::source::SineWave;
    use rodio::{Decoder, OutputStream, Sink, Source};

    use redalert_lib::power::AlarmSound;

    const KLAXON_HZ: [f32; 3] = [880.0, 660.0, 880.0];
    const KLAXON_STEP: Duration = Duration::from_millis(220);

    /// Plays through the default output device.
    ///
    /// Dropping the alarm waits for queued sound to finish, so a short-lived
    /// CLI run is not cut off mid-klaxon.
    pub(crate) struct RodioAlarm {
        _stream: OutputStream,
        sink: Sink,
        custom: Option<Vec<u8>>,
    }

    impl RodioAlarm {
        /// Open the default output. Returns `None` on headless systems.
        pub(crate) fn open(custom_path: &str) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("could not open audio output: {e}");
                    return None;
                }
            };
            let sink = Sink::try_new(&handle).ok()?;
            Some(Self {
                _stream: stream,
                sink,
                custom: load_custom(custom_path),
            })
        }
    }

    impl AlarmSound for RodioAlarm {
        fn play_one_shot(&self) {
            if let Some(data) = &self.custom {
                match Decoder::new(Cursor::new(data.clone())) {
                    Ok(source) => {
                        self.sink.append(source);
                        return;
                    }
                    Err(e) => log::warn!("[sound] custom alarm failed to decode: {e}"),
                }
            }
            for hz in KLAXON_HZ {
                self.sink
                    .append(SineWave::new(hz).take_duration(KLAXON_STEP).amplify(0.2));
            }
        }
    }

    impl Drop for RodioAlarm {
        fn drop(&mut self) {
            self.sink.sleep_until_end();
        }
    }

    /// Read a custom WAV, falling back to the built-in klaxon on any error.
    pub(super) fn load_custom(path: &str) -> Option<Vec<u8>> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        match std::fs::read(path) {
            Ok(data) => {
                if Decoder::new(Cursor::new(data.clone())).is_ok() {
                    Some(data)
                } else {
                    log::warn!("[sound] {path} is not a valid WAV file, using built-in");
                    None
                }
            }
            Err(e) => {
                log::warn!("[sound] could not read {path}: {e}, using built-in");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_disabled() {
        let config = Config {
            sound_enabled: false,
            ..Config::default()
        };
        assert_eq!(describe(&config), "off");
    }

    #[cfg(not(feature = "audio"))]
    #[test]
    fn describe_default_build_uses_bell() {
        assert_eq!(describe(&Config::default()), "terminal bell");
    }

    #[cfg(feature = "audio")]
    #[test]
    fn describe_audio_build() {
        assert_eq!(describe(&Config::default()), "built-in tone");
        let config = Config {
            alarm_sound_path: "/tmp/klaxon.wav".into(),
            ..Config::default()
        };
        assert_eq!(describe(&config), "custom WAV");
    }

    #[cfg(feature = "audio")]
    #[test]
    fn load_custom_empty_path_is_builtin() {
        assert!(tone::load_custom("  ").is_none());
    }

    #[cfg(feature = "audio")]
    #[test]
    fn load_custom_rejects_non_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarm.wav");
        std::fs::write(&path, b"this is not wav data").unwrap();
        assert!(tone::load_custom(path.to_str().unwrap()).is_none());
    }

    #[cfg(feature = "audio")]
    #[test]
    fn load_custom_missing_file_is_builtin() {
        assert!(tone::load_custom("/nonexistent/alarm.wav").is_none());
    }
}
