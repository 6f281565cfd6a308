// Configuration loading and parsing (spincast.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::planner::RevolutionRange;
use crate::speech::VoiceSettings;

/// Name of the config file inside `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "spincast.toml";

pub const DEFAULT_SPIN_DURATION_MS: u64 = 5000;
pub const DEFAULT_RECAP_LEN: usize = 10;
pub const DEFAULT_LIST: &str = "Red\nOrange\nYellow\nGreen\nBlue\nIndigo\nViolet\nPink";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub wheel: WheelConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

// ---------------------------------------------------------------------------
// [wheel]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WheelConfig {
    /// Animation length; the settle timer uses the same value.
    pub spin_duration_ms: u64,
    pub min_revolutions: u32,
    pub max_revolutions: u32,
    #[serde(default)]
    pub remove_after_pick: bool,
    #[serde(default = "default_true")]
    pub auto_speak: bool,
    #[serde(default = "default_recap_len")]
    pub recap_len: usize,
    /// Newline-delimited items loaded at startup.
    #[serde(default = "default_list")]
    pub default_list: String,
}

impl Default for WheelConfig {
    fn default() -> Self {
        let revolutions = RevolutionRange::default();
        WheelConfig {
            spin_duration_ms: DEFAULT_SPIN_DURATION_MS,
            min_revolutions: revolutions.min,
            max_revolutions: revolutions.max,
            remove_after_pick: false,
            auto_speak: true,
            recap_len: DEFAULT_RECAP_LEN,
            default_list: DEFAULT_LIST.to_string(),
        }
    }
}

impl WheelConfig {
    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn revolutions(&self) -> RevolutionRange {
        RevolutionRange {
            min: self.min_revolutions,
            max: self.max_revolutions,
        }
    }
}

// ---------------------------------------------------------------------------
// [speech]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Synthesizer binary override; auto-detected when absent.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_one")]
    pub rate: f32,
    #[serde(default = "default_one")]
    pub pitch: f32,
    #[serde(default = "default_one")]
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig {
            enabled: true,
            command: None,
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeechConfig {
    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            voice: self.voice.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

fn default_recap_len() -> usize {
    DEFAULT_RECAP_LEN
}

fn default_list() -> String {
    DEFAULT_LIST.to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/spincast.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse config text; `path` is only used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let wheel = &config.wheel;

    if wheel.spin_duration_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "wheel.spin_duration_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    // At least one full turn keeps every target strictly ahead of the
    // current rotation.
    if wheel.min_revolutions == 0 {
        return Err(ConfigError::ValidationError {
            field: "wheel.min_revolutions".into(),
            message: "must be at least 1".into(),
        });
    }

    if wheel.max_revolutions < wheel.min_revolutions {
        return Err(ConfigError::ValidationError {
            field: "wheel.max_revolutions".into(),
            message: format!(
                "must be >= min_revolutions ({}), got {}",
                wheel.min_revolutions, wheel.max_revolutions
            ),
        });
    }

    if wheel.recap_len == 0 {
        return Err(ConfigError::ValidationError {
            field: "wheel.recap_len".into(),
            message: "must be greater than 0".into(),
        });
    }

    let speech = &config.speech;
    let ranges: &[(&str, f32, f32, f32)] = &[
        ("speech.rate", speech.rate, VoiceSettings::RATE_MIN, VoiceSettings::RATE_MAX),
        ("speech.pitch", speech.pitch, VoiceSettings::PITCH_MIN, VoiceSettings::PITCH_MAX),
        ("speech.volume", speech.volume, VoiceSettings::VOLUME_MIN, VoiceSettings::VOLUME_MAX),
    ];
    for (name, val, min, max) in ranges {
        if !(*min..=*max).contains(val) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be between {min} and {max} inclusive, got {val}"),
            });
        }
    }

    if speech.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "speech.command".into(),
            message: "must not be blank when set".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        assert!(
            root.join("defaults").exists(),
            "Cannot locate defaults/ directory from {:?}",
            root
        );
        root
    }

    /// Fresh scratch directory containing `config/spincast.toml` with `body`.
    fn scratch_with_config(name: &str, body: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), body).unwrap();
        tmp
    }

    fn assert_validation_field(result: Result<Config, ConfigError>, expected: &str) {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected ValidationError for {}, got {:?}", expected, other),
        }
    }

    const MINIMAL: &str = "[wheel]\nspin_duration_ms = 3000\nmin_revolutions = 6\nmax_revolutions = 9\n";

    #[test]
    fn load_valid_config_from_defaults() {
        let root = project_root();
        let tmp = std::env::temp_dir().join("spincast_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            root.join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        ensure_config_files(&tmp).expect("should copy default configs");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.wheel.spin_duration_ms, 5000);
        assert_eq!(config.wheel.min_revolutions, 6);
        assert_eq!(config.wheel.max_revolutions, 9);
        assert!(!config.wheel.remove_after_pick);
        assert!(config.wheel.auto_speak);
        assert_eq!(config.wheel.recap_len, 10);
        assert_eq!(crate::pool::parse_list(&config.wheel.default_list).len(), 8);
        assert!(config.speech.enabled);
        assert!(config.speech.command.is_none());
        assert!((config.speech.rate - 1.0).abs() < f32::EPSILON);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let tmp = scratch_with_config("spincast_config_minimal", MINIMAL);
        let config = load_config_from(&tmp).expect("minimal config should load");
        assert_eq!(config.wheel.spin_duration(), Duration::from_millis(3000));
        assert_eq!(config.wheel.revolutions(), RevolutionRange { min: 6, max: 9 });
        assert!(config.wheel.auto_speak);
        assert_eq!(config.wheel.recap_len, DEFAULT_RECAP_LEN);
        assert_eq!(config.wheel.default_list, DEFAULT_LIST);
        assert!(config.speech.enabled);
        assert!(config.speech.voice.is_none());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn speech_section_is_parsed() {
        let body = format!(
            "{MINIMAL}\n[speech]\nenabled = false\ncommand = \"espeak\"\nvoice = \"en-us\"\nrate = 1.5\npitch = 0.8\nvolume = 0.5\n"
        );
        let tmp = scratch_with_config("spincast_config_speech", &body);
        let config = load_config_from(&tmp).unwrap();
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.command.as_deref(), Some("espeak"));
        let voice = config.speech.voice_settings();
        assert_eq!(voice.voice.as_deref(), Some("en-us"));
        assert!((voice.rate - 1.5).abs() < f32::EPSILON);
        assert!((voice.pitch - 0.8).abs() < f32::EPSILON);
        assert!((voice.volume - 0.5).abs() < f32::EPSILON);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_spin_duration() {
        let tmp = scratch_with_config(
            "spincast_config_zero_duration",
            "[wheel]\nspin_duration_ms = 0\nmin_revolutions = 6\nmax_revolutions = 9\n",
        );
        assert_validation_field(load_config_from(&tmp), "wheel.spin_duration_ms");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_min_revolutions() {
        let tmp = scratch_with_config(
            "spincast_config_zero_revs",
            "[wheel]\nspin_duration_ms = 100\nmin_revolutions = 0\nmax_revolutions = 9\n",
        );
        assert_validation_field(load_config_from(&tmp), "wheel.min_revolutions");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_revolution_range() {
        let tmp = scratch_with_config(
            "spincast_config_inverted_revs",
            "[wheel]\nspin_duration_ms = 100\nmin_revolutions = 9\nmax_revolutions = 6\n",
        );
        assert_validation_field(load_config_from(&tmp), "wheel.max_revolutions");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_recap_len() {
        let body = "[wheel]\nspin_duration_ms = 100\nmin_revolutions = 1\nmax_revolutions = 1\nrecap_len = 0\n";
        let tmp = scratch_with_config("spincast_config_zero_recap", body);
        assert_validation_field(load_config_from(&tmp), "wheel.recap_len");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_volume_out_of_range() {
        let body = format!("{MINIMAL}\n[speech]\nvolume = 1.5\n");
        let tmp = scratch_with_config("spincast_config_volume", &body);
        assert_validation_field(load_config_from(&tmp), "speech.volume");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_command() {
        let body = format!("{MINIMAL}\n[speech]\ncommand = \"  \"\n");
        let tmp = scratch_with_config("spincast_config_blank_command", &body);
        assert_validation_field(load_config_from(&tmp), "speech.command");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("spincast_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        match load_config_from(&tmp) {
            Err(ConfigError::FileNotFound { path }) => {
                assert!(path.ends_with(CONFIG_FILE));
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch_with_config("spincast_config_invalid", "[wheel\nnot toml");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing_and_examples() {
        let tmp = std::env::temp_dir().join("spincast_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), MINIMAL).unwrap();
        fs::write(tmp.join("defaults").join("extra.toml.example"), "x = 1").unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# user edited").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        let kept = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(kept, "# user edited");
        assert!(!tmp.join("config").join("extra.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("spincast_config_no_dirs");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
