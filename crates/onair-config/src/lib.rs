//! Configuration for the onair daemon.
//!
//! TOML file + `ONAIR_*` environment layering, validation, application-key
//! resolution (env + keyring + plaintext) and translation to
//! `onair_core::WatchConfig`. The binary adds CLI flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use onair_core::{BridgeConfig, OnAirLook, WatchConfig};

const KEYRING_SERVICE: &str = "onair";
const KEYRING_USER: &str = "app-key";

/// Valid color temperature range for the on-air look, in mirek.
pub const MIREK_RANGE: std::ops::RangeInclusive<u16> = 153..=500;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Pause between poll cycles, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub bridge: BridgeSection,

    #[serde(default)]
    pub light: LightSection,

    #[serde(default)]
    pub on_air: OnAirSection,

    #[serde(default)]
    pub probe: ProbeSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            bridge: BridgeSection::default(),
            light: LightSection::default(),
            on_air: OnAirSection::default(),
            probe: ProbeSection::default(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeSection {
    /// Bridge host or URL. Skips discovery when set.
    pub address: Option<String>,

    /// Discovery endpoint override.
    pub discovery_url: Option<String>,

    /// Application key (plaintext; prefer keyring or env var).
    pub app_key: Option<String>,

    /// Environment variable name containing the application key.
    pub app_key_env: Option<String>,

    #[serde(default = "default_device_type")]
    pub device_type: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_pairing_grace_secs")]
    pub pairing_grace_secs: u64,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            address: None,
            discovery_url: None,
            app_key: None,
            app_key_env: None,
            device_type: default_device_type(),
            timeout_secs: default_timeout_secs(),
            pairing_grace_secs: default_pairing_grace_secs(),
        }
    }
}

fn default_device_type() -> String {
    onair_core::config::DEFAULT_DEVICE_TYPE.into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_pairing_grace_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LightSection {
    /// `metadata.name` of the light to drive. Required.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OnAirSection {
    #[serde(default = "default_mirek")]
    pub mirek: u16,

    #[serde(default = "default_brightness")]
    pub brightness: f64,
}

impl Default for OnAirSection {
    fn default() -> Self {
        Self {
            mirek: default_mirek(),
            brightness: default_brightness(),
        }
    }
}

fn default_mirek() -> u16 {
    230
}
fn default_brightness() -> f64 {
    80.0
}

/// How the daemon decides whether the camera is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// Scan open file descriptors for video capture devices.
    #[default]
    VideoDevice,
    /// Run a shell command; exit status 0 means in use.
    Command,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProbeSection {
    #[serde(default)]
    pub kind: ProbeKind,

    /// Device nodes to watch. Empty means every `/dev/video*`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<PathBuf>,

    /// Command for `kind = "command"`.
    pub command: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("rs", "onair", "onair").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("onair");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` layered under `ONAIR_*` environment variables.
///
/// A missing file is not an error; nested keys use `__` in variable names
/// (`ONAIR_LIGHT__NAME`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = file_figment(path).merge(Env::prefixed("ONAIR_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load only what is written in the file at `path`, over defaults.
///
/// Environment overrides are left out, so the result is safe to save back.
pub fn load_file_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path).extract()?;
    Ok(config)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Validation ──────────────────────────────────────────────────────

impl Config {
    /// The configured light name, if non-empty.
    pub fn light_name(&self) -> Option<&str> {
        self.light.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.light_name().is_none() {
            return Err(invalid(
                "light.name",
                "required: set it in the config file, ONAIR_LIGHT__NAME, or --light",
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms", "must be greater than zero"));
        }
        if !MIREK_RANGE.contains(&self.on_air.mirek) {
            return Err(invalid(
                "on_air.mirek",
                format!(
                    "{} is outside {}..={}",
                    self.on_air.mirek,
                    MIREK_RANGE.start(),
                    MIREK_RANGE.end()
                ),
            ));
        }
        if !(0.0..=100.0).contains(&self.on_air.brightness) {
            return Err(invalid(
                "on_air.brightness",
                format!("{} is outside 0..=100", self.on_air.brightness),
            ));
        }
        if self.bridge.address.as_deref().is_some_and(str::is_empty) {
            return Err(invalid("bridge.address", "must not be empty when set"));
        }
        if self.probe.kind == ProbeKind::Command
            && self.probe.command.as_deref().is_none_or(str::is_empty)
        {
            return Err(invalid(
                "probe.command",
                "required when probe.kind is \"command\"",
            ));
        }
        Ok(())
    }

    /// Validate and build the engine configuration.
    ///
    /// `app_key` comes from [`resolve_app_key`]; `None` makes startup pair.
    pub fn to_watch_config(
        &self,
        app_key: Option<SecretString>,
    ) -> Result<WatchConfig, ConfigError> {
        self.validate()?;

        let discovery_url = self
            .bridge
            .discovery_url
            .as_deref()
            .map(|raw| {
                raw.parse::<url::Url>()
                    .map_err(|e| invalid("bridge.discovery_url", format!("{raw}: {e}")))
            })
            .transpose()?;

        let light_name = self.light_name().unwrap_or_default().to_owned();

        Ok(WatchConfig {
            bridge: BridgeConfig {
                address: self.bridge.address.clone(),
                discovery_url,
                app_key,
                device_type: self.bridge.device_type.clone(),
                timeout: Duration::from_secs(self.bridge.timeout_secs),
                pairing_grace: Duration::from_secs(self.bridge.pairing_grace_secs),
            },
            light_name,
            on_air: OnAirLook {
                mirek: self.on_air.mirek,
                brightness: self.on_air.brightness,
            },
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the application key from the credential chain.
///
/// `None` means no key is configured anywhere and the bridge must be paired.
pub fn resolve_app_key(bridge: &BridgeSection) -> Option<SecretString> {
    // 1. Named env var
    if let Some(ref env_name) = bridge.app_key_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.is_empty() {
                return Some(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    bridge
        .app_key
        .as_ref()
        .filter(|k| !k.is_empty())
        .map(|k| SecretString::from(k.clone()))
}

/// Where a freshly paired key ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStorage {
    Keyring,
    ConfigFile(PathBuf),
}

/// Persist a freshly paired application key.
///
/// Tries the system keyring first and falls back to writing it into the
/// config file at `path`.
pub fn store_app_key(path: &Path, key: &SecretString) -> Result<KeyStorage, ConfigError> {
    match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .and_then(|entry| entry.set_password(key.expose_secret()))
    {
        Ok(()) => {
            info!("application key stored in system keyring");
            Ok(KeyStorage::Keyring)
        }
        Err(e) => {
            warn!(error = %e, "keyring unavailable, writing application key to config file");
            write_plaintext_key(path, key)
        }
    }
}

/// Write `key` as plaintext into the config file at `path`.
///
/// The file is re-read without environment overrides first, so `ONAIR_*`
/// values of this process never end up on disk.
pub fn write_plaintext_key(path: &Path, key: &SecretString) -> Result<KeyStorage, ConfigError> {
    let mut cfg = load_file_config(path)?;
    cfg.bridge.app_key = Some(key.expose_secret().to_owned());
    save_config(&cfg, path)?;
    info!(path = %path.display(), "application key written to config file");
    Ok(KeyStorage::ConfigFile(path.to_path_buf()))
}
