//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use onair_config::ConfigError;
use onair_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const PROTOCOL: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Bridge ───────────────────────────────────────────────────────

    #[error("Could not find a bridge: {reason}")]
    #[diagnostic(
        code(onair::discovery_failed),
        help(
            "Discovery needs internet access for both this machine and the bridge.\n\
             Set bridge.address in the config file to skip discovery."
        )
    )]
    DiscoveryFailed { reason: String },

    #[error("Could not reach the bridge at {url}")]
    #[diagnostic(
        code(onair::bridge_unreachable),
        help("Check that the bridge is powered and on the same network.")
    )]
    BridgeUnreachable {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Bridge sent a response onair could not read: {message}")]
    #[diagnostic(code(onair::bridge_protocol))]
    BridgeProtocol { message: String },

    #[error("Bridge rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(onair::bridge_rejected))]
    BridgeRejected { status: u16, message: String },

    // ── Pairing ──────────────────────────────────────────────────────

    #[error("Pairing failed: {description}")]
    #[diagnostic(
        code(onair::pairing_failed),
        help(
            "Press the round link button on top of the bridge, then start onair again\n\
             within the grace period (bridge.pairing_grace_secs)."
        )
    )]
    PairingFailed { description: String },

    #[error("Bridge refused the application key (HTTP {status})")]
    #[diagnostic(
        code(onair::auth_failed),
        help(
            "The stored key may have been revoked. Remove bridge.app_key (or the\n\
             'onair' keyring entry) and start onair again to pair."
        )
    )]
    AuthFailed { status: u16 },

    // ── Light ────────────────────────────────────────────────────────

    #[error("No light named '{name}' on the bridge")]
    #[diagnostic(
        code(onair::light_not_found),
        help("Names are matched exactly, including case. Check the name in the Hue app.")
    )]
    LightNotFound { name: String },

    #[error("{count} lights are named '{name}'")]
    #[diagnostic(
        code(onair::ambiguous_light),
        help("Give the light a unique name in the Hue app.")
    )]
    AmbiguousLight { name: String, count: usize },

    // ── Probe ────────────────────────────────────────────────────────

    #[error("Camera probe failed: {message}")]
    #[diagnostic(code(onair::probe))]
    Probe { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(onair::validation))]
    Validation { field: String, reason: String },

    #[error("Could not load configuration: {source}")]
    #[diagnostic(
        code(onair::config),
        help("Expected at: {path}")
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    // ── Lifecycle ────────────────────────────────────────────────────

    #[error("Interrupted")]
    #[diagnostic(code(onair::cancelled))]
    Cancelled,
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => exit_code::SUCCESS,
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::PairingFailed { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::LightNotFound { .. } | Self::AmbiguousLight { .. } => exit_code::NOT_FOUND,
            Self::DiscoveryFailed { .. } | Self::BridgeUnreachable { .. } => exit_code::CONNECTION,
            Self::BridgeProtocol { .. } | Self::BridgeRejected { .. } => exit_code::PROTOCOL,
            Self::Probe { .. } => exit_code::GENERAL,
        }
    }

    /// Wrap a config error, keeping the file path for the help text.
    pub fn config(source: ConfigError, path: &std::path::Path) -> Self {
        match source {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            source => Self::Config {
                source,
                path: path.display().to_string(),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DiscoveryFailed { reason } => CliError::DiscoveryFailed { reason },

            CoreError::PairingRejected { description } => CliError::PairingFailed { description },

            CoreError::PairingUnexpectedResponse => CliError::PairingFailed {
                description: "bridge answered with neither a key nor an error".into(),
            },

            CoreError::LightNotFound { identifier } => CliError::LightNotFound { name: identifier },

            CoreError::AmbiguousLight { name, count } => CliError::AmbiguousLight { name, count },

            CoreError::BridgeUnreachable { url, reason } => CliError::BridgeUnreachable {
                url,
                source: reason.into(),
            },

            CoreError::BridgeProtocol { message } => CliError::BridgeProtocol { message },

            CoreError::BridgeRejected { status, .. } if status == 401 || status == 403 => {
                CliError::AuthFailed { status }
            }

            CoreError::BridgeRejected { status, message } => {
                CliError::BridgeRejected { status, message }
            }

            CoreError::Probe { message } => CliError::Probe { message },

            CoreError::Config { message } => CliError::Validation {
                field: "bridge".into(),
                reason: message,
            },

            CoreError::Cancelled => CliError::Cancelled,
        }
    }
}
