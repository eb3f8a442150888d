// ── Core error types ──
//
// Domain errors from onair-core. Consumers never match on reqwest or
// serde failures directly: the `From<onair_api::Error>` impl folds
// transport-layer errors into the bridge/discovery/pairing taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Startup errors ───────────────────────────────────────────────
    #[error("Bridge discovery failed: {reason}")]
    DiscoveryFailed { reason: String },

    #[error("Pairing rejected by bridge: {description}")]
    PairingRejected { description: String },

    #[error("Pairing response contained neither a success nor an error entry")]
    PairingUnexpectedResponse,

    #[error("Light not found: {identifier}")]
    LightNotFound { identifier: String },

    #[error("Light name '{name}' matches {count} lights; rename one so it is unique")]
    AmbiguousLight { name: String, count: usize },

    // ── Bridge errors ────────────────────────────────────────────────
    #[error("Cannot reach bridge at {url}: {reason}")]
    BridgeUnreachable { url: String, reason: String },

    #[error("Unreadable bridge response: {message}")]
    BridgeProtocol { message: String },

    #[error("Bridge rejected request (HTTP {status}): {message}")]
    BridgeRejected { status: u16, message: String },

    // ── Host errors ──────────────────────────────────────────────────
    #[error("Camera probe failed: {message}")]
    Probe { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Cancelled")]
    Cancelled,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<onair_api::Error> for CoreError {
    fn from(err: onair_api::Error) -> Self {
        match err {
            onair_api::Error::Transport(ref e) => {
                if err.is_protocol() {
                    CoreError::BridgeProtocol {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::BridgeUnreachable {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            onair_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            onair_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            onair_api::Error::InvalidApplicationKey(msg) => CoreError::Config {
                message: format!("Invalid application key: {msg}"),
            },
            onair_api::Error::Rejected { status, message } => {
                CoreError::BridgeRejected { status, message }
            }
            onair_api::Error::Deserialization { message, body: _ } => {
                CoreError::BridgeProtocol { message }
            }
            onair_api::Error::NoBridges => CoreError::DiscoveryFailed {
                reason: "no bridges found on this network".into(),
            },
            onair_api::Error::PairingRejected { code, description } => {
                CoreError::PairingRejected {
                    description: format!("{description} (type {code})"),
                }
            }
            onair_api::Error::PairingUnexpectedResponse => CoreError::PairingUnexpectedResponse,
        }
    }
}
