use thiserror::Error;

/// Top-level error type for the `onair-api` crate.
///
/// Covers every failure mode across the three bridge-facing surfaces:
/// discovery lookup, pairing handshake, and the CLIP v2 light resource.
/// `onair-core` maps these into the domain taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The application key cannot be sent as an HTTP header value.
    #[error("Invalid application key: {0}")]
    InvalidApplicationKey(String),

    // ── Bridge responses ────────────────────────────────────────────
    /// Non-success HTTP status whose body was still a readable envelope.
    #[error("Bridge rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Discovery ───────────────────────────────────────────────────
    /// The discovery endpoint answered with an empty candidate list.
    #[error("Discovery returned no bridges")]
    NoBridges,

    // ── Pairing ─────────────────────────────────────────────────────
    /// The bridge answered the registration request with an error entry.
    #[error("Pairing rejected by bridge (type {code}): {description}")]
    PairingRejected { code: u16, description: String },

    /// The registration response carried neither a success nor an error entry.
    #[error("Pairing response contained neither a success nor an error entry")]
    PairingUnexpectedResponse,
}

impl Error {
    /// Returns `true` if the request never reached the bridge or never came back.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Returns `true` if pairing failed only because nobody pressed the link button.
    pub fn is_link_button_not_pressed(&self) -> bool {
        matches!(
            self,
            Self::PairingRejected { code, .. } if *code == crate::pairing::LINK_BUTTON_NOT_PRESSED
        )
    }

    /// Returns `true` if the bridge answered with something we could not read.
    pub fn is_protocol(&self) -> bool {
        match self {
            Self::Deserialization { .. } => true,
            Self::Transport(e) => e.is_decode() || e.is_body(),
            _ => false,
        }
    }
}
