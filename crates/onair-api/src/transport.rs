// Shared transport configuration for building reqwest::Client instances.
//
// Discovery, pairing and the CLIP client all build their HTTP clients
// through this module so TLS and timeout policy live in one place.

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

const USER_AGENT: &str = concat!("onair/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store. Used for the public discovery endpoint.
    System,
    /// Accept any certificate. Bridges serve self-signed certificates whose
    /// subject is the bridge id rather than its address, so this is the only
    /// mode that works against a bridge.
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::bridge(Duration::from_secs(30))
    }
}

impl TransportConfig {
    /// Transport for the public discovery service.
    pub fn discovery() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(10),
        }
    }

    /// Transport for calls against the bridge itself.
    pub fn bridge(timeout: Duration) -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout,
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by the CLIP client to inject the `hue-application-key` header.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if self.tls == TlsMode::DangerAcceptInvalid {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_uses_system_trust() {
        let cfg = TransportConfig::discovery();
        assert_eq!(cfg.tls, TlsMode::System);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn default_targets_the_bridge() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }
}
