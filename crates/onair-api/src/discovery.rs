// Bridge discovery via the vendor's public lookup service.
//
// The service answers with every bridge that recently phoned home from the
// caller's public IP. Only the internal address is used downstream.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Well-known discovery endpoint.
pub const DEFAULT_DISCOVERY_URL: &str = "https://discovery.meethue.com/";

/// One candidate returned by the discovery service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DiscoveredBridge {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "internalipaddress")]
    pub internal_ip_address: String,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Thin client for the discovery lookup.
pub struct DiscoveryClient {
    http: reqwest::Client,
    url: Url,
}

impl DiscoveryClient {
    /// Create a client against the given discovery endpoint.
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, url })
    }

    /// Create a client against the public discovery endpoint.
    pub fn public() -> Result<Self, Error> {
        let url = Url::parse(DEFAULT_DISCOVERY_URL)?;
        Self::new(url, &TransportConfig::discovery())
    }

    /// The endpoint this client queries.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch every candidate bridge, in the order the service returned them.
    pub async fn bridges(&self) -> Result<Vec<DiscoveredBridge>, Error> {
        debug!("GET {}", self.url);

        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Resolve the first candidate's internal address.
    ///
    /// No ranking or health check among candidates: one bridge per network
    /// is assumed.
    pub async fn locate(&self) -> Result<String, Error> {
        let bridges = self.bridges().await?;
        debug!(count = bridges.len(), "discovery candidates");
        bridges
            .into_iter()
            .next()
            .map(|b| b.internal_ip_address)
            .ok_or(Error::NoBridges)
    }
}
