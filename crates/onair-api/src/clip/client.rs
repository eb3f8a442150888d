// CLIP v2 HTTP client
//
// Wraps `reqwest::Client` with the application-key header, resource URL
// construction and `{ errors, data }` envelope unwrapping. Only ever
// pointed at the bridge's resolved address.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::clip::models::{ClipResponse, Light, LightUpdate};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Header carrying the application key on every CLIP v2 request.
pub const APPLICATION_KEY_HEADER: &str = "hue-application-key";

/// Reference returned by a successful `PUT`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ResourceRef {
    pub rid: String,
    #[serde(default)]
    pub rtype: Option<String>,
}

/// Authenticated client for the bridge's light resource.
#[derive(Clone)]
pub struct ClipClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ClipClient {
    /// Create a client for the bridge at `base_url`, authenticating with `app_key`.
    pub fn new(
        base_url: Url,
        app_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut value = HeaderValue::from_str(app_key.expose_secret())
            .map_err(|e| Error::InvalidApplicationKey(e.to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(APPLICATION_KEY_HEADER, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// The bridge base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/clip/v2/resource/{path}`
    fn resource_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("clip/v2/resource/{path}"))?)
    }

    // ── Light resource ───────────────────────────────────────────────

    /// List every light known to the bridge.
    pub async fn list_lights(&self) -> Result<Vec<Light>, Error> {
        let url = self.resource_url("light")?;
        Ok(self.get::<Light>(url).await?.data)
    }

    /// Read a single light.
    ///
    /// Returns the raw `data` array; the bridge normally answers with exactly
    /// one entry, but an empty array is not an HTTP error.
    pub async fn get_light(&self, id: &str) -> Result<Vec<Light>, Error> {
        let url = self.resource_url(&format!("light/{id}"))?;
        Ok(self.get::<Light>(url).await?.data)
    }

    /// Apply a partial update to a light.
    ///
    /// Fields absent from `update` are not serialized, so the bridge leaves
    /// them untouched.
    pub async fn update_light(&self, id: &str, update: &LightUpdate) -> Result<(), Error> {
        let url = self.resource_url(&format!("light/{id}"))?;
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .json(update)
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: ClipResponse<ResourceRef> = Self::parse_envelope(resp).await?;
        if !envelope.errors.is_empty() {
            let descriptions: Vec<&str> = envelope
                .errors
                .iter()
                .map(|e| e.description.as_str())
                .collect();
            warn!(light = id, errors = ?descriptions, "bridge reported errors for light update");
        }
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<ClipResponse<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        Self::parse_envelope(resp).await
    }

    /// Parse the `{ errors, data }` envelope.
    ///
    /// A non-success status with a readable envelope becomes
    /// [`Error::Rejected`]; an unreadable body becomes
    /// [`Error::Deserialization`] regardless of status.
    async fn parse_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<ClipResponse<T>, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: ClipResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("HTTP {}: {e}", status.as_u16()),
                body: body.clone(),
            })?;

        if status.is_success() {
            return Ok(envelope);
        }

        let message = if envelope.errors.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_owned()
        } else {
            envelope
                .errors
                .iter()
                .map(|e| e.description.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };

        Err(Error::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
