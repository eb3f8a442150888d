// Pairing (application registration) handshake.
//
// `POST /api` with a device type; the bridge only issues a key if its
// physical link button was pressed shortly before. The response is an
// array whose entries are each either `{success: {...}}` or `{error: {...}}`.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::clip::models::BridgeErrorDetail;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Bridge error type reported when the link button was not pressed.
pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;

#[derive(Serialize)]
struct RegisterBody<'a> {
    devicetype: &'a str,
    generateclientkey: bool,
}

/// Credentials issued by a successful registration.
#[derive(Debug, Deserialize)]
pub struct Registration {
    /// Application key; sent as `hue-application-key` on every later call.
    pub username: SecretString,
    /// Entertainment streaming key, present because we ask for it.
    #[serde(default)]
    pub clientkey: Option<SecretString>,
}

/// Wire shape of one response entry. Either field may be missing.
#[derive(Debug, Deserialize)]
struct RawPairingEntry {
    success: Option<Registration>,
    error: Option<BridgeErrorDetail>,
}

/// One decoded registration result.
#[derive(Debug)]
pub enum PairingOutcome {
    Success(Registration),
    Error(BridgeErrorDetail),
}

impl PairingOutcome {
    /// Decode whichever of the two known shapes is present.
    /// Returns `None` when neither is.
    fn from_entry(entry: RawPairingEntry) -> Option<Self> {
        match (entry.success, entry.error) {
            (Some(success), _) => Some(Self::Success(success)),
            (None, Some(error)) => Some(Self::Error(error)),
            (None, None) => None,
        }
    }
}

/// Client for the one-shot registration endpoint.
pub struct PairingClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PairingClient {
    /// Create a pairing client for the bridge at `base_url` (e.g. `https://192.168.1.2/`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Send a single registration request.
    ///
    /// Only the first response entry is considered.
    pub async fn register(&self, device_type: &str) -> Result<Registration, Error> {
        let url = self.base_url.join("api")?;
        debug!("POST {}", url);

        let body = RegisterBody {
            devicetype: device_type,
            generateclientkey: true,
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }

        let entries: Vec<RawPairingEntry> =
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: text.clone(),
            })?;

        let outcome = entries
            .into_iter()
            .next()
            .and_then(PairingOutcome::from_entry)
            .ok_or(Error::PairingUnexpectedResponse)?;

        match outcome {
            PairingOutcome::Success(registration) => Ok(registration),
            PairingOutcome::Error(detail) => Err(Error::PairingRejected {
                code: detail.kind.unwrap_or_default(),
                description: detail.description,
            }),
        }
    }
}
