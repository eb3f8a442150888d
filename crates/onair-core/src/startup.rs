// ── Startup sequence ──
//
// locate bridge -> pair (only without a key) -> open session -> resolve light.
// Every step is fatal on failure; cancellation is checked between steps
// and during the pairing grace period.

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use onair_api::{DiscoveryClient, PairingClient, TransportConfig};

use crate::config::{BridgeConfig, WatchConfig};
use crate::error::CoreError;
use crate::model::LightIdentity;
use crate::session::BridgeSession;

/// Result of a successful startup.
pub struct Established {
    pub session: BridgeSession,
    pub light: LightIdentity,
    /// Set when this run paired with the bridge. The host should persist it.
    pub paired_key: Option<SecretString>,
}

/// Locate the bridge, pair if needed, and resolve the configured light.
pub async fn establish(
    config: &WatchConfig,
    cancel: &CancellationToken,
) -> Result<Established, CoreError> {
    let bridge = &config.bridge;

    let base_url = match bridge.address.as_deref() {
        Some(address) => {
            debug!(address, "using configured bridge address");
            bridge_url(address)?
        }
        None => {
            ensure_running(cancel)?;
            let address = locate(bridge.discovery_url.as_ref()).await?;
            bridge_url(&address)?
        }
    };
    info!(bridge = %base_url, "bridge located");

    let (app_key, paired_key) = match &bridge.app_key {
        Some(key) => (key.clone(), None),
        None => {
            let key = pair(&base_url, bridge, cancel).await?;
            (key.clone(), Some(key))
        }
    };

    ensure_running(cancel)?;
    let session = BridgeSession::connect(base_url, &app_key, bridge.timeout)?;
    let light = session.resolve_light(&config.light_name).await?;

    info!(bridge = %session.base_url(), light = %light, "ready");
    Ok(Established {
        session,
        light,
        paired_key,
    })
}

/// Ask the discovery service for a bridge and return its address.
///
/// `discovery_url` of `None` uses the public endpoint. The first candidate
/// wins when several bridges answer.
pub async fn locate(discovery_url: Option<&Url>) -> Result<String, CoreError> {
    let client = match discovery_url {
        Some(url) => DiscoveryClient::new(url.clone(), &TransportConfig::discovery()),
        None => DiscoveryClient::public(),
    }
    .map_err(discovery_failed)?;

    info!(url = %client.url(), "looking up bridge");
    client.locate().await.map_err(discovery_failed)
}

/// Register a new application key with the bridge at `base_url`.
///
/// Announces the link-button requirement, waits out the grace period,
/// then sends exactly one registration request.
pub async fn pair(
    base_url: &Url,
    config: &BridgeConfig,
    cancel: &CancellationToken,
) -> Result<SecretString, CoreError> {
    warn!(
        bridge = %base_url,
        grace_secs = config.pairing_grace.as_secs(),
        "no application key configured: press the link button on the bridge now"
    );

    tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(CoreError::Cancelled),
        () = tokio::time::sleep(config.pairing_grace) => {}
    }

    info!(device_type = %config.device_type, "sending pairing request");
    let client = PairingClient::new(base_url.clone(), &TransportConfig::bridge(config.timeout))?;
    let registration = client.register(&config.device_type).await?;

    info!("paired with bridge");
    Ok(registration.username)
}

/// Base URL for a configured or discovered bridge address.
///
/// Bare hosts get `https://`; anything with a scheme is taken as-is.
pub fn bridge_url(address: &str) -> Result<Url, CoreError> {
    let raw = if address.contains("://") {
        address.to_owned()
    } else {
        format!("https://{address}")
    };

    let mut url = Url::parse(&raw).map_err(|e| CoreError::Config {
        message: format!("invalid bridge address '{address}': {e}"),
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn ensure_running(cancel: &CancellationToken) -> Result<(), CoreError> {
    if cancel.is_cancelled() {
        Err(CoreError::Cancelled)
    } else {
        Ok(())
    }
}

fn discovery_failed(err: onair_api::Error) -> CoreError {
    match CoreError::from(err) {
        e @ CoreError::DiscoveryFailed { .. } => e,
        other => CoreError::DiscoveryFailed {
            reason: other.to_string(),
        },
    }
}
