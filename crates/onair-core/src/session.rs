// ── Bridge session ──
//
// `LightBridge` is the seam the activity machine drives: read one
// light, apply one partial update. `BridgeSession` is the real
// implementation over the CLIP v2 client.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;
use url::Url;

use onair_api::{ClipClient, Light, LightUpdate, TransportConfig};

use crate::error::CoreError;
use crate::model::{Appearance, LightIdentity};

/// Read and write access to a single light.
pub trait LightBridge {
    /// Current appearance of the light with bridge id `id`.
    fn get_light(&self, id: &str) -> impl Future<Output = Result<Appearance, CoreError>> + Send;

    /// Apply `update`, leaving every field it does not carry untouched.
    fn apply_light(
        &self,
        id: &str,
        update: &Appearance,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Authenticated session against one bridge.
#[derive(Clone)]
pub struct BridgeSession {
    clip: ClipClient,
}

impl BridgeSession {
    /// Open a session to the bridge at `base_url` using `app_key`.
    ///
    /// Bridges serve a self-signed certificate, so certificate
    /// verification is disabled for this client only.
    pub fn connect(
        base_url: Url,
        app_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let clip = ClipClient::new(base_url, app_key, &TransportConfig::bridge(timeout))?;
        Ok(Self { clip })
    }

    pub fn base_url(&self) -> &Url {
        self.clip.base_url()
    }

    /// Every light on the bridge.
    pub async fn list_lights(&self) -> Result<Vec<Light>, CoreError> {
        Ok(self.clip.list_lights().await?)
    }

    /// Resolve a human-readable light name to exactly one light.
    pub async fn resolve_light(&self, name: &str) -> Result<LightIdentity, CoreError> {
        let lights = self.list_lights().await?;
        debug!(count = lights.len(), "listed lights");
        select_light(&lights, name)
    }
}

impl LightBridge for BridgeSession {
    async fn get_light(&self, id: &str) -> Result<Appearance, CoreError> {
        let not_found = || CoreError::LightNotFound {
            identifier: id.to_owned(),
        };

        let data = match self.clip.get_light(id).await.map_err(CoreError::from) {
            Ok(data) => data,
            Err(CoreError::BridgeRejected { status: 404, .. }) => return Err(not_found()),
            Err(e) => return Err(e),
        };
        data.iter()
            .find(|light| light.id == id)
            .map(Appearance::from)
            .ok_or_else(not_found)
    }

    async fn apply_light(&self, id: &str, update: &Appearance) -> Result<(), CoreError> {
        let body = LightUpdate::from(update);
        self.clip.update_light(id, &body).await?;
        Ok(())
    }
}

/// Pick the single light whose `metadata.name` equals `name`.
///
/// Matching is exact and case-sensitive. Zero matches is
/// [`CoreError::LightNotFound`]; more than one is [`CoreError::AmbiguousLight`].
pub fn select_light(lights: &[Light], name: &str) -> Result<LightIdentity, CoreError> {
    let matches: Vec<&Light> = lights.iter().filter(|l| l.name() == Some(name)).collect();

    match matches.as_slice() {
        [] => Err(CoreError::LightNotFound {
            identifier: name.to_owned(),
        }),
        [light] => Ok(LightIdentity {
            id: light.id.clone(),
            name: name.to_owned(),
        }),
        many => Err(CoreError::AmbiguousLight {
            name: name.to_owned(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use onair_api::LightMetadata;

    fn named(id: &str, name: &str) -> Light {
        Light {
            id: id.into(),
            metadata: Some(LightMetadata {
                name: Some(name.into()),
                archetype: None,
            }),
            ..Light::default()
        }
    }

    #[test]
    fn select_single_match() {
        let lights = vec![named("a", "Desk"), named("b", "Key Light")];
        let found = select_light(&lights, "Key Light").unwrap();
        assert_eq!(found.id, "b");
        assert_eq!(found.name, "Key Light");
    }

    #[test]
    fn select_is_case_sensitive() {
        let lights = vec![named("a", "Key Light")];
        let err = select_light(&lights, "key light").unwrap_err();
        assert!(matches!(err, CoreError::LightNotFound { ref identifier } if identifier == "key light"));
    }

    #[test]
    fn select_rejects_duplicates() {
        let lights = vec![named("a", "Lamp"), named("b", "Lamp"), named("c", "Desk")];
        let err = select_light(&lights, "Lamp").unwrap_err();
        assert!(matches!(err, CoreError::AmbiguousLight { count: 2, .. }));
    }

    #[test]
    fn select_skips_unnamed_lights() {
        let lights = vec![Light {
            id: "x".into(),
            ..Light::default()
        }];
        assert!(select_light(&lights, "").is_err());
    }
}
