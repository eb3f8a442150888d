// ── Runtime configuration ──
//
// These types describe *what* to watch and *how* to reach the bridge.
// They carry credential data but never touch disk: the host builds a
// `WatchConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Device type sent with the pairing request.
pub const DEFAULT_DEVICE_TYPE: &str = "onair#webcam";

/// How to find and authenticate with the bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Bridge address. A bare host (`192.168.1.2`) means `https://{host}/`;
    /// a full URL is used as-is. `None` runs the discovery lookup.
    pub address: Option<String>,
    /// Discovery endpoint. `None` means the public service.
    pub discovery_url: Option<Url>,
    /// Application key. `None` triggers pairing.
    pub app_key: Option<SecretString>,
    /// Device type sent when pairing.
    pub device_type: String,
    /// Upper bound for every request against the bridge.
    pub timeout: Duration,
    /// How long the operator gets to press the link button before pairing.
    pub pairing_grace: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: None,
            discovery_url: None,
            app_key: None,
            device_type: DEFAULT_DEVICE_TYPE.into(),
            timeout: Duration::from_secs(30),
            pairing_grace: Duration::from_secs(10),
        }
    }
}

/// The fixed appearance applied while the camera is in use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnAirLook {
    /// Color temperature in mirek.
    pub mirek: u16,
    /// Brightness percentage, 0.0..=100.0.
    pub brightness: f64,
}

impl Default for OnAirLook {
    fn default() -> Self {
        Self {
            mirek: 230,
            brightness: 80.0,
        }
    }
}

/// Everything the engine needs for one process lifetime.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub bridge: BridgeConfig,
    /// Human-readable name of the light to drive (`metadata.name`).
    pub light_name: String,
    pub on_air: OnAirLook,
    /// Pause between the end of one poll cycle and the start of the next.
    pub poll_interval: Duration,
}
