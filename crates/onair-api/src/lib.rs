// onair-api: Async client for the lighting bridge (discovery, pairing, CLIP v2 lights)

pub mod clip;
pub mod discovery;
pub mod error;
pub mod pairing;
pub mod transport;

pub use clip::ClipClient;
pub use clip::models::{
    BridgeErrorDetail, ClipResponse, Color, ColorTemperature, Dimming, Gamut, Light,
    LightMetadata, LightUpdate, MirekSchema, On, XyPoint,
};
pub use discovery::{DiscoveredBridge, DiscoveryClient};
pub use error::Error;
pub use pairing::{PairingClient, PairingOutcome, Registration};
pub use transport::{TlsMode, TransportConfig};
