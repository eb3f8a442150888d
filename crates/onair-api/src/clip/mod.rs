// CLIP v2 resource API
//
// Authenticated REST surface of the bridge under `/clip/v2/resource/`.
// Only the light resource is covered.

pub mod client;
pub mod models;

pub use client::ClipClient;
