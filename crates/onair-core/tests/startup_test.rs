#![allow(clippy::unwrap_used)]
// Integration tests for the startup sequence and `BridgeSession` using wiremock.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use onair_core::{
    Appearance, BridgeConfig, BridgeSession, Chromaticity, CoreError, LightBridge, OnAirLook,
    WatchConfig, establish, locate,
};

// ── Helpers ─────────────────────────────────────────────────────────

const LIGHT_ID: &str = "6b3e-key-light";

fn watch_config(server: &MockServer, app_key: Option<&str>, light_name: &str) -> WatchConfig {
    WatchConfig {
        bridge: BridgeConfig {
            address: Some(server.uri()),
            app_key: app_key.map(|k| SecretString::from(k.to_string())),
            pairing_grace: Duration::ZERO,
            timeout: Duration::from_secs(5),
            ..BridgeConfig::default()
        },
        light_name: light_name.into(),
        on_air: OnAirLook::default(),
        poll_interval: Duration::from_millis(1000),
    }
}

fn inventory() -> serde_json::Value {
    json!({
        "errors": [],
        "data": [
            { "id": LIGHT_ID, "metadata": { "name": "Key Light" } },
            { "id": "lamp-1", "metadata": { "name": "Lamp" } },
            { "id": "lamp-2", "metadata": { "name": "Lamp" } }
        ]
    })
}

async fn mount_inventory(server: &MockServer, key: &str) {
    Mock::given(method("GET"))
        .and(path("/clip/v2/resource/light"))
        .and(header("hue-application-key", key))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory()))
        .mount(server)
        .await;
}

// ── establish ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_establish_with_configured_key() {
    let server = MockServer::start().await;
    mount_inventory(&server, "known-key").await;

    let config = watch_config(&server, Some("known-key"), "Key Light");
    let established = establish(&config, &CancellationToken::new()).await.unwrap();

    assert_eq!(established.light.id, LIGHT_ID);
    assert!(established.paired_key.is_none());
}

#[tokio::test]
async fn test_establish_pairs_without_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({
            "devicetype": "onair#webcam",
            "generateclientkey": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "success": { "username": "fresh-app-key", "clientkey": "ABCDEF" }
        }])))
        .expect(1)
        .mount(&server)
        .await;
    mount_inventory(&server, "fresh-app-key").await;

    let config = watch_config(&server, None, "Key Light");
    let established = establish(&config, &CancellationToken::new()).await.unwrap();

    assert_eq!(
        established.paired_key.unwrap().expose_secret(),
        "fresh-app-key"
    );
    assert_eq!(established.light.name, "Key Light");
}

#[tokio::test]
async fn test_establish_link_button_not_pressed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "error": { "type": 101, "address": "", "description": "link button not pressed" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let config = watch_config(&server, None, "Key Light");
    let result = establish(&config, &CancellationToken::new()).await;

    assert!(
        matches!(result, Err(CoreError::PairingRejected { ref description }) if description.contains("link button")),
        "expected PairingRejected"
    );
}

#[tokio::test]
async fn test_establish_unknown_light_name() {
    let server = MockServer::start().await;
    mount_inventory(&server, "known-key").await;

    let config = watch_config(&server, Some("known-key"), "Ceiling");
    let result = establish(&config, &CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(CoreError::LightNotFound { ref identifier }) if identifier == "Ceiling"
    ));
}

#[tokio::test]
async fn test_establish_duplicate_light_name() {
    let server = MockServer::start().await;
    mount_inventory(&server, "known-key").await;

    let config = watch_config(&server, Some("known-key"), "Lamp");
    let result = establish(&config, &CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(CoreError::AmbiguousLight { count: 2, .. })
    ));
}

#[tokio::test]
async fn test_establish_cancelled_during_pairing_grace() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = watch_config(&server, None, "Key Light");
    config.bridge.pairing_grace = Duration::from_secs(3600);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = establish(&config, &cancel).await;

    assert!(matches!(result, Err(CoreError::Cancelled)));
}

// ── locate ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_locate_returns_first_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "001788fffe000001", "internalipaddress": "192.168.1.20" },
            { "id": "001788fffe000002", "internalipaddress": "192.168.1.30" }
        ])))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/", server.uri())).unwrap();
    assert_eq!(locate(Some(&url)).await.unwrap(), "192.168.1.20");
}

#[tokio::test]
async fn test_locate_with_no_bridges() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let result = locate(Some(&url)).await;

    assert!(matches!(result, Err(CoreError::DiscoveryFailed { .. })));
}

#[tokio::test]
async fn test_locate_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let result = locate(Some(&url)).await;

    assert!(matches!(result, Err(CoreError::DiscoveryFailed { .. })));
}

// ── BridgeSession ───────────────────────────────────────────────────

fn session(server: &MockServer) -> BridgeSession {
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let key = SecretString::from("known-key".to_string());
    BridgeSession::connect(base_url, &key, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_session_get_light() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/clip/v2/resource/light/{LIGHT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "data": [{
                "id": LIGHT_ID,
                "on": { "on": true },
                "dimming": { "brightness": 50.0 },
                "color": { "xy": { "x": 0.3, "y": 0.4 } },
                "color_temperature": { "mirek": null, "mirek_valid": false }
            }]
        })))
        .mount(&server)
        .await;

    let appearance = session(&server).get_light(LIGHT_ID).await.unwrap();

    assert_eq!(
        appearance,
        Appearance {
            on: Some(true),
            color: Some(Chromaticity { x: 0.3, y: 0.4 }),
            mirek: None,
            brightness: Some(50.0),
        }
    );
}

#[tokio::test]
async fn test_session_get_light_empty_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/clip/v2/resource/light/{LIGHT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": [], "data": [] })))
        .mount(&server)
        .await;

    let result = session(&server).get_light(LIGHT_ID).await;

    assert!(matches!(result, Err(CoreError::LightNotFound { .. })));
}

#[tokio::test]
async fn test_session_get_light_not_found_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/clip/v2/resource/light/{LIGHT_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{ "description": "Not Found" }],
            "data": []
        })))
        .mount(&server)
        .await;

    let result = session(&server).get_light(LIGHT_ID).await;

    assert!(matches!(
        result,
        Err(CoreError::LightNotFound { ref identifier }) if identifier == LIGHT_ID
    ));
}

#[tokio::test]
async fn test_session_get_light_other_rejection_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/clip/v2/resource/light/{LIGHT_ID}")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{ "description": "Forbidden" }],
            "data": []
        })))
        .mount(&server)
        .await;

    let result = session(&server).get_light(LIGHT_ID).await;

    assert!(matches!(
        result,
        Err(CoreError::BridgeRejected { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_session_apply_on_air_look() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/clip/v2/resource/light/{LIGHT_ID}")))
        .and(header("hue-application-key", "known-key"))
        .and(body_json(json!({
            "color_temperature": { "mirek": 230 },
            "dimming": { "brightness": 80.0 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "data": [{ "rid": LIGHT_ID, "rtype": "light" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = Appearance::on_air(&OnAirLook::default());
    session(&server).apply_light(LIGHT_ID, &update).await.unwrap();
}

#[tokio::test]
async fn test_session_apply_garbage_response() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/clip/v2/resource/light/{LIGHT_ID}")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let update = Appearance::on_air(&OnAirLook::default());
    let result = session(&server).apply_light(LIGHT_ID, &update).await;

    assert!(matches!(result, Err(CoreError::BridgeProtocol { .. })));
}
