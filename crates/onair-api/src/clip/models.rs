// CLIP v2 wire types
//
// Every field the bridge may omit is an `Option`, and every `Option` is
// skipped on serialization. A light update must only carry the fields it
// changes: an explicit `null` is not the same as "leave it alone".

use serde::{Deserialize, Serialize};

/// `{ errors: [...], data: [...] }` envelope wrapping every CLIP v2 response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ClipResponse<T> {
    #[serde(default)]
    pub errors: Vec<BridgeErrorDetail>,
    #[serde(default)]
    pub data: Vec<T>,
}

/// Error entry as reported by the bridge.
///
/// The pairing endpoint fills all three fields; CLIP v2 only sends `description`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeErrorDetail {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Light resource as returned by `GET /clip/v2/resource/light[/{id}]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Light {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_v1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LightMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<On>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<ColorTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimming: Option<Dimming>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl Light {
    /// Human-readable name from `metadata.name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref()?.name.as_deref()
    }
}

/// Partial update body for `PUT /clip/v2/resource/light/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LightUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<On>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<ColorTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimming: Option<Dimming>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LightMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct On {
    pub on: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct XyPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Gamut {
    pub red: XyPoint,
    pub green: XyPoint,
    pub blue: XyPoint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Color {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xy: Option<XyPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamut: Option<Gamut>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamut_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MirekSchema {
    pub mirek_minimum: u16,
    pub mirek_maximum: u16,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorTemperature {
    /// `null` on the wire while the light is in xy color mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirek: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirek_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirek_schema: Option<MirekSchema>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimming {
    /// Brightness percentage, 0.0..=100.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_dim_level: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn update_serializes_only_present_fields() {
        let update = LightUpdate {
            color_temperature: Some(ColorTemperature {
                mirek: Some(230),
                ..ColorTemperature::default()
            }),
            dimming: Some(Dimming {
                brightness: Some(80.0),
                min_dim_level: None,
            }),
            ..LightUpdate::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({
                "color_temperature": { "mirek": 230 },
                "dimming": { "brightness": 80.0 }
            })
        );
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let update = LightUpdate::default();
        assert_eq!(serde_json::to_string(&update).unwrap(), "{}");
    }

    #[test]
    fn parses_full_light_datum() {
        let raw = json!({
            "id": "3f1a-light",
            "id_v1": "/lights/4",
            "metadata": { "name": "Key Light", "archetype": "sultan_bulb" },
            "on": { "on": true },
            "dimming": { "brightness": 50.0, "min_dim_level": 0.2 },
            "color_temperature": {
                "mirek": null,
                "mirek_valid": false,
                "mirek_schema": { "mirek_minimum": 153, "mirek_maximum": 500 }
            },
            "color": {
                "xy": { "x": 0.4573, "y": 0.41 },
                "gamut": {
                    "red": { "x": 0.6915, "y": 0.3083 },
                    "green": { "x": 0.17, "y": 0.7 },
                    "blue": { "x": 0.1532, "y": 0.0475 }
                },
                "gamut_type": "C"
            },
            "mode": "normal",
            "type": "light"
        });

        let light: Light = serde_json::from_value(raw).unwrap();
        assert_eq!(light.id, "3f1a-light");
        assert_eq!(light.name(), Some("Key Light"));
        assert_eq!(light.on, Some(On { on: true }));
        assert_eq!(light.dimming.and_then(|d| d.brightness), Some(50.0));
        let ct = light.color_temperature.unwrap();
        assert_eq!(ct.mirek, None);
        assert_eq!(ct.mirek_valid, Some(false));
        let color = light.color.unwrap();
        assert_eq!(color.xy, Some(XyPoint { x: 0.4573, y: 0.41 }));
        assert_eq!(color.gamut_type.as_deref(), Some("C"));
    }

    #[derive(Debug, Deserialize)]
    struct Reference {
        rid: String,
    }

    #[test]
    fn envelope_of_type_without_default() {
        let resp: ClipResponse<Reference> = serde_json::from_value(json!({
            "errors": [],
            "data": [{ "rid": "6b3e-key-light", "rtype": "light" }]
        }))
        .unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].rid, "6b3e-key-light");
    }

    #[test]
    fn envelope_tolerates_missing_errors() {
        let resp: ClipResponse<Light> =
            serde_json::from_value(json!({ "data": [{ "id": "a" }] })).unwrap();
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.len(), 1);
    }
}
