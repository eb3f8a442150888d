// ── API-to-domain type conversions ──
//
// Bridges raw `onair_api` light types into `Appearance` and back. Reads
// drop anything the bridge flags as stale (an invalid mirek); writes emit
// a field only when the appearance carries it.

use onair_api::{Color, ColorTemperature, Dimming, Light, LightUpdate, On, XyPoint};

use crate::model::{Appearance, Chromaticity};

impl From<XyPoint> for Chromaticity {
    fn from(xy: XyPoint) -> Self {
        Self { x: xy.x, y: xy.y }
    }
}

impl From<Chromaticity> for XyPoint {
    fn from(c: Chromaticity) -> Self {
        Self { x: c.x, y: c.y }
    }
}

impl From<&Light> for Appearance {
    fn from(light: &Light) -> Self {
        let mirek = light
            .color_temperature
            .filter(|ct| ct.mirek_valid != Some(false))
            .and_then(|ct| ct.mirek);

        Self {
            on: light.on.map(|o| o.on),
            color: light
                .color
                .as_ref()
                .and_then(|c| c.xy)
                .map(Chromaticity::from),
            mirek,
            brightness: light.dimming.and_then(|d| d.brightness),
        }
    }
}

impl From<&Appearance> for LightUpdate {
    fn from(appearance: &Appearance) -> Self {
        Self {
            on: appearance.on.map(|on| On { on }),
            color: appearance.color.map(|c| Color {
                xy: Some(c.into()),
                ..Color::default()
            }),
            color_temperature: appearance.mirek.map(|mirek| ColorTemperature {
                mirek: Some(mirek),
                ..ColorTemperature::default()
            }),
            dimming: appearance.brightness.map(|brightness| Dimming {
                brightness: Some(brightness),
                min_dim_level: None,
            }),
        }
    }
}
