// ── Domain model ──
//
// Bridge-independent view of a light. `Appearance` is deliberately
// partial: a read fills whatever the light reports, a write carries only
// the fields that should change.

use std::fmt;

use strum::Display;

use crate::config::OnAirLook;

/// CIE 1931 chromaticity coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

/// A light's visible state, or a partial update to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Appearance {
    pub on: Option<bool>,
    pub color: Option<Chromaticity>,
    /// Color temperature in mirek. Only populated from reads when the
    /// bridge reports it as valid for the current mode.
    pub mirek: Option<u16>,
    /// Brightness percentage.
    pub brightness: Option<f64>,
}

impl Appearance {
    /// The update applied when the camera goes live.
    pub fn on_air(look: &OnAirLook) -> Self {
        Self {
            mirek: Some(look.mirek),
            brightness: Some(look.brightness),
            ..Self::default()
        }
    }

    /// `true` only when the light explicitly reports itself off.
    pub fn is_off(&self) -> bool {
        self.on == Some(false)
    }

    pub fn is_empty(&self) -> bool {
        self.on.is_none() && self.color.is_none() && self.mirek.is_none() && self.brightness.is_none()
    }

    /// The update that puts a captured snapshot back.
    ///
    /// Color and brightness are restored as captured. A light that had no
    /// xy color but a valid color temperature gets its mirek back instead.
    pub fn restoration(&self) -> Self {
        Self {
            on: None,
            color: self.color,
            mirek: if self.color.is_none() { self.mirek } else { None },
            brightness: self.brightness,
        }
    }
}

/// A light resolved from the configured name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightIdentity {
    /// Bridge-assigned resource id.
    pub id: String,
    pub name: String,
}

impl fmt::Display for LightIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Whether the camera was in use at the last poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ActivityState {
    #[default]
    Idle,
    Active,
}
