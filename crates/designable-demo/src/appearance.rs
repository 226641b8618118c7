#![forbid(unsafe_code)]

//! Appearance model of the reference application.

use std::fmt;

use clap::ValueEnum;
use designable::{AppearanceType, ImageRef};
use serde::{Deserialize, Serialize};

/// Appearance variants the application can switch between.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AppAppearanceType {
    Light,
    Dark,
    Graphite,
}

impl AppAppearanceType {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Graphite];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Graphite => "graphite",
        }
    }
}

impl fmt::Display for AppAppearanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppearanceType for AppAppearanceType {
    fn name(&self) -> Option<&str> {
        Some(match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Graphite => "Graphite",
        })
    }

    fn image(&self) -> Option<ImageRef> {
        Some(ImageRef::new(match self {
            Self::Light => "appearance.light",
            Self::Dark => "appearance.dark",
            Self::Graphite => "appearance.graphite",
        }))
    }
}

/// 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Color from a `0xRRGGBB` literal. Bits above 24 are ignored.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewControllerAppearance {
    pub background_color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomViewAppearance {
    pub background_color: Rgb,
}

/// Full appearance: one sub-appearance per kind of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub kind: AppAppearanceType,
    pub view_controller: ViewControllerAppearance,
    pub custom_view: CustomViewAppearance,
}

const ACCENT_GREEN: Rgb = Rgb::from_hex(0x387C6D);
const ACCENT_AMBER: Rgb = Rgb::from_hex(0xFFC947);

/// Appearance provider passed to the designer.
#[must_use]
pub fn provide_appearance(kind: &AppAppearanceType) -> Appearance {
    let (background, accent) = match kind {
        AppAppearanceType::Light => (Rgb::from_hex(0xF8F5F1), ACCENT_GREEN),
        AppAppearanceType::Dark => (Rgb::from_hex(0x252525), ACCENT_AMBER),
        AppAppearanceType::Graphite => (Rgb::from_hex(0x393E46), ACCENT_AMBER),
    };
    Appearance {
        kind: *kind,
        view_controller: ViewControllerAppearance {
            background_color: background,
        },
        custom_view: CustomViewAppearance {
            background_color: accent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_formats_as_uppercase_hex() {
        assert_eq!(Rgb::from_hex(0xF8F5F1).to_string(), "#F8F5F1");
        assert_eq!(Rgb::from_hex(0x00_0a_0b).to_string(), "#000A0B");
        assert_eq!(Rgb::from_hex(0xFF_123456), Rgb::from_hex(0x123456));
    }

    #[test]
    fn provider_palette() {
        let cases = [
            (AppAppearanceType::Light, "#F8F5F1", "#387C6D"),
            (AppAppearanceType::Dark, "#252525", "#FFC947"),
            (AppAppearanceType::Graphite, "#393E46", "#FFC947"),
        ];
        for (kind, view_controller, custom_view) in cases {
            let appearance = provide_appearance(&kind);
            assert_eq!(appearance.kind, kind);
            assert_eq!(
                appearance.view_controller.background_color.to_string(),
                view_controller
            );
            assert_eq!(
                appearance.custom_view.background_color.to_string(),
                custom_view
            );
        }
    }

    #[test]
    fn appearance_type_serializes_lowercase() {
        for kind in AppAppearanceType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn every_type_has_name_and_image() {
        for kind in AppAppearanceType::ALL {
            assert!(kind.name().is_some());
            let image = kind.image().unwrap();
            assert!(image.as_str().ends_with(kind.as_str()));
        }
    }
}
