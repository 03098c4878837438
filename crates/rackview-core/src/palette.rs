//! Hover palettes for equipment shells

use crate::layout::EquipmentKind;
use serde::{Deserialize, Serialize};

/// 8-bit sRGB color, written as `#rrggbb` in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0.0-1.0
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Which palette slot a face is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Primary,
    Secondary,
    Tertiary,
}

/// The colors and opacity currently applied to a shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub tertiary: Rgb,
    pub opacity: f32,
}

impl Palette {
    pub fn tone(&self, tone: Tone) -> Rgb {
        match tone {
            Tone::Primary => self.primary,
            Tone::Secondary => self.secondary,
            Tone::Tertiary => self.tertiary,
        }
    }
}

/// Idle and highlight palettes of one equipment kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteScheme {
    pub idle: Palette,
    pub highlight: Palette,
}

const RACK_IDLE: Palette = Palette {
    primary: Rgb::new(0x62, 0x9e, 0x4f),
    secondary: Rgb::new(0x9f, 0xff, 0x7f),
    tertiary: Rgb::new(0x62, 0x9e, 0x4f),
    opacity: 1.0,
};

const RACK_HIGHLIGHT: Palette = Palette {
    primary: Rgb::new(0xff, 0x00, 0x00),
    secondary: Rgb::new(0xff, 0x81, 0x81),
    tertiary: Rgb::new(0xff, 0x00, 0x00),
    opacity: 0.3,
};

const CUBOID_IDLE: Palette = Palette {
    primary: Rgb::new(0x8f, 0x8f, 0x8f),
    secondary: Rgb::new(0x76, 0x76, 0x76),
    tertiary: Rgb::new(0xc0, 0xc0, 0xc0),
    opacity: 1.0,
};

const CUBOID_HIGHLIGHT: Palette = Palette {
    primary: Rgb::new(0x00, 0xff, 0xfb),
    secondary: Rgb::new(0x01, 0xa0, 0xae),
    tertiary: Rgb::new(0x00, 0xb3, 0xff),
    opacity: 0.3,
};

const CHASSIS: Palette = Palette {
    primary: Rgb::new(0x4b, 0x4f, 0x54),
    secondary: Rgb::new(0xd0, 0xc6, 0xbc),
    tertiary: Rgb::new(0x4b, 0x4f, 0x54),
    opacity: 1.0,
};

impl PaletteScheme {
    pub fn for_kind(kind: EquipmentKind) -> Self {
        match kind {
            EquipmentKind::RackServer | EquipmentKind::RackSwitch | EquipmentKind::Cabinet => Self {
                idle: RACK_IDLE,
                highlight: RACK_HIGHLIGHT,
            },
            EquipmentKind::Cuboid | EquipmentKind::CuboidIsolated => Self {
                idle: CUBOID_IDLE,
                highlight: CUBOID_HIGHLIGHT,
            },
            // Switch chassis and PSUs never react to hover
            EquipmentKind::CabinetSwitch | EquipmentKind::Switch | EquipmentKind::Psu => Self {
                idle: CHASSIS,
                highlight: CHASSIS,
            },
        }
    }
}

/// Per-instance hover state
///
/// Mutated only by pointer enter/leave. Leaving always restores the idle
/// palette, however many enters preceded it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    scheme: PaletteScheme,
    hovered: bool,
}

impl HoverState {
    pub fn new(scheme: PaletteScheme) -> Self {
        Self {
            scheme,
            hovered: false,
        }
    }

    pub fn current(&self) -> Palette {
        if self.hovered {
            self.scheme.highlight
        } else {
            self.scheme.idle
        }
    }

    /// Returns true when the palette changed
    pub fn enter(&mut self) -> bool {
        let changed = !self.hovered;
        self.hovered = true;
        changed
    }

    /// Returns true when the palette changed
    pub fn leave(&mut self) -> bool {
        let changed = self.hovered;
        self.hovered = false;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#629e4f"), Some(Rgb::new(0x62, 0x9e, 0x4f)));
        assert_eq!(Rgb::from_hex("FF8181"), Some(Rgb::new(0xff, 0x81, 0x81)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zz0000"), None);
        assert_eq!(Rgb::new(0x01, 0xa0, 0xae).to_hex(), "#01a0ae");
    }

    #[test]
    fn test_rgb_serde_uses_hex_strings() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Wrapper {
            color: Rgb,
        }

        let parsed: Wrapper = toml::from_str(r##"color = "#0000ff""##).unwrap();
        assert_eq!(parsed.color, Rgb::new(0, 0, 0xff));
        assert_eq!(
            toml::to_string(&parsed).unwrap().trim(),
            r##"color = "#0000ff""##
        );

        let err = toml::from_str::<Wrapper>(r#"color = "blue""#).unwrap_err();
        assert!(err.to_string().contains("expected #rrggbb"), "{err}");
    }

    #[test]
    fn test_hover_cycle_restores_original() {
        let kinds = [
            EquipmentKind::RackServer,
            EquipmentKind::RackSwitch,
            EquipmentKind::Cabinet,
            EquipmentKind::Cuboid,
            EquipmentKind::CuboidIsolated,
            EquipmentKind::Switch,
            EquipmentKind::Psu,
        ];

        for kind in kinds {
            let mut state = HoverState::new(PaletteScheme::for_kind(kind));
            let original = state.current();

            state.enter();
            state.leave();
            assert_eq!(state.current(), original, "{kind}");

            // Repeated enters still come back with a single leave
            state.enter();
            state.enter();
            state.leave();
            assert_eq!(state.current(), original, "{kind}");
        }
    }

    #[test]
    fn test_rack_highlight_palette() {
        let mut state = HoverState::new(PaletteScheme::for_kind(EquipmentKind::RackServer));
        assert!(state.enter());
        assert!(!state.enter());

        let palette = state.current();
        assert_eq!(palette.primary.to_hex(), "#ff0000");
        assert_eq!(palette.secondary.to_hex(), "#ff8181");
        assert_eq!(palette.opacity, 0.3);
    }
}
