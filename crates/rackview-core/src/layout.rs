//! Floor layout tables - which equipment exists where
//!
//! A layout is a static table of equipment descriptors (plus optional demo
//! globes) consumed by the scene's layout-instantiation pass. Keeping it as
//! data decouples "what equipment exists where" from "how it renders".

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read layout: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse layout: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize layout: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Failed to encode layout as JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Kind of equipment shell to build for a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentKind {
    /// Open rack with corner poles, full-width right side
    RackServer,
    /// Open rack with corner poles, right side pulled in by 0.5
    RackSwitch,
    /// Centered cabinet with corner poles (A-row)
    Cabinet,
    /// Centered switch chassis mounted inside a cabinet
    CabinetSwitch,
    /// Solid block (AC units), re-laid to a fixed height in 2D
    Cuboid,
    /// Solid block (UPS banks) with its own flatten group
    CuboidIsolated,
    /// Standalone network switch
    Switch,
    /// Power supply unit
    Psu,
}

impl EquipmentKind {
    /// Whether this kind carries a top-face annotation
    pub fn is_labelled(self) -> bool {
        matches!(
            self,
            Self::RackServer | Self::RackSwitch | Self::Cabinet | Self::Cuboid | Self::CuboidIsolated
        )
    }

    /// Whether this kind swaps palettes on pointer hover
    pub fn reacts_to_hover(self) -> bool {
        self.is_labelled()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RackServer => "rack-server",
            Self::RackSwitch => "rack-switch",
            Self::Cabinet => "cabinet",
            Self::CabinetSwitch => "cabinet-switch",
            Self::Cuboid => "cuboid",
            Self::CuboidIsolated => "cuboid-isolated",
            Self::Switch => "switch",
            Self::Psu => "psu",
        }
    }
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shell extents as a (depth, height, width) triple
///
/// Serialized as a plain `[depth, height, width]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct ShellSize {
    pub depth: f32,
    pub height: f32,
    pub width: f32,
}

impl ShellSize {
    pub const fn new(depth: f32, height: f32, width: f32) -> Self {
        Self { depth, height, width }
    }

    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// True when every extent is a finite, non-negative number
    pub fn is_well_formed(&self) -> bool {
        [self.depth, self.height, self.width]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Default for ShellSize {
    fn default() -> Self {
        Self::new(0.01, 5.0, 2.0)
    }
}

impl From<[f32; 3]> for ShellSize {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<ShellSize> for [f32; 3] {
    fn from(s: ShellSize) -> Self {
        [s.depth, s.height, s.width]
    }
}

/// One piece of equipment on the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDescriptor {
    /// Annotation text (empty for unlabelled equipment)
    #[serde(default)]
    pub label: String,
    pub kind: EquipmentKind,
    /// Shell origin in floor coordinates
    pub position: [f32; 3],
    #[serde(default)]
    pub size: ShellSize,
}

impl EquipmentDescriptor {
    pub fn new(label: impl Into<String>, kind: EquipmentKind, position: [f32; 3], size: ShellSize) -> Self {
        Self {
            label: label.into(),
            kind,
            position,
            size,
        }
    }
}

/// Textured demo sphere with an optional camera focus preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeDescriptor {
    #[serde(default)]
    pub label: String,
    pub position: [f32; 3],
    #[serde(default = "default_globe_radius")]
    pub radius: f32,
    #[serde(default = "default_globe_scale")]
    pub scale: f32,
    /// Texture path relative to the asset root
    pub texture: String,
    /// Camera position to fly to when the globe is double-clicked
    #[serde(default)]
    pub focus_camera: Option<[f32; 3]>,
}

fn default_globe_radius() -> f32 {
    1.0
}

fn default_globe_scale() -> f32 {
    1.0
}

/// A complete floor layout table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorLayout {
    #[serde(default)]
    pub equipment: Vec<EquipmentDescriptor>,
    #[serde(default)]
    pub globe: Vec<GlobeDescriptor>,
}

/// Spacing between neighbouring cabinets in a row
const ROW_PITCH: f32 = 2.2;

impl FloorLayout {
    /// Load a layout table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a layout table from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, LayoutError> {
        let layout: FloorLayout = toml::from_str(content)?;
        Ok(layout)
    }

    pub fn to_toml(&self) -> Result<String, LayoutError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The built-in data-center floor
    ///
    /// A-row cabinets with a switch stack in AD, a B-row of open racks, two
    /// AC units and a UPS bank with its PSUs.
    pub fn default_floor() -> Self {
        let cabinet = ShellSize::new(0.01, 5.0, 2.0);
        let mut equipment = Vec::new();

        for (i, label) in ["AA", "AB", "AC", "AD"].iter().enumerate() {
            equipment.push(EquipmentDescriptor::new(
                *label,
                EquipmentKind::Cabinet,
                [-(i as f32) * ROW_PITCH, 0.0, 0.0],
                cabinet,
            ));
        }

        // Switch stack mounted in AD
        for y in [2.0, 2.3, 2.6, 2.9] {
            equipment.push(EquipmentDescriptor::new(
                "",
                EquipmentKind::CabinetSwitch,
                [-3.0 * ROW_PITCH, y, 0.0],
                ShellSize::new(0.01, 0.2, 1.8),
            ));
        }

        for (i, label) in ["BA", "BB", "BC"].iter().enumerate() {
            equipment.push(EquipmentDescriptor::new(
                *label,
                EquipmentKind::RackServer,
                [-(i as f32) * ROW_PITCH - 1.0, 0.0, -5.0],
                cabinet,
            ));
        }
        equipment.push(EquipmentDescriptor::new(
            "BD",
            EquipmentKind::RackSwitch,
            [-3.0 * ROW_PITCH - 1.0, 0.0, -5.0],
            cabinet,
        ));

        for (i, label) in ["AC-1", "AC-2"].iter().enumerate() {
            equipment.push(EquipmentDescriptor::new(
                *label,
                EquipmentKind::Cuboid,
                [-(i as f32) * 4.0 - 1.5, 0.0, 5.0],
                ShellSize::new(1.5, 4.0, 2.5),
            ));
        }

        for (i, label) in ["UPS-1", "UPS-2"].iter().enumerate() {
            equipment.push(EquipmentDescriptor::new(
                *label,
                EquipmentKind::CuboidIsolated,
                [4.0, 0.0, -(i as f32) * 2.5],
                ShellSize::new(1.6, 3.0, 1.8),
            ));
        }
        for i in 0..2 {
            equipment.push(EquipmentDescriptor::new(
                "",
                EquipmentKind::Psu,
                [7.5, 0.0, -(i as f32) * 2.5],
                ShellSize::new(0.01, 1.5, 1.2),
            ));
        }

        Self {
            equipment,
            globe: Vec::new(),
        }
    }

    /// Non-fatal problems with the table, one message per finding
    ///
    /// Malformed sizes and duplicate labels still render; callers log these.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (i, item) in self.equipment.iter().enumerate() {
            if !item.size.is_well_formed() {
                warnings.push(format!(
                    "equipment #{} ({} '{}') has malformed size {:?}",
                    i, item.kind, item.label, item.size
                ));
            }
            if !item.label.is_empty() && !seen.insert(item.label.as_str()) {
                warnings.push(format!("duplicate equipment label '{}'", item.label));
            }
        }

        for globe in &self.globe {
            if !(globe.radius.is_finite() && globe.radius > 0.0) {
                warnings.push(format!("globe '{}' has non-positive radius {}", globe.label, globe.radius));
            }
        }

        warnings
    }
}
