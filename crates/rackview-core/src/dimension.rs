//! Dimension mode: full 3D framing vs the flattened 2D floor plan

use crate::layout::{EquipmentKind, ShellSize};
use serde::{Deserialize, Serialize};

/// Height plain cuboids are re-laid to while the floor is flattened
pub const FLAT_CUBOID_HEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DimensionMode {
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "2d")]
    TwoD,
}

impl DimensionMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::ThreeD => Self::TwoD,
            Self::TwoD => Self::ThreeD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ThreeD => "3D",
            Self::TwoD => "2D",
        }
    }
}

impl std::fmt::Display for DimensionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Shell size an equipment kind renders with in the given mode
pub fn effective_size(kind: EquipmentKind, size: ShellSize, mode: DimensionMode) -> ShellSize {
    match (kind, mode) {
        (EquipmentKind::Cuboid, DimensionMode::TwoD) => size.with_height(FLAT_CUBOID_HEIGHT),
        _ => size,
    }
}

/// Vertical scale of a flattened group for the given mode
pub fn vertical_scale(mode: DimensionMode, flat_scale: f32) -> f32 {
    match mode {
        DimensionMode::ThreeD => 1.0,
        DimensionMode::TwoD => flat_scale,
    }
}
