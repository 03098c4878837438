//! Rackview Core - Layout tables, shell geometry and viewer configuration
//!
//! This crate provides the renderer-independent pieces of the floor viewer:
//! - Layout tables describing which equipment sits where on the floor
//! - Shell plans: the faces, poles and annotation anchor of each equipment kind
//! - Hover palettes and the per-instance hover state machine
//! - Dimension mode (3D / flattened 2D) and the heights derived from it
//! - Viewer configuration loaded from TOML

pub mod config;
pub mod dimension;
pub mod layout;
pub mod palette;
pub mod shell;

pub use config::{
    AccentLightConfig, AnimationConfig, AssetsConfig, CameraConfig, ConfigError, EnvironmentConfig,
    EnvironmentMapConfig, GlassPanelConfig, ViewerConfig,
};
pub use dimension::DimensionMode;
pub use layout::{EquipmentDescriptor, EquipmentKind, FloorLayout, GlobeDescriptor, LayoutError, ShellSize};
pub use palette::{HoverState, Palette, PaletteScheme, Rgb, Tone};
pub use shell::{FaceFinish, FacePlan, FaceRole, PolePlan, ShellPlan, TextureSlot};
