//! Viewer configuration loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::layout::{FloorLayout, LayoutError};
use crate::palette::Rgb;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Failed to load layout {}: {source}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Layout table to load instead of the built-in floor
    #[serde(default)]
    pub layout: Option<PathBuf>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Initial camera position
    #[serde(default = "default_oblique_camera")]
    pub position: [f32; 3],
    /// Initial orbit target
    #[serde(default = "default_scene_anchor")]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    /// Largest polar angle from straight up, in radians
    #[serde(default = "default_max_polar")]
    pub max_polar_angle: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Radians of orbit per pixel of drag
    #[serde(default = "default_rotate_sensitivity")]
    pub rotate_sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_oblique_camera(),
            target: default_scene_anchor(),
            fov_degrees: default_fov(),
            max_polar_angle: default_max_polar(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            rotate_sensitivity: default_rotate_sensitivity(),
            zoom_speed: default_zoom_speed(),
        }
    }
}

fn default_oblique_camera() -> [f32; 3] {
    [5.0, 25.0, 50.0]
}

fn default_overhead_camera() -> [f32; 3] {
    [0.0, 60.0, 0.0]
}

fn default_scene_anchor() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    75.0
}

fn default_max_polar() -> f32 {
    std::f32::consts::FRAC_PI_2
}

fn default_min_distance() -> f32 {
    1.0
}

fn default_max_distance() -> f32 {
    200.0
}

fn default_rotate_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Duration of the flatten / unflatten scale tween
    #[serde(default = "default_flatten_ms")]
    pub flatten_ms: u64,
    /// Duration of the orbit-target tween on double-click
    #[serde(default = "default_focus_ms")]
    pub focus_ms: u64,
    /// Duration of the camera tween for objects with a focus preset
    #[serde(default = "default_preset_focus_ms")]
    pub preset_focus_ms: u64,
    /// Vertical scale of the floor group in 2D
    #[serde(default = "default_flat_scale")]
    pub flat_scale: f32,
    /// Vertical scale of isolated equipment in 2D
    #[serde(default = "default_isolated_flat_scale")]
    pub isolated_flat_scale: f32,
    /// Camera position in 2D
    #[serde(default = "default_overhead_camera")]
    pub overhead_camera: [f32; 3],
    /// Camera position in 3D
    #[serde(default = "default_oblique_camera")]
    pub oblique_camera: [f32; 3],
    /// Orbit target for both dimension framings
    #[serde(default = "default_scene_anchor")]
    pub scene_anchor: [f32; 3],
    /// Maximum gap between the two clicks of a double-click
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            flatten_ms: default_flatten_ms(),
            focus_ms: default_focus_ms(),
            preset_focus_ms: default_preset_focus_ms(),
            flat_scale: default_flat_scale(),
            isolated_flat_scale: default_isolated_flat_scale(),
            overhead_camera: default_overhead_camera(),
            oblique_camera: default_oblique_camera(),
            scene_anchor: default_scene_anchor(),
            double_click_ms: default_double_click_ms(),
        }
    }
}

fn default_flatten_ms() -> u64 {
    1000
}

fn default_focus_ms() -> u64 {
    1000
}

fn default_preset_focus_ms() -> u64 {
    2000
}

fn default_flat_scale() -> f32 {
    0.01
}

fn default_isolated_flat_scale() -> f32 {
    // Not exactly zero: a singular scale breaks picking on the flattened shell
    0.001
}

fn default_double_click_ms() -> u64 {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_rack_pole")]
    pub rack_pole: String,
    #[serde(default = "default_switch_front")]
    pub switch_front: String,
    #[serde(default = "default_switch_back")]
    pub switch_back: String,
    /// Optional glTF floor model
    #[serde(default)]
    pub floor_model: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            rack_pole: default_rack_pole(),
            switch_front: default_switch_front(),
            switch_back: default_switch_back(),
            floor_model: None,
        }
    }
}

fn default_rack_pole() -> String {
    "textures/rack_pole.png".to_string()
}

fn default_switch_front() -> String {
    "textures/switch_f.png".to_string()
}

fn default_switch_back() -> String {
    "textures/switch_b.png".to_string()
}

/// Optional room dressing around the floor model; all off by default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub environment_map: Option<EnvironmentMapConfig>,
    #[serde(default)]
    pub glass_panel: Option<GlassPanelConfig>,
    #[serde(default)]
    pub accent_light: Option<AccentLightConfig>,
}

/// Prefiltered KTX2 cubemaps lighting every lit surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMapConfig {
    pub diffuse: String,
    pub specular: String,
    #[serde(default = "default_environment_intensity")]
    pub intensity: f32,
}

fn default_environment_intensity() -> f32 {
    1000.0
}

/// Clear transmissive pane standing in front of the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassPanelConfig {
    pub position: [f32; 3],
    pub size: [f32; 3],
    pub ior: f32,
    pub tint: Rgb,
}

impl Default for GlassPanelConfig {
    fn default() -> Self {
        Self {
            position: [0.5, 18.0, 5.0],
            size: [23.0, 34.0, 0.2],
            ior: 2.33,
            tint: Rgb::WHITE,
        }
    }
}

/// Colored light washing over the glass panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccentLightConfig {
    pub position: [f32; 3],
    pub color: Rgb,
    /// Luminous power in lumens
    pub intensity: f32,
    /// Emitter radius; a large radius softens it into an area-like light
    pub radius: f32,
    pub range: f32,
}

impl Default for AccentLightConfig {
    fn default() -> Self {
        Self {
            position: [0.5, 18.0, 4.0],
            color: Rgb::new(0x00, 0x00, 0xff),
            intensity: 200_000.0,
            radius: 11.5,
            range: 60.0,
        }
    }
}

impl ViewerConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Layout table named by the configuration, or the built-in floor
    pub fn resolve_layout(&self) -> Result<FloorLayout, ConfigError> {
        match &self.layout {
            Some(path) => FloorLayout::from_file(path).map_err(|source| ConfigError::Layout {
                path: path.clone(),
                source,
            }),
            None => Ok(FloorLayout::default_floor()),
        }
    }
}

/// Load configuration from file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = ViewerConfig::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(ViewerConfig::default())
    }
}
