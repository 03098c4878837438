//! Rackview Scene - Bevy plugins for the data-center floor viewer
//!
//! This crate turns a floor layout into a live scene: equipment shells that
//! highlight under the pointer, screen-space labels, a tween ticker driving
//! the 3D/2D flatten transition and double-click focus, plus the egui
//! toolbar. Windowing and picking backends are left to the host app.

pub mod annotation;
pub mod camera;
pub mod dimension;
pub mod equipment;
pub mod focus;
pub mod loading;
pub mod primitives;
pub mod scene;
pub mod tween;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use rackview_core::{FloorLayout, ViewerConfig};

/// Plugin that sets up the whole floor scene
pub struct RackviewScenePlugin {
    pub config: ViewerConfig,
    pub layout: FloorLayout,
}

impl Plugin for RackviewScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ViewerSettings(self.config.clone()))
            .insert_resource(FloorTable(self.layout.clone()))
            .add_plugins(tween::TweenPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(loading::LoadingPlugin)
            .add_plugins(scene::ScenePlugin)
            .add_plugins(equipment::EquipmentPlugin)
            .add_plugins(annotation::AnnotationPlugin)
            .add_plugins(dimension::DimensionPlugin)
            .add_plugins(focus::FocusPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
pub use camera::{MainCamera, OrbitRig};
pub use dimension::{DimensionChanged, DimensionController, DimensionScope};
pub use tween::{Easing, TweenRegistry};
