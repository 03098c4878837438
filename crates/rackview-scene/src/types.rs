//! Shared resources for the floor scene

use bevy::prelude::*;
use rackview_core::{FloorLayout, ViewerConfig};
use std::time::Duration;

/// Viewer configuration the scene was built with
#[derive(Debug, Clone, Resource, Default)]
pub struct ViewerSettings(pub ViewerConfig);

impl ViewerSettings {
    pub fn flatten_duration(&self) -> Duration {
        Duration::from_millis(self.0.animation.flatten_ms)
    }

    pub fn focus_duration(&self) -> Duration {
        Duration::from_millis(self.0.animation.focus_ms)
    }

    pub fn preset_focus_duration(&self) -> Duration {
        Duration::from_millis(self.0.animation.preset_focus_ms)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.0.animation.double_click_ms)
    }
}

/// Layout table consumed by the layout-instantiation pass
#[derive(Debug, Clone, Resource, Default)]
pub struct FloorTable(pub FloorLayout);

/// Label of the equipment currently under the pointer
#[derive(Debug, Clone, Resource, Default)]
pub struct HoveredEquipment(pub Option<String>);

pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}
