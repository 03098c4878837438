//! Scene asset loading and progress tracking

use bevy::asset::{LoadState, UntypedHandle};
use bevy::prelude::*;
use rackview_core::TextureSlot;
use std::collections::BTreeMap;

use crate::primitives::textured_material;
use crate::types::ViewerSettings;

/// Shared lit materials for the textured shell surfaces
#[derive(Resource, Debug, Clone, Default)]
pub struct SlotMaterials {
    pub rack_pole: Handle<StandardMaterial>,
    pub switch_front: Handle<StandardMaterial>,
    pub switch_back: Handle<StandardMaterial>,
}

impl SlotMaterials {
    pub fn get(&self, slot: TextureSlot) -> Handle<StandardMaterial> {
        match slot {
            TextureSlot::RackPole => self.rack_pole.clone(),
            TextureSlot::SwitchFront => self.switch_front.clone(),
            TextureSlot::SwitchBack => self.switch_back.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingStatus {
    Loading { pending: usize, total: usize },
    Ready,
    /// Asset paths that failed; they are not retried
    Failed(Vec<String>),
}

/// Assets requested at startup, keyed by asset path
#[derive(Resource, Debug, Default)]
pub struct AssetTracker {
    loading: BTreeMap<String, UntypedHandle>,
    failed: Vec<String>,
    total: usize,
}

impl AssetTracker {
    pub fn track(&mut self, path: impl Into<String>, handle: impl Into<UntypedHandle>) {
        if self.loading.insert(path.into(), handle.into()).is_none() {
            self.total += 1;
        }
    }

    pub fn pending(&self) -> usize {
        self.loading.len()
    }

    /// Stop tracking `path`, recording whether it loaded
    pub fn finish(&mut self, path: &str, loaded: bool) {
        if self.loading.remove(path).is_some() && !loaded {
            self.failed.push(path.to_string());
        }
    }

    pub fn status(&self) -> LoadingStatus {
        if !self.failed.is_empty() {
            LoadingStatus::Failed(self.failed.clone())
        } else if !self.loading.is_empty() {
            LoadingStatus::Loading {
                pending: self.loading.len(),
                total: self.total,
            }
        } else {
            LoadingStatus::Ready
        }
    }
}

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssetTracker>()
            .add_systems(PreStartup, load_textures)
            .add_systems(Update, poll_assets);
    }
}

/// Request the shell textures and build their materials
fn load_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut tracker: ResMut<AssetTracker>,
) {
    let assets = &settings.0.assets;
    let mut load = |path: &str| {
        let texture: Handle<Image> = asset_server.load(path.to_string());
        tracker.track(path, texture.clone());
        materials.add(textured_material(texture))
    };

    let slots = SlotMaterials {
        rack_pole: load(&assets.rack_pole),
        switch_front: load(&assets.switch_front),
        switch_back: load(&assets.switch_back),
    };
    commands.insert_resource(slots);
}

/// Check loading state of every tracked asset
fn poll_assets(asset_server: Res<AssetServer>, mut tracker: ResMut<AssetTracker>) {
    if tracker.pending() == 0 {
        return;
    }

    let states: Vec<(String, Option<LoadState>)> = tracker
        .loading
        .iter()
        .map(|(path, handle)| (path.clone(), asset_server.get_load_state(handle.id())))
        .collect();

    for (path, state) in states {
        match state {
            Some(LoadState::Loaded) => {
                tracing::info!("Asset loaded: {}", path);
                tracker.finish(&path, true);
            }
            Some(LoadState::Failed(err)) => {
                tracing::error!("Failed to load asset {}: {}", path, err);
                tracker.finish(&path, false);
            }
            _ => {
                // Still loading
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_status_progression() {
        let mut tracker = AssetTracker::default();
        assert_eq!(tracker.status(), LoadingStatus::Ready);

        tracker.track("textures/rack_pole.png", Handle::<Image>::default());
        tracker.track("textures/switch_f.png", Handle::<Image>::default());
        assert_eq!(
            tracker.status(),
            LoadingStatus::Loading {
                pending: 2,
                total: 2
            }
        );

        tracker.finish("textures/rack_pole.png", true);
        assert_eq!(
            tracker.status(),
            LoadingStatus::Loading {
                pending: 1,
                total: 2
            }
        );

        tracker.finish("textures/switch_f.png", true);
        assert_eq!(tracker.status(), LoadingStatus::Ready);
    }

    #[test]
    fn test_failure_is_reported_once() {
        let mut tracker = AssetTracker::default();
        tracker.track("models/floor.glb", Handle::<Image>::default());
        tracker.finish("models/floor.glb", false);
        tracker.finish("models/floor.glb", false);

        assert_eq!(tracker.pending(), 0);
        assert_eq!(
            tracker.status(),
            LoadingStatus::Failed(vec!["models/floor.glb".to_string()])
        );
    }

    #[test]
    fn test_slot_lookup() {
        let slots = SlotMaterials::default();
        assert_eq!(slots.get(TextureSlot::RackPole), slots.rack_pole);
    }
}
