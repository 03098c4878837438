//! Double-click focus
//!
//! Double-clicking a surface of the floor moves the orbit target to the
//! clicked point. Objects with a [`FocusPreset`] also fly the camera to a
//! fixed framing.

use bevy::prelude::*;
use bevy_picking::events::{Click, Pointer};
use bevy_picking::pointer::PointerButton;
use std::time::Duration;

use crate::camera::{MainCamera, OrbitRig};
use crate::dimension::FloorGroup;
use crate::tween::{Easing, TweenId, TweenProperty, TweenRegistry};
use crate::types::ViewerSettings;

/// Camera framing applied when the carrier is double-clicked
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FocusPreset {
    pub camera_position: Vec3,
}

/// Pairs primary clicks into double-clicks
#[derive(Resource, Debug, Default)]
pub struct DoubleClickTracker {
    last_click: Option<Duration>,
}

impl DoubleClickTracker {
    /// Record a click at `now`; true when it completes a double-click
    pub fn register(&mut self, now: Duration, window: Duration) -> bool {
        match self.last_click.take() {
            Some(previous) if now.saturating_sub(previous) <= window => true,
            _ => {
                self.last_click = Some(now);
                false
            }
        }
    }
}

pub struct FocusPlugin;

impl Plugin for FocusPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DoubleClickTracker>()
            .add_observer(on_click);
    }
}

/// Start the focus tweens for a double-click at `point`
pub fn start_focus(
    registry: &mut TweenRegistry,
    settings: &ViewerSettings,
    camera: Entity,
    point: Vec3,
    preset: Option<&FocusPreset>,
) -> Vec<TweenId> {
    let mut ids = vec![registry.start(
        camera,
        TweenProperty::OrbitTarget,
        point,
        settings.focus_duration(),
        Easing::CubicOut,
    )];
    if let Some(preset) = preset {
        ids.push(registry.start(
            camera,
            TweenProperty::Translation,
            preset.camera_position,
            settings.preset_focus_duration(),
            Easing::CubicOut,
        ));
    }
    ids
}

#[derive(Default)]
struct ClickOrigin {
    on_floor: bool,
    preset: Option<FocusPreset>,
}

fn click_origin(
    entity: Entity,
    floors: &Query<(), With<FloorGroup>>,
    presets: &Query<&FocusPreset>,
    parents: &Query<&ChildOf>,
) -> ClickOrigin {
    let mut origin = ClickOrigin::default();
    let mut current = Some(entity);
    while let Some(entity) = current {
        if floors.contains(entity) {
            origin.on_floor = true;
        }
        if origin.preset.is_none() {
            origin.preset = presets.get(entity).ok().copied();
        }
        current = parents.get(entity).ok().map(|c| c.parent());
    }
    origin
}

#[allow(clippy::too_many_arguments)]
fn on_click(
    mut trigger: On<Pointer<Click>>,
    time: Res<Time>,
    settings: Res<ViewerSettings>,
    floors: Query<(), With<FloorGroup>>,
    presets: Query<&FocusPreset>,
    parents: Query<&ChildOf>,
    cameras: Query<Entity, (With<MainCamera>, With<OrbitRig>)>,
    mut tracker: ResMut<DoubleClickTracker>,
    mut registry: ResMut<TweenRegistry>,
) {
    let click = trigger.event();
    if click.button != PointerButton::Primary {
        return;
    }
    let origin = click_origin(click.event_target(), &floors, &presets, &parents);
    if !origin.on_floor && origin.preset.is_none() {
        return;
    }
    let point = click.hit.position;
    trigger.propagate(false);

    if !tracker.register(time.elapsed(), settings.double_click_window()) {
        return;
    }
    let Some(point) = point else {
        return;
    };
    let Ok(camera) = cameras.single() else {
        return;
    };

    start_focus(&mut registry, &settings, camera, point, origin.preset.as_ref());
    tracing::info!(?point, preset = origin.preset.is_some(), "Focusing on double-click");
}
