//! Main camera and orbit controls
//!
//! The camera's translation is the source of truth for its framing; the
//! [`OrbitRig`] only carries the point it orbits around. Both may be driven
//! by tweens, so the camera re-aims at the rig target after the ticker runs.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use rackview_core::CameraConfig;

use crate::tween::TweenSystems;
use crate::types::vec3;

/// Smallest polar angle from straight up; keeps `look_at` away from the pole
pub const MIN_POLAR_ANGLE: f32 = 0.01;
/// Pan distance per pixel, relative to the orbit radius
const PAN_SPEED: f32 = 0.002;
/// Pixel-unit wheel deltas are scaled down to roughly match line units
const PIXELS_PER_LINE: f32 = 40.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitRig {
    pub target: Vec3,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_sensitivity: f32,
    pub zoom_speed: f32,
}

impl OrbitRig {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            target: vec3(config.target),
            max_polar_angle: config.max_polar_angle,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            rotate_sensitivity: config.rotate_sensitivity,
            zoom_speed: config.zoom_speed,
        }
    }
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                orbit_controls.before(TweenSystems),
                look_at_target.after(TweenSystems),
            ),
        );
    }
}

/// Rotate `position` around `target` by a drag of `delta` pixels
///
/// Azimuth turns around the world Y axis; the polar angle is clamped to
/// `[MIN_POLAR_ANGLE, max_polar]` so the camera cannot pass the zenith or
/// drop below the floor.
pub fn orbit_position(position: Vec3, target: Vec3, delta: Vec2, sensitivity: f32, max_polar: f32) -> Vec3 {
    let offset = position - target;
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return position;
    }

    let azimuth = offset.x.atan2(offset.z) - delta.x * sensitivity;
    let polar = (offset.y / radius).clamp(-1.0, 1.0).acos() - delta.y * sensitivity;
    let polar = polar.clamp(MIN_POLAR_ANGLE, max_polar.max(MIN_POLAR_ANGLE));

    target
        + radius
            * Vec3::new(
                polar.sin() * azimuth.sin(),
                polar.cos(),
                polar.sin() * azimuth.cos(),
            )
}

/// Move `position` along the view ray for `scroll` wheel lines
pub fn zoom_position(position: Vec3, target: Vec3, scroll: f32, zoom_speed: f32, min: f32, max: f32) -> Vec3 {
    let offset = position - target;
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return position;
    }
    let zoom_factor = (1.0 - scroll * zoom_speed).max(0.0);
    let distance = (radius * zoom_factor).clamp(min, max);
    target + offset / radius * distance
}

/// World-space translation for a pan drag of `delta` pixels
pub fn pan_offset(right: Vec3, up: Vec3, distance: f32, delta: Vec2) -> Vec3 {
    let speed = distance * PAN_SPEED;
    -right * delta.x * speed + up * delta.y * speed
}

fn normalized_scroll(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => y,
        MouseScrollUnit::Pixel => y / PIXELS_PER_LINE,
    }
}

fn orbit_controls(
    mut camera_query: Query<(&mut Transform, &mut OrbitRig), With<MainCamera>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
) {
    // Don't steal input from the toolbar
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let motion: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let scroll: f32 = mouse_wheel
        .read()
        .map(|w| normalized_scroll(w.unit, w.y))
        .sum();

    if egui_wants_pointer {
        return;
    }

    let Ok((mut transform, mut rig)) = camera_query.single_mut() else {
        return;
    };

    if motion != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            transform.translation = orbit_position(
                transform.translation,
                rig.target,
                motion,
                rig.rotate_sensitivity,
                rig.max_polar_angle,
            );
        } else if mouse_button.pressed(MouseButton::Right) {
            let distance = transform.translation.distance(rig.target);
            let offset = pan_offset(*transform.right(), *transform.up(), distance, motion);
            transform.translation += offset;
            rig.target += offset;
        }
    }

    if scroll != 0.0 {
        transform.translation = zoom_position(
            transform.translation,
            rig.target,
            scroll,
            rig.zoom_speed,
            rig.min_distance,
            rig.max_distance,
        );
    }
}

/// Aim the camera at its orbit target
pub fn look_at_target(mut camera_query: Query<(&mut Transform, &OrbitRig), With<MainCamera>>) {
    for (mut transform, rig) in camera_query.iter_mut() {
        if transform.translation.distance_squared(rig.target) > f32::EPSILON {
            transform.look_at(rig.target, Vec3::Y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn polar_of(position: Vec3, target: Vec3) -> f32 {
        let offset = position - target;
        (offset.y / offset.length()).acos()
    }

    #[test]
    fn test_orbit_keeps_radius() {
        let target = Vec3::new(0.0, 1.0, 0.0);
        let start = Vec3::new(5.0, 25.0, 50.0);
        let moved = orbit_position(start, target, Vec2::new(120.0, -40.0), 0.005, FRAC_PI_2);
        assert!((moved.distance(target) - start.distance(target)).abs() < 1e-3);
        assert!(moved.distance(start) > 0.1);
    }

    #[test]
    fn test_orbit_clamps_polar_angle() {
        let target = Vec3::ZERO;
        let start = Vec3::new(0.0, 10.0, 10.0);

        // A long drag one way would put the camera under the floor
        let low = orbit_position(start, target, Vec2::new(0.0, -10_000.0), 0.005, FRAC_PI_2);
        assert!((polar_of(low, target) - FRAC_PI_2).abs() < 1e-4);
        assert!(low.y >= -1e-4);

        // The other way stops just short of the zenith
        let high = orbit_position(start, target, Vec2::new(0.0, 10_000.0), 0.005, FRAC_PI_2);
        assert!((polar_of(high, target) - MIN_POLAR_ANGLE).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let target = Vec3::ZERO;
        let start = Vec3::new(0.0, 0.0, 10.0);

        let closer = zoom_position(start, target, 1.0, 0.1, 1.0, 200.0);
        assert!((closer.z - 9.0).abs() < 1e-4);

        let clamped = zoom_position(start, target, 100.0, 0.1, 1.0, 200.0);
        assert!((clamped.length() - 1.0).abs() < 1e-4);

        let far = zoom_position(start, target, -1_000.0, 0.1, 1.0, 200.0);
        assert!((far.length() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_pan_moves_against_drag() {
        let offset = pan_offset(Vec3::X, Vec3::Y, 10.0, Vec2::new(50.0, 0.0));
        assert!(offset.x < 0.0);
        assert!((offset.x + 1.0).abs() < 1e-5);
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn test_pixel_scroll_is_normalized() {
        assert_eq!(normalized_scroll(MouseScrollUnit::Line, 2.0), 2.0);
        assert_eq!(normalized_scroll(MouseScrollUnit::Pixel, 80.0), 2.0);
    }

    #[test]
    fn test_camera_looks_at_rig_target() {
        let mut app = App::new();
        app.add_systems(Update, look_at_target);

        let camera = app
            .world_mut()
            .spawn((
                MainCamera,
                Transform::from_xyz(0.0, 0.0, 10.0),
                OrbitRig {
                    target: Vec3::new(0.0, 0.0, 0.0),
                    ..default()
                },
            ))
            .id();
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        let forward = *transform.forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-4);
    }
}
