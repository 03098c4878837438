//! Screen-space equipment labels
//!
//! Annotations live on a shell's top face. Every frame each one is projected
//! through the main camera and drawn as a small egui card.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::camera::MainCamera;

/// Label size falls off with camera distance by this factor
pub const DISTANCE_FACTOR: f32 = 5.0;
/// Font size of a label one unit of distance factor away
const PIXELS_PER_UNIT: f32 = 140.0;
const MIN_FONT_SIZE: f32 = 9.0;
const MAX_FONT_SIZE: f32 = 28.0;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    /// Position in normalized bounding-box units of the carrying face
    pub anchor: Vec3,
}

pub struct AnnotationPlugin;

impl Plugin for AnnotationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, draw_annotations);
    }
}

/// World position of `anchor` on a unit-cube face placed by `face`
///
/// The face's global transform carries its extents as scale, so one
/// normalized unit is half the face's extent on that axis.
pub fn anchor_world_point(face: &GlobalTransform, anchor: Vec3) -> Vec3 {
    face.transform_point(anchor * 0.5)
}

pub fn label_font_size(distance: f32) -> f32 {
    if distance <= f32::EPSILON {
        return MAX_FONT_SIZE;
    }
    (DISTANCE_FACTOR * PIXELS_PER_UNIT / distance).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Viewport position and font size of an annotation, or None when its
/// anchor is behind the camera or outside the view depth
pub fn project_annotation(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    face: &GlobalTransform,
    anchor: Vec3,
) -> Option<(Vec2, f32)> {
    let world = anchor_world_point(face, anchor);
    let screen = camera.world_to_viewport(camera_transform, world).ok()?;
    let size = label_font_size(camera_transform.translation().distance(world));
    Some((screen, size))
}

fn draw_annotations(
    mut contexts: EguiContexts,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    annotations: Query<(Entity, &Annotation, &GlobalTransform, &InheritedVisibility)>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for (entity, annotation, face, visibility) in annotations.iter() {
        if !visibility.get() {
            continue;
        }
        let Some((screen, size)) =
            project_annotation(camera, camera_transform, face, annotation.anchor)
        else {
            continue;
        };

        egui::Area::new(egui::Id::new(("annotation", entity)))
            .fixed_pos(egui::pos2(screen.x, screen.y))
            .pivot(egui::Align2::CENTER_BOTTOM)
            .order(egui::Order::Background)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::WHITE)
                    .stroke(egui::Stroke::new(3.0, egui::Color32::GRAY))
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&annotation.text)
                                .size(size)
                                .color(egui::Color32::BLACK),
                        );
                    });
            });
    }
}
