//! Toolbar and loading overlay using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use rackview_core::DimensionMode;

use crate::dimension::{DimensionController, DimensionScope};
use crate::loading::{AssetTracker, LoadingStatus};
use crate::types::HoveredEquipment;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, (toolbar_system, loading_overlay));
    }
}

/// Label of the floor toggle, naming the mode it switches to
pub fn dimension_button_label(target: DimensionMode) -> &'static str {
    match target {
        DimensionMode::ThreeD => "Switch To 2D",
        DimensionMode::TwoD => "Switch To 3D",
    }
}

pub fn isolate_button_label(target: DimensionMode) -> &'static str {
    match target {
        DimensionMode::ThreeD => "Isolate",
        DimensionMode::TwoD => "Restore",
    }
}

pub fn loading_message(status: &LoadingStatus) -> Option<String> {
    match status {
        LoadingStatus::Ready => None,
        LoadingStatus::Loading { pending, total } => {
            Some(format!("Loading ({}/{})", total - pending, total))
        }
        LoadingStatus::Failed(paths) => Some(format!("Failed to load: {}", paths.join(", "))),
    }
}

fn toolbar_system(
    mut contexts: EguiContexts,
    mut controller: ResMut<DimensionController>,
    hovered: Res<HoveredEquipment>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let floor_busy = controller.is_transitioning(DimensionScope::Floor);
            let floor_label = dimension_button_label(controller.target(DimensionScope::Floor));
            if ui
                .add_enabled(!floor_busy, egui::Button::new(floor_label))
                .clicked()
            {
                controller.request_toggle(DimensionScope::Floor);
            }

            let isolate_busy = controller.is_transitioning(DimensionScope::Isolated);
            let isolate_label = isolate_button_label(controller.target(DimensionScope::Isolated));
            if ui
                .add_enabled(!isolate_busy, egui::Button::new(isolate_label))
                .clicked()
            {
                controller.request_toggle(DimensionScope::Isolated);
            }

            ui.separator();
            match &hovered.0 {
                Some(label) if !label.is_empty() => {
                    ui.label(egui::RichText::new(label).strong());
                }
                _ => {
                    ui.label(egui::RichText::new("Hover equipment for details").weak());
                }
            }
        });
    });
}

fn loading_overlay(mut contexts: EguiContexts, tracker: Res<AssetTracker>) {
    let status = tracker.status();
    let Some(message) = loading_message(&status) else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let color = match status {
        LoadingStatus::Failed(_) => egui::Color32::from_rgb(220, 80, 80),
        _ => egui::Color32::WHITE,
    };

    egui::Area::new(egui::Id::new("loading_overlay"))
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_black_alpha(200))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::symmetric(16, 10))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(message).size(18.0).color(color));
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_button_label() {
        assert_eq!(dimension_button_label(DimensionMode::ThreeD), "Switch To 2D");
        assert_eq!(dimension_button_label(DimensionMode::TwoD), "Switch To 3D");
        assert_eq!(isolate_button_label(DimensionMode::ThreeD), "Isolate");
        assert_eq!(isolate_button_label(DimensionMode::TwoD), "Restore");
    }

    #[test]
    fn test_loading_message() {
        assert_eq!(loading_message(&LoadingStatus::Ready), None);
        assert_eq!(
            loading_message(&LoadingStatus::Loading { pending: 1, total: 4 }).as_deref(),
            Some("Loading (3/4)")
        );
        assert_eq!(
            loading_message(&LoadingStatus::Failed(vec!["textures/moon.jpg".to_string()]))
                .as_deref(),
            Some("Failed to load: textures/moon.jpg")
        );
    }
}
