//! Equipment shells and their hover behavior
//!
//! A shell is a root entity carrying [`Equipment`] and [`EquipmentHover`],
//! with one child per face and per pole. Faces share the unit cube mesh and
//! each owns its material, so hovering one shell repaints only that shell.

use bevy::prelude::*;
use bevy_picking::events::{Out, Over, Pointer};
use rackview_core::dimension::effective_size;
use rackview_core::{
    EquipmentDescriptor, EquipmentKind, FaceFinish, FaceRole, HoverState, Palette, PaletteScheme,
    Rgb, ShellPlan, ShellSize,
};

use crate::annotation::Annotation;
use crate::dimension::{DimensionScope, DimensionStarted};
use crate::loading::SlotMaterials;
use crate::primitives::{box_transform, flat_material, repaint, PrimitiveMeshes};
use crate::types::{vec3, HoveredEquipment};

#[derive(Component, Debug, Clone)]
pub struct Equipment {
    pub label: String,
    pub kind: EquipmentKind,
    /// Configured size; the rendered size may differ while flattened
    pub size: ShellSize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ShellFace {
    pub role: FaceRole,
    pub finish: FaceFinish,
}

#[derive(Component)]
pub struct RackPole;

#[derive(Component, Debug, Clone, Copy)]
pub struct EquipmentHover(pub HoverState);

/// Shells flattened by the "Isolate" toggle rather than with the floor
#[derive(Component)]
pub struct IsolationGroup;

pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoveredEquipment>()
            .add_observer(on_hover_start)
            .add_observer(on_hover_end)
            .add_systems(Update, relayout_cuboids);
    }
}

/// Spawn one equipment shell under `parent`
pub fn spawn_equipment(
    commands: &mut Commands,
    parent: Entity,
    descriptor: &EquipmentDescriptor,
    primitives: &PrimitiveMeshes,
    slot_materials: &SlotMaterials,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let kind = descriptor.kind;
    let plan = ShellPlan::for_kind(kind, descriptor.size);
    let hover = HoverState::new(PaletteScheme::for_kind(kind));
    let palette = hover.current();

    let mut root = commands.spawn((
        Name::new(format!("{} {}", kind, descriptor.label)),
        Equipment {
            label: descriptor.label.clone(),
            kind,
            size: descriptor.size,
        },
        EquipmentHover(hover),
        Transform::from_translation(vec3(descriptor.position)),
        Visibility::default(),
        ChildOf(parent),
    ));
    if kind == EquipmentKind::CuboidIsolated {
        root.insert(IsolationGroup);
    }
    let root = root.id();

    for face in &plan.faces {
        let material = match face.finish {
            FaceFinish::Textured(slot) => slot_materials.get(slot),
            finish => {
                let (color, opacity) = face_paint(finish, &palette);
                materials.add(flat_material(color, opacity, face.double_sided))
            }
        };

        let mut entity = commands.spawn((
            ShellFace {
                role: face.role,
                finish: face.finish,
            },
            Mesh3d(primitives.unit_cube.clone()),
            MeshMaterial3d(material),
            box_transform(vec3(face.center), vec3(face.extents)),
            ChildOf(root),
        ));

        if face.role == FaceRole::Top {
            if let Some(anchor) = plan.annotation_anchor {
                entity.insert(Annotation {
                    text: descriptor.label.clone(),
                    anchor: vec3(anchor),
                });
            }
        }
    }

    for pole in &plan.poles {
        commands.spawn((
            RackPole,
            Mesh3d(primitives.unit_cube.clone()),
            MeshMaterial3d(slot_materials.rack_pole.clone()),
            box_transform(vec3(pole.center), vec3(pole.extents)),
            ChildOf(root),
        ));
    }

    root
}

/// Color and opacity a non-textured face takes under `palette`
fn face_paint(finish: FaceFinish, palette: &Palette) -> (Rgb, f32) {
    match finish {
        FaceFinish::Palette {
            tone,
            follows_opacity,
        } => {
            let opacity = if follows_opacity { palette.opacity } else { 1.0 };
            (palette.tone(tone), opacity)
        }
        FaceFinish::Fixed { color, opacity } => (color, opacity),
        // Textured faces never take palette colors
        FaceFinish::Textured(_) => (Rgb::WHITE, 1.0),
    }
}

/// Nearest ancestor (including self) carrying [`Equipment`]
pub fn find_equipment_ancestor(
    entity: Entity,
    shells: &Query<&Equipment>,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        if shells.contains(current) {
            return Some(current);
        }
        current = parents.get(current).ok()?.parent();
    }
}

/// Repaint every palette-driven face of `root`
fn paint_shell(
    root: Entity,
    palette: &Palette,
    children: &Query<&Children>,
    faces: &Query<(&ShellFace, &MeshMaterial3d<StandardMaterial>)>,
    materials: &mut Assets<StandardMaterial>,
) {
    let Ok(children) = children.get(root) else {
        return;
    };
    for child in children.iter() {
        let Ok((face, handle)) = faces.get(child) else {
            continue;
        };
        if !matches!(face.finish, FaceFinish::Palette { .. }) {
            continue;
        }
        if let Some(material) = materials.get_mut(&handle.0) {
            let (color, opacity) = face_paint(face.finish, palette);
            repaint(material, color, opacity);
        }
    }
}

/// Enter or leave hover on the shell `root`; returns true when it repainted
pub fn set_hover(
    root: Entity,
    entering: bool,
    hovers: &mut Query<(&Equipment, &mut EquipmentHover)>,
    children: &Query<&Children>,
    faces: &Query<(&ShellFace, &MeshMaterial3d<StandardMaterial>)>,
    materials: &mut Assets<StandardMaterial>,
    hovered: &mut HoveredEquipment,
) -> bool {
    let Ok((equipment, mut hover)) = hovers.get_mut(root) else {
        return false;
    };
    if !equipment.kind.reacts_to_hover() {
        return false;
    }

    if entering {
        hovered.0 = Some(equipment.label.clone());
    } else if hovered.0.as_deref() == Some(equipment.label.as_str()) {
        hovered.0 = None;
    }

    let changed = if entering {
        hover.0.enter()
    } else {
        hover.0.leave()
    };
    if changed {
        paint_shell(root, &hover.0.current(), children, faces, materials);
    }
    changed
}

#[allow(clippy::too_many_arguments)]
fn on_hover_start(
    mut trigger: On<Pointer<Over>>,
    shells: Query<&Equipment>,
    parents: Query<&ChildOf>,
    mut hovers: Query<(&Equipment, &mut EquipmentHover)>,
    children: Query<&Children>,
    faces: Query<(&ShellFace, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut hovered: ResMut<HoveredEquipment>,
) {
    let entity = trigger.event().event_target();
    let Some(root) = find_equipment_ancestor(entity, &shells, &parents) else {
        return;
    };
    // Stop at the shell
    trigger.propagate(false);

    if set_hover(root, true, &mut hovers, &children, &faces, &mut materials, &mut hovered) {
        tracing::debug!(entity = ?root, "Equipment hovered");
    }
}

#[allow(clippy::too_many_arguments)]
fn on_hover_end(
    mut trigger: On<Pointer<Out>>,
    shells: Query<&Equipment>,
    parents: Query<&ChildOf>,
    mut hovers: Query<(&Equipment, &mut EquipmentHover)>,
    children: Query<&Children>,
    faces: Query<(&ShellFace, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut hovered: ResMut<HoveredEquipment>,
) {
    let entity = trigger.event().event_target();
    let Some(root) = find_equipment_ancestor(entity, &shells, &parents) else {
        return;
    };
    trigger.propagate(false);

    set_hover(root, false, &mut hovers, &children, &faces, &mut materials, &mut hovered);
}

/// Re-lay plain cuboid faces when a floor transition starts
fn relayout_cuboids(
    mut started: MessageReader<DimensionStarted>,
    shells: Query<(&Equipment, &Children)>,
    mut faces: Query<(&ShellFace, &mut Transform, Option<&mut Annotation>)>,
) {
    let Some(mode) = started
        .read()
        .filter(|m| m.scope == DimensionScope::Floor)
        .map(|m| m.mode)
        .last()
    else {
        return;
    };

    for (equipment, children) in shells.iter() {
        if equipment.kind != EquipmentKind::Cuboid {
            continue;
        }
        let size = effective_size(equipment.kind, equipment.size, mode);
        let plan = ShellPlan::for_kind(equipment.kind, size);

        for child in children.iter() {
            let Ok((face, mut transform, annotation)) = faces.get_mut(child) else {
                continue;
            };
            if let Some(planned) = plan.face(face.role) {
                *transform = box_transform(vec3(planned.center), vec3(planned.extents));
            }
            if let (Some(mut annotation), Some(anchor)) = (annotation, plan.annotation_anchor) {
                annotation.anchor = vec3(anchor);
            }
        }
        tracing::debug!(label = %equipment.label, height = size.height, "Re-laid cuboid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use rackview_core::DimensionMode;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<HoveredEquipment>()
            .add_message::<DimensionStarted>()
            .add_systems(Update, relayout_cuboids);
        app
    }

    fn spawn(app: &mut App, descriptor: EquipmentDescriptor) -> Entity {
        let world = app.world_mut();
        let primitives = PrimitiveMeshes::from_world(world);
        let floor = world.spawn((Transform::default(), Visibility::default())).id();
        world
            .run_system_once(
                move |mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>| {
                    spawn_equipment(
                        &mut commands,
                        floor,
                        &descriptor,
                        &primitives,
                        &SlotMaterials::default(),
                        &mut materials,
                    )
                },
            )
            .unwrap()
    }

    fn hover(app: &mut App, root: Entity, entering: bool) -> bool {
        app.world_mut()
            .run_system_once(
                move |mut hovers: Query<(&Equipment, &mut EquipmentHover)>,
                      children: Query<&Children>,
                      faces: Query<(&ShellFace, &MeshMaterial3d<StandardMaterial>)>,
                      mut materials: ResMut<Assets<StandardMaterial>>,
                      mut hovered: ResMut<HoveredEquipment>| {
                    set_hover(
                        root,
                        entering,
                        &mut hovers,
                        &children,
                        &faces,
                        &mut materials,
                        &mut hovered,
                    )
                },
            )
            .unwrap()
    }

    fn face_colors(app: &mut App, root: Entity) -> Vec<(FaceRole, Color)> {
        let world = app.world_mut();
        let mut faces: Vec<(FaceRole, Handle<StandardMaterial>)> = Vec::new();
        let children: Vec<Entity> = world.get::<Children>(root).unwrap().iter().collect();
        for child in children {
            if let (Some(face), Some(material)) = (
                world.get::<ShellFace>(child),
                world.get::<MeshMaterial3d<StandardMaterial>>(child),
            ) {
                faces.push((face.role, material.0.clone()));
            }
        }
        let materials = world.resource::<Assets<StandardMaterial>>();
        faces
            .into_iter()
            .map(|(role, handle)| (role, materials.get(&handle).unwrap().base_color))
            .collect()
    }

    #[test]
    fn test_rack_spawns_faces_poles_and_annotation() {
        let mut app = test_app();
        let root = spawn(
            &mut app,
            EquipmentDescriptor::new("BA", EquipmentKind::RackServer, [0.0, 0.0, 0.0], ShellSize::default()),
        );

        let world = app.world_mut();
        let children: Vec<Entity> = world.get::<Children>(root).unwrap().iter().collect();
        let faces = children.iter().filter(|c| world.get::<ShellFace>(**c).is_some()).count();
        let poles = children.iter().filter(|c| world.get::<RackPole>(**c).is_some()).count();
        assert_eq!(faces, 6);
        assert_eq!(poles, 4);

        let annotations: Vec<&Annotation> = children
            .iter()
            .filter_map(|c| world.get::<Annotation>(*c))
            .collect();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].text, "BA");
        assert_eq!(annotations[0].anchor, Vec3::new(0.0, 65.0, 0.0));
    }

    #[test]
    fn test_hover_cycle_restores_face_colors() {
        let mut app = test_app();
        let root = spawn(
            &mut app,
            EquipmentDescriptor::new("AC-1", EquipmentKind::Cuboid, [0.0, 0.0, 5.0], ShellSize::default()),
        );
        let before = face_colors(&mut app, root);

        assert!(hover(&mut app, root, true));
        assert_eq!(
            app.world().resource::<HoveredEquipment>().0.as_deref(),
            Some("AC-1")
        );
        let highlighted = face_colors(&mut app, root);
        assert_ne!(before, highlighted);
        for (_, color) in &highlighted {
            assert!((color.alpha() - 0.3).abs() < 1e-6);
        }

        // A second enter is a no-op
        assert!(!hover(&mut app, root, true));

        assert!(hover(&mut app, root, false));
        assert_eq!(face_colors(&mut app, root), before);
        assert!(app.world().resource::<HoveredEquipment>().0.is_none());
    }

    #[test]
    fn test_rack_bottom_stays_opaque_while_hovered() {
        let mut app = test_app();
        let root = spawn(
            &mut app,
            EquipmentDescriptor::new("BB", EquipmentKind::RackServer, [0.0, 0.0, 0.0], ShellSize::default()),
        );
        hover(&mut app, root, true);

        for (role, color) in face_colors(&mut app, root) {
            match role {
                FaceRole::Bottom => assert_eq!(color.alpha(), 1.0),
                FaceRole::Left | FaceRole::Right | FaceRole::Top => {
                    assert!((color.alpha() - 0.3).abs() < 1e-6)
                }
                // Front and back panels are invisible either way
                _ => assert_eq!(color.alpha(), 0.0),
            }
        }
    }

    #[test]
    fn test_switch_ignores_hover() {
        let mut app = test_app();
        let root = spawn(
            &mut app,
            EquipmentDescriptor::new("", EquipmentKind::Switch, [0.0, 0.0, 0.0], ShellSize::default()),
        );
        assert!(!hover(&mut app, root, true));
        assert!(app.world().resource::<HoveredEquipment>().0.is_none());
    }

    #[test]
    fn test_ancestor_search_walks_hierarchy() {
        let mut app = test_app();
        let root = spawn(
            &mut app,
            EquipmentDescriptor::new("AA", EquipmentKind::Cabinet, [0.0, 0.0, 0.0], ShellSize::default()),
        );
        let face = app.world().get::<Children>(root).unwrap()[0];

        let found = app
            .world_mut()
            .run_system_once(move |shells: Query<&Equipment>, parents: Query<&ChildOf>| {
                (
                    find_equipment_ancestor(face, &shells, &parents),
                    find_equipment_ancestor(root, &shells, &parents),
                )
            })
            .unwrap();
        assert_eq!(found, (Some(root), Some(root)));
    }

    #[test]
    fn test_cuboid_relayout_follows_floor_transition() {
        let mut app = test_app();
        let root = spawn(
            &mut app,
            EquipmentDescriptor {
                label: "AC-2".to_string(),
                kind: EquipmentKind::Cuboid,
                position: [-5.5, 0.0, 5.0],
                size: ShellSize::new(1.5, 4.0, 2.5),
            },
        );

        let top = |app: &mut App| {
            let world = app.world_mut();
            let children: Vec<Entity> = world.get::<Children>(root).unwrap().iter().collect();
            children
                .into_iter()
                .find(|c| world.get::<ShellFace>(*c).map(|f| f.role) == Some(FaceRole::Top))
                .map(|c| *world.get::<Transform>(c).unwrap())
                .unwrap()
        };
        assert_eq!(top(&mut app).translation.y, 4.0);

        app.world_mut().write_message(DimensionStarted {
            scope: DimensionScope::Floor,
            mode: DimensionMode::TwoD,
        });
        app.update();
        assert_eq!(top(&mut app).translation.y, 2.0);

        // Isolation transitions leave plain cuboids alone
        app.world_mut().write_message(DimensionStarted {
            scope: DimensionScope::Isolated,
            mode: DimensionMode::ThreeD,
        });
        app.update();
        assert_eq!(top(&mut app).translation.y, 2.0);

        app.world_mut().write_message(DimensionStarted {
            scope: DimensionScope::Floor,
            mode: DimensionMode::ThreeD,
        });
        app.update();
        assert_eq!(top(&mut app).translation.y, 4.0);
    }
}
