//! Scene assembly: camera, lights, helpers and the layout pass

use bevy::prelude::*;
use bevy_picking::Pickable;
use rackview_core::{AccentLightConfig, GlobeDescriptor};

use crate::camera::{MainCamera, OrbitRig};
use crate::dimension::FloorGroup;
use crate::equipment::spawn_equipment;
use crate::focus::FocusPreset;
use crate::loading::{AssetTracker, SlotMaterials};
use crate::primitives::{
    box_transform, glass_material, srgb, sphere_mesh, textured_material, PrimitiveMeshes,
};
use crate::types::{vec3, FloorTable, ViewerSettings};

/// Side length of the floor grid
pub const GRID_SIZE: f32 = 50.0;
pub const GRID_DIVISIONS: u32 = 50;
/// Length of each world axis
pub const AXES_LENGTH: f32 = 5.0;

#[derive(Component)]
pub struct GridLine;

#[derive(Component)]
pub struct WorldAxis;

#[derive(Component)]
pub struct Globe;

#[derive(Component)]
pub struct GlassPanel;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PrimitiveMeshes>().add_systems(
            Startup,
            (
                setup_scene,
                spawn_floor,
                spawn_globes,
                spawn_floor_model,
                load_environment_map,
                spawn_room_dressing,
            )
                .chain(),
        );
    }
}

/// Offsets of the grid lines along one axis
pub fn grid_line_offsets(size: f32, divisions: u32) -> Vec<f32> {
    let step = size / divisions as f32;
    let half = size / 2.0;
    (0..=divisions).map(|i| -half + i as f32 * step).collect()
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ViewerSettings>,
) {
    let camera = &settings.0.camera;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(vec3(camera.position)).looking_at(vec3(camera.target), Vec3::Y),
        MainCamera,
        OrbitRig::from_config(camera),
    ));

    // Flat materials are unlit; light only matters for textured surfaces
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 800.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 3000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 30.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let line_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.5, 0.5, 0.5, 0.6),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let thickness = 0.02;
    let line_along_x = meshes.add(Cuboid::new(GRID_SIZE, thickness, thickness));
    let line_along_z = meshes.add(Cuboid::new(thickness, thickness, GRID_SIZE));

    for offset in grid_line_offsets(GRID_SIZE, GRID_DIVISIONS) {
        commands.spawn((
            Mesh3d(line_along_x.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_xyz(0.0, 0.0, offset),
            GridLine,
            Pickable::IGNORE,
        ));
        commands.spawn((
            Mesh3d(line_along_z.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_xyz(offset, 0.0, 0.0),
            GridLine,
            Pickable::IGNORE,
        ));
    }

    // X red, Y green, Z blue
    let axis_thickness = 0.03;
    let axis_mesh = meshes.add(Cylinder::new(axis_thickness, AXES_LENGTH));
    let axes = [
        (
            Color::srgb(0.9, 0.2, 0.2),
            Transform::from_xyz(AXES_LENGTH / 2.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2)),
        ),
        (
            Color::srgb(0.2, 0.9, 0.2),
            Transform::from_xyz(0.0, AXES_LENGTH / 2.0, 0.0),
        ),
        (
            Color::srgb(0.2, 0.2, 0.9),
            Transform::from_xyz(0.0, 0.0, AXES_LENGTH / 2.0)
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        ),
    ];
    for (color, transform) in axes {
        commands.spawn((
            Mesh3d(axis_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            })),
            transform,
            WorldAxis,
            Pickable::IGNORE,
        ));
    }
}

/// Instantiate the layout table under a single floor group
fn spawn_floor(
    mut commands: Commands,
    table: Res<FloorTable>,
    primitives: Res<PrimitiveMeshes>,
    slot_materials: Res<SlotMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for warning in table.0.validate() {
        tracing::warn!("Layout: {}", warning);
    }

    let floor = commands
        .spawn((
            Name::new("floor"),
            FloorGroup,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    for descriptor in &table.0.equipment {
        spawn_equipment(
            &mut commands,
            floor,
            descriptor,
            &primitives,
            &slot_materials,
            &mut materials,
        );
    }

    tracing::info!(equipment = table.0.equipment.len(), "Floor spawned");
}

fn globe_bundle(globe: &GlobeDescriptor) -> impl Bundle {
    (
        Name::new(globe.label.clone()),
        Globe,
        Transform::from_translation(vec3(globe.position)).with_scale(Vec3::splat(globe.scale)),
    )
}

fn spawn_globes(
    mut commands: Commands,
    table: Res<FloorTable>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut tracker: ResMut<AssetTracker>,
) {
    for globe in &table.0.globe {
        let texture: Handle<Image> = asset_server.load(globe.texture.clone());
        tracker.track(globe.texture.clone(), texture.clone());

        let mut entity = commands.spawn((
            globe_bundle(globe),
            Mesh3d(meshes.add(sphere_mesh(globe.radius, 32, 16))),
            MeshMaterial3d(materials.add(textured_material(texture))),
        ));
        if let Some(camera_position) = globe.focus_camera {
            entity.insert(FocusPreset {
                camera_position: vec3(camera_position),
            });
        }
        tracing::debug!(label = %globe.label, "Globe spawned");
    }
}

/// Optional glTF model of the room, flattened with the floor
fn spawn_floor_model(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    asset_server: Res<AssetServer>,
    floors: Query<Entity, With<FloorGroup>>,
    mut tracker: ResMut<AssetTracker>,
) {
    let Some(path) = settings.0.assets.floor_model.clone() else {
        return;
    };
    let Ok(floor) = floors.single() else {
        return;
    };

    let scene: Handle<Scene> = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()));
    tracker.track(path.clone(), scene.clone());
    commands.spawn((
        Name::new("floor model"),
        SceneRoot(scene),
        ChildOf(floor),
    ));
    tracing::info!("Loading floor model: {}", path);
}

fn accent_light(config: &AccentLightConfig) -> (PointLight, Transform) {
    (
        PointLight {
            color: srgb(config.color),
            intensity: config.intensity,
            radius: config.radius,
            range: config.range,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(vec3(config.position)),
    )
}

/// Image-based lighting for the main camera
fn load_environment_map(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    asset_server: Res<AssetServer>,
    cameras: Query<Entity, With<MainCamera>>,
    mut tracker: ResMut<AssetTracker>,
) {
    let Some(map) = &settings.0.environment.environment_map else {
        return;
    };

    let diffuse_map: Handle<Image> = asset_server.load(map.diffuse.clone());
    let specular_map: Handle<Image> = asset_server.load(map.specular.clone());
    tracker.track(map.diffuse.clone(), diffuse_map.clone());
    tracker.track(map.specular.clone(), specular_map.clone());

    for camera in cameras.iter() {
        commands.entity(camera).insert(EnvironmentMapLight {
            diffuse_map: diffuse_map.clone(),
            specular_map: specular_map.clone(),
            intensity: map.intensity,
            ..default()
        });
    }
    tracing::info!("Environment map: {}", map.specular);
}

/// Glass pane and accent light, each when configured
fn spawn_room_dressing(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    primitives: Res<PrimitiveMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    floors: Query<Entity, With<FloorGroup>>,
) {
    let environment = &settings.0.environment;

    if let Some(glass) = &environment.glass_panel {
        let mut panel = commands.spawn((
            Name::new("glass panel"),
            GlassPanel,
            Mesh3d(primitives.unit_cube.clone()),
            MeshMaterial3d(materials.add(glass_material(glass.tint, glass.ior, glass.size[2]))),
            box_transform(vec3(glass.position), vec3(glass.size)),
            Pickable::IGNORE,
        ));
        // Dresses the room model, so it flattens with the floor
        if let Ok(floor) = floors.single() {
            panel.insert(ChildOf(floor));
        }
    }

    if let Some(light) = &environment.accent_light {
        commands.spawn((Name::new("accent light"), accent_light(light)));
    }
}
