//! Box and sphere primitives
//!
//! Every box shares one unit cube mesh and carries its extents in the
//! transform scale, so a face can be re-laid by rewriting its transform.

use bevy::prelude::*;
use rackview_core::Rgb;

#[derive(Resource, Clone)]
pub struct PrimitiveMeshes {
    pub unit_cube: Handle<Mesh>,
}

impl FromWorld for PrimitiveMeshes {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self {
            unit_cube: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
        }
    }
}

pub fn srgb(color: Rgb) -> Color {
    let [r, g, b] = color.to_unit();
    Color::srgb(r, g, b)
}

pub fn alpha_mode(opacity: f32) -> AlphaMode {
    if opacity < 1.0 {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    }
}

/// Unlit flat-colored surface
pub fn flat_material(color: Rgb, opacity: f32, double_sided: bool) -> StandardMaterial {
    let mut material = StandardMaterial {
        base_color: srgb(color).with_alpha(opacity),
        unlit: true,
        alpha_mode: alpha_mode(opacity),
        ..default()
    };
    if double_sided {
        material.double_sided = true;
        material.cull_mode = None;
    }
    material
}

/// Repaint a flat material in place
pub fn repaint(material: &mut StandardMaterial, color: Rgb, opacity: f32) {
    material.base_color = srgb(color).with_alpha(opacity);
    material.alpha_mode = alpha_mode(opacity);
}

/// Lit surface sampling `texture`
pub fn textured_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        perceptual_roughness: 0.8,
        ..default()
    }
}

/// Clear pane that refracts what is behind it
pub fn glass_material(tint: Rgb, ior: f32, thickness: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: srgb(tint),
        perceptual_roughness: 0.0,
        metallic: 0.0,
        specular_transmission: 1.0,
        ior,
        thickness,
        ..default()
    }
}

/// Transform placing the unit cube as a box with the given center and extents
pub fn box_transform(center: Vec3, extents: Vec3) -> Transform {
    Transform::from_translation(center).with_scale(extents)
}

pub fn sphere_mesh(radius: f32, longitude_segments: u32, latitude_segments: u32) -> Mesh {
    Sphere::new(radius)
        .mesh()
        .uv(longitude_segments, latitude_segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_material_blends_only_when_translucent() {
        let opaque = flat_material(Rgb::new(0x62, 0x9e, 0x4f), 1.0, false);
        assert!(opaque.unlit);
        assert!(matches!(opaque.alpha_mode, AlphaMode::Opaque));
        assert!(opaque.cull_mode.is_some());

        let faded = flat_material(Rgb::RED, 0.3, true);
        assert!(matches!(faded.alpha_mode, AlphaMode::Blend));
        assert!((faded.base_color.alpha() - 0.3).abs() < 1e-6);
        assert!(faded.cull_mode.is_none());
    }

    #[test]
    fn test_repaint_restores_opacity() {
        let mut material = flat_material(Rgb::WHITE, 1.0, false);
        repaint(&mut material, Rgb::RED, 0.3);
        assert!(matches!(material.alpha_mode, AlphaMode::Blend));
        repaint(&mut material, Rgb::WHITE, 1.0);
        assert!(matches!(material.alpha_mode, AlphaMode::Opaque));
        assert_eq!(material.base_color, Color::srgb(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_glass_is_lit_and_transmissive() {
        let glass = glass_material(Rgb::WHITE, 2.33, 0.2);
        assert!(!glass.unlit);
        assert_eq!(glass.specular_transmission, 1.0);
        assert_eq!(glass.ior, 2.33);
        assert_eq!(glass.perceptual_roughness, 0.0);
    }

    #[test]
    fn test_box_transform_scales_unit_cube() {
        let transform = box_transform(Vec3::new(1.0, 2.5, -1.0), Vec3::new(2.0, 0.01, 2.0));
        assert_eq!(transform.translation, Vec3::new(1.0, 2.5, -1.0));
        assert_eq!(transform.scale, Vec3::new(2.0, 0.01, 2.0));
    }
}
