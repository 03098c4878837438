//! Shell plans - the faces, poles and annotation anchor of each equipment kind
//!
//! All coordinates are relative to the shell origin (the descriptor's
//! position). Each face is an axis-aligned box given by its center and full
//! extents.

use crate::layout::{EquipmentKind, ShellSize};
use crate::palette::{Rgb, Tone};

/// Inset of rack corner poles from the side faces
pub const POLE_INSET: f32 = 0.15;
/// Pole height as a fraction of the shell height
pub const POLE_HEIGHT_RATIO: f32 = 0.95;
/// How far a switch rack's right side is pulled in from the full width
pub const SWITCH_SIDE_OFFSET: f32 = 0.5;
/// Vertical annotation anchor, in multiples of the shell height
pub const ANNOTATION_ANCHOR_FACTOR: f32 = 13.0;
/// Fixed front-to-back depth of open racks
pub const RACK_DEPTH: f32 = 2.0;
/// Wall thickness of cuboid shells
pub const CUBOID_WALL: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Left,
    Right,
    Top,
    Bottom,
    Front,
    Back,
    /// Single slab standing in for both front and back (cuboids)
    FrontBack,
}

/// Texture slots shared by all shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    RackPole,
    SwitchFront,
    SwitchBack,
}

/// How a face is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceFinish {
    /// Painted from the shell's hover palette
    Palette {
        tone: Tone,
        /// When false the face stays opaque while highlighted
        follows_opacity: bool,
    },
    /// Fixed flat color, unaffected by hover
    Fixed { color: Rgb, opacity: f32 },
    /// Lit, texture-mapped surface
    Textured(TextureSlot),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlan {
    pub role: FaceRole,
    pub center: [f32; 3],
    pub extents: [f32; 3],
    pub finish: FaceFinish,
    pub double_sided: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolePlan {
    pub center: [f32; 3],
    pub extents: [f32; 3],
}

/// Everything needed to build one equipment shell
#[derive(Debug, Clone, PartialEq)]
pub struct ShellPlan {
    pub faces: Vec<FacePlan>,
    pub poles: Vec<PolePlan>,
    /// Anchor of the top-face annotation in normalized bounding-box units
    pub annotation_anchor: Option<[f32; 3]>,
}

impl ShellPlan {
    pub fn for_kind(kind: EquipmentKind, size: ShellSize) -> Self {
        let mut plan = match kind {
            EquipmentKind::RackServer | EquipmentKind::RackSwitch => rack(kind, size),
            EquipmentKind::Cabinet => cabinet(size),
            EquipmentKind::Cuboid | EquipmentKind::CuboidIsolated => cuboid(size),
            EquipmentKind::CabinetSwitch | EquipmentKind::Switch => chassis(
                size,
                FaceFinish::Textured(TextureSlot::SwitchFront),
                FaceFinish::Textured(TextureSlot::SwitchBack),
            ),
            EquipmentKind::Psu => {
                let plain = FaceFinish::Fixed {
                    color: Rgb::WHITE,
                    opacity: 1.0,
                };
                chassis(size, plain, plain)
            }
        };

        if kind.is_labelled() {
            plan.annotation_anchor = Some([0.0, size.height * ANNOTATION_ANCHOR_FACTOR, 0.0]);
        }
        plan
    }

    pub fn face(&self, role: FaceRole) -> Option<&FacePlan> {
        self.faces.iter().find(|f| f.role == role)
    }
}

/// X position of a rack's right side face
pub fn right_side_width(kind: EquipmentKind, width: f32) -> f32 {
    match kind {
        EquipmentKind::RackSwitch => width - SWITCH_SIDE_OFFSET,
        _ => width,
    }
}

fn palette(tone: Tone) -> FaceFinish {
    FaceFinish::Palette {
        tone,
        follows_opacity: true,
    }
}

fn face(role: FaceRole, center: [f32; 3], extents: [f32; 3], finish: FaceFinish) -> FacePlan {
    FacePlan {
        role,
        center,
        extents,
        finish,
        double_sided: false,
    }
}

const INVISIBLE_PANEL: FaceFinish = FaceFinish::Fixed {
    color: Rgb::RED,
    opacity: 0.0,
};

fn rack(kind: EquipmentKind, size: ShellSize) -> ShellPlan {
    let ShellSize { depth: d, height: h, width: w } = size;
    let rsw = right_side_width(kind, w);
    let pole_height = h * POLE_HEIGHT_RATIO;

    let faces = vec![
        face(FaceRole::Left, [0.0, h / 2.0, -w / 2.0], [d, h, w], palette(Tone::Primary)),
        face(FaceRole::Right, [rsw, h / 2.0, -w / 2.0], [d, h, w], palette(Tone::Primary)),
        face(FaceRole::Top, [rsw / 2.0, h, -w / 2.0], [rsw, d, w], palette(Tone::Secondary)),
        face(
            FaceRole::Bottom,
            [rsw / 2.0, 0.0, -w / 2.0],
            [rsw, d, w],
            FaceFinish::Palette {
                tone: Tone::Secondary,
                follows_opacity: false,
            },
        ),
        face(FaceRole::Front, [w / 2.0, h / 2.0, w - RACK_DEPTH], [w, h, d], INVISIBLE_PANEL),
        face(FaceRole::Back, [w / 2.0, h / 2.0, -w], [w, h, d], INVISIBLE_PANEL),
    ];

    let pole = |x: f32, z: f32| PolePlan {
        center: [x, pole_height / 2.0, z],
        extents: [w / 20.0, pole_height, d],
    };
    let poles = vec![
        pole(POLE_INSET, -POLE_INSET),
        pole(rsw - POLE_INSET, -POLE_INSET),
        pole(POLE_INSET, -RACK_DEPTH + POLE_INSET),
        pole(rsw - POLE_INSET, -RACK_DEPTH + POLE_INSET),
    ];

    ShellPlan {
        faces,
        poles,
        annotation_anchor: None,
    }
}

fn cabinet(size: ShellSize) -> ShellPlan {
    let mut plan = centered_box(size, INVISIBLE_PANEL, INVISIBLE_PANEL);
    let ShellSize { depth: d, height: h, width: w } = size;
    let pole_height = h * POLE_HEIGHT_RATIO;

    plan.poles = [(-1.0, 1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
        .iter()
        .map(|(sx, sz)| PolePlan {
            center: [sx * w / 2.3, pole_height / 2.0, sz * w / 2.5],
            extents: [w / 20.0, pole_height, d],
        })
        .collect();
    plan
}

fn chassis(size: ShellSize, front: FaceFinish, back: FaceFinish) -> ShellPlan {
    centered_box(size, front, back)
}

/// Shell centered on the origin in x/z, used by cabinets, switches and PSUs
fn centered_box(size: ShellSize, front: FaceFinish, back: FaceFinish) -> ShellPlan {
    let ShellSize { depth: d, height: h, width: w } = size;

    let faces = vec![
        face(FaceRole::Left, [-w / 2.0, h / 2.0, 0.0], [d, h, w], palette(Tone::Primary)),
        face(FaceRole::Right, [w / 2.0, h / 2.0, 0.0], [d, h, w], palette(Tone::Primary)),
        face(FaceRole::Top, [0.0, h, 0.0], [w, d, w], palette(Tone::Secondary)),
        face(FaceRole::Bottom, [0.0, 0.0, 0.0], [w, d, w], palette(Tone::Secondary)),
        face(FaceRole::Front, [0.0, h / 2.0, w / 2.0], [w, h, d], front),
        face(FaceRole::Back, [0.0, h / 2.0, -w / 2.0], [w, h, d], back),
    ];

    ShellPlan {
        faces,
        poles: Vec::new(),
        annotation_anchor: None,
    }
}

fn cuboid(size: ShellSize) -> ShellPlan {
    let ShellSize { depth: d, height: h, width: w } = size;

    let mut bottom = face(
        FaceRole::Bottom,
        [w / 2.0, 0.0, 0.0],
        [w, CUBOID_WALL, d],
        palette(Tone::Secondary),
    );
    bottom.double_sided = true;

    let faces = vec![
        face(FaceRole::Left, [0.0, h / 2.0, 0.0], [CUBOID_WALL, h, d], palette(Tone::Tertiary)),
        face(FaceRole::Right, [w, h / 2.0, 0.0], [CUBOID_WALL, h, d], palette(Tone::Tertiary)),
        face(FaceRole::Top, [w / 2.0, h, 0.0], [w, CUBOID_WALL, d], palette(Tone::Secondary)),
        bottom,
        face(FaceRole::FrontBack, [w / 2.0, h / 2.0, 0.0], [w, h, d], palette(Tone::Primary)),
    ];

    ShellPlan {
        faces,
        poles: Vec::new(),
        annotation_anchor: None,
    }
}
