//! Geometry presets: the fixed, hand-authored artifact shapes.
//!
//! A preset is a static arrangement of primitive sub-meshes, each tagged with
//! the material slot its faces are filled from. Presets are pure CPU data;
//! [`crate::artifact`] uploads them to the GPU.

use cgmath::{Deg, One, Rotation3, Vector3};

use crate::{
    data_structures::instance::Instance,
    geometry::{self, Face, MeshData},
};

/// The selectable artifact shapes. Closed set: the shape buttons of the
/// selector offer exactly these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Card,
    Prism,
    Cube,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Card, ShapeKind::Prism, ShapeKind::Cube];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Card => "Card",
            ShapeKind::Prism => "Prism",
            ShapeKind::Cube => "Cube",
        }
    }

    /// Bundled button icon, relative to the assets directory.
    pub fn icon_file_name(&self) -> &'static str {
        match self {
            ShapeKind::Card => "icons/card.png",
            ShapeKind::Prism => "icons/prism.png",
            ShapeKind::Cube => "icons/cube.png",
        }
    }
}

/// What a sub-mesh's faces are filled from.
///
/// `Texture` slots follow the active catalog selection; `Accent` and `Glass`
/// are fixed fills and never receive the catalog texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialSlot {
    /// The active catalog texture.
    Texture,
    /// Flat accent fill (the card rim).
    Accent,
    /// Translucent glass fill (the card frame bars).
    Glass,
}

/// Flat accent fill colour for the card rim (0xFFF123).
pub const ACCENT_RGBA: [u8; 4] = [0xff, 0xf1, 0x23, 0xff];
/// Glass fill for the frame bars: white at low alpha, alpha-blended.
pub const GLASS_RGBA: [u8; 4] = [0xff, 0xff, 0xff, 0x48];

/// One sub-mesh of a preset with its slot and placement instances.
#[derive(Clone, Debug)]
pub struct PresetPart {
    pub name: &'static str,
    pub mesh: MeshData,
    pub slot: MaterialSlot,
    pub instances: Vec<Instance>,
}

/// A complete, immutable shape description.
#[derive(Clone, Debug)]
pub struct GeometryPreset {
    pub kind: ShapeKind,
    pub parts: Vec<PresetPart>,
}

impl GeometryPreset {
    pub fn of(kind: ShapeKind) -> Self {
        let parts = match kind {
            ShapeKind::Card => card_parts(),
            ShapeKind::Prism => vec![PresetPart {
                name: "prism",
                mesh: geometry::prism(5.0, 6.0),
                slot: MaterialSlot::Texture,
                instances: vec![Instance::new()],
            }],
            ShapeKind::Cube => vec![PresetPart {
                name: "cube",
                mesh: geometry::cuboid(5.0, 5.0, 5.0),
                slot: MaterialSlot::Texture,
                instances: vec![Instance::new()],
            }],
        };
        Self { kind, parts }
    }
}

/// The card: a thin textured slab with an accent rim, framed by four glass
/// bars. The bars are four instances of a single unit bar mesh: the scale part
/// of the instance stretches it to length, horizontals at y = +-5, verticals
/// rotated a quarter turn at x = +-3.5.
fn card_parts() -> Vec<PresetPart> {
    let upright = cgmath::Quaternion::from_axis_angle(Vector3::unit_z(), Deg(90.0));
    let bar = |position: [f32; 3], rotation: cgmath::Quaternion<f32>, length: f32| Instance {
        position: position.into(),
        rotation,
        scale: Vector3::new(length, 1.0, 1.0),
    };
    vec![
        PresetPart {
            name: "card faces",
            mesh: geometry::cuboid_faces(6.0, 9.0, 0.1, &Face::FRONT_BACK),
            slot: MaterialSlot::Texture,
            instances: vec![Instance::new()],
        },
        PresetPart {
            name: "card rim",
            mesh: geometry::cuboid_faces(6.0, 9.0, 0.1, &Face::RIM),
            slot: MaterialSlot::Accent,
            instances: vec![Instance::new()],
        },
        PresetPart {
            name: "card frame",
            mesh: geometry::cuboid(1.0, 1.0, 0.4),
            slot: MaterialSlot::Glass,
            instances: vec![
                bar([0.0, 5.0, 0.0], cgmath::Quaternion::one(), 8.0),
                bar([0.0, -5.0, 0.0], cgmath::Quaternion::one(), 8.0),
                bar([-3.5, 0.0, 0.0], upright, 9.0),
                bar([3.5, 0.0, 0.0], upright, 9.0),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_frame_bars_never_receive_the_texture() {
        let card = GeometryPreset::of(ShapeKind::Card);
        let frame = card
            .parts
            .iter()
            .find(|p| p.name == "card frame")
            .expect("card preset has a frame part");
        assert_eq!(frame.slot, MaterialSlot::Glass);
        assert_eq!(frame.instances.len(), 4);
    }

    #[test]
    fn card_splits_textured_faces_from_accent_rim() {
        let card = GeometryPreset::of(ShapeKind::Card);
        let slots: Vec<MaterialSlot> = card.parts.iter().map(|p| p.slot).collect();
        assert_eq!(
            slots,
            [MaterialSlot::Texture, MaterialSlot::Accent, MaterialSlot::Glass]
        );
    }

    #[test]
    fn cube_uses_a_single_shared_textured_part() {
        let cube = GeometryPreset::of(ShapeKind::Cube);
        assert_eq!(cube.parts.len(), 1);
        assert_eq!(cube.parts[0].slot, MaterialSlot::Texture);
        assert_eq!(cube.parts[0].instances.len(), 1);
    }

    #[test]
    fn prism_is_one_textured_mesh() {
        let prism = GeometryPreset::of(ShapeKind::Prism);
        assert_eq!(prism.parts.len(), 1);
        assert_eq!(prism.parts[0].slot, MaterialSlot::Texture);
    }

    #[test]
    fn every_shape_kind_has_a_preset() {
        for kind in ShapeKind::ALL {
            let preset = GeometryPreset::of(kind);
            assert_eq!(preset.kind, kind);
            assert!(!preset.parts.is_empty());
        }
    }
}
