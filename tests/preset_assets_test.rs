//! Contract checks between the preset/catalog tables and the bundled assets.
//! These run without a GPU.

use std::path::Path;

use vitrine::{
    catalog::TextureRef,
    preset::{GeometryPreset, MaterialSlot, ShapeKind},
};

#[test]
fn every_catalog_entry_is_bundled() {
    for tex_ref in TextureRef::ALL {
        let path = Path::new("assets").join(tex_ref.file_name());
        assert!(path.is_file(), "missing catalog asset {}", path.display());
    }
}

#[test]
fn every_shape_icon_is_bundled() {
    for kind in ShapeKind::ALL {
        let path = Path::new("assets").join(kind.icon_file_name());
        assert!(path.is_file(), "missing icon asset {}", path.display());
    }
}

#[test]
fn every_preset_has_a_textured_part() {
    for kind in ShapeKind::ALL {
        let preset = GeometryPreset::of(kind);
        assert!(
            preset
                .parts
                .iter()
                .any(|part| part.slot == MaterialSlot::Texture),
            "{} has no part following the catalog selection",
            kind.label()
        );
    }
}

#[test]
fn only_the_card_carries_accent_and_glass() {
    for kind in ShapeKind::ALL {
        let preset = GeometryPreset::of(kind);
        let has_accent = preset
            .parts
            .iter()
            .any(|part| part.slot == MaterialSlot::Accent);
        let has_glass = preset
            .parts
            .iter()
            .any(|part| part.slot == MaterialSlot::Glass);
        assert_eq!(has_accent, kind == ShapeKind::Card);
        assert_eq!(has_glass, kind == ShapeKind::Card);
    }
}

#[test]
fn the_card_frame_is_four_bars() {
    let card = GeometryPreset::of(ShapeKind::Card);
    let frame = card
        .parts
        .iter()
        .find(|part| part.slot == MaterialSlot::Glass)
        .expect("the card has a glass frame");
    assert_eq!(frame.instances.len(), 4);
}
