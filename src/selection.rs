//! The two pieces of UI state driving the scene.
//!
//! The selection is owned by the application state bundle and mutated only
//! from input events, which the event loop serializes. Flows read it each
//! frame; the selector flow writes it on clicks.

use crate::{catalog::TextureRef, preset::ShapeKind};

/// The active shape/texture pair. Exactly one of each is active at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub shape: ShapeKind,
    pub texture: TextureRef,
}

impl Selection {
    /// Replace the active shape. Returns whether anything changed, so callers
    /// can skip remounting on a re-selection of the active value.
    pub fn select_shape(&mut self, shape: ShapeKind) -> bool {
        let changed = self.shape != shape;
        self.shape = shape;
        changed
    }

    /// Replace the active texture. Returns whether anything changed.
    pub fn select_texture(&mut self, texture: TextureRef) -> bool {
        let changed = self.texture != texture;
        self.texture = texture;
        changed
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Card,
            texture: TextureRef::first(),
        }
    }
}

/// Top-level application state shared across flows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewerState {
    pub selection: Selection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_selection_is_card_with_the_first_catalog_entry() {
        let selection = Selection::default();
        assert_eq!(selection.shape, ShapeKind::Card);
        assert_eq!(selection.texture, TextureRef::first());
    }

    #[test]
    fn shape_and_texture_are_independent() {
        let mut selection = Selection::default();
        assert!(selection.select_shape(ShapeKind::Prism));
        assert_eq!(selection.texture, TextureRef::first());

        assert!(selection.select_texture(TextureRef::Moss));
        assert_eq!(selection.shape, ShapeKind::Prism);
    }

    #[test]
    fn reselecting_the_active_value_reports_no_change() {
        let mut selection = Selection::default();
        assert!(!selection.select_shape(ShapeKind::Card));
        assert!(!selection.select_texture(TextureRef::first()));
        assert_eq!(selection, Selection::default());
    }
}
