//! The texture catalog: the fixed, ordered set of selectable images.
//!
//! Catalog entries are known at build time and bundled under `assets/`; the
//! first entry is the initial selection.

/// One selectable catalog image. Closed set, ordered as shown in the
/// thumbnail strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureRef {
    Sunset,
    Ocean,
    Moss,
}

impl TextureRef {
    pub const ALL: [TextureRef; 3] = [TextureRef::Sunset, TextureRef::Ocean, TextureRef::Moss];

    /// The default selection: the first catalog entry.
    pub fn first() -> TextureRef {
        Self::ALL[0]
    }

    /// Position in the catalog order.
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|entry| entry == self)
            .expect("TextureRef::ALL covers every variant")
    }

    /// Bundled source image, relative to the assets directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            TextureRef::Sunset => "textures/sunset.png",
            TextureRef::Ocean => "textures/ocean.png",
            TextureRef::Moss => "textures/moss.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_stable() {
        assert_eq!(TextureRef::first(), TextureRef::Sunset);
        for (i, entry) in TextureRef::ALL.into_iter().enumerate() {
            assert_eq!(entry.index(), i);
        }
    }

    #[test]
    fn every_entry_names_a_distinct_asset() {
        let mut files: Vec<&str> = TextureRef::ALL.iter().map(|t| t.file_name()).collect();
        files.dedup();
        assert_eq!(files.len(), TextureRef::ALL.len());
    }
}
