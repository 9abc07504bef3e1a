//! Icon resolution for tree items.
//!
//! Turning a definition into a drawable glyph belongs to the host's shape
//! factory. The explorer only asks for a handle through [`GlyphResolver`]
//! and stores it on the item.

use canopy_core::identifier::Id;

/// Opaque icon handle stored on a tree item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    definition: Id,
    width: u32,
    height: u32,
}

impl Glyph {
    pub fn new(definition: Id, width: u32, height: u32) -> Self {
        Self {
            definition,
            width,
            height,
        }
    }

    /// Definition the glyph was resolved for.
    pub fn definition(&self) -> Id {
        self.definition
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Resolves a definition id and a size to an icon handle.
pub trait GlyphResolver {
    fn glyph(&self, definition_id: Id, width: u32, height: u32) -> Glyph;
}

/// Resolver that identifies every glyph by its definition id.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionGlyphs;

impl GlyphResolver for DefinitionGlyphs {
    fn glyph(&self, definition_id: Id, width: u32, height: u32) -> Glyph {
        Glyph::new(definition_id, width, height)
    }
}

impl<F> GlyphResolver for F
where
    F: Fn(Id, u32, u32) -> Glyph,
{
    fn glyph(&self, definition_id: Id, width: u32, height: u32) -> Glyph {
        self(definition_id, width, height)
    }
}
