//! Sprite-sheet texture resolution
//!
//! Emitters animated from a sprite list draw with the texture of their first
//! sprite. Where that texture lives depends on the host: at runtime it is
//! the sprite's own texture, while authoring tools may pack sprites into an
//! atlas that only they can look up. That lookup is injected as a
//! [`TextureResolver`].

use crate::foundation::ids::TextureId;

use super::emitter::Emitter;

/// A sprite reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    /// Host identity of the sprite asset
    pub id: u32,
    /// The sprite's own texture
    pub texture: Option<TextureId>,
}

/// Texture-sheet animation source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SheetMode {
    /// Frames come from a grid over the material texture
    #[default]
    Grid,
    /// Frames come from a sprite list
    Sprites,
}

/// Texture-sheet animation settings of an emitter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureSheetAnimation {
    /// Whether the module is active
    pub enabled: bool,
    /// Frame source
    pub mode: SheetMode,
    /// Sprite slots; empty slots are skipped
    pub sprites: Vec<Option<Sprite>>,
}

impl TextureSheetAnimation {
    /// An enabled sheet animating through `sprites`
    pub fn from_sprites(sprites: Vec<Option<Sprite>>) -> Self {
        Self {
            enabled: true,
            mode: SheetMode::Sprites,
            sprites,
        }
    }
}

/// Maps a sprite to the texture it is actually drawn from
pub trait TextureResolver {
    /// Resolve the texture for `sprite`
    fn resolve(&self, sprite: &Sprite) -> Option<TextureId>;
}

/// Runtime resolution: the sprite's own texture
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeTextures;

impl TextureResolver for RuntimeTextures {
    fn resolve(&self, sprite: &Sprite) -> Option<TextureId> {
        sprite.texture
    }
}

/// Atlas-aware resolution through a host lookup, falling back to the
/// sprite's own texture when the lookup has nothing.
pub struct AtlasTextures<F> {
    lookup: F,
}

impl<F> AtlasTextures<F>
where
    F: Fn(&Sprite) -> Option<TextureId>,
{
    /// Wrap a host atlas lookup
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> TextureResolver for AtlasTextures<F>
where
    F: Fn(&Sprite) -> Option<TextureId>,
{
    fn resolve(&self, sprite: &Sprite) -> Option<TextureId> {
        (self.lookup)(sprite).or(sprite.texture)
    }
}

/// Texture of the first present sprite of an enabled sprite-mode sheet
pub fn texture_for_sprite(
    sheet: &TextureSheetAnimation,
    resolver: &dyn TextureResolver,
) -> Option<TextureId> {
    if !sheet.enabled || sheet.mode != SheetMode::Sprites {
        return None;
    }
    sheet
        .sprites
        .iter()
        .flatten()
        .next()
        .and_then(|sprite| resolver.resolve(sprite))
}

impl Emitter {
    /// Sprite texture this emitter draws with, if it animates from sprites.
    ///
    /// Destroyed emitters resolve to nothing.
    pub fn texture_for_sprite(&self, resolver: &dyn TextureResolver) -> Option<TextureId> {
        if !self.alive {
            return None;
        }
        texture_for_sprite(self.texture_sheet.as_ref()?, resolver)
    }
}
