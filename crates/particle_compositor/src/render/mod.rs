//! Draw ordering, visibility and emitter model

pub mod camera;
pub mod emitter;
pub mod order;
pub mod texture;
pub mod visibility;

pub use camera::{Camera, Projection};
pub use emitter::{Emitter, MaterialRef, ParticleEmitter, ParticleRenderMode, SimulationSpace};
pub use order::{compare_order_keys, sort_for_rendering, OrderKey, RenderOrderResolver};
pub use texture::{
    texture_for_sprite, AtlasTextures, RuntimeTextures, SheetMode, Sprite, TextureResolver,
    TextureSheetAnimation,
};
pub use visibility::{
    group_alpha_ratio, CanvasRect, RenderMode, Renderable, ScreenInfo, Surface, VisibilityClassifier,
};
