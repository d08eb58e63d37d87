//! # Particle Compositor
//!
//! Per-frame composition support for particle emitters hosted on UI canvases.
//!
//! ## Features
//!
//! - **Draw Ordering**: Stable layered sort of emitters (material, queue, layer, depth)
//! - **Visibility**: Viewport-space culling of canvas rectangles, with or without a camera
//! - **Group Alpha**: Ancestor-only alpha recovery for canvas renderables
//! - **Frame Cache**: Memoization of per-object queries for exactly one frame
//! - **Resource Reuse**: Geometry pools, a growable scratch array and deferred disposal
//!
//! ## Quick Start
//!
//! ```rust
//! use particle_compositor::prelude::*;
//!
//! let mut compositor = FrameCompositor::new(CompositorConfig::default(), ScreenInfo::new(800.0, 600.0));
//! let host = CanvasRect::new(ObjectId(1), Surface::overlay()).with_rect(0.0, 0.0, 200.0, 100.0);
//! let mut emitters = vec![
//!     Emitter::new(ObjectId(2)).with_material(MaterialRef::new(MaterialId(1), 3000)),
//!     Emitter::new(ObjectId(3)).with_material(MaterialRef::new(MaterialId(1), 2000)),
//! ];
//!
//! compositor.begin_frame();
//! let draw = compositor.compose(&host, &mut emitters, &Transform::identity());
//! assert_eq!(emitters[draw.emitters[0]].id, ObjectId(3));
//! compositor.end_frame();
//! ```
//!
//! Everything is single-threaded: a compositor and its caches belong to the
//! thread that composes frames.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod frame;
pub mod render;
pub mod resources;

mod compositor;

#[cfg(test)]
mod tests;

pub use compositor::{DrawSet, FrameCompositor};

/// Common imports for compositor users
pub mod prelude {
    pub use crate::{
        core::config::{CompositorConfig, PoolConfig, SortingConfig},
        config::{Config, ConfigError},
        foundation::{
            bounds::Aabb,
            ids::{IdAllocator, MaterialId, ObjectId, TextureId},
            math::{Point3, Quat, Transform, Vec3},
        },
        frame::{FrameCache, FrameCounter},
        render::{
            CanvasRect, Camera, Emitter, MaterialRef, ParticleEmitter, ParticleRenderMode,
            RenderMode, RenderOrderResolver, Renderable, ScreenInfo, SimulationSpace, Surface,
            VisibilityClassifier,
        },
        resources::{DisposeMode, DisposeQueue, GeometryBuffer, Particle, ResourcePool, ScratchBuffer},
        DrawSet, FrameCompositor,
    };
}
