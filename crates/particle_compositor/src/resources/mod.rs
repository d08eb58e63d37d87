//! Frame-transient resource reuse
//!
//! - [`ResourcePool`]: acquire/release pool with factory and reset hooks
//! - [`ScratchBuffer`]: shared power-of-two working array
//! - [`GeometryBuffer`]: the pooled mesh-building unit
//! - [`DisposeQueue`]: immediate or deferred disposal

pub mod dispose;
pub mod geometry;
pub mod pool;
pub mod scratch;

pub use dispose::{DisposeMode, DisposeQueue};
pub use geometry::{geometry_pool, GeometryBuffer, Particle, UiVertex};
pub use pool::ResourcePool;
pub use scratch::ScratchBuffer;
