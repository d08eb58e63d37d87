//! Frame-scoped state
//!
//! The frame counter is the stamp source; the cache memoizes per-object
//! values for exactly one frame.

pub mod cache;
pub mod counter;

pub use cache::FrameCache;
pub use counter::FrameCounter;
