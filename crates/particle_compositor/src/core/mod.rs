//! # Core Module
//!
//! Shared abstractions used by the per-frame subsystems.
//!
//! ## Organization
//!
//! - **Config**: Compositor configuration (sorting, pools, disposal, logging)
//! - **Foundation**: Low-level utilities (math, bounds, ids, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{CompositorConfig, PoolConfig, SortingConfig};
pub use crate::config::{Config, ConfigError};
