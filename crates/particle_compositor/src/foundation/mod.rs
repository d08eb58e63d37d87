//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the compositor:
//! - Math types and tolerance helpers
//! - Bounding boxes
//! - Identity types
//! - Logging utilities

pub mod bounds;
pub mod ids;
pub mod logging;
pub mod math;
