//! # Compositor Configuration
//!
//! Configuration for the per-frame compositor: draw ordering policy, pool and
//! scratch buffer sizing, disposal backend and logging.
//!
//! ## Configuration Categories
//!
//! - **Sorting**: material batching vs. layered ordering
//! - **Pools**: scratch capacity and geometry pool prewarm
//! - **Dispose**: immediate or frame-deferred destruction of pooled objects
//!
//! Files are loaded through the [`Config`] trait, which dispatches on the
//! `.toml` / `.ron` extension.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::resources::dispose::DisposeMode;

/// Default element count of the shared particle scratch buffer
pub const DEFAULT_PARTICLE_SCRATCH_CAPACITY: usize = 2048;

/// # Sorting Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortingConfig {
    /// Order emitters by material identity only, maximizing batching
    pub sort_by_material: bool,
}

/// # Pool Configuration
///
/// Sizing for the frame-transient working buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial element count of the particle scratch buffer
    pub particle_scratch_capacity: usize,
    /// Geometry buffers constructed up front
    pub geometry_prewarm: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            particle_scratch_capacity: DEFAULT_PARTICLE_SCRATCH_CAPACITY,
            geometry_prewarm: 0,
        }
    }
}

/// # Compositor Configuration
///
/// Top-level configuration consumed by [`crate::FrameCompositor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Default log filter used by the demo and host applications
    pub log_level: String,
    /// Disposal backend
    pub dispose: DisposeMode,
    /// Draw ordering policy
    pub sorting: SortingConfig,
    /// Working buffer sizing
    pub pools: PoolConfig,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            dispose: DisposeMode::default(),
            sorting: SortingConfig::default(),
            pools: PoolConfig::default(),
        }
    }
}

impl Config for CompositorConfig {}

impl CompositorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable material-only ordering
    pub fn with_sort_by_material(mut self, enabled: bool) -> Self {
        self.sorting.sort_by_material = enabled;
        self
    }

    /// Set the initial particle scratch capacity
    pub fn with_particle_scratch_capacity(mut self, capacity: usize) -> Self {
        self.pools.particle_scratch_capacity = capacity;
        self
    }

    /// Set how many geometry buffers are built up front
    pub fn with_geometry_prewarm(mut self, count: usize) -> Self {
        self.pools.geometry_prewarm = count;
        self
    }

    /// Select the disposal backend
    pub fn with_dispose_mode(mut self, mode: DisposeMode) -> Self {
        self.dispose = mode;
        self
    }

    /// Set the log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }

        if self.pools.particle_scratch_capacity == 0 {
            return Err(ConfigError::Invalid(
                "particle scratch capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Load from a `.toml` or `.ron` file and validate
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("particle_compositor_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults() {
        let config = CompositorConfig::default();
        assert!(!config.sorting.sort_by_material);
        assert_eq!(config.pools.particle_scratch_capacity, 2048);
        assert_eq!(config.dispose, DisposeMode::Deferred);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = CompositorConfig::new().with_particle_scratch_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = CompositorConfig::new().with_log_level("  ");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CompositorConfig = toml::from_str(
            r#"
            [sorting]
            sort_by_material = true
            "#,
        )
        .unwrap();
        assert!(config.sorting.sort_by_material);
        assert_eq!(config.pools, PoolConfig::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_toml_file_roundtrip() {
        let path = temp_path("roundtrip.toml");
        let config = CompositorConfig::new()
            .with_sort_by_material(true)
            .with_geometry_prewarm(4)
            .with_dispose_mode(DisposeMode::Immediate);

        config.save_to_file(&path).unwrap();
        let loaded = CompositorConfig::load_validated(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_roundtrip() {
        let path = temp_path("roundtrip.ron");
        let config = CompositorConfig::new().with_particle_scratch_capacity(64);

        config.save_to_file(&path).unwrap();
        let loaded = CompositorConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = CompositorConfig::load_from_file("compositor.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let result = CompositorConfig::default().save_to_file("compositor.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
