//! Configuration for SectorStore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Highest head count a floppy drive can report
pub const MAX_HEADS: u8 = 2;

/// Main configuration for a SectorStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Diagnostics Configuration
    // -------------------------------------------------------------------------
    /// Number of physical heads walked by the summary dump (1 or 2)
    pub heads: u8,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Capture snapshot file used by the CLI
    pub snapshot_path: PathBuf,

    /// fsync the snapshot file when it is finished
    pub snapshot_sync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heads: MAX_HEADS,
            snapshot_path: PathBuf::from("./sectors.snap"),
            snapshot_sync: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configured values make sense
    pub fn validate(&self) -> Result<()> {
        if self.heads == 0 || self.heads > MAX_HEADS {
            return Err(StoreError::Config(format!(
                "heads must be between 1 and {}, got {}",
                MAX_HEADS, self.heads
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of heads walked by the summary dump
    pub fn heads(mut self, heads: u8) -> Self {
        self.config.heads = heads;
        self
    }

    /// Set the capture snapshot path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Enable or disable fsync on snapshot finish
    pub fn snapshot_sync(mut self, sync: bool) -> Self {
        self.config.snapshot_sync = sync;
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
