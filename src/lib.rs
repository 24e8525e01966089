//! # SectorStore
//!
//! An in-memory store of decoded floppy-disk sectors, used while scanning a
//! physical medium to collect everything needed to rebuild a disk image:
//! - Deduplication on the full sector identity
//! - Lookups by logical address, physical position, or nth-at-position
//! - Stable normalization to physical track/head then logical sector order
//! - Capture snapshots to persist a scan between runs
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Flux / Bitstream Decoder                    │
//! │              (one add() per decoded sector)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     SectorStore                              │
//! │        Vec<SectorRecord> + running min/max stats             │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │ Image Serializer│                │    Snapshot     │
//!   │ sort, count,    │                │ (SECT file,     │
//!   │ find_nth, ...   │                │  CRC framed)    │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod snapshot;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use record::{LogicalAddress, PhysicalPosition, SectorIdentity, SectorRecord};
pub use store::{SectorStore, StoreStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SectorStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
