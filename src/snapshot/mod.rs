//! Snapshot Module
//!
//! Saves a capture's sector store to disk so a later run can rebuild it
//! without rescanning the medium.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "SECT" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Entry 1                                                 │
//! │ ┌─────────┬─────────┬──────────────────────────────┐    │
//! │ │ Len (4) │ CRC (4) │ bincode(SectorRecord)        │    │
//! │ └─────────┴─────────┴──────────────────────────────┘    │
//! ├─────────────────────────────────────────────────────────┤
//! │ ... one entry per record, in list order ...             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. The count is patched into the header
//! when the writer finishes.

mod reader;
mod writer;

use std::path::Path;

use crate::error::Result;
use crate::store::SectorStore;

pub use reader::{SnapshotReader, SnapshotStats};
pub use writer::SnapshotWriter;

// =============================================================================
// Shared Constants (used by writer and reader)
// =============================================================================

/// Magic bytes identifying a sector snapshot file
pub(crate) const MAGIC: &[u8; 4] = b"SECT";

/// Current snapshot format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8) = 14 bytes
pub const HEADER_SIZE: u64 = 14;

/// Per-entry frame: Len (4) + CRC (4)
pub const ENTRY_HEADER_SIZE: usize = 8;

/// Largest encoded record accepted when reading (16 MB)
pub const MAX_ENTRY_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Convenience Functions
// =============================================================================

/// Write every record of `store`, in list order, to a new snapshot at `path`
pub fn save(store: &SectorStore, path: &Path, sync: bool) -> Result<u64> {
    let mut writer = SnapshotWriter::create(path, sync)?;
    writer.write_store(store)?;
    writer.finish()
}

/// Read a snapshot into a fresh store
pub fn load(path: &Path) -> Result<SectorStore> {
    let mut store = SectorStore::new();
    SnapshotReader::open(path)?.read_into(&mut store)?;
    Ok(store)
}
