//! Record Module
//!
//! Decoded sector records and the keys used to deduplicate and order them.
//!
//! ## Record Layout
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ SectorIdentity (deduplication key, 10 fields)               │
//! │   physical: track, head        (where the read happened)     │
//! │   logical:  track, head, sector (from the ID field)          │
//! │   logical_size | id_crc | data_type | data_size | data_crc   │
//! ├──────────────────────────────────────────────────────────────┤
//! │ modulation (not part of identity)                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │ data: Option<Bytes>  (None if the payload allocation failed) │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Physical and logical addresses diverge under interleave and skew, so
//! both are kept and queried separately.

mod sector;

use serde::{Deserialize, Serialize};

pub use sector::SectorRecord;

/// Sort key used by `SectorStore::sort`: (physical track, physical head, logical sector)
pub type SortKey = (u8, u8, u8);

/// Where a sector was physically read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalPosition {
    pub track: u8,
    pub head: u8,
}

impl PhysicalPosition {
    pub fn new(track: u8, head: u8) -> Self {
        Self { track, head }
    }
}

/// Address found in a sector's own ID field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalAddress {
    pub track: u8,
    pub head: u8,
    pub sector: u8,
}

impl LogicalAddress {
    pub fn new(track: u8, head: u8, sector: u8) -> Self {
        Self { track, head, sector }
    }
}

/// Full identity of a decoded sector
///
/// Two records with equal identities are the same sector read twice; the
/// store keeps only the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorIdentity {
    pub physical: PhysicalPosition,
    pub logical: LogicalAddress,
    /// Size class from the ID field (N)
    pub logical_size: u8,
    pub id_crc: u32,
    pub data_type: u32,
    /// Payload length in bytes
    pub data_size: u32,
    pub data_crc: u32,
}

impl SectorIdentity {
    /// Identity with zeroed checksums and data type
    ///
    /// Convenience for decoders that fill the remaining fields with the
    /// `with_*` setters.
    pub fn new(physical: PhysicalPosition, logical: LogicalAddress, logical_size: u8, data_size: u32) -> Self {
        Self {
            physical,
            logical,
            logical_size,
            id_crc: 0,
            data_type: 0,
            data_size,
            data_crc: 0,
        }
    }

    pub fn with_id_crc(mut self, id_crc: u32) -> Self {
        self.id_crc = id_crc;
        self
    }

    pub fn with_data_type(mut self, data_type: u32) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_data_crc(mut self, data_crc: u32) -> Self {
        self.data_crc = data_crc;
        self
    }

    /// Ordering key: physical position dominates the logical sector id
    pub fn sort_key(&self) -> SortKey {
        (self.physical.track, self.physical.head, self.logical.sector)
    }
}
