//! Sector record
//!
//! Owns one decoded sector's identity, modulation tag and payload copy.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{LogicalAddress, PhysicalPosition, SectorIdentity, SortKey};

/// A decoded sector held by the store
///
/// Immutable once built. `data` is `None` only when the payload buffer
/// could not be allocated at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorRecord {
    identity: SectorIdentity,
    modulation: u8,
    data: Option<Bytes>,
}

impl SectorRecord {
    /// Build a record, copying exactly `identity.data_size` bytes of payload
    ///
    /// A source shorter than `data_size` is zero-filled to length. If the
    /// buffer cannot be allocated the record is built without a payload.
    pub fn new(modulation: u8, identity: SectorIdentity, data: &[u8]) -> Self {
        Self {
            identity,
            modulation,
            data: copy_payload(data, identity.data_size as usize),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(modulation: u8, identity: SectorIdentity, data: Option<Bytes>) -> Self {
        Self {
            identity,
            modulation,
            data,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn identity(&self) -> &SectorIdentity {
        &self.identity
    }

    pub fn physical(&self) -> PhysicalPosition {
        self.identity.physical
    }

    pub fn logical(&self) -> LogicalAddress {
        self.identity.logical
    }

    pub fn logical_size(&self) -> u8 {
        self.identity.logical_size
    }

    pub fn id_crc(&self) -> u32 {
        self.identity.id_crc
    }

    pub fn modulation(&self) -> u8 {
        self.modulation
    }

    pub fn data_type(&self) -> u32 {
        self.identity.data_type
    }

    pub fn data_size(&self) -> u32 {
        self.identity.data_size
    }

    pub fn data_crc(&self) -> u32 {
        self.identity.data_crc
    }

    /// Payload bytes, or `None` if the buffer was never allocated
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Whether the payload is present
    ///
    /// When true, `data().len() == data_size()`.
    pub fn has_payload(&self) -> bool {
        self.data.is_some()
    }

    pub fn sort_key(&self) -> SortKey {
        self.identity.sort_key()
    }

    // =========================================================================
    // Matching (used by the store's linear scans)
    // =========================================================================

    pub fn is_at(&self, physical_track: u8, physical_head: u8) -> bool {
        self.identity.physical.track == physical_track && self.identity.physical.head == physical_head
    }

    pub fn has_logical_address(&self, logical_track: u8, logical_head: u8, logical_sector: u8) -> bool {
        let logical = &self.identity.logical;
        logical.track == logical_track && logical.head == logical_head && logical.sector == logical_sector
    }
}

/// Copy `size` bytes of `src` into a fresh buffer
///
/// Returns `None` if the allocation fails.
fn copy_payload(src: &[u8], size: usize) -> Option<Bytes> {
    let mut buf: Vec<u8> = Vec::new();
    if buf.try_reserve_exact(size).is_err() {
        tracing::warn!(size, "Sector payload allocation failed, storing record without data");
        return None;
    }

    let copied = src.len().min(size);
    buf.extend_from_slice(&src[..copied]);
    if copied < size {
        tracing::warn!(
            expected = size,
            supplied = src.len(),
            "Short sector payload, zero-filling to data_size"
        );
        buf.resize(size, 0);
    }

    Some(Bytes::from(buf))
}
