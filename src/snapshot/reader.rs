//! Snapshot Reader
//!
//! Validates a snapshot file and replays its records into a store.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::record::SectorRecord;
use crate::store::SectorStore;

use super::{ENTRY_HEADER_SIZE, HEADER_SIZE, MAGIC, MAX_ENTRY_SIZE, VERSION};

/// Outcome of replaying a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    /// Entries decoded from the file
    pub entries_read: u64,
    /// Entries accepted by the store (duplicates are dropped)
    pub entries_inserted: u64,
}

/// Reader for snapshot files
pub struct SnapshotReader {
    reader: BufReader<File>,
    entry_count: u64,
}

impl SnapshotReader {
    /// Open a snapshot and validate its header
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);

        let mut header = [0u8; HEADER_SIZE as usize];
        read_exact_or_corrupt(&mut reader, &mut header, "header")?;

        if &header[0..4] != MAGIC {
            return Err(StoreError::SnapshotCorruption(format!(
                "Invalid snapshot magic: expected SECT, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(StoreError::SnapshotCorruption(format!(
                "Unsupported snapshot version: {}",
                version
            )));
        }

        let mut count = [0u8; 8];
        count.copy_from_slice(&header[6..14]);
        let entry_count = u64::from_le_bytes(count);

        Ok(Self {
            reader,
            entry_count,
        })
    }

    /// Number of entries the header announces
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Decode the next entry
    pub fn next_record(&mut self) -> Result<SectorRecord> {
        let mut frame = [0u8; ENTRY_HEADER_SIZE];
        read_exact_or_corrupt(&mut self.reader, &mut frame, "entry header")?;

        let len = u32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let expected_crc = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);

        if len > MAX_ENTRY_SIZE {
            return Err(StoreError::SnapshotCorruption(format!(
                "Entry too large: {} bytes (max {})",
                len, MAX_ENTRY_SIZE
            )));
        }

        let mut payload = vec![0u8; len as usize];
        read_exact_or_corrupt(&mut self.reader, &mut payload, "entry body")?;

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            return Err(StoreError::SnapshotCorruption(format!(
                "CRC mismatch: expected {:#010x}, got {:#010x}",
                expected_crc, actual_crc
            )));
        }

        let record: SectorRecord = bincode::deserialize(&payload)?;

        if let Some(data) = record.data() {
            if data.len() != record.data_size() as usize {
                return Err(StoreError::SnapshotCorruption(format!(
                    "Payload length {} does not match data_size {}",
                    data.len(),
                    record.data_size()
                )));
            }
        }

        Ok(record)
    }

    /// Replay every entry into `store` through its duplicate check
    pub fn read_into(mut self, store: &mut SectorStore) -> Result<SnapshotStats> {
        let mut stats = SnapshotStats::default();

        for _ in 0..self.entry_count {
            let record = self.next_record()?;
            stats.entries_read += 1;
            if store.add_record(record) {
                stats.entries_inserted += 1;
            }
        }

        tracing::debug!(
            read = stats.entries_read,
            inserted = stats.entries_inserted,
            "Snapshot replayed"
        );

        Ok(stats)
    }
}

/// `read_exact`, mapping a short read to a corruption error
fn read_exact_or_corrupt<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(StoreError::SnapshotCorruption(
            format!("Truncated snapshot: incomplete {}", what),
        )),
        Err(e) => Err(e.into()),
    }
}
