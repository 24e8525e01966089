//! Snapshot Writer
//!
//! Appends framed records to a new snapshot file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::record::SectorRecord;
use crate::store::SectorStore;

use super::{MAGIC, MAX_ENTRY_SIZE, VERSION};

/// Writes sector records to a snapshot file
pub struct SnapshotWriter {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Number of records written
    entry_count: u64,
    /// fsync on finish
    sync: bool,
}

impl SnapshotWriter {
    /// Create (or truncate) a snapshot file and write its header
    ///
    /// Call `append()`/`write_store()`, then `finish()` to patch the count.
    pub fn create(path: &Path, sync: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?; // Placeholder for entry count

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            entry_count: 0,
            sync,
        })
    }

    /// Append one record: [len(4)][crc(4)][bincode bytes]
    ///
    /// Records encoding to more than `MAX_ENTRY_SIZE` bytes are rejected
    /// before anything is written.
    pub fn append(&mut self, record: &SectorRecord) -> Result<()> {
        let payload = bincode::serialize(record)?;

        let len = match u32::try_from(payload.len()) {
            Ok(len) if len <= MAX_ENTRY_SIZE => len,
            _ => {
                return Err(StoreError::Serialization(format!(
                    "Entry too large: {} bytes (max {})",
                    payload.len(),
                    MAX_ENTRY_SIZE
                )))
            }
        };
        let crc = crc32fast::hash(&payload);

        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&crc.to_le_bytes())?;
        self.writer.write_all(&payload)?;

        self.entry_count += 1;
        Ok(())
    }

    /// Append every record of `store` in its current list order
    pub fn write_store(&mut self, store: &SectorStore) -> Result<u64> {
        for record in store {
            self.append(record)?;
        }
        Ok(self.entry_count)
    }

    /// Number of records appended so far
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Flush, patch the header count and optionally fsync
    ///
    /// Returns the number of records written.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;

        let mut file = self.writer.into_inner().map_err(|e| {
            StoreError::Io(e.into_error())
        })?;
        file.seek(SeekFrom::Start(6))?; // After magic + version
        file.write_all(&self.entry_count.to_le_bytes())?;

        if self.sync {
            file.sync_all()?;
        }

        tracing::debug!(
            path = %self.path.display(),
            entries = self.entry_count,
            "Snapshot written"
        );

        Ok(self.entry_count)
    }
}
