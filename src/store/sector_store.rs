//! SectorStore implementation
//!
//! Vec-backed store with linear-scan lookups and a stable positional sort.

use std::io::{self, Write};

use tracing::{debug, trace};

use crate::config::{Config, MAX_HEADS};
use crate::record::{SectorIdentity, SectorRecord};

use super::{StoreStats, StoreSummary, TrackLine};

/// In-memory store of decoded sectors for one capture
///
/// ## Ordering
/// Records are kept in insertion order until `sort` is called, after which
/// they are in (physical track, physical head, logical sector) order. Every
/// "first match" and "nth" query follows the current list order, so results
/// for ambiguous lookups depend on whether `sort` has run.
///
/// ## Ownership
/// All records and payloads are owned by the store. They are released by
/// `clear_all`, or when the store is dropped.
pub struct SectorStore {
    /// Records in list order
    records: Vec<SectorRecord>,

    /// Running min/max aggregates
    stats: StoreStats,

    /// Heads walked by the summary dump
    heads: u8,
}

impl SectorStore {
    /// Create a new, initialized, empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            stats: StoreStats::default(),
            heads: MAX_HEADS,
        }
    }

    /// Create an empty store using the diagnostic settings from `config`
    pub fn with_config(config: &Config) -> Self {
        let mut store = Self::new();
        store.heads = config.heads.clamp(1, MAX_HEADS);
        store
    }

    /// Reset to empty with all aggregates unset
    ///
    /// Safe to call any number of times.
    pub fn initialize(&mut self) {
        self.clear_all();
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Add a decoded sector
    ///
    /// Returns `false` without touching the store if a record with the same
    /// identity already exists, or if no slot could be allocated for it.
    /// If only the payload buffer cannot be allocated, the record is still
    /// added (without data) and the aggregates are widened.
    pub fn add(&mut self, modulation: u8, identity: SectorIdentity, data: &[u8]) -> bool {
        if self.find_exact(&identity).is_some() {
            trace!(?identity, "Duplicate sector ignored");
            return false;
        }

        if self.records.try_reserve(1).is_err() {
            tracing::warn!(?identity, "Sector slot allocation failed");
            return false;
        }

        let record = SectorRecord::new(modulation, identity, data);
        self.push(record);
        true
    }

    /// Add an already built record (snapshot replay)
    ///
    /// Same duplicate rule as `add`; the payload is moved, not copied.
    pub fn add_record(&mut self, record: SectorRecord) -> bool {
        if self.find_exact(record.identity()).is_some() {
            trace!(identity = ?record.identity(), "Duplicate sector ignored");
            return false;
        }

        if self.records.try_reserve(1).is_err() {
            tracing::warn!(identity = ?record.identity(), "Sector slot allocation failed");
            return false;
        }

        self.push(record);
        true
    }

    fn push(&mut self, record: SectorRecord) {
        debug!(
            physical_track = record.physical().track,
            physical_head = record.physical().head,
            logical_track = record.logical().track,
            logical_head = record.logical().head,
            logical_sector = record.logical().sector,
            logical_size = record.logical_size(),
            data_size = record.data_size(),
            "Adding sector"
        );

        self.stats.widen(&record);
        self.records.push(record);
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Find the record with exactly this identity
    pub fn find_exact(&self, identity: &SectorIdentity) -> Option<&SectorRecord> {
        self.records.iter().find(|r| r.identity() == identity)
    }

    /// First record, in list order, whose ID field carries this logical address
    pub fn find_by_logical_address(
        &self,
        logical_track: u8,
        logical_head: u8,
        logical_sector: u8,
    ) -> Option<&SectorRecord> {
        self.records
            .iter()
            .find(|r| r.has_logical_address(logical_track, logical_head, logical_sector))
    }

    /// First record, in list order, read at this physical position with this sector id
    ///
    /// For formats where physical and logical numbering coincide.
    pub fn find_by_physical_and_logical_sector(
        &self,
        physical_track: u8,
        physical_head: u8,
        logical_sector: u8,
    ) -> Option<&SectorRecord> {
        self.records
            .iter()
            .find(|r| r.is_at(physical_track, physical_head) && r.logical().sector == logical_sector)
    }

    /// The `n`th (zero-based) record, in list order, read at this physical position
    pub fn find_nth(&self, physical_track: u8, physical_head: u8, n: usize) -> Option<&SectorRecord> {
        self.sectors_at(physical_track, physical_head).nth(n)
    }

    /// Iterate records read at this physical position, in list order
    pub fn sectors_at(&self, physical_track: u8, physical_head: u8) -> SectorsAt<'_> {
        SectorsAt {
            inner: self.records.iter(),
            track: physical_track,
            head: physical_head,
        }
    }

    // =========================================================================
    // Counts
    // =========================================================================

    /// Number of records read at this physical position
    pub fn count(&self, physical_track: u8, physical_head: u8) -> usize {
        self.sectors_at(physical_track, physical_head).count()
    }

    /// Number of records decoded with this modulation
    pub fn count_by_modulation(&self, modulation: u8) -> usize {
        self.records.iter().filter(|r| r.modulation() == modulation).count()
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Reorder into (physical track, physical head, logical sector) order
    ///
    /// Stable: records with equal keys keep their relative order.
    pub fn sort(&mut self) {
        self.records.sort_by_key(SectorRecord::sort_key);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release every record and payload and reset the aggregates
    pub fn clear_all(&mut self) {
        if !self.records.is_empty() {
            debug!(sectors = self.records.len(), "Releasing all sectors");
        }
        self.records = Vec::new();
        self.stats.reset();
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Build the per-track summary for tracks `0..=max_track`
    pub fn summary(&self) -> StoreSummary {
        let mut summary = StoreSummary::default();

        let Some(max_track) = self.stats.max_track else {
            return summary;
        };

        for track in 0..=max_track {
            let mut line = TrackLine {
                track,
                sectors: Vec::new(),
            };

            for head in 0..self.heads {
                for record in self.sectors_at(track, head) {
                    line.sectors.push((record.logical().sector, record.physical().head));
                }
            }

            summary.total += line.sectors.len();
            summary.tracks.push(line);
        }

        summary
    }

    /// Write the summary to `out`
    pub fn dump_summary_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self.summary())
    }

    /// Write the summary to stderr
    pub fn dump_summary(&self) {
        if let Err(e) = self.dump_summary_to(io::stderr().lock()) {
            tracing::warn!(error = %e, "Failed to write sector summary");
        }
    }

    /// Emit the summary through tracing at debug level
    pub fn log_summary(&self) {
        let summary = self.summary();
        for line in &summary.tracks {
            debug!("{}", line);
        }
        debug!(total = summary.total, "Total extracted sectors");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate every record in list order
    pub fn iter(&self) -> std::slice::Iter<'_, SectorRecord> {
        self.records.iter()
    }

    /// Current min/max aggregates
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Heads walked by the summary dump
    pub fn heads(&self) -> u8 {
        self.heads
    }
}

impl Default for SectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SectorStore {
    fn drop(&mut self) {
        self.clear_all();
    }
}

impl<'a> IntoIterator for &'a SectorStore {
    type Item = &'a SectorRecord;
    type IntoIter = std::slice::Iter<'a, SectorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the records read at one physical position
pub struct SectorsAt<'a> {
    inner: std::slice::Iter<'a, SectorRecord>,
    track: u8,
    head: u8,
}

impl<'a> Iterator for SectorsAt<'a> {
    type Item = &'a SectorRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let (track, head) = (self.track, self.head);
        self.inner.by_ref().find(|r| r.is_at(track, head))
    }
}
