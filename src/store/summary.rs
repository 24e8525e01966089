//! Human-readable store summary
//!
//! One line per physical track listing `sector[head]` pairs in list order,
//! followed by a total. Meant for stderr, not for parsing.

use std::fmt;

/// Sectors found on one physical track, across the walked heads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLine {
    pub track: u8,
    /// (logical sector, physical head) in list order, head 0 first
    pub sectors: Vec<(u8, u8)>,
}

/// What `SectorStore::dump_summary` prints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub tracks: Vec<TrackLine>,
    /// Number of sectors listed across all tracks
    pub total: usize,
}

impl fmt::Display for TrackLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRACK {:02}: ", self.track)?;
        for (sector, head) in &self.sectors {
            write!(f, "{}[{}] ", sector, head)?;
        }
        Ok(())
    }
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.tracks {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "Total extracted sectors: {}", self.total)
    }
}
