//! Store Module
//!
//! In-memory collection of decoded sectors for one capture.
//!
//! ## Responsibilities
//! - Reject exact duplicates (full identity match)
//! - Positional lookups: exact, logical address, physical + sector id, nth at position
//! - Counts by physical position and by modulation
//! - Normalize to (physical track, physical head, logical sector) order
//! - Track running min/max aggregates for the image writer
//!
//! ## Data Structure Choice
//! A plain `Vec<SectorRecord>` in list order:
//! - Insertion order is observable until `sort` is called
//! - Captures are a few thousand sectors, so linear scans are fine
//! - A position index can be layered on later without changing query order

mod sector_store;
mod stats;
mod summary;

pub use sector_store::{SectorStore, SectorsAt};
pub use stats::StoreStats;
pub use summary::{StoreSummary, TrackLine};
