//! Store-wide aggregates
//!
//! Running min/max values that only ever widen while records are added.

use crate::record::SectorRecord;

/// Min/max aggregates across every record inserted since the last reset
///
/// `None` means unset: no record has been inserted yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub min_track: Option<u8>,
    pub max_track: Option<u8>,
    pub min_data_size: Option<u32>,
    pub max_data_size: Option<u32>,
    pub min_sector_id: Option<u8>,
    pub max_sector_id: Option<u8>,
}

impl StoreStats {
    /// Widen the ranges to include `record`
    pub(crate) fn widen(&mut self, record: &SectorRecord) {
        let track = record.physical().track;
        let size = record.data_size();
        let sector = record.logical().sector;

        widen_min(&mut self.min_track, track);
        widen_max(&mut self.max_track, track);
        widen_min(&mut self.min_data_size, size);
        widen_max(&mut self.max_data_size, size);
        widen_min(&mut self.min_sector_id, sector);
        widen_max(&mut self.max_sector_id, sector);
    }

    /// Reset every aggregate to unset
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// True if no record has widened the aggregates since the last reset
    pub fn is_unset(&self) -> bool {
        self.max_track.is_none()
    }

    /// Whether every range in `self` contains the matching range in `earlier`
    ///
    /// Lets a producer confirm that aggregates taken before a batch of
    /// inserts were only widened by it. An unset range in `earlier` is
    /// contained by anything.
    pub fn contains(&self, earlier: &StoreStats) -> bool {
        covers_min(self.min_track, earlier.min_track)
            && covers_max(self.max_track, earlier.max_track)
            && covers_min(self.min_data_size, earlier.min_data_size)
            && covers_max(self.max_data_size, earlier.max_data_size)
            && covers_min(self.min_sector_id, earlier.min_sector_id)
            && covers_max(self.max_sector_id, earlier.max_sector_id)
    }
}

fn widen_min<T: Ord + Copy>(slot: &mut Option<T>, value: T) {
    *slot = Some(slot.map_or(value, |current| current.min(value)));
}

fn widen_max<T: Ord + Copy>(slot: &mut Option<T>, value: T) {
    *slot = Some(slot.map_or(value, |current| current.max(value)));
}

fn covers_min<T: Ord>(now: Option<T>, before: Option<T>) -> bool {
    match (now, before) {
        (_, None) => true,
        (Some(now), Some(before)) => now <= before,
        (None, Some(_)) => false,
    }
}

fn covers_max<T: Ord>(now: Option<T>, before: Option<T>) -> bool {
    match (now, before) {
        (_, None) => true,
        (Some(now), Some(before)) => now >= before,
        (None, Some(_)) => false,
    }
}
