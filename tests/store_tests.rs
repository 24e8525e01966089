//! SectorStore Tests
//!
//! Tests verify:
//! - Insertion and duplicate rejection
//! - The four lookup shapes and their list-order dependence
//! - Counts by position and modulation
//! - Stable sort
//! - Aggregate widening and reset
//! - Clear / initialize lifecycle
//! - Summary dump

use sectorstore::config::Config;
use sectorstore::{LogicalAddress, PhysicalPosition, SectorIdentity, SectorStore, StoreStats};

// =============================================================================
// Helper Functions
// =============================================================================

const MFM: u8 = 1;
const FM: u8 = 0;

/// Identity where physical and logical position coincide
fn sector(track: u8, head: u8, id: u8) -> SectorIdentity {
    SectorIdentity::new(
        PhysicalPosition::new(track, head),
        LogicalAddress::new(track, head, id),
        2,
        256,
    )
    .with_id_crc(0x1000 + id as u32)
    .with_data_crc(0x2000 + id as u32)
}

fn payload(fill: u8, size: u32) -> Vec<u8> {
    vec![fill; size as usize]
}

fn add(store: &mut SectorStore, identity: SectorIdentity) -> bool {
    store.add(MFM, identity, &payload(identity.logical.sector, identity.data_size))
}

fn sector_ids(store: &SectorStore) -> Vec<u8> {
    store.iter().map(|r| r.logical().sector).collect()
}

// =============================================================================
// Insertion Tests
// =============================================================================

#[test]
fn test_new_store_is_empty() {
    let store = SectorStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.stats().is_unset());
}

#[test]
fn test_add_distinct_sectors() {
    let mut store = SectorStore::new();

    for id in 1..=9 {
        assert!(add(&mut store, sector(0, 0, id)));
    }

    assert_eq!(store.len(), 9);
}

#[test]
fn test_add_duplicate_is_noop() {
    let mut store = SectorStore::new();

    assert!(add(&mut store, sector(0, 0, 1)));
    let stats_before = *store.stats();

    assert!(!add(&mut store, sector(0, 0, 1)));
    assert_eq!(store.len(), 1);
    assert_eq!(*store.stats(), stats_before);
}

#[test]
fn test_duplicate_ignores_modulation_and_payload() {
    let mut store = SectorStore::new();

    assert!(store.add(MFM, sector(0, 0, 1), &payload(0xAA, 256)));
    assert!(!store.add(FM, sector(0, 0, 1), &payload(0x55, 256)));

    let record = store.find_exact(&sector(0, 0, 1)).unwrap();
    assert_eq!(record.modulation(), MFM);
    assert_eq!(record.data().unwrap()[0], 0xAA);
}

#[test]
fn test_add_preserves_insertion_order() {
    let mut store = SectorStore::new();

    add(&mut store, sector(0, 0, 3));
    add(&mut store, sector(0, 0, 1));
    add(&mut store, sector(0, 0, 2));

    assert_eq!(sector_ids(&store), vec![3, 1, 2]);
}

#[test]
fn test_payload_is_copied() {
    let mut store = SectorStore::new();
    let mut data = payload(0x11, 256);

    store.add(MFM, sector(0, 0, 1), &data);
    data[0] = 0xFF;

    let record = store.find_exact(&sector(0, 0, 1)).unwrap();
    assert!(record.has_payload());
    assert_eq!(record.data().unwrap().len(), 256);
    assert_eq!(record.data().unwrap()[0], 0x11);
}

// =============================================================================
// find_exact Tests
// =============================================================================

#[test]
fn test_find_exact_returns_match() {
    let mut store = SectorStore::new();
    add(&mut store, sector(5, 1, 4));

    let record = store.find_exact(&sector(5, 1, 4)).unwrap();
    assert_eq!(record.identity(), &sector(5, 1, 4));
}

#[test]
fn test_find_exact_any_field_change_misses() {
    let mut store = SectorStore::new();
    let base = sector(5, 1, 4);
    add(&mut store, base);

    let variants = [
        SectorIdentity { physical: PhysicalPosition::new(6, 1), ..base },
        SectorIdentity { physical: PhysicalPosition::new(5, 0), ..base },
        SectorIdentity { logical: LogicalAddress::new(9, 1, 4), ..base },
        SectorIdentity { logical: LogicalAddress::new(5, 0, 4), ..base },
        SectorIdentity { logical: LogicalAddress::new(5, 1, 5), ..base },
        SectorIdentity { logical_size: 3, ..base },
        SectorIdentity { id_crc: 0xBEEF, ..base },
        SectorIdentity { data_type: 0xF8, ..base },
        SectorIdentity { data_size: 512, ..base },
        SectorIdentity { data_crc: 0xBEEF, ..base },
    ];

    for variant in variants {
        assert!(store.find_exact(&variant).is_none(), "{:?} should not match", variant);
    }
}

// =============================================================================
// Logical / Hybrid Lookup Tests
// =============================================================================

#[test]
fn test_find_by_logical_address_with_skewed_track() {
    let mut store = SectorStore::new();

    // Read on physical track 10, but the ID field claims track 20
    let skewed = SectorIdentity::new(
        PhysicalPosition::new(10, 0),
        LogicalAddress::new(20, 0, 3),
        2,
        256,
    );
    add(&mut store, skewed);

    let record = store.find_by_logical_address(20, 0, 3).unwrap();
    assert_eq!(record.physical(), PhysicalPosition::new(10, 0));
    assert!(store.find_by_logical_address(10, 0, 3).is_none());
}

#[test]
fn test_find_by_logical_address_first_in_list_order() {
    let mut store = SectorStore::new();

    // Same logical address read on two physical tracks, later track first
    let late = SectorIdentity::new(PhysicalPosition::new(4, 0), LogicalAddress::new(2, 0, 1), 2, 256);
    let early = SectorIdentity::new(PhysicalPosition::new(2, 0), LogicalAddress::new(2, 0, 1), 2, 256);
    add(&mut store, late);
    add(&mut store, early);

    let before = store.find_by_logical_address(2, 0, 1).unwrap();
    assert_eq!(before.physical().track, 4);

    store.sort();

    let after = store.find_by_logical_address(2, 0, 1).unwrap();
    assert_eq!(after.physical().track, 2);
}

#[test]
fn test_find_by_physical_and_logical_sector() {
    let mut store = SectorStore::new();

    add(&mut store, sector(1, 0, 5));
    add(&mut store, sector(1, 1, 5));

    let record = store.find_by_physical_and_logical_sector(1, 1, 5).unwrap();
    assert_eq!(record.physical().head, 1);
    assert!(store.find_by_physical_and_logical_sector(1, 1, 6).is_none());
    assert!(store.find_by_physical_and_logical_sector(2, 0, 5).is_none());
}

#[test]
fn test_find_by_physical_ignores_logical_track() {
    let mut store = SectorStore::new();

    let mislabelled = SectorIdentity::new(PhysicalPosition::new(7, 0), LogicalAddress::new(0, 1, 2), 2, 256);
    add(&mut store, mislabelled);

    assert!(store.find_by_physical_and_logical_sector(7, 0, 2).is_some());
}

// =============================================================================
// find_nth / Count Tests
// =============================================================================

#[test]
fn test_find_nth_filters_by_position() {
    let mut store = SectorStore::new();

    add(&mut store, sector(0, 0, 1));
    add(&mut store, sector(0, 1, 1));
    add(&mut store, sector(0, 0, 2));
    add(&mut store, sector(1, 0, 1));
    add(&mut store, sector(0, 0, 3));

    assert_eq!(store.find_nth(0, 0, 0).unwrap().logical().sector, 1);
    assert_eq!(store.find_nth(0, 0, 1).unwrap().logical().sector, 2);
    assert_eq!(store.find_nth(0, 0, 2).unwrap().logical().sector, 3);
    assert!(store.find_nth(0, 0, 3).is_none());
    assert_eq!(store.find_nth(0, 1, 0).unwrap().physical().head, 1);
    assert!(store.find_nth(2, 0, 0).is_none());
}

#[test]
fn test_sectors_at_matches_find_nth() {
    let mut store = SectorStore::new();
    for id in [4, 2, 9, 1] {
        add(&mut store, sector(3, 1, id));
    }
    add(&mut store, sector(3, 0, 7));

    let via_iter: Vec<u8> = store.sectors_at(3, 1).map(|r| r.logical().sector).collect();
    let via_nth: Vec<u8> = (0..store.count(3, 1))
        .map(|n| store.find_nth(3, 1, n).unwrap().logical().sector)
        .collect();

    assert_eq!(via_iter, vec![4, 2, 9, 1]);
    assert_eq!(via_iter, via_nth);
}

#[test]
fn test_count_before_and_after_sort() {
    let mut store = SectorStore::new();

    for track in [2, 0, 1, 0, 2, 2] {
        let id = store.count(track, 0) as u8 + 1;
        add(&mut store, sector(track, 0, id));
    }
    add(&mut store, sector(0, 1, 1));

    let counts = |s: &SectorStore| (s.count(0, 0), s.count(1, 0), s.count(2, 0), s.count(0, 1), s.count(3, 0));

    assert_eq!(counts(&store), (2, 1, 3, 1, 0));
    store.sort();
    assert_eq!(counts(&store), (2, 1, 3, 1, 0));
}

#[test]
fn test_count_by_modulation() {
    let mut store = SectorStore::new();

    store.add(FM, sector(0, 0, 1), &payload(0, 256));
    store.add(MFM, sector(1, 0, 1), &payload(0, 256));
    store.add(MFM, sector(1, 0, 2), &payload(0, 256));

    assert_eq!(store.count_by_modulation(FM), 1);
    assert_eq!(store.count_by_modulation(MFM), 2);
    assert_eq!(store.count_by_modulation(7), 0);
}

// =============================================================================
// Sort Tests
// =============================================================================

#[test]
fn test_sort_orders_by_physical_then_sector() {
    let mut store = SectorStore::new();

    add(&mut store, sector(1, 1, 2));
    add(&mut store, sector(0, 0, 9));
    add(&mut store, sector(1, 0, 5));
    add(&mut store, sector(0, 0, 1));
    add(&mut store, sector(1, 1, 1));

    store.sort();

    let keys: Vec<_> = store.iter().map(|r| r.sort_key()).collect();
    assert_eq!(keys, vec![(0, 0, 1), (0, 0, 9), (1, 0, 5), (1, 1, 1), (1, 1, 2)]);
}

#[test]
fn test_sort_physical_dominates_logical() {
    let mut store = SectorStore::new();

    // Logical track is ignored by the sort key
    let a = SectorIdentity::new(PhysicalPosition::new(1, 0), LogicalAddress::new(0, 0, 1), 2, 256);
    let b = SectorIdentity::new(PhysicalPosition::new(0, 0), LogicalAddress::new(9, 0, 8), 2, 256);
    add(&mut store, a);
    add(&mut store, b);

    store.sort();

    assert_eq!(store.iter().next().unwrap().physical().track, 0);
}

#[test]
fn test_sort_is_stable_for_ties() {
    let mut store = SectorStore::new();

    // Same sort key, distinguished by data crc
    let first = sector(0, 0, 1).with_data_crc(0xAAAA);
    let second = sector(0, 0, 1).with_data_crc(0xBBBB);
    let third = sector(0, 0, 1).with_data_crc(0x0001);

    add(&mut store, sector(0, 0, 2));
    add(&mut store, first);
    add(&mut store, second);
    add(&mut store, third);

    store.sort();

    let crcs: Vec<u32> = store.iter().map(|r| r.data_crc()).collect();
    assert_eq!(crcs, vec![0xAAAA, 0xBBBB, 0x0001, sector(0, 0, 2).data_crc]);
}

#[test]
fn test_sort_is_idempotent() {
    let mut store = SectorStore::new();
    for id in [3, 1, 2] {
        add(&mut store, sector(0, 0, id));
    }

    store.sort();
    let once = sector_ids(&store);
    store.sort();

    assert_eq!(sector_ids(&store), once);
}

#[test]
fn test_sort_empty_store() {
    let mut store = SectorStore::new();
    store.sort();
    assert!(store.is_empty());
}

// =============================================================================
// Aggregate Tests
// =============================================================================

#[test]
fn test_stats_track_ranges() {
    let mut store = SectorStore::new();

    let small = SectorIdentity::new(PhysicalPosition::new(3, 0), LogicalAddress::new(3, 0, 5), 1, 128);
    let large = SectorIdentity::new(PhysicalPosition::new(40, 1), LogicalAddress::new(40, 1, 1), 3, 1024);
    store.add(MFM, small, &payload(0, 128));
    store.add(MFM, large, &payload(0, 1024));

    let stats = store.stats();
    assert_eq!(stats.min_track, Some(3));
    assert_eq!(stats.max_track, Some(40));
    assert_eq!(stats.min_data_size, Some(128));
    assert_eq!(stats.max_data_size, Some(1024));
    assert_eq!(stats.min_sector_id, Some(1));
    assert_eq!(stats.max_sector_id, Some(5));
}

#[test]
fn test_stats_never_narrow() {
    let mut store = SectorStore::new();
    let mut previous = StoreStats::default();

    for (track, id) in [(10, 5), (2, 9), (30, 1), (15, 4), (2, 9), (0, 0)] {
        add(&mut store, sector(track, 0, id));
        let now = *store.stats();
        assert!(now.contains(&previous));
        previous = now;
    }

    assert_eq!(previous.min_track, Some(0));
    assert_eq!(previous.max_track, Some(30));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_clear_all_empties_store() {
    let mut store = SectorStore::new();
    add(&mut store, sector(0, 0, 1));
    add(&mut store, sector(1, 1, 2));

    store.clear_all();

    assert!(store.is_empty());
    assert_eq!(store.count(0, 0), 0);
    assert_eq!(store.count(1, 1), 0);
    assert!(store.find_nth(0, 0, 0).is_none());
    assert!(store.find_exact(&sector(0, 0, 1)).is_none());
    assert!(store.find_by_logical_address(1, 1, 2).is_none());
    assert!(store.find_by_physical_and_logical_sector(1, 1, 2).is_none());
    assert!(store.stats().is_unset());
}

#[test]
fn test_readd_after_clear() {
    let mut store = SectorStore::new();
    add(&mut store, sector(0, 0, 1));
    store.clear_all();

    assert!(add(&mut store, sector(0, 0, 1)));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_initialize_is_idempotent() {
    let mut store = SectorStore::new();
    add(&mut store, sector(4, 0, 1));

    store.initialize();
    store.initialize();

    assert!(store.is_empty());
    assert_eq!(*store.stats(), StoreStats::default());
}

// =============================================================================
// Summary Tests
// =============================================================================

#[test]
fn test_summary_empty_store() {
    let store = SectorStore::new();
    let summary = store.summary();

    assert!(summary.tracks.is_empty());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.to_string(), "Total extracted sectors: 0\n");
}

#[test]
fn test_dump_summary_format() {
    let mut store = SectorStore::new();

    add(&mut store, sector(0, 0, 2));
    add(&mut store, sector(0, 1, 1));
    add(&mut store, sector(0, 0, 1));
    add(&mut store, sector(2, 0, 7));

    let mut out = Vec::new();
    store.dump_summary_to(&mut out).unwrap();

    let expected = "TRACK 00: 2[0] 1[0] 1[1] \n\
                    TRACK 01: \n\
                    TRACK 02: 7[0] \n\
                    Total extracted sectors: 4\n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_summary_follows_list_order() {
    let mut store = SectorStore::new();
    add(&mut store, sector(0, 0, 2));
    add(&mut store, sector(0, 0, 1));

    store.sort();

    assert_eq!(store.summary().tracks[0].sectors, vec![(1, 0), (2, 0)]);
}

#[test]
fn test_summary_single_head_config() {
    let config = Config::builder().heads(1).build().unwrap();
    let mut store = SectorStore::with_config(&config);

    add(&mut store, sector(0, 0, 1));
    add(&mut store, sector(0, 1, 1));

    let summary = store.summary();
    assert_eq!(store.heads(), 1);
    assert_eq!(summary.total, 1);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_summary_does_not_mutate() {
    let mut store = SectorStore::new();
    add(&mut store, sector(1, 0, 3));
    add(&mut store, sector(0, 0, 1));

    let before = sector_ids(&store);
    store.dump_summary_to(std::io::sink()).unwrap();
    store.log_summary();

    assert_eq!(sector_ids(&store), before);
}

struct ClosedWriter;

impl std::io::Write for ClosedWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_dump_summary_reports_write_errors() {
    let mut store = SectorStore::new();
    add(&mut store, sector(0, 0, 1));

    let result = store.dump_summary_to(ClosedWriter);
    assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::BrokenPipe);

    // stderr variant logs instead of failing
    store.dump_summary();
    assert_eq!(store.len(), 1);
}
