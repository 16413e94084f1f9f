//! Properties of the floor-based chunk partition

use chunkwise::partition::{chunk_bounds, chunk_offsets, is_exact_cover, partition};
use proptest::prelude::*;

#[test]
fn test_single_worker_covers_everything() {
    assert_eq!(partition(1000, 1).unwrap(), vec![0..1000]);
}

#[test]
fn test_one_element_per_worker() {
    let ranges = partition(6, 6).unwrap();
    assert_eq!(ranges, (0..6).map(|i| i..i + 1).collect::<Vec<_>>());
}

#[test]
fn test_seven_over_three() {
    assert_eq!(chunk_bounds(0, 7, 3), 0..2);
    assert_eq!(chunk_bounds(1, 7, 3), 2..4);
    assert_eq!(chunk_bounds(2, 7, 3), 4..7);
}

#[test]
fn test_reference_scenario_chunk_sizes() {
    let ranges = partition(1_000_000, 12).unwrap();
    let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 1_000_000);
    assert!(sizes.iter().all(|&s| s == 83_333 || s == 83_334));
    assert_eq!(chunk_offsets(&ranges).last(), Some(&1_000_000));
}

proptest! {
    #[test]
    fn prop_ranges_cover_domain_exactly(n in 0usize..5_000, p in 1usize..64) {
        let ranges = partition(n, p).unwrap();
        prop_assert_eq!(ranges.len(), p);
        prop_assert!(is_exact_cover(&ranges, n));

        // Every index is owned by exactly one range
        let mut owners = vec![0u8; n];
        for r in &ranges {
            for i in r.clone() {
                owners[i] += 1;
            }
        }
        prop_assert!(owners.iter().all(|&c| c == 1));
    }

    #[test]
    fn prop_chunk_sizes_differ_by_at_most_one(n in 0usize..100_000, p in 1usize..128) {
        let sizes: Vec<usize> = partition(n, p).unwrap().iter().map(|r| r.len()).collect();
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        prop_assert!(max - min <= 1);
    }
}
