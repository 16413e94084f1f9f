//! # Partitioning of the index domain
//!
//! The input domain `[0, n)` is split into `p` contiguous ranges with
//! floor-based boundaries: range `i` spans `[floor(i·n/p), floor((i+1)·n/p))`.
//! Trailing ranges absorb the remainder when `n` is not a multiple of `p`,
//! and some ranges are empty when `p > n`.

use std::ops::Range;

use crate::error::{EvalError, Result};

/// Lower boundary of chunk `i`
///
/// The product is formed in 128 bits so that `i * n` cannot overflow.
#[inline]
fn boundary(i: usize, n: usize, p: usize) -> usize {
    ((i as u128 * n as u128) / p as u128) as usize
}

/// Index range assigned to worker `i` out of `p` over a domain of length `n`
///
/// # Panics
///
/// Panics if `p == 0` or `i >= p`. Use [`partition`] for validated input.
///
/// # Examples
///
/// ```
/// use chunkwise::partition::chunk_bounds;
///
/// assert_eq!(chunk_bounds(0, 7, 3), 0..2);
/// assert_eq!(chunk_bounds(1, 7, 3), 2..4);
/// assert_eq!(chunk_bounds(2, 7, 3), 4..7);
/// ```
pub fn chunk_bounds(i: usize, n: usize, p: usize) -> Range<usize> {
    assert!(p > 0, "partition requires at least one chunk");
    assert!(i < p, "chunk index {} out of range for {} chunks", i, p);
    boundary(i, n, p)..boundary(i + 1, n, p)
}

/// Splits `[0, n)` into `p` contiguous ranges
///
/// Returns [`EvalError::InvalidWorkerCount`] when `p == 0`.
pub fn partition(n: usize, p: usize) -> Result<Vec<Range<usize>>> {
    if p == 0 {
        return Err(EvalError::InvalidWorkerCount(p));
    }
    Ok((0..p).map(|i| chunk_bounds(i, n, p)).collect())
}

/// Exclusive prefix sum of the range lengths
///
/// The result has one more entry than `ranges`; entry `i` is where chunk
/// `i` starts when the chunks are laid end to end.
pub fn chunk_offsets(ranges: &[Range<usize>]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(ranges.len() + 1);
    let mut sum = 0;

    offsets.push(0);
    for range in ranges {
        sum += range.len();
        offsets.push(sum);
    }

    offsets
}

/// Checks that `ranges` are in order, contiguous and cover exactly `[0, n)`
pub fn is_exact_cover(ranges: &[Range<usize>], n: usize) -> bool {
    let offsets = chunk_offsets(ranges);
    ranges
        .iter()
        .zip(offsets.iter())
        .all(|(range, &offset)| range.start == offset && range.start <= range.end)
        && offsets.last() == Some(&n)
}
