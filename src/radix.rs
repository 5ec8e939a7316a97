// LSB radix sort over order-preserving u64 keys, one byte per pass, based on
// https://crates.io/crates/radsort
// http://codercorner.com/RadixSortRevisited.htm
// http://stereopsis.com/radix.html
//
// The parallel pass follows the usual multi-threaded LSB layout: every tile counts into its own
// histogram, and the output is carved into bucket-major, tile-minor regions so that tiles scatter
// without sharing any destination index.

use crate::{SortConfig, HIST_PER_U64, RADIX_BITS, RADIX_HIST_LEN, RADIX_HIST_MASK};
use log::trace;
use rayon::prelude::*;

#[inline(always)]
fn digit(key: u64, shift: usize) -> usize {
    ((key >> shift) & RADIX_HIST_MASK) as usize
}

/// Fill the histogram for a digit indicated by the given `shift` amount.
///
/// Returns true when all keys belong to the same bucket.
#[inline(never)]
fn fill_histogram(keys: &[u64], shift: usize, histogram: &mut [usize; RADIX_HIST_LEN]) -> bool {
    histogram.fill(0);

    let mut last_bucket = 0;
    keys.iter().for_each(|k| {
        let bucket = digit(*k, shift);
        histogram[bucket] += 1;
        last_bucket = bucket;
    });

    // if every item is in the same bucket then no sorting is necessary
    histogram[last_bucket] == keys.len()
}

/// Calculate the prefix sum of the histogram, resulting in the starting indices to the output for each bucket.
#[inline(never)]
pub(crate) fn cumulative_histogram<const N: usize>(histogram: &mut [usize; N]) {
    let mut sum = 0_usize;
    histogram.iter_mut().for_each(|count| {
        let tmp = *count;
        *count = sum;
        sum += tmp;
    });
}

/// Stable scatter of `keys` into `output`, advancing the bucket offsets in `histogram`.
#[inline(never)]
fn reorder_keys(keys: &[u64], output: &mut [u64], histogram: &mut [usize; RADIX_HIST_LEN], shift: usize) {
    keys.iter().for_each(|key| {
        let bucket = digit(*key, shift);
        let output_idx = histogram[bucket];
        output[output_idx] = *key;
        histogram[bucket] = output_idx + 1;
    });
}

/// Starting output offset for every `(tile, bucket)` pair.
///
/// Buckets are laid out in ascending order and, within a bucket, tiles follow each other in
/// input order, so scattering each tile into its own offsets reproduces a stable sequential pass.
pub(crate) fn tile_offsets(locals: &[[usize; RADIX_HIST_LEN]]) -> Vec<[usize; RADIX_HIST_LEN]> {
    let mut bucket_starts = [0_usize; RADIX_HIST_LEN];
    for local in locals {
        bucket_starts.iter_mut().zip(local).for_each(|(total, count)| *total += *count);
    }
    cumulative_histogram(&mut bucket_starts);

    let mut offsets = vec![[0_usize; RADIX_HIST_LEN]; locals.len()];
    for bucket in 0..RADIX_HIST_LEN {
        let mut running = bucket_starts[bucket];
        for (tile, local) in locals.iter().enumerate() {
            offsets[tile][bucket] = running;
            running += local[bucket];
        }
    }
    offsets
}

#[inline(never)]
fn reorder_keys_parallel(keys: &[u64], output: &mut [u64], shift: usize, tile_len: usize) -> bool {
    let locals: Vec<[usize; RADIX_HIST_LEN]> = keys
        .par_chunks(tile_len)
        .map(|tile| {
            let mut histogram = [0_usize; RADIX_HIST_LEN];
            fill_histogram(tile, shift, &mut histogram);
            histogram
        })
        .collect();

    // if every item is in the same bucket then no sorting is necessary
    let all_values_equal =
        (0..RADIX_HIST_LEN).any(|bucket| locals.iter().map(|local| local[bucket]).sum::<usize>() == keys.len());
    if all_values_equal {
        return false;
    }

    let offsets = tile_offsets(&locals);

    let tiles = locals.len();
    let mut regions: Vec<Vec<&mut [u64]>> = (0..tiles).map(|_| Vec::with_capacity(RADIX_HIST_LEN)).collect();
    let mut rest = output;
    let mut consumed = 0;
    for bucket in 0..RADIX_HIST_LEN {
        for (tile, local) in locals.iter().enumerate() {
            debug_assert_eq!(consumed, offsets[tile][bucket]);
            let (region, tail) = std::mem::take(&mut rest).split_at_mut(local[bucket]);
            regions[tile].push(region);
            rest = tail;
            consumed += local[bucket];
        }
    }
    debug_assert!(rest.is_empty());

    trace!("radix shift {shift}: scattering {} keys over {tiles} tiles", keys.len());

    regions
        .into_par_iter()
        .zip(keys.par_chunks(tile_len))
        .for_each(|(mut buckets, tile)| {
            let mut cursor = [0_usize; RADIX_HIST_LEN];
            tile.iter().for_each(|key| {
                let bucket = digit(*key, shift);
                buckets[bucket][cursor[bucket]] = *key;
                cursor[bucket] += 1;
            });
        });

    true
}

/// One stable counting-sort pass over byte `byte` of every key, writing the result to `output`.
///
/// Returns false, leaving `output` untouched, when every key has the same byte and the pass would
/// be the identity.
pub fn radix_pass(keys: &[u64], output: &mut [u64], byte: usize, parallel: bool) -> bool {
    assert!(byte < HIST_PER_U64, "byte index {byte} out of range");
    assert_eq!(keys.len(), output.len(), "key and output buffers must have equal length");

    if keys.len() <= 1 {
        return false;
    }

    let shift = byte * RADIX_BITS;
    if parallel {
        let tile_len = keys.len().div_ceil(rayon::current_num_threads().max(1));
        reorder_keys_parallel(keys, output, shift, tile_len)
    } else {
        let mut histogram = [0_usize; RADIX_HIST_LEN];
        let all_values_equal = fill_histogram(keys, shift, &mut histogram);
        if all_values_equal {
            return false;
        }
        cumulative_histogram(&mut histogram);
        reorder_keys(keys, output, &mut histogram, shift);
        true
    }
}

/// Sort `keys` ascending with eight LSD passes, least significant byte first.
#[inline(never)]
pub fn sort_keys_radix(keys: Vec<u64>, config: &SortConfig) -> Vec<u64> {
    let len = keys.len();
    if len <= 1 {
        return keys;
    }

    let parallel = config.is_parallel(len);
    let mut keys = keys;
    let mut output: Vec<u64> = vec![0; len];

    for byte in 0..HIST_PER_U64 {
        if radix_pass(&keys, &mut output, byte, parallel) {
            std::mem::swap(&mut keys, &mut output);
        } else {
            trace!("radix byte {byte}: all keys share one digit, pass skipped");
        }
    }

    keys
}
