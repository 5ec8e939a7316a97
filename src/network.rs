// Batcher's odd-even merge sort, see
// https://en.wikipedia.org/wiki/Batcher_odd%E2%80%93even_mergesort
// https://www.inf.hs-flensburg.de/lang/algorithmen/sortieren/networks/oemen.htm
//
// The comparator sequence is fixed by the length alone, so the sequential and the parallel form
// produce identical output. The parallel form forks the two halves of every sort step and runs
// the merge one layer at a time: all comparators of a layer touch disjoint pairs, and a layer
// only starts once the previous one has finished.

use crate::SortConfig;
use rayon::prelude::*;

#[inline(always)]
fn compare_exchange(a: &mut f64, b: &mut f64) {
    if *a > *b {
        std::mem::swap(a, b);
    }
}

#[inline(always)]
fn compare_swap(values: &mut [f64], i: usize, j: usize) {
    if values[i] > values[j] {
        values.swap(i, j);
    }
}

fn sort_sequential(values: &mut [f64]) {
    let n = values.len();
    if n > 1 {
        let (lo, hi) = values.split_at_mut(n / 2);
        sort_sequential(lo);
        sort_sequential(hi);
        merge_sequential(values, 0, 1);
    }
}

/// Merge the two sorted halves of `values`, restricted to the subsequence starting at `lo` with
/// the given `stride`.
fn merge_sequential(values: &mut [f64], lo: usize, stride: usize) {
    let n = values.len();
    let step = stride * 2;
    if step < n {
        // even and odd subsequences
        merge_sequential(values, lo, step);
        merge_sequential(values, lo + stride, step);
        let mut i = lo + stride;
        while i + stride < lo + n {
            compare_swap(values, i, i + stride);
            i += step;
        }
    } else {
        compare_swap(values, lo, lo + stride);
    }
}

fn sort_parallel(values: &mut [f64], grain: usize) {
    let n = values.len();
    if n <= grain {
        sort_sequential(values);
        return;
    }

    let (lo, hi) = values.split_at_mut(n / 2);
    rayon::join(|| sort_parallel(lo, grain), || sort_parallel(hi, grain));
    merge_layered(values, grain);
}

/// Same comparators as [`merge_sequential`] from the top, grouped into layers by stride, widest first.
fn merge_layered(values: &mut [f64], grain: usize) {
    let n = values.len();
    let half = n / 2;

    {
        let (lo, hi) = values.split_at_mut(half);
        lo.par_iter_mut()
            .zip(hi.par_iter_mut())
            .with_min_len(grain)
            .for_each(|(a, b)| compare_exchange(a, b));
    }

    // at stride r every position p in [r, n - r) with p / r odd is compared with p + r,
    // which is exactly the first half of each 2r-chunk of values[r..n - r]
    let mut stride = half / 2;
    while stride >= 1 {
        let step = stride * 2;
        values[stride..n - stride]
            .par_chunks_mut(step)
            .with_min_len((grain / step).max(1))
            .for_each(|chunk| {
                let (a, b) = chunk.split_at_mut(stride);
                a.iter_mut().zip(b).for_each(|(a, b)| compare_exchange(a, b));
            });
        stride /= 2;
    }
}

/// Sort `values` ascending with Batcher's odd-even merge network.
///
/// The length must be zero or a power of two, and `values` must not contain NaN.
pub fn odd_even_merge_sort(values: &mut [f64], config: &SortConfig) {
    let n = values.len();
    assert!(n <= 1 || n.is_power_of_two(), "network length {n} is not a power of two");
    debug_assert!(!values.iter().any(|v| v.is_nan()), "NaN passed to the merge network");

    if n <= 1 {
        return;
    }

    if config.is_parallel(n) {
        sort_parallel(values, config.network_grain());
    } else {
        sort_sequential(values);
    }
}
