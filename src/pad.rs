/// Extend `values` to the next power of two with `+inf` sentinels, which sort behind every other
/// non-NaN value. Returns the original length for [`truncate`].
pub fn pad_to_power_of_two(values: &mut Vec<f64>) -> usize {
    let len = values.len();
    values.resize(len.next_power_of_two(), f64::INFINITY);
    len
}

/// Drop everything past the first `len` values.
pub fn truncate(values: &mut Vec<f64>, len: usize) {
    values.truncate(len);
}
