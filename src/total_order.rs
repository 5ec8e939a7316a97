use rayon::prelude::*;

/// Maps a value to a `u64` whose unsigned ordering matches the value's numeric ordering.
pub trait TotalOrder: 'static {
    fn to_total_order(&self) -> u64;
}

impl TotalOrder for f64 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        // see f64::total_cmp
        // negative: flip every bit, non-negative: flip only the sign bit
        let bits = self.to_bits();
        (bits ^ ((bits as i64 >> 63) as u64 >> 1)) ^ (1 << 63)
    }
}

/// Inverse of [`TotalOrder`].
pub trait FromTotalOrder {
    fn from_total_order(value: u64) -> Self;
}

impl FromTotalOrder for f64 {
    #[inline(always)]
    fn from_total_order(value: u64) -> Self {
        // sign bit set means the value was non-negative and only the sign bit was flipped
        let mask = !((value as i64 >> 63) as u64) | (1 << 63);
        f64::from_bits(value ^ mask)
    }
}

/// Encode `values` into `keys`, replacing its contents.
pub fn encode_keys(values: &[f64], keys: &mut Vec<u64>, parallel: bool) {
    if parallel {
        values.par_iter().map(TotalOrder::to_total_order).collect_into_vec(keys);
    } else {
        keys.clear();
        keys.extend(values.iter().map(TotalOrder::to_total_order));
    }
}

/// Decode `keys` into the equally long `values`.
pub fn decode_keys(keys: &[u64], values: &mut [f64], parallel: bool) {
    assert_eq!(keys.len(), values.len(), "key and value buffers must have equal length");

    if parallel {
        values
            .par_iter_mut()
            .zip(keys.par_iter())
            .for_each(|(v, k)| *v = f64::from_total_order(*k));
    } else {
        values
            .iter_mut()
            .zip(keys)
            .for_each(|(v, k)| *v = f64::from_total_order(*k));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_total_order() {
        let floats = vec![
            f64::NEG_INFINITY,
            f64::MIN,
            -1.0,
            -f64::MIN_POSITIVE,
            -0.0,
            0.0,
            f64::MIN_POSITIVE,
            1.0,
            f64::MAX,
            f64::INFINITY,
        ];
        for w in floats.windows(2) {
            assert!(
                w[0].to_total_order() < w[1].to_total_order(),
                "{} should order before {}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn test_key_bit_patterns() {
        assert_eq!(0.0_f64.to_total_order(), 1 << 63);
        assert_eq!((-0.0_f64).to_total_order(), (1 << 63) - 1);
        assert_eq!(f64::INFINITY.to_total_order(), f64::INFINITY.to_bits() | (1 << 63));
        assert_eq!(f64::NEG_INFINITY.to_total_order(), !f64::NEG_INFINITY.to_bits());
    }

    #[test]
    fn test_total_order_roundtrip_f64() {
        let values = vec![
            0.0,
            -0.0,
            1.0,
            -1.0,
            999999999.125,
            f64::MIN,
            f64::MAX,
            f64::INFINITY,
            f64::NEG_INFINITY,
            -f64::NAN,
            f64::NAN,
            f64::EPSILON,
            -f64::MIN_POSITIVE / 2.0,
        ];
        let total_order = values.iter().map(|f| f.to_total_order()).collect::<Vec<_>>();
        let roundtrip = total_order
            .iter()
            .map(|u| f64::from_total_order(*u))
            .collect::<Vec<_>>();

        for (left, right) in values.iter().zip(roundtrip.iter()) {
            assert_eq!(
                left.to_bits(),
                right.to_bits(),
                "{:064b} != {:064b}",
                left.to_bits(),
                right.to_bits()
            );
        }
    }

    #[test]
    fn test_decode_every_high_and_low_pattern() {
        for key in [0, 1, (1 << 63) - 1, 1 << 63, u64::MAX] {
            assert_eq!(f64::from_total_order(key).to_total_order(), key);
        }
    }

    #[test]
    fn test_encode_decode_slices_agree() {
        let values = (0..5000).map(|i| (i as f64 - 2500.0) * 0.37).collect::<Vec<_>>();

        let mut seq_keys = Vec::new();
        let mut par_keys = Vec::new();
        encode_keys(&values, &mut seq_keys, false);
        encode_keys(&values, &mut par_keys, true);
        assert_eq!(seq_keys, par_keys);

        let mut decoded = vec![0.0; values.len()];
        decode_keys(&par_keys, &mut decoded, true);
        assert_eq!(decoded, values);
    }
}
