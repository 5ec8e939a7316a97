use crate::{
    decode_keys, encode_keys, odd_even_merge_sort, pad_to_power_of_two, sort_keys_radix, truncate, Pipeline,
    SortConfig, SortError,
};
use log::debug;
use rayon::prelude::*;

/// Sorts `f64` slices according to a [`SortConfig`], optionally on a dedicated thread pool.
pub struct HybridSorter {
    config: SortConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Default for HybridSorter {
    fn default() -> Self {
        Self {
            config: SortConfig::default(),
            pool: None,
        }
    }
}

impl HybridSorter {
    pub fn new(config: SortConfig) -> Result<Self, SortError> {
        let pool = match config.threads() {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Sort `values` in place: ascending, NaNs last.
    pub fn sort(&self, values: &mut [f64]) {
        match &self.pool {
            Some(pool) => pool.install(|| sort_with(values, &self.config)),
            None => sort_with(values, &self.config),
        }
    }

    /// Write the sorted contents of `input` to `output`, which must have the same length.
    pub fn sort_into(&self, input: &[f64], output: &mut [f64]) -> Result<(), SortError> {
        check_lengths(input, output)?;
        output.copy_from_slice(input);
        self.sort(output);
        Ok(())
    }
}

fn check_lengths(input: &[f64], output: &[f64]) -> Result<(), SortError> {
    if input.len() != output.len() {
        return Err(SortError::LengthMismatch {
            input: input.len(),
            output: output.len(),
        });
    }
    Ok(())
}

/// Sort `values` in place with the default configuration on the global rayon pool.
pub fn sort(values: &mut [f64]) {
    sort_with(values, &SortConfig::default());
}

/// Sorted copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut output = values.to_vec();
    sort(&mut output);
    output
}

/// Write the sorted contents of `input` to the equally long `output`.
pub fn sort_into(input: &[f64], output: &mut [f64]) -> Result<(), SortError> {
    check_lengths(input, output)?;
    output.copy_from_slice(input);
    sort(output);
    Ok(())
}

/// Sort `values` in place with an explicit configuration, ignoring its thread count.
///
/// Non-NaN values end up in ascending order, followed by every NaN of the input.
pub fn sort_with(values: &mut [f64], config: &SortConfig) {
    let len = values.len();
    if len <= 1 {
        return;
    }

    let (ordered, nans): (Vec<f64>, Vec<f64>) = if config.is_parallel(len) {
        values.par_iter().partition(|v| !v.is_nan())
    } else {
        values.iter().partition(|v| !v.is_nan())
    };

    debug!(
        "sorting {len} values ({} NaN), {:?} {:?}",
        nans.len(),
        config.strategy(),
        config.pipeline()
    );

    let ordered = if ordered.len() > 1 {
        match config.pipeline() {
            Pipeline::RadixThenNetwork => network_stage(radix_stage(ordered, config), config),
            Pipeline::RadixOnly => radix_stage(ordered, config),
            Pipeline::NetworkOnly => network_stage(ordered, config),
        }
    } else {
        ordered
    };

    let (head, tail) = values.split_at_mut(ordered.len());
    head.copy_from_slice(&ordered);
    tail.copy_from_slice(&nans);
}

/// encode -> 8 LSD passes -> decode
fn radix_stage(mut values: Vec<f64>, config: &SortConfig) -> Vec<f64> {
    let parallel = config.is_parallel(values.len());
    let mut keys = Vec::with_capacity(values.len());
    encode_keys(&values, &mut keys, parallel);
    let keys = sort_keys_radix(keys, config);
    decode_keys(&keys, &mut values, parallel);
    values
}

/// pad -> merge network -> truncate
fn network_stage(mut values: Vec<f64>, config: &SortConfig) -> Vec<f64> {
    let len = pad_to_power_of_two(&mut values);
    debug!("merge network over {} slots for {len} values", values.len());
    odd_even_merge_sort(&mut values, config);
    truncate(&mut values, len);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Strategy;

    fn all_configs() -> Vec<SortConfig> {
        let mut configs = Vec::new();
        for pipeline in [Pipeline::RadixThenNetwork, Pipeline::RadixOnly, Pipeline::NetworkOnly] {
            configs.push(SortConfig::sequential().with_pipeline(pipeline));
            configs.push(
                SortConfig::default()
                    .with_strategy(Strategy::Parallel)
                    .with_pipeline(pipeline)
                    .with_parallel_threshold(0)
                    .with_network_grain(4),
            );
        }
        configs
    }

    #[test]
    fn test_mixed_values() {
        for config in all_configs() {
            let mut values = vec![3.0, -1.0, 0.0, -0.0, 2.5, -10.0, 2.5];
            sort_with(&mut values, &config);
            assert_eq!(values, vec![-10.0, -1.0, 0.0, 0.0, 2.5, 2.5, 3.0], "{config:?}");
        }
    }

    #[test]
    fn test_signed_zero_order() {
        for config in all_configs() {
            let mut values = vec![0.0, -0.0];
            sort_with(&mut values, &config);
            assert_eq!(values, vec![0.0, 0.0], "{config:?}");
            if config.pipeline() == Pipeline::NetworkOnly {
                // the network compares with `>`, equal zeros keep their input order
                assert!(values[0].is_sign_positive(), "{config:?}");
            } else {
                assert!(values[0].is_sign_negative(), "{config:?}");
                assert!(values[1].is_sign_positive(), "{config:?}");
            }
        }
    }

    #[test]
    fn test_nan_goes_last() {
        for config in all_configs() {
            let mut values = vec![1.0, f64::NAN, -2.0, 0.0];
            sort_with(&mut values, &config);
            assert_eq!(&values[..3], &[-2.0, 0.0, 1.0], "{config:?}");
            assert!(values[3].is_nan());
        }
    }

    #[test]
    fn test_only_nans() {
        let mut values = vec![f64::NAN, -f64::NAN, f64::NAN];
        sort(&mut values);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_single_value_and_nan() {
        let mut values = vec![f64::NAN, 5.0];
        sort(&mut values);
        assert_eq!(values[0], 5.0);
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_sort_into_length_mismatch() {
        let mut output = [0.0; 2];
        let err = sort_into(&[1.0, 2.0, 3.0], &mut output).unwrap_err();
        assert!(matches!(err, SortError::LengthMismatch { input: 3, output: 2 }));
        assert_eq!(err.to_string(), "output length 2 does not match input length 3");
    }

    #[test]
    fn test_sort_into_leaves_input() {
        let input = [2.0, 1.0, f64::NEG_INFINITY];
        let mut output = [0.0; 3];
        HybridSorter::default().sort_into(&input, &mut output).unwrap();
        assert_eq!(output, [f64::NEG_INFINITY, 1.0, 2.0]);
        assert_eq!(input, [2.0, 1.0, f64::NEG_INFINITY]);
    }

    #[test]
    fn test_sorted_copy() {
        assert_eq!(
            sorted(&[f64::INFINITY, f64::NEG_INFINITY, 0.0, 1.0]),
            vec![f64::NEG_INFINITY, 0.0, 1.0, f64::INFINITY]
        );
    }
}
