/// How the stages of a sort are scheduled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Strategy {
    /// Every stage runs on the calling thread.
    Sequential,
    /// Stages fan out over the rayon pool once the input reaches `parallel_threshold`.
    #[default]
    Parallel,
}

/// Which sorting stages run between NaN removal and reattachment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Pipeline {
    /// Radix sort the keys, then run the merge network over the padded result.
    #[default]
    RadixThenNetwork,
    /// Radix sort only.
    RadixOnly,
    /// Merge network only.
    NetworkOnly,
}

/// Sort configuration.
#[derive(Clone, Debug)]
pub struct SortConfig {
    strategy: Strategy,
    pipeline: Pipeline,
    threads: Option<usize>,
    parallel_threshold: usize,
    network_grain: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Parallel,
            pipeline: Pipeline::RadixThenNetwork,
            threads: None,
            parallel_threshold: 16_384,
            network_grain: 2_048,
        }
    }
}

impl SortConfig {
    /// Shorthand for a fully sequential configuration.
    pub fn sequential() -> Self {
        Self::default().with_strategy(Strategy::Sequential)
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Run sorts on a dedicated rayon pool with `n` threads instead of the global pool.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Inputs shorter than this use the sequential path of each stage (default: 16384).
    pub fn with_parallel_threshold(mut self, n: usize) -> Self {
        self.parallel_threshold = n;
        self
    }

    /// Network sub-problems of at most this many elements are not forked (default: 2048).
    /// Clamped to at least 2.
    pub fn with_network_grain(mut self, n: usize) -> Self {
        self.network_grain = n.max(2);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn network_grain(&self) -> usize {
        self.network_grain
    }

    /// Whether a stage over `len` elements should take its parallel path.
    #[inline]
    pub(crate) fn is_parallel(&self, len: usize) -> bool {
        self.strategy == Strategy::Parallel && len >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SortConfig::default();
        assert_eq!(cfg.strategy(), Strategy::Parallel);
        assert_eq!(cfg.pipeline(), Pipeline::RadixThenNetwork);
        assert_eq!(cfg.threads(), None);
        assert!(cfg.is_parallel(cfg.parallel_threshold()));
        assert!(!cfg.is_parallel(cfg.parallel_threshold() - 1));
    }

    #[test]
    fn test_sequential_never_parallel() {
        let cfg = SortConfig::sequential().with_parallel_threshold(0);
        assert!(!cfg.is_parallel(1 << 20));
    }

    #[test]
    fn test_network_grain_clamped() {
        assert_eq!(SortConfig::default().with_network_grain(0).network_grain(), 2);
    }
}
