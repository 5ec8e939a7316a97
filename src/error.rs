use thiserror::Error;

/// Errors returned by the flat-buffer entry points and sorter construction.
#[derive(Debug, Error)]
pub enum SortError {
    /// The output buffer does not have the same length as the input.
    #[error("output length {output} does not match input length {input}")]
    LengthMismatch { input: usize, output: usize },
    /// A dedicated thread pool could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
