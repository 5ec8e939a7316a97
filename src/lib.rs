//! Total ordering of `f64` slices by a hybrid of LSD radix sort over order-preserving integer keys and
//! Batcher's odd-even merge network on a power-of-two padded copy.
//!
//! NaNs never enter either stage: they are split off up front and appended after all other values.

mod config;
mod error;
mod network;
mod pad;
mod radix;
mod sort;
mod total_order;

pub use config::*;
pub use error::*;
pub use network::odd_even_merge_sort;
pub use pad::{pad_to_power_of_two, truncate};
pub use radix::{radix_pass, sort_keys_radix};
pub use sort::*;
pub use total_order::*;

// 8 -> 8 passes per u64, one byte per digit
pub(crate) const RADIX_BITS: usize = 8;
pub(crate) const RADIX_HIST_LEN: usize = 1 << RADIX_BITS;
pub(crate) const RADIX_HIST_MASK: u64 = (RADIX_HIST_LEN - 1) as u64;
pub(crate) const HIST_PER_U64: usize = 64_usize.div_ceil(RADIX_BITS);
