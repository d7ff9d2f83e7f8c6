//! # dpsort
//!
//! dpsort is a data-parallel, stable LSD radix sort engine. It models an
//! accelerator made of groups of lock-step lanes sharing fast scratch memory,
//! and sorts keys (optionally with a payload per key) with one of three
//! strategies picked by input size:
//!
//!  * **single group**: everything fits in one group's scratch memory;
//!  * **cooperative**: a bounded number of groups, all resident at once,
//!    synchronizing through an emulated device-wide barrier;
//!  * **onesweep**: any number of groups, one global histogram pass, then one
//!    scatter per digit stage using decoupled look-back between groups.
//!
//! ## Usage
//!
//! In the simplest case, you can use this sort by simply calling `my_vec.radix_sort()`.
//!
//! ```
//! use dpsort::RadixSort;
//!
//! let mut data = vec![5u32, 3, 1, 4, 2];
//! data.radix_sort().unwrap();
//! assert_eq!(data, vec![1, 2, 3, 4, 5]);
//! ```
//!
//! Sorting a payload along with the keys, in descending order:
//!
//! ```
//! use dpsort::RadixSort;
//!
//! let mut keys = vec![5u32, 3, 1, 4, 2];
//! let mut values = vec!["e", "c", "a", "d", "b"];
//! keys.radix_sort_builder()
//!     .with_values(&mut values)
//!     .descending()
//!     .sort()
//!     .unwrap();
//!
//! assert_eq!(keys, vec![5, 4, 3, 2, 1]);
//! assert_eq!(values, vec!["e", "d", "c", "b", "a"]);
//! ```
//!
//! ## Default Implementations
//!
//! `RadixKey` is implemented for the following types out-of-the-box:
//!
//!  * `u8`, `u16`, `u32`, `u64`, `u128`, `usize`
//!  * `i8`, `i16`, `i32`, `i64`, `i128`, `isize`
//!  * `f32`, `f64` (`-NaN` first, `+NaN` last)
//!  * `bool`
//!
//! ### Implementing `RadixKey`
//!
//! To be able to sort custom types, implement `RadixKey` by mapping the key to
//! an unsigned integer whose unsigned ordering matches the ordering you want.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: the chosen plan at `debug`, stage
//! progress at `trace`, and bounded waits that gave up at `warn`.

mod counts;
pub mod device;
mod error;
mod global_sync;
mod group_scan;
mod lookback;
mod radix_key;
mod radix_key_impl;
mod radix_sort_builder;
mod ranker;
mod sorter;
mod sorts;
pub mod tuner;
pub mod tuners;
mod tuning_parameters;
mod utils;

pub use counts::{exclusive_scan, Counts};
pub use error::SortError;
pub use radix_key::{stage_count, RadixBits, RadixKey, SortOrder};
pub use radix_sort_builder::RadixSortBuilder;
pub use ranker::RankMethod;
pub use sorter::SortReport;
pub use tuner::{Plan, Strategy, Tuner, TuningParams};
pub use tuning_parameters::TuningParameters;

pub trait RadixSort<K> {
    /// Sort ascending in place.
    fn radix_sort(&mut self) -> Result<SortReport, SortError>;

    /// Sort descending in place.
    fn radix_sort_descending(&mut self) -> Result<SortReport, SortError>;

    /// Configure the sort before running it.
    fn radix_sort_builder(&mut self) -> RadixSortBuilder<'_, K>;
}

impl<K> RadixSort<K> for [K]
where
    K: RadixKey + Send + Sync,
{
    fn radix_sort(&mut self) -> Result<SortReport, SortError> {
        self.radix_sort_builder().sort()
    }

    fn radix_sort_descending(&mut self) -> Result<SortReport, SortError> {
        self.radix_sort_builder().descending().sort()
    }

    fn radix_sort_builder(&mut self) -> RadixSortBuilder<'_, K> {
        RadixSortBuilder::new(self)
    }
}

/// Sort `keys` in place and move `values` along with them.
pub fn sort_by_key<K, V>(keys: &mut [K], values: &mut [V], order: SortOrder) -> Result<SortReport, SortError>
where
    K: RadixKey + Send + Sync,
    V: Copy + Send + Sync,
{
    keys.radix_sort_builder()
        .with_values(values)
        .with_order(order)
        .sort()
}
