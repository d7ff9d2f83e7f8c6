use crate::error::SortError;
use crate::ranker::RankMethod;

/// Knobs for a single sort. Set through `RadixSortBuilder`.
#[derive(Debug, Clone)]
pub struct TuningParameters {
    /// Width of a digit in bits, `1..=8`.
    pub radix_bits: u32,
    /// Lanes per group, `1..=256`.
    pub lanes_per_group: usize,
    /// Slots per lane for onesweep, a multiple of 32 in `32..=512`.
    pub onesweep_process_size: usize,
    /// Upper bound on co-resident groups for the cooperative strategy.
    pub max_cooperative_groups: usize,
    pub rank_method: RankMethod,
    /// Attempts before a cross-group wait gives up and uses a stale value.
    pub retry_limit: usize,
    /// Workers used for ordered dispatch.
    pub workers: usize,
    pub multi_threaded: bool,
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self {
            radix_bits: 8,
            lanes_per_group: 64,
            onesweep_process_size: 256,
            max_cooperative_groups: 16,
            rank_method: RankMethod::Counter,
            retry_limit: 1 << 22,
            workers: Self::default_workers(),
            multi_threaded: cfg!(feature = "multi-threaded"),
        }
    }
}

impl TuningParameters {
    #[cfg(feature = "multi-threaded")]
    fn default_workers() -> usize {
        rayon::current_num_threads()
    }

    #[cfg(not(feature = "multi-threaded"))]
    fn default_workers() -> usize {
        1
    }

    pub fn validate(&self) -> Result<(), SortError> {
        if !(1..=8).contains(&self.radix_bits) {
            return Err(SortError::invalid(
                "radix_bits",
                format!("{} is outside 1..=8", self.radix_bits),
            ));
        }

        if !(1..=256).contains(&self.lanes_per_group) {
            return Err(SortError::invalid(
                "lanes_per_group",
                format!("{} is outside 1..=256", self.lanes_per_group),
            ));
        }

        let p = self.onesweep_process_size;
        if !(32..=512).contains(&p) || p % 32 != 0 {
            return Err(SortError::invalid(
                "onesweep_process_size",
                format!("{} is not a multiple of 32 in 32..=512", p),
            ));
        }

        if self.max_cooperative_groups == 0 {
            return Err(SortError::invalid("max_cooperative_groups", "must be at least 1"));
        }

        if self.workers == 0 {
            return Err(SortError::invalid("workers", "must be at least 1"));
        }

        Ok(())
    }
}
