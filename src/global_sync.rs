//! Emulated device-wide barrier for groups that are all resident at once.
//!
//! Each stage has two sync points. The histogram exchange has every group
//! publish its per-bin totals and increment an arrival counter; the last group
//! to arrive aggregates all totals into each group's global scatter base and
//! raises the stage's published flag, which the other groups poll. The scatter
//! rendezvous is a plain arrival barrier separating the scatter of one stage
//! from the reload of the next.
//!
//! Counters are never reset: every sync point is used exactly once per sort.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::warn;

use crate::counts::{exclusive_scan, Counts};
use crate::device::spin_until;
use crate::error::SortError;
use crate::utils::try_alloc_with;

const SYNC_POINTS_PER_STAGE: usize = 2;

pub struct GlobalSync {
    groups: usize,
    bins: usize,
    retry_limit: usize,
    group_totals: Vec<AtomicUsize>,
    offsets: Vec<AtomicUsize>,
    arrivals: Vec<AtomicUsize>,
    published: Vec<AtomicBool>,
    stale: AtomicUsize,
}

impl GlobalSync {
    pub fn new(stages: usize, groups: usize, bins: usize, retry_limit: usize) -> Result<Self, SortError> {
        let slots = stages * groups * bins;

        Ok(Self {
            groups,
            bins,
            retry_limit,
            group_totals: try_alloc_with(slots, || AtomicUsize::new(0))?,
            offsets: try_alloc_with(slots, || AtomicUsize::new(0))?,
            arrivals: try_alloc_with(stages * SYNC_POINTS_PER_STAGE, || AtomicUsize::new(0))?,
            published: try_alloc_with(stages, || AtomicBool::new(false))?,
            stale: AtomicUsize::new(0),
        })
    }

    #[inline]
    fn row(&self, stage: usize, group: usize) -> usize {
        (stage * self.groups + group) * self.bins
    }

    /// Publish `totals` for `group` and wait until every group's scatter base
    /// for `stage` is known. The base for each bin is written into `out`.
    pub fn exchange(&self, stage: usize, group: usize, totals: &Counts, out: &mut Counts) {
        let row = self.row(stage, group);
        for b in 0..self.bins {
            self.group_totals[row + b].store(totals[b], Ordering::Relaxed);
        }

        let arrived = self.arrivals[stage * SYNC_POINTS_PER_STAGE].fetch_add(1, Ordering::AcqRel) + 1;

        if arrived == self.groups {
            self.aggregate(stage);
            self.published[stage].store(true, Ordering::Release);
        } else {
            let published = &self.published[stage];
            let ready = spin_until(self.retry_limit, || published.load(Ordering::Acquire));

            if !ready {
                self.stale.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "histogram exchange gave up waiting (stage {}, group {})",
                    stage, group
                );
            }
        }

        for b in 0..self.bins {
            out[b] = self.offsets[row + b].load(Ordering::Relaxed);
        }
    }

    /// Wait until every group has reached the scatter rendezvous of `stage`.
    pub fn barrier(&self, stage: usize, group: usize) {
        let arrivals = &self.arrivals[stage * SYNC_POINTS_PER_STAGE + 1];
        arrivals.fetch_add(1, Ordering::AcqRel);

        let ready = spin_until(self.retry_limit, || {
            arrivals.load(Ordering::Acquire) >= self.groups
        });

        if !ready {
            self.stale.fetch_add(1, Ordering::Relaxed);
            warn!("scatter rendezvous gave up waiting (stage {}, group {})", stage, group);
        }
    }

    fn aggregate(&self, stage: usize) {
        let mut global = Counts::default();
        for g in 0..self.groups {
            let row = self.row(stage, g);
            for b in 0..self.bins {
                global[b] += self.group_totals[row + b].load(Ordering::Relaxed);
            }
        }

        let mut running = exclusive_scan(&global, self.bins, 0);
        for g in 0..self.groups {
            let row = self.row(stage, g);
            for b in 0..self.bins {
                self.offsets[row + b].store(running[b], Ordering::Relaxed);
                running[b] += self.group_totals[row + b].load(Ordering::Relaxed);
            }
        }
    }

    pub fn stale_waits(&self) -> usize {
        self.stale.load(Ordering::Relaxed)
    }
}
