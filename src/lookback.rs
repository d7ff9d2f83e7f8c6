//! Decoupled look-back: a group obtains the sum of all earlier groups'
//! per-bin totals without a device-wide barrier.
//!
//! Every (stage, group, bin) owns one slot packing a readiness tag and a
//! value. A group first publishes its own total tagged `RAW`, then walks back
//! over its predecessors: raw values are accumulated and the walk continues,
//! a `PREFIX` value already includes everything before it and ends the walk.
//! Finally the group republishes `PREFIX` with its own total added. Group 0
//! takes the stage base directly and never waits.
//!
//! Waits are bounded by the retry limit. On exhaustion the value accumulated
//! so far is used as is; the event is counted and logged.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use log::warn;

use crate::counts::Counts;
use crate::device::spin_until;
use crate::error::SortError;
use crate::utils::try_alloc_with;

const RAW: u64 = 1 << 62;
const PREFIX: u64 = 1 << 63;
const TAG_MASK: u64 = RAW | PREFIX;
const VALUE_MASK: u64 = !TAG_MASK;

pub struct LookbackTable {
    groups: usize,
    bins: usize,
    slots: Vec<AtomicU64>,
    retry_limit: usize,
    stale: AtomicUsize,
}

impl LookbackTable {
    pub fn new(stages: usize, groups: usize, bins: usize, retry_limit: usize) -> Result<Self, SortError> {
        let slots = try_alloc_with(stages * groups * bins, || AtomicU64::new(0))?;

        Ok(Self {
            groups,
            bins,
            slots,
            retry_limit,
            stale: AtomicUsize::new(0),
        })
    }

    #[inline]
    fn slot(&self, stage: usize, group: usize, bin: usize) -> &AtomicU64 {
        &self.slots[(stage * self.groups + group) * self.bins + bin]
    }

    pub fn publish_raw(&self, stage: usize, group: usize, totals: &Counts) {
        for b in 0..self.bins {
            self.slot(stage, group, b)
                .store(RAW | totals[b] as u64, Ordering::Release);
        }
    }

    /// Compute into `out` the exclusive prefix of `group` for every bin, seeded
    /// with `base`, and publish the group's inclusive prefix.
    pub fn lookback(&self, stage: usize, group: usize, totals: &Counts, base: &Counts, out: &mut Counts) {
        for b in 0..self.bins {
            let mut acc = 0u64;
            let mut p = group;

            loop {
                if p == 0 {
                    acc += base[b] as u64;
                    break;
                }
                p -= 1;

                let slot = self.slot(stage, p, b);
                let mut observed = 0u64;
                let ready = spin_until(self.retry_limit, || {
                    observed = slot.load(Ordering::Acquire);
                    observed & TAG_MASK != 0
                });

                if !ready {
                    self.stale.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "look-back gave up waiting on group {} (stage {}, group {}, bin {})",
                        p, stage, group, b
                    );
                    break;
                }

                acc += observed & VALUE_MASK;
                if observed & PREFIX != 0 {
                    break;
                }
            }

            out[b] = acc as usize;
            self.slot(stage, group, b)
                .store(PREFIX | (acc + totals[b] as u64), Ordering::Release);
        }
    }

    pub fn stale_waits(&self) -> usize {
        self.stale.load(Ordering::Relaxed)
    }
}
