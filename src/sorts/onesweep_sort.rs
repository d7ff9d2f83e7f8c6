//! `onesweep_sort` is a multi-threaded LSD radix sort that moves every element
//! exactly once per digit stage, without any device-wide barrier inside a stage.
//!
//! A single histogram pass over the input counts the digits of every stage at
//! once. Each stage's histogram is scanned into global bin bases. Then, per
//! stage, groups claim block ids in order from a job queue, rank and scan their
//! block locally, and learn how many keys earlier groups put in each bin via
//! decoupled look-back. Every element is then written straight to its final
//! position for that stage. Stages alternate between the caller's buffer and an
//! alternate buffer, with a copy back at the end if the stage count is odd.
//!
//! ## Characteristics
//!
//!  * out-of-place
//!  * multi-threaded
//!  * stable
//!  * lsb-first
//!
//! ## Performance
//!
//! Groups never wait on all other groups, only on their predecessors, so any
//! number of groups can be run on a fixed set of workers. This is the strategy
//! for large inputs.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use crate::counts::{exclusive_scan, stage_counts, Counts};
use crate::device::{dispatch_ordered, SharedSlice, Workgroup};
use crate::error::SortError;
use crate::group_scan::{rank_group, with_group_scratch};
use crate::lookback::LookbackTable;
use crate::radix_key::{stage_count, RadixBits};
use crate::sorter::Sorter;
use crate::tuner::Plan;
use crate::utils::{copy_back, try_alloc_with, try_copy};
use crate::{RadixKey, SortOrder};

impl<'a> Sorter<'a> {
    /// Per-stage exclusive bin bases of the whole input.
    pub(crate) fn global_bases<K>(&self, keys: &[K], order: SortOrder, plan: &Plan) -> Result<Vec<Counts>, SortError>
    where
        K: RadixKey + Send + Sync,
    {
        let n = keys.len();
        let radix_bits = self.params.radix_bits;
        let stages = stage_count(K::Bits::BITS, radix_bits);
        let bins = self.bins();
        let block = plan.block_size();

        trace!("onesweep: global histogram");

        let global = try_alloc_with(stages * bins, || AtomicUsize::new(0))?;

        dispatch_ordered(plan.groups, self.params.workers, self.multi_threaded(), |g| {
            let start = g * block;
            let end = (start + block).min(n);
            let local = stage_counts(
                keys[start..end].iter().map(|k| k.ordered_bits(order)),
                stages,
                radix_bits,
            );

            for (stage, counts) in local.iter().enumerate() {
                for b in 0..bins {
                    if counts[b] != 0 {
                        global[stage * bins + b].fetch_add(counts[b], Ordering::Relaxed);
                    }
                }
            }
        });

        trace!("onesweep: global scan");

        Ok((0..stages)
            .map(|stage| {
                let mut counts = Counts::default();
                for b in 0..bins {
                    counts[b] = global[stage * bins + b].load(Ordering::Relaxed);
                }

                exclusive_scan(&counts, bins, 0)
            })
            .collect())
    }

    pub(crate) fn onesweep_sort_adapter<K, V>(
        &self,
        keys: &mut [K],
        values: &mut [V],
        order: SortOrder,
        plan: &Plan,
    ) -> Result<usize, SortError>
    where
        K: RadixKey + Send + Sync,
        V: Copy + Send + Sync,
    {
        let n = keys.len();
        let radix_bits = self.params.radix_bits;
        let method = self.params.rank_method;
        let stages = stage_count(K::Bits::BITS, radix_bits);
        let block = plan.block_size();

        let table = LookbackTable::new(stages, plan.groups, self.bins(), self.params.retry_limit)?;
        // A stale wait can leave slots of a stage unwritten, so the alternate
        // buffers start out holding valid keys.
        let mut alt_key_buf = try_copy(keys)?;
        let mut alt_value_buf = try_copy(values)?;
        let bases = self.global_bases(keys, order, plan)?;

        {
            let buffers = [
                (SharedSlice::new(&mut *keys), SharedSlice::new(&mut *values)),
                (SharedSlice::new(&mut alt_key_buf), SharedSlice::new(&mut alt_value_buf)),
            ];

            for (stage, stage_base) in bases.iter().enumerate() {
                trace!("onesweep: stage {}", stage);

                let (src_keys, src_values) = &buffers[stage % 2];
                let (dst_keys, dst_values) = &buffers[(stage + 1) % 2];

                dispatch_ordered(plan.groups, self.params.workers, self.multi_threaded(), |g| {
                    let start = g * block;
                    let len = block.min(n - start);

                    // Safety: nothing writes the source buffer during this stage.
                    let (block_keys, block_values) =
                        unsafe { (src_keys.slice(start, len), src_values.slice(start, len)) };

                    with_group_scratch(|scratch| {
                        let mut wg = Workgroup::new(g, plan.lanes);
                        let mut group_base = Counts::default();

                        scratch.prepare(plan.lanes, plan.process_size);
                        scratch.load_digits(block_keys, order, stage, radix_bits);
                        rank_group(&mut wg, scratch, method, radix_bits);

                        table.publish_raw(stage, g, scratch.totals());
                        table.lookback(stage, g, scratch.totals(), stage_base, &mut group_base);

                        for (i, (k, v)) in block_keys.iter().zip(block_values.iter()).enumerate() {
                            let addr = group_base[scratch.digit(i)] + scratch.local_offset(i);

                            // Safety: addresses of a stage form a permutation of
                            // the destination buffer.
                            unsafe {
                                dst_keys.scatter(addr, *k);
                                dst_values.scatter(addr, *v);
                            }
                        }
                    });
                });
            }
        }

        if stages % 2 == 1 {
            trace!("onesweep: copy back");

            copy_back(keys, &alt_key_buf, self.multi_threaded());
            copy_back(values, &alt_value_buf, self.multi_threaded());
        }

        Ok(table.stale_waits())
    }
}
