//! `cooperative_sort` splits the input into one block per group and runs all
//! groups at the same time. Each group keeps its block in registers for the
//! whole sort. Per stage the groups rank and scan locally, exchange their
//! per-bin totals through an emulated device-wide barrier to learn their global
//! scatter bases, and scatter. Non-final stages scatter into an alternate
//! buffer, meet at a rendezvous, and reload their block from it.
//!
//! ## Characteristics
//!
//!  * out-of-place
//!  * multi-threaded, every group resident at once
//!  * stable
//!  * lsb-first
//!
//! ## Performance
//!
//! Bounded by `max_cooperative_groups`, since each group needs its own thread
//! for the rendezvous to make progress. Cheaper than onesweep for mid-sized
//! inputs as there is no global histogram pass.

use log::trace;

use crate::counts::Counts;
use crate::device::{dispatch_resident, SharedSlice, Workgroup};
use crate::error::SortError;
use crate::global_sync::GlobalSync;
use crate::group_scan::{rank_group, with_group_scratch};
use crate::radix_key::{stage_count, RadixBits};
use crate::sorter::Sorter;
use crate::tuner::Plan;
use crate::utils::try_copy;
use crate::{RadixKey, SortOrder};

impl<'a> Sorter<'a> {
    pub(crate) fn cooperative_sort_adapter<K, V>(
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
        let radix_bits = self.params.radix_bits;
        let method = self.params.rank_method;
        let stages = stage_count(K::Bits::BITS, radix_bits);
        let block = plan.block_size();

        let sync = GlobalSync::new(stages, plan.groups, self.bins(), self.params.retry_limit)?;
        let mut reg_keys = try_copy(keys)?;
        let mut reg_values = try_copy(values)?;
        // A stale wait can leave slots of a stage unwritten, so the alternate
        // buffers start out holding valid keys.
        let mut alt_key_buf = try_copy(keys)?;
        let mut alt_value_buf = try_copy(values)?;

        let registers: Vec<(&mut [K], &mut [V])> = reg_keys
            .chunks_mut(block)
            .zip(reg_values.chunks_mut(block))
            .collect();
        debug_assert_eq!(registers.len(), plan.groups);

        let out_keys = SharedSlice::new(keys);
        let out_values = SharedSlice::new(values);
        let alt_keys = SharedSlice::new(&mut alt_key_buf);
        let alt_values = SharedSlice::new(&mut alt_value_buf);

        dispatch_resident(registers, |g, (block_keys, block_values)| {
            let start = g * block;

            with_group_scratch(|scratch| {
                let mut wg = Workgroup::new(g, plan.lanes);
                let mut bases = Counts::default();

                for stage in 0..stages {
                    trace!("cooperative: group {} stage {}", g, stage);

                    scratch.prepare(plan.lanes, plan.process_size);
                    scratch.load_digits(block_keys, order, stage, radix_bits);
                    rank_group(&mut wg, scratch, method, radix_bits);

                    sync.exchange(stage, g, scratch.totals(), &mut bases);

                    let last = stage == stages - 1;
                    let (dst_keys, dst_values) = if last {
                        (&out_keys, &out_values)
                    } else {
                        (&alt_keys, &alt_values)
                    };

                    for (i, (k, v)) in block_keys.iter().zip(block_values.iter()).enumerate() {
                        let addr = bases[scratch.digit(i)] + scratch.local_offset(i);

                        // Safety: addresses form a permutation across groups, and
                        // every group finished reading this buffer before the
                        // exchange above completed.
                        unsafe {
                            dst_keys.scatter(addr, *k);
                            dst_values.scatter(addr, *v);
                        }
                    }

                    if !last {
                        sync.barrier(stage, g);

                        // Safety: the rendezvous orders every scatter of this
                        // stage before the reload, and nothing writes the
                        // alternate buffer until the next exchange.
                        unsafe {
                            alt_keys.read_into(start, block_keys);
                            alt_values.read_into(start, block_values);
                        }
                    }
                }
            });
        });

        Ok(sync.stale_waits())
    }
}
