//! `single_group_sort` sorts the whole input with one group. Every digit stage
//! is ranked and scanned inside the group and the result reordered through
//! group scratch memory; only the final stage writes to the caller's buffer.
//!
//! ## Characteristics
//!
//!  * out-of-place (group scratch)
//!  * one group, no cross-group synchronization
//!  * stable
//!  * lsb-first
//!
//! ## Performance
//!
//! Limited to `lanes_per_group * 256` elements. Best for small inputs where
//! launching more than one group costs more than it saves.

use std::mem::MaybeUninit;

use log::trace;

use crate::counts::exclusive_scan;
use crate::device::Workgroup;
use crate::error::SortError;
use crate::group_scan::{rank_group, with_group_scratch};
use crate::radix_key::{stage_count, RadixBits};
use crate::sorter::Sorter;
use crate::tuner::Plan;
use crate::utils::{slice_assume_init, try_alloc_uninit, try_copy};
use crate::{RadixKey, SortOrder};

impl<'a> Sorter<'a> {
    pub(crate) fn single_group_sort_adapter<K, V>(
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
        let bins = self.bins();

        debug_assert!(n <= plan.block_size());

        // Registers hold the keys of the current stage, scratch receives the
        // reordered keys of every stage but the last.
        let mut reg_keys = try_copy(keys)?;
        let mut reg_values = try_copy(values)?;
        let mut scratch_keys = try_alloc_uninit::<K>(n)?;
        let mut scratch_values = try_alloc_uninit::<V>(n)?;

        with_group_scratch(|scratch| {
            let mut wg = Workgroup::new(0, plan.lanes);

            for stage in 0..stages {
                trace!("single group: stage {}", stage);

                if stage > 0 {
                    // Safety: the previous stage scattered every key to a
                    // distinct position in 0..n.
                    unsafe {
                        reg_keys.copy_from_slice(slice_assume_init(&scratch_keys));
                        reg_values.copy_from_slice(slice_assume_init(&scratch_values));
                    }
                }

                scratch.prepare(plan.lanes, plan.process_size);
                scratch.load_digits(&reg_keys, order, stage, radix_bits);
                rank_group(&mut wg, scratch, method, radix_bits);

                let bases = exclusive_scan(scratch.totals(), bins, 0);
                let last = stage == stages - 1;

                for (i, (k, v)) in reg_keys.iter().zip(reg_values.iter()).enumerate() {
                    let addr = bases[scratch.digit(i)] + scratch.local_offset(i);

                    if last {
                        keys[addr] = *k;
                        values[addr] = *v;
                    } else {
                        scratch_keys[addr] = MaybeUninit::new(*k);
                        scratch_values[addr] = MaybeUninit::new(*v);
                    }
                }
            }
        });

        Ok(0)
    }
}
