//! Group-level ranking: every lane ranks its own slots, then a hierarchical
//! scan across lanes turns the per-lane histograms into per-lane bin prefixes
//! and per-group bin totals.
//!
//! A group's block is laid out lane-major: lane `l` owns slots
//! `l * process_size..(l + 1) * process_size`. Slots past the end of the input
//! are padded with the sort identity, which ranks after every real key.

use std::cell::RefCell;

use crate::counts::Counts;
use crate::device::Workgroup;
use crate::radix_key::RadixBits;
use crate::ranker::{rank_lane, RankMethod};
use crate::{RadixKey, SortOrder};

/// Lanes per sub-group of the hierarchical scan.
pub const SUBGROUP_SIZE: usize = 8;

/// Group-local memory, reused by every group a worker runs.
#[derive(Default)]
pub struct GroupScratch {
    pub(crate) digits: Vec<u8>,
    pub(crate) ranks: Vec<u32>,
    pub(crate) lane_hists: Vec<Counts>,
    pub(crate) subgroup_carries: Vec<Counts>,
    pub(crate) totals: Counts,
    process_size: usize,
}

thread_local! {
    static GROUP_SCRATCH: RefCell<GroupScratch> = RefCell::new(GroupScratch::default());
}

/// Run `f` with the calling worker's group scratch.
pub fn with_group_scratch<R, F>(f: F) -> R
where
    F: FnOnce(&mut GroupScratch) -> R,
{
    GROUP_SCRATCH.with(|s| match s.try_borrow_mut() {
        Ok(mut s) => f(&mut s),
        Err(_) => f(&mut GroupScratch::default()),
    })
}

impl GroupScratch {
    pub fn prepare(&mut self, lanes: usize, process_size: usize) {
        let slots = lanes * process_size;

        self.process_size = process_size;
        self.digits.resize(slots, 0);
        self.ranks.resize(slots, 0);
        self.lane_hists.resize(lanes, Counts::default());
        self.lane_hists.iter_mut().for_each(|h| h.clear());
        self.subgroup_carries
            .resize(lanes.div_ceil(SUBGROUP_SIZE), Counts::default());
        self.totals.clear();
    }

    /// Load the stage digits of `keys` into the first slots and pad the rest
    /// with the digit of the sort identity.
    pub fn load_digits<K: RadixKey>(&mut self, keys: &[K], order: SortOrder, stage: usize, radix_bits: u32) {
        let (real, padding) = self.digits.split_at_mut(keys.len());

        for (d, k) in real.iter_mut().zip(keys.iter()) {
            *d = k.ordered_bits(order).digit(stage, radix_bits);
        }

        padding.fill(K::Bits::SORT_IDENTITY.digit(stage, radix_bits));
    }

    /// Position of `slot` relative to the group's base for its bin.
    #[inline]
    pub fn local_offset(&self, slot: usize) -> usize {
        let lane = slot / self.process_size;
        let b = self.digits[slot] as usize;

        self.lane_hists[lane][b] + self.ranks[slot] as usize
    }

    #[inline]
    pub fn digit(&self, slot: usize) -> usize {
        self.digits[slot] as usize
    }

    #[inline]
    pub fn totals(&self) -> &Counts {
        &self.totals
    }
}

/// Rank every slot of the group and scan the lane histograms. Expects
/// [`GroupScratch::prepare`] and [`GroupScratch::load_digits`] to have run.
pub fn rank_group(wg: &mut Workgroup, scratch: &mut GroupScratch, method: RankMethod, radix_bits: u32) {
    let p = scratch.process_size;
    let bins = 1usize << radix_bits;

    for ((digits, ranks), hist) in scratch
        .digits
        .chunks(p)
        .zip(scratch.ranks.chunks_mut(p))
        .zip(scratch.lane_hists.iter_mut())
    {
        rank_lane(method, digits, radix_bits, ranks, hist);
    }

    group_scan(
        wg,
        &mut scratch.lane_hists,
        &mut scratch.subgroup_carries,
        bins,
        &mut scratch.totals,
    );
}

/// Turn each lane's histogram into that lane's exclusive per-bin prefix across
/// the group and write the per-bin group totals into `totals`.
///
/// Lanes are scanned in sub-groups of [`SUBGROUP_SIZE`]. The sub-group totals
/// are then scanned sequentially and the resulting carries broadcast to every
/// lane. Uses exactly two group barriers.
pub fn group_scan(
    wg: &mut Workgroup,
    lane_hists: &mut [Counts],
    subgroup_carries: &mut [Counts],
    bins: usize,
    totals: &mut Counts,
) {
    // Lane histograms are visible to the whole group.
    wg.barrier();

    // Running sums within each sub-group.
    for subgroup in lane_hists.chunks_mut(SUBGROUP_SIZE) {
        for l in 1..subgroup.len() {
            for b in 0..bins {
                subgroup[l][b] += subgroup[l - 1][b];
            }
        }
    }

    // Sequential scan over sub-group totals.
    totals.clear();
    for (subgroup, carry) in lane_hists
        .chunks(SUBGROUP_SIZE)
        .zip(subgroup_carries.iter_mut())
    {
        let last = &subgroup[subgroup.len() - 1];
        for b in 0..bins {
            carry[b] = totals[b];
            totals[b] += last[b];
        }
    }

    wg.barrier();

    for (subgroup, carry) in lane_hists
        .chunks_mut(SUBGROUP_SIZE)
        .zip(subgroup_carries.iter())
    {
        for l in (0..subgroup.len()).rev() {
            for b in 0..bins {
                subgroup[l][b] = if l == 0 {
                    carry[b]
                } else {
                    carry[b] + subgroup[l - 1][b]
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    fn reference_scan(hists: &[Counts], bins: usize) -> (Vec<Counts>, Counts) {
        let mut prefixes = Vec::new();
        let mut running = Counts::default();

        for h in hists {
            prefixes.push(running.clone());
            for b in 0..bins {
                running[b] += h[b];
            }
        }

        (prefixes, running)
    }

    #[test]
    pub fn test_group_scan_matches_sequential() {
        let mut rng = thread_rng();

        for lanes in [1usize, 3, 8, 9, 17, 64] {
            let bins = 16;
            let mut hists: Vec<Counts> = (0..lanes)
                .map(|_| {
                    let mut c = Counts::default();
                    for b in 0..bins {
                        c[b] = rng.gen_range(0..50);
                    }
                    c
                })
                .collect();
            let (expected_prefixes, expected_totals) = reference_scan(&hists, bins);

            let mut wg = Workgroup::new(0, lanes);
            let mut carries = vec![Counts::default(); lanes.div_ceil(SUBGROUP_SIZE)];
            let mut totals = Counts::default();
            group_scan(&mut wg, &mut hists, &mut carries, bins, &mut totals);

            assert_eq!(hists, expected_prefixes, "lanes {}", lanes);
            assert_eq!(totals, expected_totals);
        }
    }

    #[test]
    pub fn test_group_scan_uses_two_barriers() {
        let mut wg = Workgroup::new(0, 16);
        let mut hists = vec![Counts::default(); 16];
        let mut carries = vec![Counts::default(); 2];
        let mut totals = Counts::default();

        group_scan(&mut wg, &mut hists, &mut carries, 256, &mut totals);

        assert_eq!(wg.barriers(), 2);
    }

    #[test]
    pub fn test_rank_group_offsets_form_a_stable_permutation() {
        let lanes = 4;
        let p = 8;
        let keys: Vec<u32> = vec![
            5, 3, 5, 1, 0, 0, 9, 3, 5, 1, 1, 1, 2, 2, 7, 7, 3, 3, 3, 0, 8, 5, 5, 4, 6,
        ];

        let mut wg = Workgroup::new(0, lanes);
        let mut scratch = GroupScratch::default();
        scratch.prepare(lanes, p);
        scratch.load_digits(&keys, SortOrder::Ascending, 0, 8);
        rank_group(&mut wg, &mut scratch, RankMethod::Match, 8);

        let bases = crate::counts::exclusive_scan(scratch.totals(), 256, 0);
        let mut out = vec![u32::MAX; keys.len()];
        for (slot, k) in keys.iter().enumerate() {
            let addr = bases[scratch.digit(slot)] + scratch.local_offset(slot);
            out[addr] = *k;
        }

        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(out, expected);

        // Padding ranks after every real key
        assert_eq!(scratch.totals()[255], lanes * p - keys.len());
    }
}
