//! Stable ranking of the digits resident in a single lane.
//!
//! For each slot the rank is the number of earlier slots in the same lane that
//! carry the same digit. Two methods are available and produce identical
//! output:
//!
//!  * `Counter` walks the slots in order and increments a per-bin counter.
//!  * `Match` processes slots in batches of 32. Per digit bit a ballot of the
//!    batch is formed; the peers of a slot are the AND of the ballots (or their
//!    complements) over all bits. The rank is the bin counter plus the number
//!    of lower peers, and the highest peer advances the counter for the batch.

use crate::counts::Counts;

const MATCH_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum RankMethod {
    #[default]
    Counter,
    Match,
}

/// Rank `digits` into `ranks` and accumulate per-bin totals into `hist`.
/// `hist` must be cleared by the caller.
#[inline]
pub fn rank_lane(method: RankMethod, digits: &[u8], radix_bits: u32, ranks: &mut [u32], hist: &mut Counts) {
    debug_assert_eq!(digits.len(), ranks.len());

    match method {
        RankMethod::Counter => rank_counter(digits, ranks, hist),
        RankMethod::Match => rank_match(digits, radix_bits, ranks, hist),
    }
}

#[inline]
fn rank_counter(digits: &[u8], ranks: &mut [u32], hist: &mut Counts) {
    for (d, r) in digits.iter().zip(ranks.iter_mut()) {
        let b = *d as usize;
        *r = hist[b] as u32;
        hist[b] += 1;
    }
}

fn rank_match(digits: &[u8], radix_bits: u32, ranks: &mut [u32], hist: &mut Counts) {
    let mut ballots = [0u32; 8];
    let mut peers = [0u32; MATCH_WIDTH];

    for (batch, batch_ranks) in digits.chunks(MATCH_WIDTH).zip(ranks.chunks_mut(MATCH_WIDTH)) {
        let active = if batch.len() == MATCH_WIDTH {
            u32::MAX
        } else {
            (1u32 << batch.len()) - 1
        };

        for (bit, ballot) in ballots.iter_mut().enumerate().take(radix_bits as usize) {
            *ballot = 0;
            for (lane, d) in batch.iter().enumerate() {
                *ballot |= (((*d >> bit) & 1) as u32) << lane;
            }
        }

        for (lane, d) in batch.iter().enumerate() {
            let mut matched = active;
            for (bit, ballot) in ballots.iter().enumerate().take(radix_bits as usize) {
                if (*d >> bit) & 1 == 1 {
                    matched &= ballot;
                } else {
                    matched &= !ballot;
                }
            }
            peers[lane] = matched;
        }

        // All lanes read the counter before any leader updates it.
        for (lane, d) in batch.iter().enumerate() {
            let lower = peers[lane] & ((1u32 << lane) - 1);
            batch_ranks[lane] = hist[*d as usize] as u32 + lower.count_ones();
        }

        for (lane, d) in batch.iter().enumerate() {
            let leader = 31 - peers[lane].leading_zeros() as usize;
            if leader == lane {
                hist[*d as usize] += peers[lane].count_ones() as usize;
            }
        }
    }
}
