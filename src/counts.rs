use std::ops::{Index, IndexMut};
use std::slice::{Iter, SliceIndex};

use crate::radix_key::RadixBits;

/// Per-bin counts for a single digit. Only the first `2^radix_bits` entries
/// are used; the rest stay zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counts([usize; 256]);
pub type PrefixSums = Counts;

impl<I> Index<I> for Counts
where
    I: SliceIndex<[usize]>,
{
    type Output = I::Output;

    #[inline(always)]
    fn index(&self, index: I) -> &I::Output {
        &self.0[index]
    }
}

impl<I> IndexMut<I> for Counts
where
    I: SliceIndex<[usize]>,
{
    #[inline(always)]
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        &mut self.0[index]
    }
}

impl Default for Counts {
    fn default() -> Self {
        Counts([0usize; 256])
    }
}

impl Counts {
    #[inline(always)]
    pub fn clear(&mut self) {
        self.0.fill(0);
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = &'a usize;
    type IntoIter = Iter<'a, usize>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Exclusive prefix sum over the first `bins` entries of `counts`, offset by
/// `base`. Entry `b` of the result is `base + counts[0] + .. + counts[b - 1]`.
#[inline]
pub fn exclusive_scan(counts: &Counts, bins: usize, base: usize) -> PrefixSums {
    let mut sums = Counts::default();

    let mut running_total = base;
    for b in 0..bins {
        sums[b] = running_total;
        running_total += counts[b];
    }

    sums
}

/// Histogram of every digit stage of `bits`, one `Counts` per stage.
pub(crate) fn stage_counts<B>(bits: impl Iterator<Item = B>, stages: usize, radix_bits: u32) -> Vec<Counts>
where
    B: RadixBits,
{
    let mut counts = vec![Counts::default(); stages];

    for v in bits {
        for (stage, c) in counts.iter_mut().enumerate() {
            c[v.digit(stage, radix_bits) as usize] += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_counting() {
        let data: [u16; 5] = [0x0000, 0x0101, 0x0200, 0x0200, 0xFFFF];
        let counts = stage_counts(data.iter().copied(), 2, 8);
        let mut expected_lower = Counts::default();
        let mut expected_upper = Counts::default();
        expected_lower[0] = 3;
        expected_lower[1] = 1;
        expected_lower[255] = 1;

        expected_upper[0] = 1;
        expected_upper[1] = 1;
        expected_upper[2] = 2;
        expected_upper[255] = 1;

        assert_eq!(counts[0], expected_lower);
        assert_eq!(counts[1], expected_upper);
    }

    #[test]
    pub fn test_exclusive_scan() {
        let mut counts = Counts::default();
        counts[0] = 3;
        counts[2] = 4;
        counts[3] = 1;

        let sums = exclusive_scan(&counts, 4, 10);

        assert_eq!(&sums[0..4], &[10, 13, 13, 17]);
        assert_eq!(sums[4], 0);
        assert_eq!(counts.total(), 8);
    }

    #[test]
    pub fn test_narrow_digits() {
        let data: [u8; 4] = [0b0000_0001, 0b0000_0011, 0b1100_0000, 0b0100_0010];
        let counts = stage_counts(data.iter().copied(), 4, 2);

        assert_eq!(&counts[0][0..4], &[1, 1, 1, 1]);
        assert_eq!(&counts[3][0..4], &[2, 1, 0, 1]);
    }
}
