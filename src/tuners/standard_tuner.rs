//! `StandardTuner` represents the default strategy choices offered by dpsort.
//!
//! StandardTuner strategy choice is:
//!  * a single group for anything that fits in one group's scratch
//!  * cooperative groups while every group can be resident at once
//!  * onesweep beyond that

use crate::tuner::{Strategy, Tuner, TuningParams};

pub struct StandardTuner;
impl Tuner for StandardTuner {
    #[inline]
    fn pick_strategy(&self, p: &TuningParams) -> Strategy {
        if p.input_len <= p.single_group_capacity() {
            return Strategy::SingleGroup;
        }

        if p.multi_threaded && p.input_len <= p.cooperative_capacity() {
            Strategy::Cooperative
        } else {
            Strategy::Onesweep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(input_len: usize) -> TuningParams {
        TuningParams {
            input_len,
            key_bits: 32,
            radix_bits: 8,
            lanes_per_group: 64,
            max_cooperative_groups: 16,
            multi_threaded: true,
        }
    }

    #[test]
    pub fn test_thresholds() {
        let t = StandardTuner;

        assert_eq!(t.pick_strategy(&params(2)), Strategy::SingleGroup);
        assert_eq!(t.pick_strategy(&params(16_384)), Strategy::SingleGroup);
        assert_eq!(t.pick_strategy(&params(16_385)), Strategy::Cooperative);
        assert_eq!(t.pick_strategy(&params(262_144)), Strategy::Cooperative);
        assert_eq!(t.pick_strategy(&params(262_145)), Strategy::Onesweep);
        assert_eq!(t.pick_strategy(&params(300_000)), Strategy::Onesweep);
    }

    #[test]
    pub fn test_single_threaded_skips_cooperative() {
        let mut p = params(100_000);
        p.multi_threaded = false;

        assert_eq!(StandardTuner.pick_strategy(&p), Strategy::Onesweep);
    }
}
