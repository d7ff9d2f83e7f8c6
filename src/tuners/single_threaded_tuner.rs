//! `SingleThreadedTuner` is a tuner which never asks for co-resident groups.
//!
//! Typically this will be expected to be used in conjunction with
//! `radix_sort_builder().with_single_threading()` for fully single-threaded operation.
//!
//! SingleThreadedTuner strategy choice is:
//!  * single-threaded only
//!  * a single group up to its capacity, onesweep beyond

use crate::tuner::{Strategy, Tuner, TuningParams};

pub struct SingleThreadedTuner;
impl Tuner for SingleThreadedTuner {
    #[inline]
    fn pick_strategy(&self, p: &TuningParams) -> Strategy {
        if p.input_len <= p.single_group_capacity() {
            Strategy::SingleGroup
        } else {
            Strategy::Onesweep
        }
    }
}
