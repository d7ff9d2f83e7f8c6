use crate::radix_key::stage_count;
use crate::tuning_parameters::TuningParameters;
use crate::utils::cdiv;

/// Slots per lane of the largest single-group configuration.
pub const SINGLE_GROUP_MAX_PROCESS_SIZE: usize = 256;
const SINGLE_GROUP_MIN_LANES: usize = 8;
const COOPERATIVE_PROCESS_SIZES: [usize; 2] = [128, 256];

#[derive(Clone, Debug)]
pub struct TuningParams {
    pub input_len: usize,
    pub key_bits: u32,
    pub radix_bits: u32,
    pub lanes_per_group: usize,
    pub max_cooperative_groups: usize,
    pub multi_threaded: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Strategy {
    SingleGroup,
    Cooperative,
    Onesweep,
}

pub trait Tuner {
    fn pick_strategy(&self, p: &TuningParams) -> Strategy;
}

impl TuningParams {
    pub(crate) fn new(input_len: usize, key_bits: u32, params: &TuningParameters) -> Self {
        Self {
            input_len,
            key_bits,
            radix_bits: params.radix_bits,
            lanes_per_group: params.lanes_per_group,
            max_cooperative_groups: params.max_cooperative_groups,
            multi_threaded: params.multi_threaded && cfg!(feature = "multi-threaded"),
        }
    }

    /// Digit stages each strategy runs for keys of `key_bits` bits.
    #[inline]
    pub fn stages(&self) -> usize {
        stage_count(self.key_bits, self.radix_bits)
    }

    /// Largest input a single group can hold.
    #[inline]
    pub fn single_group_capacity(&self) -> usize {
        self.lanes_per_group * SINGLE_GROUP_MAX_PROCESS_SIZE
    }

    /// Largest input the cooperative strategy accepts.
    #[inline]
    pub fn cooperative_capacity(&self) -> usize {
        self.max_cooperative_groups * self.lanes_per_group * COOPERATIVE_PROCESS_SIZES[1]
    }
}

/// Concrete launch configuration for one sort.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Plan {
    pub strategy: Strategy,
    pub lanes: usize,
    pub process_size: usize,
    pub groups: usize,
}

impl Plan {
    /// Fix launch parameters for `strategy`. A strategy that cannot hold the
    /// input degrades to the next one that can.
    pub fn new(strategy: Strategy, p: &TuningParams, onesweep_process_size: usize) -> Self {
        match strategy {
            Strategy::SingleGroup => {
                if p.input_len <= p.single_group_capacity() {
                    Self::single_group(p)
                } else if p.multi_threaded && p.input_len <= p.cooperative_capacity() {
                    Self::new(Strategy::Cooperative, p, onesweep_process_size)
                } else {
                    Self::onesweep(p, onesweep_process_size)
                }
            }
            Strategy::Cooperative => {
                if !p.multi_threaded {
                    return Self::onesweep(p, onesweep_process_size);
                }

                for process_size in COOPERATIVE_PROCESS_SIZES {
                    let groups = cdiv(p.input_len, p.lanes_per_group * process_size);

                    if groups <= p.max_cooperative_groups {
                        return Self {
                            strategy: Strategy::Cooperative,
                            lanes: p.lanes_per_group,
                            process_size,
                            groups: groups.max(1),
                        };
                    }
                }

                Self::onesweep(p, onesweep_process_size)
            }
            Strategy::Onesweep => Self::onesweep(p, onesweep_process_size),
        }
    }

    fn single_group(p: &TuningParams) -> Self {
        let n = p.input_len;
        let mut process_size = if n < SINGLE_GROUP_MIN_LANES * 64 {
            64
        } else if n < SINGLE_GROUP_MIN_LANES * 128 {
            128
        } else {
            256
        };

        let lanes_for = |process_size: usize| {
            cdiv(n, process_size)
                .max(SINGLE_GROUP_MIN_LANES)
                .min(p.lanes_per_group)
        };
        let mut lanes = lanes_for(process_size);

        while lanes * process_size < n && process_size < SINGLE_GROUP_MAX_PROCESS_SIZE {
            process_size *= 2;
            lanes = lanes_for(process_size);
        }

        Self {
            strategy: Strategy::SingleGroup,
            lanes,
            process_size,
            groups: 1,
        }
    }

    fn onesweep(p: &TuningParams, process_size: usize) -> Self {
        Self {
            strategy: Strategy::Onesweep,
            lanes: p.lanes_per_group,
            process_size,
            groups: cdiv(p.input_len, p.lanes_per_group * process_size).max(1),
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.lanes * self.process_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(input_len: usize, multi_threaded: bool) -> TuningParams {
        TuningParams {
            input_len,
            key_bits: 32,
            radix_bits: 8,
            lanes_per_group: 64,
            max_cooperative_groups: 16,
            multi_threaded,
        }
    }

    #[test]
    pub fn test_single_group_process_sizes() {
        let plan = Plan::new(Strategy::SingleGroup, &params(5, true), 256);
        assert_eq!((plan.lanes, plan.process_size), (8, 64));

        let plan = Plan::new(Strategy::SingleGroup, &params(600, true), 256);
        assert_eq!((plan.lanes, plan.process_size), (8, 128));

        let plan = Plan::new(Strategy::SingleGroup, &params(16_384, true), 256);
        assert_eq!((plan.lanes, plan.process_size), (64, 256));
        assert!(plan.block_size() >= 16_384);
    }

    #[test]
    pub fn test_single_group_with_few_lanes_still_fits() {
        let mut p = params(400, true);
        p.lanes_per_group = 2;

        let plan = Plan::new(Strategy::SingleGroup, &p, 256);
        assert_eq!(plan.strategy, Strategy::SingleGroup);
        assert!(plan.block_size() >= 400);
    }

    #[test]
    pub fn test_single_group_degrades() {
        let plan = Plan::new(Strategy::SingleGroup, &params(16_385, true), 256);
        assert_eq!(plan.strategy, Strategy::Cooperative);

        let plan = Plan::new(Strategy::SingleGroup, &params(16_385, false), 256);
        assert_eq!(plan.strategy, Strategy::Onesweep);
    }

    #[test]
    pub fn test_cooperative_process_size_doubles() {
        let plan = Plan::new(Strategy::Cooperative, &params(16 * 64 * 128, true), 256);
        assert_eq!((plan.process_size, plan.groups), (128, 16));

        let plan = Plan::new(Strategy::Cooperative, &params(16 * 64 * 128 + 1, true), 256);
        assert_eq!((plan.process_size, plan.groups), (256, 9));

        let plan = Plan::new(Strategy::Cooperative, &params(16 * 64 * 256 + 1, true), 256);
        assert_eq!(plan.strategy, Strategy::Onesweep);
    }

    #[test]
    pub fn test_stages() {
        let mut p = params(10, true);
        assert_eq!(p.stages(), 4);

        p.radix_bits = 3;
        assert_eq!(p.stages(), 11);

        p.key_bits = 8;
        p.radix_bits = 8;
        assert_eq!(p.stages(), 1);
    }

    #[test]
    pub fn test_onesweep_groups() {
        let plan = Plan::new(Strategy::Onesweep, &params(300_000, true), 256);
        assert_eq!(plan.groups, 19);

        let plan = Plan::new(Strategy::Onesweep, &params(10, true), 32);
        assert_eq!(plan.groups, 1);
    }
}
