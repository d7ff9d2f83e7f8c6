use log::{debug, warn};

use crate::error::SortError;
use crate::radix_key::RadixBits;
use crate::tuner::{Plan, Strategy, Tuner, TuningParams};
use crate::tuning_parameters::TuningParameters;
use crate::{RadixKey, SortOrder};

/// Summary of how a sort was carried out.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SortReport {
    /// Launch configuration, `None` when the input was trivially sorted.
    pub plan: Option<Plan>,
    pub stages: usize,
    /// Cross-group waits that exhausted their retry limit.
    pub stale_waits: usize,
}

impl SortReport {
    #[inline]
    pub fn strategy(&self) -> Option<Strategy> {
        self.plan.map(|p| p.strategy)
    }
}

pub struct Sorter<'a> {
    pub(crate) params: TuningParameters,
    pub(crate) tuner: &'a (dyn Tuner + Send + Sync),
}

impl<'a> Sorter<'a> {
    pub fn new(params: TuningParameters, tuner: &'a (dyn Tuner + Send + Sync)) -> Self {
        Self { params, tuner }
    }

    #[inline]
    pub(crate) fn multi_threaded(&self) -> bool {
        self.params.multi_threaded && cfg!(feature = "multi-threaded")
    }

    #[inline]
    pub(crate) fn bins(&self) -> usize {
        1 << self.params.radix_bits
    }

    pub(crate) fn tuning_params<K: RadixKey>(&self, input_len: usize) -> TuningParams {
        TuningParams::new(input_len, K::Bits::BITS, &self.params)
    }

    pub(crate) fn plan(&self, tp: &TuningParams) -> Plan {
        let strategy = self.tuner.pick_strategy(tp);

        Plan::new(strategy, tp, self.params.onesweep_process_size)
    }

    /// Sort `keys` in place, moving `values` along with them.
    pub(crate) fn sort<K, V>(&self, keys: &mut [K], values: &mut [V], order: SortOrder) -> Result<SortReport, SortError>
    where
        K: RadixKey + Send + Sync,
        V: Copy + Send + Sync,
    {
        self.params.validate()?;

        if keys.len() != values.len() {
            return Err(SortError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        // By definition, this is already sorted
        if keys.len() < 2 {
            return Ok(SortReport {
                plan: None,
                stages: 0,
                stale_waits: 0,
            });
        }

        let tp = self.tuning_params::<K>(keys.len());
        let plan = self.plan(&tp);
        let stages = tp.stages();

        debug!(
            "sorting {} keys ({} stages, {:?}): {:?}",
            keys.len(),
            stages,
            order,
            plan
        );

        let stale_waits = match plan.strategy {
            Strategy::SingleGroup => self.single_group_sort_adapter(keys, values, order, &plan)?,
            Strategy::Cooperative => self.cooperative_sort_adapter(keys, values, order, &plan)?,
            Strategy::Onesweep => self.onesweep_sort_adapter(keys, values, order, &plan)?,
        };

        if stale_waits > 0 {
            warn!(
                "{} cross-group waits exhausted their retry limit; output may be incorrect",
                stale_waits
            );
        }

        Ok(SortReport {
            plan: Some(plan),
            stages,
            stale_waits,
        })
    }

    /// Sort `keys` in place with no payload.
    pub(crate) fn sort_keys<K>(&self, keys: &mut [K], order: SortOrder) -> Result<SortReport, SortError>
    where
        K: RadixKey + Send + Sync,
    {
        let mut units = vec![(); keys.len()];

        self.sort(keys, &mut units, order)
    }
}
