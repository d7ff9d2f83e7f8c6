use crate::error::SortError;
use crate::ranker::RankMethod;
use crate::sorter::{SortReport, Sorter};
use crate::tuner::Tuner;
use crate::tuners::{SingleThreadedTuner, StandardTuner};
use crate::tuning_parameters::TuningParameters;
use crate::{RadixKey, SortOrder};

pub struct RadixSortBuilder<'a, K, V = ()> {
    keys: &'a mut [K],
    values: Option<&'a mut [V]>,
    order: SortOrder,
    params: TuningParameters,
    tuner: &'a (dyn Tuner + Send + Sync),
}

impl<'a, K> RadixSortBuilder<'a, K, ()>
where
    K: RadixKey + Send + Sync,
{
    pub(crate) fn new(keys: &'a mut [K]) -> Self {
        Self {
            keys,
            values: None,
            order: SortOrder::Ascending,
            params: TuningParameters::default(),
            tuner: &StandardTuner,
        }
    }
}

impl<'a, K, V> RadixSortBuilder<'a, K, V>
where
    K: RadixKey + Send + Sync,
    V: Copy + Send + Sync,
{
    /// Attach a payload that is moved along with the keys. Must be the same
    /// length as the keys.
    pub fn with_values<W>(self, values: &'a mut [W]) -> RadixSortBuilder<'a, K, W>
    where
        W: Copy + Send + Sync,
    {
        RadixSortBuilder {
            keys: self.keys,
            values: Some(values),
            order: self.order,
            params: self.params,
            tuner: self.tuner,
        }
    }

    pub fn ascending(self) -> Self {
        self.with_order(SortOrder::Ascending)
    }

    pub fn descending(self) -> Self {
        self.with_order(SortOrder::Descending)
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;

        self
    }

    pub fn with_radix_bits(mut self, radix_bits: u32) -> Self {
        self.params.radix_bits = radix_bits;

        self
    }

    pub fn with_lanes_per_group(mut self, lanes: usize) -> Self {
        self.params.lanes_per_group = lanes;

        self
    }

    /// Slots per lane for the onesweep strategy.
    pub fn with_process_size(mut self, process_size: usize) -> Self {
        self.params.onesweep_process_size = process_size;

        self
    }

    pub fn with_max_cooperative_groups(mut self, groups: usize) -> Self {
        self.params.max_cooperative_groups = groups;

        self
    }

    pub fn with_rank_method(mut self, method: RankMethod) -> Self {
        self.params.rank_method = method;

        self
    }

    pub fn with_retry_limit(mut self, retry_limit: usize) -> Self {
        self.params.retry_limit = retry_limit;

        self
    }

    pub fn with_tuning_parameters(mut self, params: TuningParameters) -> Self {
        self.params = params;

        self
    }

    pub fn with_multi_threading(mut self) -> Self {
        self.params.multi_threaded = true;

        self
    }

    pub fn with_single_threading(mut self) -> Self {
        self.params.multi_threaded = false;
        self.params.workers = 1;

        self
    }

    pub fn with_single_threaded_tuner(mut self) -> Self {
        self.tuner = &SingleThreadedTuner;

        self
    }

    pub fn with_tuner(mut self, tuner: &'a (dyn Tuner + Send + Sync)) -> Self {
        self.tuner = tuner;

        self
    }

    /// Sort in place.
    pub fn sort(self) -> Result<SortReport, SortError> {
        let sorter = Sorter::new(self.params, self.tuner);

        match self.values {
            Some(values) => sorter.sort(self.keys, values, self.order),
            None => sorter.sort_keys(self.keys, self.order),
        }
    }

    /// Sort into caller-provided output slices, leaving the input untouched.
    /// `values_out` is required exactly when values are attached.
    pub fn sort_into(self, keys_out: &mut [K], values_out: Option<&mut [V]>) -> Result<SortReport, SortError> {
        if keys_out.len() != self.keys.len() {
            return Err(SortError::OutputLengthMismatch {
                expected: self.keys.len(),
                actual: keys_out.len(),
            });
        }

        let sorter = Sorter::new(self.params, self.tuner);

        match (self.values, values_out) {
            (Some(values), Some(values_out)) => {
                if values.len() != self.keys.len() {
                    return Err(SortError::LengthMismatch {
                        keys: self.keys.len(),
                        values: values.len(),
                    });
                }

                if values_out.len() != values.len() {
                    return Err(SortError::OutputLengthMismatch {
                        expected: values.len(),
                        actual: values_out.len(),
                    });
                }

                keys_out.copy_from_slice(self.keys);
                values_out.copy_from_slice(values);
                sorter.sort(keys_out, values_out, self.order)
            }
            (None, None) => {
                keys_out.copy_from_slice(self.keys);
                sorter.sort_keys(keys_out, self.order)
            }
            (Some(_), None) => Err(SortError::invalid(
                "values_out",
                "values are attached, an output slice for them is required",
            )),
            (None, Some(_)) => Err(SortError::invalid(
                "values_out",
                "no values are attached to sort into it",
            )),
        }
    }
}
