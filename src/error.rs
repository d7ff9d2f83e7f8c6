use std::collections::TryReserveError;

/// Errors that can occur while sorting.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    #[error("value slice length ({values}) does not match key slice length ({keys})")]
    LengthMismatch { keys: usize, values: usize },

    #[error("output slice length ({actual}) does not match input length ({expected})")]
    OutputLengthMismatch { expected: usize, actual: usize },

    #[error("failed to allocate {bytes} bytes of scratch memory")]
    ScratchAllocation {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl SortError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SortError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
