use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid slice count {0}: only 1-slice and 2-slice tasks are supported")]
    InvalidSliceCount(usize),

    #[error("fallback slice is not a subset of the first slice; extra dimensions: {extra:?}")]
    InconsistentSliceDimensions { extra: Vec<String> },
}
