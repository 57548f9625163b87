use thiserror::Error;

/// Errors surfaced by the segmentation core
///
/// The numeric passes themselves never fail; only the input buffer and the
/// tolerance configuration are checked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// Input cannot be interpreted as a rectangular RGB(A) pixel grid
    #[error("invalid image format: {reason}")]
    InvalidImageFormat { reason: String },

    /// A tolerance value is out of its accepted range
    #[error("invalid tolerance `{field}`: {reason}")]
    InvalidTolerance { field: &'static str, reason: String },
}

impl SegmentError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::InvalidImageFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn tolerance(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTolerance {
            field,
            reason: reason.into(),
        }
    }
}
