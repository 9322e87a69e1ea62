use thiserror::Error;

/// Error types for the colorkmeans library
#[derive(Error, Debug)]
pub enum QuantizeError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough samples for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The image has no pixels to cluster
    #[error("Image has no pixels")]
    EmptyImage,

    /// The chosen initialization strategy cannot produce k centroids
    #[error("{mode} initialization cannot produce {k} centroids: {reason}")]
    IncompatibleInitialization {
        mode: &'static str,
        k: usize,
        reason: String,
    },

    /// A configuration parameter other than k is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every redraw of stratified sampling landed on a bin without members
    #[error("Stratum {stratum} is empty after {attempts} draws")]
    EmptyStratum { stratum: usize, attempts: usize },

    /// A nearest-neighbour query received no candidates
    #[error("Nearest sample requested from an empty candidate list")]
    EmptyCandidates,

    /// Model has not been trained yet
    #[error("Model has not been trained. Call train() or fit() first.")]
    NotFitted,

    /// An engine operation was called in the wrong lifecycle state
    #[error("Invalid engine state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    /// Pixel buffer does not match the declared image dimensions
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// Decoding or encoding through the `image` crate failed
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl QuantizeError {
    /// True for errors caused by invalid parameters or input, which the
    /// caller must correct before re-invoking
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            QuantizeError::InvalidK(_)
                | QuantizeError::InsufficientData(_)
                | QuantizeError::EmptyImage
                | QuantizeError::IncompatibleInitialization { .. }
                | QuantizeError::InvalidParameter(_)
                | QuantizeError::InvalidDimensions(_)
        )
    }
}

/// Result type used by this crate
pub type Result<T> = std::result::Result<T, QuantizeError>;
