//! Error types for the presence filter crate

use thiserror::Error;

/// Errors raised while configuring a presence filter
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// False positive rate outside the open interval (0, 1).
    #[error("Invalid false positive rate: {fpr} (must be between 0 and 1, exclusive)")]
    InvalidFPR {
        /// Rejected rate
        fpr: f64,
    },

    /// Any other invalid sizing parameter.
    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),
}
