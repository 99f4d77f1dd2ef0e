use thiserror::Error;

/// Result type for bellman operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the bellman library
#[derive(Debug, Error)]
pub enum DqnError {
    /// A vector length disagrees with a fixed layer size, or predictions and
    /// targets differ in length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Action index outside the valid output range
    #[error("Index {index} out of range: must be less than {len}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// Sampling attempted on a store with zero elements
    #[error("Cannot sample from an empty experience store")]
    EmptyStore,

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl DqnError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Fail with `DimensionMismatch` unless `actual == expected`.
    pub(crate) fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(DqnError::dimension_mismatch(
                format!("{} of length {}", what, expected),
                format!("length {}", actual),
            ))
        }
    }
}
