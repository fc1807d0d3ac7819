//! Evaluation error taxonomy.
//!
//! Errors are reserved for "could not evaluate": a caller must never have to
//! guess whether an outcome was a legitimate deny or a failed evaluation.
//! Unknown subjects and unmatched policies are ordinary deny decisions, not
//! errors.

use portcullis_types::{Dataset, TimeWindowError};
use thiserror::Error;

/// Error type for policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A required dataset failed to load upstream. The engine refuses to
    /// evaluate rather than treat the gap as an empty dataset that happens
    /// to deny.
    #[error("{dataset} dataset unavailable; refusing to evaluate")]
    DataUnavailable {
        /// Which dataset is missing.
        dataset: Dataset,
    },

    /// A policy's condition block cannot be parsed. Aborts the evaluation:
    /// a malformed condition could mask an intended restriction.
    #[error("policy '{policy}' has a malformed condition")]
    MalformedCondition {
        /// Name of the offending policy.
        policy: String,
        #[source]
        source: TimeWindowError,
    },
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
