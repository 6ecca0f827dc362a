//! Error types for promo-overlap operations.

use thiserror::Error;

use crate::model::ApplyScope;

/// Errors surfaced by the overlap check itself.
#[derive(Error, Debug)]
pub enum OverlapError {
    /// Fetching existing campaigns or products failed and the policy is
    /// [`FailurePolicy::Closed`](crate::source::FailurePolicy::Closed).
    #[error("Could not load existing campaigns: {0}")]
    Source(String),

    /// The candidate record could not be normalized.
    #[error("Invalid candidate: {0}")]
    Candidate(#[from] RecordError),

    /// A response body was not valid JSON.
    #[error("Malformed response body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Why a raw wire record could not be turned into a [`Campaign`](crate::model::Campaign).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing start date")]
    MissingStartDate,

    #[error("missing expiry date")]
    MissingExpiryDate,

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("missing apply scope")]
    MissingScope,

    #[error("unknown apply scope '{0}'")]
    UnknownScope(String),

    #[error("{0} scope has no target ids")]
    MissingTarget(ApplyScope),
}

pub type Result<T> = std::result::Result<T, OverlapError>;
