//! Error taxonomy surfaced by the dashboard core.
//!
//! Plumbing (HTTP, JSON, files) uses `anyhow`; anything that reaches a view is
//! first converted into one of these variants.

use thiserror::Error;

/// Failures a view can observe.
///
/// A zero-total attendance record is not an error: it is floored to 0%.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampusError {
    /// Missing, invalid, or role-mismatched credential. The caller redirects.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Non-2xx response or transport error from the remote data source.
    #[error("{0}")]
    RemoteFailure(String),

    /// A payload record with an unknown label or missing required field.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl CampusError {
    /// Wraps a plumbing error as a [`CampusError::RemoteFailure`] with a
    /// user-facing prefix.
    pub fn remote(prefix: &str, err: &anyhow::Error) -> Self {
        CampusError::RemoteFailure(format!("{prefix}: {err:#}"))
    }

    /// Returns `true` when the caller should redirect instead of rendering.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CampusError::Unauthorized(_))
    }
}

pub type CampusResult<T> = Result<T, CampusError>;
