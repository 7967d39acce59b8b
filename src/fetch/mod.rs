//! HTTP plumbing shared by every remote call.
//!
//! Requests go through the [`HttpClient`] trait so that authentication can be
//! layered on (see [`auth::ApiKey`]) and tests can swap the transport.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CampusError;

/// Issues a `GET` for `url` and returns the response body.
///
/// Non-2xx statuses are reported as errors carrying the status code. A 401 or
/// 403 is a [`CampusError::Unauthorized`] that callers can downcast to.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("Unknown");
        let message = format!("Error {}: {}", status.as_u16(), reason);
        if is_auth_rejection(status) {
            return Err(CampusError::Unauthorized(message).into());
        }
        anyhow::bail!(message);
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Response received");
    Ok(bytes)
}

/// Fetches `url` and decodes the body as JSON into `T`.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let bytes = fetch_bytes(client, url).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to decode JSON from {url}"))
}

fn is_auth_rejection(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// The [`CampusError::Unauthorized`] inside a plumbing error, if any.
pub fn unauthorized(err: &anyhow::Error) -> Option<&CampusError> {
    err.downcast_ref::<CampusError>()
        .filter(|e| e.is_unauthorized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejection_statuses() {
        assert!(is_auth_rejection(StatusCode::UNAUTHORIZED));
        assert!(is_auth_rejection(StatusCode::FORBIDDEN));
        assert!(!is_auth_rejection(StatusCode::NOT_FOUND));
        assert!(!is_auth_rejection(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_unauthorized_survives_context() {
        let err = anyhow::Error::from(CampusError::Unauthorized("Error 401: Unauthorized".into()))
            .context("Failed to fetch timetable");
        assert_eq!(
            unauthorized(&err),
            Some(&CampusError::Unauthorized("Error 401: Unauthorized".into()))
        );

        let plain = anyhow::anyhow!("Error 503: Service Unavailable");
        assert!(unauthorized(&plain).is_none());
    }
}
