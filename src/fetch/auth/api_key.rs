use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that attaches a credential as an HTTP header.
///
/// `header_name` is the header field to set and `key` is the raw value written
/// into it. The campus API expects `Authorization: Bearer <token>`, which
/// [`ApiKey::bearer`] builds.
pub struct ApiKey<C> {
    pub inner: C,
    pub header_name: String,
    pub key: String,
}

impl<C> ApiKey<C> {
    /// Wraps `inner` so every request carries `Authorization: Bearer <token>`.
    pub fn bearer(inner: C, token: &str) -> Self {
        Self {
            inner,
            header_name: "Authorization".to_string(),
            key: format!("Bearer {token}"),
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        // A header that cannot be encoded is skipped; the server answers 401.
        match (
            HeaderName::from_bytes(self.header_name.as_bytes()),
            HeaderValue::from_str(&self.key),
        ) {
            (Ok(name), Ok(value)) => {
                req.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %self.header_name, "Skipping unencodable auth header"),
        }
        self.inner.execute(req).await
    }
}
