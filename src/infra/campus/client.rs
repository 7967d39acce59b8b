use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::attendance::types::AttendanceEnvelope;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::campus_api::{CampusApi, RawTeacherProfile};

/// [`CampusApi`] over HTTP against the dashboard backend.
pub struct CampusClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> CampusClient<C> {
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// `base_url` with `segments` appended as path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("base URL '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl CampusClient<ApiKey<BasicClient>> {
    /// A client that sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(base_url: impl Into<String>, token: &str) -> Result<Self> {
        let http = BasicClient::with_timeouts()?;
        Ok(Self::new(base_url, ApiKey::bearer(http, token)))
    }
}

#[async_trait]
impl<C: HttpClient> CampusApi for CampusClient<C> {
    async fn timetable(&self) -> Result<Option<Vec<Value>>> {
        let url = self.endpoint(&["api", "teacher", "timetable"])?;
        let body: Value = fetch_json(&self.http, url.as_str()).await?;

        match body {
            Value::Array(entries) => Ok(Some(entries)),
            Value::Null => Ok(None),
            other => Err(anyhow!(
                "timetable response is not a list (got {})",
                json_kind(&other)
            )),
        }
    }

    async fn teacher_profile(&self) -> Result<RawTeacherProfile> {
        let url = self.endpoint(&["api", "teacher", "profile"])?;
        fetch_json(&self.http, url.as_str()).await
    }

    async fn attendance(&self, student_id: &str) -> Result<AttendanceEnvelope> {
        let mut url = self.endpoint(&["api", "students", student_id, "attendance"])?;
        // Cache buster; the backend ignores it.
        url.query_pairs_mut()
            .append_pair("t", &Utc::now().timestamp_millis().to_string());
        debug!(url = %url, "Fetching attendance");
        fetch_json(&self.http, url.as_str()).await
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
