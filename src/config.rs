//! Environment-driven configuration.
//!
//! `main` loads a `.env` file first, so every value can live there too.

use crate::session::SessionState;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_LOG_FILE: &str = "logs/campus_pulse.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `CAMPUS_API_URL`
    pub api_url: String,
    /// `CAMPUS_TOKEN`
    pub token: Option<String>,
    /// `CAMPUS_ROLE`
    pub role: Option<String>,
    /// `CAMPUS_USER_ID`
    pub user_id: Option<String>,
    /// `LOG_FILE_PATH`
    pub log_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            api_url: get("CAMPUS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: get("CAMPUS_TOKEN"),
            role: get("CAMPUS_ROLE"),
            user_id: get("CAMPUS_USER_ID"),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }

    /// The persisted session the views are gated on.
    pub fn session(&self) -> SessionState {
        SessionState {
            role: self.role.clone(),
            user_id: self.user_id.clone(),
            token: self.token.clone(),
        }
    }
}
