//! Persisted session state and role gating.
//!
//! Token verification belongs to the auth service. The core only reads the
//! stored role marker and user id, and learns of a rejected token when the
//! data source answers 401 or 403 (see [`crate::fetch::unauthorized`]).

use crate::error::{CampusError, CampusResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Locally persisted session values, read-only to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub role: Option<String>,
    pub user_id: Option<String>,
    pub token: Option<String>,
}

/// Who a gated view loads data for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl SessionState {
    /// Admits the session into a view for `expected`, or asks for a redirect.
    ///
    /// # Errors
    ///
    /// [`CampusError::Unauthorized`] when the stored role is absent,
    /// unparseable, or different from `expected`.
    pub fn require_role(&self, expected: Role) -> CampusResult<Identity> {
        let role = self
            .role
            .as_deref()
            .ok_or_else(|| CampusError::Unauthorized("no role in session".into()))?
            .parse::<Role>()
            .map_err(CampusError::Unauthorized)?;

        if role != expected {
            return Err(CampusError::Unauthorized(format!(
                "{role} session cannot open the {expected} view"
            )));
        }

        Ok(Identity {
            role,
            user_id: self.user_id.clone().filter(|id| !id.trim().is_empty()),
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("TEACHER".parse::<Role>(), Ok(Role::Teacher));
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_role() {
        let state = SessionState {
            role: Some("student".into()),
            user_id: Some("S001".into()),
            token: None,
        };
        let identity = state.require_role(Role::Student).unwrap();
        assert_eq!(identity.user_id.as_deref(), Some("S001"));

        assert!(state.require_role(Role::Teacher).is_err());
        assert!(SessionState::default().require_role(Role::Student).is_err());
    }
}
