//! Normalization of raw timetable payloads into [`SessionRecord`]s.
//!
//! The remote source names the same field two ways (`subject`/`courseName`,
//! `className`/`section`, `room`/`location`); the first non-empty spelling wins.

use super::types::{Session, SessionKind, SessionRecord};
use crate::error::{CampusError, CampusResult};
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// A timetable entry exactly as the remote source sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSession {
    pub id: Option<Value>,
    pub day: Option<String>,
    pub time_slot: Option<String>,
    pub subject: Option<String>,
    pub course_name: Option<String>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub room: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_non_empty(a: Option<String>, b: Option<String>) -> Option<String> {
    non_empty(a).or_else(|| non_empty(b))
}

impl RawSession {
    /// Maps the raw shape onto the canonical record.
    ///
    /// # Errors
    ///
    /// [`CampusError::MalformedRecord`] when `day`, `timeSlot`, or both subject
    /// spellings are missing, or when `type` is not a known session kind.
    pub fn normalize(self) -> CampusResult<SessionRecord> {
        let day = non_empty(self.day)
            .ok_or_else(|| CampusError::MalformedRecord("session without a day".into()))?;
        let time_slot = non_empty(self.time_slot).ok_or_else(|| {
            CampusError::MalformedRecord(format!("session on {day} without a time slot"))
        })?;
        let subject = first_non_empty(self.subject, self.course_name).ok_or_else(|| {
            CampusError::MalformedRecord(format!("session at {day} {time_slot} without a subject"))
        })?;

        let kind = match non_empty(self.kind) {
            Some(kind) => kind.parse::<SessionKind>().map_err(CampusError::MalformedRecord)?,
            None => SessionKind::Lecture,
        };

        let id = match self.id {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("{day}-{time_slot}"),
        };

        Ok(SessionRecord {
            session: Session {
                id,
                subject,
                audience: first_non_empty(self.class_name, self.section).unwrap_or_default(),
                location: first_non_empty(self.room, self.location).unwrap_or_default(),
                kind,
            },
            day,
            time_slot,
        })
    }
}

/// Normalizes each entry independently, dropping the malformed ones.
pub fn normalize_all(values: Vec<Value>) -> Vec<SessionRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let normalized = serde_json::from_value::<RawSession>(value)
                .map_err(|e| CampusError::MalformedRecord(e.to_string()))
                .and_then(RawSession::normalize);
            match normalized {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "Dropping timetable entry");
                    None
                }
            }
        })
        .collect()
}

/// Decodes a JSON array of timetable entries.
///
/// # Errors
///
/// Returns an error if the body is not a JSON array; individual bad entries
/// are dropped instead.
pub fn parse_sessions(bytes: &[u8]) -> Result<Vec<SessionRecord>> {
    let values: Vec<Value> = serde_json::from_slice(bytes)?;
    Ok(normalize_all(values))
}
