//! Trait and types for the campus dashboard's remote data source.

use crate::attendance::types::AttendanceEnvelope;
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

/// Faculty id shown when the profile endpoint does not provide one.
pub const DEFAULT_FACULTY_ID: &str = "T102";

/// Teacher profile as sent by `/api/teacher/profile`; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeacherProfile {
    pub faculty_id: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub subjects: Option<Vec<String>>,
}

/// Teacher profile header shown above the timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherProfile {
    pub faculty_id: String,
    pub name: String,
    pub department: String,
    pub subjects: Vec<String>,
}

impl Default for TeacherProfile {
    fn default() -> Self {
        RawTeacherProfile::default().into()
    }
}

impl From<RawTeacherProfile> for TeacherProfile {
    fn from(raw: RawTeacherProfile) -> Self {
        let or = |value: Option<String>, fallback: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        TeacherProfile {
            faculty_id: or(raw.faculty_id, DEFAULT_FACULTY_ID),
            name: or(raw.name, "Unknown"),
            department: or(raw.department, "Unknown"),
            subjects: raw.subjects.unwrap_or_default(),
        }
    }
}

/// Abstraction over the campus API (the web backend, or a fixture in tests).
#[async_trait::async_trait]
pub trait CampusApi: Send + Sync {
    /// Raw timetable entries for the signed-in teacher.
    ///
    /// `Ok(None)` means the source answered without data.
    async fn timetable(&self) -> Result<Option<Vec<Value>>>;

    async fn teacher_profile(&self) -> Result<RawTeacherProfile>;

    /// Attendance envelope for `student_id`.
    async fn attendance(&self, student_id: &str) -> Result<AttendanceEnvelope>;
}
