//! Attendance payload and aggregation types.

use crate::error::{CampusError, CampusResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Message shown when the source reports failure without explaining why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to load attendance data";

/// One course's counters for one semester.
///
/// `present + absent + duty_leave + medical <= total` is expected but not
/// enforced, and the date lists are not checked against the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "courseID")]
    pub course_id: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub faculty: String,
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub duty_leave: u32,
    pub medical: u32,
    #[serde(default)]
    pub absent_dates: Vec<String>,
    #[serde(default)]
    pub present_dates: Vec<String>,
    #[serde(default)]
    pub duty_leave_dates: Vec<String>,
    #[serde(default)]
    pub medical_dates: Vec<String>,
}

/// Identifies a bucket, e.g. `Fall-2023`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemesterKey {
    pub semester: String,
    pub year: i32,
}

impl SemesterKey {
    pub fn new(semester: impl Into<String>, year: i32) -> Self {
        Self {
            semester: semester.into(),
            year,
        }
    }
}

impl fmt::Display for SemesterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.semester, self.year)
    }
}

impl FromStr for SemesterKey {
    type Err = String;

    /// Parses `"<semester>-<year>"`, splitting on the last dash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (semester, year) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| format!("'{s}' is not <semester>-<year>"))?;
        let year = year
            .parse()
            .map_err(|_| format!("'{year}' is not a year"))?;
        if semester.is_empty() {
            return Err(format!("'{s}' has no semester name"));
        }
        Ok(SemesterKey::new(semester, year))
    }
}

/// Records sharing one (semester, year) key, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterBucket {
    pub key: SemesterKey,
    pub records: Vec<AttendanceRecord>,
}

/// One semester block of the remote payload. Records stay raw until normalized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SemesterPayload {
    pub semester: String,
    pub year: i32,
    #[serde(default)]
    pub records: Vec<Value>,
}

impl SemesterPayload {
    pub fn key(&self) -> SemesterKey {
        SemesterKey::new(self.semester.clone(), self.year)
    }

    /// Decodes each record, dropping those missing required fields.
    pub fn normalized_records(&self) -> Vec<AttendanceRecord> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<AttendanceRecord>(value.clone()) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(
                            semester = %self.key(),
                            index,
                            error = %CampusError::MalformedRecord(e.to_string()),
                            "Dropping attendance record"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/// The `{success, data, message}` wrapper around attendance responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<SemesterPayload>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AttendanceEnvelope {
    /// Unwraps the payload, turning `success = false` into a remote failure.
    pub fn into_result(self) -> CampusResult<Vec<SemesterPayload>> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            Err(CampusError::RemoteFailure(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_wire_names() {
        let record: AttendanceRecord = serde_json::from_value(json!({
            "courseID": "cs101",
            "courseCode": "CS101",
            "courseName": "Introduction to Programming",
            "faculty": "Dr. Rao",
            "total": 40,
            "present": 30,
            "absent": 8,
            "dutyLeave": 1,
            "medical": 1,
            "absentDates": ["2024-01-10"]
        }))
        .unwrap();

        assert_eq!(record.course_id, "cs101");
        assert_eq!(record.duty_leave, 1);
        assert_eq!(record.absent_dates, vec!["2024-01-10"]);
        assert!(record.medical_dates.is_empty());
    }

    #[test]
    fn test_semester_key_round_trip() {
        let key: SemesterKey = "Fall-2023".parse().unwrap();
        assert_eq!(key, SemesterKey::new("Fall", 2023));
        assert_eq!(key.to_string(), "Fall-2023");

        let key: SemesterKey = "Semester-IV-2024".parse().unwrap();
        assert_eq!(key.semester, "Semester-IV");

        assert!("Fall".parse::<SemesterKey>().is_err());
        assert!("Fall-next".parse::<SemesterKey>().is_err());
        assert!("-2024".parse::<SemesterKey>().is_err());
    }

    #[test]
    fn test_envelope_failure_message() {
        let env: AttendanceEnvelope =
            serde_json::from_value(json!({"success": false, "message": "Student not enrolled"}))
                .unwrap();
        assert_eq!(
            env.into_result(),
            Err(CampusError::RemoteFailure("Student not enrolled".into()))
        );

        let env: AttendanceEnvelope = serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(
            env.into_result(),
            Err(CampusError::RemoteFailure(DEFAULT_FAILURE_MESSAGE.into()))
        );
    }

    #[test]
    fn test_payload_drops_malformed_records() {
        let payload: SemesterPayload = serde_json::from_value(json!({
            "semester": "Spring",
            "year": 2024,
            "records": [
                {"courseID": "cs202", "total": 10, "present": 9, "absent": 1, "dutyLeave": 0, "medical": 0},
                {"courseID": "cs303", "total": -4, "present": 0, "absent": 0, "dutyLeave": 0, "medical": 0},
                {"courseName": "No id"}
            ]
        }))
        .unwrap();

        let records = payload.normalized_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_id, "cs202");
    }
}
