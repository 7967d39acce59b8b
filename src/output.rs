//! Output formatting and persistence for dashboard data.
//!
//! Supports logging a grid row by row, JSON dumps, and CSV append of graded
//! attendance.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::attendance::grade::{Tier, percentage, tier};
use crate::attendance::types::{AttendanceRecord, SemesterKey};
use crate::schedule::catalog::Day;
use crate::schedule::types::Grid;
use csv::WriterBuilder;
use std::fs::OpenOptions;

/// One CSV line of the attendance report.
#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    pub semester: &'a str,
    pub year: i32,
    pub course_id: &'a str,
    pub course_code: &'a str,
    pub course_name: &'a str,
    pub faculty: &'a str,
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub duty_leave: u32,
    pub medical: u32,
    pub percentage: f64,
    pub tier: Tier,
}

impl<'a> ReportRow<'a> {
    pub fn new(key: &'a SemesterKey, record: &'a AttendanceRecord) -> Self {
        let pct = percentage(record);
        ReportRow {
            semester: &key.semester,
            year: key.year,
            course_id: &record.course_id,
            course_code: &record.course_code,
            course_name: &record.course_name,
            faculty: &record.faculty,
            total: record.total,
            present: record.present,
            absent: record.absent,
            duty_leave: record.duty_leave,
            medical: record.medical,
            percentage: round1(pct),
            tier: tier(pct),
        }
    }
}

/// Rounds to one decimal place, as the dashboard displays percentages.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Logs every displayed day of the grid, one line per cell.
pub fn log_grid(grid: &Grid, filter: Option<Day>) {
    for day in grid.days_filtered(filter) {
        let Some(row) = grid.row(day) else { continue };
        for (slot, cell) in row {
            match cell {
                Some(s) => info!(
                    day = %day,
                    slot = %slot,
                    kind = %s.kind,
                    subject = %s.subject,
                    audience = %s.audience,
                    location = %s.location,
                    "Session"
                ),
                None => debug!(day = %day, slot = %slot, "Free"),
            }
        }
    }
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends one row per record to a CSV report.
///
/// Writes the header row first when the file is new or empty. An empty
/// `records` leaves the file untouched.
pub fn append_report(path: &str, key: &SemesterKey, records: &[AttendanceRecord]) -> Result<()> {
    if records.is_empty() {
        debug!(path, "No rows to append");
        return Ok(());
    }

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let is_empty = file.metadata()?.len() == 0;
    debug!(path, is_empty, rows = records.len(), "Appending attendance report");

    let mut writer = WriterBuilder::new()
        .has_headers(is_empty) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(ReportRow::new(key, record))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::catalog::Catalog;
    use crate::schedule::grid::synthesize;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn record(course_id: &str, total: u32, present: u32) -> AttendanceRecord {
        AttendanceRecord {
            course_id: course_id.to_string(),
            course_code: course_id.to_uppercase(),
            course_name: "Database Systems".to_string(),
            faculty: "Dr. Iyer".to_string(),
            total,
            present,
            absent: total.saturating_sub(present),
            duty_leave: 0,
            medical: 0,
            absent_dates: vec![],
            present_dates: vec![],
            duty_leave_dates: vec![],
            medical_dates: vec![],
        }
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(75.0), 75.0);
    }

    #[test]
    fn test_report_row_grades() {
        let key = SemesterKey::new("Fall", 2023);
        let r = record("cs303", 3, 2);
        let row = ReportRow::new(&key, &r);
        assert_eq!(row.percentage, 66.7);
        assert_eq!(row.tier, Tier::Warning);
    }

    #[test]
    fn test_log_grid_does_not_panic() {
        let grid = synthesize(&Catalog::standard(), &mut StdRng::seed_from_u64(3));
        log_grid(&grid, None);
        log_grid(&grid, Some(Day::Friday));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&SemesterKey::new("Spring", 2024)).unwrap();
    }

    #[test]
    fn test_append_report_writes_header_once() {
        let path = temp_path("campus_pulse_test_header.csv");
        let _ = fs::remove_file(&path);

        let key = SemesterKey::new("Fall", 2023);
        append_report(&path, &key, &[record("cs101", 40, 30)]).unwrap();
        append_report(&path, &key, &[record("cs202", 40, 20), record("cs303", 0, 0)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(content.lines().filter(|l| l.starts_with("semester")).count(), 1);
        assert!(lines[1].ends_with("75.0,good"));
        assert!(lines[3].ends_with("0.0,critical"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_report_header_after_empty_append() {
        let path = temp_path("campus_pulse_test_empty_first.csv");
        let _ = fs::remove_file(&path);

        let key = SemesterKey::new("Fall", 2023);
        append_report(&path, &key, &[]).unwrap();
        assert!(fs::metadata(&path).is_err());

        append_report(&path, &key, &[record("cs101", 40, 30)]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("semester,year,course_id"));
        assert!(lines[1].ends_with("75.0,good"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_report_header_for_existing_empty_file() {
        let path = temp_path("campus_pulse_test_blank_file.csv");
        fs::write(&path, "").unwrap();

        let key = SemesterKey::new("Spring", 2024);
        append_report(&path, &key, &[record("cs202", 10, 5)]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("semester,"));
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
