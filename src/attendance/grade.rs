use super::types::AttendanceRecord;
use serde::Serialize;
use std::fmt;

/// Lowest percentage in the good tier.
pub const GOOD_THRESHOLD: f64 = 75.0;
/// Lowest percentage in the warning tier.
pub const WARNING_THRESHOLD: f64 = 60.0;

/// Attendance risk tier of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warning,
    Critical,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Warning => "warning",
            Tier::Critical => "critical",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of classes attended, counting duty and medical leave as attended.
///
/// A record with `total = 0` is 0%.
pub fn percentage(record: &AttendanceRecord) -> f64 {
    if record.total == 0 {
        return 0.0;
    }
    let attended =
        u64::from(record.present) + u64::from(record.duty_leave) + u64::from(record.medical);
    100.0 * attended as f64 / f64::from(record.total)
}

/// Converts an attendance percentage into a tier.
///
/// | Range       | Tier     |
/// |-------------|----------|
/// | >= 75       | good     |
/// | >= 60       | warning  |
/// | < 60        | critical |
pub fn tier(p: f64) -> Tier {
    match p {
        p if p >= GOOD_THRESHOLD => Tier::Good,
        p if p >= WARNING_THRESHOLD => Tier::Warning,
        _ => Tier::Critical,
    }
}

/// Number of courses in each tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    pub good: usize,
    pub warning: usize,
    pub critical: usize,
}

impl TierSummary {
    pub fn total(&self) -> usize {
        self.good + self.warning + self.critical
    }
}

/// Tallies every record by tier. Each record lands in exactly one tier.
pub fn summarize(records: &[AttendanceRecord]) -> TierSummary {
    records
        .iter()
        .fold(TierSummary::default(), |mut summary, record| {
            match tier(percentage(record)) {
                Tier::Good => summary.good += 1,
                Tier::Warning => summary.warning += 1,
                Tier::Critical => summary.critical += 1,
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(total: u32, present: u32, absent: u32, duty_leave: u32, medical: u32) -> AttendanceRecord {
        AttendanceRecord {
            course_id: "cs101".to_string(),
            course_code: "CS101".to_string(),
            course_name: "Introduction to Programming".to_string(),
            faculty: "Dr. Rao".to_string(),
            total,
            present,
            absent,
            duty_leave,
            medical,
            absent_dates: vec![],
            present_dates: vec![],
            duty_leave_dates: vec![],
            medical_dates: vec![],
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(100.0), Tier::Good);
        assert_eq!(tier(75.0), Tier::Good);
        assert_eq!(tier(74.999), Tier::Warning);
        assert_eq!(tier(60.0), Tier::Warning);
        assert_eq!(tier(59.999), Tier::Critical);
        assert_eq!(tier(0.0), Tier::Critical);
    }

    #[test]
    fn test_percentage_counts_leave_as_attended() {
        let record = counters(40, 28, 10, 2, 0);
        assert_eq!(percentage(&record), 75.0);
        assert_eq!(tier(percentage(&record)), Tier::Good);
    }

    #[test]
    fn test_zero_total_floors_to_critical() {
        let record = counters(0, 5, 0, 3, 1);
        assert_eq!(percentage(&record), 0.0);
        assert_eq!(tier(percentage(&record)), Tier::Critical);
    }

    #[test]
    fn test_inconsistent_counters_are_tolerated() {
        // Attended exceeds total; reported as-is rather than clamped.
        let record = counters(10, 9, 0, 2, 1);
        assert_eq!(percentage(&record), 120.0);
        assert_eq!(tier(percentage(&record)), Tier::Good);
    }

    #[test]
    fn test_summarize_one_per_tier() {
        let records = vec![
            counters(40, 28, 10, 2, 0),
            counters(20, 12, 7, 1, 0),
            counters(20, 10, 10, 0, 0),
        ];
        assert_eq!(percentage(&records[1]), 65.0);
        assert_eq!(percentage(&records[2]), 50.0);

        let summary = summarize(&records);
        assert_eq!(
            summary,
            TierSummary {
                good: 1,
                warning: 1,
                critical: 1
            }
        );
        assert_eq!(summary.total(), records.len());
    }

    #[test]
    fn test_summarize_counts_zero_total_records() {
        let summary = summarize(&[counters(0, 0, 0, 0, 0), counters(0, 0, 0, 0, 0)]);
        assert_eq!(summary.critical, 2);
        assert_eq!(summary.total(), 2);
    }
}
