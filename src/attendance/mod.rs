//! Per-semester attendance aggregation and risk grading.

pub mod aggregate;
pub mod grade;
pub mod types;

pub use grade::{Tier, TierSummary};
pub use types::{AttendanceRecord, SemesterBucket, SemesterKey};
