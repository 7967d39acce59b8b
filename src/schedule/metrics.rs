//! Read-only metrics derived from a built grid and a reference instant.
//!
//! Nothing here is cached: each call rescans the grid against the `now` it is given.

use super::catalog::{Day, TimeSlot};
use super::types::{Grid, Session, SessionKind};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

/// Number of teaching (non-break) sessions across the whole week.
pub fn teaching_load(grid: &Grid) -> usize {
    grid.iter()
        .filter(|(_, _, cell)| cell.is_some_and(|s| s.kind.is_teaching()))
        .count()
}

/// Teaching sessions per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub lecture: usize,
    pub lab: usize,
    pub tutorial: usize,
}

pub fn load_by_kind(grid: &Grid) -> KindCounts {
    let mut counts = KindCounts::default();
    for (_, _, cell) in grid.iter() {
        match cell.map(|s| s.kind) {
            Some(SessionKind::Lecture) => counts.lecture += 1,
            Some(SessionKind::Lab) => counts.lab += 1,
            Some(SessionKind::Tutorial) => counts.tutorial += 1,
            Some(SessionKind::Break) | None => {}
        }
    }
    counts
}

/// The first teaching session on `day` starting strictly after `now`.
///
/// Only `day`'s row is scanned; there is no roll-over to the next day.
pub fn next_session(grid: &Grid, day: Day, now: NaiveTime) -> Option<(&TimeSlot, &Session)> {
    let now_minutes = now.hour() * 60 + now.minute();

    grid.row(day)?.find_map(|(slot, cell)| {
        let session = cell.filter(|s| s.kind.is_teaching())?;
        (u32::from(slot.start_minutes()) > now_minutes).then_some((slot, session))
    })
}

/// [`next_session`] for the weekday of `now`, with weekends mapped to Monday.
pub fn next_session_at(grid: &Grid, now: NaiveDateTime) -> Option<(&TimeSlot, &Session)> {
    next_session(grid, Day::from_weekday(now.weekday()), now.time())
}

/// Dashboard header figures for a grid at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub day: Day,
    pub teaching_load: usize,
    pub by_kind: KindCounts,
    pub next_slot: Option<String>,
    pub next_session: Option<Session>,
}

impl ScheduleSummary {
    pub fn compute(grid: &Grid, now: NaiveDateTime) -> Self {
        let next = next_session_at(grid, now);
        ScheduleSummary {
            day: Day::from_weekday(now.weekday()),
            teaching_load: teaching_load(grid),
            by_kind: load_by_kind(grid),
            next_slot: next.map(|(slot, _)| slot.label().to_string()),
            next_session: next.map(|(_, session)| session.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::catalog::Catalog;
    use crate::schedule::grid::from_records;
    use crate::schedule::types::SessionRecord;
    use chrono::NaiveDate;

    fn record(day: &str, slot: &str, id: &str, kind: SessionKind) -> SessionRecord {
        SessionRecord {
            day: day.to_string(),
            time_slot: slot.to_string(),
            session: Session {
                id: id.to_string(),
                subject: "CS202".to_string(),
                audience: "CSE-B".to_string(),
                location: "Room 104".to_string(),
                kind,
            },
        }
    }

    fn sample_grid() -> Grid {
        from_records(
            &Catalog::standard(),
            &[
                record("Monday", "9:00 - 9:50", "m1", SessionKind::Lecture),
                record("Monday", "11:00 - 11:50", "m3", SessionKind::Lab),
                record("Monday", "1:00 - 1:50", "lunch", SessionKind::Break),
                record("Monday", "3:00 - 3:50", "m7", SessionKind::Tutorial),
                record("Wednesday", "10:00 - 10:50", "w2", SessionKind::Lecture),
            ],
        )
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_teaching_load_excludes_breaks() {
        let grid = sample_grid();
        assert_eq!(teaching_load(&grid), 4);
        assert_eq!(
            load_by_kind(&grid),
            KindCounts {
                lecture: 2,
                lab: 1,
                tutorial: 1
            }
        );
    }

    #[test]
    fn test_next_session_is_strictly_after_now() {
        let grid = sample_grid();
        let (slot, session) = next_session(&grid, Day::Monday, at(8, 30)).unwrap();
        assert_eq!(slot.label(), "9:00 - 9:50");
        assert_eq!(session.id, "m1");

        // A session starting exactly now is not "next".
        let (_, session) = next_session(&grid, Day::Monday, at(9, 0)).unwrap();
        assert_eq!(session.id, "m3");
    }

    #[test]
    fn test_next_session_skips_breaks_and_orders_afternoon() {
        let grid = sample_grid();
        let (slot, session) = next_session(&grid, Day::Monday, at(12, 10)).unwrap();
        assert_eq!(slot.label(), "3:00 - 3:50");
        assert_eq!(session.id, "m7");
    }

    #[test]
    fn test_next_session_none_after_last_slot() {
        let grid = sample_grid();
        assert!(next_session(&grid, Day::Monday, at(15, 0)).is_none());
        assert!(next_session(&grid, Day::Friday, at(7, 0)).is_none());
    }

    #[test]
    fn test_next_session_is_pure() {
        let grid = sample_grid();
        let first = next_session(&grid, Day::Wednesday, at(9, 45));
        let second = next_session(&grid, Day::Wednesday, at(9, 45));
        assert_eq!(first, second);
    }

    #[test]
    fn test_weekend_maps_to_monday() {
        let grid = sample_grid();
        // 2024-03-09 is a Saturday.
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let (_, session) = next_session_at(&grid, saturday).unwrap();
        assert_eq!(session.id, "m3");

        let summary = ScheduleSummary::compute(&grid, saturday);
        assert_eq!(summary.day, Day::Monday);
        assert_eq!(summary.teaching_load, 4);
        assert_eq!(summary.next_slot.as_deref(), Some("11:00 - 11:50"));
    }
}
