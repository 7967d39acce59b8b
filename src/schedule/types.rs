//! Session and grid types.

use super::catalog::{Catalog, Day, TimeSlot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Lecture,
    Lab,
    Tutorial,
    Break,
}

impl SessionKind {
    /// Kinds that count towards teaching load.
    pub const TEACHING: [SessionKind; 3] =
        [SessionKind::Lecture, SessionKind::Lab, SessionKind::Tutorial];

    pub fn is_teaching(self) -> bool {
        !matches!(self, SessionKind::Break)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Lecture => "lecture",
            SessionKind::Lab => "lab",
            SessionKind::Tutorial => "tutorial",
            SessionKind::Break => "break",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lecture" => Ok(SessionKind::Lecture),
            "lab" => Ok(SessionKind::Lab),
            "tutorial" => Ok(SessionKind::Tutorial),
            "break" => Ok(SessionKind::Break),
            other => Err(format!("unknown session type '{other}'")),
        }
    }
}

/// A unit occupying exactly one (day, slot) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub subject: String,
    /// Class or section attending.
    pub audience: String,
    pub location: String,
    pub kind: SessionKind,
}

/// A normalized input record addressed by day and slot labels.
///
/// Labels are resolved against the catalog by the grid builder, which drops
/// records that name an unknown day or slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub day: String,
    pub time_slot: String,
    pub session: Session,
}

/// A fully populated day x slot grid.
///
/// Every (day, slot) pair of the catalog has a cell; a cell is either a
/// session or empty. Grids are built once and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    catalog: Catalog,
    cells: Vec<Vec<Option<Session>>>,
}

impl Grid {
    /// A grid with every cell empty.
    pub(crate) fn empty(catalog: &Catalog) -> Grid {
        let cells = catalog
            .days()
            .iter()
            .map(|_| vec![None; catalog.slots().len()])
            .collect();
        Grid {
            catalog: catalog.clone(),
            cells,
        }
    }

    pub(crate) fn set(&mut self, day_idx: usize, slot_idx: usize, session: Option<Session>) {
        self.cells[day_idx][slot_idx] = session;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The session in a cell, or `None` when the cell is empty or off-catalog.
    pub fn cell(&self, day: Day, slot_label: &str) -> Option<&Session> {
        let day_idx = self.catalog.day_index(day)?;
        let slot_idx = self.catalog.slot_index(slot_label)?;
        self.cells[day_idx][slot_idx].as_ref()
    }

    /// Whether the grid has a cell (possibly empty) for this pair.
    pub fn contains(&self, day: Day, slot_label: &str) -> bool {
        self.catalog.day_index(day).is_some() && self.catalog.slot_index(slot_label).is_some()
    }

    /// One day's cells in slot order.
    pub fn row(&self, day: Day) -> Option<impl Iterator<Item = (&TimeSlot, Option<&Session>)>> {
        let day_idx = self.catalog.day_index(day)?;
        Some(
            self.catalog
                .slots()
                .iter()
                .zip(self.cells[day_idx].iter().map(Option::as_ref)),
        )
    }

    /// Every cell as `(day, slot, session)` in day then slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Day, &TimeSlot, Option<&Session>)> {
        self.catalog
            .days()
            .iter()
            .zip(self.cells.iter())
            .flat_map(move |(day, row)| {
                self.catalog
                    .slots()
                    .iter()
                    .zip(row.iter())
                    .map(move |(slot, cell)| (*day, slot, cell.as_ref()))
            })
    }

    /// Days to display: all of them, or only `filter` when it is in the grid.
    pub fn days_filtered(&self, filter: Option<Day>) -> Vec<Day> {
        match filter {
            Some(day) => self
                .catalog
                .days()
                .iter()
                .copied()
                .filter(|d| *d == day)
                .collect(),
            None => self.catalog.days().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_kind_parse() {
        assert_eq!("Lab".parse::<SessionKind>(), Ok(SessionKind::Lab));
        assert_eq!(" tutorial ".parse::<SessionKind>(), Ok(SessionKind::Tutorial));
        assert!("seminar".parse::<SessionKind>().is_err());
        assert!(!SessionKind::Break.is_teaching());
        assert!(SessionKind::Lecture.is_teaching());
    }

    #[test]
    fn test_empty_grid_is_total() {
        let catalog = Catalog::standard();
        let grid = Grid::empty(&catalog);
        assert_eq!(grid.iter().count(), 5 * 8);
        assert!(grid.iter().all(|(_, _, cell)| cell.is_none()));
        assert!(grid.contains(Day::Friday, "4:00 - 4:50"));
        assert!(!grid.contains(Day::Friday, "5:00 - 5:50"));
    }

    #[test]
    fn test_days_filtered() {
        let grid = Grid::empty(&Catalog::standard());
        assert_eq!(grid.days_filtered(None).len(), 5);
        assert_eq!(grid.days_filtered(Some(Day::Tuesday)), vec![Day::Tuesday]);

        let catalog = Catalog::new(&[Day::Monday], &["9:00 - 9:50"], None).unwrap();
        let grid = Grid::empty(&catalog);
        assert!(grid.days_filtered(Some(Day::Friday)).is_empty());
    }
}
