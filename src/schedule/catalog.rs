//! Fixed day and time-slot catalogs that form the grid axes.

use anyhow::{Result, bail};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Slot labels of the standard teaching day, in chronological order.
pub const TIME_SLOTS: &[&str] = &[
    "9:00 - 9:50",
    "10:00 - 10:50",
    "11:00 - 11:50",
    "12:00 - 12:50",
    "1:00 - 1:50",
    "2:00 - 2:50",
    "3:00 - 3:50",
    "4:00 - 4:50",
];

/// The slot reserved for lunch in the standard catalog.
pub const LUNCH_SLOT: &str = "1:00 - 1:50";

/// Section labels used for synthetic subjects and audiences.
pub const SAMPLE_CLASSES: &[&str] = &["CSE-A", "CSE-B", "CSE-C", "CSE-D", "AID-A", "AID-B"];

/// Room numbers used for synthetic locations.
pub const SAMPLE_ROOMS: RangeInclusive<u16> = 101..=110;

/// Labels without a meridiem: a start hour below this is an afternoon hour.
const AFTERNOON_BEFORE_HOUR: u16 = 8;

/// A weekday that can appear as a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }

    /// Parses a day label case-insensitively. Weekend names are not days.
    pub fn parse(label: &str) -> Option<Day> {
        let label = label.trim();
        Day::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(label))
    }

    /// Maps a calendar weekday onto a grid row; Saturday and Sunday become Monday.
    pub fn from_weekday(weekday: Weekday) -> Day {
        match weekday {
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Mon | Weekday::Sat | Weekday::Sun => Day::Monday,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical form used to compare slot labels: no whitespace, ASCII dashes.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

/// One catalog entry, e.g. `"9:00 - 9:50"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    label: String,
    start_minutes: u16,
    end_minutes: u16,
}

impl TimeSlot {
    /// Parses a `"H:MM - H:MM"` label into a slot.
    pub fn parse(label: &str) -> Result<TimeSlot> {
        let normalized = normalize_label(label);
        let Some((start, end)) = normalized.split_once('-') else {
            bail!("time slot '{label}' has no start/end separator");
        };
        let start_minutes = parse_clock(start)?;
        let end_minutes = parse_clock(end)?;
        if end_minutes <= start_minutes {
            bail!("time slot '{label}' ends before it starts");
        }

        Ok(TimeSlot {
            label: label.trim().to_string(),
            start_minutes,
            end_minutes,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start time as minutes since midnight.
    pub fn start_minutes(&self) -> u16 {
        self.start_minutes
    }

    pub fn end_minutes(&self) -> u16 {
        self.end_minutes
    }

    /// Whether `label` names this slot once dash and whitespace variants are ignored.
    pub fn matches(&self, label: &str) -> bool {
        normalize_label(&self.label) == normalize_label(label)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn parse_clock(text: &str) -> Result<u16> {
    let Some((h, m)) = text.split_once(':') else {
        bail!("'{text}' is not an H:MM time");
    };
    let mut hours: u16 = h.parse()?;
    let minutes: u16 = m.parse()?;
    if hours > 23 || minutes > 59 {
        bail!("'{text}' is out of range");
    }
    if hours < AFTERNOON_BEFORE_HOUR {
        hours += 12;
    }
    Ok(hours * 60 + minutes)
}

/// The axes of a grid: ordered days, ordered slots and the designated lunch slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    days: Vec<Day>,
    slots: Vec<TimeSlot>,
    lunch: Option<usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate or out-of-order slots.
    ///
    /// Days are deduplicated and put in weekday order.
    pub fn new(days: &[Day], slot_labels: &[&str], lunch: Option<&str>) -> Result<Catalog> {
        let mut days = days.to_vec();
        days.sort();
        days.dedup();

        let slots = slot_labels
            .iter()
            .map(|label| TimeSlot::parse(label))
            .collect::<Result<Vec<_>>>()?;

        for pair in slots.windows(2) {
            if pair[1].start_minutes <= pair[0].start_minutes {
                bail!(
                    "time slots '{}' and '{}' are not in strictly increasing order",
                    pair[0].label,
                    pair[1].label
                );
            }
        }

        let lunch = match lunch {
            Some(label) => match slots.iter().position(|s| s.matches(label)) {
                Some(idx) => Some(idx),
                None => bail!("lunch slot '{label}' is not in the catalog"),
            },
            None => None,
        };

        Ok(Catalog { days, slots, lunch })
    }

    /// Monday to Friday with the eight standard slots and the 1:00 lunch break.
    pub fn standard() -> Catalog {
        let slots = TIME_SLOTS
            .iter()
            .map(|label| TimeSlot::parse(label))
            .collect::<Result<Vec<_>>>()
            .unwrap_or_default();
        let lunch = slots.iter().position(|s| s.matches(LUNCH_SLOT));

        Catalog {
            days: Day::ALL.to_vec(),
            slots,
            lunch,
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn lunch_slot(&self) -> Option<&TimeSlot> {
        self.lunch.map(|idx| &self.slots[idx])
    }

    pub(crate) fn is_lunch(&self, slot_idx: usize) -> bool {
        self.lunch == Some(slot_idx)
    }

    pub fn day_index(&self, day: Day) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    pub fn slot_index(&self, label: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.matches(label))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.days().len(), 5);
        assert_eq!(catalog.slots().len(), 8);
        assert_eq!(catalog.lunch_slot().map(TimeSlot::label), Some(LUNCH_SLOT));
    }

    #[test]
    fn test_afternoon_labels_sort_after_morning() {
        let catalog = Catalog::standard();
        let starts: Vec<u16> = catalog.slots().iter().map(TimeSlot::start_minutes).collect();
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(catalog.slots()[4].start_minutes(), 13 * 60);
    }

    #[test]
    fn test_slot_label_variants_match() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.slot_index("9:00\u{2013}9:50"), Some(0));
        assert_eq!(catalog.slot_index(" 10:00-10:50 "), Some(1));
        assert_eq!(catalog.slot_index("5:00 - 5:50"), None);
    }

    #[test]
    fn test_day_parse_and_weekend_normalization() {
        assert_eq!(Day::parse("wednesday"), Some(Day::Wednesday));
        assert_eq!(Day::parse("Saturday"), None);
        assert_eq!(Day::from_weekday(Weekday::Sat), Day::Monday);
        assert_eq!(Day::from_weekday(Weekday::Sun), Day::Monday);
        assert_eq!(Day::from_weekday(Weekday::Thu), Day::Thursday);
    }

    #[test]
    fn test_catalog_rejects_unordered_slots() {
        let result = Catalog::new(&Day::ALL, &["10:00 - 10:50", "9:00 - 9:50"], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_rejects_unknown_lunch() {
        let result = Catalog::new(&Day::ALL, &["9:00 - 9:50"], Some("1:00 - 1:50"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_slot_labels() {
        assert!(TimeSlot::parse("nine to ten").is_err());
        assert!(TimeSlot::parse("9:00 - 8:50").is_err());
        assert!(TimeSlot::parse("9:75 - 9:90").is_err());
    }
}
