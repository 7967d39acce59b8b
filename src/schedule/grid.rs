//! Grid construction from authoritative records or the synthetic fallback.

use super::catalog::{Catalog, Day, SAMPLE_CLASSES, SAMPLE_ROOMS};
use super::types::{Grid, Session, SessionKind, SessionRecord};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

/// Probability that a non-lunch synthetic cell holds a session.
pub const SYNTHETIC_FILL_PROBABILITY: f64 = 0.3;

/// Builds a grid from `records`, or synthesizes one with `rng` when there are none.
///
/// `None` means the upstream had no data (or failed); `Some(vec![])` is an
/// authoritative empty schedule and yields an all-empty grid.
pub fn build<R: Rng + ?Sized>(
    catalog: &Catalog,
    records: Option<&[SessionRecord]>,
    rng: &mut R,
) -> Grid {
    match records {
        Some(records) => from_records(catalog, records),
        None => synthesize(catalog, rng),
    }
}

/// Writes each record into its cell, later records overwriting earlier ones.
///
/// Records naming a day or slot outside the catalog are dropped.
pub fn from_records(catalog: &Catalog, records: &[SessionRecord]) -> Grid {
    let mut grid = Grid::empty(catalog);
    let mut dropped = 0usize;

    for record in records {
        let day_idx = Day::parse(&record.day).and_then(|d| catalog.day_index(d));
        let slot_idx = catalog.slot_index(&record.time_slot);

        match (day_idx, slot_idx) {
            (Some(day_idx), Some(slot_idx)) => {
                grid.set(day_idx, slot_idx, Some(record.session.clone()));
            }
            _ => {
                dropped += 1;
                warn!(
                    day = %record.day,
                    time_slot = %record.time_slot,
                    session_id = %record.session.id,
                    "Dropping session outside the day/slot catalog"
                );
            }
        }
    }

    debug!(records = records.len(), dropped, "Grid built from records");
    grid
}

/// Fills a grid with plausible placeholder sessions.
///
/// The lunch slot always holds a break; every other cell holds a teaching
/// session with probability [`SYNTHETIC_FILL_PROBABILITY`].
pub fn synthesize<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Grid {
    let mut grid = Grid::empty(catalog);

    for (day_idx, day) in catalog.days().iter().enumerate() {
        for (slot_idx, slot) in catalog.slots().iter().enumerate() {
            let session = if catalog.is_lunch(slot_idx) {
                Some(lunch_break())
            } else if rng.gen_bool(SYNTHETIC_FILL_PROBABILITY) {
                Some(random_session(rng, &format!("{day}-{}", slot.label())))
            } else {
                None
            };
            grid.set(day_idx, slot_idx, session);
        }
    }

    grid
}

fn lunch_break() -> Session {
    Session {
        id: "BREAK".to_string(),
        subject: "Lunch Break".to_string(),
        audience: String::new(),
        location: String::new(),
        kind: SessionKind::Break,
    }
}

fn random_session<R: Rng + ?Sized>(rng: &mut R, id: &str) -> Session {
    let subject = SAMPLE_CLASSES.choose(rng).copied().unwrap_or_default();
    let audience = SAMPLE_CLASSES.choose(rng).copied().unwrap_or_default();
    let room = rng.gen_range(SAMPLE_ROOMS);
    let kind = SessionKind::TEACHING
        .choose(rng)
        .copied()
        .unwrap_or(SessionKind::Lecture);
    let location = match kind {
        SessionKind::Lab => format!("Lab {room}"),
        _ => format!("Room {room}"),
    };

    Session {
        id: id.to_string(),
        subject: subject.to_string(),
        audience: audience.to_string(),
        location,
        kind,
    }
}
