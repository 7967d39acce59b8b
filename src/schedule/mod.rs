//! Weekly teaching schedule: catalogs, grid construction and live metrics.
//!
//! A grid is built once per fetch from normalized records ([`parser`]) or,
//! when there is no data, from the seeded synthetic fallback ([`grid::synthesize`]).

pub mod catalog;
pub mod grid;
pub mod metrics;
pub mod parser;
pub mod types;

pub use catalog::{Catalog, Day, TimeSlot};
pub use types::{Grid, Session, SessionKind, SessionRecord};
