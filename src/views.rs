//! Fetch cycles behind the timetable and attendance dashboards.
//!
//! Each view owns a [`Slot`] so that at most one fetch is outstanding and a
//! late response never overwrites a fresher snapshot. Only the remote call
//! suspends; grid building, grouping and grading run synchronously after it.

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use crate::attendance::aggregate::{from_payload, select, select_default};
use crate::attendance::grade::{TierSummary, summarize};
use crate::attendance::types::{AttendanceRecord, SemesterBucket, SemesterKey};
use crate::error::{CampusError, CampusResult};
use crate::fetch::unauthorized;
use crate::loader::Slot;
use crate::schedule::catalog::Catalog;
use crate::schedule::grid;
use crate::schedule::parser::normalize_all;
use crate::schedule::types::Grid;
use crate::services::campus_api::{CampusApi, TeacherProfile};
use crate::session::Identity;

/// Where the displayed grid came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSource {
    Remote,
    Synthetic,
}

/// A built grid together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableSnapshot {
    pub grid: Grid,
    pub source: GridSource,
}

pub struct TimetableView {
    catalog: Catalog,
    slot: Slot<TimetableSnapshot>,
}

impl TimetableView {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            slot: Slot::new(),
        }
    }

    /// Fetches the timetable and swaps in a freshly built grid.
    ///
    /// A failed or empty-bodied fetch falls back to a grid synthesized with
    /// `rng`. Returns `Ok(None)` when another refresh is pending or this one
    /// was invalidated mid-flight.
    ///
    /// # Errors
    ///
    /// [`CampusError::Unauthorized`] when the source rejects the credential;
    /// no grid is built and the previous snapshot stays in place.
    #[tracing::instrument(skip_all)]
    pub async fn refresh<A, R>(
        &self,
        api: &A,
        rng: &mut R,
    ) -> CampusResult<Option<Arc<TimetableSnapshot>>>
    where
        A: CampusApi + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(ticket) = self.slot.begin() else {
            return Ok(None);
        };

        let records = match api.timetable().await {
            Ok(Some(entries)) => Some(normalize_all(entries)),
            Ok(None) => {
                warn!("Timetable response had no data, using generated schedule");
                None
            }
            Err(e) => {
                if let Some(denied) = unauthorized(&e) {
                    warn!(error = %denied, "Timetable request rejected");
                    ticket.abandon();
                    return Err(denied.clone());
                }
                warn!(error = %e, "Failed to fetch timetable, using generated schedule");
                None
            }
        };

        let source = if records.is_some() {
            GridSource::Remote
        } else {
            GridSource::Synthetic
        };
        let grid = grid::build(&self.catalog, records.as_deref(), rng);
        info!(?source, "Timetable grid built");

        if ticket.commit(TimetableSnapshot { grid, source }) {
            Ok(self.slot.current())
        } else {
            Ok(None)
        }
    }

    /// Loads the teacher profile header, defaulting every field on failure.
    pub async fn profile<A: CampusApi + ?Sized>(api: &A) -> TeacherProfile {
        match api.teacher_profile().await {
            Ok(raw) => raw.into(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch teacher profile, using defaults");
                TeacherProfile::default()
            }
        }
    }

    pub fn current(&self) -> Option<Arc<TimetableSnapshot>> {
        self.slot.current()
    }

    /// Tears down any in-flight refresh; its result will be discarded.
    pub fn invalidate(&self) {
        self.slot.invalidate();
    }
}

/// Grouped attendance for one student, as last fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSnapshot {
    pub buckets: Vec<SemesterBucket>,
}

impl AttendanceSnapshot {
    pub fn default_key(&self) -> Option<&SemesterKey> {
        select_default(&self.buckets)
    }

    /// Records of `key`, or of the default semester when `key` is `None`.
    pub fn records(&self, key: Option<&SemesterKey>) -> &[AttendanceRecord] {
        match key.or_else(|| self.default_key()) {
            Some(key) => select(&self.buckets, key),
            None => &[],
        }
    }

    pub fn summary(&self, key: Option<&SemesterKey>) -> TierSummary {
        summarize(self.records(key))
    }
}

#[derive(Default)]
pub struct AttendanceView {
    slot: Slot<AttendanceSnapshot>,
}

impl AttendanceView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches and groups attendance for the identity's student id.
    ///
    /// `Ok(None)` means another refresh is pending or this one went stale.
    ///
    /// # Errors
    ///
    /// [`CampusError::Unauthorized`] without a student id or when the source
    /// rejects the credential, and [`CampusError::RemoteFailure`] carrying the message to show when the
    /// fetch fails or the source reports `success = false`.
    #[tracing::instrument(skip_all, fields(student_id = identity.user_id.as_deref().unwrap_or("")))]
    pub async fn refresh<A: CampusApi + ?Sized>(
        &self,
        api: &A,
        identity: &Identity,
    ) -> CampusResult<Option<Arc<AttendanceSnapshot>>> {
        let student_id = identity
            .user_id
            .as_deref()
            .ok_or_else(|| CampusError::Unauthorized("Student ID not found".into()))?;

        let Some(ticket) = self.slot.begin() else {
            return Ok(None);
        };

        let payload = match api.attendance(student_id).await {
            Ok(envelope) => envelope.into_result(),
            Err(e) => Err(unauthorized(&e)
                .cloned()
                .unwrap_or_else(|| CampusError::remote("Failed to fetch attendance", &e))),
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Attendance unavailable");
                ticket.abandon();
                return Err(e);
            }
        };

        let snapshot = AttendanceSnapshot {
            buckets: from_payload(&payload),
        };
        info!(semesters = snapshot.buckets.len(), "Attendance loaded");

        if ticket.commit(snapshot) {
            Ok(self.slot.current())
        } else {
            Ok(None)
        }
    }

    pub fn current(&self) -> Option<Arc<AttendanceSnapshot>> {
        self.slot.current()
    }

    pub fn invalidate(&self) {
        self.slot.invalidate();
    }
}
