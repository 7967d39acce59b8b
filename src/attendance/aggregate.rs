//! Grouping attendance records into semester buckets and picking the one to show.

use super::types::{AttendanceRecord, SemesterBucket, SemesterKey, SemesterPayload};
use std::collections::HashMap;
use tracing::debug;

/// Insertion-ordered bucket list with a key index.
#[derive(Default)]
struct Buckets {
    list: Vec<SemesterBucket>,
    index: HashMap<SemesterKey, usize>,
}

impl Buckets {
    fn bucket_mut(&mut self, key: &SemesterKey) -> &mut SemesterBucket {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.list.push(SemesterBucket {
                    key: key.clone(),
                    records: Vec::new(),
                });
                self.index.insert(key.clone(), self.list.len() - 1);
                self.list.len() - 1
            }
        };
        &mut self.list[slot]
    }
}

/// Groups records by (semester, year), keeping first-seen key order and the
/// arrival order of records within each bucket.
pub fn group<I>(records: I) -> Vec<SemesterBucket>
where
    I: IntoIterator<Item = (SemesterKey, AttendanceRecord)>,
{
    let mut buckets = Buckets::default();
    for (key, record) in records {
        buckets.bucket_mut(&key).records.push(record);
    }
    buckets.list
}

/// Groups the remote semester blocks.
///
/// Every block yields a bucket, even one with no records; two blocks with the
/// same key share a bucket.
pub fn from_payload(payload: &[SemesterPayload]) -> Vec<SemesterBucket> {
    let mut buckets = Buckets::default();
    for block in payload {
        let records = block.normalized_records();
        buckets.bucket_mut(&block.key()).records.extend(records);
    }
    debug!(
        blocks = payload.len(),
        buckets = buckets.list.len(),
        "Attendance grouped"
    );
    buckets.list
}

/// The key of the first bucket, used to seed the displayed semester.
pub fn select_default(buckets: &[SemesterBucket]) -> Option<&SemesterKey> {
    buckets.first().map(|b| &b.key)
}

/// The records of the bucket matching `key`, or nothing when it is absent.
pub fn select<'a>(buckets: &'a [SemesterBucket], key: &SemesterKey) -> &'a [AttendanceRecord] {
    buckets
        .iter()
        .find(|b| &b.key == key)
        .map_or(&[], |b| b.records.as_slice())
}
