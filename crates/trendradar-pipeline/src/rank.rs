//! Final ordering of enriched records.

use trendradar_core::Record;

/// Orders records by score, highest first. Equal scores keep input order
/// (`Record::position`), whatever order the records arrive in.
#[must_use]
pub fn rank(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.position.cmp(&b.position))
    });
    records
}
