//! Audit Repository

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;

use crate::domain::audit::{
    data::NewAuditEntry,
    records::{AuditRecord, AuditUuid},
};

/// Append-only in-memory audit storage.
///
/// Timestamps handed out by [`append`](Self::append) are strictly increasing
/// so that per-target replay order never depends on clock resolution.
#[derive(Debug, Default)]
pub(crate) struct InMemoryAuditRepository {
    entries: Vec<AuditRecord>,
    by_target: FxHashMap<String, Vec<usize>>,
    last_timestamp: Option<Timestamp>,
}

impl InMemoryAuditRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: NewAuditEntry, now: Timestamp) -> AuditRecord {
        let timestamp = self.next_timestamp(now);
        let index = self.entries.len();

        let record = AuditRecord {
            uuid: AuditUuid::new(),
            sequence: index as u64,
            action: entry.action,
            actor: entry.actor,
            target: entry.target,
            reason: entry.reason,
            timestamp,
            details: entry.details,
        };

        self.by_target
            .entry(record.target.clone())
            .or_default()
            .push(index);

        self.entries.push(record.clone());
        self.last_timestamp = Some(timestamp);

        record
    }

    /// The most recent `limit` entries for `target`, oldest first.
    pub(crate) fn list_for_target(&self, target: &str, limit: usize) -> Vec<AuditRecord> {
        let Some(indices) = self.by_target.get(target) else {
            return Vec::new();
        };

        let skip = indices.len().saturating_sub(limit);

        indices
            .iter()
            .skip(skip)
            .filter_map(|index| self.entries.get(*index))
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn next_timestamp(&self, now: Timestamp) -> Timestamp {
        match self.last_timestamp {
            Some(last) if now <= last => last
                .checked_add(SignedDuration::from_nanos(1))
                .unwrap_or(last),
            _ => now,
        }
    }
}
