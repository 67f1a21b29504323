//! Events Repository

use dashmap::DashMap;

use crate::domain::events::records::{EventRecord, EventUuid};

#[derive(Debug, Default)]
pub(crate) struct InMemoryEventsRepository {
    events: DashMap<EventUuid, EventRecord>,
}

impl InMemoryEventsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, event: EventUuid) -> Option<EventRecord> {
        self.events.get(&event).map(|entry| entry.value().clone())
    }

    pub(crate) fn insert(&self, event: EventRecord) {
        self.events.insert(event.uuid, event);
    }

    /// Replaces an existing event. Returns `false` when the event is unknown.
    pub(crate) fn replace(&self, event: EventRecord) -> bool {
        match self.events.get_mut(&event.uuid) {
            Some(mut entry) => {
                *entry = event;
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}
