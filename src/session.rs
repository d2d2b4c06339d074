// Per-conversation context object, passed explicitly to collaborators so
// several conversations can be tracked side by side without shared state.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commit::{CommitState, TrackerCommit, TrackerEvent};
use crate::inject;
use crate::parser::{ParsedResponse, parse_response};
use crate::settings::TrackerSettings;
use crate::snapshot::TrackerSnapshot;
use crate::store::MetadataStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
pub struct ConversationId(String);

impl ConversationId {
    /// Mint an id when the host does not supply one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

pub struct TrackerSession {
    id: ConversationId,
    pub settings: TrackerSettings,
    commit: TrackerCommit,
    dirty: bool,
}

impl TrackerSession {
    pub fn new(id: ConversationId, settings: TrackerSettings) -> Self {
        Self {
            id,
            settings,
            commit: TrackerCommit::new(),
            dirty: false,
        }
    }

    /// Restore a session from the store, falling back to a fresh one when
    /// nothing is persisted or the load fails (best-effort persistence).
    pub async fn load<S: MetadataStore>(
        id: ConversationId,
        settings: TrackerSettings,
        store: &S,
    ) -> Self {
        let commit = match store.load(&id).await {
            Ok(Some(record)) => TrackerCommit::from_record(record),
            Ok(None) => TrackerCommit::new(),
            Err(err) => {
                log::warn!("failed to load tracker record for {id}: {err}");
                TrackerCommit::new()
            }
        };
        Self {
            id,
            settings,
            commit,
            dirty: false,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn commit(&self) -> &TrackerCommit {
        &self.commit
    }

    /// Advance the commit machine with one host event.
    pub fn handle(&mut self, event: TrackerEvent) -> CommitState {
        self.dirty = true;
        self.commit.handle(event)
    }

    /// Parse a finished reply and feed the result to the commit machine in
    /// one step. Returns the parse so callers can render the cleaned text.
    pub fn absorb_response(
        &mut self,
        message_id: u64,
        swipe_index: u32,
        raw_text: &str,
    ) -> ParsedResponse {
        let parsed = parse_response(raw_text);
        self.handle(TrackerEvent::Completed {
            message_id,
            swipe_index,
            snapshot: parsed.sections.clone(),
        });
        parsed
    }

    pub fn snapshot_for_swipe(&self, message_id: u64, index: u32) -> Option<&TrackerSnapshot> {
        self.commit.snapshot_for_swipe(message_id, index)
    }

    /// The prompt block to splice into the next generation request, or None
    /// while the tracker is disabled, suppressed, or has nothing committed.
    pub fn injection_block(&self) -> Option<String> {
        if !self.settings.enabled || self.commit.is_suppressed() {
            return None;
        }
        let committed = self.commit.committed()?;
        inject::render_injection(committed, &self.settings)
    }

    /// Write the current record to the store. Failures are logged and the
    /// session keeps working on in-memory state.
    pub async fn persist<S: MetadataStore>(&mut self, store: &S) {
        if !self.dirty {
            return;
        }
        match store.save(&self.id, &self.commit.to_record()).await {
            Ok(()) => self.dirty = false,
            Err(err) => log::warn!("failed to persist tracker record for {}: {err}", self.id),
        }
    }
}
