// Tracker commit state machine. Decides, per conversation, which snapshot is
// committed (seeds the next prompt) versus merely displayed, across
// new-message / swipe / abort / suppression events. The host wiring stays
// outside: callers advance the machine with `handle` and read the result.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::snapshot::TrackerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    /// Nothing extracted yet for this conversation.
    NoData,
    /// LastGenerated holds a snapshot not yet committed.
    Displayed,
    /// Committed holds the snapshot that seeds the next generation.
    Committed,
}

#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// A generation finished and its reply was parsed. The snapshot may be
    /// all-null; explicit "no data" still overwrites LastGenerated.
    Completed {
        message_id: u64,
        swipe_index: u32,
        snapshot: TrackerSnapshot,
    },
    /// The host aborted the in-flight generation. Nothing changes.
    Aborted,
    /// The user sent a new message. Emitted at generation start so the
    /// promotion lands before the prompt build reads Committed.
    NewMessage,
    /// The user asked for a fresh alternate response. Its result is
    /// speculative and must not be promoted when it completes.
    SwipeRequested { message_id: u64, index: u32 },
    /// The user navigated to an already-generated alternate. Display only.
    SwipeNavigated { message_id: u64, index: u32 },
    /// A plot-progression or suggestion-only generation started; tracker
    /// injection is off and completions are ignored until it ends.
    SuppressionStarted,
    SuppressionEnded,
}

/// Per-message map from swipe index to the snapshot that alternate produced.
/// Entries are overwritten wholesale on regeneration, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwipeLedger {
    entries: BTreeMap<u32, TrackerSnapshot>,
}

impl SwipeLedger {
    pub fn record(&mut self, index: u32, snapshot: TrackerSnapshot) {
        self.entries.insert(index, snapshot);
    }

    pub fn get(&self, index: u32) -> Option<&TrackerSnapshot> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The persisted per-conversation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub committed: Option<TrackerSnapshot>,
    #[serde(default)]
    pub messages: BTreeMap<u64, SwipeLedger>,
    pub saved_at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct TrackerCommit {
    committed: Option<TrackerSnapshot>,
    last_generated: Option<TrackerSnapshot>,
    ledgers: BTreeMap<u64, SwipeLedger>,
    pending_swipe: bool,
    suppressed: bool,
}

impl TrackerCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: ConversationRecord) -> Self {
        Self {
            committed: record.committed,
            last_generated: None,
            ledgers: record.messages,
            pending_swipe: false,
            suppressed: false,
        }
    }

    pub fn to_record(&self) -> ConversationRecord {
        ConversationRecord {
            committed: self.committed.clone(),
            messages: self.ledgers.clone(),
            saved_at: Local::now(),
        }
    }

    pub fn committed(&self) -> Option<&TrackerSnapshot> {
        self.committed.as_ref()
    }

    pub fn last_generated(&self) -> Option<&TrackerSnapshot> {
        self.last_generated.as_ref()
    }

    pub fn snapshot_for_swipe(&self, message_id: u64, index: u32) -> Option<&TrackerSnapshot> {
        self.ledgers.get(&message_id).and_then(|l| l.get(index))
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn state(&self) -> CommitState {
        match (&self.committed, &self.last_generated) {
            (None, None) => CommitState::NoData,
            (None, Some(_)) => CommitState::Displayed,
            (Some(committed), Some(last)) if committed != last => CommitState::Displayed,
            (Some(_), _) => CommitState::Committed,
        }
    }

    /// Advance the machine with one host-delivered event and return the
    /// resulting state.
    pub fn handle(&mut self, event: TrackerEvent) -> CommitState {
        match event {
            TrackerEvent::Completed {
                message_id,
                swipe_index,
                snapshot,
            } => self.on_completed(message_id, swipe_index, snapshot),
            TrackerEvent::Aborted => {
                // No partial promotion; a pending swipe stays pending until
                // an actual completion clears it.
                log::debug!("generation aborted, tracker state untouched");
            }
            TrackerEvent::NewMessage => {
                // A new user message is an implicit commitment to the
                // preceding turn's state, whatever it was.
                self.committed = self.last_generated.clone();
                log::debug!("new message: promoted last generated snapshot");
            }
            TrackerEvent::SwipeRequested { message_id, index } => {
                self.pending_swipe = true;
                log::debug!("swipe requested for message {message_id} index {index}");
            }
            TrackerEvent::SwipeNavigated { message_id, index } => {
                if let Some(snapshot) = self.snapshot_for_swipe(message_id, index).cloned() {
                    self.last_generated = Some(snapshot);
                    log::debug!("restored swipe {index} of message {message_id} for display");
                }
            }
            TrackerEvent::SuppressionStarted => self.suppressed = true,
            TrackerEvent::SuppressionEnded => self.suppressed = false,
        }
        self.state()
    }

    fn on_completed(&mut self, message_id: u64, swipe_index: u32, snapshot: TrackerSnapshot) {
        if self.suppressed {
            log::debug!("completion ignored while tracker injection is suppressed");
            return;
        }
        self.last_generated = Some(snapshot.clone());
        self.ledgers
            .entry(message_id)
            .or_default()
            .record(swipe_index, snapshot);

        // First successful parse auto-promotes, unless this completion came
        // from a swipe (speculative until the user acts on it).
        let committed_empty = self.committed.as_ref().is_none_or(|s| s.is_empty());
        if committed_empty && !self.pending_swipe {
            self.committed = self.last_generated.clone();
            log::debug!("first parse for conversation, auto-promoted");
        }
        self.pending_swipe = false;
    }
}
