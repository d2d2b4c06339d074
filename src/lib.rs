pub mod commit;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod inject;
pub mod logging;
pub mod parser;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod store;

// Re-export commonly used items for easier access
pub use commit::{CommitState, ConversationRecord, SwipeLedger, TrackerCommit, TrackerEvent};
pub use error::{GenerationError, PersistenceError, Result, TrackerError};
pub use extraction::{HistoryExtractor, RetryDecision, RetryPrompter};
pub use generation::{GenerationClient, GenerationKind, GenerationRequest};
pub use parser::{ParsedResponse, parse_response};
pub use session::{ConversationId, TrackerSession};
pub use settings::TrackerSettings;
pub use snapshot::{SectionKind, TrackerSnapshot};
pub use store::{FileStore, MetadataStore};
