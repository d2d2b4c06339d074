// Best-effort persistence of per-conversation tracker records. One pretty
// printed JSON file per conversation id under the data directory.

use std::io;
use std::path::PathBuf;

use crate::commit::ConversationRecord;
use crate::error::PersistenceError;
use crate::session::ConversationId;

pub fn default_data_dir() -> Option<PathBuf> {
    dir::home_dir().map(|home| home.join("narrative_tracker").join("data"))
}

pub trait MetadataStore {
    async fn load(&self, id: &ConversationId)
    -> Result<Option<ConversationRecord>, PersistenceError>;
    async fn save(
        &self,
        id: &ConversationId,
        record: &ConversationRecord,
    ) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the default data directory.
    pub fn in_data_dir() -> Result<Self, PersistenceError> {
        default_data_dir()
            .map(|dir| Self::new(dir.join("conversations")))
            .ok_or(PersistenceError::NoDataDir)
    }

    fn path_for(&self, id: &ConversationId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

impl MetadataStore for FileStore {
    async fn load(
        &self,
        id: &ConversationId,
    ) -> Result<Option<ConversationRecord>, PersistenceError> {
        let path = self.path_for(id);
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    async fn save(
        &self,
        id: &ConversationId,
        record: &ConversationRecord,
    ) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let data = serde_json::to_string_pretty(record)?;
        tokio::fs::write(self.path_for(id), data).await?;
        Ok(())
    }
}
