use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::store::default_data_dir;

// Define a structure to hold tracker settings with serialization and
// deserialization capabilities.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackerSettings {
    pub enabled: bool, // Master switch for the whole tracker pipeline.
    pub track_user_stats: bool, // Per-section injection toggles.
    pub track_info_box: bool,
    pub track_character_thoughts: bool,
    pub track_action_suggestions: bool,
    pub extraction_batch_size: usize, // Messages per batch during history extraction.
    pub extraction_batch_delay_ms: u64, // Fixed settle delay between batches.
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            enabled: true, // Tracking on by default.
            track_user_stats: true,
            track_info_box: true,
            track_character_thoughts: true,
            track_action_suggestions: true,
            extraction_batch_size: 5,
            extraction_batch_delay_ms: 500,
        }
    }
}

impl TrackerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    // Load settings from the default file path.
    pub fn load() -> io::Result<Self> {
        Self::load_from_file(Self::default_path()?)
    }

    // Save current settings to the default file path.
    pub fn save(&self) -> io::Result<()> {
        self.save_to_file(Self::default_path()?)
    }

    fn default_path() -> io::Result<PathBuf> {
        default_data_dir()
            .map(|dir| dir.join("settings.json"))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    pub fn tracks(&self, kind: crate::snapshot::SectionKind) -> bool {
        use crate::snapshot::SectionKind;
        match kind {
            SectionKind::UserStats => self.track_user_stats,
            SectionKind::InfoBox => self.track_info_box,
            SectionKind::CharacterThoughts => self.track_character_thoughts,
            SectionKind::ActionSuggestions => self.track_action_suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = TrackerSettings {
            track_info_box: false,
            extraction_batch_size: 2,
            ..Default::default()
        };
        settings.save_to_file(&path).unwrap();
        let loaded = TrackerSettings::load_from_file(&path).unwrap();
        assert!(!loaded.track_info_box);
        assert_eq!(loaded.extraction_batch_size, 2);
        assert!(loaded.enabled);
    }
}
