use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// One extracted tracker state. Immutable once created: holders replace it
/// wholesale, never mutate individual fields, so a snapshot can never be
/// half-updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub user_stats: Option<String>,
    pub info_box: Option<String>,
    pub character_thoughts: Option<String>,
    pub action_suggestions: Option<Vec<String>>,
}

impl TrackerSnapshot {
    /// True when no section was extracted. An all-null snapshot is still a
    /// valid parse result ("this reply carried no tracker update"), not an
    /// error.
    pub fn is_empty(&self) -> bool {
        self.user_stats.is_none()
            && self.info_box.is_none()
            && self.character_thoughts.is_none()
            && self.action_suggestions.is_none()
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::UserStats => self.user_stats.is_some(),
            SectionKind::InfoBox => self.info_box.is_some(),
            SectionKind::CharacterThoughts => self.character_thoughts.is_some(),
            SectionKind::ActionSuggestions => self.action_suggestions.is_some(),
        }
    }
}

// The four section kinds a model reply can carry. Display gives the
// canonical header used when rendering a block back into a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SectionKind {
    #[strum(serialize = "Stats")]
    UserStats,
    #[strum(serialize = "Info Box")]
    InfoBox,
    #[strum(serialize = "Characters")]
    CharacterThoughts,
    #[strum(serialize = "Suggestions")]
    ActionSuggestions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_empty() {
        assert!(TrackerSnapshot::default().is_empty());
    }

    #[test]
    fn snapshot_with_one_field_is_not_empty() {
        let snapshot = TrackerSnapshot {
            info_box: Some("Location: Docks".to_string()),
            ..Default::default()
        };
        assert!(!snapshot.is_empty());
        assert!(snapshot.has(SectionKind::InfoBox));
        assert!(!snapshot.has(SectionKind::UserStats));
    }

    #[test]
    fn canonical_headers() {
        assert_eq!(SectionKind::UserStats.to_string(), "Stats");
        assert_eq!(SectionKind::InfoBox.to_string(), "Info Box");
        assert_eq!(SectionKind::CharacterThoughts.to_string(), "Characters");
        assert_eq!(SectionKind::ActionSuggestions.to_string(), "Suggestions");
    }
}
