// The boundary to the host's generation API. The host owns the actual model
// call; this crate only sees a trait returning raw text.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum GenerationKind {
    /// A regular reply; its tracker blocks feed the commit machine.
    Normal,
    /// Plot-progression helper call; tracker injection is suppressed.
    PlotProgression,
    /// Suggestion-only call; tracker injection is suppressed and the result
    /// is read straight from the parser, bypassing the commit machine.
    SuggestionOnly,
}

impl GenerationKind {
    pub fn suppresses_tracker(&self) -> bool {
        matches!(self, Self::PlotProgression | Self::SuggestionOnly)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(kind: GenerationKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
        }
    }
}

pub trait GenerationClient {
    /// One raw-text generation call. Awaited; never runs concurrently for
    /// the same conversation by host convention.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Guard against blank upstream replies: no snapshot can be derived from
/// them, so they surface as a typed error instead of an all-null parse.
pub fn ensure_nonempty(text: String) -> Result<String, GenerationError> {
    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppression_follows_kind() {
        assert!(!GenerationKind::Normal.suppresses_tracker());
        assert!(GenerationKind::PlotProgression.suppresses_tracker());
        assert!(GenerationKind::SuggestionOnly.suppresses_tracker());
    }

    #[test]
    fn blank_text_is_an_empty_response() {
        assert!(matches!(
            ensure_nonempty("  \n\t".to_string()),
            Err(GenerationError::EmptyResponse)
        ));
        assert_eq!(ensure_nonempty("ok".to_string()).unwrap(), "ok");
    }
}
