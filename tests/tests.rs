// ../tests/tests.rs
use narrative_tracker::*;

fn stats_snapshot(text: &str) -> TrackerSnapshot {
    TrackerSnapshot {
        user_stats: Some(text.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_text_without_fences_passes_through() {
    let input = "The bell above the door rings.\n\nMira looks up from the counter.";
    let parsed = parse_response(input);
    assert!(parsed.sections.is_empty());
    assert_eq!(parsed.cleaned_text, input);
}

#[test]
fn test_single_fence_populates_exactly_one_field() {
    let parsed = parse_response("```\nStats\n---\nHealth: 80%\n```");
    assert_eq!(
        parsed.sections.user_stats.as_deref(),
        Some("Stats\n---\nHealth: 80%")
    );
    assert!(parsed.sections.info_box.is_none());
    assert!(parsed.sections.character_thoughts.is_none());
    assert!(parsed.sections.action_suggestions.is_none());
    assert_eq!(parsed.cleaned_text, "");
}

#[test]
fn test_parse_is_idempotent_over_cleaned_text() {
    let input = "She nods.\n\n```\nStats\n---\nHealth: 62%\nStamina: 40%\n```\n\n```\nInfo Box\n---\nLocation: the tavern loft\nTime: past midnight\n```\n\nThe candle gutters.";
    let first = parse_response(input);
    assert!(first.sections.user_stats.is_some());
    assert!(first.sections.info_box.is_some());

    let second = parse_response(&first.cleaned_text);
    assert!(second.sections.is_empty());
    assert_eq!(second.cleaned_text, first.cleaned_text);
}

#[test]
fn test_combined_block_splits_both_sections() {
    let input = "```\nStats\n---\nHealth: 80%\nInfo Box\n---\nLocation: the archive\n```";
    let parsed = parse_response(input);
    assert_eq!(
        parsed.sections.user_stats.as_deref(),
        Some("Stats\n---\nHealth: 80%")
    );
    assert_eq!(
        parsed.sections.info_box.as_deref(),
        Some("Info Box\n---\nLocation: the archive")
    );
}

#[test]
fn test_action_suggestion_scenario() {
    let input = "```\nSuggestions\n---\n1. Open the door\n2. Ask about the letter\n3. Leave\n```";
    let parsed = parse_response(input);
    assert_eq!(
        parsed.sections.action_suggestions.as_deref(),
        Some(
            &[
                "Open the door".to_string(),
                "Ask about the letter".to_string(),
                "Leave".to_string()
            ][..]
        )
    );
}

#[test]
fn test_messy_reply_end_to_end() {
    let input = concat!(
        "<think>\nShould the tracker change? She took a hit.\n</think>\n",
        "The blade catches her shoulder and she staggers back.\n\n",
        "```\nStats\n---\nHealth: 64% |\nMood: [current mood emoji]\n```\n\n",
        "```\nSuggestions\n---\n1. \"Press the attack\"\n2. Fall back to the stairwell\n```\n",
    );
    let parsed = parse_response(input);
    assert_eq!(
        parsed.sections.user_stats.as_deref(),
        Some("Stats\n---\nHealth: 64%")
    );
    assert_eq!(
        parsed.sections.action_suggestions.as_deref(),
        Some(
            &[
                "Press the attack".to_string(),
                "Fall back to the stairwell".to_string()
            ][..]
        )
    );
    assert!(parsed.cleaned_text.contains("she staggers back"));
    assert!(!parsed.cleaned_text.contains("Health"));
}

#[test]
fn test_promotion_property_on_new_message() {
    for snapshot in [stats_snapshot("Health: 12%"), TrackerSnapshot::default()] {
        let mut fsm = TrackerCommit::new();
        fsm.handle(TrackerEvent::Completed {
            message_id: 0,
            swipe_index: 0,
            snapshot: stats_snapshot("Health: 99%"),
        });
        fsm.handle(TrackerEvent::Completed {
            message_id: 1,
            swipe_index: 0,
            snapshot: snapshot.clone(),
        });
        let before = fsm.last_generated().cloned();
        fsm.handle(TrackerEvent::NewMessage);
        assert_eq!(fsm.committed().cloned(), before);
        assert_eq!(fsm.committed(), Some(&snapshot));
    }
}

#[test]
fn test_swipe_navigation_restores_exact_snapshot() {
    let mut fsm = TrackerCommit::new();
    fsm.handle(TrackerEvent::Completed {
        message_id: 4,
        swipe_index: 0,
        snapshot: stats_snapshot("Health: 70%"),
    });
    fsm.handle(TrackerEvent::SwipeRequested {
        message_id: 4,
        index: 1,
    });
    fsm.handle(TrackerEvent::Completed {
        message_id: 4,
        swipe_index: 1,
        snapshot: stats_snapshot("Health: 35%"),
    });
    fsm.handle(TrackerEvent::SwipeNavigated {
        message_id: 4,
        index: 0,
    });
    assert_eq!(fsm.last_generated(), Some(&stats_snapshot("Health: 70%")));
    assert_eq!(fsm.committed(), Some(&stats_snapshot("Health: 70%")));
}

#[test]
fn test_full_turn_flow_through_session() {
    let mut session = TrackerSession::new(ConversationId::from("flow"), TrackerSettings::new());

    // Turn 0 completes and auto-promotes.
    session.absorb_response(0, 0, "Rain.\n```\nStats\n---\nHealth: 90%\n```");
    let block = session.injection_block().unwrap();
    assert!(block.contains("Health: 90%"));

    // A swipe produces an alternate that is displayed but not committed.
    session.handle(TrackerEvent::SwipeRequested {
        message_id: 0,
        index: 1,
    });
    session.absorb_response(0, 1, "Thunder.\n```\nStats\n---\nHealth: 40%\n```");
    assert!(session.injection_block().unwrap().contains("Health: 90%"));

    // Sending a new message accepts whatever is on screen.
    session.handle(TrackerEvent::NewMessage);
    assert!(session.injection_block().unwrap().contains("Health: 40%"));
}

#[tokio::test]
async fn test_session_persists_and_restores_through_file_store() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path());
    let id = ConversationId::from("persisted");

    let mut session = TrackerSession::new(id.clone(), TrackerSettings::new());
    session.absorb_response(2, 0, "```\nStats\n---\nHealth: 51%\n```");
    session.persist(&store).await;

    let restored = TrackerSession::load(id, TrackerSettings::new(), &store).await;
    assert_eq!(
        restored.commit().committed().unwrap().user_stats.as_deref(),
        Some("Stats\n---\nHealth: 51%")
    );
    assert_eq!(
        restored
            .snapshot_for_swipe(2, 0)
            .unwrap()
            .user_stats
            .as_deref(),
        Some("Stats\n---\nHealth: 51%")
    );
    Ok(())
}

#[tokio::test]
async fn test_persist_failure_is_non_blocking() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the store expects a directory makes every save fail.
    let blocked = dir.path().join("blocked");
    tokio::fs::write(&blocked, "x").await.unwrap();
    let store = FileStore::new(&blocked);

    let mut session = TrackerSession::new(ConversationId::from("doomed"), TrackerSettings::new());
    session.absorb_response(0, 0, "```\nStats\n---\nHealth: 80%\n```");
    session.persist(&store).await;

    // In-memory state is intact after the failed write.
    assert!(session.commit().committed().is_some());
    assert!(session.injection_block().is_some());
}

struct OneReplyClient(std::sync::Mutex<Option<String>>);

impl GenerationClient for OneReplyClient {
    // The glob import above brings in the crate's one-parameter `Result`
    // alias, so the trait's return type must be spelled out here.
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        self.0
            .lock()
            .unwrap()
            .take()
            .ok_or(GenerationError::EmptyResponse)
    }
}

struct AlwaysSkip;

impl RetryPrompter for AlwaysSkip {
    async fn on_batch_failure(
        &self,
        _batch_index: usize,
        _error: &GenerationError,
    ) -> RetryDecision {
        RetryDecision::Skip
    }
}

#[tokio::test]
async fn test_history_extraction_end_to_end() {
    let client = OneReplyClient(std::sync::Mutex::new(Some(
        "```\nStats\n---\nHealth: 80%\n```".to_string(),
    )));
    let settings = TrackerSettings {
        extraction_batch_size: 1,
        extraction_batch_delay_ms: 0,
        ..Default::default()
    };
    let extractor = HistoryExtractor::new(client, AlwaysSkip, &settings);
    let results = extractor
        .extract(&["turn one".to_string(), "turn two".to_string()])
        .await;
    assert_eq!(results.len(), 2);
    assert!(results[0].is_some());
    // Second call hits the exhausted client, fails, and is skipped.
    assert!(results[1].is_none());
}
