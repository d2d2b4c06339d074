// Batch backfill of tracker snapshots for historical messages. One
// generation call per message, a fixed settle delay between batches, and a
// user-facing retry-or-skip prompt when a batch fails.

use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::GenerationError;
use crate::generation::{GenerationClient, GenerationKind, GenerationRequest, ensure_nonempty};
use crate::inject;
use crate::parser::parse_response;
use crate::settings::TrackerSettings;
use crate::snapshot::TrackerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    Skip,
}

/// The user-facing retry-or-skip prompt shown when a batch fails. The host
/// owns the actual dialog.
pub trait RetryPrompter {
    async fn on_batch_failure(&self, batch_index: usize, error: &GenerationError)
    -> RetryDecision;
}

pub struct HistoryExtractor<C, P> {
    client: C,
    prompter: P,
    batch_size: usize,
    batch_delay: Duration,
    token: CancellationToken,
}

impl<C: GenerationClient, P: RetryPrompter> HistoryExtractor<C, P> {
    pub fn new(client: C, prompter: P, settings: &TrackerSettings) -> Self {
        Self {
            client,
            prompter,
            batch_size: settings.extraction_batch_size.max(1),
            batch_delay: Duration::from_millis(settings.extraction_batch_delay_ms),
            token: CancellationToken::new(),
        }
    }

    /// Token the host can use to abort the backfill between batches.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Backfill snapshots for the given messages, in order. A skipped batch
    /// and a message whose reply carried no tracker both yield None; results
    /// keep one slot per input message even when cancelled early.
    pub async fn extract(&self, messages: &[String]) -> Vec<Option<TrackerSnapshot>> {
        let mut results: Vec<Option<TrackerSnapshot>> = Vec::with_capacity(messages.len());
        for (batch_index, batch) in messages.chunks(self.batch_size).enumerate() {
            if self.token.is_cancelled() {
                log::info!("history extraction cancelled after {} messages", results.len());
                break;
            }
            if batch_index > 0 {
                // Fixed settle delay between batches, no backoff.
                tokio::time::sleep(self.batch_delay).await;
            }
            loop {
                match self.run_batch(batch).await {
                    Ok(mut snapshots) => {
                        results.append(&mut snapshots);
                        break;
                    }
                    Err(error) => {
                        log::warn!("extraction batch {batch_index} failed: {error}");
                        match self.prompter.on_batch_failure(batch_index, &error).await {
                            RetryDecision::Retry => continue,
                            RetryDecision::Skip => {
                                results.extend(batch.iter().map(|_| None));
                                break;
                            }
                        }
                    }
                }
            }
        }
        results.resize(messages.len(), None);
        results
    }

    async fn run_batch(
        &self,
        batch: &[String],
    ) -> Result<Vec<Option<TrackerSnapshot>>, GenerationError> {
        let mut snapshots = Vec::with_capacity(batch.len());
        for message in batch {
            let request =
                GenerationRequest::new(GenerationKind::Normal, extraction_prompt(message));
            let text = ensure_nonempty(self.client.generate(&request).await?)?;
            let parsed = parse_response(&text);
            snapshots.push(if parsed.sections.is_empty() {
                None
            } else {
                Some(parsed.sections)
            });
        }
        Ok(snapshots)
    }
}

fn extraction_prompt(message: &str) -> String {
    format!(
        "{}\n\nRead the message below and emit only the tracker blocks it supports.\n\nMessage:\n{message}",
        inject::format_instructions()
    )
}
