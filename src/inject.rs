// Rendering the committed snapshot back into the prompt block the host
// splices into the next generation request.

use strum::IntoEnumIterator;

use crate::parser::rules;
use crate::settings::TrackerSettings;
use crate::snapshot::{SectionKind, TrackerSnapshot};

/// Static preamble asking the model to keep emitting tracker blocks in the
/// shape the parser recognizes.
pub fn format_instructions() -> &'static str {
    concat!(
        "After your narration, append the tracker blocks below, each inside ",
        "its own ``` code fence, keeping the headers and separator lines ",
        "exactly as shown. Omit a block when nothing about it changed.\n\n",
        "```\nStats\n---\nHealth: NN%\nStamina: NN%\n```\n\n",
        "```\nInfo Box\n---\nLocation: where the scene takes place\n",
        "Time: time of day\n```\n\n",
        "```\nCharacters\n---\nName: what they are thinking or feeling\n```\n\n",
        "```\nSuggestions\n---\n1. First possible action\n",
        "2. Second possible action\n3. Third possible action\n```",
    )
}

/// Render the sections of a snapshot as fenced blocks, honoring the
/// per-section settings toggles. Returns None when nothing is renderable.
pub fn render_injection(snapshot: &TrackerSnapshot, settings: &TrackerSettings) -> Option<String> {
    let mut blocks = Vec::new();
    for kind in SectionKind::iter() {
        if !settings.tracks(kind) {
            continue;
        }
        let Some(body) = section_body(snapshot, kind) else {
            continue;
        };
        blocks.push(fenced(kind, &body));
    }
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

fn section_body(snapshot: &TrackerSnapshot, kind: SectionKind) -> Option<String> {
    match kind {
        SectionKind::UserStats => snapshot.user_stats.clone(),
        SectionKind::InfoBox => snapshot.info_box.clone(),
        SectionKind::CharacterThoughts => snapshot.character_thoughts.clone(),
        SectionKind::ActionSuggestions => snapshot.action_suggestions.as_ref().map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| format!("{}. {entry}", index + 1))
                .collect::<Vec<_>>()
                .join("\n")
        }),
    }
}

// Extracted text usually still carries its own header line; only add the
// canonical one when it does not.
fn fenced(kind: SectionKind, body: &str) -> String {
    let has_header = body
        .lines()
        .next()
        .is_some_and(|line| rules::header_kind(line) == Some(kind));
    if has_header {
        format!("```\n{}\n```", body.trim())
    } else {
        format!("```\n{kind}\n---\n{}\n```", body.trim())
    }
}
