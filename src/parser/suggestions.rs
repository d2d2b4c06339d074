// Numbered/bulleted action-suggestion extraction. Numbered items win; bullet
// markers are the fallback when no numbering is present.

use crate::parser::scrub;

pub(crate) const MAX_SUGGESTIONS: usize = 3;
pub(crate) const MAX_SUGGESTION_CHARS: usize = 200;

pub(crate) fn extract_suggestions(text: &str) -> Option<Vec<String>> {
    let numbered = collect(text, numbered_item);
    let entries = if numbered.is_empty() {
        collect(text, bullet_item)
    } else {
        numbered
    };
    if entries.is_empty() { None } else { Some(entries) }
}

fn collect(text: &str, item: fn(&str) -> Option<&str>) -> Vec<String> {
    let mut entries = Vec::new();
    for line in text.lines() {
        if entries.len() == MAX_SUGGESTIONS {
            break;
        }
        let Some(rest) = item(line.trim()) else {
            continue;
        };
        let tidied = tidy_entry(rest);
        if !tidied.is_empty() && tidied.chars().count() <= MAX_SUGGESTION_CHARS {
            entries.push(tidied);
        }
    }
    entries
}

// `N. text` or `N) text`.
fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    Some(rest.trim())
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("• "))
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

// Bracketed placeholder fragments and surrounding quotes come off each
// entry; whitespace runs left by a removed fragment collapse to one space.
fn tidy_entry(text: &str) -> String {
    let scrubbed = scrub::remove_placeholders(text);
    let collapsed = scrubbed.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c| matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}'))
        .trim()
        .to_string()
}
