// Region classification: an ordered list of predicate + extractor pairs,
// first match wins. Each rule is a plain function so coverage gaps show up
// per rule instead of inside one long scan.

use std::collections::HashSet;

use crate::parser::{scrub, suggestions};
use crate::snapshot::{SectionKind, TrackerSnapshot};

// Accepted header name variants per kind, matched after normalization.
const STATS_HEADERS: [&str; 4] = ["stats", "user stats", "player stats", "status"];
const INFO_HEADERS: [&str; 5] = ["info", "info box", "infobox", "scene info", "scene"];
const CHARACTER_HEADERS: [&str; 5] = [
    "characters",
    "present characters",
    "character thoughts",
    "character info",
    "thoughts",
];
const SUGGESTION_HEADERS: [&str; 5] = [
    "suggestions",
    "action suggestions",
    "suggested actions",
    "actions",
    "next actions",
];

/// Map a line to the section kind its header names, if any. Tolerates
/// `#`/`*`/`>` decoration and a trailing colon.
pub(crate) fn header_kind(line: &str) -> Option<SectionKind> {
    let normalized = line
        .trim()
        .trim_start_matches(['#', '*', '>', ' '])
        .trim_end_matches(['*', ':', ' '])
        .to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if STATS_HEADERS.contains(&normalized.as_str()) {
        Some(SectionKind::UserStats)
    } else if INFO_HEADERS.contains(&normalized.as_str()) {
        Some(SectionKind::InfoBox)
    } else if CHARACTER_HEADERS.contains(&normalized.as_str()) {
        Some(SectionKind::CharacterThoughts)
    } else if SUGGESTION_HEADERS.contains(&normalized.as_str()) {
        Some(SectionKind::ActionSuggestions)
    } else {
        None
    }
}

/// A separator is a line of three or more `-`/`=`/`_` and nothing else.
pub(crate) fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| matches!(c, '-' | '=' | '_'))
}

struct HeaderMatch {
    line: usize,
    kind: SectionKind,
}

// A header counts only when the next non-empty line is a separator.
fn find_headers(lines: &[&str]) -> Vec<HeaderMatch> {
    let mut found = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let Some(kind) = header_kind(line) else {
            continue;
        };
        let follows_separator = lines[index + 1..]
            .iter()
            .find(|l| !l.trim().is_empty())
            .is_some_and(|l| is_separator(l));
        if follows_separator {
            found.push(HeaderMatch { line: index, kind });
        }
    }
    found
}

/// Classify one fenced region, assigning any sections it carries into the
/// snapshot. Returns true when the region contributed at least one section
/// (and should therefore be excised from the cleaned text).
pub(crate) fn classify_region(body: &str, snapshot: &mut TrackerSnapshot) -> bool {
    let lines: Vec<&str> = body.lines().collect();
    let headers = find_headers(&lines);
    let distinct: HashSet<SectionKind> = headers.iter().map(|h| h.kind).collect();

    // Combined block: two or more distinct kinds in one region, split at
    // header boundaries with each chunk keeping its header.
    if distinct.len() >= 2 {
        let mut contributed = false;
        for (position, header) in headers.iter().enumerate() {
            let end = headers
                .get(position + 1)
                .map_or(lines.len(), |next| next.line);
            let chunk = lines[header.line..end].join("\n");
            contributed |= assign(snapshot, header.kind, chunk.trim());
        }
        return contributed;
    }

    // Single-section block with an explicit header.
    if let Some(header) = headers.first() {
        return assign(snapshot, header.kind, body.trim());
    }

    // Content-shape fallbacks for headerless blocks.
    if stats_shape(&lines) {
        return assign(snapshot, SectionKind::UserStats, body.trim());
    }
    if numbered_anchor(&lines) {
        return assign(snapshot, SectionKind::ActionSuggestions, body);
    }
    false
}

fn assign(snapshot: &mut TrackerSnapshot, kind: SectionKind, text: &str) -> bool {
    if snapshot.has(kind) {
        return false;
    }
    match kind {
        SectionKind::ActionSuggestions => match suggestions::extract_suggestions(text) {
            Some(list) => {
                snapshot.action_suggestions = Some(list);
                true
            }
            None => false,
        },
        _ => {
            let cleaned = scrub::clean_section(text);
            if cleaned.is_empty() {
                return false;
            }
            match kind {
                SectionKind::UserStats => snapshot.user_stats = Some(cleaned),
                SectionKind::InfoBox => snapshot.info_box = Some(cleaned),
                SectionKind::CharacterThoughts => snapshot.character_thoughts = Some(cleaned),
                SectionKind::ActionSuggestions => unreachable!(),
            }
            true
        }
    }
}

/// `Label: NN%` line, the shape a stats row takes. The fallback requires two
/// of these to call a headerless block stats; one alone is too easy to hit
/// in freeform prose.
pub(crate) fn is_stat_line(line: &str) -> bool {
    let Some((label, value)) = line.split_once(':') else {
        return false;
    };
    let label = label.trim();
    if label.is_empty() || label.len() > 40 {
        return false;
    }
    let value = value.trim();
    let Some(number) = value.strip_suffix('%') else {
        return false;
    };
    let number = number.trim();
    !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
}

fn stats_shape(lines: &[&str]) -> bool {
    lines.iter().filter(|line| is_stat_line(line)).count() >= 2
}

// Headerless suggestions anchor on a leading `1.` / `1)` item.
fn numbered_anchor(lines: &[&str]) -> bool {
    lines.iter().any(|line| {
        let trimmed = line.trim();
        trimmed.starts_with("1. ") || trimmed.starts_with("1) ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_variants_map_to_kinds() {
        assert_eq!(header_kind("Stats"), Some(SectionKind::UserStats));
        assert_eq!(header_kind("User Stats"), Some(SectionKind::UserStats));
        assert_eq!(header_kind("Player Stats:"), Some(SectionKind::UserStats));
        assert_eq!(header_kind("## Info Box"), Some(SectionKind::InfoBox));
        assert_eq!(header_kind("**Scene Info**"), Some(SectionKind::InfoBox));
        assert_eq!(
            header_kind("Present Characters"),
            Some(SectionKind::CharacterThoughts)
        );
        assert_eq!(
            header_kind("Suggested Actions"),
            Some(SectionKind::ActionSuggestions)
        );
        assert_eq!(header_kind("Inventory"), None);
        assert_eq!(header_kind(""), None);
    }

    #[test]
    fn separator_shapes() {
        assert!(is_separator("---"));
        assert!(is_separator("====="));
        assert!(is_separator("  ___  "));
        assert!(!is_separator("--"));
        assert!(!is_separator("- - -"));
        assert!(!is_separator("Health: 80%"));
    }

    #[test]
    fn header_without_separator_is_not_a_section() {
        let mut snapshot = TrackerSnapshot::default();
        assert!(!classify_region("Stats\nHealth is fine today.", &mut snapshot));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn stat_line_shapes() {
        assert!(is_stat_line("Health: 80%"));
        assert!(is_stat_line("  Stamina : 5 %"));
        assert!(!is_stat_line("Health: high"));
        assert!(!is_stat_line("Health 80%"));
        assert!(!is_stat_line(": 80%"));
    }

    #[test]
    fn stats_fallback_needs_two_stat_lines() {
        let mut snapshot = TrackerSnapshot::default();
        assert!(!classify_region("Health: 80%\njust narration", &mut snapshot));
        assert!(snapshot.is_empty());

        assert!(classify_region("Health: 80%\nMana: 40%", &mut snapshot));
        assert_eq!(snapshot.user_stats.as_deref(), Some("Health: 80%\nMana: 40%"));
    }

    #[test]
    fn numbered_fallback_yields_suggestions() {
        let mut snapshot = TrackerSnapshot::default();
        assert!(classify_region(
            "1. Open the door\n2. Ask about the letter\n3. Leave",
            &mut snapshot
        ));
        assert_eq!(
            snapshot.action_suggestions.as_deref(),
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
    fn filled_kind_rejects_later_candidates() {
        let mut snapshot = TrackerSnapshot::default();
        assert!(classify_region("Stats\n---\nHealth: 80%", &mut snapshot));
        assert!(!classify_region("Stats\n---\nHealth: 10%", &mut snapshot));
        assert_eq!(snapshot.user_stats.as_deref(), Some("Stats\n---\nHealth: 80%"));
    }

    #[test]
    fn combined_region_with_three_kinds() {
        let mut snapshot = TrackerSnapshot::default();
        let body = "Stats\n---\nHealth: 80%\nInfo\n---\nLocation: Docks\nTime: night\nCharacters\n---\nMira: wary";
        assert!(classify_region(body, &mut snapshot));
        assert_eq!(snapshot.user_stats.as_deref(), Some("Stats\n---\nHealth: 80%"));
        assert_eq!(
            snapshot.info_box.as_deref(),
            Some("Info\n---\nLocation: Docks\nTime: night")
        );
        assert_eq!(
            snapshot.character_thoughts.as_deref(),
            Some("Characters\n---\nMira: wary")
        );
    }
}
