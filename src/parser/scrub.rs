// Post-processing for extracted stats/info/characters text: strip one
// enclosing bracket layer, drop unfilled template placeholders, tidy the
// lines that emptied out. Suggestions skip this path and go through the list
// extractor instead.

use once_cell::sync::Lazy;

use crate::parser::rules;

// Words that mark a bracketed span as an unfilled template slot.
static PLACEHOLDER_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "location",
        "mood",
        "emoji",
        "name",
        "time",
        "date",
        "weather",
        "emotion",
        "thought",
        "stat",
        "value",
        "percent",
        "percentage",
        "insert",
        "describe",
        "description",
        "placeholder",
        "tbd",
        "n/a",
    ]
});

pub(crate) fn clean_section(text: &str) -> String {
    scrub_placeholders(strip_enclosing_brackets(text))
}

/// Strip a single layer of `[]`/`{}`/`()` wrapping the whole block. The
/// layer comes off only when the opening bracket closes at the very end, so
/// `[a] and [b]` is untouched.
pub(crate) fn strip_enclosing_brackets(text: &str) -> &str {
    let trimmed = text.trim();
    for (open, close) in [('[', ']'), ('{', '}'), ('(', ')')] {
        if trimmed.len() >= 2
            && trimmed.starts_with(open)
            && trimmed.ends_with(close)
            && wraps_whole(trimmed, open, close)
        {
            return trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()].trim();
        }
    }
    trimmed
}

fn wraps_whole(text: &str, open: char, close: char) -> bool {
    let mut depth = 0i32;
    for (index, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return index == text.len() - close.len_utf8();
            }
        }
    }
    false
}

/// Remove unfilled placeholders line by line and tidy what they leave
/// behind. Applying this twice yields the same text as applying it once.
pub(crate) fn scrub_placeholders(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let removed = remove_placeholders(line);
        if rules::is_separator(&removed) {
            lines.push(removed.trim_end().to_string());
            continue;
        }
        let scrubbed_here = removed != line;
        let tidied = removed
            .trim_end()
            .trim_end_matches(['|', ',', ';'])
            .trim_end();
        // A label comes off only when the scrub emptied it on this line;
        // a label whose value sits on the following line stays.
        if scrubbed_here && is_empty_label(tidied) {
            continue;
        }
        // Collapse runs of blank lines to a single one.
        if tidied.trim().is_empty() && lines.last().is_some_and(|prev| prev.trim().is_empty()) {
            continue;
        }
        lines.push(tidied.to_string());
    }
    lines.join("\n").trim().to_string()
}

/// Drop `[...]` and `{...}` spans that look like unfilled template slots:
/// keyword hits, or short generic phrases of at most three words. Longer
/// bracketed content reads as narrative and stays. Parenthesized asides are
/// always narrative and are never touched.
pub(crate) fn remove_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(start) = rest.find(['[', '{']) else {
            out.push_str(rest);
            break;
        };
        let close = if rest.as_bytes()[start] == b'[' { ']' } else { '}' };
        let Some(rel_end) = rest[start + 1..].find(close) else {
            out.push_str(rest);
            break;
        };
        let end = start + 1 + rel_end;
        out.push_str(&rest[..start]);
        if !is_placeholder(&rest[start + 1..end]) {
            out.push_str(&rest[start..=end]);
        }
        rest = &rest[end + 1..];
    }
    out
}

fn is_placeholder(inner: &str) -> bool {
    let inner = inner.trim();
    if inner.is_empty() {
        return true;
    }
    let lower = inner.to_ascii_lowercase();
    if lower.split_whitespace().any(is_keyword_word) {
        return true;
    }
    inner.split_whitespace().count() <= 3 && inner.len() <= 40
}

// Whole-word keyword match, so narrative words that merely contain a
// keyword ("statue", "ornament", "sometimes") never mark a span.
fn is_keyword_word(word: &str) -> bool {
    let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/');
    if word.is_empty() {
        return false;
    }
    let singular = word.strip_suffix('s').unwrap_or(word);
    PLACEHOLDER_KEYWORDS
        .iter()
        .any(|keyword| word == *keyword || singular == *keyword)
}

// A label whose value got scrubbed away, e.g. "Mood:" with nothing after it.
fn is_empty_label(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(label) = trimmed.strip_suffix(':') else {
        return false;
    };
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '\'' | '-' | '_' | '/'))
}
