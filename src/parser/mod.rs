// Response parser: turns one raw model reply into a TrackerSnapshot plus the
// narrative text with recognized tracker blocks excised. Pure over its input,
// tolerant of any malformation, never errors.

pub(crate) mod rules;
pub(crate) mod scrub;
pub(crate) mod suggestions;

use std::ops::Range;

use crate::snapshot::TrackerSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub sections: TrackerSnapshot,
    pub cleaned_text: String,
}

// Paired tags the upstream model uses for internal deliberation. Their spans
// are invisible to the tracker scan but stay in the cleaned text.
const THINKING_TAGS: [&str; 3] = ["thinking", "think", "reasoning"];

/// Extract tracker sections from a raw model reply.
///
/// Trackers are only recognized inside fenced code regions that sit outside
/// any reasoning-tag span. Each of the four section kinds is assigned at most
/// once; later candidates for a filled kind are ignored. Regions that
/// contributed at least one section are removed from the cleaned text.
pub fn parse_response(raw_text: &str) -> ParsedResponse {
    let masked = thinking_spans(raw_text);
    let regions = fenced_regions(raw_text, &masked);

    let mut sections = TrackerSnapshot::default();
    let mut excised: Vec<Range<usize>> = Vec::new();
    for region in &regions {
        if rules::classify_region(&region.body, &mut sections) {
            excised.push(region.span.clone());
        }
    }

    ParsedResponse {
        sections,
        cleaned_text: excise_spans(raw_text, excised),
    }
}

/// Byte spans covered by reasoning tags. An unterminated opening tag masks
/// to the end of the input.
fn thinking_spans(text: &str) -> Vec<Range<usize>> {
    let lower = text.to_ascii_lowercase();
    let mut spans = Vec::new();
    for tag in THINKING_TAGS {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let mut from = 0;
        while let Some(rel) = lower[from..].find(&open) {
            let start = from + rel;
            match lower[start + open.len()..].find(&close) {
                Some(rel_end) => {
                    let end = start + open.len() + rel_end + close.len();
                    spans.push(start..end);
                    from = end;
                }
                None => {
                    spans.push(start..text.len());
                    break;
                }
            }
        }
    }
    spans
}

fn is_masked(pos: usize, masked: &[Range<usize>]) -> bool {
    masked.iter().any(|span| span.contains(&pos))
}

#[derive(Debug)]
struct FencedRegion {
    // Full span including the fence lines, for excision.
    span: Range<usize>,
    body: String,
}

struct OpenFence {
    start: usize,
    ticks: usize,
    body_start: usize,
}

/// Line-oriented fence scan. An opener is a line starting (after trim) with
/// three or more backticks, optionally followed by an info string; the
/// closing line is backticks only, at least as many. An unterminated fence
/// runs to the end of the input.
fn fenced_regions(text: &str, masked: &[Range<usize>]) -> Vec<FencedRegion> {
    let mut regions = Vec::new();
    let mut open: Option<OpenFence> = None;
    let mut pos = 0usize;

    for line in text.split_inclusive('\n') {
        let line_start = pos;
        pos += line.len();
        let trimmed = line.trim();
        let ticks = trimmed.chars().take_while(|&c| c == '`').count();
        match &open {
            None => {
                if ticks >= 3 && !is_masked(line_start, masked) {
                    open = Some(OpenFence {
                        start: line_start,
                        ticks,
                        body_start: pos,
                    });
                }
            }
            Some(fence) => {
                if ticks >= fence.ticks && trimmed.chars().all(|c| c == '`') {
                    regions.push(FencedRegion {
                        span: fence.start..pos,
                        body: text[fence.body_start..line_start].to_string(),
                    });
                    open = None;
                }
            }
        }
    }
    if let Some(fence) = open {
        regions.push(FencedRegion {
            span: fence.start..text.len(),
            body: text[fence.body_start..].to_string(),
        });
    }
    regions
}

fn excise_spans(text: &str, mut spans: Vec<Range<usize>>) -> String {
    spans.sort_by_key(|span| span.start);
    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for span in spans {
        if span.start > cursor {
            kept.push_str(&text[cursor..span.start]);
        }
        cursor = cursor.max(span.end);
    }
    kept.push_str(&text[cursor..]);
    collapse_newlines(&kept)
}

// Runs of 3+ newlines collapse to 2; ends are trimmed.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                out.push(c);
            }
        } else {
            run = 0;
            out.push(c);
        }
    }
    out.trim().to_string()
}
