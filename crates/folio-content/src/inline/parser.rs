//! Marker text to styled runs.
//!
//! Scans left to right. At each position the earliest-starting match among
//! the inline patterns wins; when two patterns start at the same byte the
//! one listed first in [`PATTERNS`] wins, so `**x**` is bold, never two
//! italics. Unterminated markers simply never match and stay literal.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::{StyledRun, Styles, TextRun};
use crate::error::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Bold,
    Strike,
    Code,
    Link,
    Italic,
}

struct InlinePattern {
    kind: PatternKind,
    regex: Regex,
}

/// Priority order matters for ties.
static PATTERNS: LazyLock<Vec<InlinePattern>> = LazyLock::new(|| {
    let pattern = |kind, re: &str| InlinePattern {
        kind,
        regex: Regex::new(re).unwrap(),
    };
    vec![
        pattern(PatternKind::Bold, r"(?s)\*\*(.+?)\*\*|__(.+?)__"),
        pattern(PatternKind::Strike, r"(?s)~~(.+?)~~"),
        pattern(PatternKind::Code, r"`([^`]+)`"),
        pattern(PatternKind::Link, r"\[([^\[\]]+)\]\(([^()\s]+)\)"),
        pattern(
            PatternKind::Italic,
            r"\*([^*\s](?:[^*]*[^*\s])?)\*|_([^_\s](?:[^_]*[^_\s])?)_",
        ),
    ]
});

#[derive(Debug, Clone, Copy)]
struct Found {
    pattern: usize,
    start: usize,
    end: usize,
}

/// Parse marker text into styled runs.
///
/// Never fails: if tokenizing goes wrong the whole input comes back as one
/// unstyled run.
pub fn parse_inline(text: &str) -> Vec<StyledRun> {
    match tokenize(text, true) {
        Ok(runs) => runs,
        Err(err) => {
            tracing::debug!(%err, "inline tokenizer fell back to plain text");
            vec![StyledRun::plain(text)]
        }
    }
}

fn tokenize(text: &str, allow_links: bool) -> Result<Vec<StyledRun>, ContentError> {
    let mut runs = Vec::new();
    let mut pos = 0;
    // Cached next match per pattern: None = not searched yet,
    // Some(None) = no further match anywhere.
    let mut next: Vec<Option<Option<Found>>> = vec![None; PATTERNS.len()];

    while pos < text.len() {
        let mut best: Option<Found> = None;

        for (idx, pattern) in PATTERNS.iter().enumerate() {
            if pattern.kind == PatternKind::Link && !allow_links {
                continue;
            }
            let stale = match next[idx] {
                None => true,
                Some(Some(found)) => found.start < pos,
                Some(None) => false,
            };
            if stale {
                next[idx] = Some(pattern.regex.find_at(text, pos).map(|m| Found {
                    pattern: idx,
                    start: m.start(),
                    end: m.end(),
                }));
            }
            if let Some(Some(found)) = next[idx] {
                if best.is_none_or(|b| found.start < b.start) {
                    best = Some(found);
                }
            }
        }

        let Some(found) = best else {
            runs.push(StyledRun::plain(slice(text, pos, text.len())?));
            break;
        };

        if found.start > pos {
            runs.push(StyledRun::plain(slice(text, pos, found.start)?));
        }
        runs.push(build_run(text, found)?);
        pos = found.end;
    }

    Ok(runs)
}

fn build_run(text: &str, found: Found) -> Result<StyledRun, ContentError> {
    let span = slice(text, found.start, found.end)?;
    let pattern = &PATTERNS[found.pattern];
    let caps = pattern
        .regex
        .captures(span)
        .ok_or(ContentError::InlineSlice {
            start: found.start,
            end: found.end,
        })?;

    let run = match pattern.kind {
        PatternKind::Bold => StyledRun::styled(inner(&caps), Styles::BOLD),
        PatternKind::Strike => StyledRun::styled(inner(&caps), Styles::STRIKE),
        PatternKind::Code => StyledRun::styled(inner(&caps), Styles::CODE),
        PatternKind::Italic => StyledRun::styled(inner(&caps), Styles::ITALIC),
        PatternKind::Link => {
            let label = caps.get(1).map_or("", |m| m.as_str());
            let href = caps.get(2).map_or("", |m| m.as_str());
            StyledRun::link(href, link_content(label)?)
        }
    };
    Ok(run)
}

/// Link labels are tokenized one level deep without links.
fn link_content(label: &str) -> Result<Vec<TextRun>, ContentError> {
    Ok(tokenize(label, false)?
        .into_iter()
        .filter_map(|run| match run {
            StyledRun::Text(run) => Some(run),
            StyledRun::Link(_) => None,
        })
        .collect())
}

/// First participating capture group; the alternations put the content in
/// group 1 or group 2.
fn inner<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

fn slice(text: &str, start: usize, end: usize) -> Result<&str, ContentError> {
    text.get(start..end)
        .ok_or(ContentError::InlineSlice { start, end })
}
