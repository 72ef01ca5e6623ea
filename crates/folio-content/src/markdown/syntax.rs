//! Line-level patterns shared by the Markdown reader and writer.

use std::sync::LazyLock;

use regex::Regex;

use crate::embed::{EmbedDescriptor, resolve_embed};

pub(super) static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
pub(super) static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());
pub(super) static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,9}[.)]\s+(.*)$").unwrap());
pub(super) static IMAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^()\s]+)\)$").unwrap());
pub(super) static CAPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*([^*\s](?:[^*]*[^*\s])?)\*$").unwrap());
pub(super) static SOLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\[\]]*)\]\(([^()\s]+)\)$").unwrap());
pub(super) static CALLOUT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!(\w+)\]\s*(.*)$").unwrap());
pub(super) static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?(\s*:?-{3,}:?\s*\|)*\s*:?-{3,}:?\s*\|?$").unwrap());

pub(super) const FENCE: &str = "```";

/// A sole-link line whose URL an embed provider accepts, with its title.
pub(super) fn embed_link(line: &str) -> Option<(&str, EmbedDescriptor)> {
    let caps = SOLE_LINK.captures(line)?;
    let title = caps.get(1).map_or("", |m| m.as_str());
    let url = caps.get(2).map_or("", |m| m.as_str());
    let descriptor = resolve_embed(url)?;
    let title = if title == url || title == descriptor.url {
        ""
    } else {
        title
    };
    Some((title, descriptor))
}

/// Whether a paragraph line would be read back as something else.
///
/// A leading backslash is always escaped so the reader can strip exactly one.
pub(super) fn needs_escape(line: &str) -> bool {
    line.starts_with('\\')
        || line.starts_with('#')
        || line.starts_with('>')
        || line.starts_with('|')
        || line.starts_with(FENCE)
        || BULLET_ITEM.is_match(line)
        || NUMBERED_ITEM.is_match(line)
        || IMAGE_LINE.is_match(line)
        || embed_link(line).is_some()
}

/// Split a pipe-table row into trimmed cells, honouring `\|` escapes.
pub(super) fn split_table_row(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_lines_need_escape() {
        for line in [
            "# not a heading",
            "> not a quote",
            "- not a list",
            "3. not numbered",
            "![not](an-image.png)",
            "| not | a table |",
            "```not code",
            "\\already escaped",
            "[clip](https://youtu.be/dQw4w9WgXcQ)",
        ] {
            assert!(needs_escape(line), "{line}");
        }
        for line in ["plain words", "*emphasis* first", "[link](https://example.com)", "-5 degrees"] {
            assert!(!needs_escape(line), "{line}");
        }
    }

    #[test]
    fn table_rows_split() {
        assert_eq!(split_table_row("| A | B |"), vec!["A", "B"]);
        assert_eq!(split_table_row("|a\\|b| c"), vec!["a|b", "c"]);
        assert_eq!(split_table_row("| x |  |"), vec!["x", ""]);
    }

    #[test]
    fn separators() {
        assert!(TABLE_SEPARATOR.is_match("| --- | --- |"));
        assert!(TABLE_SEPARATOR.is_match("|:---|---:|"));
        assert!(TABLE_SEPARATOR.is_match("| --- |"));
        assert!(!TABLE_SEPARATOR.is_match("| A | B |"));
    }
}
