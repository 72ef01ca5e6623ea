//! Filtering of block lists that come from untrusted storage or imports.
//!
//! Malformed entries are dropped rather than reported as errors so a single
//! bad block never makes a whole article unloadable. Entries with an unknown
//! or missing `type` are kept as empty text blocks.

use std::borrow::Cow;
use std::collections::HashSet;

use miette::NamedSource;
use serde_json::Value;

use folio_common::ParseError;

use super::types::{BlockBody, BlockId, ContentBlock, MAX_GALLERY_IMAGES, TextBlock};
use crate::error::ContentError;

/// Parse and validate a block document from JSON text.
///
/// Only fails when the input is not JSON or its top level is not an array;
/// bad entries inside the array are filtered.
pub fn validate_blocks_str(json: &str) -> Result<Vec<ContentBlock>, ContentError> {
    let value: Value = serde_json::from_str(json).map_err(|err| {
        ParseError::from(err).with_source(NamedSource::new(
            Cow::Borrowed("blocks.json"),
            Cow::Owned(json.to_string()),
        ))
    })?;
    if !value.is_array() {
        return Err(ParseError::shape("expected an array of content blocks")
            .with_advice("wrap a single block in [ ]")
            .into());
    }
    Ok(validate_blocks(&value))
}

/// Keep only well-formed blocks from a candidate list.
///
/// A non-array value yields an empty document.
pub fn validate_blocks(value: &Value) -> Vec<ContentBlock> {
    let Some(entries) = value.as_array() else {
        tracing::warn!("block document is not an array, treating as empty");
        return Vec::new();
    };

    let mut checked: Vec<Option<ContentBlock>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_entry(index, entry))
        .collect();

    assign_missing_ids(&mut checked, entries);

    checked.into_iter().flatten().collect()
}

fn validate_entry(index: usize, entry: &Value) -> Option<ContentBlock> {
    let Some(object) = entry.as_object() else {
        tracing::warn!(index, "dropping block: not an object");
        return None;
    };

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(BlockId::new)
        // placeholder, replaced in assign_missing_ids
        .unwrap_or_else(|| BlockId::new(""));

    let kind = object.get("type").and_then(Value::as_str);
    match kind {
        Some(kind) if BlockBody::is_known_kind(kind) => {}
        other => {
            tracing::debug!(index, kind = ?other, "unknown block type, keeping as empty text");
            return Some(ContentBlock::new(
                id,
                BlockBody::Text(TextBlock::default()),
            ));
        }
    }

    // Ids are checked separately so a bad id does not sink the payload.
    let mut payload = object.clone();
    payload.insert("id".into(), Value::String(id.to_string()));

    let block = match serde_json::from_value::<ContentBlock>(Value::Object(payload)) {
        Ok(block) => block,
        Err(err) => {
            tracing::warn!(index, %err, "dropping malformed block");
            return None;
        }
    };

    if let Err(reason) = check_invariants(&block.body) {
        tracing::warn!(index, id = %block.id, reason, "dropping block");
        return None;
    }

    Some(block)
}

/// Shape rules serde cannot express.
pub(crate) fn check_invariants(body: &BlockBody) -> Result<(), &'static str> {
    match body {
        BlockBody::Gallery(gallery) => {
            if gallery.images.is_empty() {
                Err("gallery has no images")
            } else if gallery.images.len() > MAX_GALLERY_IMAGES {
                Err("gallery has more than three images")
            } else {
                Ok(())
            }
        }
        BlockBody::Table(table) if !table.is_rectangular() => {
            Err("table rows differ from the header column count")
        }
        _ => Ok(()),
    }
}

/// Fill in empty and duplicate ids with `blk-<index>`, skipping any value
/// already taken anywhere in the input.
fn assign_missing_ids(blocks: &mut [Option<ContentBlock>], entries: &[Value]) {
    let mut taken: HashSet<String> = entries
        .iter()
        .filter_map(|e| e.get("id").and_then(Value::as_str))
        .map(str::to_owned)
        .collect();
    let mut seen: HashSet<BlockId> = HashSet::new();

    for (index, slot) in blocks.iter_mut().enumerate() {
        let Some(block) = slot else { continue };
        if !block.id.as_str().is_empty() && seen.insert(block.id.clone()) {
            continue;
        }

        let mut suffix = index;
        let fresh = loop {
            let candidate = BlockId::sequential("blk", suffix);
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
            suffix += entries.len().max(1);
        };
        tracing::debug!(index, old = %block.id, new = %fresh, "reassigning block id");
        taken.insert(fresh.to_string());
        seen.insert(fresh.clone());
        block.id = fresh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{HeadingLevel, ImageBlock};
    use serde_json::json;

    #[test]
    fn keeps_well_formed_blocks() {
        let doc = json!([
            {"id": "a", "type": "heading", "content": "Title", "level": 1},
            {"id": "b", "type": "text", "content": "Body"},
            {"id": "c", "type": "image", "image_url": "https://cdn.example.com/x.png"}
        ]);
        let blocks = validate_blocks(&doc);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], ContentBlock::heading("a", HeadingLevel::H1, "Title"));
        assert_eq!(blocks[1], ContentBlock::text("b", "Body"));
        assert_eq!(
            blocks[2],
            ContentBlock::image("c", ImageBlock::new("https://cdn.example.com/x.png"))
        );
    }

    #[test]
    fn drops_primitives_and_bad_shapes() {
        let doc = json!([
            "just a string",
            42,
            {"id": "h", "type": "heading", "content": "Too deep", "level": 5},
            {"id": "g", "type": "gallery", "images": [
                {"url": "1"}, {"url": "2"}, {"url": "3"}, {"url": "4"}
            ]},
            {"id": "t", "type": "table", "table_data": [["A", "B"], ["1"]]},
            {"id": "ok", "type": "quote", "content": "kept"}
        ]);
        let blocks = validate_blocks(&doc);
        assert_eq!(blocks, vec![ContentBlock::quote("ok", "kept")]);
    }

    #[test]
    fn unknown_type_becomes_empty_text() {
        let doc = json!([
            {"id": "x", "type": "poll", "question": "?"},
            {"id": "y"}
        ]);
        let blocks = validate_blocks(&doc);
        assert_eq!(
            blocks,
            vec![ContentBlock::text("x", ""), ContentBlock::text("y", "")]
        );
    }

    #[test]
    fn missing_and_duplicate_ids_are_replaced() {
        let doc = json!([
            {"type": "text", "content": "no id"},
            {"id": "dup", "type": "text", "content": "first"},
            {"id": "dup", "type": "text", "content": "second"},
            {"id": "blk-0", "type": "text", "content": "already named blk-0"}
        ]);
        let blocks = validate_blocks(&doc);
        let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["blk-4", "dup", "blk-2", "blk-0"]);
    }

    #[test]
    fn non_array_document_is_an_error_from_str() {
        let err = validate_blocks_str(r#"{"id": "a"}"#).unwrap_err();
        assert!(err.to_string().contains("expected an array"));
        assert!(validate_blocks_str("not json").is_err());
    }

    #[test]
    fn syntax_error_keeps_its_location() {
        let err = validate_blocks_str("[\n  {\"id\": }\n]").unwrap_err();
        let ContentError::Parse(parse) = err else {
            panic!("expected a parse error");
        };
        assert_eq!(parse.line_col().map(|(line, _)| line), Some(2));
    }

    #[test]
    fn single_image_gallery_is_valid() {
        let doc = json!([
            {"id": "g", "type": "gallery", "images": [{"url": "a.png", "caption": "A"}]}
        ]);
        assert_eq!(validate_blocks(&doc).len(), 1);
    }
}
