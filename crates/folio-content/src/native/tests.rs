use folio_common::{MediaConfig, MissingImagePolicy};
use serde_json::json;

use super::*;
use crate::blocks::{
    BlockBody, CalloutBlock, CalloutTone, ContentBlock, GalleryBlock, GalleryImage, HeadingLevel,
    ImageBlock, ListBlock, ListType, TableBlock, TextBlock,
};
use crate::inline::{StyledRun, Styles, TextRun};

fn list(id: &str, list_type: ListType, items: &[&str]) -> ContentBlock {
    ContentBlock::new(
        id,
        BlockBody::List(ListBlock {
            list_type,
            items: items.iter().map(|s| s.to_string()).collect(),
        }),
    )
}

fn native(value: serde_json::Value) -> NativeDocument {
    serde_json::from_value(value).unwrap()
}

#[test]
fn paragraph_text_is_tokenized() {
    let doc = to_native(
        &[ContentBlock::text("p", "**Yields** rose [sharply](https://example.com)")],
        &NativeOptions::default(),
    );
    assert_eq!(
        doc.blocks,
        vec![NativeBlock::new(
            "p",
            NativeBlockKind::Paragraph {
                content: vec![
                    StyledRun::styled("Yields", Styles::BOLD),
                    StyledRun::plain(" rose "),
                    StyledRun::link("https://example.com", vec![TextRun::plain("sharply")]),
                ]
            }
        )]
    );
}

#[test]
fn list_expands_to_items_and_merges_back() {
    let blocks = vec![
        list("l", ListType::Bullet, &["one", "*two*", "three"]),
        ContentBlock::text("t", "after"),
    ];
    let options = NativeOptions::default();
    let doc = to_native(&blocks, &options);

    let ids: Vec<&str> = doc.blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["l", "l-1", "l-2", "t"]);
    assert!(matches!(
        doc.blocks[1].kind,
        NativeBlockKind::BulletListItem { .. }
    ));

    assert_eq!(from_native(&doc, &options), blocks);
}

#[test]
fn different_list_kinds_stay_separate() {
    let doc = native(json!({"blocks": [
        {"id": "a", "type": "bulletListItem", "content": [{"type": "text", "text": "x"}]},
        {"id": "b", "type": "bulletListItem", "content": [{"type": "text", "text": "y"}]},
        {"id": "c", "type": "numberedListItem", "content": [{"type": "text", "text": "first"}]},
        {"id": "d", "type": "paragraph", "content": []},
        {"id": "e", "type": "bulletListItem", "content": [{"type": "text", "text": "z"}]}
    ]}));
    let blocks = from_native(&doc, &NativeOptions::default());
    assert_eq!(
        blocks,
        vec![
            list("a", ListType::Bullet, &["x", "y"]),
            list("c", ListType::Numbered, &["first"]),
            ContentBlock::text("d", ""),
            list("e", ListType::Bullet, &["z"]),
        ]
    );
}

#[test]
fn adjacent_lists_of_one_kind_keep_their_ids() {
    let blocks = vec![
        list("a", ListType::Bullet, &["1", "2"]),
        list("b", ListType::Bullet, &["3"]),
    ];
    let options = NativeOptions::default();
    let doc = to_native(&blocks, &options);

    let value = serde_json::to_value(&doc.blocks[2]).unwrap();
    assert_eq!(value["listId"], "b");
    assert_eq!(from_native(&doc, &options), blocks);
}

#[test]
fn list_survives_losing_its_first_item() {
    let doc = native(json!({"blocks": [
        {"id": "a-1", "type": "numberedListItem", "listId": "a", "content": [{"type": "text", "text": "two"}]},
        {"id": "new", "type": "numberedListItem", "content": [{"type": "text", "text": "three"}]},
        {"id": "b", "type": "numberedListItem", "listId": "b", "content": [{"type": "text", "text": "other"}]}
    ]}));
    let blocks = from_native(&doc, &NativeOptions::default());
    assert_eq!(
        blocks,
        vec![
            list("a", ListType::Numbered, &["two", "three"]),
            list("b", ListType::Numbered, &["other"]),
        ]
    );
}

#[test]
fn code_blocks_become_fenced_text() {
    let doc = native(json!({"blocks": [
        {"id": "c", "type": "codeBlock", "language": "python", "code": "print(1)\n"}
    ]}));
    let blocks = from_native(&doc, &NativeOptions::default());
    assert_eq!(blocks, vec![ContentBlock::text("c", "```python\nprint(1)\n```")]);

    let back = to_native(&blocks, &NativeOptions::default());
    assert_eq!(
        back.blocks[0].kind,
        NativeBlockKind::CodeBlock {
            language: "python".into(),
            code: "print(1)".into()
        }
    );
}

#[test]
fn heading_levels_clamp() {
    let doc = native(json!({"blocks": [
        {"id": "h", "type": "heading", "level": 5, "content": [{"type": "text", "text": "Deep"}]}
    ]}));
    let blocks = from_native(&doc, &NativeOptions::default());
    assert_eq!(blocks, vec![ContentBlock::heading("h", HeadingLevel::H3, "Deep")]);
}

#[test]
fn image_urls_are_normalized() {
    let options = NativeOptions {
        media: MediaConfig {
            base_url: "https://cdn.example.com".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let blocks = vec![ContentBlock::image("i", ImageBlock::new("/uploads/fed.png"))];
    let doc = to_native(&blocks, &options);
    let NativeBlockKind::Image(image) = &doc.blocks[0].kind else {
        panic!("expected image");
    };
    assert_eq!(
        image.url.as_deref(),
        Some("https://cdn.example.com/uploads/fed.png")
    );
}

#[test]
fn url_less_images_follow_policy() {
    let doc = native(json!({"blocks": [
        {"id": "i", "type": "image", "alt": "pending"},
        {"id": "t", "type": "paragraph", "content": [{"type": "text", "text": "kept"}]}
    ]}));

    let dropped = from_native(&doc, &NativeOptions::default());
    assert_eq!(dropped, vec![ContentBlock::text("t", "kept")]);

    let placeholder = from_native(
        &doc,
        &NativeOptions {
            missing_images: MissingImagePolicy::Placeholder,
            ..Default::default()
        },
    );
    assert_eq!(placeholder.len(), 2);
    let BlockBody::Image(image) = &placeholder[0].body else {
        panic!("expected image placeholder");
    };
    assert_eq!(image.image_url, "");
    assert_eq!(image.alt_text, "pending");
}

#[test]
fn gallery_drops_url_less_images_and_collapses() {
    let doc = native(json!({"blocks": [
        {"id": "g", "type": "gallery", "caption": "Q3", "images": [
            {"url": "https://img.example.com/a.png", "caption": "a"},
            {"caption": "uploading"}
        ]}
    ]}));
    let blocks = from_native(&doc, &NativeOptions::default());
    assert_eq!(
        blocks,
        vec![ContentBlock::image(
            "g",
            ImageBlock {
                image_url: "https://img.example.com/a.png".into(),
                caption: "a".into(),
                ..Default::default()
            }
        )]
    );
}

#[test]
fn gallery_survives_round_trip() {
    let blocks = vec![ContentBlock::new(
        "g",
        BlockBody::Gallery(GalleryBlock {
            images: vec![
                GalleryImage::new("https://img.example.com/a.png", "a"),
                GalleryImage::new("https://img.example.com/b.png", "b"),
            ],
            caption: "pair".into(),
        }),
    )];
    let options = NativeOptions::default();
    assert_eq!(from_native(&to_native(&blocks, &options), &options), blocks);
}

#[test]
fn table_cells_round_trip_and_pad() {
    let blocks = vec![ContentBlock::new(
        "t",
        BlockBody::Table(TableBlock {
            table_data: vec![
                vec!["Fund".into(), "**Return**".into()],
                vec!["A".into(), "4%".into()],
            ],
        }),
    )];
    let options = NativeOptions::default();
    assert_eq!(from_native(&to_native(&blocks, &options), &options), blocks);

    let ragged = native(json!({"blocks": [
        {"id": "t", "type": "table", "rows": [
            [[{"type": "text", "text": "A"}], [{"type": "text", "text": "B"}]],
            [[{"type": "text", "text": "1"}]]
        ]}
    ]}));
    let converted = from_native(&ragged, &options);
    let BlockBody::Table(table) = &converted[0].body else {
        panic!("expected table");
    };
    assert_eq!(table.table_data, vec![vec!["A", "B"], vec!["1", ""]]);
}

#[test]
fn callout_keeps_tone_and_icon() {
    let blocks = vec![ContentBlock::new(
        "c",
        BlockBody::Callout(CalloutBlock {
            content: "Mind the *gap*".into(),
            icon: Some("💡".into()),
            tone: CalloutTone::Warning,
        }),
    )];
    let options = NativeOptions::default();
    assert_eq!(from_native(&to_native(&blocks, &options), &options), blocks);
}

#[test]
fn quote_and_plain_text_round_trip() {
    let blocks = vec![
        ContentBlock::quote("q", "Markets are ~~never~~ rarely calm"),
        ContentBlock::new("t", BlockBody::Text(TextBlock::default())),
    ];
    let options = NativeOptions::default();
    assert_eq!(from_native(&to_native(&blocks, &options), &options), blocks);
}
