use folio_content::blocks::{
    BlockBody, CalloutBlock, CalloutTone, GalleryBlock, GalleryImage, HeadingLevel, ImageBlock,
    ListBlock, ListType, TableBlock, TextBlock,
};
use folio_content::{
    ContentBlock, NativeOptions, blocks_to_markdown, from_native, html_to_blocks,
    markdown_to_blocks, to_native, validate_blocks_str,
};

fn bodies(blocks: &[ContentBlock]) -> Vec<BlockBody> {
    blocks.iter().map(|b| b.body.clone()).collect()
}

fn sample_article() -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading("b1", HeadingLevel::H1, "Week in markets"),
        ContentBlock::text("b2", "Bond yields **rose** while ~~tech~~ energy led."),
        ContentBlock::new(
            "b3",
            BlockBody::List(ListBlock {
                list_type: ListType::Bullet,
                items: vec!["Oil up 3%".into(), "Gold *flat*".into()],
            }),
        ),
        ContentBlock::new(
            "b4",
            BlockBody::Callout(CalloutBlock {
                content: "Not investment advice.".into(),
                icon: None,
                tone: CalloutTone::Danger,
            }),
        ),
        ContentBlock::new(
            "b5",
            BlockBody::Gallery(GalleryBlock {
                images: vec![
                    GalleryImage::new("https://img.example.com/a.png", "Oil"),
                    GalleryImage::new("https://img.example.com/b.png", "Gold"),
                ],
                caption: "Commodities".into(),
            }),
        ),
        ContentBlock::new(
            "b6",
            BlockBody::Table(TableBlock {
                table_data: vec![
                    vec!["Asset".into(), "Change".into()],
                    vec!["Oil".into(), "+3%".into()],
                ],
            }),
        ),
        ContentBlock::text("b7", "```sql\nselect * from prices;\n```"),
    ]
}

#[test]
fn markdown_round_trip_preserves_structure() {
    let article = sample_article();
    let md = blocks_to_markdown(&article);
    let back = markdown_to_blocks(&md);
    assert_eq!(bodies(&back), bodies(&article));
}

#[test]
fn native_round_trip_preserves_ids_and_content() {
    let article = sample_article();
    let options = NativeOptions::default();
    let back = from_native(&to_native(&article, &options), &options);
    assert_eq!(back, article);
}

#[test]
fn native_document_survives_json() {
    let article = sample_article();
    let options = NativeOptions::default();
    let doc = to_native(&article, &options);
    let json = serde_json::to_string(&doc).unwrap();
    let parsed = serde_json::from_str(&json).unwrap();
    assert_eq!(from_native(&parsed, &options), article);
}

#[test]
fn canonical_json_validates_back() {
    let article = sample_article();
    let json = serde_json::to_string(&article).unwrap();
    assert_eq!(validate_blocks_str(&json).unwrap(), article);
}

#[test]
fn html_import_then_markdown_export() {
    let blocks = html_to_blocks(
        r#"<article>
            <h2>Outlook</h2>
            <p>Inflation <em>cooled</em> in <a href="https://example.com/cpi">March</a>.</p>
            <p><img src="/media/cpi.png" alt="CPI chart"></p>
            <script>track()</script>
        </article>"#,
    );
    assert_eq!(
        bodies(&blocks),
        vec![
            ContentBlock::heading("x", HeadingLevel::H2, "Outlook").body,
            BlockBody::Text(TextBlock {
                content: "Inflation *cooled* in [March](https://example.com/cpi).".into()
            }),
            BlockBody::Image(ImageBlock {
                image_url: "/media/cpi.png".into(),
                alt_text: "CPI chart".into(),
                ..Default::default()
            }),
        ]
    );

    insta::assert_snapshot!(blocks_to_markdown(&blocks), @r"
## Outlook

Inflation *cooled* in [March](https://example.com/cpi).

![CPI chart](/media/cpi.png)
");
}
