use std::fmt::Write;

use crate::blocks::{
    BlockBody, CalloutBlock, ContentBlock, EmbedBlock, GalleryBlock, HeadingBlock, ImageBlock,
    ListBlock, ListType, TableBlock, TextBlock,
};

use super::syntax::needs_escape;

/// Render canonical blocks as Markdown, one blank line between blocks.
pub fn blocks_to_markdown(blocks: &[ContentBlock]) -> String {
    let mut md = String::new();

    for block in blocks {
        let rendered = convert_block(block);
        if rendered.is_empty() {
            tracing::trace!(id = %block.id, kind = block.kind(), "block renders to nothing");
            continue;
        }
        if !md.is_empty() {
            md.push_str("\n\n");
        }
        md.push_str(&rendered);
    }

    if !md.is_empty() {
        md.push('\n');
    }
    md
}

/// One block, without surrounding blank lines.
pub fn convert_block(block: &ContentBlock) -> String {
    let mut md = String::new();

    match &block.body {
        BlockBody::Heading(heading) => convert_heading_block(&mut md, heading),
        BlockBody::Text(text) => convert_text_block(&mut md, text),
        BlockBody::Quote(quote) => convert_quote_block(&mut md, &quote.content),
        BlockBody::Callout(callout) => convert_callout_block(&mut md, callout),
        BlockBody::Image(image) | BlockBody::Infographic(image) => {
            convert_image_block(&mut md, image)
        }
        BlockBody::Gallery(gallery) => convert_gallery_block(&mut md, gallery),
        BlockBody::List(list) => convert_list_block(&mut md, list),
        BlockBody::Table(table) => convert_table_block(&mut md, table),
        BlockBody::Embed(embed) => convert_embed_block(&mut md, embed),
    }

    while md.ends_with('\n') {
        md.pop();
    }
    md
}

fn convert_heading_block(md: &mut String, heading: &HeadingBlock) {
    for _ in 0..heading.level.depth() {
        md.push('#');
    }
    md.push(' ');
    md.push_str(heading.content.trim());
}

fn convert_text_block(md: &mut String, text: &TextBlock) {
    if text.as_fence().is_some() {
        md.push_str(&text.content);
        return;
    }
    // Blank lines would end the paragraph, so they are escaped like any
    // other line that could be mistaken for syntax. An empty block is a
    // single escaped blank line.
    for (i, line) in text.content.split('\n').enumerate() {
        if i > 0 {
            md.push('\n');
        }
        if line.trim().is_empty() || needs_escape(line) {
            md.push('\\');
        }
        md.push_str(line);
    }
}

fn convert_quote_block(md: &mut String, content: &str) {
    for line in content.lines() {
        push_quote_line(md, line);
    }
}

fn push_quote_line(md: &mut String, line: &str) {
    if line.is_empty() {
        md.push_str(">\n");
    } else {
        md.push_str("> ");
        md.push_str(line);
        md.push('\n');
    }
}

fn convert_callout_block(md: &mut String, callout: &CalloutBlock) {
    let _ = write!(md, "> [!{}]", callout.tone.as_str());
    if let Some(icon) = callout.icon.as_deref().filter(|icon| !icon.is_empty()) {
        md.push(' ');
        md.push_str(icon);
    }
    md.push('\n');
    convert_quote_block(md, &callout.content);
}

fn push_image_line(md: &mut String, alt: &str, url: &str) {
    let _ = writeln!(md, "![{}]({})", alt.replace(']', ""), url);
}

fn push_caption_line(md: &mut String, caption: &str) {
    let caption = caption.trim();
    if !caption.is_empty() {
        let _ = writeln!(md, "*{}*", caption);
    }
}

fn convert_image_block(md: &mut String, image: &ImageBlock) {
    if image.image_url.is_empty() {
        return;
    }
    push_image_line(md, &image.alt_text, &image.image_url);
    push_caption_line(md, &image.caption);
}

/// Gallery images carry their caption in the alt slot; the gallery caption
/// follows the last image.
fn convert_gallery_block(md: &mut String, gallery: &GalleryBlock) {
    for image in &gallery.images {
        push_image_line(md, &image.caption, &image.url);
    }
    push_caption_line(md, &gallery.caption);
}

fn convert_list_block(md: &mut String, list: &ListBlock) {
    for (i, item) in list.items.iter().enumerate() {
        match list.list_type {
            ListType::Bullet => md.push_str("- "),
            ListType::Numbered => {
                let _ = write!(md, "{}. ", i + 1);
            }
        }
        // Items are single-line in Markdown.
        md.push_str(&item.replace('\n', " "));
        md.push('\n');
    }
}

fn convert_table_block(md: &mut String, table: &TableBlock) {
    let Some((header, rows)) = table.table_data.split_first() else {
        return;
    };
    push_table_row(md, header);
    md.push('|');
    for _ in header {
        md.push_str(" --- |");
    }
    md.push('\n');
    for row in rows {
        push_table_row(md, row);
    }
}

fn push_table_row(md: &mut String, row: &[String]) {
    md.push('|');
    for cell in row {
        md.push(' ');
        md.push_str(&cell.replace('|', "\\|").replace('\n', " "));
        md.push_str(" |");
    }
    md.push('\n');
}

/// An untitled embed repeats its URL as the link text.
fn convert_embed_block(md: &mut String, embed: &EmbedBlock) {
    let title = if embed.content.is_empty() {
        embed.url.as_str()
    } else {
        embed.content.as_str()
    };
    let _ = write!(md, "[{}]({})", title.replace(']', ""), embed.url);
}
