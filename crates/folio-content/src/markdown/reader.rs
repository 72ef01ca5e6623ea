//! Line scanner from the Markdown subset back to canonical blocks.

use super::syntax::{
    BULLET_ITEM, CALLOUT_HEADER, CAPTION_LINE, FENCE, HEADING, IMAGE_LINE, NUMBERED_ITEM,
    TABLE_SEPARATOR, embed_link, split_table_row,
};
use crate::blocks::{
    BlockBody, BlockId, CalloutBlock, CalloutTone, ContentBlock, EmbedBlock, GalleryBlock,
    GalleryImage, HeadingBlock, HeadingLevel, ImageBlock, ListBlock, ListType,
    MAX_GALLERY_IMAGES, TableBlock, TextBlock,
};

/// Parse Markdown into canonical blocks with ids `md-0`, `md-1`, ...
pub fn markdown_to_blocks(markdown: &str) -> Vec<ContentBlock> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut reader = MarkdownReader::default();
    reader.read(&lines);
    reader.blocks
}

struct ImageLine<'a> {
    alt: &'a str,
    url: &'a str,
}

#[derive(Default)]
struct MarkdownReader {
    blocks: Vec<ContentBlock>,
    paragraph: Vec<String>,
}

impl MarkdownReader {
    fn push(&mut self, body: BlockBody) {
        let id = BlockId::sequential("md", self.blocks.len());
        tracing::trace!(%id, kind = body.kind(), "markdown block");
        self.blocks.push(ContentBlock::new(id, body));
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.paragraph).join("\n");
        self.push(BlockBody::Text(TextBlock { content }));
    }

    fn read(&mut self, lines: &[&str]) {
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim_end();

            if line.trim().is_empty() {
                self.flush_paragraph();
                i += 1;
                continue;
            }

            if let Some(info) = line.strip_prefix(FENCE) {
                self.flush_paragraph();
                i = self.read_fence(lines, i + 1, info);
                continue;
            }

            if let Some(caps) = HEADING.captures(line) {
                self.flush_paragraph();
                let depth = caps.get(1).map_or(1, |m| m.len());
                let content = caps.get(2).map_or("", |m| m.as_str()).trim();
                self.push(BlockBody::Heading(HeadingBlock {
                    content: content.to_string(),
                    level: HeadingLevel::clamped(depth),
                }));
                i += 1;
                continue;
            }

            if line.starts_with('>') {
                self.flush_paragraph();
                i = self.read_quote(lines, i);
                continue;
            }

            if line.starts_with('|') {
                self.flush_paragraph();
                i = self.read_table(lines, i);
                continue;
            }

            if let Some(list_type) = list_kind(line) {
                self.flush_paragraph();
                i = self.read_list(lines, i, list_type);
                continue;
            }

            if image_line(line).is_some() {
                self.flush_paragraph();
                i = self.read_images(lines, i);
                continue;
            }

            if let Some((title, descriptor)) = embed_link(line) {
                self.flush_paragraph();
                self.push(BlockBody::Embed(EmbedBlock::from_descriptor(descriptor, title)));
                i += 1;
                continue;
            }

            // Trailing whitespace is content here; only the escape goes.
            let raw = lines[i];
            let text = raw.strip_prefix('\\').unwrap_or(raw);
            self.paragraph.push(text.to_string());
            i += 1;
        }
        self.flush_paragraph();
    }

    /// Everything up to the closing fence is kept verbatim. An unclosed fence
    /// runs to the end of input.
    fn read_fence(&mut self, lines: &[&str], start: usize, info: &str) -> usize {
        let mut end = start;
        while end < lines.len() && lines[end].trim_end() != FENCE {
            end += 1;
        }
        if end == lines.len() {
            tracing::debug!(line = start, "unclosed code fence runs to end of input");
        }
        let code = lines[start..end].join("\n");
        self.push(BlockBody::Text(TextBlock::fenced(info.trim(), &code)));
        (end + 1).min(lines.len())
    }

    fn read_quote(&mut self, lines: &[&str], start: usize) -> usize {
        let mut end = start;
        let mut body: Vec<&str> = Vec::new();
        while end < lines.len() {
            let Some(rest) = lines[end].trim_end().strip_prefix('>') else {
                break;
            };
            body.push(rest.strip_prefix(' ').unwrap_or(rest));
            end += 1;
        }

        let callout = body
            .first()
            .and_then(|first| CALLOUT_HEADER.captures(first))
            .and_then(|caps| {
                let tone = CalloutTone::parse(caps.get(1)?.as_str())?;
                let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
                Some((tone, rest))
            });

        match callout {
            Some((tone, rest)) => {
                let mut content_lines: Vec<&str> = body[1..].to_vec();
                let icon = if is_icon(rest) {
                    Some(rest.to_string())
                } else {
                    if !rest.is_empty() {
                        content_lines.insert(0, rest);
                    }
                    None
                };
                self.push(BlockBody::Callout(CalloutBlock {
                    content: content_lines.join("\n"),
                    icon,
                    tone,
                }));
            }
            None => self.push(BlockBody::Quote(TextBlock {
                content: body.join("\n"),
            })),
        }
        end
    }

    /// Separator rows are skipped; ragged rows are fitted to the header.
    fn read_table(&mut self, lines: &[&str], start: usize) -> usize {
        let mut end = start;
        let mut rows: Vec<Vec<String>> = Vec::new();
        while end < lines.len() && lines[end].trim_start().starts_with('|') {
            let line = lines[end].trim();
            end += 1;
            if TABLE_SEPARATOR.is_match(line) {
                continue;
            }
            rows.push(split_table_row(line));
        }

        let width = rows.first().map_or(0, Vec::len);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        self.push(BlockBody::Table(TableBlock { table_data: rows }));
        end
    }

    fn read_list(&mut self, lines: &[&str], start: usize, list_type: ListType) -> usize {
        let mut end = start;
        let mut items = Vec::new();
        while end < lines.len() {
            let line = lines[end].trim_end();
            if list_kind(line) != Some(list_type) {
                break;
            }
            let re = match list_type {
                ListType::Bullet => &BULLET_ITEM,
                ListType::Numbered => &NUMBERED_ITEM,
            };
            let item = re
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str());
            items.push(item.trim().to_string());
            end += 1;
        }
        self.push(BlockBody::List(ListBlock { list_type, items }));
        end
    }

    /// A run of adjacent image lines, then an optional caption line. One
    /// image is an image block; longer runs become galleries of up to three.
    fn read_images(&mut self, lines: &[&str], start: usize) -> usize {
        let mut end = start;
        let mut run: Vec<ImageLine<'_>> = Vec::new();
        while let Some(image) = lines.get(end).and_then(|l| image_line(l.trim_end())) {
            run.push(image);
            end += 1;
        }

        let caption = lines
            .get(end)
            .and_then(|l| CAPTION_LINE.captures(l.trim_end()))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        if caption.is_some() {
            end += 1;
        }
        let caption = caption.unwrap_or_default();

        if let [single] = run.as_slice() {
            self.push(BlockBody::Image(ImageBlock {
                image_url: single.url.to_string(),
                alt_text: single.alt.to_string(),
                caption,
                ..Default::default()
            }));
            return end;
        }

        let chunks: Vec<&[ImageLine<'_>]> = run.chunks(MAX_GALLERY_IMAGES).collect();
        let last = chunks.len().saturating_sub(1);
        for (n, chunk) in chunks.into_iter().enumerate() {
            let caption = if n == last { caption.clone() } else { String::new() };
            let body = match chunk {
                [single] => BlockBody::Image(ImageBlock {
                    image_url: single.url.to_string(),
                    caption: if caption.is_empty() {
                        single.alt.to_string()
                    } else {
                        caption
                    },
                    ..Default::default()
                }),
                images => BlockBody::Gallery(GalleryBlock {
                    images: images
                        .iter()
                        .map(|image| GalleryImage::new(image.url, image.alt))
                        .collect(),
                    caption,
                }),
            };
            self.push(body);
        }
        end
    }
}

fn list_kind(line: &str) -> Option<ListType> {
    if BULLET_ITEM.is_match(line) {
        Some(ListType::Bullet)
    } else if NUMBERED_ITEM.is_match(line) {
        Some(ListType::Numbered)
    } else {
        None
    }
}

fn image_line(line: &str) -> Option<ImageLine<'_>> {
    let caps = IMAGE_LINE.captures(line)?;
    Some(ImageLine {
        alt: caps.get(1)?.as_str(),
        url: caps.get(2)?.as_str(),
    })
}

/// A short run of non-alphanumeric characters, i.e. an emoji.
fn is_icon(text: &str) -> bool {
    !text.is_empty() && text.chars().count() <= 8 && !text.chars().any(char::is_alphanumeric)
}
