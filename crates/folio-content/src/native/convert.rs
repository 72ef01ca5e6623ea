//! Canonical blocks to editor blocks and back.

use folio_common::{MediaConfig, MissingImagePolicy};

use super::types::{NativeBlock, NativeBlockKind, NativeDocument, NativeEmbed, NativeGalleryImage, NativeImage};
use crate::blocks::{
    BlockBody, BlockId, CalloutBlock, ContentBlock, EmbedBlock, GalleryBlock, GalleryImage,
    HeadingBlock, HeadingLevel, ImageBlock, ListBlock, ListType, MAX_GALLERY_IMAGES, TableBlock,
    TextBlock, collapse_gallery,
};
use crate::inline::{StyledRun, parse_inline, serialize_inline};

/// Settings shared by both directions.
#[derive(Debug, Clone, Default)]
pub struct NativeOptions {
    pub media: MediaConfig,
    pub missing_images: MissingImagePolicy,
}

impl From<&folio_common::Config> for NativeOptions {
    fn from(config: &folio_common::Config) -> Self {
        Self {
            media: config.media.clone(),
            missing_images: config.missing_images,
        }
    }
}

/// Convert canonical blocks into an editor document.
pub fn to_native(blocks: &[ContentBlock], options: &NativeOptions) -> NativeDocument {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        tracing::trace!(id = %block.id, kind = block.kind(), "to native");
        push_native(block, options, &mut out);
    }
    NativeDocument { blocks: out }
}

fn push_native(block: &ContentBlock, options: &NativeOptions, out: &mut Vec<NativeBlock>) {
    let id = block.id.clone();
    let kind = match &block.body {
        BlockBody::Heading(heading) => NativeBlockKind::Heading {
            level: heading.level.into(),
            content: parse_inline(&heading.content),
        },
        BlockBody::Text(text) => match text.as_fence() {
            Some(fence) => NativeBlockKind::CodeBlock {
                language: fence.language.to_string(),
                code: fence.code.to_string(),
            },
            None => NativeBlockKind::Paragraph {
                content: parse_inline(&text.content),
            },
        },
        BlockBody::Quote(quote) => NativeBlockKind::Quote {
            content: parse_inline(&quote.content),
        },
        BlockBody::Callout(callout) => NativeBlockKind::Callout {
            content: parse_inline(&callout.content),
            icon: callout.icon.clone(),
            tone: callout.tone,
        },
        BlockBody::Image(image) => NativeBlockKind::Image(native_image(image, &options.media)),
        BlockBody::Infographic(image) => {
            NativeBlockKind::Infographic(native_image(image, &options.media))
        }
        BlockBody::Gallery(gallery) => NativeBlockKind::Gallery {
            images: gallery
                .images
                .iter()
                .map(|image| NativeGalleryImage {
                    url: options.media.normalize_url(&image.url),
                    caption: image.caption.clone(),
                })
                .collect(),
            caption: gallery.caption.clone(),
        },
        BlockBody::List(list) => {
            push_list_items(&id, list, out);
            return;
        }
        BlockBody::Table(table) => NativeBlockKind::Table {
            rows: table
                .table_data
                .iter()
                .map(|row| row.iter().map(|cell| parse_inline(cell)).collect())
                .collect(),
        },
        BlockBody::Embed(embed) => NativeBlockKind::Embed(NativeEmbed {
            url: embed.url.clone(),
            embed_url: embed.embed_url.clone(),
            provider: embed.provider.clone(),
            provider_type: embed.provider_type,
            thumbnail_url: embed.thumbnail_url.clone(),
            aspect_ratio: embed.aspect_ratio.clone(),
            caption: embed.content.clone(),
        }),
    };
    out.push(NativeBlock { id, kind });
}

/// One editor item per list entry. The first keeps the list id, and every
/// item records it as `list_id` so adjacent lists of one kind stay apart on
/// the way back.
fn push_list_items(id: &BlockId, list: &ListBlock, out: &mut Vec<NativeBlock>) {
    if list.items.is_empty() {
        tracing::debug!(%id, "empty list has no editor representation");
    }
    for (n, item) in list.items.iter().enumerate() {
        let item_id = if n == 0 {
            id.clone()
        } else {
            BlockId::new(format!("{id}-{n}"))
        };
        let content = parse_inline(item);
        let list_id = Some(id.clone());
        let kind = match list.list_type {
            ListType::Bullet => NativeBlockKind::BulletListItem { content, list_id },
            ListType::Numbered => NativeBlockKind::NumberedListItem { content, list_id },
        };
        out.push(NativeBlock { id: item_id, kind });
    }
}

fn native_image(image: &ImageBlock, media: &MediaConfig) -> NativeImage {
    NativeImage {
        url: media.normalize_url(&image.image_url),
        alt: image.alt_text.clone(),
        caption: image.caption.clone(),
        size: image.size,
        alignment: image.alignment,
    }
}

/// Convert an editor document into canonical blocks.
///
/// Consecutive list items of the same kind merge into one list block that
/// keeps the first item's id. An item whose `list_id` names a different list
/// starts a new one.
pub fn from_native(document: &NativeDocument, options: &NativeOptions) -> Vec<ContentBlock> {
    let mut out: Vec<ContentBlock> = Vec::with_capacity(document.blocks.len());

    for block in &document.blocks {
        tracing::trace!(id = %block.id, kind = block.kind.name(), "from native");
        let body = match &block.kind {
            NativeBlockKind::Paragraph { content } => BlockBody::Text(TextBlock {
                content: serialize_inline(content),
            }),
            NativeBlockKind::Heading { level, content } => BlockBody::Heading(HeadingBlock {
                content: serialize_inline(content),
                level: HeadingLevel::clamped(usize::from(*level)),
            }),
            NativeBlockKind::Quote { content } => BlockBody::Quote(TextBlock {
                content: serialize_inline(content),
            }),
            NativeBlockKind::Callout {
                content,
                icon,
                tone,
            } => BlockBody::Callout(CalloutBlock {
                content: serialize_inline(content),
                icon: icon.clone(),
                tone: *tone,
            }),
            NativeBlockKind::BulletListItem { content, list_id } => {
                let item = ListEntry {
                    id: &block.id,
                    list_id: list_id.as_ref(),
                    list_type: ListType::Bullet,
                };
                merge_list_item(&mut out, item, content);
                continue;
            }
            NativeBlockKind::NumberedListItem { content, list_id } => {
                let item = ListEntry {
                    id: &block.id,
                    list_id: list_id.as_ref(),
                    list_type: ListType::Numbered,
                };
                merge_list_item(&mut out, item, content);
                continue;
            }
            NativeBlockKind::CodeBlock { language, code } => {
                BlockBody::Text(TextBlock::fenced(language, code))
            }
            NativeBlockKind::Image(image) => match canonical_image(&block.id, image, options) {
                Some(image) => BlockBody::Image(image),
                None => continue,
            },
            NativeBlockKind::Infographic(image) => {
                match canonical_image(&block.id, image, options) {
                    Some(image) => BlockBody::Infographic(image),
                    None => continue,
                }
            }
            NativeBlockKind::Gallery { images, caption } => {
                canonical_gallery(&block.id, images, caption, &options.media)
            }
            NativeBlockKind::Table { rows } => BlockBody::Table(canonical_table(rows)),
            NativeBlockKind::Embed(embed) => BlockBody::Embed(EmbedBlock {
                url: embed.url.clone(),
                embed_url: embed.embed_url.clone(),
                provider: embed.provider.clone(),
                provider_type: embed.provider_type,
                thumbnail_url: embed.thumbnail_url.clone(),
                aspect_ratio: embed.aspect_ratio.clone(),
                content: embed.caption.clone(),
            }),
        };
        out.push(ContentBlock::new(block.id.clone(), body));
    }

    out
}

struct ListEntry<'a> {
    id: &'a BlockId,
    list_id: Option<&'a BlockId>,
    list_type: ListType,
}

fn merge_list_item(out: &mut Vec<ContentBlock>, entry: ListEntry<'_>, content: &[StyledRun]) {
    let item = serialize_inline(content);
    if let Some(ContentBlock {
        id,
        body: BlockBody::List(list),
    }) = out.last_mut()
    {
        let same_list = entry.list_id.is_none_or(|list_id| *list_id == *id);
        if list.list_type == entry.list_type && same_list {
            list.items.push(item);
            return;
        }
    }
    // A list whose first item was deleted keeps its id, unless that id is
    // already taken by an earlier block.
    let id = match entry.list_id {
        Some(list_id) if !out.iter().any(|block| block.id == *list_id) => list_id,
        _ => entry.id,
    };
    out.push(ContentBlock::new(
        id.clone(),
        BlockBody::List(ListBlock {
            list_type: entry.list_type,
            items: vec![item],
        }),
    ));
}

fn canonical_image(id: &BlockId, image: &NativeImage, options: &NativeOptions) -> Option<ImageBlock> {
    let url = image
        .url
        .as_deref()
        .and_then(|url| options.media.normalize_url(url));

    let image_url = match (url, options.missing_images) {
        (Some(url), _) => url,
        (None, MissingImagePolicy::Drop) => {
            tracing::warn!(%id, "dropping image block without a URL");
            return None;
        }
        (None, MissingImagePolicy::Placeholder) => {
            tracing::warn!(%id, "keeping image block without a URL as a placeholder");
            String::new()
        }
    };

    Some(ImageBlock {
        image_url,
        alt_text: image.alt.clone(),
        caption: image.caption.clone(),
        size: image.size,
        alignment: image.alignment,
    })
}

fn canonical_gallery(
    id: &BlockId,
    images: &[NativeGalleryImage],
    caption: &str,
    media: &MediaConfig,
) -> BlockBody {
    let mut kept = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        match image.url.as_deref().and_then(|url| media.normalize_url(url)) {
            Some(url) => kept.push(GalleryImage::new(url, image.caption.clone())),
            None => tracing::warn!(%id, index, "dropping gallery image without a URL"),
        }
    }
    if kept.len() > MAX_GALLERY_IMAGES {
        tracing::warn!(%id, count = kept.len(), max = MAX_GALLERY_IMAGES, "truncating oversized gallery");
        kept.truncate(MAX_GALLERY_IMAGES);
    }
    collapse_gallery(GalleryBlock {
        images: kept,
        caption: caption.to_string(),
    })
}

/// Ragged rows are padded or cut to the header width.
fn canonical_table(rows: &[Vec<Vec<StyledRun>>]) -> TableBlock {
    let width = rows.first().map_or(0, Vec::len);
    let table_data = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|cell| serialize_inline(cell)).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();
    TableBlock { table_data }
}
