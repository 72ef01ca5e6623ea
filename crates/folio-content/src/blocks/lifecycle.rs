//! Image/gallery transitions.
//!
//! Dropping an image onto an image block turns it into a gallery; removing
//! images from a gallery collapses it back to an image block, and finally to
//! an empty text block. The block id survives every transition so the editor
//! keeps focus on the same slot.

use super::types::{
    BlockBody, ContentBlock, GalleryBlock, GalleryImage, ImageBlock, MAX_GALLERY_IMAGES,
    TextBlock,
};
use crate::error::ContentError;

/// Merge `incoming` (an image block) into `target` (an image or gallery block).
///
/// `target` is only read, so on error the caller still holds it unchanged.
pub fn absorb_image(
    target: &ContentBlock,
    incoming: &ContentBlock,
) -> Result<ContentBlock, ContentError> {
    let new_image = match &incoming.body {
        BlockBody::Image(image) | BlockBody::Infographic(image) => gallery_image(image),
        other => {
            return Err(ContentError::NotAnImage { kind: other.kind() });
        }
    };

    let body = match &target.body {
        BlockBody::Image(image) | BlockBody::Infographic(image) => {
            BlockBody::Gallery(GalleryBlock {
                images: vec![gallery_image(image), new_image],
                caption: String::new(),
            })
        }
        BlockBody::Gallery(gallery) => {
            if gallery.images.len() >= MAX_GALLERY_IMAGES {
                return Err(ContentError::GalleryFull {
                    max: MAX_GALLERY_IMAGES,
                });
            }
            let mut gallery = gallery.clone();
            gallery.images.push(new_image);
            BlockBody::Gallery(gallery)
        }
        other => {
            return Err(ContentError::NotAnImageTarget { kind: other.kind() });
        }
    };

    Ok(ContentBlock::new(target.id.clone(), body))
}

/// Remove the image at `index` from a gallery block, collapsing it when one
/// or zero images remain. Non-gallery blocks and out-of-range indexes come
/// back unchanged.
pub fn remove_gallery_image(block: ContentBlock, index: usize) -> ContentBlock {
    let ContentBlock { id, body } = block;
    let mut gallery = match body {
        BlockBody::Gallery(gallery) => gallery,
        other => {
            tracing::debug!(%id, kind = other.kind(), "remove_gallery_image on a non-gallery block");
            return ContentBlock { id, body: other };
        }
    };

    if index >= gallery.images.len() {
        tracing::warn!(%id, index, len = gallery.images.len(), "gallery image index out of range");
        return ContentBlock {
            id,
            body: BlockBody::Gallery(gallery),
        };
    }

    gallery.images.remove(index);
    ContentBlock {
        id,
        body: collapse_gallery(gallery),
    }
}

/// The body a gallery should have given how many images it holds.
pub(crate) fn collapse_gallery(mut gallery: GalleryBlock) -> BlockBody {
    match gallery.images.len() {
        0 => BlockBody::Text(TextBlock::default()),
        1 => {
            let remaining = gallery.images.remove(0);
            BlockBody::Image(ImageBlock {
                image_url: remaining.url,
                caption: remaining.caption,
                ..Default::default()
            })
        }
        _ => BlockBody::Gallery(gallery),
    }
}

fn gallery_image(image: &ImageBlock) -> GalleryImage {
    GalleryImage::new(image.image_url.clone(), image.caption.clone())
}
