mod fence;
mod lifecycle;
mod types;
mod validate;

pub use fence::CodeFence;
pub use lifecycle::{absorb_image, remove_gallery_image};
pub(crate) use lifecycle::collapse_gallery;
pub use types::{
    Alignment, BlockBody, BlockId, CalloutBlock, CalloutTone, ContentBlock, EmbedBlock,
    GalleryBlock, GalleryImage, HeadingBlock, HeadingLevel, ImageBlock, ImageSize, ListBlock,
    ListType, MAX_GALLERY_IMAGES, ProviderType, TableBlock, TextBlock,
};
pub(crate) use validate::check_invariants;
pub use validate::{validate_blocks, validate_blocks_str};
