//! Folio content engine
//!
//! Articles are stored as a flat list of [`ContentBlock`]s. This crate holds
//! that model and everything that converts into or out of it: the inline
//! style tokenizer, the rich editor's native document, Markdown, sanitized
//! HTML import, gallery row layout and third-party embed resolution.
//!
//! Conversions never fail on malformed content. Anything that cannot be
//! represented is dropped and reported through `tracing`.

pub mod blocks;
pub mod embed;
pub mod error;
pub mod gallery;
pub mod html;
pub mod inline;
pub mod markdown;
pub mod native;

pub use blocks::{BlockBody, BlockId, ContentBlock, validate_blocks, validate_blocks_str};
pub use embed::{EmbedDescriptor, SandboxPolicy, resolve_embed, sandbox_policy, whitelisted_domains};
pub use error::ContentError;
pub use gallery::{GalleryLayout, GalleryLayoutParams, GalleryMeasurements, ImageDimensions, compute_layout};
pub use html::{html_to_blocks, sanitize_html};
pub use inline::{StyledRun, parse_inline, plain_text, serialize_inline};
pub use markdown::{blocks_to_markdown, markdown_to_blocks};
pub use native::{NativeDocument, NativeOptions, from_native, to_native};
