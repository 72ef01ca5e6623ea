//! The rich editor's native document and its mapping to canonical blocks.

mod convert;
mod types;

#[cfg(test)]
mod tests;

pub use convert::{NativeOptions, from_native, to_native};
pub use types::{NativeBlock, NativeBlockKind, NativeDocument, NativeEmbed, NativeGalleryImage, NativeImage};
