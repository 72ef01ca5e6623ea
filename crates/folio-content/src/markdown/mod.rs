//! Canonical blocks to and from the Markdown subset used for export and
//! paste import.

mod reader;
mod syntax;
mod writer;


pub use reader::markdown_to_blocks;
pub use writer::{blocks_to_markdown, convert_block};
