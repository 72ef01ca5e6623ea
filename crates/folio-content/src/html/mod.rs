//! One-way import of pasted or uploaded HTML.
//!
//! Import always goes through [`sanitize_html`]; the importer only accepts a
//! [`SanitizedFragment`], which nothing else can construct.

mod import;
mod sanitize;


pub use import::{blocks_from_sanitized, html_to_blocks};
pub use sanitize::{MAX_DEPTH, SanitizedElement, SanitizedFragment, SanitizedNode, Tag, sanitize_html};
