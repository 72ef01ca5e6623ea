//! Inline style tokenizer: marker text such as `**bold**` in one direction,
//! styled runs in the other.

mod output;
mod parser;
mod types;

pub use output::{
    MarkdownRunOutput, PlainRunOutput, RunOutput, Style, plain_text, process_runs,
    serialize_inline,
};
pub use parser::parse_inline;
pub use types::{LinkRun, StyledRun, Styles, TextRun};
