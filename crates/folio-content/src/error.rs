use folio_common::ParseError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ContentError {
    #[error(transparent)]
    #[diagnostic_source]
    Parse(#[from] ParseError),

    #[error("gallery already holds the maximum of {max} images")]
    #[diagnostic(
        code(folio::content::gallery_full),
        help("start a new gallery block below this one")
    )]
    GalleryFull { max: usize },

    #[error("a {kind} block cannot absorb an image")]
    #[diagnostic(code(folio::content::not_an_image_target))]
    NotAnImageTarget { kind: &'static str },

    #[error("only image blocks can be absorbed into a gallery, got {kind}")]
    #[diagnostic(code(folio::content::not_an_image))]
    NotAnImage { kind: &'static str },

    #[error("inline span {start}..{end} does not fall on character boundaries")]
    #[diagnostic(code(folio::content::inline_slice))]
    InlineSlice { start: usize, end: usize },
}
