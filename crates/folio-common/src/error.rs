//! Error types shared across the folio crates.

use miette::{Diagnostic, NamedSource, SourceOffset, SourceSpan};
use std::borrow::Cow;
use std::path::PathBuf;

/// Main error type for folio operations outside the pure conversion core.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum FolioError {
    /// Configuration could not be loaded or saved
    #[error(transparent)]
    #[diagnostic_source]
    Config(#[from] ConfigError),

    /// IO error
    #[error(transparent)]
    #[diagnostic(code(folio::io))]
    Io(#[from] std::io::Error),

    /// Parse error with source location
    #[error(transparent)]
    #[diagnostic_source]
    Parse(#[from] ParseError),

    /// Serialization/deserialization error
    #[error(transparent)]
    #[diagnostic_source]
    Serde(#[from] SerDeError),
}

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("unsupported config format for {}", path.display())]
    #[diagnostic(
        code(folio::config::format),
        help("use a .toml or .json file")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read config {}", path.display())]
    #[diagnostic(code(folio::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {}", path.display())]
    #[diagnostic(code(folio::config::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config syntax in {}", path.display())]
    #[diagnostic(code(folio::config::syntax))]
    Syntax {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Parse error with source code location information
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("parse error: {}", self.kind)]
#[diagnostic(code(folio::parse))]
pub struct ParseError {
    #[diagnostic_source]
    kind: ParseErrorKind,
    #[source_code]
    src: NamedSource<Cow<'static, str>>,
    #[label("error")]
    err_location: SourceSpan,
    err_line_col: Option<(usize, usize)>,
    #[help]
    advice: Option<String>,
}

impl ParseError {
    /// Build a parse error that is not tied to any JSON input, e.g. a
    /// document whose top level is not an array.
    pub fn shape(message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::Shape(message.into()),
            src: NamedSource::new(Cow::Borrowed("input"), Cow::Borrowed("")),
            err_location: SourceSpan::new(SourceOffset::from(0), 0),
            err_line_col: None,
            advice: None,
        }
    }

    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    /// Attach the original input so the diagnostic can point into it.
    pub fn with_source(self, src: NamedSource<Cow<'static, str>>) -> Self {
        if let Some((line, column)) = self.err_line_col {
            let location = SourceSpan::new(
                SourceOffset::from_location(src.inner(), line, column),
                self.err_location.len(),
            );
            Self {
                kind: self.kind,
                src,
                err_location: location,
                err_line_col: Some((line, column)),
                advice: self.advice,
            }
        } else {
            Self {
                kind: self.kind,
                src,
                err_location: self.err_location,
                err_line_col: self.err_line_col,
                advice: self.advice,
            }
        }
    }

    pub fn line_col(&self) -> Option<(usize, usize)> {
        self.err_line_col
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error(transparent)]
    SerdeError(#[from] SerDeError),
    #[error("unexpected document shape: {0}")]
    Shape(String),
}

/// Serialization/deserialization errors
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SerDeError {
    #[error(transparent)]
    #[diagnostic(code(folio::serde::json))]
    Json(#[from] serde_json::Error),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        let location = SourceSpan::new(SourceOffset::from_location("", line, column), 0);
        Self {
            kind: ParseErrorKind::SerdeError(SerDeError::Json(err)),
            src: NamedSource::new(Cow::Borrowed("json"), Cow::Borrowed("")),
            err_location: location,
            advice: None,
            err_line_col: Some((line, column)),
        }
    }
}
