//! Shared plumbing for the folio crates: errors, configuration and tracing setup.

pub mod config;
pub mod error;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::config::{
    Config, FileStore, GalleryConfig, Loader, MediaConfig, MissingImagePolicy, Saver,
};
pub use crate::error::{ConfigError, FolioError, ParseError, ParseErrorKind, SerDeError};
