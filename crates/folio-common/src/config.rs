use serde::{Deserialize, Serialize};

use std::path::Path;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable that overrides [`MediaConfig::base_url`].
pub const MEDIA_BASE_URL_ENV: &str = "FOLIO_MEDIA_BASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What happens to editor images that have no URL yet.
    pub missing_images: MissingImagePolicy,
    /// Console log level, overridden by `RUST_LOG`.
    pub log_level: Option<String>,
    /// How stored image references become servable URLs.
    pub media: MediaConfig,
    /// Gallery row packing parameters.
    pub gallery: GalleryConfig,
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub fn load(loader: &impl Loader) -> Result<Self, ConfigError> {
        let mut config = loader.load()?;
        config.apply_env();
        Ok(config)
    }

    /// Saves the configuration using the provided saver.
    pub fn save(&self, saver: &impl Saver) -> Result<(), ConfigError> {
        saver.save(self)
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(MEDIA_BASE_URL_ENV) {
            if !base.is_empty() {
                self.media.base_url = base;
            }
        }
    }
}

/// Image URL normalization settings.
///
/// Uploads hand back either absolute URLs, root-relative paths or bare file
/// names. Root-relative paths are joined onto `base_url`; bare names go
/// through `serve_pattern`, where `{name}` is replaced by the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub base_url: String,
    pub serve_pattern: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            serve_pattern: "/api/media/{name}".to_owned(),
        }
    }
}

impl MediaConfig {
    /// Turn a stored image reference into a servable URL.
    ///
    /// Absolute `http(s)`, `data:` and `blob:` URLs pass through untouched,
    /// so the result is stable when normalized twice. Blank input has no URL.
    pub fn normalize_url(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let lower = raw.to_ascii_lowercase();
        if ["http://", "https://", "data:", "blob:"]
            .iter()
            .any(|prefix| lower.starts_with(prefix))
        {
            return Some(raw.to_owned());
        }
        if let Some(rest) = raw.strip_prefix("//") {
            return Some(format!("https://{rest}"));
        }
        if raw.starts_with('/') {
            return Some(self.join_base(raw));
        }

        let served = self.serve_pattern.replace("{name}", raw);
        if served.starts_with('/') {
            Some(self.join_base(&served))
        } else {
            Some(served)
        }
    }

    fn join_base(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Policy for editor image blocks that carry no usable URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingImagePolicy {
    /// Leave the block out of the canonical document.
    #[default]
    Drop,
    /// Keep an image block with an empty URL so the author can fill it in.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Horizontal gap between images, in pixels.
    pub gap: f64,
    /// Upper bound on the shared row height.
    pub max_row_height: f64,
    /// Width kept free for an "add image" button, if the editor shows one.
    pub add_button_width: Option<f64>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gap: 8.0,
            max_row_height: 250.0,
            add_button_width: None,
        }
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    fn load(&self) -> Result<Config, ConfigError>;
}

/// The trait for saving configuration data.
pub trait Saver {
    fn save(&self, config: &Config) -> Result<(), ConfigError>;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
///
/// The format is picked from the file extension: `.toml` or `.json`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String, ConfigError> {
        std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, contents: String) -> Result<(), ConfigError> {
        std::fs::write(&self.path, contents).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn syntax_error(&self, source: impl std::error::Error + Send + Sync + 'static) -> ConfigError {
        ConfigError::Syntax {
            path: self.path.clone(),
            source: Box::new(source),
        }
    }
}

impl Loader for FileStore {
    fn load(&self) -> Result<Config, ConfigError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&self.read()?).map_err(|e| self.syntax_error(e)),
            Some("toml") => toml::from_str(&self.read()?).map_err(|e| self.syntax_error(e)),
            _ => Err(ConfigError::UnsupportedFormat {
                path: self.path.clone(),
            }),
        }
    }
}

impl Saver for FileStore {
    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(config).map_err(|e| self.syntax_error(e))?,
            Some("toml") => toml::to_string_pretty(config).map_err(|e| self.syntax_error(e))?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: self.path.clone(),
                });
            }
        };
        self.write(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config: Config = toml::from_str("log_level = \"debug\"").unwrap();
        assert_eq!(config.media, MediaConfig::default());
        assert_eq!(config.missing_images, MissingImagePolicy::Drop);
        assert_eq!(config.gallery.max_row_height, 250.0);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn toml_round_trip_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("folio.toml"));

        let mut config = Config::default();
        config.media.base_url = "https://cdn.example.com".into();
        config.missing_images = MissingImagePolicy::Placeholder;
        config.gallery.add_button_width = Some(48.0);

        config.save(&store).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.json");
        std::fs::write(
            &path,
            r#"{"media": {"base_url": "https://files.example.com"}, "missing_images": "placeholder"}"#,
        )
        .unwrap();

        let loaded = FileStore::new(&path).load().unwrap();
        assert_eq!(loaded.media.base_url, "https://files.example.com");
        assert_eq!(loaded.media.serve_pattern, "/api/media/{name}");
        assert_eq!(loaded.missing_images, MissingImagePolicy::Placeholder);
    }

    #[test]
    fn normalize_media_urls() {
        let media = MediaConfig {
            base_url: "https://cdn.example.com/".into(),
            ..Default::default()
        };
        assert_eq!(
            media.normalize_url("https://img.example.com/a.png").as_deref(),
            Some("https://img.example.com/a.png")
        );
        assert_eq!(
            media.normalize_url("data:image/png;base64,AAAA").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(
            media.normalize_url("/uploads/a.png").as_deref(),
            Some("https://cdn.example.com/uploads/a.png")
        );
        assert_eq!(
            media.normalize_url("chart.png").as_deref(),
            Some("https://cdn.example.com/api/media/chart.png")
        );
        assert_eq!(media.normalize_url("   "), None);
    }

    #[test]
    fn normalize_is_idempotent_without_base() {
        let media = MediaConfig::default();
        let once = media.normalize_url("chart.png").unwrap();
        assert_eq!(once, "/api/media/chart.png");
        assert_eq!(media.normalize_url(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let store = FileStore::new("folio.yaml");
        assert!(matches!(
            store.load(),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }
}
