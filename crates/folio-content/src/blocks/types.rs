//! Canonical content blocks.
//!
//! This is the storage and transport form of an article: an ordered list of
//! [`ContentBlock`]s with no nesting. Every other representation (editor
//! document, Markdown, imported HTML) converts to and from this one.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Most images a gallery block may hold.
pub const MAX_GALLERY_IMAGES: usize = 3;

/// Block identifier, unique within a document and stable across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(SmolStr);

impl BlockId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    /// Deterministic id for blocks created by an import pipeline.
    pub fn sequential(prefix: &str, index: usize) -> Self {
        Self(smol_str::format_smolstr!("{prefix}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: BlockId,
    #[serde(flatten)]
    pub body: BlockBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    Heading(HeadingBlock),
    Text(TextBlock),
    Quote(TextBlock),
    Callout(CalloutBlock),
    Image(ImageBlock),
    Infographic(ImageBlock),
    Gallery(GalleryBlock),
    List(ListBlock),
    Table(TableBlock),
    Embed(EmbedBlock),
}

impl BlockBody {
    /// The `type` tag as it appears in block JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockBody::Heading(_) => "heading",
            BlockBody::Text(_) => "text",
            BlockBody::Quote(_) => "quote",
            BlockBody::Callout(_) => "callout",
            BlockBody::Image(_) => "image",
            BlockBody::Infographic(_) => "infographic",
            BlockBody::Gallery(_) => "gallery",
            BlockBody::List(_) => "list",
            BlockBody::Table(_) => "table",
            BlockBody::Embed(_) => "embed",
        }
    }

    pub fn is_known_kind(kind: &str) -> bool {
        matches!(
            kind,
            "heading"
                | "text"
                | "quote"
                | "callout"
                | "image"
                | "infographic"
                | "gallery"
                | "list"
                | "table"
                | "embed"
        )
    }
}

impl ContentBlock {
    pub fn new(id: impl Into<BlockId>, body: BlockBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    pub fn text(id: impl Into<BlockId>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockBody::Text(TextBlock {
                content: content.into(),
            }),
        )
    }

    pub fn heading(id: impl Into<BlockId>, level: HeadingLevel, content: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockBody::Heading(HeadingBlock {
                content: content.into(),
                level,
            }),
        )
    }

    pub fn quote(id: impl Into<BlockId>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockBody::Quote(TextBlock {
                content: content.into(),
            }),
        )
    }

    pub fn image(id: impl Into<BlockId>, image: ImageBlock) -> Self {
        Self::new(id, BlockBody::Image(image))
    }

    pub fn kind(&self) -> &'static str {
        self.body.kind()
    }

    /// Text-bearing content, for blocks that have a single `content` field.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Heading(h) => Some(&h.content),
            BlockBody::Text(t) | BlockBody::Quote(t) => Some(&t.content),
            BlockBody::Callout(c) => Some(&c.content),
            BlockBody::Embed(e) => Some(&e.content),
            _ => None,
        }
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

/// Heading depth. Only three levels exist in an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
}

impl HeadingLevel {
    /// Map any depth onto the three supported levels; deeper headings become H3.
    pub fn clamped(level: usize) -> Self {
        match level {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    pub fn depth(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(format!("heading level must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(value: HeadingLevel) -> Self {
        value as u8
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        HeadingLevel::H2
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingBlock {
    pub content: String,
    pub level: HeadingLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutBlock {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub tone: CalloutTone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutTone {
    #[default]
    Info,
    Warning,
    Success,
    Danger,
}

impl CalloutTone {
    pub fn as_str(self) -> &'static str {
        match self {
            CalloutTone::Info => "info",
            CalloutTone::Warning => "warning",
            CalloutTone::Success => "success",
            CalloutTone::Danger => "danger",
        }
    }

    pub fn parse(tone: &str) -> Option<Self> {
        match tone.to_ascii_lowercase().as_str() {
            "info" | "note" => Some(CalloutTone::Info),
            "warning" | "caution" => Some(CalloutTone::Warning),
            "success" | "tip" => Some(CalloutTone::Success),
            "danger" | "important" => Some(CalloutTone::Danger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    pub image_url: String,
    pub alt_text: String,
    pub caption: String,
    pub size: ImageSize,
    pub alignment: Alignment,
}

impl ImageBlock {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub url: String,
    pub caption: String,
}

impl GalleryImage {
    pub fn new(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: caption.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryBlock {
    pub images: Vec<GalleryImage>,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    Bullet,
    Numbered,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBlock {
    pub list_type: ListType,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBlock {
    pub table_data: Vec<Vec<String>>,
}

impl TableBlock {
    /// Every row has the header row's column count.
    pub fn is_rectangular(&self) -> bool {
        match self.table_data.first() {
            Some(header) => self.table_data.iter().all(|row| row.len() == header.len()),
            None => true,
        }
    }

    pub fn columns(&self) -> usize {
        self.table_data.first().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Video,
    Rich,
    Photo,
    #[default]
    Link,
    Audio,
}

impl ProviderType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderType::Video => "video",
            ProviderType::Rich => "rich",
            ProviderType::Photo => "photo",
            ProviderType::Link => "link",
            ProviderType::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedBlock {
    pub url: String,
    pub embed_url: String,
    pub provider: String,
    pub provider_type: ProviderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub aspect_ratio: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn heading_json_shape() {
        let block = ContentBlock::heading("h1", HeadingLevel::H2, "Outlook");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({"id": "h1", "type": "heading", "content": "Outlook", "level": 2})
        );
    }

    #[test]
    fn image_defaults_fill_missing_fields() {
        let block: ContentBlock =
            serde_json::from_value(json!({"id": "i", "type": "image", "image_url": "/a.png"}))
                .unwrap();
        let BlockBody::Image(image) = block.body else {
            panic!("expected image");
        };
        assert_eq!(image.image_url, "/a.png");
        assert_eq!(image.size, ImageSize::Medium);
        assert_eq!(image.alignment, Alignment::Center);
    }

    #[test]
    fn heading_level_out_of_range_is_rejected() {
        let result = serde_json::from_value::<ContentBlock>(
            json!({"id": "h", "type": "heading", "content": "x", "level": 4}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn clamped_levels() {
        assert_eq!(HeadingLevel::clamped(1), HeadingLevel::H1);
        assert_eq!(HeadingLevel::clamped(3), HeadingLevel::H3);
        assert_eq!(HeadingLevel::clamped(6), HeadingLevel::H3);
    }

    #[test]
    fn ragged_table_detected() {
        let table = TableBlock {
            table_data: vec![vec!["A".into(), "B".into()], vec!["1".into()]],
        };
        assert!(!table.is_rectangular());
    }
}
