use serde::{Deserialize, Serialize};

use crate::blocks::{Alignment, BlockId, CalloutTone, ImageSize, ProviderType};
use crate::inline::StyledRun;

/// The rich editor's document: a flat list of blocks whose text is already
/// split into styled runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeDocument {
    #[serde(default)]
    pub blocks: Vec<NativeBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeBlock {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: NativeBlockKind,
}

impl NativeBlock {
    pub fn new(id: impl Into<BlockId>, kind: NativeBlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum NativeBlockKind {
    Paragraph {
        #[serde(default)]
        content: Vec<StyledRun>,
    },
    Heading {
        #[serde(default = "default_level")]
        level: u8,
        #[serde(default)]
        content: Vec<StyledRun>,
    },
    Quote {
        #[serde(default)]
        content: Vec<StyledRun>,
    },
    Callout {
        #[serde(default)]
        content: Vec<StyledRun>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default)]
        tone: CalloutTone,
    },
    BulletListItem {
        #[serde(default)]
        content: Vec<StyledRun>,
        /// Canonical list this item was expanded from.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        list_id: Option<BlockId>,
    },
    NumberedListItem {
        #[serde(default)]
        content: Vec<StyledRun>,
        /// Canonical list this item was expanded from.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        list_id: Option<BlockId>,
    },
    CodeBlock {
        #[serde(default)]
        language: String,
        #[serde(default)]
        code: String,
    },
    Image(NativeImage),
    Infographic(NativeImage),
    Gallery {
        #[serde(default)]
        images: Vec<NativeGalleryImage>,
        #[serde(default)]
        caption: String,
    },
    Table {
        /// Rows of cells; each cell is its own run list.
        #[serde(default)]
        rows: Vec<Vec<Vec<StyledRun>>>,
    },
    Embed(NativeEmbed),
}

fn default_level() -> u8 {
    2
}

impl NativeBlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            NativeBlockKind::Paragraph { .. } => "paragraph",
            NativeBlockKind::Heading { .. } => "heading",
            NativeBlockKind::Quote { .. } => "quote",
            NativeBlockKind::Callout { .. } => "callout",
            NativeBlockKind::BulletListItem { .. } => "bulletListItem",
            NativeBlockKind::NumberedListItem { .. } => "numberedListItem",
            NativeBlockKind::CodeBlock { .. } => "codeBlock",
            NativeBlockKind::Image(_) => "image",
            NativeBlockKind::Infographic(_) => "infographic",
            NativeBlockKind::Gallery { .. } => "gallery",
            NativeBlockKind::Table { .. } => "table",
            NativeBlockKind::Embed(_) => "embed",
        }
    }
}

/// Editor image props. `url` stays `None` until the upload finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub alt: String,
    pub caption: String,
    pub size: ImageSize,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeGalleryImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeEmbed {
    pub url: String,
    pub embed_url: String,
    pub provider: String,
    pub provider_type: ProviderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub aspect_ratio: String,
    pub caption: String,
}
