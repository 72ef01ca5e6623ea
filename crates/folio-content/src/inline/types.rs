use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Inline style flags carried by a text run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(from = "StyleFlags", into = "StyleFlags")]
    pub struct Styles: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKE = 1 << 2;
        const CODE = 1 << 3;
    }
}

impl Default for Styles {
    fn default() -> Self {
        Styles::empty()
    }
}

/// Editor JSON form of [`Styles`]: `{"bold": true, "italic": true}`.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
struct StyleFlags {
    #[serde(default, skip_serializing_if = "is_false")]
    bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    strike: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    code: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<StyleFlags> for Styles {
    fn from(flags: StyleFlags) -> Self {
        let mut styles = Styles::empty();
        styles.set(Styles::BOLD, flags.bold);
        styles.set(Styles::ITALIC, flags.italic);
        styles.set(Styles::STRIKE, flags.strike);
        styles.set(Styles::CODE, flags.code);
        styles
    }
}

impl From<Styles> for StyleFlags {
    fn from(styles: Styles) -> Self {
        Self {
            bold: styles.contains(Styles::BOLD),
            italic: styles.contains(Styles::ITALIC),
            strike: styles.contains(Styles::STRIKE),
            code: styles.contains(Styles::CODE),
        }
    }
}

/// A span of text with zero or more styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Styles::is_empty")]
    pub styles: Styles,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: Styles::empty(),
        }
    }

    pub fn styled(text: impl Into<String>, styles: Styles) -> Self {
        Self {
            text: text.into(),
            styles,
        }
    }
}

/// A hyperlink. Its content is text runs only, so links cannot nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRun {
    pub href: String,
    pub content: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StyledRun {
    Text(TextRun),
    Link(LinkRun),
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        StyledRun::Text(TextRun::plain(text))
    }

    pub fn styled(text: impl Into<String>, styles: Styles) -> Self {
        StyledRun::Text(TextRun::styled(text, styles))
    }

    pub fn link(href: impl Into<String>, content: Vec<TextRun>) -> Self {
        StyledRun::Link(LinkRun {
            href: href.into(),
            content,
        })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            StyledRun::Text(run) => run.text.is_empty(),
            StyledRun::Link(link) => link.content.iter().all(|r| r.text.is_empty()),
        }
    }
}
