//! Code lives in canonical documents as a text block holding a fenced
//! snippet, since the block model has no dedicated code type.

use super::types::TextBlock;

const FENCE: &str = "```";

/// A fenced snippet split into its info string and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence<'a> {
    pub language: &'a str,
    pub code: &'a str,
}

impl TextBlock {
    pub fn fenced(language: &str, code: &str) -> Self {
        let code = code.strip_suffix('\n').unwrap_or(code);
        let content = if code.is_empty() {
            format!("{FENCE}{language}\n{FENCE}")
        } else {
            format!("{FENCE}{language}\n{code}\n{FENCE}")
        };
        Self { content }
    }

    /// The fence inside this block, if its whole content is one.
    pub fn as_fence(&self) -> Option<CodeFence<'_>> {
        let rest = self.content.strip_prefix(FENCE)?;
        let (language, body) = rest.split_once('\n')?;
        let code = body.strip_suffix(FENCE)?;
        if language.contains('`') {
            return None;
        }
        Some(CodeFence {
            language: language.trim(),
            code: code.strip_suffix('\n').unwrap_or(code),
        })
    }
}
