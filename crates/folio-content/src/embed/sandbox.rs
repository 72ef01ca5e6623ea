use std::fmt;

use bitflags::bitflags;

use crate::blocks::ProviderType;

bitflags! {
    /// Iframe `sandbox` permissions granted to an embed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SandboxPolicy: u8 {
        const SCRIPTS = 1;
        const SAME_ORIGIN = 1 << 1;
        const PRESENTATION = 1 << 2;
        const POPUPS = 1 << 3;
        const POPUPS_TO_ESCAPE_SANDBOX = 1 << 4;
    }
}

impl SandboxPolicy {
    const TOKENS: [(SandboxPolicy, &'static str); 5] = [
        (SandboxPolicy::SCRIPTS, "allow-scripts"),
        (SandboxPolicy::SAME_ORIGIN, "allow-same-origin"),
        (SandboxPolicy::PRESENTATION, "allow-presentation"),
        (SandboxPolicy::POPUPS, "allow-popups"),
        (
            SandboxPolicy::POPUPS_TO_ESCAPE_SANDBOX,
            "allow-popups-to-escape-sandbox",
        ),
    ];

    pub fn tokens(self) -> Vec<&'static str> {
        Self::TOKENS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, token)| *token)
            .collect()
    }
}

impl fmt::Display for SandboxPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

/// Minimal permission set for a provider type.
pub fn sandbox_policy(provider_type: ProviderType) -> SandboxPolicy {
    let base = SandboxPolicy::SCRIPTS | SandboxPolicy::SAME_ORIGIN;
    match provider_type {
        ProviderType::Video | ProviderType::Audio => base | SandboxPolicy::PRESENTATION,
        ProviderType::Rich => {
            base | SandboxPolicy::POPUPS | SandboxPolicy::POPUPS_TO_ESCAPE_SANDBOX
        }
        ProviderType::Photo | ProviderType::Link => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_gets_presentation() {
        assert_eq!(
            sandbox_policy(ProviderType::Video).to_string(),
            "allow-scripts allow-same-origin allow-presentation"
        );
        assert_eq!(
            sandbox_policy(ProviderType::Audio),
            sandbox_policy(ProviderType::Video)
        );
    }

    #[test]
    fn rich_gets_popups() {
        assert_eq!(
            sandbox_policy(ProviderType::Rich).to_string(),
            "allow-scripts allow-same-origin allow-popups allow-popups-to-escape-sandbox"
        );
    }

    #[test]
    fn photo_is_minimal() {
        assert_eq!(
            sandbox_policy(ProviderType::Photo).to_string(),
            "allow-scripts allow-same-origin"
        );
    }
}
