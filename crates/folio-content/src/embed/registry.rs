//! Static table of embeddable providers.
//!
//! Each entry carries its own domains next to its recognition patterns, so a
//! provider cannot be whitelisted without a pattern or vice versa. The union
//! of all entries' domains is the embed whitelist.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::blocks::ProviderType;

/// Builds the player URL from pattern captures and the normalized source URL.
pub type EmbedUrlBuilder = fn(&Captures<'_>, &str) -> String;

/// Aspect ratio, either fixed or picked from the captures.
#[derive(Clone, Copy)]
pub enum AspectRule {
    Fixed(&'static str),
    ByCapture(fn(&Captures<'_>) -> &'static str),
}

impl AspectRule {
    pub fn apply(&self, caps: &Captures<'_>) -> &'static str {
        match self {
            AspectRule::Fixed(ratio) => ratio,
            AspectRule::ByCapture(pick) => pick(caps),
        }
    }
}

/// One provider as written in the table.
pub struct ProviderSpec {
    pub name: &'static str,
    pub provider_type: ProviderType,
    /// Hostnames matched exactly or as a parent domain.
    pub domains: &'static [&'static str],
    /// Matched against `host/path?query` with any leading `www.` removed.
    pub patterns: &'static [&'static str],
    pub build: EmbedUrlBuilder,
    pub aspect: AspectRule,
    pub thumbnail: Option<EmbedUrlBuilder>,
}

/// A provider with its patterns compiled.
pub struct Provider {
    pub spec: &'static ProviderSpec,
    pub patterns: Vec<Regex>,
}

impl Provider {
    /// Whether `host` is one of this provider's domains or a subdomain of one.
    pub fn owns_host(&self, host: &str) -> bool {
        self.spec.domains.iter().any(|domain| host_matches(host, domain))
    }
}

pub(crate) fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn cap<'c>(caps: &'c Captures<'_>, index: usize) -> &'c str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

pub static PROVIDER_SPECS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "youtube",
        provider_type: ProviderType::Video,
        domains: &["youtube.com", "youtu.be", "youtube-nocookie.com"],
        patterns: &[
            r"^(?:m\.)?youtube\.com/watch\?(?:[^#]*&)?v=([\w-]{11})",
            r"^youtu\.be/([\w-]{11})",
            r"^(?:m\.)?youtube(?:-nocookie)?\.com/(?:embed|v|live)/([\w-]{11})",
        ],
        build: |caps, _| format!("https://www.youtube-nocookie.com/embed/{}", cap(caps, 1)),
        aspect: AspectRule::Fixed("16/9"),
        thumbnail: Some(|caps, _| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", cap(caps, 1))),
    },
    ProviderSpec {
        name: "youtube",
        provider_type: ProviderType::Video,
        domains: &["youtube.com"],
        patterns: &[r"^(?:m\.)?youtube\.com/shorts/([\w-]{11})"],
        build: |caps, _| format!("https://www.youtube-nocookie.com/embed/{}", cap(caps, 1)),
        aspect: AspectRule::Fixed("9/16"),
        thumbnail: Some(|caps, _| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", cap(caps, 1))),
    },
    ProviderSpec {
        name: "vimeo",
        provider_type: ProviderType::Video,
        domains: &["vimeo.com"],
        patterns: &[
            r"^vimeo\.com/(?:channels/[\w-]+/)?(\d+)",
            r"^player\.vimeo\.com/video/(\d+)",
        ],
        build: |caps, _| format!("https://player.vimeo.com/video/{}", cap(caps, 1)),
        aspect: AspectRule::Fixed("16/9"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "loom",
        provider_type: ProviderType::Video,
        domains: &["loom.com"],
        patterns: &[r"^loom\.com/(?:share|embed)/([0-9a-f]{32})"],
        build: |caps, _| format!("https://www.loom.com/embed/{}", cap(caps, 1)),
        aspect: AspectRule::Fixed("16/9"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "twitter",
        provider_type: ProviderType::Rich,
        domains: &["twitter.com", "x.com"],
        patterns: &[r"^(?:mobile\.)?(?:twitter|x)\.com/\w{1,15}/status(?:es)?/(\d+)"],
        build: |caps, _| {
            format!(
                "https://platform.twitter.com/embed/Tweet.html?id={}",
                cap(caps, 1)
            )
        },
        aspect: AspectRule::Fixed("1/1"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "instagram",
        provider_type: ProviderType::Photo,
        domains: &["instagram.com"],
        patterns: &[r"^instagram\.com/(p|reel)/([\w-]+)"],
        build: |caps, _| {
            format!(
                "https://www.instagram.com/{}/{}/embed",
                cap(caps, 1),
                cap(caps, 2)
            )
        },
        aspect: AspectRule::Fixed("4/5"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "spotify",
        provider_type: ProviderType::Audio,
        domains: &["open.spotify.com"],
        patterns: &[r"^open\.spotify\.com/(?:intl-[\w-]+/)?(track|album|playlist|episode|show|artist)/(\w+)"],
        build: |caps, _| {
            format!(
                "https://open.spotify.com/embed/{}/{}",
                cap(caps, 1),
                cap(caps, 2)
            )
        },
        // Single tracks and episodes render as a short bar; collections as a tall list.
        aspect: AspectRule::ByCapture(|caps| match cap(caps, 1) {
            "track" | "episode" => "4/1",
            _ => "3/4",
        }),
        thumbnail: None,
    },
    ProviderSpec {
        name: "soundcloud",
        provider_type: ProviderType::Audio,
        domains: &["soundcloud.com"],
        patterns: &[r"^soundcloud\.com/[\w-]+/[\w-]+"],
        build: |_, url| {
            format!(
                "https://w.soundcloud.com/player/?url={}&visual=true",
                encode(url)
            )
        },
        aspect: AspectRule::Fixed("3/1"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "codesandbox",
        provider_type: ProviderType::Rich,
        domains: &["codesandbox.io"],
        patterns: &[r"^codesandbox\.io/(?:s|embed|p/sandbox|p/devbox)/(?:[\w-]+-)?([\w]{5,})"],
        build: |caps, _| format!("https://codesandbox.io/embed/{}", cap(caps, 1)),
        aspect: AspectRule::Fixed("16/10"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "codepen",
        provider_type: ProviderType::Rich,
        domains: &["codepen.io"],
        patterns: &[r"^codepen\.io/([\w-]+)/(?:pen|embed)/(\w+)"],
        build: |caps, _| {
            format!(
                "https://codepen.io/{}/embed/{}?default-tab=result",
                cap(caps, 1),
                cap(caps, 2)
            )
        },
        aspect: AspectRule::Fixed("4/3"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "gist",
        provider_type: ProviderType::Rich,
        domains: &["gist.github.com"],
        patterns: &[r"^gist\.github\.com/([\w-]+)/([0-9a-f]+)"],
        build: |caps, _| {
            format!(
                "https://gist.github.com/{}/{}.pibb",
                cap(caps, 1),
                cap(caps, 2)
            )
        },
        aspect: AspectRule::Fixed("4/3"),
        thumbnail: None,
    },
    ProviderSpec {
        name: "figma",
        provider_type: ProviderType::Rich,
        domains: &["figma.com"],
        patterns: &[r"^figma\.com/(?:file|design|proto|board)/(\w+)"],
        build: |_, url| {
            format!(
                "https://www.figma.com/embed?embed_host=folio&url={}",
                encode(url)
            )
        },
        aspect: AspectRule::Fixed("16/9"),
        thumbnail: None,
    },
];

/// Compiled registry, in table order.
pub static PROVIDERS: LazyLock<Vec<Provider>> = LazyLock::new(|| {
    PROVIDER_SPECS
        .iter()
        .map(|spec| Provider {
            spec,
            patterns: spec
                .patterns
                .iter()
                .map(|pattern| Regex::new(pattern).unwrap())
                .collect(),
        })
        .collect()
});

/// Every whitelisted domain, deduplicated, in table order.
pub fn whitelisted_domains() -> Vec<&'static str> {
    let mut domains: Vec<&'static str> = Vec::new();
    for spec in PROVIDER_SPECS {
        for domain in spec.domains {
            if !domains.contains(domain) {
                domains.push(domain);
            }
        }
    }
    domains
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_provider_has_domains_and_patterns() {
        for spec in PROVIDER_SPECS {
            assert!(!spec.domains.is_empty(), "{} has no domains", spec.name);
            assert!(!spec.patterns.is_empty(), "{} has no patterns", spec.name);
        }
    }

    #[test]
    fn all_patterns_compile() {
        let total: usize = PROVIDERS.iter().map(|p| p.patterns.len()).sum();
        let expected: usize = PROVIDER_SPECS.iter().map(|s| s.patterns.len()).sum();
        assert_eq!(total, expected);
    }

    #[test]
    fn subdomain_matching() {
        assert!(host_matches("youtube.com", "youtube.com"));
        assert!(host_matches("m.youtube.com", "youtube.com"));
        assert!(!host_matches("notyoutube.com", "youtube.com"));
        assert!(!host_matches("youtube.com.evil.net", "youtube.com"));
    }

    #[test]
    fn whitelist_is_deduplicated() {
        let domains = whitelisted_domains();
        let youtube = domains.iter().filter(|d| **d == "youtube.com").count();
        assert_eq!(youtube, 1);
        assert!(domains.contains(&"open.spotify.com"));
    }
}
