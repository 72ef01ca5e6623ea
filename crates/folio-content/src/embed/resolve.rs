use serde::{Deserialize, Serialize};
use url::Url;

use super::registry::{PROVIDERS, Provider, host_matches, whitelisted_domains};
use crate::blocks::{EmbedBlock, ProviderType};

/// Resolved embed metadata for one URL. Never stored on its own; fold it
/// into a block with [`EmbedBlock::from_descriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedDescriptor {
    pub url: String,
    pub embed_url: String,
    pub provider: String,
    pub provider_type: ProviderType,
    pub aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl EmbedBlock {
    pub fn from_descriptor(descriptor: EmbedDescriptor, content: impl Into<String>) -> Self {
        Self {
            url: descriptor.url,
            embed_url: descriptor.embed_url,
            provider: descriptor.provider,
            provider_type: descriptor.provider_type,
            thumbnail_url: descriptor.thumbnail_url,
            aspect_ratio: descriptor.aspect_ratio,
            content: content.into(),
        }
    }
}

/// A URL whose host passed the whitelist. Only [`admit`] constructs one, and
/// provider patterns only ever see an `AdmittedUrl`.
#[derive(Debug)]
pub struct AdmittedUrl {
    normalized: String,
    host: String,
    match_target: String,
}

impl AdmittedUrl {
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn providers(&self) -> impl Iterator<Item = &'static Provider> + '_ {
        PROVIDERS.iter().filter(|p| p.owns_host(&self.host))
    }
}

/// Prepend `https://` when the input carries no scheme.
fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches("//"))
    }
}

/// True when the input starts with `scheme://`. A `://` later in the path or
/// query does not count.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// The whitelist gate.
pub fn admit(input: &str) -> Option<AdmittedUrl> {
    let normalized = normalize(input);
    let parsed = match Url::parse(&normalized) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::trace!(url = input, %err, "embed url does not parse");
            return None;
        }
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        tracing::trace!(url = input, scheme = parsed.scheme(), "embed url scheme rejected");
        return None;
    }

    let host = parsed.host_str()?.to_ascii_lowercase();
    let bare_host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let allowed = whitelisted_domains()
        .into_iter()
        .any(|domain| host_matches(&bare_host, domain));
    if !allowed {
        tracing::trace!(url = input, %host, "embed host not whitelisted");
        return None;
    }

    let mut match_target = format!("{}{}", bare_host, parsed.path());
    if let Some(query) = parsed.query() {
        match_target.push('?');
        match_target.push_str(query);
    }

    Some(AdmittedUrl {
        normalized,
        host: bare_host,
        match_target,
    })
}

/// Resolve a URL to an embed descriptor, or `None` if it is not embeddable.
pub fn resolve_embed(input: &str) -> Option<EmbedDescriptor> {
    let admitted = admit(input)?;
    resolve_admitted(&admitted)
}

pub fn resolve_admitted(admitted: &AdmittedUrl) -> Option<EmbedDescriptor> {
    for provider in admitted.providers() {
        for pattern in &provider.patterns {
            let Some(caps) = pattern.captures(&admitted.match_target) else {
                continue;
            };
            let spec = provider.spec;
            tracing::trace!(provider = spec.name, url = admitted.as_str(), "embed resolved");
            return Some(EmbedDescriptor {
                url: admitted.normalized.clone(),
                embed_url: (spec.build)(&caps, &admitted.normalized),
                provider: spec.name.to_string(),
                provider_type: spec.provider_type,
                aspect_ratio: spec.aspect.apply(&caps).to_string(),
                thumbnail_url: spec.thumbnail.map(|thumb| thumb(&caps, &admitted.normalized)),
            });
        }
    }
    tracing::debug!(url = admitted.as_str(), "whitelisted host but no provider pattern matched");
    None
}
