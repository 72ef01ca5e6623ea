//! Third-party embed resolution.
//!
//! Resolution is purely syntactic: a URL is normalized, gated on the domain
//! whitelist, then matched against the provider table. Nothing is fetched.

mod registry;
mod resolve;
mod sandbox;

pub use registry::{AspectRule, EmbedUrlBuilder, PROVIDER_SPECS, ProviderSpec, whitelisted_domains};
pub use resolve::{AdmittedUrl, EmbedDescriptor, admit, resolve_admitted, resolve_embed};
pub use sandbox::{SandboxPolicy, sandbox_policy};
