//! The asset-reference rewrite engine.
//!
//! Recognizes static-asset references inside markup attributes, inline
//! style text, raw stylesheets, and markup embedded in JSON payloads, and
//! re-points each one at the configured CDN authority with transform
//! parameters appended. The guiding policy is fail-open: any uncertainty
//! about whether a value is safe to rewrite resolves to leaving it
//! untouched.

mod attr;
mod cdn;
mod cleanup;
mod css;
mod dimension;
mod dispatch;
mod pattern;
mod srcset;
mod stream;
mod style;
mod tags;

pub use dispatch::{OriginResponse, process_response};

use thiserror::Error;

/// Engine-local failures. All of them are recovered where they occur; none
/// escapes to the response path.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A candidate string cannot be parsed as a URL. The reference is left
    /// unmodified and siblings continue unaffected.
    #[error("malformed asset reference `{0}`")]
    MalformedReference(String),

    /// The streaming markup transform failed; callers return the untouched
    /// original body instead.
    #[error("markup transform failed: {0}")]
    Transform(#[from] lol_html::errors::RewritingError),
}
