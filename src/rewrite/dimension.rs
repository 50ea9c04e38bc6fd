//! Dimension inference for one asset reference.
//!
//! Every place that needs a size for a reference goes through [`infer`] so
//! the fallback order is decided exactly once:
//!
//! 1. explicit sibling `width`/`height` attributes
//! 2. `-WxH` filename suffix
//! 3. trailing width descriptor of the candidate size token
//! 4. no hint (`auto`/`auto`)

use super::pattern;

/// Resolved display dimensions for one asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dims {
    /// No hint; the CDN picks (`width=auto&height=auto`).
    Auto,
    /// Width-only hint from a `300w` descriptor token.
    Width(String),
    /// Full width/height pair.
    Pair(String, String),
}

/// Resolve the dimensions to use for `reference`.
///
/// `explicit` carries sibling attribute values where the markup family has
/// them, `token` the candidate size token in descriptor-list contexts.
/// Returns the reference (with any filename size suffix stripped once
/// dimensions are captured) and the resolved [`Dims`].
pub fn infer(
    reference: &str,
    explicit: Option<(&str, &str)>,
    token: Option<&str>,
) -> (String, Dims) {
    // Explicit attributes are authoritative; the filename suffix is
    // redundant then and must not leak into the rewritten path.
    if let Some((width, height)) = explicit
        && !width.trim().is_empty()
        && !height.trim().is_empty()
    {
        let dims = Dims::Pair(width.trim().to_string(), height.trim().to_string());
        return (strip_size_suffix(reference), dims);
    }

    if let Some(caps) = pattern::SIZE_SUFFIX.captures(reference) {
        let dims = Dims::Pair(caps["w"].to_string(), caps["h"].to_string());
        return (strip_size_suffix(reference), dims);
    }

    if let Some(token) = token
        && let Some(caps) = pattern::WIDTH_DESCRIPTOR.captures(token)
    {
        return (reference.to_string(), Dims::Width(caps[1].to_string()));
    }

    (reference.to_string(), Dims::Auto)
}

/// Remove a `-WxH` size suffix from the filename, keeping the extension.
pub fn strip_size_suffix(reference: &str) -> String {
    pattern::SIZE_SUFFIX.replace(reference, ".${ext}").into_owned()
}
