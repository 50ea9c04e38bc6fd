//! Responsive candidate list rewriting (`srcset` and friends).

use std::sync::LazyLock;

use regex::Regex;

use super::{cdn, dimension};
use crate::config::SiteConfig;
use crate::debug;

/// Commas with optional surrounding whitespace separate descriptors.
static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Rewrite each `(reference, sizeToken)` descriptor in a candidate list.
///
/// Malformed descriptors (anything but exactly two whitespace-separated
/// tokens) pass through verbatim in their original position. The size token
/// itself is never altered; output entries re-join with `", "` regardless of
/// input spacing.
pub fn rewrite_descriptor_list(list: &str, site: &SiteConfig) -> String {
    LIST_SEPARATOR
        .split(list)
        .map(|descriptor| rewrite_descriptor(descriptor, site))
        .collect::<Vec<_>>()
        .join(", ")
}

fn rewrite_descriptor(descriptor: &str, site: &SiteConfig) -> String {
    let parts: Vec<&str> = descriptor.split_whitespace().collect();
    if parts.len() != 2 {
        return descriptor.to_string();
    }
    let (reference, token) = (parts[0], parts[1]);

    if !cdn::is_rewritable(site, reference) {
        return descriptor.to_string();
    }

    // Explicit sibling attributes do not exist per descriptor; only the
    // filename and descriptor tiers apply.
    let (stripped, dims) = dimension::infer(reference, None, Some(token));
    match cdn::rewrite_reference(site, &stripped, &dims) {
        Ok(rewritten) => format!("{rewritten} {token}"),
        Err(e) => {
            debug!("rewrite"; "descriptor left unmodified: {e}");
            descriptor.to_string()
        }
    }
}
