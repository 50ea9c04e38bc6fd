//! CSS `url(...)` rewriting over raw style text.
//!
//! Shared by the inline-style buffer, the `<div style>` rewriter, and the
//! stylesheet strategy: every recognized asset reference is re-emitted on the
//! CDN authority with auto dimensions, in normalized `url('...')` form.

use std::borrow::Cow;

use regex::Captures;

use super::dimension::Dims;
use super::{cdn, pattern};
use crate::config::SiteConfig;

/// Rewrite every recognized `url(...)` asset reference in `css`.
///
/// References that fail the validity check (already on the CDN, inline
/// payloads) are left byte-for-byte as matched.
pub fn rewrite_css_text<'a>(css: &'a str, site: &SiteConfig) -> Cow<'a, str> {
    pattern::CSS_URL.replace_all(css, |caps: &Captures| {
        let reference = &caps[1];
        if !cdn::is_rewritable(site, reference) {
            return caps[0].to_string();
        }

        let path = &caps[3];
        format!(
            "url('https://{}{}{}')",
            site.cdn_hostname,
            path,
            cdn::transform_query(site, &Dims::Auto)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            cdn_hostname: "x.b-cdn.net".into(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_rewrites_site_root_reference() {
        let css = "background:url('/wp-content/uploads/b.png')";
        assert_eq!(
            rewrite_css_text(css, &site()),
            "background:url('https://x.b-cdn.net/wp-content/uploads/b.png?width=auto&height=auto')"
        );
    }

    #[test]
    fn test_authority_forced_to_cdn() {
        let css = r#".hero { background-image: url("https://site.com/wp-content/themes/t/hero.jpg"); }"#;
        assert_eq!(
            rewrite_css_text(css, &site()),
            ".hero { background-image: url('https://x.b-cdn.net/wp-content/themes/t/hero.jpg?width=auto&height=auto'); }"
        );
    }

    #[test]
    fn test_multiple_references() {
        let css = "a{background:url(/wp-content/uploads/a.png)}b{background:url(/wp-content/uploads/b.gif)}";
        let result = rewrite_css_text(css, &site());
        assert!(result.contains("/wp-content/uploads/a.png?width=auto&height=auto"));
        assert!(result.contains("/wp-content/uploads/b.gif?width=auto&height=auto"));
    }

    #[test]
    fn test_quality_appended_when_configured() {
        let mut site = site();
        site.image.quality = Some(85);
        let result = rewrite_css_text("url('/wp-content/uploads/b.png')", &site);
        assert_eq!(
            result,
            "url('https://x.b-cdn.net/wp-content/uploads/b.png?width=auto&height=auto&quality=85')"
        );
    }

    #[test]
    fn test_untouched_when_nothing_matches() {
        let css = "body { color: #333; }";
        assert!(matches!(rewrite_css_text(css, &site()), Cow::Borrowed(_)));
    }

    #[test]
    fn test_cdn_reference_left_alone() {
        let css = "url('https://x.b-cdn.net/wp-content/uploads/b.png')";
        assert_eq!(rewrite_css_text(css, &site()), css);
    }
}
