//! Fixed text patterns for asset-reference recognition and dimension hints.
//!
//! None of these attempt general CSS/HTML parsing: every pattern is anchored
//! on a file extension and a known path segment, so a missed asset (false
//! negative) is possible but a rewritten non-asset (false positive) is not.

use regex::Regex;
use std::sync::LazyLock;

/// `-WxH` size suffix immediately before the file extension.
///
/// Used both to extract dimensions (`w`/`h` captures) and to strip the
/// suffix (replace with `.{ext}`) so the CDN receives the canonical,
/// unsized asset path.
pub static SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(?<w>\d+)x(?<h>\d+)\.(?<ext>\w+)$").unwrap());

/// Trailing width descriptor of a responsive candidate size token (`300w`).
pub static WIDTH_DESCRIPTOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)w$").unwrap());

/// Explicit `WxH` size token, as found in icon `sizes` attributes.
pub static SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)x(\d+)").unwrap());

/// CSS `url(...)` whose contents reference a known asset path.
///
/// Captures: 1 = full reference, 2 = optional absolute origin, 3 = the
/// site-root asset path. References already pointing at the CDN are filtered
/// by the caller, not the pattern (the regex engine has no lookaround).
pub static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"url\(\s*['"]?((https?://[^\s'")]+?)?(/wp-content/(?:uploads|plugins|themes)/[^\s'")]+?\.(?:jpe?g|gif|png|webp|svg)))['"]?\s*\)"#,
    )
    .unwrap()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_suffix_extract() {
        let caps = SIZE_SUFFIX.captures("/wp-content/uploads/photo-300x200.jpg").unwrap();
        assert_eq!(&caps["w"], "300");
        assert_eq!(&caps["h"], "200");
        assert_eq!(&caps["ext"], "jpg");
    }

    #[test]
    fn test_size_suffix_strip() {
        let stripped = SIZE_SUFFIX.replace("/wp-content/uploads/photo-300x200.jpg", ".${ext}");
        assert_eq!(stripped, "/wp-content/uploads/photo.jpg");
    }

    #[test]
    fn test_size_suffix_only_before_extension() {
        // Suffix in the middle of the name is not a size suffix
        assert!(!SIZE_SUFFIX.is_match("/wp-content/uploads/photo-300x200-final.jpg"));
        assert!(SIZE_SUFFIX.is_match("upload-1024x768.webp"));
    }

    #[test]
    fn test_width_descriptor() {
        let caps = WIDTH_DESCRIPTOR.captures("300w").unwrap();
        assert_eq!(&caps[1], "300");
        assert!(!WIDTH_DESCRIPTOR.is_match("2x"));
    }

    #[test]
    fn test_size_token() {
        let caps = SIZE_TOKEN.captures("32x32 16x16").unwrap();
        assert_eq!(&caps[1], "32");
        assert_eq!(&caps[2], "32");
    }

    #[test]
    fn test_css_url_with_origin() {
        let css = "background:url('https://site.com/wp-content/uploads/bg.png')";
        let caps = CSS_URL.captures(css).unwrap();
        assert_eq!(&caps[1], "https://site.com/wp-content/uploads/bg.png");
        assert_eq!(&caps[2], "https://site.com");
        assert_eq!(&caps[3], "/wp-content/uploads/bg.png");
    }

    #[test]
    fn test_css_url_site_root() {
        let css = r#"background-image: url("/wp-content/themes/demo/hero.webp");"#;
        let caps = CSS_URL.captures(css).unwrap();
        assert!(caps.get(2).is_none());
        assert_eq!(&caps[3], "/wp-content/themes/demo/hero.webp");
    }

    #[test]
    fn test_css_url_unquoted() {
        let caps = CSS_URL.captures("url(/wp-content/plugins/x/a.gif)").unwrap();
        assert_eq!(&caps[1], "/wp-content/plugins/x/a.gif");
    }

    #[test]
    fn test_css_url_ignores_other_paths() {
        assert!(!CSS_URL.is_match("url('/assets/img/logo.png')"));
        assert!(!CSS_URL.is_match("url('/wp-content/uploads/archive.zip')"));
        assert!(!CSS_URL.is_match("url(data:image/png;base64,iVBORw0KGgo=)"));
    }

    #[test]
    fn test_css_url_skips_already_parameterized() {
        // Once a query string follows the extension the closing paren no
        // longer matches, so rewritten references never match again.
        let css = "url('https://cdn.example.net/wp-content/uploads/a.png?width=auto&height=auto')";
        assert!(!CSS_URL.is_match(css));
    }
}
