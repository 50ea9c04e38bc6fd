//! Per-site rewrite settings.
//!
//! One record per domain plus one default fallback. Everything is immutable
//! after load; the engine only ever reads these.

use serde::{Deserialize, Serialize};

/// Settings for one site (domain).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// CDN hostname serving optimized variants. Bare hostname only.
    pub cdn_hostname: String,

    /// Add `loading="lazy"` to images that do not set `loading` themselves.
    /// Browsers without support ignore the attribute without side effects.
    pub lazy_load: bool,

    /// Per-family rewrite toggles.
    pub rewrite: RewriteToggles,

    /// Image transform parameters appended to rewritten URLs.
    pub image: ImageParams,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cdn_hostname: String::new(),
            lazy_load: true,
            rewrite: RewriteToggles::default(),
            image: ImageParams::default(),
        }
    }
}

/// Which markup families the engine touches. All enabled by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteToggles {
    /// Icon `<link>` tags.
    pub link: bool,
    /// Inline `<style>` text.
    pub style: bool,
    /// `<img>` tags including responsive candidate lists.
    pub image: bool,
    /// `<a href>` asset links (lightboxes).
    pub href: bool,
    /// `<div>` inline styles and vendor background attributes.
    pub div: bool,
    /// Decorative `<svg>` artifact removal.
    pub svg: bool,
}

impl Default for RewriteToggles {
    fn default() -> Self {
        Self {
            link: true,
            style: true,
            image: true,
            href: true,
            div: true,
            svg: true,
        }
    }
}

/// Optional image transform parameters.
///
/// Absent values are omitted from generated URLs entirely - never emitted
/// as empty or zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageParams {
    /// Trade-off between file size and visual quality. Range 1-100.
    pub quality: Option<u32>,

    /// Sharpen the output image.
    pub sharpen: bool,

    /// Crop the output to the known width and height.
    pub crop: bool,

    /// Where cropping anchors.
    pub crop_gravity: Option<CropGravity>,

    /// Range -100-100.
    pub brightness: Option<i32>,

    /// Range -100-100. Use -100 for grayscale.
    pub saturation: Option<i32>,

    /// Rotates the color wheel. Range 0-100.
    pub hue: Option<i32>,

    /// Range -100-100.
    pub gamma: Option<i32>,

    /// Range -100-100.
    pub contrast: Option<i32>,
}

/// Crop anchor points understood by the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropGravity {
    Center,
    Forget,
    East,
    North,
    South,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl CropGravity {
    /// Lowercase token as it appears in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Forget => "forget",
            Self::East => "east",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::Northeast => "northeast",
            Self::Northwest => "northwest",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let site = SiteConfig::default();
        assert!(site.lazy_load);
        assert!(site.rewrite.link && site.rewrite.style && site.rewrite.image);
        assert!(site.rewrite.href && site.rewrite.div && site.rewrite.svg);
        assert_eq!(site.image.quality, None);
        assert!(!site.image.sharpen);
        assert!(!site.image.crop);
    }

    #[test]
    fn test_gravity_tokens() {
        assert_eq!(CropGravity::Center.as_str(), "center");
        assert_eq!(CropGravity::Northwest.as_str(), "northwest");
    }

    #[test]
    fn test_gravity_parses_lowercase() {
        let params: ImageParams = toml::from_str("crop_gravity = \"southeast\"").unwrap();
        assert_eq!(params.crop_gravity, Some(CropGravity::Southeast));
    }
}
