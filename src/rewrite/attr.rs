//! Per-element attribute rewriting.
//!
//! Each markup family enumerates the attribute names that may carry an asset
//! reference; every name runs through the same validity check, dimension
//! inference, and URL builder. The per-attribute work is one parameterized
//! routine, not a copy per attribute name.

use lol_html::HandlerResult;
use lol_html::html_content::Element;

use super::dimension::{self, Dims};
use super::{cdn, css, pattern, srcset};
use crate::config::SiteConfig;
use crate::debug;

/// `<img>` attributes that each carry one asset reference.
const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazyload", "data-lazy-src"];

/// `<img>` attributes carrying responsive candidate lists.
const IMAGE_SRCSET_ATTRS: &[&str] = &["srcset", "data-srcset", "data-lazy-srcset"];

/// `<div>` vendor attributes carrying one asset reference. These have no
/// sibling dimension attributes, so only the filename tier applies.
const CONTAINER_SOURCE_ATTRS: &[&str] = &["data-ultimate-bg", "data-image-id"];

/// `rel` values that mark a `<link>` as an icon reference.
const ICON_RELS: &[&str] = &[
    "shortcut icon",
    "icon",
    "apple-touch-icon",
    "apple-touch-icon-precomposed",
];

/// Rewrite every present source/srcset attribute of an `<img>`.
///
/// Also adds `loading="lazy"` when configured and not already set; this is
/// independent of whether any reference was rewritten.
pub fn rewrite_image_element(el: &mut Element, site: &SiteConfig) -> HandlerResult {
    if !site.rewrite.image {
        debug!("rewrite"; "image family disabled, skipping <img>");
        return Ok(());
    }

    let explicit = explicit_dims(el);
    let explicit = explicit.as_ref().map(|(w, h)| (w.as_str(), h.as_str()));

    for name in IMAGE_SOURCE_ATTRS {
        rewrite_source_attr(el, name, explicit, site)?;
    }
    for name in IMAGE_SRCSET_ATTRS {
        rewrite_srcset_attr(el, name, site)?;
    }

    if site.lazy_load && !el.has_attribute("loading") {
        el.set_attribute("loading", "lazy")?;
    }

    Ok(())
}

/// Rewrite an `<a href>` pointing at an asset (lightbox-style links).
/// No dimension sources exist here; the CDN decides.
pub fn rewrite_anchor(el: &mut Element, site: &SiteConfig) -> HandlerResult {
    if !site.rewrite.href {
        debug!("rewrite"; "href family disabled, skipping <a>");
        return Ok(());
    }

    let Some(href) = el.get_attribute("href") else {
        return Ok(());
    };
    if !cdn::is_rewritable(site, &href) {
        return Ok(());
    }

    match cdn::rewrite_reference(site, &href, &Dims::Auto) {
        Ok(rewritten) => el.set_attribute("href", &rewritten)?,
        Err(e) => debug!("rewrite"; "href left unmodified: {e}"),
    }
    Ok(())
}

/// Rewrite an icon `<link href>`, sized from the `sizes` attribute when
/// present. `.ico` files are not optimizable and stay untouched.
pub fn rewrite_icon_link(el: &mut Element, site: &SiteConfig) -> HandlerResult {
    if !site.rewrite.link {
        debug!("rewrite"; "link family disabled, skipping <link>");
        return Ok(());
    }

    let Some(rel) = el.get_attribute("rel") else {
        return Ok(());
    };
    if !ICON_RELS.contains(&rel.as_str()) {
        return Ok(());
    }

    let Some(href) = el.get_attribute("href") else {
        return Ok(());
    };
    if !cdn::is_rewritable(site, &href) || href.contains(".ico") {
        return Ok(());
    }

    let sizes = el.get_attribute("sizes");
    let explicit = sizes.as_deref().and_then(first_size_token);
    let explicit = explicit.as_ref().map(|(w, h)| (w.as_str(), h.as_str()));

    let (reference, dims) = dimension::infer(&href, explicit, None);
    match cdn::rewrite_reference(site, &reference, &dims) {
        Ok(rewritten) => el.set_attribute("href", &rewritten)?,
        Err(e) => debug!("rewrite"; "icon link left unmodified: {e}"),
    }
    Ok(())
}

/// Rewrite a `<div>`: inline `style` backgrounds plus the vendor slider
/// attributes that smuggle image references.
pub fn rewrite_container(el: &mut Element, site: &SiteConfig) -> HandlerResult {
    if !site.rewrite.div {
        debug!("rewrite"; "div family disabled, skipping <div>");
        return Ok(());
    }

    if let Some(style) = el.get_attribute("style")
        && cdn::is_rewritable(site, &style)
    {
        let rewritten = css::rewrite_css_text(&style, site);
        el.set_attribute("style", &rewritten)?;
    }

    for name in CONTAINER_SOURCE_ATTRS {
        rewrite_source_attr(el, name, None, site)?;
    }
    Ok(())
}

/// Rewrite one single-reference attribute in place, if present and valid.
///
/// A malformed reference is recovered locally: the attribute keeps its
/// original value and sibling attributes are unaffected.
fn rewrite_source_attr(
    el: &mut Element,
    name: &str,
    explicit: Option<(&str, &str)>,
    site: &SiteConfig,
) -> HandlerResult {
    let Some(value) = el.get_attribute(name) else {
        return Ok(());
    };
    if !cdn::is_rewritable(site, &value) {
        return Ok(());
    }

    let (reference, dims) = dimension::infer(&value, explicit, None);
    match cdn::rewrite_reference(site, &reference, &dims) {
        Ok(rewritten) => el.set_attribute(name, &rewritten)?,
        Err(e) => debug!("rewrite"; "{name} left unmodified: {e}"),
    }
    Ok(())
}

/// Rewrite one candidate-list attribute in place, if present and valid.
fn rewrite_srcset_attr(el: &mut Element, name: &str, site: &SiteConfig) -> HandlerResult {
    let Some(value) = el.get_attribute(name) else {
        return Ok(());
    };
    if !cdn::is_rewritable(site, &value) {
        return Ok(());
    }

    let rewritten = srcset::rewrite_descriptor_list(&value, site);
    el.set_attribute(name, &rewritten)?;
    Ok(())
}

/// Explicit `width`/`height` attribute pair, when both are present and
/// non-empty.
fn explicit_dims(el: &Element) -> Option<(String, String)> {
    let width = el.get_attribute("width")?;
    let height = el.get_attribute("height")?;
    (!width.trim().is_empty() && !height.trim().is_empty()).then_some((width, height))
}

/// First `WxH` candidate of an icon `sizes` attribute value.
fn first_size_token(sizes: &str) -> Option<(String, String)> {
    let caps = pattern::SIZE_TOKEN.captures(sizes)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
