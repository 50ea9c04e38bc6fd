//! CDN URL construction.
//!
//! Two entry points share one query-ordering contract: [`rewrite_reference`]
//! rebuilds a full URL on the CDN authority, [`transform_query`] returns the
//! standalone query string for contexts where the caller substitutes the
//! authority itself (stylesheet rewriting).

use std::fmt::Write;

use url::Url;

use super::RewriteError;
use super::dimension::Dims;
use crate::config::SiteConfig;

/// Validity check for one asset reference.
///
/// A rewritable reference is non-empty, not an inline-encoded payload,
/// points into the known asset tree, and does not already target the CDN
/// authority - re-processing engine output is a no-op by construction.
pub fn is_rewritable(site: &SiteConfig, value: &str) -> bool {
    !value.is_empty()
        && !value.contains("base64")
        && value.contains("/wp-content/")
        && !value.contains(site.cdn_hostname.as_str())
}

/// Rebuild `reference` on the CDN authority with transform parameters.
///
/// Only the path component of the original survives: authority, scheme,
/// query and fragment are all replaced. An unparsable reference (relative,
/// protocol-relative, or garbage) is a [`RewriteError::MalformedReference`];
/// callers recover by leaving the value unmodified.
pub fn rewrite_reference(
    site: &SiteConfig,
    reference: &str,
    dims: &Dims,
) -> Result<String, RewriteError> {
    let parsed = Url::parse(reference)
        .map_err(|_| RewriteError::MalformedReference(reference.to_string()))?;

    Ok(format!(
        "https://{}{}{}",
        site.cdn_hostname,
        parsed.path(),
        transform_query(site, dims)
    ))
}

/// Build the transform query string for the given dimensions.
///
/// Term order is stable: width/height, quality, sharpen, crop (known pair
/// only), crop_gravity (crop only), brightness, saturation, hue, gamma,
/// contrast. Absent parameters are omitted entirely, never emitted empty or
/// zero.
pub fn transform_query(site: &SiteConfig, dims: &Dims) -> String {
    let image = &site.image;

    let mut query = match dims {
        Dims::Pair(width, height) => format!("?width={width}&height={height}"),
        Dims::Width(width) => format!("?width={width}&height=auto"),
        Dims::Auto => String::from("?width=auto&height=auto"),
    };

    if let Some(quality) = image.quality
        && quality != 0
    {
        let _ = write!(query, "&quality={quality}");
    }
    if image.sharpen {
        query.push_str("&sharpen=true");
    }
    if image.crop
        && let Dims::Pair(width, height) = dims
    {
        let _ = write!(query, "&crop={width},{height}");
        if let Some(gravity) = image.crop_gravity {
            let _ = write!(query, "&crop_gravity={}", gravity.as_str());
        }
    }
    push_adjustment(&mut query, "brightness", image.brightness);
    push_adjustment(&mut query, "saturation", image.saturation);
    push_adjustment(&mut query, "hue", image.hue);
    push_adjustment(&mut query, "gamma", image.gamma);
    push_adjustment(&mut query, "contrast", image.contrast);

    query
}

fn push_adjustment(query: &mut String, name: &str, value: Option<i32>) {
    if let Some(value) = value
        && value != 0
    {
        let _ = write!(query, "&{name}={value}");
    }
}
