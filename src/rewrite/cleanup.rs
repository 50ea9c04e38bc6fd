//! Removal of the empty decorative `<svg>` the source platform emits.

use lol_html::HandlerResult;
use lol_html::html_content::Element;

use crate::config::SiteConfig;
use crate::debug;

/// The exact inline style the platform puts on its zero-area placeholder.
const HIDDEN_STYLE: &str =
    "visibility: hidden; position: absolute; left: -9999px; overflow: hidden;";

/// Remove an `<svg>` iff it has a zero-area view box, no class, and the
/// known visually-hidden inline style. This is a narrow artifact strip, not
/// a general cleanup pass.
pub fn remove_hidden_artifact(el: &mut Element, site: &SiteConfig) -> HandlerResult {
    if !site.rewrite.svg {
        debug!("rewrite"; "svg family disabled, skipping <svg>");
        return Ok(());
    }

    let zero_view_box = el
        .get_attribute("viewBox")
        .is_some_and(|v| v == "0 0 0 0");

    if zero_view_box
        && el.get_attribute("class").is_none()
        && el.get_attribute("style").is_some_and(|s| s == HIDDEN_STYLE)
    {
        el.remove();
    }
    Ok(())
}
