//! Capability-keyed handler registration.
//!
//! Each tag family gets exactly the capability it needs - observe one
//! element's attributes/text and optionally replace them - wired here as a
//! tag-to-rewriter table rather than spread over the call sites.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use lol_html::html_content::{ContentType, EndTag};
use lol_html::{ElementContentHandlers, Selector, element, text};

use super::style::StyleBuffer;
use super::{attr, cleanup};
use crate::config::SiteConfig;

/// Handler table type fed into the streaming rewriter settings.
pub type HandlerTable<'h> = Vec<(Cow<'static, Selector>, ElementContentHandlers<'h>)>;

/// The full tag table for markup documents.
///
/// The style handlers share one [`StyleBuffer`]: text chunks accumulate and
/// are removed from the stream as they arrive, the final chunk triggers the
/// single substitution pass, and the end-tag callback - which the host
/// guarantees runs after text processing for the node completes - re-emits
/// the pending content and resets the buffer for the next node.
pub fn document_handlers(site: &SiteConfig) -> HandlerTable<'_> {
    let style_buffer = Rc::new(RefCell::new(StyleBuffer::default()));
    let style_text = Rc::clone(&style_buffer);

    vec![
        element!("link[rel]", move |el| attr::rewrite_icon_link(el, site)),
        element!("style", move |el| {
            if !site.rewrite.style {
                return Ok(());
            }
            let state = Rc::clone(&style_buffer);
            if let Some(handlers) = el.end_tag_handlers() {
                handlers.push(Box::new(move |end: &mut EndTag<'_>| {
                    if let Some(pending) = state.borrow_mut().consume() {
                        end.before(&pending, ContentType::Html);
                    }
                    Ok(())
                }) as Box<dyn for<'a, 'b> FnOnce(&'a mut EndTag<'b>) -> lol_html::HandlerResult>);
            }
            Ok(())
        }),
        text!("style", move |chunk| {
            if !site.rewrite.style {
                return Ok(());
            }
            let mut buffer = style_text.borrow_mut();
            buffer.push(chunk.as_str());
            // Nothing is emitted in place; the end-tag callback re-emits.
            chunk.remove();
            if chunk.last_in_text_node() {
                buffer.finalize(site);
            }
            Ok(())
        }),
        element!("img", move |el| attr::rewrite_image_element(el, site)),
        element!("a[href]", move |el| attr::rewrite_anchor(el, site)),
        element!("svg", move |el| cleanup::remove_hidden_artifact(el, site)),
        element!("div", move |el| attr::rewrite_container(el, site)),
    ]
}

/// Image-only table for markup fragments embedded in JSON payloads.
pub fn image_handlers(site: &SiteConfig) -> HandlerTable<'_> {
    vec![element!("img", move |el| attr::rewrite_image_element(el, site))]
}
