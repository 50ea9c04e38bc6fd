//! Incremental markup transform.
//!
//! Body bytes are pushed through a `lol_html` rewriter in chunks, so
//! documents never need to be complete in memory before handlers run and
//! pattern matches may span arbitrary write boundaries. Output collects into
//! a buffer the caller takes back at the end; on any transform error callers
//! fail open to the original body.

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::{HtmlRewriter, OutputSink, Settings};

use super::RewriteError;
use super::tags::{self, HandlerTable};
use crate::config::SiteConfig;

/// Feed size used when rewriting an already-buffered body.
const STREAM_CHUNK: usize = 8 * 1024;

/// Collects rewritten output without copying it out of the rewriter early.
struct CollectSink(Rc<RefCell<Vec<u8>>>);

impl OutputSink for CollectSink {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        self.0.borrow_mut().extend_from_slice(chunk);
    }
}

/// A streaming markup rewriter bound to one site configuration.
pub struct MarkupRewriter<'h> {
    rewriter: HtmlRewriter<'h, CollectSink>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl<'h> MarkupRewriter<'h> {
    /// Rewriter with the full tag table (documents).
    pub fn full(site: &'h SiteConfig) -> Self {
        Self::with_handlers(tags::document_handlers(site))
    }

    /// Rewriter with the image-only table (embedded fragments).
    pub fn images_only(site: &'h SiteConfig) -> Self {
        Self::with_handlers(tags::image_handlers(site))
    }

    fn with_handlers(handlers: HandlerTable<'h>) -> Self {
        let output = Rc::new(RefCell::new(Vec::new()));
        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: handlers,
                ..Settings::default()
            },
            CollectSink(Rc::clone(&output)),
        );
        Self { rewriter, output }
    }

    /// Push one chunk of the body through the transform.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), RewriteError> {
        self.rewriter.write(chunk).map_err(RewriteError::Transform)
    }

    /// Flush the parser and take the rewritten output.
    pub fn finish(self) -> Result<Vec<u8>, RewriteError> {
        let Self { rewriter, output } = self;
        rewriter.end().map_err(RewriteError::Transform)?;
        Ok(Rc::try_unwrap(output)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.borrow().clone()))
    }
}

/// Rewrite a complete markup document.
pub fn rewrite_document(body: &[u8], site: &SiteConfig) -> Result<Vec<u8>, RewriteError> {
    let mut rewriter = MarkupRewriter::full(site);
    for chunk in body.chunks(STREAM_CHUNK) {
        rewriter.write(chunk)?;
    }
    rewriter.finish()
}

/// Rewrite a markup fragment with the image-only table.
pub fn rewrite_fragment(html: &str, site: &SiteConfig) -> Result<String, RewriteError> {
    let mut rewriter = MarkupRewriter::images_only(site);
    rewriter.write(html.as_bytes())?;
    let output = rewriter.finish()?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
