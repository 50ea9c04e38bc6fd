//! Buffering for chunked inline-style text.
//!
//! A `url(...)` match may span a chunk boundary, so no substitution happens
//! until the host signals the final chunk of a text node. The buffer is an
//! explicit state machine so the one ordering contract this engine relies on
//! (text finalization completes before the node's structural callback runs)
//! stays visible and testable without the host streaming mechanism:
//!
//! ```text
//! Idle -> Accumulating -> Finalized -> (consumed) Idle
//!              |                ^
//!              v                |
//!           Excluded -----------+   (original text restored verbatim)
//! ```

use std::mem;

use super::css;
use crate::config::SiteConfig;

/// Administrative-UI style blocks are never rewritten.
const ADMIN_MARKER: &str = "#wpadminbar";

/// Per-node accumulator for style-bearing text chunks.
///
/// Exactly one node is in flight at a time; [`StyleBuffer::consume`] resets
/// the state so a later, unrelated node starts fresh.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum StyleBuffer {
    #[default]
    Idle,
    /// Collecting chunks; no transformation has happened yet.
    Accumulating(String),
    /// Admin marker seen; the original text is kept for verbatim restore.
    Excluded(String),
    /// Substitution done (or skipped), pending structural consumption.
    Finalized(String),
}

impl StyleBuffer {
    /// Append one arriving text chunk.
    pub fn push(&mut self, chunk: &str) {
        match self {
            Self::Idle => *self = Self::Accumulating(chunk.to_string()),
            Self::Accumulating(text) | Self::Excluded(text) => text.push_str(chunk),
            // A finalized buffer was never consumed; start over rather than
            // mix two nodes' content.
            Self::Finalized(_) => *self = Self::Accumulating(chunk.to_string()),
        }

        // Check the accumulated text, not the chunk: the marker itself may
        // span a boundary.
        if let Self::Accumulating(text) = self
            && text.contains(ADMIN_MARKER)
        {
            *self = Self::Excluded(mem::take(text));
        }
    }

    /// Final chunk arrived: run the substitution pass exactly once.
    ///
    /// Excluded nodes finalize to their untouched original text. The
    /// `&gt;` correction undoes the double-escaped child combinators the
    /// source platform emits in this context.
    pub fn finalize(&mut self, site: &SiteConfig) {
        *self = match mem::take(self) {
            Self::Idle => Self::Finalized(String::new()),
            Self::Accumulating(text) => {
                let rewritten = css::rewrite_css_text(&text, site).replace("&gt;", ">");
                Self::Finalized(rewritten)
            }
            Self::Excluded(text) => Self::Finalized(text),
            finalized @ Self::Finalized(_) => finalized,
        };
    }

    /// Yield the pending text once and reset for the next node.
    ///
    /// Returns `None` unless the buffer is finalized, so a structural
    /// callback firing without preceding text is a no-op.
    pub fn consume(&mut self) -> Option<String> {
        match mem::take(self) {
            Self::Finalized(text) => Some(text),
            other => {
                *self = other;
                None
            }
        }
    }
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
    fn test_match_spanning_chunks_rewritten_once() {
        let mut buffer = StyleBuffer::default();
        buffer.push("body{background:url('/wp-content/up");
        buffer.push("loads/bg.png')}");
        buffer.finalize(&site());

        assert_eq!(
            buffer.consume().unwrap(),
            "body{background:url('https://x.b-cdn.net/wp-content/uploads/bg.png?width=auto&height=auto')}"
        );
    }

    #[test]
    fn test_no_consumption_before_finalize() {
        let mut buffer = StyleBuffer::default();
        buffer.push("body{background:url('/wp-content/uploads/bg.png')}");
        assert_eq!(buffer.consume(), None);
        assert!(matches!(buffer, StyleBuffer::Accumulating(_)));
    }

    #[test]
    fn test_consume_resets_for_next_node() {
        let mut buffer = StyleBuffer::default();
        buffer.push("a{}");
        buffer.finalize(&site());
        assert!(buffer.consume().is_some());
        assert_eq!(buffer, StyleBuffer::Idle);
        assert_eq!(buffer.consume(), None);
    }

    #[test]
    fn test_admin_marker_excludes_node() {
        let mut buffer = StyleBuffer::default();
        let original = "#wpadminbar{background:url('/wp-content/uploads/admin.png')}";
        buffer.push(original);
        buffer.finalize(&site());
        assert_eq!(buffer.consume().unwrap(), original);
    }

    #[test]
    fn test_admin_marker_spanning_chunks() {
        let mut buffer = StyleBuffer::default();
        buffer.push("#wpadmin");
        buffer.push("bar { height: 32px; }");
        assert!(matches!(buffer, StyleBuffer::Excluded(_)));
        buffer.finalize(&site());
        assert_eq!(buffer.consume().unwrap(), "#wpadminbar { height: 32px; }");
    }

    #[test]
    fn test_entity_correction() {
        let mut buffer = StyleBuffer::default();
        buffer.push(".menu &gt; li { display: block; }");
        buffer.finalize(&site());
        assert_eq!(buffer.consume().unwrap(), ".menu > li { display: block; }");
    }

    #[test]
    fn test_empty_node() {
        let mut buffer = StyleBuffer::default();
        buffer.push("");
        buffer.finalize(&site());
        assert_eq!(buffer.consume().unwrap(), "");
    }
}
