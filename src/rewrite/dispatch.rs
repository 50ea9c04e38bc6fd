//! Content-type dispatch over origin responses.
//!
//! Selects the rewrite strategy for one response and applies the per-format
//! framing rules. Everything here fails open: a response the engine cannot
//! or should not touch is returned verbatim.

use serde_json::Value;

use super::css;
use super::stream;
use crate::config::SiteConfig;
use crate::debug;

/// Request paths that are never rewritten.
const BYPASS_PATH_MARKERS: &[&str] = &["/wp-admin/", "/wp-login/"];

/// One origin response as handed over by the fetching collaborator.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl OriginResponse {
    /// Declared content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }
}

enum Strategy {
    Markup,
    Stylesheet,
    EmbeddedMarkup,
}

/// Route one response through the matching rewrite strategy.
///
/// Non-success statuses, unhandled content types, and administrative
/// request paths pass through byte-for-byte.
pub fn process_response(
    response: OriginResponse,
    request_path: &str,
    site: &SiteConfig,
) -> OriginResponse {
    if !response.is_success() {
        debug!("dispatch"; "upstream status {}, passing through", response.status);
        return response;
    }

    let strategy = match response.content_type() {
        None => {
            debug!("dispatch"; "missing content type, passing through");
            return response;
        }
        Some(ct) if ct.starts_with("text/html") => Strategy::Markup,
        Some(ct) if ct.starts_with("text/css") => Strategy::Stylesheet,
        Some(ct) if ct.starts_with("application/json") => Strategy::EmbeddedMarkup,
        Some(ct) => {
            debug!("dispatch"; "unhandled content type {ct}, passing through");
            return response;
        }
    };

    if is_bypassed_path(request_path) {
        debug!("dispatch"; "administrative path {request_path}, passing through");
        return response;
    }

    match strategy {
        Strategy::Markup => rewrite_markup(response, site),
        Strategy::Stylesheet => rewrite_stylesheet(response, site),
        Strategy::EmbeddedMarkup => rewrite_embedded_markup(response, site),
    }
}

fn is_bypassed_path(path: &str) -> bool {
    BYPASS_PATH_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Markup strategy: stream the body through the full tag table.
fn rewrite_markup(response: OriginResponse, site: &SiteConfig) -> OriginResponse {
    match stream::rewrite_document(&response.body, site) {
        Ok(body) => OriginResponse { body, ..response },
        Err(e) => {
            debug!("dispatch"; "markup transform failed open: {e}");
            response
        }
    }
}

/// Stylesheet strategy: one global substitution pass over the body text.
///
/// Headers stay exactly as the origin reported them - content length
/// included, a knowingly accepted inconsistency.
fn rewrite_stylesheet(response: OriginResponse, site: &SiteConfig) -> OriginResponse {
    let Ok(text) = std::str::from_utf8(&response.body) else {
        debug!("dispatch"; "stylesheet body is not utf-8, passing through");
        return response;
    };

    let body = css::rewrite_css_text(text, site).into_owned().into_bytes();
    OriginResponse { body, ..response }
}

/// Embedded-markup strategy: rewrite image tags inside the `data` field of
/// a JSON payload, dropping the stale content-length afterwards.
fn rewrite_embedded_markup(response: OriginResponse, site: &SiteConfig) -> OriginResponse {
    let Ok(mut value) = serde_json::from_slice::<Value>(&response.body) else {
        debug!("dispatch"; "unparsable json body, passing through");
        return response;
    };

    let Some(data) = value.get("data").and_then(Value::as_str) else {
        debug!("dispatch"; "no embedded markup field, passing through");
        return response;
    };
    if !data.contains("<img") {
        debug!("dispatch"; "no image tag in embedded markup, passing through");
        return response;
    }

    let rewritten = match stream::rewrite_fragment(data, site) {
        Ok(rewritten) => rewritten,
        Err(e) => {
            debug!("dispatch"; "embedded markup transform failed open: {e}");
            return response;
        }
    };

    value["data"] = Value::String(rewritten);
    let Ok(body) = serde_json::to_string(&value) else {
        return response;
    };

    let mut response = response;
    // Body size changed and nothing downstream recomputes it
    response.remove_header("content-length");
    response.body = body.into_bytes();
    response
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

    fn response(content_type: &str, body: &str) -> OriginResponse {
        OriginResponse {
            status: 200,
            headers: vec![
                ("content-type".into(), content_type.into()),
                ("content-length".into(), body.len().to_string()),
            ],
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_markup_strategy() {
        let input = response(
            "text/html; charset=utf-8",
            r#"<img src="https://site.com/wp-content/uploads/a-300x200.jpg">"#,
        );
        let output = process_response(input, "/blog/post/", &site());
        let body = String::from_utf8(output.body).unwrap();
        assert!(body.contains("https://x.b-cdn.net/wp-content/uploads/a.jpg?width=300"));
        // Markup headers are preserved
        assert_eq!(output.headers.len(), 2);
    }

    #[test]
    fn test_stylesheet_strategy_keeps_headers() {
        let input = response("text/css", "body{background:url('/wp-content/uploads/b.png')}");
        let original_headers = input.headers.clone();
        let output = process_response(input, "/wp-includes/css/style.css", &site());

        let body = String::from_utf8(output.body).unwrap();
        assert_eq!(
            body,
            "body{background:url('https://x.b-cdn.net/wp-content/uploads/b.png?width=auto&height=auto')}"
        );
        assert_eq!(output.headers, original_headers);
    }

    #[test]
    fn test_json_without_image_is_byte_identical() {
        let input = response("application/json", r#"{"data":"<p>no pictures here</p>"}"#);
        let original = input.clone();
        let output = process_response(input, "/", &site());
        assert_eq!(output.body, original.body);
        assert_eq!(output.headers, original.headers);
    }

    #[test]
    fn test_json_with_image_rewritten() {
        let input = response(
            "application/json",
            r#"{"page":2,"data":"<img src=\"https://site.com/wp-content/uploads/a.jpg\">","more":true}"#,
        );
        let output = process_response(input, "/", &site());
        // Stale content-length dropped
        assert!(output.content_type().is_some());
        assert!(!output.headers.iter().any(|(n, _)| n == "content-length"));
        let body = String::from_utf8(output.body).unwrap();

        assert!(body.contains("x.b-cdn.net/wp-content/uploads/a.jpg?width=auto"));
        // Key order survives reassembly
        let page = body.find(r#""page""#).unwrap();
        let data = body.find(r#""data""#).unwrap();
        let more = body.find(r#""more""#).unwrap();
        assert!(page < data && data < more);
    }

    #[test]
    fn test_json_missing_field_passes_through() {
        let input = response("application/json", r#"{"html":"<img src='x'>"}"#);
        let original = input.clone();
        let output = process_response(input, "/", &site());
        assert_eq!(output.body, original.body);
    }

    #[test]
    fn test_admin_paths_pass_through() {
        let site = site();
        for path in ["/wp-admin/options.php", "/wp-login/", "/a/wp-admin/b"] {
            let input = response(
                "text/html",
                r#"<img src="https://site.com/wp-content/uploads/a.jpg">"#,
            );
            let original = input.clone();
            let output = process_response(input, path, &site);
            assert_eq!(output.body, original.body, "path {path} must bypass");
        }

        // The bypass gates every handled content type
        let input = response(
            "application/json",
            r#"{"data":"<img src=\"https://site.com/wp-content/uploads/a.jpg\">"}"#,
        );
        let original = input.clone();
        let output = process_response(input, "/wp-admin/admin-ajax.php", &site);
        assert_eq!(output.body, original.body);
    }

    #[test]
    fn test_non_success_status_passes_through() {
        let mut input = response(
            "text/html",
            r#"<img src="https://site.com/wp-content/uploads/a.jpg">"#,
        );
        input.status = 404;
        let original = input.clone();
        let output = process_response(input, "/", &site());
        assert_eq!(output.body, original.body);
    }

    #[test]
    fn test_unhandled_content_type_passes_through() {
        let input = response("image/png", "not really a png");
        let original = input.clone();
        let output = process_response(input, "/", &site());
        assert_eq!(output.body, original.body);
    }

    #[test]
    fn test_missing_content_type_passes_through() {
        let input = OriginResponse {
            status: 200,
            headers: vec![],
            body: b"<img src=\"https://site.com/wp-content/uploads/a.jpg\">".to_vec(),
        };
        let original = input.clone();
        let output = process_response(input, "/", &site());
        assert_eq!(output.body, original.body);
    }
}
