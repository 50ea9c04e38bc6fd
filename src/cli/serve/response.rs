//! HTTP response handlers.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

use crate::rewrite::OriginResponse;
use crate::utils::mime::types::PLAIN;

/// Send a processed origin response back to the client.
///
/// Content-length is dropped from the forwarded headers; the server layer
/// computes framing from the actual body.
pub fn respond(request: Request, response: OriginResponse) -> Result<()> {
    let mut http =
        Response::from_data(response.body).with_status_code(StatusCode(response.status));

    for (name, value) in &response.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            http = http.with_header(header);
        }
    }

    request.respond(http)?;
    Ok(())
}

/// Respond with a plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    let response = Response::from_data(b"404 Not Found".to_vec())
        .with_status_code(StatusCode(404))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
