//! Preview server.
//!
//! Serves a local directory through the rewrite engine so operators can
//! inspect exactly what an edge deployment will emit. The origin fetch of a
//! production deployment is a collaborator concern; here the "origin" is the
//! filesystem.

mod path;
mod response;

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tiny_http::{Request, Server};

use crate::config::ProxyConfig;
use crate::rewrite::{OriginResponse, process_response};
use crate::utils::mime;
use crate::{debug, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind and run the request loop until Ctrl+C.
pub fn run(config: ProxyConfig) -> Result<()> {
    if !config.serve.root.exists() {
        bail!(
            "Serve root '{}' does not exist (set [serve] root or pass --root)",
            config.serve.root.display()
        );
    }

    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    // Ctrl+C unblocks the accept loop for a clean exit
    let handle = Arc::clone(&server);
    ctrlc::set_handler(move || handle.unblock())?;

    log!("serve"; "http://{}", addr);
    log!("serve"; "previewing {} through the rewrite engine", config.serve.root.display());

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &config) {
            log!("serve"; "request error: {e}");
        }
    }

    log!("serve"; "shutting down");
    Ok(())
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: std::net::IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Handle a single HTTP request: resolve the file, run it through the
/// dispatcher, send the result.
fn handle_request(request: Request, config: &ProxyConfig) -> Result<()> {
    let url = request.url().to_string();

    let Some(file) = path::resolve_path(&url, &config.serve.root) else {
        debug!("serve"; "not found: {url}");
        return response::respond_not_found(request);
    };

    let content_type = mime::from_path(&file);
    let body =
        fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;

    let site = config.site_for(&request_domain(&request));

    let origin = OriginResponse {
        status: 200,
        headers: vec![(String::from("content-type"), content_type.to_string())],
        body,
    };
    let request_path = url.split('?').next().unwrap_or(&url);
    let processed = process_response(origin, request_path, site);

    response::respond(request, processed)
}

/// Domain for the site-record lookup, from the Host header.
fn request_domain(request: &Request) -> String {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("host"))
        .map(|h| {
            h.value
                .as_str()
                .split(':')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase()
        })
        .unwrap_or_default()
}
