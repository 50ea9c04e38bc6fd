//! `rewrite` command: one-shot body filter.
//!
//! Reads one response body from a file or stdin, runs it through the
//! dispatcher exactly as the serve path would, and writes the result. Handy
//! for inspecting what a deployment will emit, and for piping fixtures
//! through the engine.

use std::fs;
use std::io::{Read, Write, stdin, stdout};
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::RewriteArgs;
use crate::config::ProxyConfig;
use crate::rewrite::{OriginResponse, process_response};
use crate::utils::mime;

pub fn run(args: &RewriteArgs, config: &ProxyConfig) -> Result<()> {
    let (body, inferred_type) = read_input(args.input.as_deref())?;

    let content_type = args
        .content_type
        .clone()
        .or(inferred_type)
        .context("--content-type is required when reading from stdin")?;

    let site = config.site_for(args.domain.as_deref().unwrap_or_default());

    let response = OriginResponse {
        status: 200,
        headers: vec![(String::from("content-type"), content_type)],
        body,
    };
    let processed = process_response(response, &args.path, site);

    match &args.output {
        Some(path) => fs::write(path, &processed.body)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => stdout().write_all(&processed.body)?,
    }
    Ok(())
}

/// Read the body and infer its content type from the file extension.
fn read_input(input: Option<&Path>) -> Result<(Vec<u8>, Option<String>)> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let body = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok((body, Some(mime::from_path(path).to_string())))
        }
        _ => {
            let mut body = Vec::new();
            stdin().read_to_end(&mut body).context("Failed to read stdin")?;
            Ok((body, None))
        }
    }
}
