//! Optirelay - a transparent image-CDN rewrite proxy.

mod cli;
mod config;
mod logger;
mod rewrite;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProxyConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Init { name } => cli::init::write_starter_config(&cli, name.as_deref()),
        Commands::Rewrite { args } => {
            let config = load_config(&cli)?;
            cli::rewrite::run(args, &config)
        }
        Commands::Serve {
            interface,
            port,
            root,
        } => {
            let mut config = load_config(&cli)?;
            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
            if let Some(root) = root {
                config.serve.root = root.clone();
            }
            cli::serve::run(config)
        }
    }
}

fn load_config(cli: &Cli) -> Result<ProxyConfig> {
    ProxyConfig::load(&cli.config).with_context(|| {
        format!(
            "Failed to load config '{}'. Run 'optirelay init' to create a new project.",
            cli.config.display()
        )
    })
}
