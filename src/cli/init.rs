//! `init` command: scaffold a starter configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::Cli;
use crate::log;

/// Starter configuration with every knob present and commented.
const STARTER_CONFIG: &str = r#"# optirelay configuration
#
# Every domain you route through the proxy gets a [sites."<domain>"] record;
# anything else falls back to [default].

[serve]
root = "public"          # directory served by `optirelay serve`
interface = "127.0.0.1"
port = 4040

[default]
cdn_hostname = "example.b-cdn.net"  # bare hostname of your image CDN zone
lazy_load = true

[default.rewrite]
link = true    # icon <link> tags
style = true   # inline <style> text
image = true   # <img> tags and responsive candidate lists
href = true    # <a href> asset links (lightboxes)
div = true     # <div> inline styles and vendor background attributes
svg = true     # decorative <svg> artifact removal

[default.image]
quality = 85          # 1-100
sharpen = false
crop = true
crop_gravity = "center"  # center, forget, east, north, south, west,
                         # northeast, northwest, southeast, southwest
# brightness = 0      # -100-100
# saturation = 0      # -100-100, -100 for grayscale
# hue = 0             # 0-100
# gamma = 0           # -100-100
# contrast = 0        # -100-100

# [sites."www.example.com"]
# cdn_hostname = "www-example.b-cdn.net"
"#;

/// Write the starter config, refusing to overwrite an existing one.
pub fn write_starter_config(cli: &Cli, name: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let dir = match name {
        Some(name) => cwd.join(name),
        None => cwd,
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(&cli.config);
    if path.exists() {
        bail!("Config file '{}' already exists", path.display());
    }

    fs::write(&path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log!("init"; "created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::ProxyConfig;

    #[test]
    fn test_starter_config_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optirelay.toml");
        std::fs::write(&path, super::STARTER_CONFIG).unwrap();

        let config = ProxyConfig::load(&path).unwrap();
        assert_eq!(config.default.cdn_hostname, "example.b-cdn.net");
        assert_eq!(config.default.image.quality, Some(85));
        assert!(config.sites.is_empty());
    }
}
