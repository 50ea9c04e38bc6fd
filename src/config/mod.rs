//! Configuration management for `optirelay.toml`.
//!
//! # Sections
//!
//! | Section             | Purpose                                        |
//! |---------------------|------------------------------------------------|
//! | `[serve]`           | Preview server (root, interface, port)         |
//! | `[default]`         | Fallback site record for unlisted domains      |
//! | `[sites."domain"]`  | Per-domain overrides, keyed by exact hostname   |
//!
//! Constructed once at startup from the file, immutable thereafter. The
//! engine receives one resolved [`SiteConfig`] per request via
//! [`ProxyConfig::site_for`].

mod error;
mod serve;
mod site;

pub use error::ConfigError;
pub use serve::ServeConfig;
pub use site::{CropGravity, ImageParams, RewriteToggles, SiteConfig};

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing optirelay.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Preview server settings
    pub serve: ServeConfig,

    /// Fallback site record
    pub default: SiteConfig,

    /// Per-domain site records, keyed by lowercased hostname
    pub sites: FxHashMap<String, SiteConfig>,
}

impl ProxyConfig {
    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config: ProxyConfig = toml::from_str(&raw)?;
        config.config_path = path.to_path_buf();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Resolve the site record for a request domain.
    ///
    /// Exact lowercased hostname match, falling back to the default record.
    pub fn site_for(&self, domain: &str) -> &SiteConfig {
        self.sites
            .get(&domain.to_ascii_lowercase())
            .unwrap_or(&self.default)
    }

    /// Lowercase domain keys so lookup stays exact-match.
    fn normalize(&mut self) {
        let sites = std::mem::take(&mut self.sites);
        self.sites = sites
            .into_iter()
            .map(|(domain, site)| (domain.to_ascii_lowercase(), site))
            .collect();
    }

    /// Validate every site record, collecting all diagnostics at once.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        validate_site("default", &self.default, &mut problems);
        for (domain, site) in &self.sites {
            validate_site(&format!("sites.\"{domain}\""), site, &mut problems);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }
}

// ============================================================================
// validation
// ============================================================================

fn validate_site(label: &str, site: &SiteConfig, problems: &mut Vec<String>) {
    if site.cdn_hostname.trim().is_empty() {
        problems.push(format!("[{label}] cdn_hostname is required"));
    } else if site.cdn_hostname.contains("://") || site.cdn_hostname.contains('/') {
        problems.push(format!(
            "[{label}] cdn_hostname must be a bare hostname, not a URL"
        ));
    }

    let image = &site.image;
    if let Some(quality) = image.quality
        && !(1..=100).contains(&quality)
    {
        problems.push(format!("[{label}] quality must be in 1-100"));
    }
    check_range(label, "brightness", image.brightness, -100, 100, problems);
    check_range(label, "saturation", image.saturation, -100, 100, problems);
    check_range(label, "hue", image.hue, 0, 100, problems);
    check_range(label, "gamma", image.gamma, -100, 100, problems);
    check_range(label, "contrast", image.contrast, -100, 100, problems);
}

fn check_range(
    label: &str,
    name: &str,
    value: Option<i32>,
    min: i32,
    max: i32,
    problems: &mut Vec<String>,
) {
    if let Some(value) = value
        && !(min..=max).contains(&value)
    {
        problems.push(format!("[{label}] {name} must be in {min}-{max}"));
    }
}
