//! `[serve]` section configuration.
//!
//! Settings for the local preview server.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! root = "public"             # Directory served through the engine
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 4040                 # HTTP port number
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Directory whose files are served through the rewrite engine.
    pub root: PathBuf,

    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 4040,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_defaults() {
        let serve = ServeConfig::default();
        assert_eq!(serve.root, PathBuf::from("public"));
        assert_eq!(serve.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(serve.port, 4040);
    }

    #[test]
    fn test_parse() {
        let serve: ServeConfig =
            toml::from_str("root = \"out\"\ninterface = \"0.0.0.0\"\nport = 8080").unwrap();
        assert_eq!(serve.root, PathBuf::from("out"));
        assert_eq!(serve.interface, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(serve.port, 8080);
    }
}
