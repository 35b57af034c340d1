//! `[serve]` section: preview server binding and behavior.

use super::{ConfigError, defaults};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// `[serve]` section in episodic.toml.
///
/// # Example
/// ```toml
/// [serve]
/// interface = "0.0.0.0"
/// port = 3000
/// port_retries = 5
/// watch = false
/// live_listing = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// IP address to listen on. `127.0.0.1` keeps the preview local.
    #[serde(default = "defaults::serve::interface")]
    #[educe(Default = defaults::serve::interface())]
    pub interface: String,

    /// First port tried.
    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,

    /// How many consecutive ports to try when `port` is taken.
    #[serde(default = "defaults::serve::port_retries")]
    #[educe(Default = defaults::serve::port_retries())]
    pub port_retries: u16,

    /// Rebuild on content changes and swap the served dataset.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub watch: bool,

    /// Render `/episodes/?tag=..&q=..` on the server. When off, the listing
    /// is served as the static file and filtered by the client script only,
    /// as on a static host.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub live_listing: bool,
}

impl ServeConfig {
    pub fn ip(&self) -> Result<IpAddr, ConfigError> {
        self.interface.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.interface
            ))
        })
    }

    /// Addresses to try binding, in order. Stops at port 65535.
    pub fn candidates(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        let ip = self.ip()?;
        Ok((0..self.port_retries.max(1))
            .map_while(|offset| self.port.checked_add(offset))
            .map(|port| SocketAddr::new(ip, port))
            .collect())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ip()?;
        if self.port == 0 {
            return Err(ConfigError::Validation("[serve.port] must not be 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(serve: &str) -> ServeConfig {
        let source =
            format!("[base]\ntitle = \"Show\"\ndescription = \"d\"\n\n[serve]\n{serve}");
        toml::from_str::<SiteConfig>(&source).unwrap().serve
    }

    #[test]
    fn test_defaults_are_local_and_live() {
        let serve = ServeConfig::default();
        assert_eq!(serve.interface, "127.0.0.1");
        assert_eq!(serve.port, 5277);
        assert_eq!(serve.port_retries, 10);
        assert!(serve.watch);
        assert!(serve.live_listing);

        let parsed = parse("");
        assert_eq!(parsed.port, serve.port);
        assert!(parsed.live_listing);
    }

    #[test]
    fn test_static_listing_preview() {
        let serve = parse("live_listing = false\nwatch = false");
        assert!(!serve.live_listing);
        assert!(!serve.watch);
    }

    #[test]
    fn test_candidates() {
        let serve = parse("interface = \"0.0.0.0\"\nport = 8080\nport_retries = 3");
        let ports: Vec<u16> = serve.candidates().unwrap().iter().map(SocketAddr::port).collect();
        assert_eq!(ports, vec![8080, 8081, 8082]);
        assert!(serve.candidates().unwrap()[0].ip().is_unspecified());

        // ports past 65535 are not wrapped
        let top = parse("port = 65534\nport_retries = 5");
        assert_eq!(top.candidates().unwrap().len(), 2);

        // zero retries still tries the configured port
        let once = parse("port_retries = 0");
        assert_eq!(once.candidates().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_interface() {
        let serve = parse("interface = \"localhost\"");
        let err = serve.validate().unwrap_err();
        assert!(err.to_string().contains("`localhost` is not an IP address"));
        assert!(serve.candidates().is_err());

        let ipv6 = parse("interface = \"::1\"");
        assert!(ipv6.validate().is_ok());
        assert!(parse("port = 0").validate().is_err());
    }

    #[test]
    fn test_unknown_serve_key_rejected() {
        let source = "[base]\ntitle = \"Show\"\ndescription = \"d\"\n[serve]\nlivereload = true\n";
        assert!(toml::from_str::<SiteConfig>(source).is_err());
    }

    #[test]
    fn test_cli_watch_override() {
        let mut config = SiteConfig::default();
        let cli = Cli::parse_from(["episodic", "serve", "--watch=false", "-p", "9100"]);
        config.update_with_cli(&cli);
        assert!(!config.serve.watch);
        assert_eq!(config.serve.port, 9100);
        assert!(config.serve.live_listing);

        // a bare flag turns watching back on
        config.serve.watch = false;
        let cli = Cli::parse_from(["episodic", "serve", "--watch"]);
        config.update_with_cli(&cli);
        assert!(config.serve.watch);
    }
}
