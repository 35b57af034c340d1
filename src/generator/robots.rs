//! `robots.txt`.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result};
use std::fs;

pub fn build_robots(config: &SiteConfig) -> Result<()> {
    let path = config.build.output.join("robots.txt");
    fs::write(&path, robots_txt(config))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log!("robots"; "robots.txt");
    Ok(())
}

/// Allow everything. The sitemap line is only written when one is generated.
fn robots_txt(config: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");
    if config.build.sitemap.enable {
        let href = config.output_href(&config.build.sitemap.path);
        out.push_str(&format!("\nSitemap: {}\n", config.absolute_url(&href)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_robots_txt() {
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com".into());
        config.build.output = PathBuf::from("/site/public");
        config.build.sitemap.path = PathBuf::from("/site/public/sitemap.xml");

        assert_eq!(
            robots_txt(&config),
            "User-agent: *\nAllow: /\n\nSitemap: https://example.com/sitemap.xml\n"
        );

        config.build.sitemap.enable = false;
        assert_eq!(robots_txt(&config), "User-agent: *\nAllow: /\n");
    }
}
