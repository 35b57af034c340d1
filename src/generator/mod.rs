//! Generated site-wide files: rss feed, sitemap, web manifest, robots.txt.

pub mod manifest;
pub mod robots;
pub mod rss;
pub mod sitemap;

use crate::{config::SiteConfig, data::SiteData};
use anyhow::Result;

/// Write every enabled site-wide file. The output directory must exist.
pub fn build_feeds(config: &SiteConfig, data: &SiteData) -> Result<()> {
    let ((rss, sitemap), (manifest, robots)) = rayon::join(
        || {
            rayon::join(
                || rss::build_rss(config, data),
                || sitemap::build_sitemap(config, data),
            )
        },
        || {
            rayon::join(
                || manifest::build_manifest(config),
                || robots::build_robots(config),
            )
        },
    );
    rss?;
    sitemap?;
    manifest?;
    robots
}
