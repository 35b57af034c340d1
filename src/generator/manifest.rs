//! `manifest.webmanifest` for installable sites.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

/// Output file name, linked from every page head.
pub const MANIFEST_FILE: &str = "manifest.webmanifest";

#[derive(Debug, Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    description: &'a str,
    start_url: &'a str,
    display: &'a str,
    background_color: &'a str,
    theme_color: &'a str,
    icons: Vec<Icon<'a>>,
}

#[derive(Debug, Serialize)]
struct Icon<'a> {
    src: &'a str,
    sizes: &'a str,
    #[serde(rename = "type")]
    mime: &'static str,
    purpose: &'a str,
}

impl<'a> WebManifest<'a> {
    fn from_config(config: &'a SiteConfig) -> Self {
        let base = &config.base;
        let manifest = &config.build.manifest;
        Self {
            name: &base.title,
            short_name: base.short_name(),
            description: &base.description,
            start_url: "/",
            display: "standalone",
            background_color: &manifest.background_color,
            theme_color: &manifest.theme_color,
            icons: vec![Icon {
                src: &base.logo,
                sizes: "any",
                mime: image_mime(&base.logo),
                purpose: "any",
            }],
        }
    }
}

/// Write the manifest if enabled in config.
pub fn build_manifest(config: &SiteConfig) -> Result<()> {
    if !config.build.manifest.enable {
        return Ok(());
    }
    let json = serde_json::to_string_pretty(&WebManifest::from_config(config))?;
    let path = config.build.output.join(MANIFEST_FILE);
    fs::write(&path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;

    log!("manifest"; "{MANIFEST_FILE}");
    Ok(())
}

fn image_mime(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => "image/png",
    }
}
