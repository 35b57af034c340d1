//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── SiteData::load() ──► validate_episodes() (warnings only)
//!     │
//!     ├── prepare_output()
//!     │
//!     ├── rayon::join
//!     │       ├── render every Route ──► HTML files
//!     │       └── copy assets/       ──► output/
//!     │
//!     ├── write_embedded()  site.css, site.js
//!     │
//!     └── build_feeds()     feed.xml, sitemap.xml, manifest, robots.txt
//! ```

use crate::{
    config::SiteConfig,
    data::{SiteData, validate::validate_episodes},
    generator::build_feeds,
    log,
    logger::ProgressBars,
    render::{Route, Site},
    utils::minify::minify_path,
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Stylesheet and script shipped with every site.
const EMBEDDED: &[(&str, &str)] = &[
    ("site.css", include_str!("embed/site.css")),
    ("site.js", include_str!("embed/site.js")),
];

/// Build the entire site, rendering pages and copying assets in parallel.
///
/// Returns the loaded dataset so the preview server can keep serving from it.
/// If `config.build.clean` is true, clears the entire output directory first.
pub fn build_site(config: &SiteConfig) -> Result<SiteData> {
    let data = load_data(config)?;
    let output = &config.build.output;

    prepare_output(output, config.build.clean)?;

    let site = Site::new(config, &data);
    let routes = site.routes();
    let asset_files = collect_files(&config.build.assets);

    let progress = ProgressBars::new_filtered(&[
        ("pages", routes.len()),
        ("assets", asset_files.len()),
    ]);
    let inc = |index: usize| {
        if let Some(progress) = &progress {
            progress.inc(index);
        }
    };

    let has_error = AtomicBool::new(false);
    let clean = config.build.clean;

    let (pages_result, assets_result) = rayon::join(
        || {
            routes.par_iter().try_for_each(|route| {
                if has_error.load(Ordering::Relaxed) {
                    return Err(anyhow!("Aborted"));
                }
                if let Err(e) = write_route(&site, route) {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        log!("error"; "{}: {:#}", route.url_path(), e);
                    }
                    return Err(anyhow!("Build failed"));
                }
                inc(0);
                Ok(())
            })
        },
        || {
            asset_files.par_iter().try_for_each(|path| {
                if has_error.load(Ordering::Relaxed) {
                    return Err(anyhow!("Aborted"));
                }
                if let Err(e) = copy_asset(path, config, clean) {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        log!("error"; "{}: {:#}", path.display(), e);
                    }
                    return Err(anyhow!("Build failed"));
                }
                inc(1);
                Ok(())
            })
        },
    );

    if let Some(progress) = &progress {
        progress.finish();
    }
    pages_result?;
    assets_result?;

    write_embedded(output)?;
    build_feeds(config, &data)?;

    log!("build"; "{} pages, {} assets", routes.len(), asset_files.len());
    Ok(data)
}

/// Load the dataset and report archive issues without failing.
pub fn load_data(config: &SiteConfig) -> Result<SiteData> {
    let content = &config.build.content;
    let data = SiteData::load(content)
        .with_context(|| format!("Failed to load site data from {}", content.display()))?;

    for issue in validate_episodes(&data.episodes) {
        log!("warn"; "{issue}");
    }
    Ok(data)
}

/// Create the output directory, removing it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

fn write_route(site: &Site<'_>, route: &Route) -> Result<()> {
    let Some(html) = site.render(route) else {
        return Err(anyhow!("no record for {}", route.url_path()));
    };
    let path = route.output_path(&site.config.build.output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = minify_path(&path, html.as_bytes(), site.config.build.minify);
    fs::write(&path, &*bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_embedded(output: &Path) -> Result<()> {
    for (name, content) in EMBEDDED {
        let path = output.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

// ============================================================================
// Assets
// ============================================================================

/// Collect all files from a directory recursively. Missing directories yield
/// nothing.
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Copy changed asset files, returning how many were written.
pub fn copy_assets(paths: &[PathBuf], config: &SiteConfig) -> Result<usize> {
    let mut copied = 0;
    for path in paths {
        if copy_asset(path, config, false)? {
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy one file from the assets directory to the same relative path in
/// the output. Returns false when the copy was already current.
fn copy_asset(path: &Path, config: &SiteConfig, clean: bool) -> Result<bool> {
    let relative = path.strip_prefix(&config.build.assets)?;
    let dest = config.build.output.join(relative);

    if !clean && is_up_to_date(path, &dest) {
        return Ok(false);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(path, &dest).with_context(|| format!("Failed to copy {}", relative.display()))?;
    Ok(true)
}

/// Destination exists and is not older than the source.
fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let modified = |path: &Path| path.metadata().and_then(|m| m.modified()).ok();
    match (modified(src), modified(dst)) {
        (Some(src_time), Some(dst_time)) => src_time <= dst_time,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::shipped_config;

    /// Shipped site config with its output redirected into `dir`.
    fn config_in(dir: &Path) -> SiteConfig {
        let mut config = shipped_config();
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("site");
        config.build.content = root.join("content");
        config.build.assets = root.join("assets");
        config.build.output = dir.join("public");
        config.build.rss.path = config.build.output.join("feed.xml");
        config.build.sitemap.path = config.build.output.join("sitemap.xml");
        config
    }

    #[test]
    fn test_build_shipped_site() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let data = build_site(&config).unwrap();
        let out = &config.build.output;

        assert_eq!(data.episodes.len(), 24);
        for file in [
            "index.html",
            "episodes/index.html",
            "episodes/1/index.html",
            "episodes/24/index.html",
            "blog/index.html",
            "blog/welcome-to-agentic-saas-talks-blog/index.html",
            "hosts/index.html",
            "privacy/index.html",
            "terms/index.html",
            "404.html",
            "feed.xml",
            "sitemap.xml",
            "manifest.webmanifest",
            "robots.txt",
            "site.css",
            "site.js",
            "logo.png",
        ] {
            assert!(out.join(file).is_file(), "missing {file}");
        }

        let home = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains("Agentic SaaS Talks"));
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        let stale = config.build.output.join("stale.html");
        fs::create_dir_all(&config.build.output).unwrap();
        fs::write(&stale, "old").unwrap();

        build_site(&config).unwrap();
        assert!(stale.exists());

        config.build.clean = true;
        build_site(&config).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn test_missing_content_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.build.content = dir.path().join("nope");
        assert!(build_site(&config).is_err());
    }

    #[test]
    fn test_collect_files_skips_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/a.png"), "a").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files, vec![dir.path().join("img/a.png")]);
        assert!(collect_files(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_copy_assets_skips_current() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.build.assets = dir.path().join("assets");
        config.build.output = dir.path().join("public");
        fs::create_dir_all(config.build.assets.join("img")).unwrap();
        let logo = config.build.assets.join("img/logo.png");
        fs::write(&logo, "png").unwrap();

        assert_eq!(copy_assets(&[logo.clone()], &config).unwrap(), 1);
        assert!(config.build.output.join("img/logo.png").is_file());
        assert_eq!(copy_assets(&[logo], &config).unwrap(), 0);
    }

    #[test]
    fn test_is_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, "x").unwrap();
        assert!(!is_up_to_date(&src, &dst));
        fs::copy(&src, &dst).unwrap();
        assert!(is_up_to_date(&src, &dst));
    }
}
