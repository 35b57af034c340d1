//! Site initialization module.
//!
//! Creates a new site with a sample episode, host, post and legal page.

use crate::{
    config::SiteConfig,
    data::{BLOG_DIR, EPISODES_FILE, HOSTS_FILE, PAGES_DIR},
    log,
};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

const SAMPLE_EPISODES: &str = r#"# Episode archive, newest first.

[[episodes]]
id = 1
title = "Pilot Episode"
description = "Meet the hosts and hear what the show is about."
date = "2025-01-15"
video_url = "https://www.youtube.com/watch?v=REPLACE_ME"
duration = "30 min"
tags = ["Announcement"]

[[episodes.timestamps]]
time = "00:00"
title = "Introduction"
"#;

const SAMPLE_HOSTS: &str = r#"# Recurring hosts. Blog post authors resolve against `name`.

[[hosts]]
name = "Your Name"
role = "Host"
linkedin = "https://www.linkedin.com/in/your-profile/"
bio = "Tell listeners who you are."
"#;

const SAMPLE_POST: &str = r#"---
title: "Hello World"
author: "Your Name"
date: "2025-01-15"
readTime: "1 min"
tags: ["Announcement"]
excerpt: "The first post on the blog."
---

# Hello World

Write posts in markdown. Front matter sets the title, author and date.
"#;

const SAMPLE_PRIVACY: &str = r#"---
title: "Privacy Policy"
description: "How this site handles your information."
updated: "2025-01-15"
---

## Information We Collect

Describe what data the site collects, if any.
"#;

/// Create a new site under the configured root.
///
/// The target directory must be missing or empty.
pub fn new_site(config: &SiteConfig) -> Result<()> {
    let root = config.get_root();

    if !is_dir_empty(root)? {
        bail!(
            "`{}` is not empty. Use `episodic init <SITE_NAME>` to create in a subdirectory.",
            root.display()
        );
    }

    init_site_structure(config)?;
    init_default_config(config)?;
    init_ignored_files(root, &[Path::new("/public/")])?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write the config with placeholder show metadata.
fn init_default_config(config: &SiteConfig) -> Result<()> {
    let mut sample = SiteConfig::default();
    sample.base.title = "My Show".into();
    sample.base.description = "A webcast about building software.".into();
    sample.base.url = Some("https://example.com".into());
    sample.base.author = "My Show".into();

    let content = toml::to_string_pretty(&sample)?;
    fs::write(&config.config_path, content)
        .with_context(|| format!("Failed to write {}", config.config_path.display()))?;
    Ok(())
}

/// Create content and assets directories with sample data.
fn init_site_structure(config: &SiteConfig) -> Result<()> {
    let content = &config.build.content;
    let files = [
        (content.join(EPISODES_FILE), SAMPLE_EPISODES),
        (content.join(HOSTS_FILE), SAMPLE_HOSTS),
        (content.join(BLOG_DIR).join("hello-world.md"), SAMPLE_POST),
        (content.join(PAGES_DIR).join("privacy.md"), SAMPLE_PRIVACY),
    ];

    for (path, body) in files {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    fs::create_dir_all(&config.build.assets)
        .with_context(|| format!("Failed to create {}", config.build.assets.display()))?;
    Ok(())
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SiteData, validate::validate_episodes};

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("episodic.toml");
        config.build.content = root.join("content");
        config.build.assets = root.join("assets");
        config.build.output = root.join("public");
        config
    }

    #[test]
    fn test_new_site_scaffold_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("show");
        let config = config_at(&root);

        new_site(&config).unwrap();

        let loaded = SiteConfig::from_path(&root.join("episodic.toml")).unwrap();
        assert_eq!(loaded.base.title, "My Show");
        assert_eq!(loaded.base.url.as_deref(), Some("https://example.com"));

        let data = SiteData::load(&root.join("content")).unwrap();
        assert_eq!(data.episodes.len(), 1);
        assert!(validate_episodes(&data.episodes).is_empty());
        assert_eq!(data.posts[0].author, data.hosts[0].name);
        assert_eq!(data.pages[0].slug, "privacy");
        assert!(root.join("assets").is_dir());
        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "/public/");
    }

    #[test]
    fn test_new_site_refuses_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
        let config = config_at(dir.path());

        let err = new_site(&config).unwrap_err();
        assert!(err.to_string().contains("is not empty"));
        assert!(!dir.path().join("content").exists());
    }
}
