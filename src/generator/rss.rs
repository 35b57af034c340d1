//! RSS 2.0 feed of the episode archive.
//!
//! One item per episode, newest first, linking to the video itself.

use crate::{
    config::SiteConfig,
    data::{Episode, SiteData},
    log,
    utils::{
        date::DateTimeUtc,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use rss::{
    CategoryBuilder, ChannelBuilder, GuidBuilder, ImageBuilder, ItemBuilder, validation::Validate,
};
use std::{fs, sync::LazyLock};

// ============================================================================
// Public API
// ============================================================================

/// Build rss feed if enabled in config.
pub fn build_rss(config: &SiteConfig, data: &SiteData) -> Result<()> {
    if config.build.rss.enable {
        RssFeed::new(config, data).write()?;
    }
    Ok(())
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

struct RssFeed<'a> {
    config: &'a SiteConfig,
    episodes: Vec<&'a Episode>,
}

impl<'a> RssFeed<'a> {
    fn new(config: &'a SiteConfig, data: &'a SiteData) -> Self {
        Self {
            config,
            episodes: data.episodes_newest_first(),
        }
    }

    /// Generate and validate the rss xml string.
    fn into_xml(self) -> Result<String> {
        let config = self.config;
        let site_url = config.site_url();

        let items: Vec<_> = self.episodes.iter().map(|e| episode_to_item(e)).collect();

        // newest episode date, or now for an empty archive
        let last_build = self
            .episodes
            .first()
            .and_then(|e| e.parsed_date())
            .unwrap_or_else(DateTimeUtc::today)
            .to_rfc2822();

        let image = ImageBuilder::default()
            .url(config.absolute_url(&config.base.logo))
            .title(config.base.title.clone())
            .link(site_url.to_string())
            .build();

        let copyright = (!config.base.copyright.is_empty()).then(|| config.base.copyright.clone());

        let channel = ChannelBuilder::default()
            .title(config.base.title.clone())
            .link(site_url.to_string())
            .description(config.base.description.clone())
            .language(config.base.language.to_lowercase())
            .copyright(copyright)
            .managing_editor(managing_editor(config))
            .last_build_date(last_build)
            .image(image)
            .generator(format!("episodic {}", env!("CARGO_PKG_VERSION")))
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    fn write(self) -> Result<()> {
        let config = self.config;
        let xml = self.into_xml()?;
        let xml = minify(MinifyType::Xml(xml.as_bytes()), config.build.minify);
        let rss_path = &config.build.rss.path;

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(rss_path, &*xml)
            .with_context(|| format!("Failed to write rss feed to {}", rss_path.display()))?;

        log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// One item per episode. Link and permalink guid are the video URL.
///
/// An unparseable date leaves `pubDate` out instead of dropping the item.
fn episode_to_item(episode: &Episode) -> rss::Item {
    let categories = episode
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(episode.title.clone())
        .link(episode.video_url.clone())
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(episode.video_url.clone())
                .build(),
        )
        .description(episode.description.clone())
        .pub_date(episode.parsed_date().map(DateTimeUtc::to_rfc2822))
        .categories(categories)
        .build()
}

/// Managing editor in rss format: `"email@example.com (Name)"`.
///
/// `[base] author` is used as-is when already in that form, otherwise it is
/// combined with `[base] email`.
fn managing_editor(config: &SiteConfig) -> String {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$")
            .expect("valid regex")
    });

    let author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(author) {
        author.clone()
    } else {
        format!("{} ({})", config.base.email, author)
    }
}
