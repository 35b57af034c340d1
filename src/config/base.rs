//! `[base]` section configuration.
//!
//! Contains basic site information like title, author, description, etc.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in episodic.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Agentic SaaS Talks"
/// description = "A webcast about agentic software"
/// url = "https://agentic-saas-talks.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Show title, used as site name and title template suffix.
    pub title: String,

    /// Short name for the web manifest. Falls back to `title`.
    #[serde(default)]
    pub short_name: String,

    /// Site description for meta tags, feeds and structured data.
    pub description: String,

    /// Base URL for canonical links, feeds and sitemap.
    /// Required when rss or sitemap generation is enabled.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// Show name used as rss managing editor.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Contact email for the rss feed.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// BCP 47 language code (e.g., "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Copyright notice for footer and feed.
    #[serde(default)]
    pub copyright: String,

    /// Logo path relative to the site root (e.g., "/logo.png").
    #[serde(default = "defaults::base::logo")]
    #[educe(Default = defaults::base::logo())]
    pub logo: String,

    /// Site-wide `<meta name="keywords">` entries.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl BaseConfig {
    /// Manifest short name, falling back to the full title.
    pub fn short_name(&self) -> &str {
        if self.short_name.is_empty() {
            &self.title
        } else {
            &self.short_name
        }
    }
}
