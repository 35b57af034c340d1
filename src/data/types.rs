//! Records of the static dataset: episodes, hosts, blog posts and pages.
//!
//! Everything here is loaded once and never mutated. Text fields default to
//! empty so that incomplete records still load and `validate` can report
//! what is missing.

use crate::utils::{date::DateTimeUtc, video};
use serde::{Deserialize, Serialize};

/// One unit of the series, pointing at an externally hosted video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Episode {
    /// Unique, routes to `/episodes/<id>/`.
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub video_url: String,
    /// Free text such as `"57 min"`.
    #[serde(default)]
    pub duration: String,
    /// Display order is preserved; matching ignores it.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Chapter markers, in playback order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<Timestamp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guests: Vec<Guest>,
}

impl Episode {
    pub fn url_path(&self) -> String {
        format!("/episodes/{}/", self.id)
    }

    pub fn parsed_date(&self) -> Option<DateTimeUtc> {
        DateTimeUtc::parse(&self.date)
    }

    pub fn video_id(&self) -> String {
        video::youtube_video_id(&self.video_url)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Chapter marker: a `mm:ss` / `h:mm:ss` label and its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timestamp {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub title: String,
}

impl Timestamp {
    /// Deep link into `video_url` at this chapter.
    pub fn url(&self, video_url: &str) -> String {
        video::timestamp_url(video_url, &self.time)
    }
}

/// Guest appearing on a single episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Guest {
    #[serde(default)]
    pub name: String,
    /// Profile URL.
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Recurring host. Blog authors resolve against `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Host {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Blog post loaded from `blog/<slug>.md`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    /// Loose reference to [`Host::name`].
    pub author: String,
    pub date: String,
    pub read_time: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub featured_image: Option<String>,
    /// Markdown body, front matter removed.
    #[serde(skip)]
    pub content: String,
}

impl BlogPost {
    pub fn url_path(&self) -> String {
        format!("/blog/{}/", self.slug)
    }
}

/// Standalone markdown page (privacy policy, terms) at `/<slug>/`.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticPage {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// "Last updated" date shown on the page.
    pub updated: Option<String>,
    pub content: String,
}

impl StaticPage {
    pub fn url_path(&self) -> String {
        format!("/{}/", self.slug)
    }
}

/// Shape of `episodes.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct EpisodesFile {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Shape of `hosts.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct HostsFile {
    #[serde(default)]
    pub hosts: Vec<Host>,
}
