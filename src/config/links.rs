//! `[publisher]` and `[links]` sections.
//!
//! External identities referenced by structured data, the footer and
//! the homepage call-to-action buttons.

use serde::{Deserialize, Serialize};

/// `[publisher]` section - organization behind the show.
///
/// # Example
/// ```toml
/// [publisher]
/// name = "Omnistrate"
/// url = "https://www.omnistrate.com"
/// same_as = ["https://www.youtube.com/@omnistrate"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    /// Organization name. Empty means the show publishes itself.
    #[serde(default)]
    pub name: String,

    /// Organization homepage.
    #[serde(default)]
    pub url: String,

    /// Social profiles for the Organization `sameAs` list.
    #[serde(default)]
    pub same_as: Vec<String>,
}

/// `[links]` section - external channels shown in navigation and footer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinksConfig {
    /// Video channel.
    #[serde(default)]
    pub youtube: Option<String>,

    /// Company page.
    #[serde(default)]
    pub linkedin: Option<String>,

    /// Playlist holding every episode.
    #[serde(default)]
    pub playlist: Option<String>,

    /// Source repository of the site.
    #[serde(default)]
    pub github: Option<String>,
}

impl LinksConfig {
    /// Configured links as `(label, url)` pairs in footer order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("YouTube", self.youtube.as_deref()),
            ("LinkedIn", self.linkedin.as_deref()),
            ("Playlist", self.playlist.as_deref()),
            ("GitHub", self.github.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.map(|url| (label, url)))
    }
}
