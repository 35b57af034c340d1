//! The static dataset and its lookups.
//!
//! ```text
//! content/
//! ├── episodes.toml   [[episodes]]
//! ├── hosts.toml      [[hosts]]
//! ├── blog/*.md       front matter + markdown
//! └── pages/*.md      privacy, terms, ...
//! ```
//!
//! [`SiteData`] is loaded once per build and handed by reference to every
//! page renderer and generator.

pub mod blog;
pub mod store;
pub mod types;
pub mod validate;

pub use types::{BlogPost, Episode, Host, StaticPage};

use std::{
    cmp::Reverse,
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use types::{EpisodesFile, HostsFile};

pub const EPISODES_FILE: &str = "episodes.toml";
pub const HOSTS_FILE: &str = "hosts.toml";
pub const BLOG_DIR: &str = "blog";
pub const PAGES_DIR: &str = "pages";

/// Top-level sections a static page may not shadow.
pub const RESERVED_SLUGS: &[&str] = &["episodes", "blog", "hosts"];

/// Errors raised while loading the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid data in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("invalid front matter in `{0}`")]
    FrontMatter(PathBuf, #[source] serde_yaml::Error),

    #[error("episode id {0} is used more than once")]
    DuplicateEpisode(u32),

    #[error("page `{0}` would overwrite the built-in /{0}/ section")]
    ReservedSlug(String),
}

/// Everything the site is generated from.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    /// In file order.
    pub episodes: Vec<Episode>,
    pub hosts: Vec<Host>,
    /// Newest first.
    pub posts: Vec<BlogPost>,
    pub pages: Vec<StaticPage>,
}

impl SiteData {
    /// Load the dataset under `content_dir`.
    ///
    /// `episodes.toml` is required. Hosts, blog and pages are optional.
    pub fn load(content_dir: &Path) -> Result<Self, DataError> {
        let data = Self {
            episodes: load_episodes(&content_dir.join(EPISODES_FILE))?,
            hosts: load_hosts(&content_dir.join(HOSTS_FILE))?,
            posts: blog::load_posts(&content_dir.join(BLOG_DIR))?,
            pages: blog::load_pages(&content_dir.join(PAGES_DIR))?,
        };
        data.check_unique()?;
        Ok(data)
    }

    /// Every output path is claimed once: episode ids are unique and no
    /// static page takes a section's URL.
    fn check_unique(&self) -> Result<(), DataError> {
        let mut ids = HashSet::new();
        if let Some(episode) = self.episodes.iter().find(|e| !ids.insert(e.id)) {
            return Err(DataError::DuplicateEpisode(episode.id));
        }
        if let Some(page) = self
            .pages
            .iter()
            .find(|p| RESERVED_SLUGS.contains(&p.slug.as_str()))
        {
            return Err(DataError::ReservedSlug(page.slug.clone()));
        }
        Ok(())
    }

    pub fn episode_by_id(&self, id: u32) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.id == id)
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<&StaticPage> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Host whose name equals `name` exactly.
    pub fn author_info(&self, name: &str) -> Option<&Host> {
        author_info(&self.hosts, name)
    }

    /// Episodes sorted by date, newest first.
    ///
    /// The sort is stable, so same-day episodes keep file order. Unparseable
    /// dates sort last.
    pub fn episodes_newest_first(&self) -> Vec<&Episode> {
        let mut episodes: Vec<&Episode> = self.episodes.iter().collect();
        episodes.sort_by_key(|e| Reverse(e.parsed_date()));
        episodes
    }

    pub fn latest_episode(&self) -> Option<&Episode> {
        self.episodes_newest_first().into_iter().next()
    }
}

/// Linear, exact-name lookup. Absence is a normal result.
pub fn author_info<'a>(hosts: &'a [Host], name: &str) -> Option<&'a Host> {
    hosts.iter().find(|host| host.name == name)
}

/// Parse `episodes.toml` without checking ids, so `validate` can report them.
pub fn load_episodes(path: &Path) -> Result<Vec<Episode>, DataError> {
    let source = fs::read_to_string(path).map_err(|err| DataError::Io(path.to_path_buf(), err))?;
    let file: EpisodesFile =
        toml::from_str(&source).map_err(|err| DataError::Toml(path.to_path_buf(), err))?;
    Ok(file.episodes)
}

/// Parse `hosts.toml`. A missing file means no hosts.
pub fn load_hosts(path: &Path) -> Result<Vec<Host>, DataError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let source = fs::read_to_string(path).map_err(|err| DataError::Io(path.to_path_buf(), err))?;
    let file: HostsFile =
        toml::from_str(&source).map_err(|err| DataError::Toml(path.to_path_buf(), err))?;
    Ok(file.hosts)
}
