//! Tag and free-text filtering over the whole in-memory archive.

use crate::data::Episode;
use serde::Serialize;
use std::collections::BTreeMap;

/// Keep episodes carrying `tag` (exact, case-sensitive) and matching
/// `query`. Both filters are ANDed and input order is preserved.
///
/// `None` and `""` disable their filter.
pub fn filter_episodes<'a, I>(episodes: I, tag: Option<&str>, query: &str) -> Vec<&'a Episode>
where
    I: IntoIterator<Item = &'a Episode>,
{
    let needle = query.to_lowercase();
    episodes
        .into_iter()
        .filter(|episode| tag.is_none_or(|tag| matches_tag(episode, tag)))
        .filter(|episode| needle.is_empty() || matches_query(episode, &needle))
        .collect()
}

fn matches_tag(episode: &Episode, tag: &str) -> bool {
    episode.has_tag(tag)
}

/// Substring match of an already-lowercased `needle` against the title,
/// description, tags and guest names.
fn matches_query(episode: &Episode, needle: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(needle);
    hit(&episode.title)
        || hit(&episode.description)
        || episode.tags.iter().any(|t| hit(t))
        || episode.guests.iter().any(|g| hit(&g.name))
}

/// Every tag in use, sorted, with the number of episodes carrying it.
///
/// Built from the full archive, so counts do not change with the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagCatalog(BTreeMap<String, usize>);

impl TagCatalog {
    pub fn from_episodes<'a>(episodes: impl IntoIterator<Item = &'a Episode>) -> Self {
        let mut counts = BTreeMap::new();
        for episode in episodes {
            for tag in &episode.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        Self(counts)
    }

    /// `(tag, count)` in lexicographic tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    pub fn count(&self, tag: &str) -> usize {
        self.0.get(tag).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
