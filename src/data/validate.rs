//! Consistency checks over the episode archive.
//!
//! `episodic validate` fails on any issue; `episodic build` only logs them.

use super::Episode;
use crate::listing::TAG_SEPARATOR;
use regex::Regex;
use std::{collections::HashSet, fmt, sync::LazyLock};

const YOUTUBE_WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));
static DURATION_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+ min$").expect("valid regex"));
static TIMESTAMP_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").expect("valid regex"));

/// One problem with one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub episode_id: u32,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {} [{}]: {}",
            self.episode_id, self.field, self.message
        )
    }
}

/// Figures printed when the archive is clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub highest_id: u32,
    pub next_id: u32,
    /// Oldest and newest date, taken from the ends of the array.
    pub date_range: Option<(String, String)>,
}

impl Summary {
    pub fn of(episodes: &[Episode]) -> Self {
        let highest_id = episodes.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            count: episodes.len(),
            highest_id,
            next_id: highest_id.saturating_add(1),
            date_range: episodes
                .first()
                .zip(episodes.last())
                .map(|(newest, oldest)| (oldest.date.clone(), newest.date.clone())),
        }
    }
}

/// Check every episode, in array order, then the newest-first ordering.
pub fn validate_episodes(episodes: &[Episode]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut ids = HashSet::new();
    let mut urls = HashSet::new();

    for episode in episodes {
        let mut report = |field: &'static str, message: String| {
            issues.push(Issue {
                episode_id: episode.id,
                field,
                message,
            })
        };

        if !ids.insert(episode.id) {
            report("id", format!("Duplicate episode ID: {}", episode.id));
        }
        if !urls.insert(episode.video_url.as_str()) {
            report("video_url", format!("Duplicate video URL: {}", episode.video_url));
        }

        for (field, value) in [
            ("title", &episode.title),
            ("description", &episode.description),
            ("date", &episode.date),
            ("video_url", &episode.video_url),
            ("duration", &episode.duration),
        ] {
            if value.trim().is_empty() {
                report(field, format!("Missing {field}"));
            }
        }
        if episode.tags.is_empty() {
            report("tags", "Missing tags".into());
        }
        for tag in episode.tags.iter().filter(|t| t.contains(TAG_SEPARATOR)) {
            report(
                "tags",
                format!("Tag \"{tag}\" contains the reserved character '{TAG_SEPARATOR}'"),
            );
        }

        if !episode.date.is_empty() && !DATE_FORMAT.is_match(&episode.date) {
            report(
                "date",
                format!("Invalid date format \"{}\" (expected YYYY-MM-DD)", episode.date),
            );
        }
        if !episode.video_url.is_empty() && !episode.video_url.starts_with(YOUTUBE_WATCH_PREFIX) {
            report(
                "video_url",
                format!("Invalid YouTube URL format: {}", episode.video_url),
            );
        }
        if !episode.duration.is_empty() && !DURATION_FORMAT.is_match(&episode.duration) {
            report(
                "duration",
                format!(
                    "Unexpected duration format \"{}\" (expected \"X min\")",
                    episode.duration
                ),
            );
        }

        for ts in &episode.timestamps {
            if ts.time.is_empty() || ts.title.trim().is_empty() {
                report(
                    "timestamps",
                    format!("Invalid timestamp entry: {} {:?}", ts.time, ts.title),
                );
            }
            if !ts.time.is_empty() && !TIMESTAMP_FORMAT.is_match(&ts.time) {
                report(
                    "timestamps",
                    format!(
                        "Invalid timestamp format \"{}\" (expected H:MM or H:MM:SS)",
                        ts.time
                    ),
                );
            }
        }

        for guest in &episode.guests {
            if guest.name.trim().is_empty() {
                report("guests", "Guest missing name".into());
            }
            if guest.linkedin.trim().is_empty() {
                report("guests", format!("Guest \"{}\" missing LinkedIn URL", guest.name));
            } else if !guest.linkedin.ends_with('/') {
                report(
                    "guests",
                    format!("Guest \"{}\" LinkedIn URL missing trailing slash", guest.name),
                );
            }
            if guest.bio.trim().is_empty() {
                report("guests", format!("Guest \"{}\" missing bio", guest.name));
            }
        }
    }

    for pair in episodes.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.date > previous.date {
            issues.push(Issue {
                episode_id: current.id,
                field: "date",
                message: format!(
                    "Episode {} ({}) is newer than previous episode {} ({}), list should be newest first",
                    current.id, current.date, previous.id, previous.date
                ),
            });
        }
    }

    issues
}
