//! Plain-text output of the `validate` and `episodes` commands.

use crate::{
    data::{
        Episode,
        validate::{Issue, Summary},
    },
    listing::{ListingView, TagCatalog},
};
use std::fmt::Write;

/// Issue list, or the archive summary when there are none.
pub fn validation_report(issues: &[Issue], summary: &Summary) -> String {
    let mut out = String::new();
    if issues.is_empty() {
        let _ = writeln!(out, "All {} episodes are valid", summary.count);
        let _ = writeln!(out, "  highest id: {}", summary.highest_id);
        let _ = writeln!(out, "  next id:    {}", summary.next_id);
        if let Some((oldest, newest)) = &summary.date_range {
            let _ = writeln!(out, "  dates:      {oldest} to {newest}");
        }
    } else {
        let _ = writeln!(out, "Found {} issue(s):", issues.len());
        for issue in issues {
            let _ = writeln!(out, "  {issue}");
        }
    }
    out
}

/// One line per visible episode, then the result count.
pub fn episode_table(view: &ListingView<'_>) -> String {
    let mut out = String::new();
    let unknown = view.state.tag.as_deref().filter(|tag| view.catalog.count(tag) == 0);
    if let Some(tag) = unknown {
        let _ = writeln!(out, "No episode is tagged \"{tag}\"");
    }
    let id_width = view
        .visible
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);
    for episode in &view.visible {
        let _ = writeln!(out, "{}", episode_line(episode, id_width));
    }
    if view.visible.len() == view.total {
        let _ = writeln!(out, "{} episodes", view.total);
    } else {
        let _ = writeln!(out, "{} of {} episodes", view.visible.len(), view.total);
    }
    out
}

fn episode_line(episode: &Episode, id_width: usize) -> String {
    format!(
        "{:>id_width$}  {}  {:>7}  {}",
        episode.id, episode.date, episode.duration, episode.title
    )
}

/// `count  tag`, alphabetical.
pub fn tag_table(catalog: &TagCatalog) -> String {
    let mut out = String::new();
    for (tag, count) in catalog.iter() {
        let _ = writeln!(out, "{count:>4}  {tag}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SiteData;
    use crate::data::tests::{episode, shipped};
    use crate::data::validate::validate_episodes;
    use crate::listing::FilterState;

    #[test]
    fn test_validation_report_clean() {
        let data = shipped();
        let report = validation_report(&[], &Summary::of(&data.episodes));
        assert!(report.starts_with("All 24 episodes are valid\n"));
        assert!(report.contains("next id:    25"));
        assert!(report.contains("2024-07-01 to 2026-01-09"));
    }

    #[test]
    fn test_validation_report_issues() {
        let episodes = vec![episode(1, "2025-01-01", &[]), episode(1, "2025-02-01", &["AI"])];
        let issues = validate_episodes(&episodes);
        let report = validation_report(&issues, &Summary::of(&episodes));
        assert!(report.starts_with(&format!("Found {} issue(s):", issues.len())));
        assert!(report.contains("Episode 1 [id]: Duplicate episode ID: 1"));
        assert!(report.contains("Episode 1 [tags]: Missing tags"));
    }

    #[test]
    fn test_episode_table() {
        let data = SiteData {
            episodes: vec![
                episode(9, "2025-01-01", &["AI"]),
                episode(10, "2025-02-01", &["Cloud"]),
            ],
            ..Default::default()
        };

        let all = ListingView::derive(&data, FilterState::default());
        assert_eq!(
            episode_table(&all),
            "10  2025-02-01   45 min  Episode 10\n 9  2025-01-01   45 min  Episode 9\n2 episodes\n"
        );

        let filtered = ListingView::derive(&data, FilterState::new(Some("AI"), ""));
        assert_eq!(
            episode_table(&filtered),
            "9  2025-01-01   45 min  Episode 9\n1 of 2 episodes\n"
        );

        let unknown = ListingView::derive(&data, FilterState::new(Some("ai"), ""));
        assert_eq!(episode_table(&unknown), "No episode is tagged \"ai\"\n0 of 2 episodes\n");
    }

    #[test]
    fn test_tag_table() {
        let data = SiteData {
            episodes: vec![
                episode(1, "2025-01-01", &["AI", "Cloud"]),
                episode(2, "2025-02-01", &["AI"]),
            ],
            ..Default::default()
        };
        let catalog = TagCatalog::from_episodes(&data.episodes);
        assert_eq!(tag_table(&catalog), "   2  AI\n   1  Cloud\n");
    }
}
