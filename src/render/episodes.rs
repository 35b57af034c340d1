//! Episode listing and detail pages.

use super::Site;
use super::layout::{Section, breadcrumbs, document, tag_links};
use crate::config::SiteConfig;
use crate::data::Episode;
use crate::listing::{FilterAction, LISTING_PATH, ListingView, TAG_SEPARATOR};
use crate::seo::{OgType, PageHead, schema};
use crate::utils::{date::format_date, html::escape, video};
use std::collections::HashSet;
use std::fmt::Write;

// ============================================================================
// Listing
// ============================================================================

pub(super) fn listing(site: &Site<'_>, view: &ListingView<'_>) -> String {
    let config = site.config;
    let state = &view.state;
    let mut body = String::with_capacity(32 * 1024);

    let (crumbs_html, crumbs_json) =
        breadcrumbs(config, &[("Home", "/"), ("Episodes", LISTING_PATH)]);
    body.push_str(&crumbs_html);

    let _ = write!(
        body,
        r#"<section class="page-intro"><h1>All Episodes</h1><p>Browse {} conversations on AI, agentic architectures and SaaS.</p></section>"#,
        view.total
    );

    body.push_str(r#"<section class="listing" data-listing>"#);
    search_form(&mut body, view);
    tag_panel(&mut body, view);

    let _ = write!(
        body,
        r#"<p class="result-count" data-result-count aria-live="polite">{}</p>"#,
        result_count(view.visible.len(), view.total)
    );

    let ordered = site.data.episodes_newest_first();
    let visible: HashSet<u32> = view.visible.iter().map(|e| e.id).collect();
    body.push_str(r#"<ol class="episode-grid" data-episode-list>"#);
    for episode in &ordered {
        body.push_str(&card(episode, !visible.contains(&episode.id)));
    }
    body.push_str("</ol>");

    let hidden = if view.is_empty() { "" } else { " hidden" };
    let _ = write!(
        body,
        r#"<div class="no-results" data-no-results{hidden}><h2>No episodes found</h2><p>Try a different search term or topic.</p><a class="button" href="{}" data-reset>Clear filters</a></div>"#,
        escape(&view.href_for(FilterAction::Reset))
    );
    body.push_str("</section>");

    let newest = ordered.first();
    let oldest = ordered.last();
    let url = config.absolute_url(LISTING_PATH);
    let description = format!(
        "Browse all {} episodes of {}. Filter by topic or search by title, guest and keyword.",
        view.total, config.base.title
    );
    let page = schema::WebPageInfo {
        title: "All Episodes",
        description: &description,
        url: &url,
        date_published: oldest.map(|e| e.date.as_str()),
        date_modified: newest.map(|e| e.date.as_str()),
    };

    let mut head = PageHead::new("Episodes", LISTING_PATH)
        .description(description.clone())
        .json_ld(crumbs_json)
        .json_ld(schema::episode_list(config, &view.visible))
        .json_ld(schema::web_page(config, &page));
    if state.is_active() {
        head = head.noindex();
    }
    document(site, &head, Section::Episodes, &body)
}

fn search_form(body: &mut String, view: &ListingView<'_>) {
    let state = &view.state;
    let _ = write!(
        body,
        r#"<form class="search" action="{LISTING_PATH}" method="get" role="search" data-search-form><input type="hidden" name="tag" value="{}" data-tag-input><label for="episode-search" class="visually-hidden">Search episodes</label><input id="episode-search" type="search" name="q" value="{}" placeholder="Search episodes, guests, topics..." autocomplete="off" data-search-input><button type="submit">Search</button>"#,
        escape(state.tag.as_deref().unwrap_or_default()),
        escape(&state.query)
    );
    if !state.query.is_empty() {
        let _ = write!(
            body,
            r#"<a class="clear-search" href="{}" data-clear-search>Clear search</a>"#,
            escape(&view.href_for(FilterAction::Search(String::new())))
        );
    }
    body.push_str("</form>");
}

fn tag_panel(body: &mut String, view: &ListingView<'_>) {
    let state = &view.state;
    let _ = write!(
        body,
        r#"<button class="filter-toggle" type="button" aria-controls="tag-panel" aria-expanded="{}" data-panel-toggle>Filter by topic</button>"#,
        view.ui.panel_expanded
    );
    let hidden = if view.ui.panel_expanded { "" } else { " hidden" };
    let _ = write!(body, r#"<div id="tag-panel" class="tag-panel" data-tag-panel{hidden}>"#);

    let all_pressed = state.tag.is_none();
    let _ = write!(
        body,
        r#"<a class="tag-filter" href="{}" data-tag="" aria-pressed="{all_pressed}">All Episodes <span class="count">{}</span></a>"#,
        escape(&view.href_for(FilterAction::SelectTag(None))),
        view.total
    );
    for (tag, count) in view.catalog.iter() {
        let pressed = state.tag.as_deref() == Some(tag);
        let _ = write!(
            body,
            r#"<a class="tag-filter" href="{}" data-tag="{}" aria-pressed="{pressed}">{} <span class="count">{count}</span></a>"#,
            escape(&view.href_for(FilterAction::SelectTag(Some(tag.to_string())))),
            escape(tag),
            escape(tag)
        );
    }
    body.push_str("</div>");
}

fn result_count(visible: usize, total: usize) -> String {
    if visible == total {
        format!("Showing all {total} episodes")
    } else {
        format!("Showing {visible} of {total} episodes")
    }
}

/// Lowercased haystack the client script searches. Covers the same fields
/// as the server-side query match.
fn search_text(episode: &Episode) -> String {
    std::iter::once(episode.title.as_str())
        .chain(std::iter::once(episode.description.as_str()))
        .chain(episode.tags.iter().map(String::as_str))
        .chain(episode.guests.iter().map(|g| g.name.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

/// Episode card shared by the listing and the homepage.
pub(super) fn card(episode: &Episode, hidden: bool) -> String {
    let tags: Vec<&str> = episode.tags.iter().map(String::as_str).collect();
    let mut out = String::with_capacity(1024);
    let _ = write!(
        out,
        r#"<li class="episode-card" data-episode="{}" data-tags="{}" data-search="{}"{}>"#,
        episode.id,
        escape(&tags.join(&TAG_SEPARATOR.to_string())),
        escape(&search_text(episode)),
        if hidden { " hidden" } else { "" }
    );
    if let Some(thumbnail) = video::thumbnail_url(&episode.video_url, "hqdefault") {
        let _ = write!(
            out,
            r#"<a class="thumbnail" href="{}"><img src="{}" alt="" loading="lazy" width="480" height="360"></a>"#,
            escape(&episode.url_path()),
            escape(&thumbnail)
        );
    }
    let _ = write!(
        out,
        r#"<p class="meta"><time datetime="{}">{}</time> &middot; {}</p><h3><a href="{}">{}</a></h3><p>{}</p>"#,
        escape(&episode.date),
        escape(&format_date(&episode.date)),
        escape(&episode.duration),
        escape(&episode.url_path()),
        escape(&episode.title),
        escape(&episode.description)
    );
    out.push_str(&tag_links(&episode.tags));
    let _ = write!(
        out,
        r#"<a class="watch" href="{}" target="_blank" rel="noopener noreferrer">Watch on YouTube</a></li>"#,
        escape(&episode.video_url)
    );
    out
}

// ============================================================================
// Detail
// ============================================================================

/// Outbound share URLs of one episode page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    /// Absolute URL of the episode page, also what the copy button copies.
    pub page: String,
    pub twitter: String,
    pub linkedin: String,
}

impl ShareLinks {
    pub fn new(config: &SiteConfig, episode: &Episode) -> Self {
        let page = config.absolute_url(&episode.url_path());
        let text = format!(
            "Check out \"{}\" from {}!",
            episode.title, config.base.title
        );
        let page_encoded = urlencoding::encode(&page);
        Self {
            twitter: format!(
                "https://twitter.com/intent/tweet?text={}&url={page_encoded}",
                urlencoding::encode(&text)
            ),
            linkedin: format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={page_encoded}"
            ),
            page,
        }
    }
}

pub(super) fn detail(site: &Site<'_>, episode: &Episode) -> String {
    let config = site.config;
    let path = episode.url_path();
    let mut body = String::with_capacity(16 * 1024);

    let (crumbs_html, crumbs_json) = breadcrumbs(
        config,
        &[("Home", "/"), ("Episodes", LISTING_PATH), (&episode.title, &path)],
    );
    body.push_str(&crumbs_html);

    let _ = write!(
        body,
        r#"<article class="episode"><header><p class="meta">Episode {} &middot; <time datetime="{}">{}</time> &middot; {}</p><h1>{}</h1></header>"#,
        episode.id,
        escape(&episode.date),
        escape(&format_date(&episode.date)),
        escape(&episode.duration),
        escape(&episode.title)
    );

    match video::embed_url(&episode.video_url) {
        Some(embed) => {
            let _ = write!(
                body,
                r#"<div class="video"><iframe src="{}" title="{}" loading="lazy" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div>"#,
                escape(&embed),
                escape(&episode.title)
            );
        }
        None => {
            let _ = write!(
                body,
                r#"<p><a class="button" href="{}" target="_blank" rel="noopener noreferrer">Watch the episode</a></p>"#,
                escape(&episode.video_url)
            );
        }
    }

    let _ = write!(body, r#"<p class="description">{}</p>"#, escape(&episode.description));
    body.push_str(&tag_links(&episode.tags));
    chapters(&mut body, episode);
    guests(&mut body, episode);
    share(&mut body, &ShareLinks::new(config, episode), &episode.video_url);
    body.push_str("</article>");
    neighbours(&mut body, site, episode);

    let mut video_object = schema::video_object(config, episode);
    let clips = schema::video_clips(episode);
    if !clips.is_empty() {
        video_object["hasPart"] = serde_json::Value::Array(clips);
    }

    let mut head = PageHead::new(episode.title.clone(), path)
        .description(episode.description.clone())
        .og_type(OgType::Video)
        .keywords(&episode.tags)
        .published(episode.date.clone())
        .json_ld(video_object)
        .json_ld(crumbs_json);
    if let Some(thumbnail) = video::thumbnail_url(&episode.video_url, "maxresdefault") {
        head = head.image(thumbnail);
    }
    document(site, &head, Section::Episodes, &body)
}

fn chapters(body: &mut String, episode: &Episode) {
    if episode.timestamps.is_empty() {
        return;
    }
    body.push_str(r#"<section class="chapters"><h2>Chapters</h2><ol>"#);
    for ts in &episode.timestamps {
        let _ = write!(
            body,
            r#"<li><a href="{}" target="_blank" rel="noopener noreferrer"><span class="time">{}</span> {}</a></li>"#,
            escape(&ts.url(&episode.video_url)),
            escape(&ts.time),
            escape(&ts.title)
        );
    }
    body.push_str("</ol></section>");
}

fn guests(body: &mut String, episode: &Episode) {
    if episode.guests.is_empty() {
        return;
    }
    let heading = if episode.guests.len() == 1 { "Guest" } else { "Guests" };
    let _ = write!(body, r#"<section class="guests"><h2>{heading}</h2><ul>"#);
    for guest in &episode.guests {
        body.push_str(r#"<li class="person">"#);
        if let Some(photo) = &guest.photo {
            let _ = write!(
                body,
                r#"<img src="{}" alt="{}" loading="lazy" width="96" height="96">"#,
                escape(photo),
                escape(&guest.name)
            );
        }
        if guest.linkedin.is_empty() {
            let _ = write!(body, "<h3>{}</h3>", escape(&guest.name));
        } else {
            let _ = write!(
                body,
                r#"<h3><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></h3>"#,
                escape(&guest.linkedin),
                escape(&guest.name)
            );
        }
        let _ = write!(body, "<p>{}</p></li>", escape(&guest.bio));
    }
    body.push_str("</ul></section>");
}

fn share(body: &mut String, links: &ShareLinks, video_url: &str) {
    let _ = write!(
        body,
        r#"<section class="share"><h2>Share this episode</h2><a class="button" href="{}" target="_blank" rel="noopener noreferrer">Watch on YouTube</a><a href="{}" target="_blank" rel="noopener noreferrer" aria-label="Share on X">Share on X</a><a href="{}" target="_blank" rel="noopener noreferrer" aria-label="Share on LinkedIn">Share on LinkedIn</a><button type="button" data-copy-link="{}">Copy link</button></section>"#,
        escape(video_url),
        escape(&links.twitter),
        escape(&links.linkedin),
        escape(&links.page)
    );
}

/// Links to the next newer and next older episode.
fn neighbours(body: &mut String, site: &Site<'_>, episode: &Episode) {
    let ordered = site.data.episodes_newest_first();
    let Some(index) = ordered.iter().position(|e| e.id == episode.id) else {
        return;
    };
    let newer = index.checked_sub(1).and_then(|i| ordered.get(i));
    let older = ordered.get(index + 1);
    if newer.is_none() && older.is_none() {
        return;
    }

    body.push_str(r#"<nav class="episode-nav" aria-label="More episodes">"#);
    if let Some(older) = older {
        let _ = write!(
            body,
            r#"<a rel="prev" href="{}">&larr; {}</a>"#,
            escape(&older.url_path()),
            escape(&older.title)
        );
    }
    if let Some(newer) = newer {
        let _ = write!(
            body,
            r#"<a rel="next" href="{}">{} &rarr;</a>"#,
            escape(&newer.url_path()),
            escape(&newer.title)
        );
    }
    body.push_str("</nav>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::{episode, shipped};
    use crate::data::{SiteData, types::Timestamp};
    use crate::listing::FilterState;
    use crate::render::tests::shipped_config;

    #[test]
    fn test_static_listing_shows_everything() {
        let config = shipped_config();
        let data = shipped();
        let view = ListingView::derive(&data, FilterState::default());
        let html = Site::new(&config, &data).render_listing(&view);

        assert_eq!(html.matches(r#"<li class="episode-card""#).count(), 24);
        assert_eq!(html.matches(r#"<li class="episode-card" data-episode="#).count(), 24);
        assert!(!html.contains("\" hidden>"));
        assert!(html.contains("Showing all 24 episodes"));
        assert!(html.contains(r#"data-tag-panel hidden>"#));
        assert!(html.contains(r#"data-no-results hidden>"#));
        assert!(html.contains(r#"aria-expanded="false""#));
        // newest first
        let first = html.find(r#"data-episode="24""#).unwrap();
        let second = html.find(r#"data-episode="20""#).unwrap();
        assert!(first < second);
        assert!(!html.contains("noindex"));
    }

    #[test]
    fn test_filtered_listing() {
        let config = shipped_config();
        let data = shipped();
        let state = FilterState::new(Some("AI & Agents"), "");
        let view = ListingView::derive(&data, state);
        let html = Site::new(&config, &data).render_listing(&view);

        assert!(html.contains("Showing 11 of 24 episodes"));
        assert_eq!(html.matches("\" hidden><a class=\"thumbnail\"").count(), 13);
        assert!(html.contains(r#"data-tag="AI &amp; Agents" aria-pressed="true""#));
        assert!(html.contains(r#"data-tag="" aria-pressed="false""#));
        assert!(html.contains(r#"aria-expanded="true""#));
        assert!(html.contains(r#"name="tag" value="AI &amp; Agents""#));
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(html.contains(r#"href="/episodes/?tag=Open+Source" data-tag="Open Source""#));
        assert!(html.contains(r#"href="/episodes/" data-tag="" aria-pressed="false""#));
        assert!(!html.contains("data-clear-search"));
    }

    #[test]
    fn test_no_results_listing() {
        let config = shipped_config();
        let data = shipped();
        let state = FilterState::new(None, "no such episode anywhere");
        let view = ListingView::derive(&data, state);
        let html = Site::new(&config, &data).render_listing(&view);

        assert!(html.contains("Showing 0 of 24 episodes"));
        assert!(html.contains(r#"<div class="no-results" data-no-results><h2>"#));
        assert!(html.contains(r#"href="/episodes/" data-reset>Clear filters</a>"#));
        assert!(html.contains(r#"value="no such episode anywhere""#));
        assert!(html.contains(r#"href="/episodes/" data-clear-search>"#));
    }

    #[test]
    fn test_card_search_text() {
        let ep = episode(3, "2025-03-01", &["AI & Agents", "Open Source"]);
        let html = card(&ep, false);
        assert!(html.contains(r#"data-tags="AI &amp; Agents|Open Source""#));
        assert!(html.contains(r#"data-search="episode 3"#));
        assert!(html.contains("March 1, 2025"));
        assert!(html.contains("https://i.ytimg.com/vi/video3/hqdefault.jpg"));
    }

    #[test]
    fn test_share_links() {
        let config = shipped_config();
        let mut ep = episode(5, "2024-09-01", &[]);
        ep.title = "Pricing & Packaging".into();
        let links = ShareLinks::new(&config, &ep);

        assert_eq!(links.page, "https://agentic-saas-talks.com/episodes/5/");
        assert_eq!(
            links.linkedin,
            "https://www.linkedin.com/sharing/share-offsite/?url=https%3A%2F%2Fagentic-saas-talks.com%2Fepisodes%2F5%2F"
        );
        assert!(links.twitter.starts_with(
            "https://twitter.com/intent/tweet?text=Check%20out%20%22Pricing%20%26%20Packaging%22%20from%20Agentic%20SaaS%20Talks%21&url="
        ));
    }

    #[test]
    fn test_detail_page() {
        let config = shipped_config();
        let mut ep = episode(2, "2025-02-01", &["SaaS Strategy"]);
        ep.timestamps = vec![Timestamp { time: "05:30".into(), title: "Pricing".into() }];
        let data = SiteData {
            episodes: vec![
                episode(3, "2025-03-01", &[]),
                ep.clone(),
                episode(1, "2025-01-01", &[]),
            ],
            ..Default::default()
        };
        let html = detail(&Site::new(&config, &data), &ep);

        assert!(html.contains("<h1>Episode 2</h1>"));
        assert!(html.contains(r#"<iframe src="https://www.youtube.com/embed/video2""#));
        assert!(html.contains(r#"href="https://www.youtube.com/watch?v=video2&amp;t=330s""#));
        assert!(html.contains(r#"<span class="time">05:30</span> Pricing"#));
        assert!(html.contains(r#"data-copy-link="https://agentic-saas-talks.com/episodes/2/""#));
        assert!(html.contains(r#"<a rel="prev" href="/episodes/1/">"#));
        assert!(html.contains(r#"<a rel="next" href="/episodes/3/">"#));
        assert!(html.contains(r#""hasPart":[{"@type":"Clip""#));
        assert!(html.contains(r#""@type":"BreadcrumbList""#));
        assert!(html.contains(r#"<meta property="og:image" content="https://i.ytimg.com/vi/video2/maxresdefault.jpg">"#));
        assert!(!html.contains("class=\"guests\""));
    }

    #[test]
    fn test_detail_without_video_id() {
        let config = shipped_config();
        let mut ep = episode(1, "2025-01-01", &[]);
        ep.video_url = "not-a-url".into();
        let data = SiteData { episodes: vec![ep.clone()], ..Default::default() };
        let html = detail(&Site::new(&config, &data), &ep);

        assert!(!html.contains("<iframe"));
        assert!(html.contains("Watch the episode"));
        assert!(!html.contains("episode-nav"));
    }
}
