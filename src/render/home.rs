//! Homepage.

use super::Site;
use super::layout::{Section, document};
use super::{blog, episodes, hosts};
use crate::listing::TagCatalog;
use crate::seo::{PageHead, schema};
use crate::utils::html::escape;
use std::fmt::Write;

/// Episodes shown under "Recent Episodes", after the latest one.
const RECENT_EPISODES: usize = 3;
const RECENT_POSTS: usize = 3;

pub(super) fn render(site: &Site<'_>) -> String {
    let config = site.config;
    let data = site.data;
    let ordered = data.episodes_newest_first();
    let catalog = TagCatalog::from_episodes(&data.episodes);
    let mut body = String::with_capacity(32 * 1024);

    let _ = write!(
        body,
        r#"<section class="hero"><h1>{}</h1><p class="lead">{}</p><div class="actions"><a class="button" href="/episodes/">Browse All Episodes</a>"#,
        escape(&config.base.title),
        escape(&config.base.description)
    );
    if let Some(playlist) = &config.links.playlist {
        let _ = write!(
            body,
            r#"<a class="button secondary" href="{}" target="_blank" rel="noopener noreferrer">Watch the Playlist</a>"#,
            escape(playlist)
        );
    }
    let _ = write!(
        body,
        r#"</div><ul class="stats"><li><strong>{}</strong> episodes</li><li><strong>{}</strong> topics</li><li><strong>{}</strong> hosts</li></ul></section>"#,
        data.episodes.len(),
        catalog.len(),
        data.hosts.len()
    );

    if let Some(latest) = data.latest_episode() {
        body.push_str(r#"<section class="latest"><h2>Latest Episode</h2><ol class="episode-grid">"#);
        body.push_str(&episodes::card(latest, false));
        body.push_str("</ol></section>");
    }

    if ordered.len() > 1 {
        body.push_str(r#"<section class="recent"><h2>Recent Episodes</h2><ol class="episode-grid">"#);
        for episode in ordered.iter().skip(1).take(RECENT_EPISODES) {
            body.push_str(&episodes::card(episode, false));
        }
        body.push_str(r#"</ol><p><a href="/episodes/">View All Episodes &rarr;</a></p></section>"#);
    }

    if !catalog.is_empty() {
        body.push_str(r#"<section class="topics"><h2>What We Discuss</h2><ul class="tags">"#);
        for (tag, count) in catalog.iter() {
            let href = crate::listing::FilterState::new(Some(tag), "").href();
            let _ = write!(
                body,
                r#"<li><a class="tag" href="{}">{} <span class="count">{count}</span></a></li>"#,
                escape(&href),
                escape(tag)
            );
        }
        body.push_str("</ul></section>");
    }

    if !data.hosts.is_empty() {
        body.push_str(r#"<section class="hosts"><h2>Meet the Hosts</h2><ul class="host-grid">"#);
        for host in &data.hosts {
            body.push_str(&hosts::card(host, false));
        }
        body.push_str(r#"</ul><p><a href="/hosts/">About the Hosts &rarr;</a></p></section>"#);
    }

    if !data.posts.is_empty() {
        body.push_str(r#"<section class="posts"><h2>From the Blog</h2><ol class="post-list">"#);
        for post in data.posts.iter().take(RECENT_POSTS) {
            body.push_str(&blog::summary(post));
        }
        body.push_str("</ol></section>");
    }

    let faqs = faqs(config);
    if !faqs.is_empty() {
        body.push_str(r#"<section class="faq"><h2>Frequently Asked Questions</h2><dl>"#);
        for (question, answer) in &faqs {
            let _ = write!(
                body,
                "<dt>{}</dt><dd>{}</dd>",
                escape(question),
                escape(answer)
            );
        }
        body.push_str("</dl></section>");
    }

    let url = config.absolute_url("/");
    let page = schema::WebPageInfo {
        title: &config.base.title,
        description: &config.base.description,
        url: &url,
        date_published: ordered.last().map(|e| e.date.as_str()),
        date_modified: ordered.first().map(|e| e.date.as_str()),
    };
    let mut head = PageHead::new(config.base.title.clone(), "/")
        .json_ld(schema::organization(config))
        .json_ld(schema::website(config))
        .json_ld(schema::video_series(config, &ordered));
    if let Some(latest) = ordered.first() {
        head = head.json_ld(schema::video_object(config, latest));
    }
    head = head.json_ld(schema::web_page(config, &page));
    if !faqs.is_empty() {
        let pairs: Vec<(&str, &str)> = faqs
            .iter()
            .map(|(q, a)| (q.as_str(), a.as_str()))
            .collect();
        head = head.json_ld(schema::faq_page(&pairs));
    }
    document(site, &head, Section::Home, &body)
}

/// `[[extra.faq]]` entries with both `question` and `answer` set.
fn faqs(config: &crate::config::SiteConfig) -> Vec<(String, String)> {
    let Some(entries) = config.extra.get("faq").and_then(toml::Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let question = entry.get("question")?.as_str()?;
            let answer = entry.get("answer")?.as_str()?;
            Some((question.to_string(), answer.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::data::SiteData;
    use crate::data::tests::shipped;
    use crate::render::tests::shipped_config;

    #[test]
    fn test_home_sections() {
        let config = shipped_config();
        let data = shipped();
        let html = render(&Site::new(&config, &data));

        assert!(html.contains("<strong>24</strong> episodes"));
        assert!(html.contains("<strong>10</strong> topics"));
        assert!(html.contains("<h2>Latest Episode</h2>"));
        // latest plus three recent
        assert_eq!(html.matches(r#"<li class="episode-card""#).count(), 4);
        let latest = html.find(r#"data-episode="24""#).unwrap();
        let recent = html.find(r#"data-episode="20""#).unwrap();
        assert!(latest < recent);
        assert!(html.contains(r#""@type":"VideoSeries""#));
        assert!(html.contains(r#""@type":"WebSite""#));
        assert!(html.contains("Watch the Playlist"));
        assert!(!html.contains("FAQPage"));
    }

    #[test]
    fn test_home_empty_archive() {
        let config = shipped_config();
        let html = render(&Site::new(&config, &SiteData::default()));
        assert!(html.contains("<strong>0</strong> episodes"));
        assert!(!html.contains("Latest Episode"));
        assert!(!html.contains("Meet the Hosts"));
    }

    #[test]
    fn test_faq_from_extra() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Show"
            description = "A show"

            [[extra.faq]]
            question = "How often?"
            answer = "Every other week."

            [[extra.faq]]
            question = "Missing answer"
            "#,
        )
        .unwrap();
        assert_eq!(
            faqs(&config),
            vec![("How often?".to_string(), "Every other week.".to_string())]
        );

        let html = render(&Site::new(&config, &SiteData::default()));
        assert!(html.contains("<dt>How often?</dt><dd>Every other week.</dd>"));
        assert!(html.contains(r#""@type":"FAQPage""#));
    }
}
