//! schema.org JSON-LD records.
//!
//! Each builder is a pure function of its input and the site config and
//! returns a `serde_json::Value` ready for an inline
//! `<script type="application/ld+json">` block.

use crate::config::SiteConfig;
use crate::data::{BlogPost, Episode, Host};
use crate::utils::{markdown, video};
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

const CONTEXT: &str = "https://schema.org";

static HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*hr").expect("valid regex"));
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*min").expect("valid regex"));

/// `"57 min"` → `PT57M`, `"1 hr 30 min"` → `PT1H30M`.
///
/// Labels without hours or minutes, or with both zero, give `PT0M`.
pub fn duration_to_iso8601(label: &str) -> String {
    let capture = |re: &Regex| -> u64 {
        re.captures(label)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0)
    };
    let (hours, minutes) = (capture(&HOURS), capture(&MINUTES));

    match (hours, minutes) {
        (0, 0) => "PT0M".to_string(),
        (0, m) => format!("PT{m}M"),
        (h, 0) => format!("PT{h}H"),
        (h, m) => format!("PT{h}H{m}M"),
    }
}

/// One breadcrumb trail entry with an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub url: String,
}

// ============================================================================
// Shared fragments
// ============================================================================

fn logo(config: &SiteConfig) -> Value {
    json!({
        "@type": "ImageObject",
        "url": config.absolute_url(&config.base.logo),
    })
}

/// Publishing organization, falling back to the show itself.
fn publisher(config: &SiteConfig) -> Value {
    let (name, url) = if config.publisher.name.is_empty() {
        (config.base.title.as_str(), config.site_url())
    } else {
        (config.publisher.name.as_str(), config.publisher.url.as_str())
    };
    json!({ "@type": "Organization", "name": name, "url": url })
}

fn publisher_with_logo(config: &SiteConfig) -> Value {
    let mut value = publisher(config);
    value["logo"] = logo(config);
    value
}

fn thumbnail(episode: &Episode) -> String {
    format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", episode.video_id())
}

fn episode_url(config: &SiteConfig, episode: &Episode) -> String {
    config.absolute_url(&episode.url_path())
}

// ============================================================================
// Builders
// ============================================================================

pub fn organization(config: &SiteConfig) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "Organization",
        "name": config.base.title,
        "url": config.site_url(),
        "logo": logo(config),
        "description": config.base.description,
        "founder": publisher(config),
        "sameAs": config.publisher.same_as,
    })
}

/// WebSite with a SearchAction into the listing's `q` parameter.
pub fn website(config: &SiteConfig) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "WebSite",
        "name": config.base.title,
        "url": config.site_url(),
        "description": config.base.description,
        "publisher": publisher(config),
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{}/episodes?q={{search_term_string}}", config.site_url()),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

/// Full VideoObject for an episode page.
///
/// `name`, `description` and `uploadDate` are the episode's fields verbatim.
pub fn video_object(config: &SiteConfig, episode: &Episode) -> Value {
    let id = episode.video_id();
    json!({
        "@context": CONTEXT,
        "@type": "VideoObject",
        "name": episode.title,
        "description": episode.description,
        "thumbnailUrl": [
            format!("https://i.ytimg.com/vi/{id}/maxresdefault.jpg"),
            format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
        ],
        "uploadDate": episode.date,
        "duration": duration_to_iso8601(&episode.duration),
        "contentUrl": episode.video_url,
        "embedUrl": format!("https://www.youtube.com/embed/{id}"),
        "publisher": publisher_with_logo(config),
        "keywords": episode.tags.join(", "),
    })
}

/// Chapter markers as `Clip` parts of a video, for episodes that have them.
pub fn video_clips(episode: &Episode) -> Vec<Value> {
    let starts: Vec<u64> = episode
        .timestamps
        .iter()
        .map(|ts| video::timestamp_to_seconds(&ts.time))
        .collect();

    episode
        .timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            let mut clip = json!({
                "@type": "Clip",
                "name": ts.title,
                "startOffset": starts[i],
                "url": ts.url(&episode.video_url),
            });
            if let Some(end) = starts.get(i + 1).filter(|end| **end > starts[i]) {
                clip["endOffset"] = json!(end);
            }
            clip
        })
        .collect()
}

pub fn episode_list(config: &SiteConfig, episodes: &[&Episode]) -> Value {
    let items: Vec<Value> = episodes
        .iter()
        .enumerate()
        .map(|(index, episode)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "item": {
                    "@type": "VideoObject",
                    "name": episode.title,
                    "url": episode_url(config, episode),
                    "description": episode.description,
                    "thumbnailUrl": thumbnail(episode),
                    "uploadDate": episode.date,
                },
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "ItemList",
        "itemListElement": items,
    })
}

pub fn breadcrumbs(crumbs: &[Crumb]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(index, crumb)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": crumb.name,
                "item": crumb.url,
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

pub fn faq_page(faqs: &[(&str, &str)]) -> Value {
    let questions: Vec<Value> = faqs
        .iter()
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": { "@type": "Answer", "text": answer },
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

/// Inputs of [`web_page`].
#[derive(Debug, Clone, Default)]
pub struct WebPageInfo<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Absolute URL.
    pub url: &'a str,
    pub date_published: Option<&'a str>,
    /// Defaults to `date_published`.
    pub date_modified: Option<&'a str>,
}

pub fn web_page(config: &SiteConfig, page: &WebPageInfo<'_>) -> Value {
    let mut value = json!({
        "@context": CONTEXT,
        "@type": "WebPage",
        "name": page.title,
        "description": page.description,
        "url": page.url,
        "publisher": publisher(config),
        "isPartOf": {
            "@type": "WebSite",
            "name": config.base.title,
            "url": config.site_url(),
        },
    });
    if let Some(published) = page.date_published {
        value["datePublished"] = json!(published);
    }
    if let Some(modified) = page.date_modified.or(page.date_published) {
        value["dateModified"] = json!(modified);
    }
    value
}

/// BlogPosting. A resolved author is a Person, otherwise the show is.
pub fn blog_posting(config: &SiteConfig, post: &BlogPost, author: Option<&Host>) -> Value {
    let author = match author {
        Some(host) => json!({ "@type": "Person", "name": host.name, "url": host.linkedin }),
        None => json!({
            "@type": "Organization",
            "name": config.base.title,
            "url": config.site_url(),
        }),
    };

    let mut value = json!({
        "@context": CONTEXT,
        "@type": "BlogPosting",
        "headline": post.title,
        "description": post.excerpt,
        "datePublished": post.date,
        "author": author,
        "publisher": publisher_with_logo(config),
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": config.absolute_url(&post.url_path()),
        },
        "keywords": post.tags.join(", "),
        "wordCount": markdown::word_count(&post.content),
    });
    if let Some(image) = &post.featured_image {
        value["image"] = json!({ "@type": "ImageObject", "url": config.absolute_url(image) });
    }
    value
}

/// VideoSeries over the whole archive. `episodeNumber` is the episode id.
pub fn video_series(config: &SiteConfig, episodes: &[&Episode]) -> Value {
    let entries: Vec<Value> = episodes
        .iter()
        .map(|episode| {
            json!({
                "@type": "VideoObject",
                "name": episode.title,
                "description": episode.description,
                "url": episode_url(config, episode),
                "thumbnailUrl": thumbnail(episode),
                "uploadDate": episode.date,
                "episodeNumber": episode.id,
            })
        })
        .collect();

    let mut value = Map::new();
    value.insert("@context".into(), json!(CONTEXT));
    value.insert("@type".into(), json!("VideoSeries"));
    value.insert("name".into(), json!(config.base.title));
    value.insert("description".into(), json!(config.base.description));
    value.insert("url".into(), json!(config.site_url()));
    value.insert("numberOfEpisodes".into(), json!(episodes.len()));
    value.insert("publisher".into(), publisher(config));
    value.insert("episode".into(), Value::Array(entries));
    Value::Object(value)
}
