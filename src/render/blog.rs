//! Blog index and post pages.

use super::Site;
use super::layout::{Section, breadcrumbs, document};
use crate::data::{BlogPost, Host};
use crate::seo::{OgType, PageHead, schema};
use crate::utils::{date::format_date, html::escape, markdown};
use std::fmt::Write;

const BLOG_PATH: &str = "/blog/";

pub(super) fn index(site: &Site<'_>) -> String {
    let config = site.config;
    let mut body = String::with_capacity(8 * 1024);

    let (crumbs_html, crumbs_json) = breadcrumbs(config, &[("Home", "/"), ("Blog", BLOG_PATH)]);
    body.push_str(&crumbs_html);
    body.push_str(
        r#"<section class="page-intro"><h1>Blog</h1><p>Notes, recaps and long-form thoughts from the hosts.</p></section>"#,
    );

    if site.data.posts.is_empty() {
        body.push_str(r#"<p class="empty">No posts yet.</p>"#);
    } else {
        body.push_str(r#"<ol class="post-list">"#);
        for post in &site.data.posts {
            body.push_str(&summary(post));
        }
        body.push_str("</ol>");
    }

    let description = format!("Articles and episode recaps from {}.", config.base.title);
    let url = config.absolute_url(BLOG_PATH);
    let page = schema::WebPageInfo {
        title: "Blog",
        description: &description,
        url: &url,
        date_published: site.data.posts.last().map(|p| p.date.as_str()),
        date_modified: site.data.posts.first().map(|p| p.date.as_str()),
    };
    let head = PageHead::new("Blog", BLOG_PATH)
        .description(description.clone())
        .json_ld(crumbs_json)
        .json_ld(schema::web_page(config, &page));
    document(site, &head, Section::Blog, &body)
}

/// Post teaser for the blog index and the homepage.
pub(super) fn summary(post: &BlogPost) -> String {
    let mut out = String::with_capacity(512);
    let _ = write!(
        out,
        r#"<li class="post-card"><p class="meta"><time datetime="{}">{}</time> &middot; {} read</p><h3><a href="{}">{}</a></h3>"#,
        escape(&post.date),
        escape(&format_date(&post.date)),
        escape(&post.read_time),
        escape(&post.url_path()),
        escape(&post.title)
    );
    if !post.excerpt.is_empty() {
        let _ = write!(out, "<p>{}</p>", escape(&post.excerpt));
    }
    if !post.author.is_empty() {
        let _ = write!(out, r#"<p class="byline">By {}</p>"#, escape(&post.author));
    }
    out.push_str("</li>");
    out
}

pub(super) fn post(site: &Site<'_>, post: &BlogPost) -> String {
    let config = site.config;
    let path = post.url_path();
    let author = site.data.author_info(&post.author);
    let mut body = String::with_capacity(post.content.len() * 2 + 4096);

    let (crumbs_html, crumbs_json) = breadcrumbs(
        config,
        &[("Home", "/"), ("Blog", BLOG_PATH), (&post.title, &path)],
    );
    body.push_str(&crumbs_html);

    let _ = write!(
        body,
        r#"<article class="post"><header><h1>{}</h1><p class="meta"><time datetime="{}">{}</time> &middot; {} read</p>"#,
        escape(&post.title),
        escape(&post.date),
        escape(&format_date(&post.date)),
        escape(&post.read_time)
    );
    byline(&mut body, &post.author, author);
    body.push_str("</header>");

    if let Some(image) = &post.featured_image {
        let _ = write!(
            body,
            r#"<img class="featured" src="{}" alt="{}">"#,
            escape(image),
            escape(&post.title)
        );
    }

    let content = markdown::strip_duplicate_h1(&post.content, &post.title);
    let _ = write!(
        body,
        r#"<div class="prose">{}</div>"#,
        markdown::render(content)
    );

    if !post.tags.is_empty() {
        body.push_str(r#"<ul class="tags">"#);
        for tag in &post.tags {
            let _ = write!(body, r#"<li class="tag">{}</li>"#, escape(tag));
        }
        body.push_str("</ul>");
    }
    if let Some(host) = author {
        author_bio(&mut body, host);
    }
    let _ = write!(
        body,
        r#"</article><p><a href="{BLOG_PATH}">&larr; Back to all posts</a></p>"#
    );

    let description = if post.excerpt.is_empty() {
        config.base.description.clone()
    } else {
        post.excerpt.clone()
    };
    let mut head = PageHead::new(post.title.clone(), path)
        .description(description)
        .og_type(OgType::Article)
        .keywords(&post.tags)
        .published(post.date.clone())
        .json_ld(schema::blog_posting(config, post, author))
        .json_ld(crumbs_json);
    if let Some(image) = &post.featured_image {
        head = head.image(image.clone());
    }
    document(site, &head, Section::Blog, &body)
}

/// "By <author>", linked and with role when the author is a known host.
fn byline(body: &mut String, name: &str, host: Option<&Host>) {
    if name.is_empty() {
        return;
    }
    match host {
        Some(host) => {
            let _ = write!(
                body,
                r#"<p class="byline">By <a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                escape(&host.linkedin),
                escape(&host.name)
            );
            if let Some(role) = &host.role {
                let _ = write!(body, ", {}", escape(role));
            }
            body.push_str("</p>");
        }
        None => {
            let _ = write!(body, r#"<p class="byline">By {}</p>"#, escape(name));
        }
    }
}

fn author_bio(body: &mut String, host: &Host) {
    body.push_str(r#"<aside class="author-bio">"#);
    if let Some(photo) = &host.photo {
        let _ = write!(
            body,
            r#"<img src="{}" alt="{}" loading="lazy" width="80" height="80">"#,
            escape(photo),
            escape(&host.name)
        );
    }
    let _ = write!(
        body,
        "<div><h2>About {}</h2><p>{}</p></div></aside>",
        escape(&host.name),
        escape(&host.bio)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SiteData;
    use crate::data::tests::shipped;
    use crate::render::tests::shipped_config;

    fn post_fixture(author: &str, content: &str) -> BlogPost {
        BlogPost {
            slug: "hello".into(),
            title: "Hello World".into(),
            author: author.into(),
            date: "2025-11-29".into(),
            read_time: "3 min".into(),
            tags: vec!["News".into()],
            excerpt: "First post".into(),
            featured_image: None,
            content: content.into(),
        }
    }

    #[test]
    fn test_shipped_post_resolves_author() {
        let config = shipped_config();
        let data = shipped();
        let site = Site::new(&config, &data);
        let post_data = &data.posts[0];
        let html = post(&site, post_data);

        assert!(html.contains("By <a href=\"https://www.linkedin.com/in/"));
        assert!(html.contains("<h2>About Michael Cooper</h2>"));
        assert!(html.contains(r#""@type":"BlogPosting""#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains("November 29, 2025"));
    }

    #[test]
    fn test_post_unknown_author_and_h1_strip() {
        let config = shipped_config();
        let data = SiteData::default();
        let body = "# Hello **World**\n\nBody with a [link](https://example.com).\n";
        let fixture = post_fixture("Guest Writer", body);
        let html = post(&Site::new(&config, &data), &fixture);

        assert!(html.contains(r#"<p class="byline">By Guest Writer</p>"#));
        assert!(!html.contains("author-bio"));
        assert_eq!(html.matches("<h1>").count(), 1);
        assert!(!html.contains("<strong>World</strong>"));
        assert!(html.contains(r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">link</a>"#));
        assert!(html.contains(r#""author":{"@type":"Organization""#));
    }

    #[test]
    fn test_post_keeps_different_heading() {
        let config = shipped_config();
        let data = SiteData::default();
        let fixture = post_fixture("", "# Something Else\n\nBody\n");
        let html = post(&Site::new(&config, &data), &fixture);
        assert!(html.contains("<h1>Something Else</h1>"));
        assert!(!html.contains("class=\"byline\""));
    }

    #[test]
    fn test_index() {
        let config = shipped_config();
        let data = shipped();
        let html = index(&Site::new(&config, &data));
        assert!(html.contains(r#"href="/blog/welcome-to-agentic-saas-talks-blog/""#));
        assert_eq!(html.matches(r#"<li class="post-card">"#).count(), 1);

        let empty = index(&Site::new(&config, &SiteData::default()));
        assert!(empty.contains("No posts yet."));
    }
}
