//! Standalone markdown pages and the 404 page.

use super::Site;
use super::layout::{Section, breadcrumbs, document};
use crate::data::StaticPage;
use crate::seo::{PageHead, schema};
use crate::utils::{date::format_date, html::escape, markdown};
use std::fmt::Write;

pub(super) fn render(site: &Site<'_>, page: &StaticPage) -> String {
    let config = site.config;
    let path = page.url_path();
    let mut body = String::with_capacity(page.content.len() * 2 + 1024);

    let (crumbs_html, crumbs_json) = breadcrumbs(config, &[("Home", "/"), (&page.title, &path)]);
    body.push_str(&crumbs_html);
    let _ = write!(body, r#"<article class="legal"><h1>{}</h1>"#, escape(&page.title));
    if let Some(updated) = &page.updated {
        let _ = write!(
            body,
            r#"<p class="meta">Last updated: <time datetime="{}">{}</time></p>"#,
            escape(updated),
            escape(&format_date(updated))
        );
    }
    let content = markdown::strip_duplicate_h1(&page.content, &page.title);
    let _ = write!(
        body,
        r#"<div class="prose">{}</div></article>"#,
        markdown::render(content)
    );

    let url = config.absolute_url(&path);
    let info = schema::WebPageInfo {
        title: &page.title,
        description: &page.description,
        url: &url,
        date_published: page.updated.as_deref(),
        date_modified: None,
    };
    let mut head = PageHead::new(page.title.clone(), path.clone())
        .json_ld(crumbs_json)
        .json_ld(schema::web_page(config, &info));
    if !page.description.is_empty() {
        head = head.description(page.description.clone());
    }
    document(site, &head, Section::Other, &body)
}

pub(super) fn not_found(site: &Site<'_>) -> String {
    let body = r#"<section class="not-found"><h1>Page Not Found</h1><p>The page you are looking for does not exist or has been moved.</p><p><a class="button" href="/">Back to Home</a> <a class="button secondary" href="/episodes/">Browse Episodes</a></p></section>"#;
    let head = PageHead::new("Page Not Found", "/404.html")
        .description("The page you are looking for does not exist.")
        .noindex();
    document(site, &head, Section::Other, body)
}
