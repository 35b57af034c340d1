//! Shared page chrome: document shell, navigation, breadcrumbs, footer.

use super::Site;
use crate::config::SiteConfig;
use crate::seo::{Crumb, PageHead, schema};
use crate::utils::html::escape;
use std::fmt::Write;

/// Top-level navigation entry a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Episodes,
    Blog,
    Hosts,
    Other,
}

const NAV: &[(Section, &str, &str)] = &[
    (Section::Home, "Home", "/"),
    (Section::Episodes, "Episodes", "/episodes/"),
    (Section::Blog, "Blog", "/blog/"),
    (Section::Hosts, "Hosts", "/hosts/"),
];

/// Wrap `body` in the full HTML document.
pub fn document(site: &Site<'_>, head: &PageHead, section: Section, body: &str) -> String {
    let config = site.config;
    let mut out = String::with_capacity(body.len() + 4096);
    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="{}"><head>{}</head><body>"#,
        escape(&config.base.language),
        head.render(config)
    );
    out.push_str(r##"<a class="skip-link" href="#main">Skip to content</a>"##);
    header(&mut out, config, section);
    let _ = write!(out, r#"<main id="main">{body}</main>"#);
    footer(&mut out, site);
    out.push_str(
        r#"<button class="scroll-top" type="button" aria-label="Scroll to top" data-scroll-top hidden>&uarr;</button>"#,
    );
    out.push_str(r#"<script src="/site.js" defer></script></body></html>"#);
    out
}

fn header(out: &mut String, config: &SiteConfig, section: Section) {
    let _ = write!(
        out,
        r#"<header class="site-header"><a class="brand" href="/"><img src="{}" alt="" width="32" height="32"><span>{}</span></a>"#,
        escape(&config.base.logo),
        escape(&config.base.title)
    );
    out.push_str(
        r#"<button class="nav-toggle" type="button" aria-label="Toggle navigation" aria-expanded="false" aria-controls="site-nav" data-nav-toggle>&#9776;</button>"#,
    );
    out.push_str(r#"<nav id="site-nav" class="site-nav" aria-label="Main"><ul>"#);
    for (entry, label, href) in NAV {
        let current = if *entry == section { r#" aria-current="page""# } else { "" };
        let _ = write!(out, r#"<li><a href="{href}"{current}>{label}</a></li>"#);
    }
    if let Some(youtube) = &config.links.youtube {
        let _ = write!(
            out,
            r#"<li><a class="cta" href="{}" target="_blank" rel="noopener noreferrer">Subscribe</a></li>"#,
            escape(youtube)
        );
    }
    out.push_str("</ul></nav></header>");
}

fn footer(out: &mut String, site: &Site<'_>) {
    let config = site.config;
    out.push_str(r#"<footer class="site-footer"><div class="footer-grid"><div>"#);
    let _ = write!(
        out,
        "<p class=\"footer-title\">{}</p><p>{}</p></div>",
        escape(&config.base.title),
        escape(&config.base.description)
    );

    out.push_str(r#"<div><h3>Quick Links</h3><ul>"#);
    for (label, href) in [
        ("Home", "/"),
        ("All Episodes", "/episodes/"),
        ("About the Hosts", "/hosts/"),
        ("Blog", "/blog/"),
    ] {
        let _ = write!(out, r#"<li><a href="{href}">{label}</a></li>"#);
    }
    for page in &site.data.pages {
        let _ = write!(
            out,
            r#"<li><a href="{}">{}</a></li>"#,
            escape(&page.url_path()),
            escape(&page.title)
        );
    }
    out.push_str("</ul></div>");

    out.push_str(r#"<div><h3>Follow Us</h3><ul>"#);
    for (label, href) in config.links.iter() {
        let _ = write!(
            out,
            r#"<li><a href="{}" target="_blank" rel="noopener noreferrer">{label}</a></li>"#,
            escape(href)
        );
    }
    if !config.base.email.is_empty() {
        let _ = write!(
            out,
            r#"<li><a href="mailto:{0}">{0}</a></li>"#,
            escape(&config.base.email)
        );
    }
    if config.build.rss.enable {
        let _ = write!(
            out,
            r#"<li><a href="{}">RSS Feed</a></li>"#,
            escape(&config.output_href(&config.build.rss.path))
        );
    }
    out.push_str("</ul></div></div>");

    let year = crate::utils::date::DateTimeUtc::today().year;
    let copyright = if config.base.copyright.is_empty() {
        config.base.title.as_str()
    } else {
        config.base.copyright.as_str()
    };
    let _ = write!(
        out,
        r#"<p class="copyright">&copy; {year} {}</p></footer>"#,
        escape(copyright)
    );
}

/// Breadcrumb trail as visible navigation plus its BreadcrumbList record.
///
/// `trail` holds `(label, site-relative path)`; the last entry is the
/// current page.
pub fn breadcrumbs(config: &SiteConfig, trail: &[(&str, &str)]) -> (String, serde_json::Value) {
    let mut html = String::from(r#"<nav class="breadcrumb" aria-label="Breadcrumb"><ol>"#);
    for (index, (label, path)) in trail.iter().enumerate() {
        if index + 1 == trail.len() {
            let _ = write!(html, r#"<li aria-current="page">{}</li>"#, escape(label));
        } else {
            let _ = write!(
                html,
                r#"<li><a href="{}">{}</a></li>"#,
                escape(path),
                escape(label)
            );
        }
    }
    html.push_str("</ol></nav>");

    let crumbs: Vec<Crumb> = trail
        .iter()
        .map(|(label, path)| Crumb {
            name: label.to_string(),
            url: config.absolute_url(path),
        })
        .collect();
    (html, schema::breadcrumbs(&crumbs))
}

/// `<ul class="tags">` of tag links into the listing.
pub fn tag_links(tags: &[String]) -> String {
    use crate::listing::FilterState;

    let mut out = String::from(r#"<ul class="tags">"#);
    for tag in tags {
        let href = FilterState::new(Some(tag), "").href();
        let _ = write!(
            out,
            r#"<li><a class="tag" href="{}">{}</a></li>"#,
            escape(&href),
            escape(tag)
        );
    }
    out.push_str("</ul>");
    out
}
