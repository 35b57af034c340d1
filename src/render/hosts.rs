//! Host profiles.

use super::Site;
use super::layout::{Section, breadcrumbs, document};
use crate::data::Host;
use crate::seo::{PageHead, schema};
use crate::utils::html::escape;
use std::fmt::Write;

const HOSTS_PATH: &str = "/hosts/";

pub(super) fn render(site: &Site<'_>) -> String {
    let config = site.config;
    let mut body = String::with_capacity(8 * 1024);

    let (crumbs_html, crumbs_json) =
        breadcrumbs(config, &[("Home", "/"), ("Hosts", HOSTS_PATH)]);
    body.push_str(&crumbs_html);
    let _ = write!(
        body,
        r#"<section class="page-intro"><h1>Meet the Hosts</h1><p>The people behind {}.</p></section><ul class="host-grid">"#,
        escape(&config.base.title)
    );
    for host in &site.data.hosts {
        body.push_str(&card(host, true));
    }
    body.push_str("</ul>");

    let description = format!(
        "Meet the hosts of {}: builders, architects and strategists.",
        config.base.title
    );
    let url = config.absolute_url(HOSTS_PATH);
    let page = schema::WebPageInfo {
        title: "Meet the Hosts",
        description: &description,
        url: &url,
        ..Default::default()
    };
    let head = PageHead::new("Hosts", HOSTS_PATH)
        .description(description.clone())
        .json_ld(crumbs_json)
        .json_ld(schema::web_page(config, &page));
    document(site, &head, Section::Hosts, &body)
}

/// Host card. The bio is only shown on the hosts page.
pub(super) fn card(host: &Host, with_bio: bool) -> String {
    let mut out = String::from(r#"<li class="person">"#);
    if let Some(photo) = &host.photo {
        let _ = write!(
            out,
            r#"<img src="{}" alt="{}" loading="lazy" width="160" height="160">"#,
            escape(photo),
            escape(&host.name)
        );
    }
    let _ = write!(out, "<h3>{}</h3>", escape(&host.name));
    if let Some(role) = &host.role {
        let _ = write!(out, r#"<p class="role">{}</p>"#, escape(role));
    }
    if with_bio && !host.bio.is_empty() {
        let _ = write!(out, "<p>{}</p>", escape(&host.bio));
    }
    if !host.linkedin.is_empty() {
        let _ = write!(
            out,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" aria-label="{} on LinkedIn">LinkedIn</a>"#,
            escape(&host.linkedin),
            escape(&host.name)
        );
    }
    out.push_str("</li>");
    out
}
