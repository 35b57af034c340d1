//! `<head>` metadata of a rendered page.

use crate::config::SiteConfig;
use crate::generator::manifest::MANIFEST_FILE;
use crate::utils::html::{escape, script_json};
use serde_json::Value;
use std::fmt::Write;

/// Open Graph object type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OgType {
    #[default]
    Website,
    Article,
    Video,
}

impl OgType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
            Self::Video => "video.other",
        }
    }
}

/// Per-page metadata. Missing values fall back to the site defaults.
#[derive(Debug, Clone, Default)]
pub struct PageHead {
    /// Page title; `None` renders the bare site title.
    pub title: Option<String>,
    pub description: Option<String>,
    /// Site-relative path, e.g. `/episodes/3/`.
    pub path: String,
    pub og_type: OgType,
    /// Absolute or site-relative image URL.
    pub image: Option<String>,
    /// Added to the site keywords.
    pub keywords: Vec<String>,
    pub published: Option<String>,
    pub noindex: bool,
    pub json_ld: Vec<Value>,
}

impl PageHead {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn og_type(mut self, og_type: OgType) -> Self {
        self.og_type = og_type;
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn keywords(mut self, keywords: &[String]) -> Self {
        self.keywords.extend(keywords.iter().cloned());
        self
    }

    pub fn published(mut self, date: impl Into<String>) -> Self {
        self.published = Some(date.into());
        self
    }

    pub fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }

    pub fn json_ld(mut self, value: Value) -> Self {
        self.json_ld.push(value);
        self
    }

    /// `"<title> | <site>"`, or the site title alone.
    pub fn full_title(&self, config: &SiteConfig) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() && title != config.base.title => {
                format!("{title} | {}", config.base.title)
            }
            _ => config.base.title.clone(),
        }
    }

    /// Inner HTML of `<head>`.
    pub fn render(&self, config: &SiteConfig) -> String {
        let title = self.full_title(config);
        let description = self
            .description
            .as_deref()
            .unwrap_or(&config.base.description);
        let canonical = config.absolute_url(&self.path);
        let image = config.absolute_url(self.image.as_deref().unwrap_or(&config.base.logo));
        let keywords = config
            .base
            .keywords
            .iter()
            .chain(&self.keywords)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::with_capacity(2048);
        out.push_str(r#"<meta charset="utf-8">"#);
        out.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
        let _ = write!(out, "<title>{}</title>", escape(&title));
        meta_name(&mut out, "description", description);
        if !keywords.is_empty() {
            meta_name(&mut out, "keywords", &keywords);
        }
        meta_name(&mut out, "author", &config.base.author);
        if self.noindex {
            meta_name(&mut out, "robots", "noindex");
        }
        if config.base.url.is_some() {
            let _ = write!(out, r#"<link rel="canonical" href="{}">"#, escape(&canonical));
        }

        meta_property(&mut out, "og:title", &title);
        meta_property(&mut out, "og:description", description);
        meta_property(&mut out, "og:type", self.og_type.as_str());
        meta_property(&mut out, "og:url", &canonical);
        meta_property(&mut out, "og:site_name", &config.base.title);
        meta_property(&mut out, "og:image", &image);
        meta_property(&mut out, "og:locale", &config.base.language.replace('-', "_"));
        if let Some(published) = &self.published {
            meta_property(&mut out, "article:published_time", published);
        }

        meta_name(&mut out, "twitter:card", "summary_large_image");
        meta_name(&mut out, "twitter:title", &title);
        meta_name(&mut out, "twitter:description", description);
        meta_name(&mut out, "twitter:image", &image);

        let _ = write!(
            out,
            r#"<link rel="icon" href="{}">"#,
            escape(&config.base.logo)
        );
        if config.build.rss.enable {
            let _ = write!(
                out,
                r#"<link rel="alternate" type="application/rss+xml" title="{}" href="{}">"#,
                escape(&config.base.title),
                escape(&config.output_href(&config.build.rss.path))
            );
        }
        if config.build.manifest.enable {
            let _ = write!(out, r#"<link rel="manifest" href="/{MANIFEST_FILE}">"#);
            meta_name(&mut out, "theme-color", &config.build.manifest.theme_color);
        }
        out.push_str(r#"<link rel="stylesheet" href="/site.css">"#);

        for value in &self.json_ld {
            let _ = write!(
                out,
                r#"<script type="application/ld+json">{}</script>"#,
                script_json(value)
            );
        }
        out
    }
}

fn meta_name(out: &mut String, name: &str, content: &str) {
    let _ = write!(
        out,
        r#"<meta name="{name}" content="{}">"#,
        escape(content)
    );
}

fn meta_property(out: &mut String, property: &str, content: &str) {
    let _ = write!(
        out,
        r#"<meta property="{property}" content="{}">"#,
        escape(content)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SiteConfig {
        SiteConfig::from_str(
            r#"
            [base]
            title = "Agentic SaaS Talks"
            description = "Webcast"
            url = "https://example.com/"
            keywords = ["SaaS"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_full_title() {
        let config = config();
        assert_eq!(
            PageHead::new("Episodes", "/episodes/").full_title(&config),
            "Episodes | Agentic SaaS Talks"
        );
        assert_eq!(PageHead::default().full_title(&config), "Agentic SaaS Talks");
        assert_eq!(
            PageHead::new("Agentic SaaS Talks", "/").full_title(&config),
            "Agentic SaaS Talks"
        );
    }

    #[test]
    fn test_render_defaults_and_overrides() {
        let config = config();
        let head = PageHead::new("Q&A", "/episodes/3/")
            .og_type(OgType::Video)
            .keywords(&["MCP".to_string()])
            .render(&config);

        assert!(head.contains("<title>Q&amp;A | Agentic SaaS Talks</title>"));
        assert!(head.contains(r#"<meta name="description" content="Webcast">"#));
        assert!(head.contains(r#"<meta name="keywords" content="SaaS, MCP">"#));
        assert!(head.contains(r#"<link rel="canonical" href="https://example.com/episodes/3/">"#));
        assert!(head.contains(r#"content="video.other""#));
        assert!(head.contains(r#"<meta property="og:image" content="https://example.com/logo.png">"#));
        assert!(head.contains(r#"href="/feed.xml""#));
        assert!(head.contains(r#"<link rel="manifest" href="/manifest.webmanifest">"#));
        assert!(!head.contains("noindex"));
    }

    #[test]
    fn test_render_json_ld_is_script_safe() {
        let head = PageHead::new("x", "/")
            .json_ld(json!({ "name": "</script><b>" }))
            .noindex()
            .render(&config());
        assert!(head.contains(r#"<script type="application/ld+json">{"name":"<\/script><b>"}</script>"#));
        assert!(head.contains(r#"<meta name="robots" content="noindex">"#));
    }
}
