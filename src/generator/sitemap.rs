//! Sitemap generation.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    data::SiteData,
    log,
    render::Route,
    utils::{
        date::DateTimeUtc,
        html::escape_xml,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result};
use std::fs;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Build sitemap if enabled in config.
pub fn build_sitemap(config: &SiteConfig, data: &SiteData) -> Result<()> {
    if config.build.sitemap.enable {
        Sitemap::from_site(config, data).write(config)?;
    }
    Ok(())
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// `<changefreq>` values in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeFreq {
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    /// Full URL location
    loc: String,
    /// YYYY-MM-DD
    lastmod: Option<String>,
    changefreq: ChangeFreq,
    priority: f32,
}

impl UrlEntry {
    fn new(config: &SiteConfig, route: &Route, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            loc: config.absolute_url(&route.url_path()),
            lastmod: None,
            changefreq,
            priority,
        }
    }

    /// Dates that fail to parse are left out rather than written verbatim.
    fn lastmod(mut self, date: &str) -> Self {
        self.lastmod = DateTimeUtc::parse(date).map(DateTimeUtc::to_ymd);
        self
    }
}

impl Sitemap {
    /// Section and legal pages (lastmod = build date), then posts and
    /// episodes newest first. The 404 page is never listed.
    fn from_site(config: &SiteConfig, data: &SiteData) -> Self {
        Self::from_site_at(config, data, DateTimeUtc::today())
    }

    fn from_site_at(config: &SiteConfig, data: &SiteData, built: DateTimeUtc) -> Self {
        use ChangeFreq::*;

        let built = built.to_ymd();
        let mut urls = vec![
            UrlEntry::new(config, &Route::Home, Weekly, 1.0),
            UrlEntry::new(config, &Route::Episodes, Weekly, 0.9),
            UrlEntry::new(config, &Route::Hosts, Monthly, 0.8),
            UrlEntry::new(config, &Route::Blog, Weekly, 0.8),
        ];
        urls.extend(
            data.pages
                .iter()
                .map(|page| UrlEntry::new(config, &Route::Page(page.slug.clone()), Yearly, 0.3)),
        );
        for entry in &mut urls {
            entry.lastmod = Some(built.clone());
        }

        urls.extend(data.posts.iter().map(|post| {
            UrlEntry::new(config, &Route::Post(post.slug.clone()), Monthly, 0.7).lastmod(&post.date)
        }));
        urls.extend(data.episodes_newest_first().into_iter().map(|episode| {
            UrlEntry::new(config, &Route::Episode(episode.id), Monthly, 0.6)
                .lastmod(&episode.date)
        }));

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(256 * (self.urls.len() + 1));

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.changefreq.as_str()
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = &config.build.sitemap.path;
        let xml = self.into_xml();
        let xml = minify(MinifyType::Xml(xml.as_bytes()), config.build.minify);

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(sitemap_path, &*xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::{episode, shipped};
    use crate::render::tests::shipped_config;

    const BUILT: DateTimeUtc = DateTimeUtc::from_ymd(2026, 3, 1);

    fn example_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com/".to_string());
        config
    }

    #[test]
    fn test_sitemap_empty_site() {
        let xml = Sitemap::from_site_at(&example_config(), &SiteData::default(), BUILT).into_xml();

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(lines.last().map(|l| l.trim()), Some("</urlset>"));
        // section pages are always present
        assert_eq!(xml.matches("<url>").count(), 4);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(!xml.contains("404"));
    }

    #[test]
    fn test_section_priorities() {
        let xml = Sitemap::from_site_at(&example_config(), &SiteData::default(), BUILT).into_xml();

        assert!(xml.contains(
            "<loc>https://example.com/</loc>\n    <lastmod>2026-03-01</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>1.0</priority>"
        ));
        assert!(xml.contains(
            "<loc>https://example.com/episodes/</loc>\n    <lastmod>2026-03-01</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>0.9</priority>"
        ));
        assert!(xml.contains(
            "<loc>https://example.com/hosts/</loc>\n    <lastmod>2026-03-01</lastmod>\n    <changefreq>monthly</changefreq>\n    <priority>0.8</priority>"
        ));
    }

    #[test]
    fn test_episode_entries_newest_first() {
        let data = SiteData {
            episodes: vec![
                episode(1, "2024-01-10", &[]),
                episode(2, "2024-03-05", &[]),
                episode(3, "not a date", &[]),
            ],
            ..Default::default()
        };
        let xml = Sitemap::from_site_at(&example_config(), &data, BUILT).into_xml();

        let second = xml.find("/episodes/2/").unwrap();
        let first = xml.find("/episodes/1/").unwrap();
        assert!(second < first);
        assert!(xml.contains(
            "<loc>https://example.com/episodes/2/</loc>\n    <lastmod>2024-03-05</lastmod>\n    <changefreq>monthly</changefreq>\n    <priority>0.6</priority>"
        ));
        assert!(xml.contains(
            "<loc>https://example.com/episodes/3/</loc>\n    <changefreq>monthly</changefreq>"
        ));
    }

    #[test]
    fn test_shipped_sitemap() {
        let config = shipped_config();
        let data = shipped();
        let xml = Sitemap::from_site_at(&config, &data, BUILT).into_xml();

        // 4 sections, 2 legal pages, 1 post, 24 episodes
        assert_eq!(xml.matches("<url>").count(), 31);
        assert!(xml.contains(
            "<loc>https://agentic-saas-talks.com/privacy/</loc>\n    <lastmod>2026-03-01</lastmod>\n    <changefreq>yearly</changefreq>\n    <priority>0.3</priority>"
        ));
        assert!(xml.contains(
            "<loc>https://agentic-saas-talks.com/blog/welcome-to-agentic-saas-talks-blog/</loc>\n    <lastmod>2025-11-29</lastmod>\n    <changefreq>monthly</changefreq>\n    <priority>0.7</priority>"
        ));
    }

    #[test]
    fn test_build_sitemap_minified() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = example_config();
        config.build.sitemap.path = dir.path().join("sitemap.xml");

        build_sitemap(&config, &SiteData::default()).unwrap();
        let written = fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
        assert!(!written.contains('\n'));
        assert!(written.contains("<url><loc>https://example.com/</loc><lastmod>"));
    }
}
