//! HTML rendering of every route of the site.
//!
//! # Routes
//!
//! ```text
//! /                   home
//! /episodes/          listing (tag catalog, search, no-results state)
//! /episodes/<id>/     episode detail
//! /blog/              blog index
//! /blog/<slug>/       blog post
//! /hosts/             host profiles
//! /<slug>/            static markdown page (privacy, terms)
//! /404.html           not found
//! ```
//!
//! Rendering is a pure function of [`SiteConfig`] and [`SiteData`]; the
//! build writes the results, the preview server also renders the listing
//! on demand for query strings.

mod blog;
mod episodes;
mod home;
mod hosts;
mod layout;
mod pages;

use crate::config::SiteConfig;
use crate::data::SiteData;
use crate::listing::{FilterState, ListingView};
use std::path::{Path, PathBuf};

/// One output page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Episodes,
    Episode(u32),
    Blog,
    Post(String),
    Hosts,
    Page(String),
    NotFound,
}

impl Route {
    /// Site-relative URL.
    pub fn url_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Episodes => "/episodes/".to_string(),
            Self::Episode(id) => format!("/episodes/{id}/"),
            Self::Blog => "/blog/".to_string(),
            Self::Post(slug) => format!("/blog/{slug}/"),
            Self::Hosts => "/hosts/".to_string(),
            Self::Page(slug) => format!("/{slug}/"),
            Self::NotFound => "/404.html".to_string(),
        }
    }

    /// File under `output` this route is written to.
    ///
    /// Directory-style URLs map to `index.html` inside them.
    pub fn output_path(&self, output: &Path) -> PathBuf {
        let url = self.url_path();
        let relative = url.trim_start_matches('/');
        if relative.is_empty() || url.ends_with('/') {
            output.join(relative).join("index.html")
        } else {
            output.join(relative)
        }
    }
}

/// Read-only rendering context.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub data: &'a SiteData,
}

impl<'a> Site<'a> {
    pub fn new(config: &'a SiteConfig, data: &'a SiteData) -> Self {
        Self { config, data }
    }

    /// Every route of the site, in a stable order.
    pub fn routes(&self) -> Vec<Route> {
        let mut routes = vec![Route::Home, Route::Episodes, Route::Blog, Route::Hosts];
        routes.extend(self.data.episodes.iter().map(|e| Route::Episode(e.id)));
        routes.extend(self.data.posts.iter().map(|p| Route::Post(p.slug.clone())));
        routes.extend(self.data.pages.iter().map(|p| Route::Page(p.slug.clone())));
        routes.push(Route::NotFound);
        routes
    }

    /// Full HTML of `route`. `None` when it names a missing record.
    pub fn render(&self, route: &Route) -> Option<String> {
        let html = match route {
            Route::Home => home::render(self),
            Route::Episodes => {
                self.render_listing(&ListingView::derive(self.data, FilterState::cleared()))
            }
            Route::Episode(id) => episodes::detail(self, self.data.episode_by_id(*id)?),
            Route::Blog => blog::index(self),
            Route::Post(slug) => blog::post(self, self.data.post_by_slug(slug)?),
            Route::Hosts => hosts::render(self),
            Route::Page(slug) => pages::render(self, self.data.page_by_slug(slug)?),
            Route::NotFound => pages::not_found(self),
        };
        Some(html)
    }

    /// Listing page for a derived view.
    pub fn render_listing(&self, view: &ListingView<'_>) -> String {
        episodes::listing(self, view)
    }
}
