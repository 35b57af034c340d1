//! Listing filter state and its URL form.
//!
//! The query string of `/episodes/` is the only place filter state lives.
//! [`FilterState::from_query`] and [`FilterState::to_query_string`] are the
//! two directions of that mapping. User actions never mutate a state in
//! place; [`ListingUi::dispatch`] returns the URL to replace the current one
//! with, and the view is derived again from that URL.

use serde::Serialize;
use url::form_urlencoded;

pub const LISTING_PATH: &str = "/episodes/";
pub const TAG_PARAM: &str = "tag";
pub const QUERY_PARAM: &str = "q";

/// Filter inputs of the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Exact tag, `None` for all episodes.
    pub tag: Option<String>,
    /// Free-text search, empty for none.
    pub query: String,
}

impl FilterState {
    pub fn new(tag: Option<&str>, query: &str) -> Self {
        Self {
            tag: tag.filter(|t| !t.is_empty()).map(str::to_string),
            query: query.to_string(),
        }
    }

    /// Read `tag` and `q` from a query string (with or without the `?`).
    ///
    /// The first occurrence of each wins. An empty `tag` means no tag.
    /// Unrelated parameters are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut tag = None;
        let mut text = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                TAG_PARAM if tag.is_none() => tag = Some(value.into_owned()),
                QUERY_PARAM if text.is_none() => text = Some(value.into_owned()),
                _ => {}
            }
        }
        Self::new(tag.as_deref(), text.as_deref().unwrap_or_default())
    }

    /// `tag=...&q=...`, omitting inactive filters. Empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(tag) = &self.tag {
            serializer.append_pair(TAG_PARAM, tag);
        }
        if !self.query.is_empty() {
            serializer.append_pair(QUERY_PARAM, &self.query);
        }
        serializer.finish()
    }

    /// Listing URL for this state.
    pub fn href(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            LISTING_PATH.to_string()
        } else {
            format!("{LISTING_PATH}?{query}")
        }
    }

    pub fn with_tag(&self, tag: Option<&str>) -> Self {
        Self::new(tag, &self.query)
    }

    pub fn with_query(&self, query: &str) -> Self {
        Self::new(self.tag.as_deref(), query)
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.tag.is_some() || !self.query.is_empty()
    }
}

/// User interactions on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Pick a tag, or `None` for "All Episodes".
    SelectTag(Option<String>),
    /// Search box contents changed.
    Search(String),
    /// "Clear filters" from the no-results state.
    Reset,
}

/// Local UI state that does not belong in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingUi {
    pub panel_expanded: bool,
}

impl ListingUi {
    /// Panel starts open when the page is loaded with an active filter.
    pub fn on_load(state: &FilterState) -> Self {
        Self {
            panel_expanded: state.is_active(),
        }
    }

    /// Apply `action` against the state read from the current URL.
    ///
    /// Returns the URL that should replace the current history entry.
    /// Selecting a tag also opens the panel.
    pub fn dispatch(&mut self, current: &FilterState, action: FilterAction) -> String {
        match action {
            FilterAction::SelectTag(tag) => {
                if tag.is_some() {
                    self.panel_expanded = true;
                }
                current.with_tag(tag.as_deref()).href()
            }
            FilterAction::Search(query) => current.with_query(&query).href(),
            FilterAction::Reset => FilterState::cleared().href(),
        }
    }
}
