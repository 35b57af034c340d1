//! Episode listing: filtering, tag catalog and URL-backed filter state.
//!
//! [`ListingView::derive`] is the whole pipeline for one render:
//!
//! ```text
//! query string ─► FilterState ─► filter_episodes(newest first) ─► ListingView
//! ```

mod filter;
mod state;

pub use filter::{TagCatalog, filter_episodes};
pub use state::{FilterAction, FilterState, LISTING_PATH, ListingUi};

use crate::data::{Episode, SiteData};

/// Joins an episode's tags in the `data-tags` attribute the client script
/// splits on. `validate` rejects tags containing it.
pub const TAG_SEPARATOR: char = '|';

/// Everything the listing page renders, derived from the data and the URL.
#[derive(Debug, Clone)]
pub struct ListingView<'a> {
    pub state: FilterState,
    /// Matching episodes, newest first.
    pub visible: Vec<&'a Episode>,
    /// Counts over the full archive.
    pub catalog: TagCatalog,
    pub total: usize,
    pub ui: ListingUi,
}

impl<'a> ListingView<'a> {
    pub fn derive(data: &'a SiteData, state: FilterState) -> Self {
        let visible = filter_episodes(
            data.episodes_newest_first(),
            state.tag.as_deref(),
            &state.query,
        );
        Self {
            ui: ListingUi::on_load(&state),
            catalog: TagCatalog::from_episodes(&data.episodes),
            total: data.episodes.len(),
            visible,
            state,
        }
    }

    /// Derive from a raw query string such as `tag=Open+Source`.
    pub fn from_query(data: &'a SiteData, query: &str) -> Self {
        Self::derive(data, FilterState::from_query(query))
    }

    /// An active filter matched nothing: render "no results" with a reset link.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Link target of a listing control: the URL `action` leads to from
    /// this view's state.
    pub fn href_for(&self, action: FilterAction) -> String {
        let mut ui = self.ui;
        ui.dispatch(&self.state, action)
    }
}
