//! Search results: matching VTuber channels and a paginated list of songs.
//!
//! The backend returns every match in one response. Songs are revealed from memory
//! ten at a time through a [`ResultWindow`]; nothing is refetched while paging.

use crate::api_client::Backend;
use crate::foundation::models::{SearchParams, SearchResultSet, Song, VtuberSummary};
use crate::view::loader::{Fetcher, Loadable};
use crate::view::pagination::ResultWindow;
use std::sync::Arc;
use tracing::info;

pub const NO_SONGS: &str = "No songs found.";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub vtubers: Vec<VtuberSummary>,
    pub songs: ResultWindow<Song>,
}

impl From<SearchResultSet> for SearchOutcome {
    fn from(results: SearchResultSet) -> Self {
        Self {
            vtubers: results.vtubers,
            songs: ResultWindow::new(results.songs),
        }
    }
}

pub struct SearchPage {
    params: SearchParams,
    results: Fetcher<SearchOutcome>,
}

impl SearchPage {
    /// Mounts the page and issues the search, unless both the query and the channel id
    /// are blank.
    pub fn mount(backend: Arc<dyn Backend>, params: SearchParams) -> Self {
        let mut results = Fetcher::new("search");
        if !params.is_blank() {
            info!(query = params.query_text(), channel_id = ?params.channel_id, "searching");
            let request = params.clone();
            results.request(async move {
                backend
                    .search(&request)
                    .await
                    .map(SearchOutcome::from)
            });
        }
        Self { params, results }
    }

    pub async fn settled(&mut self) {
        self.results.settled().await;
    }

    pub fn unauthorized(&self) -> bool {
        self.results.unauthorized()
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn heading(&self) -> String {
        format!("Search results for '{}'", self.params.query_text())
    }

    pub fn is_loading(&self) -> bool {
        self.results.with_state(Loadable::is_loading)
    }

    /// Channels to list above the songs. Empty means the channel grid is hidden.
    pub fn vtubers(&self) -> Vec<VtuberSummary> {
        self.results
            .with_state(|state| state.ready().map(|o| o.vtubers.clone()))
            .unwrap_or_default()
    }

    pub fn shows_vtuber_grid(&self) -> bool {
        self.results.with_state(|state| {
            state
                .ready()
                .map(|o| !o.vtubers.is_empty())
                .unwrap_or(false)
        })
    }

    /// The songs revealed so far. A failed search shows none.
    pub fn visible_songs(&self) -> Vec<Song> {
        self.results
            .with_state(|state| state.ready().map(|o| o.songs.visible().to_vec()))
            .unwrap_or_default()
    }

    pub fn total_songs(&self) -> usize {
        self.results
            .with_state(|state| state.ready().map(|o| o.songs.total()))
            .unwrap_or(0)
    }

    pub fn load_more_offered(&self) -> bool {
        self.results.with_state(|state| {
            state
                .ready()
                .map(|o| o.songs.load_more_offered())
                .unwrap_or(false)
        })
    }

    /// Reveals the next ten songs. Returns how many were added.
    pub fn load_more(&mut self) -> usize {
        self.results
            .with_ready_mut(|o| o.songs.load_more())
            .unwrap_or(0)
    }
}
