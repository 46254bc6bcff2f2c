//! The landing page: recent and random songs and shorts for the current filter.

use crate::api_client::Backend;
use crate::foundation::models::{GenderFilter, MainPageData, Song};
use crate::view::filter::{FilterContext, FilterSubscription};
use crate::view::loader::{Fetcher, Loadable};
use std::sync::Arc;
use tracing::info;

const RECENT_SHORTS_SHOWN: usize = 10;
const RANDOM_SHORTS_SHOWN: usize = 9;

/// One titled grid of video cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub songs: Vec<Song>,
    /// Shown instead of the grid when `songs` is empty. `None` renders nothing.
    pub empty_message: Option<&'static str>,
}

pub struct MainPage {
    backend: Arc<dyn Backend>,
    filter: FilterSubscription,
    gender: GenderFilter,
    data: Fetcher<MainPageData>,
}

impl MainPage {
    /// Mounts the page and fetches data for the filter's current value.
    pub fn mount(backend: Arc<dyn Backend>, filter: &FilterContext) -> Self {
        let mut filter = filter.subscribe();
        let gender = filter.current();
        let mut page = Self {
            backend,
            filter,
            gender,
            data: Fetcher::new("main"),
        };
        page.fetch();
        page
    }

    fn fetch(&mut self) {
        info!(gender = %self.gender, "fetching main page data");
        let backend = Arc::clone(&self.backend);
        let gender = self.gender;
        self.data
            .request(async move { backend.fetch_main(gender).await });
    }

    /// Refetches if the filter changed since the last fetch.
    ///
    /// Returns whether a fetch was issued.
    pub fn sync_filter(&mut self) -> bool {
        match self.filter.take_change() {
            Some(gender) => {
                self.gender = gender;
                self.fetch();
                true
            }
            None => false,
        }
    }

    /// Waits for the next filter change and refetches. Returns false once the filter
    /// context is gone.
    pub async fn follow_filter(&mut self) -> bool {
        match self.filter.changed().await {
            Some(gender) => {
                self.gender = gender;
                self.fetch();
                true
            }
            None => false,
        }
    }

    pub async fn settled(&mut self) {
        self.data.settled().await;
    }

    pub fn unauthorized(&self) -> bool {
        self.data.unauthorized()
    }

    pub fn gender(&self) -> GenderFilter {
        self.gender
    }

    pub fn is_loading(&self) -> bool {
        self.data.with_state(|s| matches!(s, Loadable::Idle | Loadable::Loading { .. }))
    }

    /// The page's sections, or `None` while loading.
    ///
    /// A failed fetch renders the same sections with nothing in them.
    pub fn sections(&self) -> Option<Vec<Section>> {
        self.data.with_state(|state| match state {
            Loadable::Ready(data) => Some(build_sections(data)),
            Loadable::Failed { .. } => Some(build_sections(&MainPageData::default())),
            Loadable::Idle | Loadable::Loading { .. } => None,
        })
    }
}

fn build_sections(data: &MainPageData) -> Vec<Section> {
    vec![
        Section {
            title: "Latest songs",
            songs: data.top10_recent_songs.clone(),
            empty_message: None,
        },
        Section {
            title: "How about this song?",
            songs: data.random_songs.clone(),
            empty_message: None,
        },
        Section {
            title: "Latest shorts",
            songs: take(&data.top9_recent_shorts, RECENT_SHORTS_SHOWN),
            empty_message: Some("No recent shorts."),
        },
        Section {
            title: "How about these shorts?",
            songs: take(&data.random_shorts, RANDOM_SHORTS_SHOWN),
            empty_message: None,
        },
    ]
}

fn take(songs: &[Song], n: usize) -> Vec<Song> {
    songs.iter().take(n).cloned().collect()
}
