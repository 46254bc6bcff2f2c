//! The ranking sidebar: weekly, daily and shorts charts.

use crate::api_client::Backend;
use crate::foundation::models::{ChartKind, MainPageData, Song};
use crate::view::loader::{Fetcher, Loadable};
use crate::view::modal::VideoModal;
use std::sync::Arc;

pub const CHART_FOOTER: &str = "Updated Mondays 00:00";
pub const EMPTY_CHART: &str = "No chart available.";
pub const CHART_LOADING: &str = "Loading charts...";
pub const CHART_ERROR: &str = "Something went wrong while loading the charts.";

#[derive(Debug, Clone, PartialEq)]
pub enum ChartDisplay {
    Loading,
    Error(&'static str),
    Chart {
        title: &'static str,
        entries: Vec<Song>,
    },
}

pub struct ChartPanel {
    data: Fetcher<MainPageData>,
    selected: ChartKind,
    modal: VideoModal,
}

impl ChartPanel {
    /// Mounts the panel with the weekly chart selected and fetches all charts once.
    pub fn mount(backend: Arc<dyn Backend>) -> Self {
        let mut data = Fetcher::new("charts");
        data.request(async move { backend.fetch_charts().await });
        Self {
            data,
            selected: ChartKind::default(),
            modal: VideoModal::default(),
        }
    }

    pub async fn settled(&mut self) {
        self.data.settled().await;
    }

    pub fn unauthorized(&self) -> bool {
        self.data.unauthorized()
    }

    pub fn select(&mut self, kind: ChartKind) {
        self.selected = kind;
    }

    pub fn selected(&self) -> ChartKind {
        self.selected
    }

    pub fn display(&self) -> ChartDisplay {
        self.data.with_state(|state| match state {
            Loadable::Idle | Loadable::Loading { .. } => ChartDisplay::Loading,
            Loadable::Failed { .. } => ChartDisplay::Error(CHART_ERROR),
            Loadable::Ready(data) => ChartDisplay::Chart {
                title: chart_title(self.selected),
                entries: chart_entries(data, self.selected).to_vec(),
            },
        })
    }

    /// Opens the player for the entry at a 1-based rank of the selected chart.
    pub fn play_rank(&mut self, rank: usize) -> bool {
        let video_id = self.data.with_state(|state| {
            state
                .ready()
                .and_then(|data| chart_entries(data, self.selected).get(rank.checked_sub(1)?))
                .map(|song| song.video_id.clone())
        });
        match video_id {
            Some(id) => {
                self.modal.open(&id);
                true
            }
            None => false,
        }
    }

    pub fn modal(&self) -> &VideoModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut VideoModal {
        &mut self.modal
    }
}

pub fn chart_title(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Weekly => "Weekly top songs",
        ChartKind::Daily => "Daily top songs",
        ChartKind::Shorts => "Weekly top shorts",
    }
}

fn chart_entries(data: &MainPageData, kind: ChartKind) -> &[Song] {
    match kind {
        ChartKind::Weekly => &data.top10_weekly_songs,
        ChartKind::Daily => &data.top10_daily_songs,
        ChartKind::Shorts => &data.top10_weekly_shorts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{ApiError, MockBackend};

    fn song(id: i64, video_id: &str) -> Song {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Song {id}"),
            "vtuberName": "Pekora",
            "videoId": video_id,
        }))
        .unwrap()
    }

    fn chart_data() -> MainPageData {
        MainPageData {
            top10_weekly_songs: vec![song(1, "w1"), song(2, "w2")],
            top10_daily_songs: vec![song(3, "d1")],
            top10_weekly_shorts: Vec::new(),
            ..MainPageData::default()
        }
    }

    #[tokio::test]
    async fn test_charts_switch_without_refetch() {
        let mut mock = MockBackend::new();
        mock.expect_fetch_charts()
            .times(1)
            .returning(|| Ok(chart_data()));

        let mut panel = ChartPanel::mount(Arc::new(mock));
        assert_eq!(panel.display(), ChartDisplay::Loading);
        panel.settled().await;

        match panel.display() {
            ChartDisplay::Chart { title, entries } => {
                assert_eq!(title, "Weekly top songs");
                assert_eq!(entries.len(), 2);
            }
            other => panic!("unexpected display: {other:?}"),
        }

        panel.select(ChartKind::Daily);
        match panel.display() {
            ChartDisplay::Chart { title, entries } => {
                assert_eq!(title, "Daily top songs");
                assert_eq!(entries[0].video_id, "d1");
            }
            other => panic!("unexpected display: {other:?}"),
        }

        panel.select(ChartKind::Shorts);
        assert!(matches!(
            panel.display(),
            ChartDisplay::Chart { entries, .. } if entries.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_error() {
        let mut mock = MockBackend::new();
        mock.expect_fetch_charts().returning(|| {
            Err(ApiError::EmptyBody {
                url: "http://site.test/api/main".to_string(),
            })
        });

        let mut panel = ChartPanel::mount(Arc::new(mock));
        panel.settled().await;
        assert_eq!(panel.display(), ChartDisplay::Error(CHART_ERROR));
    }

    #[tokio::test]
    async fn test_play_rank_opens_modal() {
        let mut mock = MockBackend::new();
        mock.expect_fetch_charts().returning(|| Ok(chart_data()));

        let mut panel = ChartPanel::mount(Arc::new(mock));
        panel.settled().await;

        assert!(!panel.play_rank(0));
        assert!(!panel.play_rank(3));
        assert!(panel.play_rank(2));
        assert_eq!(panel.modal().video_id(), Some("w2"));

        panel.modal_mut().handle_key("Escape");
        assert!(!panel.modal().is_open());
    }
}
