//! The profile page of one VTuber channel with its registered songs.

use crate::api_client::Backend;
use crate::foundation::models::{channel_url, Song, VtuberDetail};
use crate::view::loader::{Fetcher, Loadable};
use crate::view::modal::VideoModal;
use std::sync::Arc;

pub const DETAIL_LOADING: &str = "Loading...";
pub const DETAIL_ERROR: &str = "Could not load this channel.";
pub const NO_REGISTERED_SONGS: &str = "No registered songs.";

pub struct VtuberDetailPage {
    channel_id: String,
    detail: Fetcher<VtuberDetail>,
    songs: Fetcher<Vec<Song>>,
    modal: VideoModal,
}

impl VtuberDetailPage {
    /// Mounts the page; profile and songs are fetched independently.
    pub fn mount(backend: Arc<dyn Backend>, channel_id: &str) -> Self {
        let mut detail = Fetcher::new("vtuber_detail");
        let mut songs = Fetcher::new("vtuber_songs");

        let (b, id) = (Arc::clone(&backend), channel_id.to_string());
        detail.request(async move { b.vtuber_details(&id).await });

        let id = channel_id.to_string();
        songs.request(async move { backend.vtuber_songs(&id).await });

        Self {
            channel_id: channel_id.to_string(),
            detail,
            songs,
            modal: VideoModal::default(),
        }
    }

    pub async fn settled(&mut self) {
        self.detail.settled().await;
        self.songs.settled().await;
    }

    /// Whether either request was turned away because the session is no longer valid.
    pub fn unauthorized(&self) -> bool {
        self.detail.unauthorized() || self.songs.unauthorized()
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn channel_url(&self) -> String {
        channel_url(&self.channel_id)
    }

    /// The profile, or the message to show instead of it.
    pub fn detail(&self) -> Result<VtuberDetail, &'static str> {
        self.detail.with_state(|state| match state {
            Loadable::Ready(detail) => Ok(detail.clone()),
            Loadable::Failed { .. } => Err(DETAIL_ERROR),
            Loadable::Idle | Loadable::Loading { .. } => Err(DETAIL_LOADING),
        })
    }

    /// Registered songs. Empty while loading or after a failed fetch.
    pub fn songs(&self) -> Vec<Song> {
        self.songs
            .with_state(|state| state.ready().cloned())
            .unwrap_or_default()
    }

    /// Opens the player for the song at a 1-based position in the list.
    pub fn play(&mut self, position: usize) -> bool {
        let video_id = self.songs.with_state(|state| {
            state
                .ready()
                .and_then(|songs| songs.get(position.checked_sub(1)?))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{ApiError, MockBackend};
    use crate::foundation::models::Gender;
    use mockall::predicate::eq;
    use reqwest::StatusCode;

    fn detail() -> VtuberDetail {
        serde_json::from_value(serde_json::json!({
            "channelId": "UCx",
            "name": "Kobo",
            "subscribers": 2100000,
            "gender": null,
            "songCount": 2,
            "channelImg": "https://example.com/kobo.png",
        }))
        .unwrap()
    }

    fn songs() -> Vec<Song> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "videoId": "a", "title": "One", "viewCount": 1000, "publishedAt": "2024-01-02T00:00:00"},
            {"id": 2, "videoId": "b", "title": "Two", "viewCount": 20, "publishedAt": "2024-02-03T00:00:00"},
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_loads_profile_and_songs() {
        let mut mock = MockBackend::new();
        mock.expect_vtuber_details()
            .with(eq("UCx"))
            .times(1)
            .returning(|_| Ok(detail()));
        mock.expect_vtuber_songs()
            .with(eq("UCx"))
            .times(1)
            .returning(|_| Ok(songs()));

        let mut page = VtuberDetailPage::mount(Arc::new(mock), "UCx");
        page.settled().await;

        let profile = page.detail().unwrap();
        assert_eq!(profile.name, "Kobo");
        assert_eq!(profile.gender, Gender::Mixed);
        assert_eq!(page.songs().len(), 2);
        assert_eq!(page.channel_url(), "https://www.youtube.com/channel/UCx");
    }

    #[tokio::test]
    async fn test_song_failure_does_not_hide_profile() {
        let mut mock = MockBackend::new();
        mock.expect_vtuber_details().returning(|_| Ok(detail()));
        mock.expect_vtuber_songs().returning(|_| {
            Err(ApiError::status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "http://api.test/api/v1/vtubers/UCx/songs",
            ))
        });

        let mut page = VtuberDetailPage::mount(Arc::new(mock), "UCx");
        page.settled().await;

        assert!(page.detail().is_ok());
        assert!(page.songs().is_empty());
    }

    #[tokio::test]
    async fn test_missing_profile_shows_error() {
        let mut mock = MockBackend::new();
        mock.expect_vtuber_details().returning(|_| {
            Err(ApiError::status(
                StatusCode::NOT_FOUND,
                "http://api.test/api/v1/vtubers/nope/details",
            ))
        });
        mock.expect_vtuber_songs().returning(|_| Ok(Vec::new()));

        let mut page = VtuberDetailPage::mount(Arc::new(mock), "nope");
        assert_eq!(page.detail(), Err(DETAIL_LOADING));

        page.settled().await;
        assert_eq!(page.detail(), Err(DETAIL_ERROR));
        assert!(!page.unauthorized());
    }

    #[tokio::test]
    async fn test_rejected_session_is_reported() {
        let mut mock = MockBackend::new();
        mock.expect_vtuber_details().returning(|_| {
            Err(ApiError::status(
                StatusCode::UNAUTHORIZED,
                "http://api.test/api/v1/vtubers/UCx/details",
            ))
        });
        mock.expect_vtuber_songs().returning(|_| Ok(songs()));

        let mut page = VtuberDetailPage::mount(Arc::new(mock), "UCx");
        page.settled().await;

        assert!(page.unauthorized());
        assert_eq!(page.detail(), Err(DETAIL_ERROR));
        assert_eq!(page.songs().len(), 2);
    }

    #[tokio::test]
    async fn test_play_opens_modal() {
        let mut mock = MockBackend::new();
        mock.expect_vtuber_details().returning(|_| Ok(detail()));
        mock.expect_vtuber_songs().returning(|_| Ok(songs()));

        let mut page = VtuberDetailPage::mount(Arc::new(mock), "UCx");
        page.settled().await;

        assert!(!page.play(5));
        assert!(page.play(2));
        assert_eq!(
            page.modal().embed_url().as_deref(),
            Some("https://www.youtube.com/embed/b")
        );
    }
}
