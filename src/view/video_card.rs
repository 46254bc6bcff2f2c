use crate::foundation::models::{SearchParams, Song};
use crate::routes::Route;
use crate::view::hover::HoverIntent;
use crate::view::modal::VideoModal;

/// A song tile: thumbnail by default, details while hovered, player when clicked.
pub struct VideoCard {
    song: Song,
    hover: HoverIntent,
    modal: VideoModal,
}

impl VideoCard {
    pub fn new(song: Song) -> Self {
        Self {
            song,
            hover: HoverIntent::default(),
            modal: VideoModal::default(),
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn pointer_enter(&mut self) {
        self.hover.pointer_enter();
    }

    pub fn pointer_leave(&mut self) {
        self.hover.pointer_leave();
    }

    /// Whether the details layout is shown instead of the thumbnail.
    pub fn shows_details(&self) -> bool {
        self.hover.is_hovered()
    }

    pub fn click(&mut self) {
        self.modal.open(&self.song.video_id);
    }

    /// Clicking the channel name searches for the VTuber instead of opening the player.
    pub fn click_vtuber_name(&self) -> Route {
        Route::Search(SearchParams::by_query(&self.song.vtuber_name))
    }

    pub fn modal(&self) -> &VideoModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut VideoModal {
        &mut self.modal
    }
}
