use crate::foundation::models::embed_url;

/// Where a click inside an open modal landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    Backdrop,
    Content,
}

/// The embedded player overlay. Closed unless a video is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoModal {
    video_id: Option<String>,
}

impl VideoModal {
    pub fn open(&mut self, video_id: &str) {
        self.video_id = Some(video_id.to_string());
    }

    pub fn close(&mut self) {
        self.video_id = None;
    }

    pub fn is_open(&self) -> bool {
        self.video_id.is_some()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn embed_url(&self) -> Option<String> {
        self.video_id.as_deref().map(embed_url)
    }

    /// Escape closes the modal; every other key is ignored.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if self.is_open() && key == "Escape" {
            self.close();
            return true;
        }
        false
    }

    /// Clicking the backdrop closes the modal, clicks on the player do not.
    pub fn handle_click(&mut self, target: ModalClick) -> bool {
        if self.is_open() && target == ModalClick::Backdrop {
            self.close();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_embed() {
        let mut modal = VideoModal::default();
        assert!(!modal.is_open());
        assert_eq!(modal.embed_url(), None);

        modal.open("abc");
        assert_eq!(modal.video_id(), Some("abc"));
        assert_eq!(
            modal.embed_url().as_deref(),
            Some("https://www.youtube.com/embed/abc")
        );
    }

    #[test]
    fn test_escape_closes() {
        let mut modal = VideoModal::default();
        modal.open("abc");

        assert!(!modal.handle_key("Enter"));
        assert!(modal.is_open());

        assert!(modal.handle_key("Escape"));
        assert!(!modal.is_open());
        assert!(!modal.handle_key("Escape"));
    }

    #[test]
    fn test_only_backdrop_click_closes() {
        let mut modal = VideoModal::default();
        modal.open("abc");

        assert!(!modal.handle_click(ModalClick::Content));
        assert!(modal.is_open());

        assert!(modal.handle_click(ModalClick::Backdrop));
        assert!(!modal.is_open());
    }
}
