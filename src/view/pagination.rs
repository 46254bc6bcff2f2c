//! Client-side pagination over a fully transferred result list.

/// Number of items each "load more" step reveals.
pub const PAGE_SIZE: usize = 10;

/// A growing prefix of a result list fetched once.
///
/// The full list is held for the lifetime of the window and never refetched. The
/// visible prefix only grows, ten items at a time, and once a step reveals fewer than
/// [`PAGE_SIZE`] items the window reports that nothing more is available, for good.
///
/// # Examples
///
/// ```
/// use vsong::view::ResultWindow;
///
/// let mut window = ResultWindow::new((1..=23).collect::<Vec<u32>>());
/// assert_eq!(window.visible().len(), 10);
///
/// window.load_more();
/// assert_eq!(window.visible().len(), 20);
/// assert!(window.load_more_offered());
///
/// window.load_more();
/// assert_eq!(window.visible().len(), 23);
/// assert!(!window.load_more_offered());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResultWindow<T> {
    full: Vec<T>,
    visible_len: usize,
    has_more: bool,
}

impl<T> ResultWindow<T> {
    pub fn new(full: Vec<T>) -> Self {
        let visible_len = full.len().min(PAGE_SIZE);
        let has_more = !full.is_empty();
        Self {
            full,
            visible_len,
            has_more,
        }
    }

    pub fn visible(&self) -> &[T] {
        &self.full[..self.visible_len]
    }

    pub fn total(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a "load more" control should be shown.
    pub fn load_more_offered(&self) -> bool {
        self.has_more && !self.full.is_empty()
    }

    /// Reveals the next page and returns how many items were appended.
    pub fn load_more(&mut self) -> usize {
        let end = (self.visible_len + PAGE_SIZE).min(self.full.len());
        let appended = end - self.visible_len;
        self.visible_len = end;

        if appended < PAGE_SIZE {
            self.has_more = false;
        }
        appended
    }
}

impl<T> Default for ResultWindow<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
