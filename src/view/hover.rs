//! Delayed hover state for video cards.
//!
//! Entering and leaving each schedule a state change after a short delay. Each event
//! cancels the opposite pending change, so a pointer that only passes over a card
//! never flips it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

pub const HOVER_DELAY: Duration = Duration::from_millis(250);

pub struct HoverIntent {
    delay: Duration,
    hovered: Arc<AtomicBool>,
    enter_timer: Option<JoinHandle<()>>,
    leave_timer: Option<JoinHandle<()>>,
}

impl HoverIntent {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hovered: Arc::new(AtomicBool::new(false)),
            enter_timer: None,
            leave_timer: None,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered.load(Ordering::Acquire)
    }

    pub fn pointer_enter(&mut self) {
        cancel(&mut self.leave_timer);
        cancel(&mut self.enter_timer);
        self.enter_timer = Some(self.schedule(true));
    }

    pub fn pointer_leave(&mut self) {
        cancel(&mut self.enter_timer);
        cancel(&mut self.leave_timer);
        self.leave_timer = Some(self.schedule(false));
    }

    fn schedule(&self, value: bool) -> JoinHandle<()> {
        let deadline = Instant::now() + self.delay;
        let hovered = Arc::clone(&self.hovered);
        tokio::spawn(async move {
            sleep_until(deadline).await;
            hovered.store(value, Ordering::Release);
        })
    }
}

impl Default for HoverIntent {
    fn default() -> Self {
        Self::new(HOVER_DELAY)
    }
}

impl Drop for HoverIntent {
    fn drop(&mut self) {
        cancel(&mut self.enter_timer);
        cancel(&mut self.leave_timer);
    }
}

fn cancel(timer: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = timer.take() {
        handle.abort();
    }
}
