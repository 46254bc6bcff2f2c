//! The gender filter shared between views.
//!
//! One [`FilterContext`] is created per process and handed to every view that needs
//! it. Views that depend on the filter hold a [`FilterSubscription`] and refetch when
//! it reports a change. Nothing here is global.

use crate::foundation::models::GenderFilter;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FilterContext {
    sender: Arc<watch::Sender<GenderFilter>>,
}

impl FilterContext {
    pub fn new(initial: GenderFilter) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn get(&self) -> GenderFilter {
        *self.sender.borrow()
    }

    /// Writes a new filter value. Subscribers are only notified when it differs from
    /// the current one; the return value says whether it did.
    pub fn set(&self, value: GenderFilter) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
        if changed {
            debug!(filter = %value, "gender filter changed");
        }
        changed
    }

    pub fn subscribe(&self) -> FilterSubscription {
        FilterSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for FilterContext {
    fn default() -> Self {
        Self::new(GenderFilter::All)
    }
}

/// A view's dependency on the filter.
///
/// Changes made before the view looks are coalesced: it sees the latest value once.
#[derive(Debug)]
pub struct FilterSubscription {
    receiver: watch::Receiver<GenderFilter>,
}

impl FilterSubscription {
    /// The current value, marking it as seen.
    pub fn current(&mut self) -> GenderFilter {
        *self.receiver.borrow_and_update()
    }

    /// Returns the new value if it changed since last seen, without waiting.
    pub fn take_change(&mut self) -> Option<GenderFilter> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.current()),
            _ => None,
        }
    }

    /// Waits for the next change. `None` once the context is gone.
    pub async fn changed(&mut self) -> Option<GenderFilter> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }
}
