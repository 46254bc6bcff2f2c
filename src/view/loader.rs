//! Fetch state for views, guarded by request generation.
//!
//! Every request a view issues gets a new generation number. A response is applied
//! only while its generation is still the latest one, so a slow response to an older
//! request can never overwrite the answer to a newer one. Superseded requests and the
//! requests of a dropped view are aborted as well.

use crate::api_client::ApiError;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Idle,
    Loading {
        generation: u64,
    },
    Ready(T),
    Failed {
        message: String,
        /// The backend rejected the session rather than the request.
        unauthorized: bool,
    },
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Failed { unauthorized: true, .. })
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn defer(&mut self, generation: u64) {
        *self = Self::Loading { generation };
    }

    /// Applies a result if it answers the request currently awaited.
    ///
    /// Returns false and leaves the state untouched for any other generation.
    pub fn update(&mut self, generation: u64, result: Result<T, ApiError>) -> bool {
        if !matches!(self, Self::Loading { generation: g } if *g == generation) {
            return false;
        }
        *self = match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed {
                message: err.to_string(),
                unauthorized: err.is_unauthorized(),
            },
        };
        true
    }
}

/// Owns the state of one data dependency of a view and its in-flight request.
pub struct Fetcher<T> {
    label: &'static str,
    state: Arc<Mutex<Loadable<T>>>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Fetcher<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: Arc::new(Mutex::new(Loadable::Idle)),
            generation: 0,
            task: None,
        }
    }

    /// Starts a request, superseding any request still in flight.
    ///
    /// Returns the generation assigned to the new request.
    pub fn request<F>(&mut self, fetch: F) -> u64
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if let Some(previous) = self.task.take() {
            previous.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        lock(&self.state).defer(generation);

        let state = Arc::clone(&self.state);
        let label = self.label;
        self.task = Some(tokio::spawn(async move {
            let result = fetch.await;
            match &result {
                Err(err) if err.is_empty_result() => warn!(view = label, %err, "nothing to show"),
                Err(err) => error!(view = label, %err, "fetch failed"),
                Ok(_) => {}
            }
            if !lock(&state).update(generation, result) {
                debug!(view = label, generation, "discarding stale response");
            }
        }));
        generation
    }

    /// Waits until the current request, if any, has been applied.
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take() {
            // a cancelled task has nothing left to apply
            let _ = task.await;
        }
    }

    /// Whether the last request failed because the session was rejected.
    pub fn unauthorized(&self) -> bool {
        lock(&self.state).is_unauthorized()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&Loadable<T>) -> R) -> R {
        f(&lock(&self.state))
    }

    /// Runs `f` on the loaded value, if there is one.
    pub fn with_ready_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        lock(&self.state).ready_mut().map(f)
    }

    pub fn snapshot(&self) -> Loadable<T>
    where
        T: Clone,
    {
        lock(&self.state).clone()
    }
}

impl<T> Drop for Fetcher<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn lock<T>(state: &Mutex<Loadable<T>>) -> MutexGuard<'_, Loadable<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
