//! Debounced search
//!
//! Each scheduled search waits out the debounce delay on its own task. Scheduling again aborts
//! the previous task, so only the most recent search is ever awaited and a superseded result is
//! never handed back. A task that dies without finishing surfaces as a failed search.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    gateway::{Backend, GatewayError, load_lessons},
    lessons::LessonRecord,
};

/// Debounce delay used when none is configured.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Outcome of a search that survived the debounce window.
#[derive(Debug)]
pub struct SearchCompletion {
    /// Generation the search was scheduled under
    pub generation: u64,

    /// Query as typed
    pub query: String,

    /// Lessons returned by the backend
    pub result: Result<Vec<LessonRecord>, GatewayError>,
}

#[derive(Debug)]
struct PendingSearch {
    generation: u64,
    query: String,
    handle: JoinHandle<Result<Vec<LessonRecord>, GatewayError>>,
}

/// Schedules searches so only the last one in a burst reaches the backend.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: u64,
    pending: Option<PendingSearch>,
}

impl SearchDebouncer {
    /// Create a debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Debounce delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a search, superseding any search still waiting or in flight.
    ///
    /// Must be called from within a tokio runtime. Returns the generation of the new search.
    pub fn schedule(&mut self, backend: Arc<dyn Backend>, query: impl Into<String>) -> u64 {
        self.cancel();

        self.generation = self.generation.wrapping_add(1);

        let generation = self.generation;
        let query = query.into();
        let delay = self.delay;
        let task_query = query.clone();

        debug!(generation, query = query.as_str(), "scheduled search");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            load_lessons(backend.as_ref(), &task_query).await
        });

        self.pending = Some(PendingSearch {
            generation,
            query,
            handle,
        });

        generation
    }

    /// Cancel the pending search, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();

            debug!(generation = pending.generation, "cancelled pending search");
        }
    }

    /// Whether `generation` is the most recently scheduled search.
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation)
    }

    /// Whether a search is waiting out its delay or awaiting the backend.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the current search to complete.
    ///
    /// Returns `None` when nothing is pending. If the search task panics, the completion carries
    /// a [`GatewayError::UnexpectedResponse`].
    pub async fn next_completion(&mut self) -> Option<SearchCompletion> {
        let pending = self.pending.as_mut()?;
        let joined = (&mut pending.handle).await;

        let PendingSearch {
            generation, query, ..
        } = self.pending.take()?;

        let result = joined.unwrap_or_else(|err| {
            warn!(generation, error = %err, "search task failed");

            Err(GatewayError::UnexpectedResponse(format!(
                "search task failed: {err}"
            )))
        });

        Some(SearchCompletion {
            generation,
            query,
            result,
        })
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
