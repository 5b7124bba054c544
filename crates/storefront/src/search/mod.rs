//! Typeahead debouncing.
//!
//! Scoring itself lives in `celestial_gems_core::search`. This module only
//! decides whether a suggest request is still the newest one for its visitor
//! once the quiet interval has passed.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use moka::future::Cache;

/// Pending-request generations are dropped after this much idle time.
const IDLE_EXPIRY: Duration = Duration::from_secs(10 * 60);
const MAX_VISITORS: u64 = 10_000;

/// Per-visitor cancellable delay for typeahead requests.
///
/// Every call to [`settle`](Self::settle) bumps the visitor's generation and
/// sleeps for the quiet interval. A request is superseded when another call
/// (or [`cancel`](Self::cancel)) bumped the generation while it slept.
#[derive(Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    generations: Cache<String, Arc<AtomicU64>>,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let generations = Cache::builder()
            .max_capacity(MAX_VISITORS)
            .time_to_idle(IDLE_EXPIRY)
            .build();
        Self { delay, generations }
    }

    /// Quiet interval applied to each request.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet interval.
    ///
    /// Returns `true` if this request should be scored, `false` if a newer
    /// request for the same key arrived in the meantime.
    pub async fn settle(&self, key: &str) -> bool {
        let generation = self.generation(key).await;
        let mine = generation.fetch_add(1, Ordering::SeqCst) + 1;

        if self.delay.is_zero() {
            return true;
        }

        tokio::time::sleep(self.delay).await;
        let current = generation.load(Ordering::SeqCst);
        if current != mine {
            tracing::debug!(key, "typeahead request superseded");
        }
        current == mine
    }

    /// Supersede any pending request for `key`.
    pub async fn cancel(&self, key: &str) {
        self.generation(key).await.fetch_add(1, Ordering::SeqCst);
    }

    async fn generation(&self, key: &str) -> Arc<AtomicU64> {
        self.generations
            .get_with(key.to_string(), async { Arc::new(AtomicU64::new(0)) })
            .await
    }
}
