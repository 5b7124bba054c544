//! Per-visitor request serialization.
//!
//! Each request works on its own copy of the session record, and the session
//! layer writes that whole record back once the handler is done. Two
//! overlapping requests from one visitor would each start from the same
//! copy and the later write would drop the earlier one's changes.
//!
//! This layer sits outside the session layer. It hands every request a
//! [`VisitorLock`] keyed by the session cookie; the [`Shopper`] extractor
//! takes the lock before the session is first read, and the guard is only
//! released here, after the session layer has saved. Requests that never
//! open a `Shopper` (static files, typeahead) never wait.
//!
//! [`Shopper`]: super::Shopper

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;

const IDLE_EXPIRY: Duration = Duration::from_secs(10 * 60);
const MAX_VISITORS: u64 = 10_000;

/// One mutex per session cookie.
#[derive(Clone)]
pub struct VisitorLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl Default for VisitorLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitorLocks {
    #[must_use]
    pub fn new() -> Self {
        let locks = Cache::builder()
            .max_capacity(MAX_VISITORS)
            .time_to_idle(IDLE_EXPIRY)
            .build();
        Self { locks }
    }

    async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(key.to_string(), async { Arc::new(Mutex::new(())) })
            .await
    }

    /// A request-scoped handle for the visitor identified by `key`.
    ///
    /// `None` (no session cookie yet) yields a handle that never blocks: a
    /// request without a cookie always gets a fresh session of its own.
    #[must_use]
    pub fn handle(&self, key: Option<String>) -> VisitorLock {
        VisitorLock {
            locks: self.clone(),
            key,
            held: Arc::new(OnceLock::new()),
        }
    }
}

/// The current request's claim on its visitor's lock.
///
/// Clones share the guard; it is released when the last clone is dropped.
#[derive(Clone)]
pub struct VisitorLock {
    locks: VisitorLocks,
    key: Option<String>,
    held: Arc<OnceLock<OwnedMutexGuard<()>>>,
}

impl VisitorLock {
    /// Wait for the visitor's lock. A second call in the same request is a
    /// no-op.
    pub async fn acquire(&self) {
        let Some(key) = &self.key else {
            return;
        };
        if self.held.get().is_some() {
            return;
        }
        let guard = self.locks.lock_for(key).await.lock_owned().await;
        if self.held.set(guard).is_err() {
            tracing::debug!("visitor lock already held by this request");
        }
    }

    /// Whether this request currently holds the lock.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.get().is_some()
    }
}

/// Attach a [`VisitorLock`] to the request and keep its guard alive until
/// the response, session write included, has been produced.
pub async fn visitor_lock_middleware(
    State(locks): State<VisitorLocks>,
    mut request: Request,
    next: Next,
) -> Response {
    let lock = locks.handle(session_cookie(request.headers()));
    request.extensions_mut().insert(lock.clone());

    let response = next.run(request).await;
    drop(lock);
    response
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_session_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; cg_session=abc123; other=1"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_no_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_cookie(&headers), None);
        assert_eq!(session_cookie(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_same_visitor_is_serialized() {
        let locks = VisitorLocks::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let lock = locks.handle(Some("visitor".to_string()));
            let (inside, overlaps) = (Arc::clone(&inside), Arc::clone(&overlaps));
            tasks.spawn(async move {
                lock.acquire().await;
                if inside.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
                drop(lock);
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_guard_outlives_extractor_clone() {
        let locks = VisitorLocks::new();
        let request_lock = locks.handle(Some("visitor".to_string()));
        let extractor_copy = request_lock.clone();
        extractor_copy.acquire().await;
        drop(extractor_copy);
        assert!(request_lock.is_held());

        let next = locks.handle(Some("visitor".to_string()));
        let waiting = tokio::time::timeout(Duration::from_millis(20), next.acquire()).await;
        assert!(waiting.is_err());

        drop(request_lock);
        next.acquire().await;
        assert!(next.is_held());
    }

    #[tokio::test]
    async fn test_no_cookie_never_blocks() {
        let locks = VisitorLocks::new();
        let a = locks.handle(None);
        let b = locks.handle(None);
        a.acquire().await;
        b.acquire().await;
        assert!(!a.is_held());
    }

    #[tokio::test]
    async fn test_acquire_twice_in_one_request() {
        let lock = VisitorLocks::new().handle(Some("visitor".to_string()));
        lock.acquire().await;
        lock.acquire().await;
        assert!(lock.is_held());
    }
}
