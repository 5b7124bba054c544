//! The `Shopper` extractor: a session-backed store for one request.
//!
//! Opening a `Shopper` takes the visitor's [`VisitorLock`], so handlers that
//! read and write the session never interleave for the same visitor.

use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::request::Parts};
use celestial_gems_core::ShopStore;
use tower_sessions::Session;
use uuid::Uuid;

use super::VisitorLock;
use crate::error::AppError;
use crate::models::{SessionSlots, session_keys};

/// The visitor's cart, wishlist and recent searches.
///
/// Derefs to [`ShopStore`]. Mutations are buffered; call
/// [`save`](Self::save) before responding to persist them.
///
/// ```rust,ignore
/// async fn add(mut shopper: Shopper, ...) -> Result<impl IntoResponse> {
///     let notification = shopper.add_to_cart(product);
///     shopper.save().await?;
///     ...
/// }
/// ```
pub struct Shopper {
    session: Session,
    store: ShopStore<SessionSlots>,
}

impl Shopper {
    /// Flush changed slots to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store rejects the write.
    pub async fn save(&mut self) -> Result<(), AppError> {
        let slots = self.store.storage_mut();
        if slots.is_dirty() {
            slots.flush(&self.session).await?;
        }
        Ok(())
    }

    /// Give the visitor a stable id (the typeahead debounce key) on first use.
    async fn ensure_visitor_id(&self) -> Result<(), AppError> {
        let known = self
            .session
            .get::<String>(session_keys::VISITOR_ID)
            .await?
            .is_some();
        if !known {
            let id = Uuid::new_v4().to_string();
            self.session.insert(session_keys::VISITOR_ID, &id).await?;
        }
        Ok(())
    }
}

impl Deref for Shopper {
    type Target = ShopStore<SessionSlots>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl DerefMut for Shopper {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;
        let lock = parts
            .extensions
            .get::<VisitorLock>()
            .cloned()
            .ok_or_else(|| AppError::Internal("visitor lock layer missing".to_string()))?;

        lock.acquire().await;
        let slots = SessionSlots::load(&session).await;
        let shopper = Self {
            session,
            store: ShopStore::open(slots),
        };
        // A new visitor needs the session cookie on this first response so
        // that its follow-up requests share one lock.
        shopper.ensure_visitor_id().await?;
        Ok(shopper)
    }
}
