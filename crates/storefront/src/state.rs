//! Application state shared across handlers.

use std::sync::Arc;

use celestial_gems_core::Catalog;
use sqlx::PgPool;

use crate::claude::{ClaudeClient, ClaudeError};
use crate::config::StorefrontConfig;
use crate::search::SearchDebouncer;
use crate::services::{EmailService, SeoService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    email: EmailService,
    seo: Option<SeoService>,
    debouncer: SearchDebouncer,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create the application state.
    ///
    /// The SEO tool is enabled only when Claude is configured. `pool` is the
    /// session database, if any; readiness checks ping it.
    ///
    /// # Errors
    ///
    /// Returns an error if the Claude client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        email: EmailService,
        pool: Option<PgPool>,
    ) -> Result<Self, ClaudeError> {
        let seo = config
            .claude
            .as_ref()
            .map(ClaudeClient::new)
            .transpose()?
            .map(SeoService::new);
        let debouncer = SearchDebouncer::new(config.search_debounce);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                email,
                seo,
                debouncer,
                pool,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// SEO service, `None` when no Claude API key is configured.
    #[must_use]
    pub fn seo(&self) -> Option<&SeoService> {
        self.inner.seo.as_ref()
    }

    #[must_use]
    pub fn debouncer(&self) -> &SearchDebouncer {
        &self.inner.debouncer
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
