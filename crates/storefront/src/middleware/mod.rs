//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID
//! 4. CSP nonce
//! 5. Security headers
//! 6. Visitor lock (serializes one visitor's session readers and writers)
//! 7. Session layer (tower-sessions)
//!
//! Rate limiting is applied per route on checkout and the SEO tool.

pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod shopper;
pub mod visitor_lock;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::{RateLimiterLayer, order_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use shopper::Shopper;
pub use visitor_lock::{VisitorLock, VisitorLocks, visitor_lock_middleware};
