//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions over a bounded moka store)

pub mod session;

pub use session::{SESSION_COOKIE_NAME, create_session_layer, create_session_store};
