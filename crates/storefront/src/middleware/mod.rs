//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on cart actions (governor)

pub mod htmx;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use htmx::HxRequest;
pub use rate_limit::api_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
