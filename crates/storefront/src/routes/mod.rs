//! HTTP route handlers for the menu site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Menu index
//! GET  /menu/{slug}            - Menu page with add buttons and cart widget
//! GET  /waiter                 - Full-page waiter summary
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Cart (HTMX fragments, redirect without HTMX)
//! POST /cart/add               - Add menu item (item + out-of-band widget)
//! POST /cart/lines/{index}     - Line action: inc | dec | del (widget)
//! POST /cart/clear             - Clear all (widget, HX-Refresh)
//! GET  /cart/widget            - Cart widget fragment
//! POST /cart/panel/toggle      - Open/close the cart panel
//! POST /cart/panel/close       - Close the cart panel
//! POST /cart/waiter/open       - Show to waiter
//! POST /cart/waiter/close      - Close waiter view
//!
//! # Cart blob API
//! GET  /api/cart               - Persisted cart as JSON
//! PUT  /api/cart               - Replace cart from JSON (lossy)
//! ```

pub mod api;
pub mod cart;
pub mod health;
pub mod menu;
pub mod waiter;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::api_rate_limiter;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/lines/{index}", post(cart::line))
        .route("/clear", post(cart::clear))
        .route("/widget", get(cart::widget))
        .route("/panel/toggle", post(cart::toggle_panel))
        .route("/panel/close", post(cart::close_panel))
        .route("/waiter/open", post(cart::open_waiter))
        .route("/waiter/close", post(cart::close_waiter))
}

/// Create the cart blob API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/cart", get(api::get_cart).put(api::put_cart))
}

/// Create all routes for the site.
///
/// Cart and API routes are rate limited per client IP when `rate_limit`
/// is set.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    let (cart, api) = if rate_limit {
        (
            cart_routes().layer(api_rate_limiter()),
            api_routes().layer(api_rate_limiter()),
        )
    } else {
        (cart_routes(), api_routes())
    };

    Router::new()
        .route("/", get(menu::index))
        .route("/menu/{slug}", get(menu::show))
        .route("/waiter", get(waiter::show))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/cart", cart)
        .nest("/api", api)
}
