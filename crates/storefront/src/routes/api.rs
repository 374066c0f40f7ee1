//! JSON cart blob API.
//!
//! The body is the same array the cart is persisted as in the session
//! (`[{"name", "price", "price2"?, "qty", "image"}]`), so a cart exported
//! from one device can be restored on another.

use axum::{Json, http::StatusCode};
use tower_sessions::Session;
use tracing::instrument;
use usuba_core::Cart;

use crate::error::{Result, add_breadcrumb};
use crate::models::session_keys;
use crate::services::cart_session::load_cart;

/// Return the persisted cart.
#[instrument(skip(session))]
pub async fn get_cart(session: Session) -> Json<Cart> {
    Json(load_cart(&session).await)
}

/// Replace the cart with the posted blob.
///
/// Malformed bodies replace the cart with an empty one, matching how an
/// unreadable session value is treated.
#[instrument(skip(session, body))]
pub async fn put_cart(session: Session, body: String) -> Result<(StatusCode, Json<Cart>)> {
    let cart = Cart::from_json_lossy(&body);
    session.insert(session_keys::CART, &cart).await?;

    add_breadcrumb("cart", "Replaced cart from blob", None);
    tracing::info!(lines = cart.lines().len(), "Replaced cart from blob");

    Ok((StatusCode::OK, Json(cart)))
}
