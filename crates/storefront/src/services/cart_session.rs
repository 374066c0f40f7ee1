//! Cart persistence in the visitor's session.
//!
//! The whole cart is written back on every change and read back on every
//! request. A value that no longer deserializes (an older format, a hand
//! edited store row) is treated as an empty cart rather than an error, so a
//! guest never gets stuck behind a broken session.

use tower_sessions::Session;
use usuba_core::{Cart, WidgetState};

use crate::models::session_keys;

/// The guest's cart together with the widget's open/closed state.
#[derive(Debug, Clone, Default)]
pub struct GuestCart {
    pub cart: Cart,
    pub widget: WidgetState,
}

impl GuestCart {
    /// Load the cart and widget state, recovering silently from bad data.
    pub async fn load(session: &Session) -> Self {
        Self {
            cart: load_cart(session).await,
            widget: load_widget(session).await,
        }
    }

    /// Persist the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save_cart(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::CART, &self.cart).await
    }

    /// Persist the widget state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save_widget(
        &self,
        session: &Session,
    ) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::WIDGET, self.widget).await
    }
}

/// Read the cart from the session.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart.sanitized(),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("Discarding unreadable cart: {e}");
            Cart::new()
        }
    }
}

/// Read the widget state from the session.
pub async fn load_widget(session: &Session) -> WidgetState {
    session
        .get::<WidgetState>(session_keys::WIDGET)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;
    use usuba_core::PriceTag;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_empty_session_loads_empty_cart() {
        let guest = GuestCart::load(&session()).await;
        assert!(guest.cart.is_empty());
        assert_eq!(guest.widget, WidgetState::default());
    }

    #[tokio::test]
    async fn test_round_trip_through_session() {
        let session = session();
        let mut guest = GuestCart::default();
        guest.cart.add("Nigiri - Salmon", PriceTag::parse("6"), "");
        guest.widget.toggle_panel();
        guest.save_cart(&session).await.unwrap();
        guest.save_widget(&session).await.unwrap();

        let loaded = GuestCart::load(&session).await;
        assert_eq!(loaded.cart, guest.cart);
        assert!(loaded.widget.panel_open);
    }

    #[tokio::test]
    async fn test_corrupt_cart_is_empty() {
        let session = session();
        session
            .insert(session_keys::CART, serde_json::json!({"not": "a cart"}))
            .await
            .unwrap();
        assert!(load_cart(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_browser_blob_in_session() {
        let session = session();
        session
            .insert(
                session_keys::CART,
                serde_json::json!([{"name": "A", "price": 4, "qty": 2, "image": ""}]),
            )
            .await
            .unwrap();
        assert_eq!(load_cart(&session).await.total_items(), 2);
    }

    #[tokio::test]
    async fn test_session_blob_is_normalized() {
        let session = session();
        session
            .insert(
                session_keys::CART,
                serde_json::json!([
                    {"name": "A", "price": 4, "price2": 0, "qty": 1},
                    {"name": "A", "price": 4, "qty": 2}
                ]),
            )
            .await
            .unwrap();

        let cart = load_cart(&session).await;
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.formatted_total(), "12");
    }
}
