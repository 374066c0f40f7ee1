//! Session-related types.
//!
//! Keys for values kept in the visitor's session.

/// Session keys for cart data.
pub mod keys {
    /// Key for the serialized cart lines.
    pub const CART: &str = "usuba_cart";

    /// Key for the cart widget's open/closed state.
    pub const WIDGET: &str = "cart_widget";
}
