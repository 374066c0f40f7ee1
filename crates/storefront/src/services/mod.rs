//! Business logic services for storefront.

pub mod cart_session;

pub use cart_session::GuestCart;
