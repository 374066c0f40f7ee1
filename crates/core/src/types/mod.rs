//! Core types for the Usuba menu cart.

pub mod cart;
pub mod menu;
pub mod price;
pub mod widget;

pub use cart::{Cart, CartError, CartLine, LineChange};
pub use menu::qualified_item_name;
pub use price::{PriceTag, format_amount};
pub use widget::WidgetState;
