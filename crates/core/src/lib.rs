//! Usuba Core - Shared types library.
//!
//! This crate provides the types used across all Usuba components:
//! - `storefront` - Menu pages with the cart widget
//! - `cli` - Command-line tools for migrations and menu checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! sessions, no HTTP. This keeps the cart rules testable on their own.
//!
//! # Modules
//!
//! - [`types`] - Price tags, the cart model, widget state, item naming

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use rust_decimal::Decimal;
pub use types::*;
