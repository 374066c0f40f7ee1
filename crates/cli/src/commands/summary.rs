//! Waiter summary for an exported cart blob.
//!
//! Reads the JSON the site serves at `GET /api/cart` (or a browser's saved
//! cart) and prints what the waiter view would show.

use std::fmt::{self, Write as _};
use std::path::Path;

use usuba_core::Cart;

/// Render the waiter summary as plain text.
///
/// # Errors
///
/// Returns an error if formatting into the buffer fails.
pub fn render(cart: &Cart) -> Result<String, fmt::Error> {
    let mut out = String::from("Order Summary\n");

    let count = cart.total_items();
    let plural = if count == 1 { "" } else { "s" };
    writeln!(out, "{count} item{plural}\n")?;

    if cart.is_empty() {
        out.push_str("Your order is empty\n");
        return Ok(out);
    }

    for line in cart.lines() {
        writeln!(
            out,
            "{}\n  × {} · {} each    {}",
            line.name,
            line.quantity,
            line.unit_tag(),
            line.subtotal_tag()
        )?;
    }
    writeln!(out, "\nTotal {}", cart.formatted_total())?;

    Ok(out)
}

/// Print the summary for the cart blob in `path`.
///
/// Unreadable or malformed entries are dropped; a file that isn't a cart at
/// all prints as an empty order.
///
/// # Errors
///
/// Returns an error if the file can't be read or the summary can't be
/// formatted.
#[allow(clippy::print_stdout)]
pub fn print(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let cart = Cart::from_json_lossy(&json);
    tracing::debug!(lines = cart.lines().len(), "Loaded cart blob");

    print!("{}", render(&cart)?);
    Ok(())
}
