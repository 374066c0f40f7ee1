//! The guest's cart: an ordered list of distinct lines.
//!
//! Lines are unique by name and price pair. Adding an item that matches an
//! existing line bumps its quantity instead of appending a new line, and a
//! line whose quantity reaches zero disappears.
//!
//! # Persistence format
//!
//! The cart serializes as a bare JSON array so that blobs exported from the
//! browser widget (`usuba_cart` in local storage) load unchanged:
//!
//! ```json
//! [{"name": "Nigiri - Salmon", "price": 6, "qty": 2, "image": ""},
//!  {"name": "Sake - Dassai 45", "price": 17, "price2": 19, "qty": 1, "image": ""}]
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::price::PriceTag;

/// Errors from index-based cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart line {index} is out of range (cart has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },
}

/// One distinct purchasable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Qualified item name (`Section - Item`).
    pub name: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Second unit price of a dual-priced item.
    #[serde(
        rename = "price2",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub second_price: Option<Decimal>,
    /// Always at least 1 for a line that is in a cart.
    #[serde(rename = "qty")]
    pub quantity: u32,
    /// Image URL, empty when the item has no picture.
    #[serde(default)]
    pub image: String,
}

impl CartLine {
    /// Price of one unit.
    #[must_use]
    pub fn unit_tag(&self) -> PriceTag {
        PriceTag::new(self.price, self.second_price)
    }

    /// Price of the whole line.
    #[must_use]
    pub fn subtotal_tag(&self) -> PriceTag {
        self.unit_tag().times(self.quantity)
    }

    fn matches(&self, name: &str, tag: &PriceTag) -> bool {
        self.name == name && self.price == tag.price && self.second_price == tag.second
    }
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    /// The line is still in the cart with this quantity.
    Quantity(u32),
    /// The quantity dropped to zero and the line was removed.
    Removed(CartLine),
}

/// The cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Parse a persisted cart blob.
    ///
    /// `null` is an empty cart. The result is [`sanitized`](Self::sanitized).
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the blob is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cart: Option<Self> = serde_json::from_str(json)?;
        Ok(cart.unwrap_or_default().sanitized())
    }

    /// Parse a persisted cart blob, treating anything unreadable as empty.
    #[must_use]
    pub fn from_json_lossy(json: &str) -> Self {
        Self::from_json(json).unwrap_or_default()
    }

    /// Serialize to the persisted blob format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which it does not for any
    /// cart built through this API.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore the line invariants on a cart loaded from outside.
    ///
    /// Zero-quantity lines are dropped and a zero second price counts as
    /// absent. Lines sharing a name and price pair fold into the first one.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let mut lines: Vec<CartLine> = Vec::with_capacity(self.lines.len());

        for mut line in self.lines {
            if line.quantity == 0 {
                continue;
            }
            line.second_price = line.second_price.filter(|p| !p.is_zero());

            let tag = line.unit_tag();
            match lines.iter_mut().find(|l| l.matches(&line.name, &tag)) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => lines.push(line),
            }
        }

        Self { lines }
    }

    /// Add one unit of an item, merging with an identical line.
    ///
    /// Returns the index of the line that holds the item.
    pub fn add(&mut self, name: impl Into<String>, tag: PriceTag, image: impl Into<String>) -> usize {
        let name = name.into();

        if let Some(index) = self.lines.iter().position(|line| line.matches(&name, &tag)) {
            if let Some(line) = self.lines.get_mut(index) {
                line.quantity = line.quantity.saturating_add(1);
            }
            return index;
        }

        self.lines.push(CartLine {
            name,
            price: tag.price,
            second_price: tag.second,
            quantity: 1,
            image: image.into(),
        });
        self.lines.len() - 1
    }

    /// Change a line's quantity by `delta`, removing it at zero or below.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineOutOfRange` if there is no line at `index`.
    pub fn change_quantity(&mut self, index: usize, delta: i64) -> Result<LineChange, CartError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::LineOutOfRange { index, len })?;

        let quantity = i64::from(line.quantity).saturating_add(delta);
        if quantity <= 0 {
            return Ok(LineChange::Removed(self.lines.remove(index)));
        }

        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        Ok(LineChange::Quantity(line.quantity))
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineOutOfRange` if there is no line at `index`.
    pub fn remove(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any line carries this qualified name, at any price.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.lines.iter().any(|line| line.name == name)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of first prices.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Sum using the second price where a line has one, else the first.
    #[must_use]
    pub fn total_second(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.second_price.unwrap_or(line.price) * Decimal::from(line.quantity))
            .sum()
    }

    #[must_use]
    pub fn has_any_second_price(&self) -> bool {
        self.lines.iter().any(|line| line.second_price.is_some())
    }

    /// Cart total as a price tag.
    ///
    /// Carries a second price only when some line is dual-priced and the two
    /// totals actually differ.
    #[must_use]
    pub fn total_tag(&self) -> PriceTag {
        let total = self.total();
        let second = self.total_second();
        let show_second = self.has_any_second_price() && total != second;
        PriceTag::new(total, show_second.then_some(second))
    }

    /// Cart total formatted for display (`42` or `42/48`).
    #[must_use]
    pub fn formatted_total(&self) -> String {
        self.total_tag().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn tag(text: &str) -> PriceTag {
        PriceTag::parse(text)
    }

    fn cart_with(items: &[(&str, &str)]) -> Cart {
        let mut cart = Cart::new();
        for (name, price) in items {
            cart.add(*name, tag(price), "");
        }
        cart
    }

    #[test]
    fn test_add_same_item_twice_increments() {
        let cart = cart_with(&[("Nigiri - Salmon", "6"), ("Nigiri - Salmon", "6")]);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_add_same_name_different_price_is_separate_line() {
        let cart = cart_with(&[
            ("Sake - Dassai", "17/19"),
            ("Sake - Dassai", "17"),
            ("Sake - Dassai", "17/21"),
        ]);
        assert_eq!(cart.lines().len(), 3);
    }

    #[test]
    fn test_add_returns_line_index() {
        let mut cart = Cart::new();
        assert_eq!(cart.add("A", tag("1"), ""), 0);
        assert_eq!(cart.add("B", tag("2"), ""), 1);
        assert_eq!(cart.add("A", tag("1"), ""), 0);
    }

    #[test]
    fn test_add_keeps_first_image() {
        let mut cart = Cart::new();
        cart.add("A", tag("1"), "/a.jpg");
        cart.add("A", tag("1"), "/other.jpg");
        assert_eq!(cart.lines()[0].image, "/a.jpg");
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = cart_with(&[("A", "5"), ("B", "3")]);
        let change = cart.change_quantity(0, -1).unwrap();
        assert!(matches!(change, LineChange::Removed(line) if line.name == "A"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].name, "B");
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = cart_with(&[("A", "5")]);
        assert_eq!(cart.change_quantity(0, 1).unwrap(), LineChange::Quantity(2));
        assert_eq!(cart.change_quantity(0, -1).unwrap(), LineChange::Quantity(1));
    }

    #[test]
    fn test_change_quantity_out_of_range() {
        let mut cart = cart_with(&[("A", "5")]);
        assert_eq!(
            cart.change_quantity(3, 1),
            Err(CartError::LineOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_remove() {
        let mut cart = cart_with(&[("A", "5"), ("B", "3")]);
        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.name, "B");
        assert!(cart.remove(1).is_err());
    }

    #[test]
    fn test_clear() {
        let mut cart = cart_with(&[("A", "5"), ("B", "3")]);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.formatted_total(), "0");
    }

    #[test]
    fn test_totals() {
        let mut cart = cart_with(&[("A", "6.5"), ("B", "17/19")]);
        cart.change_quantity(0, 1).unwrap();
        assert_eq!(cart.total(), Decimal::from_str("30").unwrap());
        assert_eq!(cart.total_second(), Decimal::from_str("32").unwrap());
        assert!(cart.has_any_second_price());
    }

    #[test]
    fn test_formatted_total_single_prices() {
        let cart = cart_with(&[("A", "6.5"), ("B", "3")]);
        assert_eq!(cart.formatted_total(), "9.5");
    }

    #[test]
    fn test_formatted_total_slash_pair() {
        let cart = cart_with(&[("A", "6"), ("B", "17/19")]);
        assert_eq!(cart.formatted_total(), "23/25");
    }

    #[test]
    fn test_formatted_total_equal_totals_show_single() {
        let cart = cart_with(&[("A", "10/10")]);
        assert_eq!(cart.formatted_total(), "10");
    }

    #[test]
    fn test_line_price_formatting() {
        let mut cart = cart_with(&[("B", "17/19")]);
        cart.change_quantity(0, 2).unwrap();
        let line = &cart.lines()[0];
        assert_eq!(line.unit_tag().to_string(), "17/19");
        assert_eq!(line.subtotal_tag().to_string(), "51/57");
    }

    #[test]
    fn test_contains_name_ignores_price() {
        let cart = cart_with(&[("Sake - Dassai", "17/19")]);
        assert!(cart.contains_name("Sake - Dassai"));
        assert!(!cart.contains_name("Sake"));
    }

    #[test]
    fn test_json_shape() {
        let mut cart = cart_with(&[("A", "6.5")]);
        cart.add("B", tag("17/19"), "/b.jpg");
        let json: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "A", "price": 6.5, "qty": 1, "image": ""},
                {"name": "B", "price": 17.0, "price2": 19.0, "qty": 1, "image": "/b.jpg"}
            ])
        );
    }

    #[test]
    fn test_from_json_browser_blob() {
        let cart = Cart::from_json(
            r#"[{"name":"Nigiri - Salmon","price":6,"qty":2,"image":""},
                {"name":"Sake - Dassai 45","price":17,"qty":1,"image":"","price2":19}]"#,
        )
        .unwrap();
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.formatted_total(), "29/31");
    }

    #[test]
    fn test_from_json_lossy_recovers_empty() {
        assert!(Cart::from_json_lossy("").is_empty());
        assert!(Cart::from_json_lossy("null").is_empty());
        assert!(Cart::from_json_lossy("{not json").is_empty());
        assert!(Cart::from_json_lossy(r#"{"name":"A"}"#).is_empty());
        assert!(Cart::from_json_lossy(r#"[{"name":"A","price":1,"qty":-1}]"#).is_empty());
    }

    #[test]
    fn test_from_json_drops_zero_quantity_lines() {
        let cart = Cart::from_json(
            r#"[{"name":"A","price":1,"qty":0},{"name":"B","price":2,"qty":1}]"#,
        )
        .unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].name, "B");
        assert_eq!(cart.lines()[0].image, "");
    }

    #[test]
    fn test_from_json_zero_second_price_is_absent() {
        let mut cart = Cart::from_json(
            r#"[{"name":"A","price":5,"price2":0,"qty":1},{"name":"B","price":17,"price2":19,"qty":1}]"#,
        )
        .unwrap();
        assert_eq!(cart.lines()[0].second_price, None);
        assert_eq!(cart.total_second(), Decimal::from(24));
        assert_eq!(cart.formatted_total(), "22/24");

        // Matches a plainly priced add of the same item
        assert_eq!(cart.add("A", tag("5"), ""), 0);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_from_json_merges_repeated_lines() {
        let mut cart = Cart::from_json(
            r#"[{"name":"A","price":5,"qty":1,"image":"/a.jpg"},
                {"name":"B","price":2,"qty":1},
                {"name":"A","price":5,"qty":2,"image":""},
                {"name":"A","price":5,"price2":0,"qty":1}]"#,
        )
        .unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.lines()[0].image, "/a.jpg");
        assert_eq!(cart.lines()[1].name, "B");

        cart.add("A", tag("5"), "");
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_from_json_keeps_distinct_price_pairs() {
        let cart = Cart::from_json(
            r#"[{"name":"A","price":17,"qty":1},{"name":"A","price":17,"price2":19,"qty":1}]"#,
        )
        .unwrap();
        assert_eq!(cart.lines().len(), 2);
    }
}
