//! Menu price tags and their display format.
//!
//! Menu markup writes prices as free-form text: `6`, `$6.50`, or a slash
//! pair such as `17/19` for items sold in two sizes (glass/bottle,
//! regular/large). A [`PriceTag`] holds the first price plus the optional
//! second one, and renders back to the same slash notation.
//!
//! Amounts use [`Decimal`] so that totals never drift the way binary floats
//! do. Display rounds to at most one decimal place: whole amounts print
//! without decimals (`6`), everything else with exactly one (`6.5`).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// Everything that can't be part of a number.
static NON_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("Invalid regex"));

/// A unit price with an optional second price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTag {
    /// The first (or only) price.
    pub price: Decimal,
    /// The second price of a dual-priced item. Never zero.
    pub second: Option<Decimal>,
}

impl PriceTag {
    /// Create a price tag. A zero second price counts as no second price.
    #[must_use]
    pub fn new(price: Decimal, second: Option<Decimal>) -> Self {
        Self {
            price,
            second: second.filter(|amount| !amount.is_zero()),
        }
    }

    /// Create a single-priced tag.
    #[must_use]
    pub const fn single(price: Decimal) -> Self {
        Self {
            price,
            second: None,
        }
    }

    /// Parse menu price text.
    ///
    /// Slash pairs (`17/19`, `6 / 7`, `$17/$19`) yield a dual-priced tag when
    /// both halves contain a number. Anything else is read as a single price
    /// after stripping currency symbols and other decoration. Text without
    /// any number (`MP`, `Market price`) yields a zero price, which is not
    /// orderable.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if let Some((first, rest)) = text.split_once('/') {
            let second = rest.split('/').next().unwrap_or_default();
            if let (Some(price), Some(second)) = (parse_amount(first), parse_amount(second)) {
                return Self::new(price, Some(second));
            }
        }

        Self::single(parse_amount(text).unwrap_or(Decimal::ZERO))
    }

    /// Whether an item with this tag can be added to the cart.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.price > Decimal::ZERO
    }

    /// Multiply both prices by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        let quantity = Decimal::from(quantity);
        Self {
            price: self.price * quantity,
            second: self.second.map(|second| second * quantity),
        }
    }
}

impl fmt::Display for PriceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.price))?;
        if let Some(second) = self.second {
            write!(f, "/{}", format_amount(second))?;
        }
        Ok(())
    }
}

/// Format an amount for display.
///
/// Whole numbers print without decimals; anything else is rounded half away
/// from zero to one decimal place.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    if amount.fract().is_zero() {
        amount.trunc().to_string()
    } else {
        amount
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
    }
}

/// Read the leading number out of a piece of price text.
///
/// Non-numeric characters are dropped first, so `$6.50` reads as `6.50`.
/// A second decimal point ends the number (`1.2.3` reads as `1.2`).
fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned = NON_NUMERIC_RE.replace_all(text, "");
    let mut parts = cleaned.splitn(3, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    let normalized = match (whole.is_empty(), fraction.is_empty()) {
        (true, true) => return None,
        (false, true) => whole.to_string(),
        (true, false) => format!("0.{fraction}"),
        (false, false) => format!("{whole}.{fraction}"),
    };

    Decimal::from_str(&normalized).ok().map(|amount| amount.normalize())
}
