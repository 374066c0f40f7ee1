//! Menu content audit.
//!
//! Loads the menus the way the site does and reports every item whose price
//! text has no usable number. Those items still show on the menu, but their
//! add button does nothing, which is usually a typo rather than intent
//! (market-price items being the exception).

use std::path::Path;

use usuba_core::{PriceTag, qualified_item_name};
use usuba_storefront::content::{Menu, MenuStore};

/// An item that can't be ordered through the cart widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unorderable {
    pub menu: String,
    pub name: String,
    pub price: String,
}

/// Items on `menu` whose price text doesn't parse to a positive amount.
#[must_use]
pub fn unorderable_items(menu: &Menu) -> Vec<Unorderable> {
    menu.meta
        .sections
        .iter()
        .flat_map(|section| {
            section.items.iter().filter_map(|item| {
                (!PriceTag::parse(&item.price).is_orderable()).then(|| Unorderable {
                    menu: menu.slug.clone(),
                    name: qualified_item_name(&section.title, &item.name),
                    price: item.price.clone(),
                })
            })
        })
        .collect()
}

/// Audit the menus under `content_dir`.
///
/// # Errors
///
/// Returns an error if the menus directory can't be read, no menus load, or
/// any item is unorderable.
#[allow(clippy::print_stdout)]
pub fn check(content_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = MenuStore::load(content_dir)?;
    if store.is_empty() {
        return Err(format!("No menus found in {}", content_dir.join("menus").display()).into());
    }

    let mut problems = Vec::new();
    for menu in store.ordered() {
        println!(
            "{:<12} {:>3} items  ({})",
            menu.slug,
            menu.item_count(),
            menu.meta.title
        );
        problems.extend(unorderable_items(menu));
    }

    if problems.is_empty() {
        println!("All prices are orderable");
        return Ok(());
    }

    println!();
    for item in &problems {
        println!("{}: {} has no usable price ({:?})", item.menu, item.name, item.price);
    }

    Err(format!("{} item(s) cannot be added to the cart", problems.len()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use usuba_storefront::content::parse_menu;

    use super::*;

    #[test]
    fn test_unorderable_items() {
        let menu = parse_menu(
            "food".to_string(),
            r#"---
title: Food
sections:
  - title: Nigiri
    items:
      - name: Salmon
        price: "6"
      - name: Otoro
        price: MP
  - title: ""
    items:
      - name: Special
        price: "0"
---
"#,
        )
        .unwrap();

        let items = unorderable_items(&menu);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Nigiri - Otoro");
        assert_eq!(items[0].price, "MP");
        assert_eq!(items[1].name, "Special");
    }
}
