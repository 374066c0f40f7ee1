//! Naming of menu items in the cart.

/// Cart line name for a menu item: `Section - Item`, or just the item name
/// when it isn't under a titled section.
///
/// ```rust
/// # use usuba_core::qualified_item_name;
/// assert_eq!(qualified_item_name("Nigiri", "Salmon"), "Nigiri - Salmon");
/// assert_eq!(qualified_item_name("  ", " Salmon "), "Salmon");
/// ```
#[must_use]
pub fn qualified_item_name(section: &str, name: &str) -> String {
    let section = section.trim();
    let name = name.trim();
    if section.is_empty() {
        name.to_string()
    } else {
        format!("{section} - {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_trims() {
        assert_eq!(
            qualified_item_name(" Hot Sake ", " Junmai\n"),
            "Hot Sake - Junmai"
        );
    }

    #[test]
    fn test_qualified_name_without_section() {
        assert_eq!(qualified_item_name("", "Edamame"), "Edamame");
    }
}
