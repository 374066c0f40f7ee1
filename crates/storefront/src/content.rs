//! Menu content loaded from markdown files.
//!
//! Each file in `content/menus/` is one menu page. The YAML frontmatter
//! lists the sections and items; the markdown body is rendered as the
//! introduction shown above the first section.
//!
//! ```markdown
//! ---
//! title: Food Menu
//! kind: food
//! order: 1
//! sections:
//!   - title: Nigiri
//!     items:
//!       - name: Salmon
//!         price: "6"
//!         image: /static/images/salmon.jpg
//! ---
//! Two pieces per order.
//! ```
//!
//! Prices stay as text here. They are parsed when an item is added to the
//! cart, so an item with `price: MP` still shows on the menu but can't be
//! ordered through the widget.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// What a menu page lists. Drinks get their own markup and styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    #[default]
    Food,
    Drink,
}

/// Metadata for a menu page.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuMeta {
    pub title: String,
    #[serde(default)]
    pub kind: MenuKind,
    #[serde(default)]
    pub description: Option<String>,
    /// Position on the menu index (lowest first).
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub sections: Vec<MenuSection>,
}

/// A category section of a menu.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A single dish or drink.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub name: String,
    /// Price text as printed on the menu (`6`, `$6.50`, `17/19`).
    pub price: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Extra line under drinks (ABV, region, serving size).
    #[serde(default)]
    pub details: Option<String>,
}

/// A loaded menu page.
#[derive(Debug, Clone)]
pub struct Menu {
    pub slug: String,
    pub meta: MenuMeta,
    pub intro_html: String,
}

impl Menu {
    /// Look up an item with its section.
    #[must_use]
    pub fn item(&self, section: usize, item: usize) -> Option<(&MenuSection, &MenuItem)> {
        let section = self.meta.sections.get(section)?;
        section.items.get(item).map(|item| (section, item))
    }

    /// Number of items across all sections.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.meta.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// Content store that holds all loaded menus in memory.
#[derive(Debug, Clone, Default)]
pub struct MenuStore {
    menus: Arc<HashMap<String, Menu>>,
}

impl MenuStore {
    /// Load all menus from the content directory.
    ///
    /// A missing `menus/` directory yields an empty store. Individual files
    /// that fail to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the menus directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("menus");
        let mut menus = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Menus directory does not exist: {:?}", dir);
            return Ok(Self::from_menus(menus));
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_menu(&path) {
                    Ok(menu) => {
                        tracing::info!(
                            slug = %menu.slug,
                            items = menu.item_count(),
                            "Loaded menu"
                        );
                        menus.insert(menu.slug.clone(), menu);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load menu {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_menus(menus))
    }

    /// Build a store from already-loaded menus.
    #[must_use]
    pub fn from_menus(menus: HashMap<String, Menu>) -> Self {
        Self {
            menus: Arc::new(menus),
        }
    }

    /// Load a single menu from a markdown file.
    fn load_menu(path: &Path) -> Result<Menu, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        parse_menu(slug, &content)
    }

    /// Get a menu by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Menu> {
        self.menus.get(slug)
    }

    /// All menus in display order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Menu> {
        let mut menus: Vec<&Menu> = self.menus.values().collect();
        menus.sort_by(|a, b| {
            a.meta
                .order
                .cmp(&b.meta.order)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        menus
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

/// Parse a menu file's contents.
///
/// # Errors
///
/// Returns an error if the frontmatter is missing or malformed.
pub fn parse_menu(slug: String, content: &str) -> Result<Menu, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<MenuMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Menu {
        slug,
        meta,
        intro_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with the GFM extensions menus use.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DRINKS: &str = r#"---
title: Drinks
kind: drink
order: 2
sections:
  - title: Sake
    items:
      - name: Dassai 45
        price: "17/19"
        details: "Junmai Daiginjo · Yamaguchi"
      - name: Seasonal
        price: MP
---
Ask about our **seasonal** bottles.
"#;

    #[test]
    fn test_parse_menu() {
        let menu = parse_menu("drinks".to_string(), DRINKS).unwrap();
        assert_eq!(menu.meta.title, "Drinks");
        assert_eq!(menu.meta.kind, MenuKind::Drink);
        assert_eq!(menu.item_count(), 2);
        assert!(menu.intro_html.contains("<strong>seasonal</strong>"));

        let (section, item) = menu.item(0, 0).unwrap();
        assert_eq!(section.title, "Sake");
        assert_eq!(item.price, "17/19");
        assert!(menu.item(0, 2).is_none());
        assert!(menu.item(1, 0).is_none());
    }

    #[test]
    fn test_parse_menu_without_frontmatter() {
        let result = parse_menu("plain".to_string(), "Just text");
        assert!(matches!(result, Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_kind_defaults_to_food() {
        let menu = parse_menu(
            "food".to_string(),
            "---\ntitle: Food\nsections: []\n---\n",
        )
        .unwrap();
        assert_eq!(menu.meta.kind, MenuKind::Food);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let store = MenuStore::load(Path::new("/nonexistent/usuba-content")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_ordered() {
        let mut menus = HashMap::new();
        for (slug, order) in [("drinks", 2), ("food", 1), ("desserts", 2)] {
            let content = format!("---\ntitle: {slug}\norder: {order}\n---\n");
            menus.insert(slug.to_string(), parse_menu(slug.to_string(), &content).unwrap());
        }
        let store = MenuStore::from_menus(menus);
        let slugs: Vec<&str> = store.ordered().iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, ["food", "desserts", "drinks"]);
    }
}
