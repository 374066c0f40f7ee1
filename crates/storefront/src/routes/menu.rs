//! Menu page route handlers.
//!
//! Menu pages render every item with an add button. Items already in the
//! guest's cart (matched by qualified name) carry the `cart-item-added`
//! marker.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;
use usuba_core::{Cart, qualified_item_name};

use crate::content::{Menu, MenuKind};
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::WidgetView;
use crate::services::GuestCart;
use crate::state::AppState;

/// Navigation link to a menu.
#[derive(Clone)]
pub struct MenuLink {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

impl From<&Menu> for MenuLink {
    fn from(menu: &Menu) -> Self {
        Self {
            slug: menu.slug.clone(),
            title: menu.meta.title.clone(),
            description: menu.meta.description.clone(),
        }
    }
}

/// Menu item display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub menu: String,
    pub section: usize,
    pub index: usize,
    pub dom_id: String,
    pub name: String,
    pub price_text: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub image: Option<String>,
    pub drink: bool,
    /// Already in the cart.
    pub added: bool,
    /// Just added: play the flash animation and show a check on the button.
    pub flash: bool,
    pub return_to: String,
}

impl MenuItemView {
    /// Build the view for the item at `section`/`index` on `menu`.
    ///
    /// Out-of-range positions produce an empty view; callers resolve the
    /// item through [`Menu::item`] first.
    #[must_use]
    pub fn new(menu: &Menu, section: usize, index: usize, cart: &Cart, return_to: &str) -> Self {
        let (section_title, item) = menu
            .item(section, index)
            .map(|(s, i)| (s.title.as_str(), Some(i)))
            .unwrap_or_default();

        let name = item.map(|i| i.name.clone()).unwrap_or_default();
        let added = cart.contains_name(&qualified_item_name(section_title, &name));

        Self {
            menu: menu.slug.clone(),
            section,
            index,
            dom_id: format!("item-{section}-{index}"),
            price_text: item.map(|i| i.price.clone()).unwrap_or_default(),
            description: item.and_then(|i| i.description.clone()),
            details: item.and_then(|i| i.details.clone()),
            image: item.and_then(|i| i.image.clone()),
            drink: menu.meta.kind == MenuKind::Drink,
            name,
            added,
            flash: false,
            return_to: return_to.to_string(),
        }
    }

    /// Mark as just added.
    #[must_use]
    pub const fn flashed(mut self) -> Self {
        self.added = true;
        self.flash = true;
        self
    }
}

/// Section display data for templates.
#[derive(Clone)]
pub struct SectionView {
    pub title: String,
    pub items: Vec<MenuItemView>,
}

/// Menu index template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuIndexTemplate {
    pub nav: Vec<MenuLink>,
    pub widget: WidgetView,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/show.html")]
pub struct MenuShowTemplate {
    pub nav: Vec<MenuLink>,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub intro_html: String,
    pub drink: bool,
    pub sections: Vec<SectionView>,
    pub widget: WidgetView,
}

fn nav(state: &AppState) -> Vec<MenuLink> {
    state.menus().ordered().into_iter().map(MenuLink::from).collect()
}

/// Display the list of menus.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let guest = GuestCart::load(&session).await;

    MenuIndexTemplate {
        nav: nav(&state),
        widget: WidgetView::new(&guest, &state.config().venue_name, "/"),
    }
}

/// Display a menu page.
///
/// # Errors
///
/// Returns 404 if no menu has this slug.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let menu = state
        .menus()
        .get(&slug)
        .ok_or_else(|| AppError::NotFound(format!("menu {slug}")))?;

    let guest = GuestCart::load(&session).await;
    let return_to = format!("/menu/{}", menu.slug);

    let sections = menu
        .meta
        .sections
        .iter()
        .enumerate()
        .map(|(section_index, section)| SectionView {
            title: section.title.trim().to_string(),
            items: (0..section.items.len())
                .map(|index| MenuItemView::new(menu, section_index, index, &guest.cart, &return_to))
                .collect(),
        })
        .collect();

    Ok(MenuShowTemplate {
        nav: nav(&state),
        slug: menu.slug.clone(),
        title: menu.meta.title.clone(),
        description: menu.meta.description.clone(),
        intro_html: menu.intro_html.clone(),
        drink: menu.meta.kind == MenuKind::Drink,
        sections,
        widget: WidgetView::new(&guest, &state.config().venue_name, &return_to),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use usuba_core::PriceTag;

    use super::*;
    use crate::content::parse_menu;

    fn menu() -> Menu {
        parse_menu(
            "drinks".to_string(),
            r#"---
title: Drinks
kind: drink
sections:
  - title: " Sake "
    items:
      - name: Dassai 45
        price: "17/19"
      - name: Seasonal
        price: MP
---
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_item_view_marks_added_by_name() {
        let menu = menu();
        let mut cart = Cart::new();
        // Different price, same qualified name: still marked
        cart.add("Sake - Dassai 45", PriceTag::parse("17"), "");

        let view = MenuItemView::new(&menu, 0, 0, &cart, "/menu/drinks");
        assert!(view.added);
        assert!(view.drink);
        assert_eq!(view.dom_id, "item-0-0");

        let other = MenuItemView::new(&menu, 0, 1, &cart, "/menu/drinks");
        assert!(!other.added);
        assert_eq!(other.price_text, "MP");
    }

    #[test]
    fn test_flashed() {
        let view = MenuItemView::new(&menu(), 0, 0, &Cart::new(), "/").flashed();
        assert!(view.added);
        assert!(view.flash);
    }
}
