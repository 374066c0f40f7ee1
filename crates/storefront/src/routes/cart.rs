//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every form also works as a plain post: without the `HX-Request` header the
//! handler answers with a redirect back to the form's `return_to` path.
//!
//! The cart itself lives in the session (see [`GuestCart`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use usuba_core::{Cart, CartLine, PriceTag, qualified_item_name};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::HxRequest;
use crate::middleware::htmx::local_return_path;
use crate::routes::menu::MenuItemView;
use crate::services::GuestCart;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub index: usize,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Badge text: the item count, or nothing for an empty cart.
    #[must_use]
    pub fn badge_text(&self) -> String {
        if self.item_count > 0 {
            self.item_count.to_string()
        } else {
            String::new()
        }
    }

    /// Waiter view count line (`1 item`, `3 items`).
    #[must_use]
    pub fn item_count_label(&self) -> String {
        let plural = if self.item_count == 1 { "" } else { "s" };
        format!("{} item{plural}", self.item_count)
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| CartLineView::new(index, line))
                .collect(),
            total: cart.formatted_total(),
            item_count: cart.total_items(),
        }
    }
}

impl CartLineView {
    fn new(index: usize, line: &CartLine) -> Self {
        Self {
            index,
            name: line.name.clone(),
            image: Some(line.image.clone()).filter(|url| !url.is_empty()),
            unit_price: line.unit_tag().to_string(),
            quantity: line.quantity,
            subtotal: line.subtotal_tag().to_string(),
        }
    }
}

/// Everything the cart widget partial renders.
#[derive(Clone)]
pub struct WidgetView {
    pub cart: CartView,
    pub panel_open: bool,
    pub waiter_open: bool,
    pub scroll_locked: bool,
    pub venue_name: String,
    /// Page the widget's forms return to when posted without HTMX.
    pub return_to: String,
    /// Render with `hx-swap-oob` so it can ride along another fragment.
    pub oob: bool,
}

impl WidgetView {
    #[must_use]
    pub fn new(guest: &GuestCart, venue_name: &str, return_to: &str) -> Self {
        Self {
            cart: CartView::from(&guest.cart),
            panel_open: guest.widget.panel_open,
            waiter_open: guest.widget.waiter_open,
            scroll_locked: guest.widget.scroll_locked(),
            venue_name: venue_name.to_string(),
            return_to: return_to.to_string(),
            oob: false,
        }
    }

    #[must_use]
    pub const fn out_of_band(mut self) -> Self {
        self.oob = true;
        self
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// Items are referenced by position so prices always come from the loaded
/// menu rather than from the client.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub menu: String,
    pub section: usize,
    pub item: usize,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Per-line action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineAction {
    Inc,
    Dec,
    Del,
}

/// Cart line action form data.
#[derive(Debug, Deserialize)]
pub struct LineActionForm {
    pub action: LineAction,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Form (or query) carrying only the return path.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnToForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart widget fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_widget.html")]
pub struct CartWidgetTemplate {
    pub widget: WidgetView,
}

/// Re-rendered menu item plus out-of-band widget, returned after an add.
#[derive(Template, WebTemplate)]
#[template(path = "partials/item_added.html")]
pub struct ItemAddedTemplate {
    pub item: MenuItemView,
    pub widget: WidgetView,
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Answer a widget form: the fresh widget for HTMX, a redirect otherwise.
fn widget_response(state: &AppState, hx: bool, guest: &GuestCart, return_to: &str) -> Response {
    if !hx {
        return Redirect::to(return_to).into_response();
    }

    CartWidgetTemplate {
        widget: WidgetView::new(guest, &state.config().venue_name, return_to),
    }
    .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a menu item (HTMX).
///
/// Items whose price text has no usable number are silently ignored: HTMX
/// gets `204 No Content`, so nothing on the page changes.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let return_to = local_return_path(form.return_to.as_deref()).to_string();

    let menu = state
        .menus()
        .get(&form.menu)
        .ok_or_else(|| AppError::NotFound(format!("menu {}", form.menu)))?;
    let (section, item) = menu.item(form.section, form.item).ok_or_else(|| {
        AppError::NotFound(format!("item {}/{} on menu {}", form.section, form.item, menu.slug))
    })?;

    let name = qualified_item_name(&section.title, &item.name);
    let tag = PriceTag::parse(&item.price);

    if !tag.is_orderable() {
        tracing::debug!(%name, price = %item.price, "Ignoring add for item without a usable price");
        return Ok(if hx {
            StatusCode::NO_CONTENT.into_response()
        } else {
            Redirect::to(&return_to).into_response()
        });
    }

    let mut guest = GuestCart::load(&session).await;
    let line = guest
        .cart
        .add(name.clone(), tag, item.image.clone().unwrap_or_default());
    guest.save_cart(&session).await?;

    add_breadcrumb("cart", "Added item", Some(&[("name", name.as_str())]));
    tracing::info!(%name, line, items = guest.cart.total_items(), "Added item to cart");

    if !hx {
        return Ok(Redirect::to(&return_to).into_response());
    }

    let item = MenuItemView::new(menu, form.section, form.item, &guest.cart, &return_to).flashed();
    let widget = WidgetView::new(&guest, &state.config().venue_name, &return_to).out_of_band();

    Ok(ItemAddedTemplate { item, widget }.into_response())
}

/// Increase, decrease or delete a cart line (HTMX).
///
/// An index that no longer exists (the cart changed in another tab) is
/// ignored and the current widget is returned.
#[instrument(skip(state, session))]
pub async fn line(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Path(index): Path<usize>,
    Form(form): Form<LineActionForm>,
) -> Result<Response> {
    let return_to = local_return_path(form.return_to.as_deref());
    let mut guest = GuestCart::load(&session).await;

    let result = match form.action {
        LineAction::Inc => guest.cart.change_quantity(index, 1).map(drop),
        LineAction::Dec => guest.cart.change_quantity(index, -1).map(drop),
        LineAction::Del => guest.cart.remove(index).map(drop),
    };

    match result {
        Ok(()) => guest.save_cart(&session).await?,
        Err(e) => tracing::debug!("Ignoring stale cart action: {e}"),
    }

    Ok(widget_response(&state, hx, &guest, return_to))
}

/// Empty the cart (HTMX).
///
/// The page is refreshed afterwards so every "added" marker on the menu is
/// cleared along with the cart. Clearing an empty cart does nothing.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Form(form): Form<ReturnToForm>,
) -> Result<Response> {
    let return_to = local_return_path(form.return_to.as_deref());
    let mut guest = GuestCart::load(&session).await;

    if guest.cart.is_empty() {
        return Ok(widget_response(&state, hx, &guest, return_to));
    }

    guest.cart.clear();
    guest.save_cart(&session).await?;
    add_breadcrumb("cart", "Cleared cart", None);
    tracing::info!("Cleared cart");

    let response = widget_response(&state, hx, &guest, return_to);
    if hx {
        return Ok((AppendHeaders([("HX-Refresh", "true")]), response).into_response());
    }
    Ok(response)
}

/// Get the cart widget fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn widget(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ReturnToForm>,
) -> impl IntoResponse {
    let guest = GuestCart::load(&session).await;
    let return_to = local_return_path(query.return_to.as_deref());

    CartWidgetTemplate {
        widget: WidgetView::new(&guest, &state.config().venue_name, return_to),
    }
}

/// Open the panel if closed, close it if open (HTMX).
#[instrument(skip(state, session))]
pub async fn toggle_panel(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Form(form): Form<ReturnToForm>,
) -> Result<Response> {
    let mut guest = GuestCart::load(&session).await;
    guest.widget.toggle_panel();
    guest.save_widget(&session).await?;

    let return_to = local_return_path(form.return_to.as_deref());
    Ok(widget_response(&state, hx, &guest, return_to))
}

/// Close the panel (close button or overlay click) (HTMX).
#[instrument(skip(state, session))]
pub async fn close_panel(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Form(form): Form<ReturnToForm>,
) -> Result<Response> {
    let mut guest = GuestCart::load(&session).await;
    guest.widget.close_panel();
    guest.save_widget(&session).await?;

    let return_to = local_return_path(form.return_to.as_deref());
    Ok(widget_response(&state, hx, &guest, return_to))
}

/// Show the waiter view; does nothing for an empty cart (HTMX).
#[instrument(skip(state, session))]
pub async fn open_waiter(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Form(form): Form<ReturnToForm>,
) -> Result<Response> {
    let mut guest = GuestCart::load(&session).await;
    if guest.widget.open_waiter(guest.cart.is_empty()) {
        guest.save_widget(&session).await?;
    }

    let return_to = local_return_path(form.return_to.as_deref());
    Ok(widget_response(&state, hx, &guest, return_to))
}

/// Close the waiter view, back to the panel if it was open (HTMX).
#[instrument(skip(state, session))]
pub async fn close_waiter(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    Form(form): Form<ReturnToForm>,
) -> Result<Response> {
    let mut guest = GuestCart::load(&session).await;
    guest.widget.close_waiter();
    guest.save_widget(&session).await?;

    let return_to = local_return_path(form.return_to.as_deref());
    Ok(widget_response(&state, hx, &guest, return_to))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add("Nigiri - Salmon", PriceTag::parse("6"), "/static/images/salmon.jpg");
        cart.add("Sake - Dassai 45", PriceTag::parse("17/19"), "");
        cart.change_quantity(1, 1).unwrap();
        cart
    }

    #[test]
    fn test_cart_view() {
        let view = CartView::from(&cart());
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "40/44");
        assert_eq!(view.badge_text(), "3");
        assert_eq!(view.item_count_label(), "3 items");

        let sake = &view.lines[1];
        assert_eq!(sake.index, 1);
        assert_eq!(sake.unit_price, "17/19");
        assert_eq!(sake.subtotal, "34/38");
        assert!(sake.image.is_none());
        assert_eq!(
            view.lines[0].image.as_deref(),
            Some("/static/images/salmon.jpg")
        );
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.is_empty());
        assert_eq!(view.badge_text(), "");
        assert_eq!(view.item_count_label(), "0 items");
    }

    #[test]
    fn test_single_item_label() {
        let mut cart = Cart::new();
        cart.add("Edamame", PriceTag::parse("5"), "");
        assert_eq!(CartView::from(&cart).item_count_label(), "1 item");
    }

    #[test]
    fn test_widget_view_renders_escaped_names() {
        let mut guest = GuestCart::default();
        guest.cart.add("<b>Toro</b>", PriceTag::parse("12"), "");
        guest.widget.toggle_panel();

        let html = CartWidgetTemplate {
            widget: WidgetView::new(&guest, "Usuba", "/menu/food"),
        }
        .render()
        .unwrap();

        assert!(html.contains("&#60;b&#62;Toro") || html.contains("&lt;b&gt;Toro"));
        assert!(!html.contains("<b>Toro</b>"));
        assert!(html.contains("cart-panel open"));
        assert!(html.contains("scroll-locked"));
        assert!(!html.contains("hx-swap-oob"));
    }

    #[test]
    fn test_empty_widget_hides_footer() {
        let html = CartWidgetTemplate {
            widget: WidgetView::new(&GuestCart::default(), "Usuba", "/"),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your order is empty"));
        assert!(!html.contains("cart-footer"));
    }

    #[test]
    fn test_waiter_view_rendering() {
        let mut guest = GuestCart {
            cart: cart(),
            ..GuestCart::default()
        };
        guest.widget.open_waiter(false);

        let html = CartWidgetTemplate {
            widget: WidgetView::new(&guest, "Usuba Sushi Bar", "/").out_of_band(),
        }
        .render()
        .unwrap();

        assert!(html.contains("waiter-view active"));
        assert!(html.contains("3 items"));
        assert!(html.contains("× 2"));
        // Only the salmon line has a picture
        assert_eq!(html.matches("class=\"waiter-item-image\"").count(), 1);
        assert!(html.contains("Usuba Sushi Bar"));
        assert!(html.contains("hx-swap-oob=\"true\""));
    }
}
