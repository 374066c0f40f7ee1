//! Standalone waiter summary page.
//!
//! Same content as the widget's waiter view, as a plain page that works
//! without HTMX and can be bookmarked on a shared tablet.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::routes::cart::WidgetView;
use crate::routes::menu::MenuLink;
use crate::services::GuestCart;
use crate::state::AppState;

/// Waiter summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "waiter/show.html")]
pub struct WaiterPageTemplate {
    pub nav: Vec<MenuLink>,
    pub widget: WidgetView,
}

/// Display the order summary for the waiter.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let guest = GuestCart::load(&session).await;

    WaiterPageTemplate {
        nav: state
            .menus()
            .ordered()
            .into_iter()
            .map(MenuLink::from)
            .collect(),
        widget: WidgetView::new(&guest, &state.config().venue_name, "/waiter"),
    }
}
