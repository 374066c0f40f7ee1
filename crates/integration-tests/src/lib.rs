//! Integration tests for the Usuba menu site.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`. Sessions
//! live in a `MemoryStore`, and the database pool connects lazily so no
//! `PostgreSQL` server is needed unless a test touches `/health/ready`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p usuba-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use usuba_storefront::config::StorefrontConfig;
use usuba_storefront::content::{MenuStore, parse_menu};
use usuba_storefront::middleware::session::SESSION_COOKIE_NAME;
use usuba_storefront::state::AppState;

/// Food menu used by the tests.
///
/// Section 0 is "Nigiri" (Salmon 6, Otoro MP); section 1 has no title
/// (Edamame $5).
pub const FOOD_MENU: &str = r#"---
title: Food Menu
kind: food
order: 1
sections:
  - title: Nigiri
    items:
      - name: Salmon
        price: "6"
        image: /static/images/salmon.jpg
      - name: Otoro
        price: MP
  - title: ""
    items:
      - name: Edamame
        price: "$5"
---
Two pieces per order.
"#;

/// Drinks menu used by the tests.
///
/// Section 0 is "Sake" (Dassai 45 17/19, Junmai 12).
pub const DRINKS_MENU: &str = r#"---
title: Drinks
kind: drink
order: 2
sections:
  - title: Sake
    items:
      - name: Dassai 45
        price: "17/19"
        details: Junmai Daiginjo
      - name: Junmai
        price: "12"
---
"#;

/// Venue name configured for the tests.
pub const VENUE_NAME: &str = "Usuba Test Kitchen";

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The router plus one guest's session cookie.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Build the app with the test menus loaded.
    ///
    /// # Panics
    ///
    /// Panics if the test menus don't parse.
    #[must_use]
    pub fn new() -> Self {
        let menus = [("food", FOOD_MENU), ("drinks", DRINKS_MENU)]
            .into_iter()
            .map(|(slug, content)| {
                let menu = parse_menu(slug.to_string(), content).expect("test menu parses");
                (slug.to_string(), menu)
            })
            .collect::<HashMap<_, _>>();

        Self::with_menus(MenuStore::from_menus(menus))
    }

    /// Build the app with the given menus.
    ///
    /// # Panics
    ///
    /// Panics if the lazy pool can't be configured.
    #[must_use]
    pub fn with_menus(menus: MenuStore) -> Self {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/usuba_test")
            .expect("lazy pool");
        let state = AppState::new(test_config(), pool, menus);

        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_name(SESSION_COOKIE_NAME)
            .with_secure(false);

        let router = usuba_storefront::router(&state)
            .layer(session_layer)
            .with_state(state);

        Self {
            router,
            cookie: None,
        }
    }

    /// `GET` a page.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty(), false).await
    }

    /// `GET` a fragment as HTMX would.
    pub async fn get_htmx(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty(), true).await
    }

    /// Post a form as HTMX would.
    pub async fn post_htmx(&mut self, uri: &str, form: &str) -> TestResponse {
        self.post(uri, form, true).await
    }

    /// Post a form without HTMX (plain browser submit).
    pub async fn post_plain(&mut self, uri: &str, form: &str) -> TestResponse {
        self.post(uri, form, false).await
    }

    /// `PUT` a raw body to the JSON API.
    pub async fn put_json(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Method::PUT,
            uri,
            Some("application/json"),
            Body::from(body.to_string()),
            false,
        )
        .await
    }

    async fn post(&mut self, uri: &str, form: &str, htmx: bool) -> TestResponse {
        self.send(
            Method::POST,
            uri,
            Some("application/x-www-form-urlencoded"),
            Body::from(form.to_string()),
            htmx,
        )
        .await
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
        htmx: bool,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if htmx {
            request = request.header("hx-request", "true");
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = request.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `name=value` for the session cookie from `Set-Cookie`.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/usuba_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        content_dir: PathBuf::from("content"),
        static_dir: PathBuf::from("static"),
        venue_name: VENUE_NAME.to_string(),
        rate_limit: false,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
