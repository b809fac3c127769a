//! HTTP routes.

mod admin;
mod auth;
mod health;
mod inventory;

use axum::Router;
use axum::routing::{get, post, put};
use stockwise_core::error::StockwiseResult;
use stockwise_core::models::session::SessionContext;
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};

use crate::error::ApiError;
use crate::state::{AppState, CookieSettings};

/// Name of the cookie carrying the raw session token.
pub const SESSION_COOKIE: &str = "stockwise_session";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/admin/pending-users", get(admin::pending_users))
        .route("/api/auth/admin/all-users", get(admin::all_users))
        .route("/api/auth/admin/approve-user/:id", post(admin::approve_user))
        .route("/api/auth/admin/reject-user/:id", post(admin::reject_user))
        .route(
            "/api/products",
            get(inventory::list_products).post(inventory::create_product),
        )
        .route(
            "/api/products/:id",
            put(inventory::update_product).delete(inventory::remove_product),
        )
        .route("/api/products/:id/stock-out", post(inventory::stock_out))
        .route("/api/stats", get(inventory::stats))
        .route("/api/recent-activity", get(inventory::recent_activity))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// Resolve the caller from the session cookie or fail with 401.
pub(crate) async fn require_session(
    state: &AppState,
    cookies: &Cookies,
) -> Result<SessionContext, ApiError> {
    Ok(resolve_session(state, cookies).await?)
}

/// Resolve the session cookie, re-issuing it whenever the server pushed the
/// session's expiry forward so the browser keeps it as long as the server
/// does.
pub(crate) async fn resolve_session(
    state: &AppState,
    cookies: &Cookies,
) -> StockwiseResult<SessionContext> {
    let token = session_token(cookies);
    let resolved = state.auth.resolve_sliding(token.as_deref()).await?;
    if let (true, Some(token)) = (resolved.extended, token) {
        set_session_cookie(cookies, token, &state.cookies);
    }
    Ok(resolved.context)
}

pub(crate) fn session_token(cookies: &Cookies) -> Option<String> {
    cookies.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

fn base_cookie(value: String, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .build()
}

pub(crate) fn set_session_cookie(cookies: &Cookies, token: String, settings: &CookieSettings) {
    let mut cookie = base_cookie(token, settings);
    cookie.set_max_age(Duration::seconds(settings.max_age_secs as i64));
    cookies.add(cookie);
}

pub(crate) fn clear_session_cookie(cookies: &Cookies, settings: &CookieSettings) {
    cookies.remove(base_cookie(String::new(), settings));
}
