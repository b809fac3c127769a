//! Admin-only account review endpoints.

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use stockwise_core::models::user::{ApprovalStatus, User};
use stockwise_core::repository::{PaginatedResult, Pagination};
use tower_cookies::Cookies;
use uuid::Uuid;

use super::require_session;
use crate::error::ApiError;
use crate::state::AppState;

/// Largest page an admin listing returns.
const MAX_PAGE: u64 = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PageQuery {
    offset: Option<u64>,
    limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let defaults = Pagination::default();
        Pagination {
            offset: q.offset.unwrap_or(defaults.offset),
            limit: q.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE),
        }
    }
}

fn users_body(page: PaginatedResult<User>) -> Json<Value> {
    Json(json!({
        "success": true,
        "users": page.items,
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit,
    }))
}

pub(super) async fn pending_users(
    State(state): State<AppState>,
    cookies: Cookies,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Query(query) = query?;
    let page = state
        .accounts
        .list_pending_users(&ctx, query.into())
        .await?;
    Ok(users_body(page))
}

pub(super) async fn all_users(
    State(state): State<AppState>,
    cookies: Cookies,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Query(query) = query?;
    let page = state.accounts.list_users(&ctx, query.into()).await?;
    Ok(users_body(page))
}

pub(super) async fn approve_user(
    State(state): State<AppState>,
    cookies: Cookies,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    review(state, cookies, id, ApprovalStatus::Approved).await
}

pub(super) async fn reject_user(
    State(state): State<AppState>,
    cookies: Cookies,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    review(state, cookies, id, ApprovalStatus::Rejected).await
}

async fn review(
    state: AppState,
    cookies: Cookies,
    id: Result<Path<Uuid>, PathRejection>,
    status: ApprovalStatus,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Path(id) = id?;
    let user = state
        .accounts
        .set_approval_status(&ctx, id, status)
        .await?;

    let message = match status {
        ApprovalStatus::Rejected => "User rejected successfully",
        _ => "User approved successfully",
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "user": user,
    })))
}
