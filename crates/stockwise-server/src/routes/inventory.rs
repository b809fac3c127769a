//! Product, stock and dashboard endpoints, all scoped to the caller.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use stockwise_inventory::{StockInRequest, StockOutResult};
use tower_cookies::Cookies;
use uuid::Uuid;

use super::require_session;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct QuantityPayload {
    quantity: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct StockOutPayload {
    amount: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ActivityQuery {
    limit: Option<u64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let products = state.inventory.list_products(&ctx).await?;
    Ok(Json(json!({ "success": true, "products": products })))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<StockInRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Json(request) = payload?;
    let product = state.inventory.stock_in(&ctx, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "product": product })),
    ))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    cookies: Cookies,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<QuantityPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Path(id) = id?;
    let Json(payload) = payload?;
    let product = state
        .inventory
        .update_quantity(&ctx, id, payload.quantity)
        .await?;
    Ok(Json(json!({ "success": true, "product": product })))
}

/// The "out" action: every remaining unit leaves and the product is
/// removed.
pub(super) async fn remove_product(
    State(state): State<AppState>,
    cookies: Cookies,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Path(id) = id?;
    state.inventory.remove_all(&ctx, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Product removed from inventory",
    })))
}

pub(super) async fn stock_out(
    State(state): State<AppState>,
    cookies: Cookies,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StockOutPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Path(id) = id?;
    let Json(payload) = payload?;
    let body = match state.inventory.stock_out(&ctx, id, payload.amount).await? {
        StockOutResult::Deleted => json!({ "success": true, "deleted": true }),
        StockOutResult::Remaining(remaining) => json!({
            "success": true,
            "deleted": false,
            "remaining": remaining,
        }),
    };
    Ok(Json(body))
}

pub(super) async fn stats(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let stats = state.inventory.stats(&ctx).await?;
    Ok(Json(json!({
        "success": true,
        "totalItems": stats.total_items,
        "stockInToday": stats.stock_in_today,
        "lowStockItems": stats.low_stock_items,
    })))
}

pub(super) async fn recent_activity(
    State(state): State<AppState>,
    cookies: Cookies,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let ctx = require_session(&state, &cookies).await?;
    let Query(query) = query?;
    let activities = state.inventory.recent_activity(&ctx, query.limit).await?;
    Ok(Json(json!({ "success": true, "activities": activities })))
}
