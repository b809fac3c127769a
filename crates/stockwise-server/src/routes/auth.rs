//! Registration, login, logout and session status.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use stockwise_auth::{LoginInput, RegisterInput};
use stockwise_core::error::StockwiseError;
use tower_cookies::Cookies;

use super::{clear_session_cookie, resolve_session, session_token, set_session_cookie};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RegisterPayload {
    full_name: String,
    email: String,
    password: String,
    company: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginPayload {
    email: String,
    password: String,
}

pub(super) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    state
        .accounts
        .register(RegisterInput {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
            company: payload.company,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful. Your account is pending admin approval.",
        })),
    ))
}

pub(super) async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(StockwiseError::validation("email and password are required").into());
    }

    let out = state
        .auth
        .login(LoginInput {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    set_session_cookie(&cookies, out.token, &state.cookies);

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "role": out.user.role,
        "user": {
            "id": out.user.id,
            "fullName": out.user.full_name,
            "email": out.user.email,
            "role": out.user.role,
        },
    })))
}

pub(super) async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError> {
    state.auth.logout(session_token(&cookies).as_deref()).await?;
    clear_session_cookie(&cookies, &state.cookies);

    Ok(Json(json!({
        "success": true,
        "message": "Logged out successfully",
    })))
}

/// Reports whether the cookie maps to a live session. Never 401s.
pub(super) async fn session(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError> {
    match resolve_session(&state, &cookies).await {
        Ok(ctx) => Ok(Json(json!({
            "authenticated": true,
            "role": ctx.role,
            "email": ctx.email,
        }))),
        Err(StockwiseError::AuthenticationFailed { .. }) => {
            Ok(Json(json!({ "authenticated": false })))
        }
        Err(e) => Err(e.into()),
    }
}
