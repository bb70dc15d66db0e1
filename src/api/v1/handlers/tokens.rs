/*
 * Responsibility
 * - 動作確認用の credential 発行 (GET)
 *   - /online-store/token: subject + Customer
 *   - /online-store/non-user-token: subject なし + Customer
 *   - /online-store/non-customer-token: subject + 空の role
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::tokens::TokenResponse,
    error::AppError,
    services::orders::CUSTOMER_ROLE,
    state::AppState,
};

const DEMO_SUBJECT: &str = "John";

pub async fn issue_customer_token(
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>, AppError> {
    issue(&state, Some(DEMO_SUBJECT), CUSTOMER_ROLE)
}

pub async fn issue_non_user_token(
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>, AppError> {
    issue(&state, None, CUSTOMER_ROLE)
}

pub async fn issue_non_customer_token(
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>, AppError> {
    issue(&state, Some(DEMO_SUBJECT), "")
}

fn issue(
    state: &AppState,
    subject: Option<&str>,
    role: &str,
) -> Result<Json<TokenResponse>, AppError> {
    let access_token = state.codec.issue(subject, role)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.codec.ttl_seconds(),
    }))
}
