/*
 * Responsibility
 * - POST /online-store (注文処理)
 * - inline: handler が最初に gate を呼び、その後で body を読む
 * - staged: gate は middleware で済んでいる前提。handler は Identity を受け取り、検証 → 処理のみ
 * - body の JsonRejection は AppError (INVALID_BODY) として返す
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::{
    api::v1::{dto::orders::ProcessOrderRequest, extractors::Identity},
    error::AppError,
    middleware::bearer_token,
    services::orders::Order,
    state::AppState,
};

pub async fn process_order_inline(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ProcessOrderRequest>, JsonRejection>,
) -> Response {
    // The gate decides before the body is looked at.
    let identity = match state.orders.authorize(bearer_token(&headers)) {
        Ok(identity) => identity,
        Err(outcome) => return outcome.into_response(),
    };

    match body {
        Ok(Json(req)) => state
            .orders
            .handle_authorized(&identity, &Order::from(req))
            .into_response(),
        Err(rejection) => AppError::from(rejection).into_response(),
    }
}

pub async fn process_order_staged(
    State(state): State<AppState>,
    Identity(identity): Identity,
    body: Result<Json<ProcessOrderRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(req)) => state
            .orders
            .handle_authorized(&identity, &Order::from(req))
            .into_response(),
        Err(rejection) => AppError::from(rejection).into_response(),
    }
}
