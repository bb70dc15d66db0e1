/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - Outcome (注文処理の最終結果) を HTTP レスポンスへ変換
 * - axum の JsonRejection も同じ JSON error body に揃える
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::orders::{Outcome, RejectionCategory, service::SERVER_ERROR_MESSAGE};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{message}")]
    Rejected {
        category: RejectionCategory,
        message: String,
    },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn rejected(category: RejectionCategory, message: impl Into<String>) -> Self {
        Self::Rejected {
            category,
            message: message.into(),
        }
    }
}

// Both auth and authz rejections are 401; the code tells them apart.
fn status_and_code(category: RejectionCategory) -> (StatusCode, &'static str) {
    match category {
        RejectionCategory::Auth => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
        RejectionCategory::Authz => (StatusCode::UNAUTHORIZED, "FORBIDDEN"),
        RejectionCategory::Validation => (StatusCode::BAD_REQUEST, "INVALID_ORDER"),
        RejectionCategory::Business => (StatusCode::BAD_REQUEST, "ORDER_REJECTED"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Rejected { category, message } => {
                let (status, code) = status_and_code(category);
                (status, code, message)
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                SERVER_ERROR_MESSAGE.to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request("INVALID_BODY", e.body_text())
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Processed(message) => {
                (StatusCode::OK, Json(MessageResponse { message })).into_response()
            }
            Outcome::Rejected { reason, category } => {
                AppError::rejected(category, reason).into_response()
            }
            // Already logged where it happened; the reason stays server-side.
            Outcome::ServerError(_) => AppError::Internal.into_response(),
        }
    }
}
