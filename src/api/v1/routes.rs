/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /online-store (注文), /online-store/{token,non-user-token,non-customer-token} (credential 発行) を merge
 * - gate の構成方式 (inline / staged) に応じて、注文ルートに route_layer を掛けるかをここで決める
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    config::GateComposition,
    middleware,
    state::AppState,
};

use crate::api::v1::handlers::{
    health::health,
    orders::{process_order_inline, process_order_staged},
    tokens::{issue_customer_token, issue_non_customer_token, issue_non_user_token},
};

pub fn routes(state: &AppState, composition: GateComposition) -> Router<AppState> {
    let orders = match composition {
        GateComposition::Inline => {
            Router::new().route("/online-store", post(process_order_inline))
        }
        GateComposition::Staged => middleware::auth::gate::apply(
            Router::new().route("/online-store", post(process_order_staged)),
            state.orders.filters(),
        ),
    };

    Router::new()
        .route("/health", get(health))
        .route("/online-store/token", get(issue_customer_token))
        .route("/online-store/non-user-token", get(issue_non_user_token))
        .route(
            "/online-store/non-customer-token",
            get(issue_non_customer_token),
        )
        .merge(orders)
}
