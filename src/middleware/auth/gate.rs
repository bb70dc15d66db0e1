//! Gate stages as middleware: staged composition of the authorization gate.
//!
//! Each stage of a [`GatePipeline`] becomes one `route_layer`, in pipeline
//! order. The [`RequestScope`] travels between layers in the request
//! extensions; the handler behind them reads the identity through
//! `api::v1::extractors::Identity`.
//!
//! A rejected stage answers immediately; later stages and the handler never run.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::middleware::bearer_token;
use crate::services::gate::{GatePipeline, GateStage, RequestScope, run_stage};
use crate::services::orders::Outcome;
use crate::state::AppState;

/// Register every pipeline stage in front of the routes of `router`.
///
/// 例：
/// ```ignore
/// let orders = Router::new().route("/online-store", post(process_order_staged));
/// let orders = middleware::auth::gate::apply(orders, state.orders.filters());
/// ```
pub fn apply(router: Router<AppState>, pipeline: &GatePipeline) -> Router<AppState> {
    // The layer added last runs first, so register in reverse.
    pipeline
        .stages()
        .iter()
        .rev()
        .fold(router, |router, stage| {
            router.route_layer(middleware::from_fn_with_state(
                stage.clone(),
                stage_middleware,
            ))
        })
}

async fn stage_middleware(
    State(stage): State<Arc<dyn GateStage>>,
    mut req: Request,
    next: Next,
) -> Response {
    // The first stage builds the scope from the Authorization header.
    let carried = req.extensions_mut().remove::<RequestScope>();
    let mut scope = carried.unwrap_or_else(|| RequestScope::new(bearer_token(req.headers())));

    if let Err(err) = run_stage(stage.as_ref(), &mut scope) {
        return Outcome::from(err).into_response();
    }

    // stage → 次の stage / extractor への受け渡し
    req.extensions_mut().insert(scope);

    next.run(req).await
}
