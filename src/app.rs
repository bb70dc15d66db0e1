/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (codec / gate / order service) → Router 組み立て
 * - Middleware の適用 (gate stage / request-id / trace など)
 * - axum::serve() で起動
 */
use std::{panic, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::auth::build_credential_codec;
use crate::services::gate::AuthorizationGate;
use crate::services::orders::{OrderProcessor, OrderService};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,order_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,order_gate=debug,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        // The request itself is answered by the CatchPanic layer.
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env()?;

    tracing::info!(
        env = ?config.app_env,
        composition = ?config.gate_composition,
        addr = %config.addr,
        "starting order gate"
    );

    let state = build_state(&config);
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level services and inject them into the shared state.
pub fn build_state(config: &Config) -> AppState {
    let codec = build_credential_codec(config);
    let gate = Arc::new(AuthorizationGate::new(codec.clone()));
    let orders = Arc::new(OrderService::new(gate, OrderProcessor::default()));

    AppState::new(codec, orders)
}

/// Router with every layer applied, as served.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state, config.gate_composition))
        .with_state(state);

    middleware::http::apply(router)
}
