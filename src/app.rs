/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → Firebase client 生成 (起動時に一度だけ) → Router 組み立て
 * - Middleware の適用 (CORS / request-id / trace)
 * - axum::serve() で起動
 */
use std::{panic, process};

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::services::firebase::build_firebase_auth;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,session_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    if let Err(err) = serve().await {
        tracing::error!(error = %err, "server terminated");
        return Err(err.into());
    }

    Ok(())
}

async fn serve() -> Result<(), AppError> {
    let (config, app) = prepare(Config::from_env())?;
    init_panic_hook(!config.app_env.is_production());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        "main server listening on {} ({:?} mode)",
        config.addr,
        config.app_env
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Everything that must succeed before the listener is bound.
fn prepare(config: Result<Config, ConfigError>) -> Result<(Config, Router), AppError> {
    let config = config?;
    let state = build_state(&config)?;
    let app = build_router(state, &config);

    Ok((config, app))
}

fn build_state(config: &Config) -> Result<AppState, AppError> {
    // Built once per process and shared by every request.
    let firebase = build_firebase_auth(config)?;
    tracing::info!(project_id = %firebase.project_id(), "firebase auth client initialized");

    Ok(AppState::new(firebase))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes().with_state(state);
    let router = middleware::http::apply(router);

    // Outermost, so every response (404/405 from routing included) gets the headers.
    middleware::cors::apply(router, &config.cors)
}
