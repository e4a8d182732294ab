mod config;
mod errors;
mod hedge;
mod server;
mod state;
mod stats;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    // Structured logging (stderr, env-filterable)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("hedgemill engine starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(cfg.clone());

    let app = axum::Router::new()
        .route(
            "/api/hedge/quote",
            axum::routing::post(server::routes::post_hedge_quote),
        )
        .route(
            "/api/consolation/quote",
            axum::routing::post(server::routes::post_consolation_quote),
        )
        .route(
            "/api/hedge/simulate",
            axum::routing::post(server::routes::post_hedge_simulate),
        )
        .route(
            "/api/consolation/simulate",
            axum::routing::post(server::routes::post_consolation_simulate),
        )
        .route(
            "/api/hedge/optimize",
            axum::routing::post(server::routes::post_hedge_optimize),
        )
        .route(
            "/api/consolation/optimize",
            axum::routing::post(server::routes::post_consolation_optimize),
        )
        .route(
            "/api/counters",
            axum::routing::get(server::routes::get_counters),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", cfg.server_port);
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
