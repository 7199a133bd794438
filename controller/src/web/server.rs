use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::get,
    Router,
};
use std::future::Future;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === STATUS ROUTES ===
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        // === DRAIN SCHEDULE ROUTES ===
        .route("/api/schedules", get(handlers::list_schedules))
        .route(
            "/api/schedules/{node_name}",
            get(handlers::get_schedule)
                .post(handlers::create_schedule)
                .delete(handlers::delete_schedule),
        )
        .route(
            "/api/schedules/{node_name}/stale",
            get(handlers::check_stale_schedule),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
