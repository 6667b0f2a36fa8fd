//! HTTP server wiring.

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes::create_router;
use crate::state::AppState;

/// Router with request tracing applied.
pub fn build_app(state: AppState) -> Router {
    create_router(state).layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("power systems data API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_app(state)).await
}
