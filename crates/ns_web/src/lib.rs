use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/sources", get(handlers::list_sources))
        .route("/pages/:source", get(handlers::get_pages))
        .route("/news/:source", get(handlers::get_news))
        .fallback(handlers::not_found)
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_app(state).await;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "🌐 Listening");
    axum::serve(listener, app).await
}

pub mod prelude {
    pub use crate::AppState;
    pub use ns_core::{Error, Result};
}
