use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/feed/:category", get(handlers::get_feed))
        .route("/api/enhance", post(handlers::enhance))
        .route("/api/audio", post(handlers::audio))
        .route("/api/headlines", get(handlers::headlines))
        .route("/api/gallery", post(handlers::create_gallery_post))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves until the process stops.
pub async fn serve(state: AppState, addr: &str) -> np_core::Result<()> {
    let app = create_app(state).await;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use np_core::{Error, Result};
}
