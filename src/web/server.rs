use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::tracker::Tracker;

use super::api::polyline as polyline_handlers;
use super::api::tracking as tracking_handlers;
use super::api_doc::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<Tracker>>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Tracking API endpoints
        .route("/api/tracking/start", post(tracking_handlers::start))
        .route("/api/tracking/stop", post(tracking_handlers::stop))
        .route("/api/tracking/status", get(tracking_handlers::status))
        .route("/api/tracking/route", get(tracking_handlers::route))
        .route("/api/tracking/camera/pan", post(tracking_handlers::pan))
        .route(
            "/api/tracking/camera/recenter",
            post(tracking_handlers::recenter),
        )
        // Utilities
        .route("/api/polyline/decode", get(polyline_handlers::decode))
        .route("/api/polyline/encode", post(polyline_handlers::encode))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(bind_addr: &str, tracker: Tracker) -> std::io::Result<()> {
    let state = AppState {
        tracker: Arc::new(Mutex::new(tracker)),
    };
    let app = router(state.clone());

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let result = axum::serve(listener, app).await;

    state.tracker.lock().await.stop().await;
    result
}
