use axum::{extract::State, Json};

use crate::remote::RideRef;
use crate::tracker::{CameraStatus, RouteView, TrackerMode, TrackerStatus};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[utoipa::path(
    post,
    path = "/api/tracking/start",
    request_body = RideRef,
    responses(
        (status = 200, description = "Tracking started, or not ready if an id is missing", body = TrackerMode)
    ),
    tag = "tracking"
)]
pub async fn start(
    State(state): State<AppState>,
    Json(ride): Json<RideRef>,
) -> ApiResult<Json<TrackerMode>> {
    let mut tracker = state.tracker.lock().await;
    Ok(Json(tracker.start(ride).await))
}

#[utoipa::path(
    post,
    path = "/api/tracking/stop",
    responses(
        (status = 200, description = "Tracking stopped", body = TrackerMode)
    ),
    tag = "tracking"
)]
pub async fn stop(State(state): State<AppState>) -> ApiResult<Json<TrackerMode>> {
    let mut tracker = state.tracker.lock().await;
    Ok(Json(tracker.stop().await))
}

#[utoipa::path(
    get,
    path = "/api/tracking/status",
    responses(
        (status = 200, description = "Current tracking state", body = TrackerStatus)
    ),
    tag = "tracking"
)]
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<TrackerStatus>> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.status()))
}

#[utoipa::path(
    get,
    path = "/api/tracking/route",
    responses(
        (status = 200, description = "Latest route to pickup", body = Option<RouteView>)
    ),
    tag = "tracking"
)]
pub async fn route(State(state): State<AppState>) -> ApiResult<Json<Option<RouteView>>> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.route()))
}

#[utoipa::path(
    post,
    path = "/api/tracking/camera/pan",
    responses(
        (status = 200, description = "Follow mode disabled", body = CameraStatus),
        (status = 409, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn pan(State(state): State<AppState>) -> ApiResult<Json<CameraStatus>> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.pan()?))
}

#[utoipa::path(
    post,
    path = "/api/tracking/camera/recenter",
    responses(
        (status = 200, description = "Follow mode enabled and camera recentered", body = CameraStatus),
        (status = 409, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn recenter(State(state): State<AppState>) -> ApiResult<Json<CameraStatus>> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.recenter()?))
}
