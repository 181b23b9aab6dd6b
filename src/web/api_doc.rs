use utoipa::OpenApi;

use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::tracking::start,
        super::api::tracking::stop,
        super::api::tracking::status,
        super::api::tracking::route,
        super::api::tracking::pan,
        super::api::tracking::recenter,
        super::api::polyline::decode,
        super::api::polyline::encode,
    ),
    components(
        schemas(
            ErrorResponse,
            super::api::polyline::EncodeResponse,
            crate::remote::RideRef,
            crate::geo::GeoCoordinate,
            crate::geo::DriverLocationSample,
            crate::tracker::TrackerMode,
            crate::tracker::TrackerStatus,
            crate::tracker::TrackingPhase,
            crate::tracker::RouteView,
            crate::tracker::CameraStatus,
            crate::tracker::Region,
        )
    ),
    info(
        title = "Ride Tracker API",
        description = "Live driver tracking for a single ride",
        version = "0.1.0"
    ),
    tags(
        (name = "tracking", description = "Driver tracking session"),
        (name = "polyline", description = "Polyline utilities")
    )
)]
pub struct ApiDoc;
