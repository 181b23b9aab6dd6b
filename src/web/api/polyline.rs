use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::geo::{decode_polyline, encode_polyline, GeoCoordinate};
use crate::web::api::error::{ApiResult, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DecodeQuery {
    /// Encoded polyline, 5 decimal places
    pub points: String,
}

#[utoipa::path(
    get,
    path = "/api/polyline/decode",
    params(DecodeQuery),
    responses(
        (status = 200, description = "Decoded coordinates", body = Vec<GeoCoordinate>),
        (status = 400, description = "Malformed polyline", body = ErrorResponse)
    ),
    tag = "polyline"
)]
pub async fn decode(Query(query): Query<DecodeQuery>) -> ApiResult<Json<Vec<GeoCoordinate>>> {
    Ok(Json(decode_polyline(&query.points)?))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EncodeResponse {
    pub points: String,
}

#[utoipa::path(
    post,
    path = "/api/polyline/encode",
    request_body = Vec<GeoCoordinate>,
    responses(
        (status = 200, description = "Encoded polyline", body = EncodeResponse),
        (status = 400, description = "Coordinate out of range", body = ErrorResponse)
    ),
    tag = "polyline"
)]
pub async fn encode(
    Json(coordinates): Json<Vec<GeoCoordinate>>,
) -> ApiResult<Json<EncodeResponse>> {
    Ok(Json(EncodeResponse {
        points: encode_polyline(&coordinates)?,
    }))
}
