use reqwest::StatusCode;
use thiserror::Error;

use crate::geo::GeoError;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid ride API URL: {0}")]
    InvalidUrl(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("location endpoint reported failure")]
    Unsuccessful,
    #[error("directions status {status}: {message}")]
    Directions { status: String, message: String },
    #[error("directions response has no route")]
    NoRoute,
    #[error("invalid route polyline: {0}")]
    Polyline(#[from] GeoError),
}
