use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude within ±90 and longitude within ±180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `true` when both axes differ from `other` by no more than `threshold_deg`.
    pub fn within(&self, other: &GeoCoordinate, threshold_deg: f64) -> bool {
        (self.latitude - other.latitude).abs() <= threshold_deg
            && (self.longitude - other.longitude).abs() <= threshold_deg
    }

    /// Formats as `lat,lng`, the form the directions provider expects.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DriverLocationSample {
    pub position: GeoCoordinate,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DriverLocationSample {
    pub fn new(position: GeoCoordinate, updated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            position,
            updated_at,
        }
    }
}
