use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use super::RemoteError;
use crate::geo::{DriverLocationSample, GeoCoordinate};

/// Identifies whose driver is being tracked. Both halves are required before
/// anything is polled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RideRef {
    pub ride_id: Option<String>,
    pub rider_id: Option<String>,
}

impl RideRef {
    pub fn new(ride_id: impl Into<String>, rider_id: impl Into<String>) -> Self {
        Self {
            ride_id: Some(ride_id.into()),
            rider_id: Some(rider_id.into()),
        }
    }

    /// Returns both identifiers when neither is missing or blank.
    pub fn ids(&self) -> Option<(&str, &str)> {
        let ride = self.ride_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let rider = self.rider_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((ride, rider))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<DriverLocation> for DriverLocationSample {
    fn from(location: DriverLocation) -> Self {
        DriverLocationSample::new(
            GeoCoordinate::new(location.latitude, location.longitude),
            location.updated_at,
        )
    }
}

/// Body of the ride tracking endpoint. Only the fields the tracker reads are
/// modelled; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub success: bool,
    #[serde(default)]
    pub driver_location: Option<DriverLocation>,
    #[serde(default)]
    pub pickup_location: Option<GeoCoordinate>,
    #[serde(default)]
    pub ride_status: Option<String>,
    #[serde(default)]
    pub booking_status: Option<String>,
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn driver_location(
        &self,
        ride_id: &str,
        rider_id: &str,
    ) -> Result<LocationReport, RemoteError>;
}

pub struct RideApiClient {
    client: Client,
    base_url: Url,
}

impl RideApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url =
            Url::parse(base_url).map_err(|e| RemoteError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// The ride id is a single path segment; reserved characters in it are
    /// percent-encoded rather than interpreted.
    fn url(&self, ride_id: &str) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "rides", ride_id, "driver-location"]);
        Ok(url)
    }
}

#[async_trait]
impl LocationSource for RideApiClient {
    async fn driver_location(
        &self,
        ride_id: &str,
        rider_id: &str,
    ) -> Result<LocationReport, RemoteError> {
        let url = self.url(ride_id)?;
        log::debug!("Requesting driver location from {} for rider {}", url, rider_id);

        let response = self
            .client
            .get(url.clone())
            .query(&[("riderId", rider_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        let report: LocationReport = serde_json::from_str(&text)?;
        if !report.success {
            return Err(RemoteError::Unsuccessful);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ride_ref_requires_both_ids() {
        assert_eq!(RideRef::new("r1", "u1").ids(), Some(("r1", "u1")));
        assert_eq!(RideRef::default().ids(), None);
        let blank = RideRef {
            ride_id: Some("r1".into()),
            rider_id: Some("  ".into()),
        };
        assert_eq!(blank.ids(), None);
        let partial = RideRef {
            ride_id: None,
            rider_id: Some("u1".into()),
        };
        assert_eq!(partial.ids(), None);
    }

    #[test]
    fn parses_report_with_driver() {
        let body = r#"{
            "success": true,
            "driverLocation": {"latitude": 37.77, "longitude": -122.41, "updatedAt": "2026-10-16T12:00:00Z"},
            "pickupLocation": {"latitude": 37.78, "longitude": -122.40, "address": "Market St"},
            "rideStatus": "in_progress",
            "bookingStatus": "confirmed",
            "fare": 12.5
        }"#;
        let report: LocationReport = serde_json::from_str(body).unwrap();
        let driver = report.driver_location.unwrap();
        assert_eq!(driver.latitude, 37.77);
        assert!(driver.updated_at.is_some());
        assert_eq!(report.pickup_location, Some(GeoCoordinate::new(37.78, -122.40)));
        assert_eq!(report.ride_status.as_deref(), Some("in_progress"));
    }

    #[test]
    fn missing_driver_is_not_an_error() {
        let body = r#"{"success": true, "driverLocation": null, "rideStatus": "scheduled"}"#;
        let report: LocationReport = serde_json::from_str(body).unwrap();
        assert!(report.success);
        assert!(report.driver_location.is_none());
        assert!(report.pickup_location.is_none());
    }

    #[test]
    fn url_strips_trailing_slash() {
        let client = RideApiClient::new("https://rides.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url("abc").unwrap().as_str(),
            "https://rides.test/api/rides/abc/driver-location"
        );
    }

    #[test]
    fn ride_id_stays_one_path_segment() {
        let client = RideApiClient::new("https://rides.test/v1/", Duration::from_secs(1)).unwrap();
        let url = client.url("a/b?x=1#frag").unwrap();
        assert_eq!(
            url.as_str(),
            "https://rides.test/v1/api/rides/a%2Fb%3Fx=1%23frag/driver-location"
        );
        assert_eq!(url.query(), None);
        assert_eq!(
            client.url("../admin").unwrap().as_str(),
            "https://rides.test/v1/api/rides/..%2Fadmin/driver-location"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            RideApiClient::new("not a url", Duration::from_secs(1)),
            Err(RemoteError::InvalidUrl(_))
        ));
        assert!(matches!(
            RideApiClient::new("mailto:rides@test", Duration::from_secs(1)),
            Err(RemoteError::InvalidUrl(_))
        ));
    }
}
