use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::RemoteError;
use crate::geo::{decode_polyline, GeoCoordinate};

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// A decoded route between two points, as the provider reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub path: Vec<GeoCoordinate>,
    pub duration_seconds: Option<f64>,
    pub distance_meters: Option<f64>,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<RoutedPath, RemoteError>;
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    pub overview_polyline: OverviewPolyline,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub duration_in_traffic: Option<TextValue>,
    #[serde(default)]
    pub distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub value: f64,
}

impl RouteLeg {
    /// Traffic-aware duration wins over the scheduled one.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_in_traffic
            .as_ref()
            .or(self.duration.as_ref())
            .map(|d| d.value)
    }
}

impl DirectionsResponse {
    pub fn into_routed_path(self) -> Result<RoutedPath, RemoteError> {
        if self.status != "OK" {
            return Err(RemoteError::Directions {
                status: self.status,
                message: self.error_message.unwrap_or_default(),
            });
        }

        let route = self.routes.into_iter().next().ok_or(RemoteError::NoRoute)?;
        let path = decode_polyline(&route.overview_polyline.points)?;
        let leg = route.legs.first();

        Ok(RoutedPath {
            path,
            duration_seconds: leg.and_then(RouteLeg::duration_seconds),
            distance_meters: leg.and_then(|l| l.distance.as_ref()).map(|d| d.value),
        })
    }
}

pub struct GoogleDirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    traffic_model: String,
}

impl GoogleDirectionsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        traffic_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            traffic_model: traffic_model.into(),
        })
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    async fn route(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<RoutedPath, RemoteError> {
        log::debug!(
            "Requesting directions {} -> {}",
            origin.to_query(),
            destination.to_query()
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", origin.to_query()),
                ("destination", destination.to_query()),
                ("departure_time", "now".to_string()),
                ("traffic_model", self.traffic_model.clone()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                url: self.base_url.clone(),
            });
        }

        let text = response.text().await?;
        let body: DirectionsResponse = serde_json::from_str(&text)?;
        body.into_routed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<RoutedPath, RemoteError> {
        serde_json::from_str::<DirectionsResponse>(body)
            .unwrap()
            .into_routed_path()
    }

    #[test]
    fn ok_response_prefers_traffic_duration() {
        let routed = parse(
            r#"{
                "status": "OK",
                "routes": [{
                    "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"},
                    "legs": [{
                        "duration": {"text": "9 mins", "value": 540},
                        "duration_in_traffic": {"text": "12 mins", "value": 720},
                        "distance": {"text": "2.1 mi", "value": 3380}
                    }]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(routed.path.len(), 3);
        assert_eq!(routed.duration_seconds, Some(720.0));
        assert_eq!(routed.distance_meters, Some(3380.0));
    }

    #[test]
    fn falls_back_to_scheduled_duration() {
        let routed = parse(
            r#"{
                "status": "OK",
                "routes": [{
                    "overview_polyline": {"points": "??"},
                    "legs": [{"duration": {"value": 300}}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(routed.duration_seconds, Some(300.0));
        assert_eq!(routed.distance_meters, None);
    }

    #[test]
    fn non_ok_status_is_error() {
        let err = parse(r#"{"status": "REQUEST_DENIED", "error_message": "bad key", "routes": []}"#)
            .unwrap_err();
        assert!(matches!(err, RemoteError::Directions { ref status, .. } if status == "REQUEST_DENIED"));
    }

    #[test]
    fn ok_without_routes_is_error() {
        assert!(matches!(
            parse(r#"{"status": "OK", "routes": []}"#),
            Err(RemoteError::NoRoute)
        ));
    }

    #[test]
    fn bad_polyline_is_error() {
        let err = parse(r#"{"status": "OK", "routes": [{"overview_polyline": {"points": "_"}}]}"#)
            .unwrap_err();
        assert!(matches!(err, RemoteError::Polyline(_)));
    }
}
