use std::sync::Arc;

use crate::geo::{haversine_miles, meters_to_miles, GeoCoordinate};
use crate::remote::{DirectionsProvider, RoutedPath};

use super::eta::{eta_minutes, format_eta, round_miles};

pub const REFETCH_THRESHOLD_MILES: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSnapshot {
    pub path: Vec<GeoCoordinate>,
    pub eta_minutes: Option<i64>,
    pub eta: Option<String>,
    pub distance_miles: Option<f64>,
}

impl From<RoutedPath> for RouteSnapshot {
    fn from(routed: RoutedPath) -> Self {
        let duration = routed.duration_seconds.filter(|s| s.is_finite());
        let distance = routed.distance_meters.filter(|m| m.is_finite());
        Self {
            path: routed.path,
            eta_minutes: duration.map(eta_minutes),
            eta: duration.map(format_eta),
            distance_miles: distance.map(|m| round_miles(meters_to_miles(m))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteUpdate {
    Routed(RouteSnapshot),
    /// Provider unavailable or failed: origin and destination only, no ETA.
    StraightLine(Vec<GeoCoordinate>),
}

/// Gates and performs directions requests from the driver to the pickup.
pub struct RouteFetcher {
    provider: Option<Arc<dyn DirectionsProvider>>,
    threshold_miles: f64,
    last_origin: Option<GeoCoordinate>,
}

impl RouteFetcher {
    pub fn new(provider: Option<Arc<dyn DirectionsProvider>>, threshold_miles: f64) -> Self {
        Self {
            provider,
            threshold_miles,
            last_origin: None,
        }
    }

    pub fn should_fetch(&self, origin: &GeoCoordinate) -> bool {
        match &self.last_origin {
            Some(last) => haversine_miles(last, origin) > self.threshold_miles,
            None => true,
        }
    }

    /// Returns `None` when the driver has not moved far enough since the
    /// last attempt. Never fails: provider problems become a straight line.
    pub async fn refresh(
        &mut self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Option<RouteUpdate> {
        if !self.should_fetch(&origin) {
            return None;
        }
        // recorded before the request so a failing provider is not hammered
        self.last_origin = Some(origin);

        let Some(provider) = &self.provider else {
            return Some(RouteUpdate::StraightLine(vec![origin, destination]));
        };

        match provider.route(origin, destination).await {
            Ok(routed) => Some(RouteUpdate::Routed(routed.into())),
            Err(e) => {
                log::warn!("Directions request failed, using straight line: {}", e);
                Some(RouteUpdate::StraightLine(vec![origin, destination]))
            }
        }
    }
}
