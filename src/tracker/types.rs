use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::geo::{DriverLocationSample, GeoCoordinate};

use super::camera::CameraStatus;
use super::poller::UNCHANGED_THRESHOLD_DEG;
use super::route::{RouteSnapshot, REFETCH_THRESHOLD_MILES};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSettings {
    pub poll_interval: Duration,
    pub unchanged_threshold_deg: f64,
    pub refetch_threshold_miles: f64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            unchanged_threshold_deg: UNCHANGED_THRESHOLD_DEG,
            refetch_threshold_miles: REFETCH_THRESHOLD_MILES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub enum TrackerMode {
    Idle,
    /// Ride or rider id missing; nothing is polled.
    NotReady,
    Running {
        ride_id: String,
        rider_id: String,
        started_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPhase {
    WaitingForDriver,
    Tracking,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct RouteView {
    pub path: Vec<GeoCoordinate>,
    pub eta: Option<String>,
    pub eta_minutes: Option<i64>,
    pub distance_miles: Option<f64>,
    pub straight_line: bool,
}

impl From<RouteSnapshot> for RouteView {
    fn from(snapshot: RouteSnapshot) -> Self {
        Self {
            path: snapshot.path,
            eta: snapshot.eta,
            eta_minutes: snapshot.eta_minutes,
            distance_miles: snapshot.distance_miles,
            straight_line: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TrackerStatus {
    pub mode: TrackerMode,
    pub phase: TrackingPhase,
    pub current: Option<DriverLocationSample>,
    pub previous: Option<DriverLocationSample>,
    pub heading_deg: Option<f64>,
    pub pickup: Option<GeoCoordinate>,
    pub ride_status: Option<String>,
    pub booking_status: Option<String>,
    pub route: Option<RouteView>,
    pub camera: CameraStatus,
    pub last_error: Option<String>,
    pub polls: u64,
    pub failures: u64,
}
