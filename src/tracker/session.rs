use std::fmt::Display;

use crate::geo::{bearing_deg, GeoCoordinate};
use crate::remote::LocationReport;

use super::camera::{CameraController, CameraStatus, Viewport};
use super::poller::{LocationPoller, Observation};
use super::route::RouteUpdate;
use super::types::{RouteView, TrackerMode, TrackerStatus, TrackingPhase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Well-formed response without a driver position yet.
    WaitingForDriver,
    Unchanged,
    Moved {
        position: GeoCoordinate,
        destination: Option<GeoCoordinate>,
    },
    Failed,
}

/// All mutable tracking state for one ride. The polling task is the only
/// writer of location fields; gesture calls are the only writers of the
/// camera follow flag.
pub struct TrackingSession {
    mode: TrackerMode,
    poller: LocationPoller,
    camera: CameraController,
    viewport: Box<dyn Viewport>,
    heading_deg: Option<f64>,
    pickup: Option<GeoCoordinate>,
    ride_status: Option<String>,
    booking_status: Option<String>,
    route: Option<RouteView>,
    last_error: Option<String>,
    polls: u64,
    failures: u64,
}

impl TrackingSession {
    pub fn new(mode: TrackerMode, threshold_deg: f64, viewport: Box<dyn Viewport>) -> Self {
        Self {
            mode,
            poller: LocationPoller::new(threshold_deg),
            camera: CameraController::default(),
            viewport,
            heading_deg: None,
            pickup: None,
            ride_status: None,
            booking_status: None,
            route: None,
            last_error: None,
            polls: 0,
            failures: 0,
        }
    }

    pub fn mode(&self) -> &TrackerMode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: TrackerMode) {
        self.mode = mode;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.mode, TrackerMode::Running { .. })
    }

    pub fn apply_report(&mut self, report: LocationReport) -> CycleOutcome {
        self.polls += 1;
        self.last_error = None;
        if report.pickup_location.is_some() {
            self.pickup = report.pickup_location;
        }
        if report.ride_status.is_some() {
            self.ride_status = report.ride_status;
        }
        if report.booking_status.is_some() {
            self.booking_status = report.booking_status;
        }

        let Some(location) = report.driver_location else {
            return CycleOutcome::WaitingForDriver;
        };

        match self.poller.observe(location.into()) {
            Observation::Unchanged => CycleOutcome::Unchanged,
            Observation::Moved { current, previous } => {
                if let Some(previous) = previous {
                    self.heading_deg = Some(bearing_deg(&previous.position, &current.position));
                }
                if let Some(mv) = self.camera.on_driver_moved(current.position) {
                    self.viewport.animate_to_region(mv.region, mv.duration_ms);
                }
                CycleOutcome::Moved {
                    position: current.position,
                    destination: self.pickup,
                }
            }
        }
    }

    /// Origin and destination for a directions refresh after `outcome`.
    /// A stationary driver still gets a first route once the pickup is known.
    pub fn route_target(&self, outcome: &CycleOutcome) -> Option<(GeoCoordinate, GeoCoordinate)> {
        match *outcome {
            CycleOutcome::Moved {
                position,
                destination: Some(destination),
            } => Some((position, destination)),
            CycleOutcome::Moved { .. } | CycleOutcome::Unchanged if self.route.is_none() => {
                let current = self.poller.current().map(|s| s.position);
                current.zip(self.pickup)
            }
            _ => None,
        }
    }

    pub fn record_failure(&mut self, error: &dyn Display) {
        self.polls += 1;
        self.failures += 1;
        self.last_error = Some(error.to_string());
    }

    pub fn apply_route(&mut self, update: RouteUpdate) {
        self.route = Some(match update {
            RouteUpdate::Routed(snapshot) => snapshot.into(),
            RouteUpdate::StraightLine(path) => {
                // keep whatever ETA the provider last gave us
                let previous = self.route.take();
                RouteView {
                    path,
                    eta: previous.as_ref().and_then(|r| r.eta.clone()),
                    eta_minutes: previous.as_ref().and_then(|r| r.eta_minutes),
                    distance_miles: previous.as_ref().and_then(|r| r.distance_miles),
                    straight_line: true,
                }
            }
        });
    }

    pub fn route(&self) -> Option<&RouteView> {
        self.route.as_ref()
    }

    pub fn pan(&mut self) -> CameraStatus {
        self.camera.on_pan();
        self.camera.status()
    }

    pub fn recenter(&mut self) -> CameraStatus {
        if let Some(mv) = self.camera.recenter() {
            self.viewport.animate_to_region(mv.region, mv.duration_ms);
        }
        self.camera.status()
    }

    pub fn status(&self) -> TrackerStatus {
        let current = self.poller.current().copied();
        TrackerStatus {
            mode: self.mode.clone(),
            phase: if current.is_some() {
                TrackingPhase::Tracking
            } else {
                TrackingPhase::WaitingForDriver
            },
            current,
            previous: self.poller.previous().copied(),
            heading_deg: self.heading_deg,
            pickup: self.pickup,
            ride_status: self.ride_status.clone(),
            booking_status: self.booking_status.clone(),
            route: self.route.clone(),
            camera: self.camera.status(),
            last_error: self.last_error.clone(),
            polls: self.polls,
            failures: self.failures,
        }
    }
}
