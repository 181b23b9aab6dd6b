mod camera;
mod error;
mod eta;
mod poller;
mod route;
mod session;
#[allow(clippy::module_inception)]
mod tracker;
mod types;

pub use camera::{CameraStatus, Region};
pub use error::TrackerError;
pub use tracker::Tracker;
pub use types::{RouteView, TrackerMode, TrackerStatus, TrackingPhase, TrackingSettings};
