use serde::Serialize;
use utoipa::ToSchema;

use crate::geo::GeoCoordinate;

pub const REGION_DELTA_DEG: f64 = 0.01;
pub const FIRST_FIX_ANIMATION_MS: u64 = 1000;
pub const FOLLOW_ANIMATION_MS: u64 = 500;
pub const RECENTER_ANIMATION_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Region {
    pub center: GeoCoordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn around(center: GeoCoordinate) -> Self {
        Self {
            center,
            latitude_delta: REGION_DELTA_DEG,
            longitude_delta: REGION_DELTA_DEG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    pub region: Region,
    pub duration_ms: u64,
}

/// Whatever renders the map. Receives one call per camera animation.
pub trait Viewport: Send {
    fn animate_to_region(&mut self, region: Region, duration_ms: u64);
}

/// Viewport for headless sessions: logs the move and nothing else.
#[derive(Debug, Default)]
pub struct LogViewport;

impl Viewport for LogViewport {
    fn animate_to_region(&mut self, region: Region, duration_ms: u64) {
        log::debug!(
            "Camera -> {} over {}ms",
            region.center.to_query(),
            duration_ms
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct CameraStatus {
    pub follow: bool,
    pub region: Option<Region>,
}

/// Follow-mode state. Only gestures and recenter touch `follow`; only driver
/// updates touch the last known position.
#[derive(Debug, Clone)]
pub struct CameraController {
    follow: bool,
    centered_once: bool,
    driver: Option<GeoCoordinate>,
    region: Option<Region>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            follow: true,
            centered_once: false,
            driver: None,
            region: None,
        }
    }
}

impl CameraController {
    pub fn status(&self) -> CameraStatus {
        CameraStatus {
            follow: self.follow,
            region: self.region,
        }
    }

    /// The user dragged the map.
    pub fn on_pan(&mut self) {
        if self.follow {
            log::debug!("Camera follow disabled by pan");
        }
        self.follow = false;
    }

    /// Resume following and jump to the driver if we know where they are.
    pub fn recenter(&mut self) -> Option<CameraMove> {
        self.follow = true;
        let driver = self.driver?;
        self.centered_once = true;
        Some(self.issue(driver, RECENTER_ANIMATION_MS))
    }

    pub fn on_driver_moved(&mut self, position: GeoCoordinate) -> Option<CameraMove> {
        self.driver = Some(position);
        if !self.follow {
            return None;
        }

        let duration_ms = if self.centered_once {
            FOLLOW_ANIMATION_MS
        } else {
            FIRST_FIX_ANIMATION_MS
        };
        self.centered_once = true;
        Some(self.issue(position, duration_ms))
    }

    fn issue(&mut self, center: GeoCoordinate, duration_ms: u64) -> CameraMove {
        let region = match self.region {
            Some(previous) => Region { center, ..previous },
            None => Region::around(center),
        };
        self.region = Some(region);
        CameraMove {
            region,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, -122.0)
    }

    #[test]
    fn follows_by_default_with_longer_first_animation() {
        let mut camera = CameraController::default();
        assert!(camera.status().follow);

        let first = camera.on_driver_moved(point(37.0)).unwrap();
        assert_eq!(first.duration_ms, FIRST_FIX_ANIMATION_MS);
        assert_eq!(first.region, Region::around(point(37.0)));

        let second = camera.on_driver_moved(point(37.01)).unwrap();
        assert_eq!(second.duration_ms, FOLLOW_ANIMATION_MS);
        assert_eq!(second.region.center, point(37.01));
    }

    #[test]
    fn pan_stops_following() {
        let mut camera = CameraController::default();
        camera.on_driver_moved(point(37.0));
        camera.on_pan();
        assert!(!camera.status().follow);
        assert_eq!(camera.on_driver_moved(point(37.02)), None);
        assert_eq!(camera.status().region.unwrap().center, point(37.0));
    }

    #[test]
    fn recenter_resumes_at_latest_position() {
        let mut camera = CameraController::default();
        camera.on_driver_moved(point(37.0));
        camera.on_pan();
        camera.on_driver_moved(point(37.05));

        let moved = camera.recenter().unwrap();
        assert!(camera.status().follow);
        assert_eq!(moved.region.center, point(37.05));
        assert_eq!(moved.duration_ms, RECENTER_ANIMATION_MS);

        let next = camera.on_driver_moved(point(37.06)).unwrap();
        assert_eq!(next.duration_ms, FOLLOW_ANIMATION_MS);
    }

    #[test]
    fn recenter_without_driver_only_sets_follow() {
        let mut camera = CameraController::default();
        camera.on_pan();
        assert_eq!(camera.recenter(), None);
        assert!(camera.status().follow);
    }
}
