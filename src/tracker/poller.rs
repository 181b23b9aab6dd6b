use crate::geo::DriverLocationSample;

pub const UNCHANGED_THRESHOLD_DEG: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// Within the jitter threshold of the current sample; nothing downstream runs.
    Unchanged,
    Moved {
        current: DriverLocationSample,
        previous: Option<DriverLocationSample>,
    },
}

/// Keeps the current and previous driver fixes. Older fixes are dropped.
#[derive(Debug, Clone)]
pub struct LocationPoller {
    threshold_deg: f64,
    current: Option<DriverLocationSample>,
    previous: Option<DriverLocationSample>,
}

impl LocationPoller {
    pub fn new(threshold_deg: f64) -> Self {
        Self {
            threshold_deg,
            current: None,
            previous: None,
        }
    }

    pub fn current(&self) -> Option<&DriverLocationSample> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&DriverLocationSample> {
        self.previous.as_ref()
    }

    pub fn observe(&mut self, sample: DriverLocationSample) -> Observation {
        if let Some(current) = &self.current {
            if current.position.within(&sample.position, self.threshold_deg) {
                return Observation::Unchanged;
            }
        }

        self.previous = self.current.replace(sample);
        Observation::Moved {
            current: sample,
            previous: self.previous,
        }
    }
}

impl Default for LocationPoller {
    fn default() -> Self {
        Self::new(UNCHANGED_THRESHOLD_DEG)
    }
}
