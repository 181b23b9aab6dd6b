use chrono::Utc;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::remote::{DirectionsProvider, LocationSource, RideRef};

use super::camera::{CameraStatus, LogViewport, Viewport};
use super::error::TrackerError;
use super::route::RouteFetcher;
use super::session::{CycleOutcome, TrackingSession};
use super::types::{RouteView, TrackerMode, TrackerStatus, TrackingSettings};

type ViewportFactory = Box<dyn Fn() -> Box<dyn Viewport> + Send + Sync>;

#[derive(Debug)]
struct WorkerHandle {
    ride_id: String,
    rider_id: String,
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Owns the polling task for at most one ride at a time. Dropping the tracker
/// drops the stop channel, which ends the task at its next wakeup.
pub struct Tracker {
    source: Arc<dyn LocationSource>,
    directions: Option<Arc<dyn DirectionsProvider>>,
    settings: TrackingSettings,
    make_viewport: ViewportFactory,
    shared: Arc<StdMutex<TrackingSession>>,
    worker: Option<WorkerHandle>,
}

fn lock(shared: &StdMutex<TrackingSession>) -> MutexGuard<'_, TrackingSession> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Tracker {
    pub fn new(
        source: Arc<dyn LocationSource>,
        directions: Option<Arc<dyn DirectionsProvider>>,
        settings: TrackingSettings,
    ) -> Self {
        let make_viewport: ViewportFactory = Box::new(|| Box::new(LogViewport) as Box<dyn Viewport>);
        let session = TrackingSession::new(
            TrackerMode::Idle,
            settings.unchanged_threshold_deg,
            make_viewport(),
        );
        Self {
            source,
            directions,
            settings,
            make_viewport,
            shared: Arc::new(StdMutex::new(session)),
            worker: None,
        }
    }

    pub fn with_viewport<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Viewport> + Send + Sync + 'static,
    {
        self.make_viewport = Box::new(factory);
        self
    }

    pub fn status(&self) -> TrackerStatus {
        lock(&self.shared).status()
    }

    pub fn route(&self) -> Option<RouteView> {
        lock(&self.shared).route().cloned()
    }

    pub fn pan(&self) -> Result<CameraStatus, TrackerError> {
        let mut session = lock(&self.shared);
        if !session.is_running() {
            return Err(TrackerError::NotRunning);
        }
        Ok(session.pan())
    }

    pub fn recenter(&self) -> Result<CameraStatus, TrackerError> {
        let mut session = lock(&self.shared);
        if !session.is_running() {
            return Err(TrackerError::NotRunning);
        }
        Ok(session.recenter())
    }

    /// Starts polling for `ride`. Calling again for the same ride leaves the
    /// running loop untouched; a different ride replaces it.
    pub async fn start(&mut self, ride: RideRef) -> TrackerMode {
        let Some((ride_id, rider_id)) = ride.ids() else {
            log::info!("Tracking not ready: ride or rider id missing");
            self.halt().await;
            self.reset_session(TrackerMode::NotReady);
            return TrackerMode::NotReady;
        };

        if let Some(worker) = &self.worker {
            if worker.ride_id == ride_id && worker.rider_id == rider_id && !worker.join.is_finished()
            {
                return lock(&self.shared).mode().clone();
            }
        }

        let ride_id = ride_id.to_string();
        let rider_id = rider_id.to_string();
        self.halt().await;

        let mode = TrackerMode::Running {
            ride_id: ride_id.clone(),
            rider_id: rider_id.clone(),
            started_at: Utc::now(),
        };
        self.reset_session(mode.clone());

        let (stop_tx, stop_rx) = oneshot::channel();
        let shared = self.shared.clone();
        let source = self.source.clone();
        let routes = RouteFetcher::new(
            self.directions.clone(),
            self.settings.refetch_threshold_miles,
        );
        let settings = self.settings;
        let (task_ride, task_rider) = (ride_id.clone(), rider_id.clone());

        log::info!("Tracking driver for ride {} (rider {})", ride_id, rider_id);
        let join = tokio::spawn(async move {
            run_tracking_loop(shared, source, routes, settings, task_ride, task_rider, stop_rx)
                .await;
        });

        self.worker = Some(WorkerHandle {
            ride_id,
            rider_id,
            stop_tx,
            join,
        });
        mode
    }

    pub async fn stop(&mut self) -> TrackerMode {
        self.halt().await;
        let mut session = lock(&self.shared);
        session.set_mode(TrackerMode::Idle);
        TrackerMode::Idle
    }

    async fn halt(&mut self) {
        if let Some(worker) = self.worker.take() {
            log::info!("Stopping tracking for ride {}", worker.ride_id);
            let _ = worker.stop_tx.send(());
            if let Err(e) = worker.join.await {
                log::error!("Tracking task ended abnormally: {}", e);
            }
        }
    }

    fn reset_session(&self, mode: TrackerMode) {
        let session = TrackingSession::new(
            mode,
            self.settings.unchanged_threshold_deg,
            (self.make_viewport)(),
        );
        *lock(&self.shared) = session;
    }
}

async fn run_tracking_loop(
    shared: Arc<StdMutex<TrackingSession>>,
    source: Arc<dyn LocationSource>,
    mut routes: RouteFetcher,
    settings: TrackingSettings,
    ride_id: String,
    rider_id: String,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(settings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // A cycle always finishes before the next tick is awaited, so polls
        // never overlap. A stop request abandons the in-flight cycle.
        let stopped = tokio::select! {
            _ = &mut stop_rx => true,
            _ = async {
                ticker.tick().await;
                poll_cycle(&shared, source.as_ref(), &mut routes, &ride_id, &rider_id).await;
            } => false,
        };
        if stopped {
            break;
        }
    }

    log::debug!("Tracking loop for ride {} exited", ride_id);
}

/// One poll: fetch the driver, fold it into the session, and refresh the
/// route if the driver moved far enough. Errors are logged and recorded,
/// never returned.
pub async fn poll_cycle(
    shared: &StdMutex<TrackingSession>,
    source: &dyn LocationSource,
    routes: &mut RouteFetcher,
    ride_id: &str,
    rider_id: &str,
) -> CycleOutcome {
    let report = match source.driver_location(ride_id, rider_id).await {
        Ok(report) => report,
        Err(e) => {
            log::warn!("Driver location poll for ride {} failed: {}", ride_id, e);
            lock(shared).record_failure(&e);
            return CycleOutcome::Failed;
        }
    };

    let (outcome, target) = {
        let mut session = lock(shared);
        let outcome = session.apply_report(report);
        (outcome, session.route_target(&outcome))
    };

    if let Some((origin, destination)) = target {
        if let Some(update) = routes.refresh(origin, destination).await {
            lock(shared).apply_route(update);
        }
    }

    outcome
}
