use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker not running")]
    NotRunning,
}
