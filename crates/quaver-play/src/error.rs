use quaver_timing::TimingError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlayError {
    #[error(
        "hit windows must be ascending: perfect {perfect} < great {great} < good {good} < bad {bad}"
    )]
    WindowsNotAscending {
        perfect: f64,
        great: f64,
        good: f64,
        bad: f64,
    },

    #[error("lane {lane} is out of range (lane count {lane_count})")]
    InvalidLane { lane: usize, lane_count: usize },

    #[error(transparent)]
    Timing(#[from] TimingError),
}
