//! Router-subsystem error type.

use thiserror::Error;

/// Errors produced by `rr-router`.
///
/// "No route" between a waypoint pair is not an error: the pair's leg is
/// simply absent from the [`crate::RouteSet`], per the partial-failure
/// contract.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("at least two waypoints are required")]
    TooFewWaypoints,

    #[error("routing was cancelled")]
    Cancelled,
}

pub type RouterResult<T> = Result<T, RouterError>;
