//! Unified error handling for the waymark engine.
//!
//! All fallible operations return [`Result<T>`]. Geometric and validation
//! errors surface synchronously to the caller of the offending operation; an
//! empty waypoint selection is deliberately *not* an error and falls back to
//! a direct route downstream.

use thiserror::Error;

use crate::SessionStatus;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WaymarkError>;

/// Errors produced by the planning pipeline and the navigation tracker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaymarkError {
    /// Latitude/longitude outside the valid range, rejected before any
    /// distance computation.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Route computation requested without both endpoints set.
    #[error("route computation requires both an origin and a destination")]
    MissingEndpoints,

    /// A tracker operation was invoked from a state that does not permit it.
    #[error("cannot {operation} while session is {status:?}")]
    InvalidSessionState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// A route index that does not exist among the computed alternatives.
    #[error("route selection {index} out of range ({available} routes available)")]
    InvalidRouteSelection { index: usize, available: usize },

    /// An asynchronous route computation was superseded by a newer request.
    /// Non-fatal: the newer computation's result is the one to apply.
    #[error("route computation superseded and cancelled")]
    Cancelled,
}
