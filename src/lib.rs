//! # Waymark
//!
//! Detour-aware route planning and live navigation tracking.
//!
//! This library provides:
//! - Waypoint selection by detour cost against a time budget
//! - Greedy nearest-neighbor waypoint sequencing
//! - Route assembly into legs and navigation steps
//! - A live navigation state machine driven by position updates
//! - Cancellable asynchronous route computation
//!
//! The engine is purely in-process: persistence of waypoint records, map
//! rendering, and real road-network routing are external collaborators.
//! Distances are great-circle and travel times come from a pluggable
//! constant-speed transport model.
//!
//! ## Quick Start
//!
//! ```rust
//! use waymark::{Coordinate, WaypointCandidate, PlanRequest, TransportMode};
//! use waymark::planner::plan_route;
//!
//! let candidates = vec![WaypointCandidate::new(
//!     "cafe-1",
//!     Coordinate::new(0.01, 0.5),
//!     5,
//! )];
//!
//! let request = PlanRequest::new()
//!     .with_origin(Coordinate::new(0.0, 0.0))
//!     .with_destination(Coordinate::new(0.0, 1.0))
//!     .with_mode(TransportMode::Driving);
//!
//! let route = plan_route(&request, &candidates).unwrap();
//! assert_eq!(route.legs.len(), 2); // origin -> cafe -> destination
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, WaymarkError};

// Great-circle distance and bearing calculations
pub mod geo;
pub use geo::{haversine_distance, initial_bearing};

// Travel mode to speed mapping
pub mod transport;
pub use transport::{ConstantSpeedModel, SpeedModel, TransportMode};

// Waypoint selection by detour cost and importance
pub mod selector;
pub use selector::select_waypoints;

// Greedy nearest-neighbor waypoint ordering
pub mod sequencer;
pub use sequencer::sequence_waypoints;

// Route assembly into legs and steps
pub mod assembler;
pub use assembler::{alternative_routes, assemble_route, AlternativeConfig, AlternativeStrategy};

// Live navigation state machine
pub mod tracker;
pub use tracker::{
    NavigationSession, NavigationSnapshot, NavigationTracker, SessionStatus, TrackerConfig,
};

// Pipeline orchestration and cancellable asynchronous planning
pub mod planner;
pub use planner::{plan_route, PlanRequest, RoutePlanner, WaypointSource};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate in degrees.
///
/// # Example
/// ```
/// use waymark::Coordinate;
/// let point = Coordinate::new(51.5074, -0.1278); // London
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that the coordinate lies within valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Validate the coordinate, surfacing [`WaymarkError::InvalidCoordinate`]
    /// before any distance computation is attempted.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(WaymarkError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// A point of interest the planner may detour through.
///
/// Owned by the external waypoint store; the engine treats it as immutable
/// input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointCandidate {
    /// Unique identifier within the owner's scope
    pub id: String,
    /// Location of the waypoint
    pub coordinate: Coordinate,
    /// Importance on a bounded 1-5 scale (higher = more relevant)
    pub importance: u8,
    /// Hidden candidates are never selected
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl WaypointCandidate {
    /// Create a visible candidate.
    pub fn new(id: &str, coordinate: Coordinate, importance: u8) -> Self {
        Self {
            id: id.to_string(),
            coordinate,
            importance,
            visible: true,
        }
    }
}

/// A candidate that passed the detour filter, carrying its computed cost and
/// score.
///
/// Created by the selector; `sequence_index` is assigned later by the
/// sequencer and never touched by the assembler or tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredWaypoint {
    pub candidate: WaypointCandidate,
    /// Extra distance in meters versus the direct origin-destination path
    pub detour_distance: f64,
    /// Extra travel time in minutes at the requested mode's speed
    pub detour_minutes: f64,
    /// Weighted importance-minus-detour score used for ranking
    pub score: f64,
    /// Position in the visiting order, assigned by the sequencer
    pub sequence_index: Option<u32>,
}

impl ScoredWaypoint {
    /// Identifier of the underlying candidate.
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    /// Location of the underlying candidate.
    pub fn coordinate(&self) -> Coordinate {
        self.candidate.coordinate
    }
}

/// The smallest routable unit within a leg.
///
/// The constant-speed stand-in emits one step per leg, but the shape supports
/// a real directions backend decomposing a leg into many turn-by-turn steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Step distance in meters
    pub distance: f64,
    /// Step duration in seconds
    pub duration: f64,
    /// Waypoint reached at the end of this step, if any
    pub waypoint_id: Option<String>,
}

/// The portion of a route between two consecutive sequenced points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
    /// Leg distance in meters (sum of step distances)
    pub distance: f64,
    /// Leg duration in seconds (sum of step durations)
    pub duration: f64,
}

/// A fully assembled route: ordered legs plus the sequenced waypoints they
/// visit.
///
/// Immutable once assembled; replanning always produces a new `Route` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
    /// Waypoints in visiting order (`sequence_index` 0..N-1)
    pub waypoints: Vec<ScoredWaypoint>,
    /// Total distance in meters
    pub total_distance: f64,
    /// Total duration in seconds
    pub total_duration: f64,
}

impl Route {
    /// Iterate over the flattened step sequence across all legs.
    pub fn steps(&self) -> impl Iterator<Item = &RouteStep> {
        self.legs.iter().flat_map(|leg| leg.steps.iter())
    }

    /// Number of steps in the flattened sequence.
    pub fn step_count(&self) -> usize {
        self.legs.iter().map(|leg| leg.steps.len()).sum()
    }

    /// Step at a flattened index.
    pub fn step_at(&self, index: usize) -> Option<&RouteStep> {
        self.steps().nth(index)
    }

    /// Whether this is a direct origin-to-destination route with no detours.
    pub fn is_direct(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Weighting and filtering policy for waypoint selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Maximum acceptable detour in minutes; candidates above are discarded.
    /// Default: 30.0
    pub max_detour_minutes: f64,

    /// Maximum number of waypoints returned (top-K by score).
    /// Default: 10
    pub max_results: usize,

    /// Weight applied to candidate importance.
    /// Default: 10.0
    pub importance_weight: f64,

    /// Weight applied per minute of detour time.
    /// Default: 5.0
    pub detour_weight: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_detour_minutes: 30.0,
            max_results: 10,
            importance_weight: 10.0,
            detour_weight: 5.0,
        }
    }
}
