//! Live navigation state machine.
//!
//! [`NavigationTracker`] owns one [`NavigationSession`] and advances it as
//! position updates arrive: step progression against an arrival threshold,
//! waypoint proximity detection within a notification radius, remaining
//! distance/duration statistics, and mid-trip recalculation.
//!
//! The tracker is a single-writer state machine. Every mutation goes through
//! `&mut self`, so events from independent sources (a location stream, a user
//! action) must be serialized by the caller — a single-consumer queue or a
//! mutex around the tracker both satisfy the ordering discipline. Sessions
//! are independent; nothing is shared across trackers.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, SystemTime};

use log::{debug, info, warn};
use serde::Serialize;

use crate::geo::haversine_distance;
use crate::planner::{plan_route, PlanRequest};
use crate::{Coordinate, Result, Route, WaymarkError, WaypointCandidate};

/// Lifecycle of a navigation session.
///
/// `Idle -> Active -> {Completed, Stopped}`; `Stopped` and `Completed` return
/// to `Idle` via [`NavigationTracker::reset`] so the tracker can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    Active,
    Completed,
    Stopped,
}

/// Thresholds and limits for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Distance to a step's end below which the step counts as completed.
    /// Default: 20.0 meters
    pub arrival_threshold: f64,

    /// Radius within which an unpassed waypoint becomes the upcoming
    /// notification. Default: 300.0 meters
    pub notification_radius: f64,

    /// Number of recently navigated routes retained, most-recent-first.
    /// Default: 5
    pub history_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: 20.0,
            notification_radius: 300.0,
            history_capacity: 5,
        }
    }
}

/// The live state of one in-progress navigation.
#[derive(Debug, Clone)]
pub struct NavigationSession {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub route: Route,
    /// Index into the flattened step sequence; valid while `Active`
    pub current_step_index: usize,
    /// Meters covered so far, including distance carried over a recalculation
    pub travelled_distance: f64,
    pub started_at: SystemTime,
    pub estimated_arrival: SystemTime,
    /// Nearest unpassed waypoint within the notification radius
    pub upcoming_waypoint_id: Option<String>,
    pub distance_to_upcoming: Option<f64>,
    pub status: SessionStatus,
}

/// Snapshot emitted to the navigation consumer on every accepted event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationSnapshot {
    pub status: SessionStatus,
    pub current_step_index: Option<usize>,
    pub travelled_distance: f64,
    /// Sum over not-yet-completed steps, in meters
    pub remaining_distance: f64,
    /// Sum over not-yet-completed steps, in seconds
    pub remaining_duration: f64,
    pub upcoming_waypoint_id: Option<String>,
    pub distance_to_upcoming: Option<f64>,
}

/// Navigation state machine over one session at a time.
pub struct NavigationTracker {
    config: TrackerConfig,
    session: Option<NavigationSession>,
    /// Plan parameters behind the active route, reused for recalculation
    request: Option<PlanRequest>,
    /// Distance completed before and during this session's steps
    completed_distance: f64,
    /// Waypoints whose associated step has been completed
    passed: HashSet<String>,
    /// Most-recent-first, capped at `config.history_capacity`
    recent_routes: VecDeque<Route>,
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationTracker {
    /// Create a tracker with default thresholds.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a tracker with custom thresholds.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            session: None,
            request: None,
            completed_distance: 0.0,
            passed: HashSet::new(),
            recent_routes: VecDeque::new(),
        }
    }

    /// Current session status (`Idle` when no session exists).
    pub fn status(&self) -> SessionStatus {
        self.session
            .as_ref()
            .map(|s| s.status)
            .unwrap_or(SessionStatus::Idle)
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&NavigationSession> {
        self.session.as_ref()
    }

    /// Recently navigated routes, most recent first.
    pub fn recent_routes(&self) -> impl Iterator<Item = &Route> {
        self.recent_routes.iter()
    }

    /// Begin navigating `route`.
    ///
    /// Requires `Idle`. The `request` is the plan that produced the route and
    /// is retained so [`recalculate`](Self::recalculate) can reuse the same
    /// detour budget and mode. The initial upcoming waypoint is the first
    /// sequenced one; its distance is unknown until the first position
    /// arrives.
    pub fn start(&mut self, route: Route, request: PlanRequest) -> Result<NavigationSnapshot> {
        self.require(SessionStatus::Idle, "start")?;
        self.begin_session(route, request, 0.0)
    }

    /// Begin navigating one of several computed routes by index.
    ///
    /// The primary route is index 0; alternatives follow. An out-of-range
    /// index fails with [`WaymarkError::InvalidRouteSelection`].
    pub fn start_selected(
        &mut self,
        routes: &[Route],
        index: usize,
        request: PlanRequest,
    ) -> Result<NavigationSnapshot> {
        let route = routes
            .get(index)
            .ok_or(WaymarkError::InvalidRouteSelection {
                index,
                available: routes.len(),
            })?
            .clone();
        self.start(route, request)
    }

    /// Apply a position update.
    ///
    /// Requires `Active`. Within the arrival threshold of the current step's
    /// end the step completes and the index advances (or the session
    /// completes on the final step); otherwise travelled distance is
    /// estimated from progress along the step. The upcoming waypoint is the
    /// nearest unpassed one within the notification radius of the position.
    pub fn on_location_update(&mut self, position: Coordinate) -> Result<NavigationSnapshot> {
        self.require(SessionStatus::Active, "update location")?;
        let position = position.validated()?;

        let arrival_threshold = self.config.arrival_threshold;
        let notification_radius = self.config.notification_radius;

        let session = self.session.as_mut().expect("status was Active");
        let step = session
            .route
            .step_at(session.current_step_index)
            .cloned()
            .expect("current_step_index valid while Active");

        let distance_to_step_end = haversine_distance(&position, &step.end);

        if distance_to_step_end <= arrival_threshold {
            self.completed_distance += step.distance;
            session.travelled_distance = self.completed_distance;

            if let Some(id) = &step.waypoint_id {
                info!("Passed waypoint '{}'", id);
                self.passed.insert(id.clone());
            }

            if session.current_step_index + 1 >= session.route.step_count() {
                session.status = SessionStatus::Completed;
                info!(
                    "Navigation completed after {:.0} m",
                    session.travelled_distance
                );
            } else {
                session.current_step_index += 1;
                debug!("Advanced to step {}", session.current_step_index);
            }
        } else {
            // Progress along the current step, estimated from the distance
            // still to cover; never regresses below the completed distance
            let progress = (step.distance - distance_to_step_end).clamp(0.0, step.distance);
            session.travelled_distance = self.completed_distance + progress;
        }

        // Nearest unpassed waypoint by straight-line distance
        let nearest = session
            .route
            .waypoints
            .iter()
            .filter(|wp| !self.passed.contains(wp.id()))
            .map(|wp| (wp.id().to_string(), haversine_distance(&position, &wp.coordinate())))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match nearest {
            Some((id, dist)) if dist <= notification_radius => {
                session.upcoming_waypoint_id = Some(id);
                session.distance_to_upcoming = Some(dist);
            }
            _ => {
                session.upcoming_waypoint_id = None;
                session.distance_to_upcoming = None;
            }
        }

        Ok(self.snapshot())
    }

    /// Stop the active session.
    ///
    /// Requires `Active`. The route is preserved in the bounded recent-routes
    /// history; call [`reset`](Self::reset) to return to `Idle`.
    pub fn stop(&mut self) -> Result<NavigationSnapshot> {
        self.require(SessionStatus::Active, "stop")?;

        let session = self.session.as_mut().expect("status was Active");
        session.status = SessionStatus::Stopped;
        self.remember_route();

        Ok(self.snapshot())
    }

    /// Return a `Stopped` or `Completed` session to `Idle` for reuse.
    pub fn reset(&mut self) -> Result<()> {
        match self.status() {
            SessionStatus::Stopped | SessionStatus::Completed => {
                self.session = None;
                self.request = None;
                self.completed_distance = 0.0;
                self.passed.clear();
                Ok(())
            }
            status => Err(WaymarkError::InvalidSessionState {
                operation: "reset",
                status,
            }),
        }
    }

    /// Replan from `new_origin` and restart on the new route.
    ///
    /// Requires `Active`. Re-runs the full pipeline with the session's
    /// original detour budget and mode, discarding step progress but carrying
    /// the accumulated travelled distance forward as already-completed
    /// distance. `candidates` come from the external waypoint store.
    pub fn recalculate(
        &mut self,
        new_origin: Coordinate,
        candidates: &[WaypointCandidate],
    ) -> Result<NavigationSnapshot> {
        self.require(SessionStatus::Active, "recalculate")?;
        let new_origin = new_origin.validated()?;

        let request = self
            .request
            .clone()
            .expect("active session retains its plan request")
            .with_origin(new_origin);

        let route = plan_route(&request, candidates)?;
        let carried = self
            .session
            .as_ref()
            .map(|s| s.travelled_distance)
            .unwrap_or(0.0);

        info!(
            "Recalculated route: {} waypoints, {:.0} m carried forward",
            route.waypoints.len(),
            carried
        );

        self.session = None;
        self.begin_session(route, request, carried)
    }

    /// Current session snapshot for the navigation consumer.
    pub fn snapshot(&self) -> NavigationSnapshot {
        match &self.session {
            None => NavigationSnapshot {
                status: SessionStatus::Idle,
                current_step_index: None,
                travelled_distance: 0.0,
                remaining_distance: 0.0,
                remaining_duration: 0.0,
                upcoming_waypoint_id: None,
                distance_to_upcoming: None,
            },
            Some(session) => {
                let (remaining_distance, remaining_duration) = match session.status {
                    SessionStatus::Active => {
                        let from = session.current_step_index;
                        session
                            .route
                            .steps()
                            .skip(from)
                            .fold((0.0, 0.0), |(d, t), step| {
                                (d + step.distance, t + step.duration)
                            })
                    }
                    _ => (0.0, 0.0),
                };

                NavigationSnapshot {
                    status: session.status,
                    current_step_index: Some(session.current_step_index),
                    travelled_distance: session.travelled_distance,
                    remaining_distance,
                    remaining_duration,
                    upcoming_waypoint_id: session.upcoming_waypoint_id.clone(),
                    distance_to_upcoming: session.distance_to_upcoming,
                }
            }
        }
    }

    /// Snapshot serialized to JSON for host UIs.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|e| {
            warn!("Failed to serialize navigation snapshot: {}", e);
            "{}".to_string()
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn require(&self, expected: SessionStatus, operation: &'static str) -> Result<()> {
        let status = self.status();
        if status == expected {
            Ok(())
        } else {
            Err(WaymarkError::InvalidSessionState { operation, status })
        }
    }

    fn begin_session(
        &mut self,
        route: Route,
        request: PlanRequest,
        carried_distance: f64,
    ) -> Result<NavigationSnapshot> {
        let origin = request.origin.ok_or(WaymarkError::MissingEndpoints)?;
        let destination = request.destination.ok_or(WaymarkError::MissingEndpoints)?;

        let started_at = SystemTime::now();
        let estimated_arrival = started_at + Duration::from_secs_f64(route.total_duration.max(0.0));
        let upcoming_waypoint_id = route
            .waypoints
            .iter()
            .find(|wp| wp.sequence_index == Some(0))
            .map(|wp| wp.id().to_string());

        self.completed_distance = carried_distance;
        self.passed.clear();
        self.session = Some(NavigationSession {
            origin,
            destination,
            route,
            current_step_index: 0,
            travelled_distance: carried_distance,
            started_at,
            estimated_arrival,
            upcoming_waypoint_id,
            distance_to_upcoming: None,
            status: SessionStatus::Active,
        });
        self.request = Some(request);

        Ok(self.snapshot())
    }

    fn remember_route(&mut self) {
        if let Some(session) = &self.session {
            self.recent_routes.push_front(session.route.clone());
            while self.recent_routes.len() > self.config.history_capacity {
                self.recent_routes.pop_back();
            }
        }
    }
}
