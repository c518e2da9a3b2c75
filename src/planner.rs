//! Pipeline orchestration and cancellable asynchronous planning.
//!
//! [`plan_route`] runs the synchronous pipeline
//! selector -> sequencer -> assembler. [`RoutePlanner`] wraps the same
//! pipeline in a cancellable task: route computation can be long-running
//! relative to UI needs, and when a new computation is requested before a
//! prior one finishes, only the most recent request's result is applied —
//! stale in-flight results surface as [`WaymarkError::Cancelled`], never
//! merged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::assembler::{alternative_routes, assemble_route, AlternativeConfig};
use crate::selector::select_waypoints;
use crate::sequencer::sequence_waypoints;
use crate::transport::{ConstantSpeedModel, SpeedModel, TransportMode};
use crate::{Coordinate, Result, Route, SelectorConfig, WaymarkError, WaypointCandidate};

/// Read-only boundary to the external waypoint store.
///
/// The engine never writes waypoint records; it only lists the candidates
/// within an owner scope.
pub trait WaypointSource: Send + Sync {
    /// List the candidate waypoints visible within `scope`.
    fn list_candidates(&self, scope: &str) -> Result<Vec<WaypointCandidate>>;
}

/// Parameters for one route computation.
///
/// Endpoints start unset so a host UI can populate the request
/// incrementally; [`plan_route`] rejects a request that is still missing
/// either endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub mode: TransportMode,
    pub selector: SelectorConfig,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanRequest {
    /// Create an empty request with default mode and selector policy.
    pub fn new() -> Self {
        Self {
            origin: None,
            destination: None,
            mode: TransportMode::default(),
            selector: SelectorConfig::default(),
        }
    }

    pub fn with_origin(mut self, origin: Coordinate) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_destination(mut self, destination: Coordinate) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_selector(mut self, selector: SelectorConfig) -> Self {
        self.selector = selector;
        self
    }

    /// Validated endpoints, or the appropriate error.
    fn endpoints(&self) -> Result<(Coordinate, Coordinate)> {
        let origin = self.origin.ok_or(WaymarkError::MissingEndpoints)?;
        let destination = self.destination.ok_or(WaymarkError::MissingEndpoints)?;
        Ok((origin.validated()?, destination.validated()?))
    }
}

/// Run the full planning pipeline synchronously.
///
/// Selects waypoints by detour cost, orders them with the nearest-neighbor
/// heuristic, and assembles the legs. Zero qualifying candidates is not an
/// error: the result is the direct origin-to-destination route.
pub fn plan_route(request: &PlanRequest, candidates: &[WaypointCandidate]) -> Result<Route> {
    plan_route_with(request, candidates, &ConstantSpeedModel)
}

/// [`plan_route`] with an explicit speed model.
pub fn plan_route_with(
    request: &PlanRequest,
    candidates: &[WaypointCandidate],
    speeds: &dyn SpeedModel,
) -> Result<Route> {
    let (origin, destination) = request.endpoints()?;

    let selected = select_waypoints(
        origin,
        destination,
        candidates,
        &request.selector,
        request.mode,
        speeds,
    );
    let sequenced = sequence_waypoints(origin, selected);

    debug!(
        "Planned route through {} of {} candidates",
        sequenced.len(),
        candidates.len()
    );

    Ok(assemble_route(
        origin,
        destination,
        &sequenced,
        request.mode,
        speeds,
    ))
}

/// Plan the primary route plus alternatives from the same candidate pool.
///
/// The primary route is always first in the returned list. Alternatives
/// resample the qualifying superset per `alternatives`; see
/// [`AlternativeConfig`] for the deterministic strategies.
pub fn plan_route_with_alternatives(
    request: &PlanRequest,
    candidates: &[WaypointCandidate],
    alternatives: &AlternativeConfig,
) -> Result<Vec<Route>> {
    let speeds = ConstantSpeedModel;
    let (origin, destination) = request.endpoints()?;

    let selected = select_waypoints(
        origin,
        destination,
        candidates,
        &request.selector,
        request.mode,
        &speeds,
    );

    let sequenced = sequence_waypoints(origin, selected.clone());
    let primary = assemble_route(origin, destination, &sequenced, request.mode, &speeds);

    let mut routes = vec![primary];
    routes.extend(alternative_routes(
        origin,
        destination,
        &selected,
        request.mode,
        &speeds,
        alternatives,
    ));
    Ok(routes)
}

/// Asynchronous route planner with supersede-on-new-request semantics.
///
/// Each [`compute`](RoutePlanner::compute) call cancels any in-flight
/// computation and tags itself with a fresh generation; a result whose
/// generation is stale by completion time is discarded as
/// [`WaymarkError::Cancelled`]. Callers that need a deadline wrap the future
/// themselves; the planner imposes none.
pub struct RoutePlanner {
    source: Arc<dyn WaypointSource>,
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
}

impl RoutePlanner {
    /// Create a planner over a waypoint store boundary.
    pub fn new(source: Arc<dyn WaypointSource>) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// Compute a route for `request` from the candidates in `scope`.
    ///
    /// Supersedes any computation still in flight.
    pub async fn compute(&self, scope: &str, request: PlanRequest) -> Result<Route> {
        let (token, generation) = self.begin();

        let candidates = self.source.list_candidates(scope)?;

        // The listing may have taken long enough for a newer request to
        // supersede this one
        if token.is_cancelled() {
            debug!("Route computation generation {} cancelled", generation);
            return Err(WaymarkError::Cancelled);
        }

        let task = tokio::task::spawn_blocking(move || plan_route(&request, &candidates));

        let route = tokio::select! {
            _ = token.cancelled() => {
                debug!("Route computation generation {} cancelled", generation);
                return Err(WaymarkError::Cancelled);
            }
            joined = task => joined.map_err(|_| WaymarkError::Cancelled)??,
        };

        // A newer request may have started while the blocking task ran
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale route of generation {}", generation);
            return Err(WaymarkError::Cancelled);
        }

        Ok(route)
    }

    /// Cancel any in-flight computation without starting a new one.
    pub fn cancel(&self) {
        let current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.cancel();
    }

    /// Replace the active token and bump the generation, cancelling the
    /// previous computation.
    fn begin(&self) -> (CancellationToken, u64) {
        let token = CancellationToken::new();
        let prior = {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *current, token.clone())
        };
        prior.cancel();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (token, generation)
    }
}
