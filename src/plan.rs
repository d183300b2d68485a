//! Tour planning over caller-identified sites.
//!
//! Callers hold their own site records, keyed by an external id. This
//! module turns a request naming a start site and destinations into a
//! distance matrix, runs the colony, and maps the winning tour back to the
//! caller's ids and names. It performs no I/O.

use crate::aco::{AcoConfig, AcoRunner};
use crate::distance::DistanceMatrix;
use crate::error::{AcoError, Result};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A named location owned by the caller.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: u32,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Site {
    pub fn new(id: u32, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
        }
    }
}

/// Sites to visit, starting from `start`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteRequest {
    pub start: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub destinations: Vec<u32>,

    /// Undirected connections by site id. `None` connects every pair.
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Option<Vec<(u32, u32)>>,
}

impl RouteRequest {
    pub fn new(start: u32, destinations: impl IntoIterator<Item = u32>) -> Self {
        Self {
            start,
            destinations: destinations.into_iter().collect(),
            edges: None,
        }
    }

    pub fn with_edges(mut self, edges: Vec<(u32, u32)>) -> Self {
        self.edges = Some(edges);
        self
    }

    /// Start followed by destinations, repeats dropped, first occurrence kept.
    pub fn unique_ids(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        std::iter::once(self.start)
            .chain(self.destinations.iter().copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// The best tour, expressed in the caller's identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Site ids in visiting order, starting with the requested start.
    pub best_route_global_ids: Vec<u32>,

    /// Display names matching `best_route_global_ids`.
    pub best_path_names: Vec<String>,

    /// Closed-tour length.
    pub best_length: f64,
}

/// Plans a tour through the requested sites.
///
/// The start site is always node 0 and every ant starts there, overriding
/// `config.start_city`. Edges naming sites outside the request are ignored.
///
/// # Errors
///
/// - [`AcoError::UnknownSite`] if a requested id is not in `sites`
/// - [`AcoError::NoFeasibleTour`] if no ant completed a tour
/// - any configuration error from the runner
///
/// # Examples
///
/// ```
/// use u_aco::aco::AcoConfig;
/// use u_aco::plan::{plan_route, RouteRequest, Site};
///
/// let sites = vec![
///     Site::new(10, "Depot", 0.0, 0.0),
///     Site::new(20, "North", 0.0, 3.0),
///     Site::new(30, "East", 4.0, 0.0),
/// ];
/// let request = RouteRequest::new(10, [30, 20]);
/// let plan = plan_route(&sites, &request, &AcoConfig::default().with_seed(1)).unwrap();
///
/// assert_eq!(plan.best_route_global_ids[0], 10);
/// assert!((plan.best_length - 12.0).abs() < 1e-9);
/// ```
pub fn plan_route(sites: &[Site], request: &RouteRequest, config: &AcoConfig) -> Result<RoutePlan> {
    let by_id: HashMap<u32, &Site> = sites.iter().map(|s| (s.id, s)).collect();

    let ids = request.unique_ids();
    let chosen: Vec<&Site> = ids
        .iter()
        .map(|id| by_id.get(id).copied().ok_or(AcoError::UnknownSite(*id)))
        .collect::<Result<_>>()?;

    let index_of: HashMap<u32, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let edges: Option<Vec<(usize, usize)>> = request.edges.as_ref().map(|pairs| {
        pairs
            .iter()
            .filter_map(|(a, b)| Some((*index_of.get(a)?, *index_of.get(b)?)))
            .collect()
    });

    let coords: Vec<(f64, f64)> = chosen.iter().map(|s| (s.x, s.y)).collect();
    let distances = DistanceMatrix::from_coordinates(&coords, edges.as_deref())?;

    let config = AcoConfig {
        start_city: Some(0),
        ..config.clone()
    };
    let result = AcoRunner::run(&distances, &config)?;
    let tour = result.best.ok_or(AcoError::NoFeasibleTour)?;

    debug!(
        sites = ids.len(),
        best_length = tour.distance,
        "planned tour"
    );

    Ok(RoutePlan {
        best_route_global_ids: tour.route.iter().map(|&i| ids[i]).collect(),
        best_path_names: tour.route.iter().map(|&i| chosen[i].name.clone()).collect(),
        best_length: tour.distance,
    })
}
