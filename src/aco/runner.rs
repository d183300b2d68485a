//! Colony execution loop.
//!
//! Each iteration has two phases separated by a barrier:
//!
//! 1. **Construction**: `n_ants` routes are built against the same immutable
//!    distance matrix and pheromone snapshot.
//! 2. **Update**: the trail evaporates once, then every complete route
//!    deposits `Q / cost` on its edges.
//!
//! The global best only changes when a complete route is strictly shorter.

use super::config::AcoConfig;
use super::construct::RouteConstructor;
use super::pheromone::PheromoneMatrix;
use super::types::{Route, Tour};
use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::random::{create_rng, rng_from_seed};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of an ACO run.
#[derive(Debug, Clone)]
pub struct AcoResult {
    /// Best complete tour, or `None` when no ant ever completed one.
    pub best: Option<Tour>,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Complete routes built across all iterations.
    pub complete_routes: usize,

    /// Stranded routes built across all iterations.
    pub stranded_routes: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Global best distance after each iteration (`+infinity` until the
    /// first feasible tour).
    pub cost_history: Vec<f64>,

    /// Trail strengths after the last update.
    pub pheromone: PheromoneMatrix,
}

impl AcoResult {
    /// Whether a complete tour was found.
    pub fn is_feasible(&self) -> bool {
        self.best.is_some()
    }

    /// Best route, if any.
    pub fn best_route(&self) -> Option<&[usize]> {
        self.best.as_ref().map(|t| t.route.as_slice())
    }

    /// Best distance, `+infinity` when infeasible.
    pub fn best_distance(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |t| t.distance)
    }
}

/// Executes the Ant Colony optimizer.
///
/// # Usage
///
/// ```
/// use u_aco::aco::{AcoConfig, AcoRunner};
/// use u_aco::distance::DistanceMatrix;
///
/// let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
/// let distances = DistanceMatrix::from_coordinates(&coords, None).unwrap();
/// let config = AcoConfig::default().with_start_city(0).with_seed(42);
///
/// let result = AcoRunner::run(&distances, &config).unwrap();
/// assert!((result.best_distance() - 4.0).abs() < 1e-9);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the optimizer with an RNG seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for this graph.
    pub fn run(distances: &DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        Self::run_with_cancel(distances, config, None)
    }

    /// Runs the optimizer with an optional cancellation token.
    ///
    /// The flag is checked at the top of every iteration; a cancelled run
    /// returns the best tour found so far.
    pub fn run_with_cancel(
        distances: &DistanceMatrix,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(distances, config, &mut rng, cancel)
    }

    /// Runs the optimizer drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored. The master RNG hands one seed to each ant
    /// in order, so the outcome does not depend on `config.parallel`.
    pub fn run_with_rng<R: Rng>(
        distances: &DistanceMatrix,
        config: &AcoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        let n = distances.size();
        config.validate_for(n)?;

        debug!(
            nodes = n,
            n_ants = config.n_ants,
            n_iterations = config.n_iterations,
            alpha = config.alpha,
            beta = config.beta,
            evaporation_rate = config.evaporation_rate,
            "starting ant colony run"
        );

        let mut pheromone = PheromoneMatrix::new(n, config.initial_pheromone);
        let mut best: Option<Tour> = None;
        let mut cost_history = Vec::with_capacity(config.n_iterations);
        let mut complete_routes = 0usize;
        let mut stranded_routes = 0usize;
        let mut iterations = 0usize;
        let mut cancelled = false;

        for iteration in 0..config.n_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    debug!(iteration, "ant colony run cancelled");
                    cancelled = true;
                    break;
                }
            }

            // Construction phase: read-only view of the trail.
            let seeds: Vec<u64> = (0..config.n_ants).map(|_| rng.random()).collect();
            let routes = {
                let constructor =
                    RouteConstructor::new(distances, &pheromone, config.alpha, config.beta);
                construct_routes(&constructor, config.start_city, &seeds, config.parallel)
            };

            let complete = routes.iter().filter(|r| r.is_complete()).count();
            complete_routes += complete;
            stranded_routes += routes.len() - complete;

            if let Some(candidate) = routes
                .iter()
                .filter(|r| r.score().is_finite())
                .min_by(|a, b| a.score().total_cmp(&b.score()))
            {
                let distance = candidate.score();
                if distance < best.as_ref().map_or(f64::INFINITY, |t| t.distance) {
                    trace!(iteration, distance, "new best tour");
                    best = Some(Tour {
                        route: candidate.nodes().to_vec(),
                        distance,
                    });
                }
            }

            // Update phase: single writer after all ants joined.
            pheromone.evaporate(config.evaporation_rate)?;
            for route in &routes {
                pheromone.reinforce(route, config.deposit_constant);
            }

            cost_history.push(best.as_ref().map_or(f64::INFINITY, |t| t.distance));
            iterations = iteration + 1;
        }

        match &best {
            Some(tour) => debug!(
                iterations,
                best_cost = tour.distance,
                complete_routes,
                stranded_routes,
                "ant colony run finished"
            ),
            None => debug!(
                iterations,
                stranded_routes, "ant colony run found no feasible tour"
            ),
        }

        Ok(AcoResult {
            best,
            iterations,
            complete_routes,
            stranded_routes,
            cancelled,
            cost_history,
            pheromone,
        })
    }
}

/// Builds one route per seed, in parallel when requested and available.
#[cfg(feature = "parallel")]
fn construct_routes(
    constructor: &RouteConstructor<'_>,
    start: Option<usize>,
    seeds: &[u64],
    parallel: bool,
) -> Vec<Route> {
    if parallel {
        seeds
            .par_iter()
            .map(|&seed| constructor.construct(start, &mut create_rng(seed)))
            .collect()
    } else {
        seeds
            .iter()
            .map(|&seed| constructor.construct(start, &mut create_rng(seed)))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn construct_routes(
    constructor: &RouteConstructor<'_>,
    start: Option<usize>,
    seeds: &[u64],
    _parallel: bool,
) -> Vec<Route> {
    seeds
        .iter()
        .map(|&seed| constructor.construct(start, &mut create_rng(seed)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcoError;

    fn unit_square() -> DistanceMatrix {
        DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], None)
            .unwrap()
    }

    fn scattered(n: usize, seed: u64) -> DistanceMatrix {
        let mut rng = create_rng(seed);
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        DistanceMatrix::from_coordinates(&coords, None).unwrap()
    }

    #[test]
    fn test_unit_square_converges_to_perimeter() {
        let config = AcoConfig::default()
            .with_start_city(0)
            .with_n_ants(10)
            .with_n_iterations(50)
            .with_seed(42);

        let result = AcoRunner::run(&unit_square(), &config).unwrap();

        let best = result.best.expect("square must be feasible");
        assert!(
            (best.distance - 4.0).abs() < 1e-9,
            "expected perimeter 4.0, got {}",
            best.distance
        );
        assert_eq!(best.route[0], 0);
        assert_eq!(result.iterations, 50);
        assert_eq!(result.complete_routes, 500);
        assert_eq!(result.stranded_routes, 0);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let dm = scattered(12, 7);
        let config = AcoConfig::default().with_n_iterations(20).with_seed(99);
        let a = AcoRunner::run(&dm, &config).unwrap();
        let b = AcoRunner::run(&dm, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.pheromone, b.pheromone);
    }

    #[test]
    fn test_parallel_flag_does_not_change_result() {
        let dm = scattered(10, 3);
        let config = AcoConfig::default().with_n_iterations(15).with_seed(5);
        let sequential = AcoRunner::run(&dm, &config.clone().with_parallel(false)).unwrap();
        let parallel = AcoRunner::run(&dm, &config.with_parallel(true)).unwrap();
        assert_eq!(sequential.best, parallel.best);
        assert_eq!(sequential.pheromone, parallel.pheromone);
    }

    #[test]
    fn test_best_cost_recomputes_exactly() {
        let dm = scattered(15, 11);
        let config = AcoConfig::default().with_n_iterations(30).with_seed(1);
        let result = AcoRunner::run(&dm, &config).unwrap();
        let best = result.best.unwrap();
        assert_eq!(dm.tour_length(&best.route), best.distance);
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let dm = scattered(15, 2);
        let config = AcoConfig::default().with_n_iterations(40).with_seed(8);
        let result = AcoRunner::run(&dm, &config).unwrap();
        assert_eq!(result.cost_history.len(), 40);
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_evaporation_only_decay() {
        let config = AcoConfig::default()
            .with_deposit_constant(0.0)
            .with_evaporation_rate(0.2)
            .with_n_iterations(7)
            .with_seed(0);
        let result = AcoRunner::run(&unit_square(), &config).unwrap();
        let expected = 1.0 * 0.8f64.powi(7);
        for &tau in result.pheromone.as_slice() {
            assert!(
                (tau - expected).abs() < 1e-12,
                "expected {expected}, got {tau}"
            );
        }
    }

    #[test]
    fn test_single_node() {
        let dm = DistanceMatrix::from_coordinates(&[(3.0, 4.0)], None).unwrap();
        let result = AcoRunner::run(&dm, &AcoConfig::default().with_seed(0)).unwrap();
        let best = result.best.unwrap();
        assert_eq!(best.route, vec![0]);
        assert_eq!(best.distance, 0.0);
    }

    #[test]
    fn test_isolated_start_is_infeasible() {
        let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let edges = [(1, 2), (2, 3), (3, 1)];
        let dm = DistanceMatrix::from_coordinates(&coords, Some(&edges)).unwrap();
        let config = AcoConfig::default().with_start_city(0).with_seed(4);

        let result = AcoRunner::run(&dm, &config).unwrap();

        assert!(!result.is_feasible());
        assert_eq!(result.best_route(), None);
        assert!(result.best_distance().is_infinite());
        assert_eq!(result.complete_routes, 0);
        assert_eq!(result.stranded_routes, config.n_ants * config.n_iterations);
        assert!(result.cost_history.iter().all(|c| c.is_infinite()));
    }

    #[test]
    fn test_sparse_graph_finds_the_only_tour() {
        // A ring 0-1-2-3-4-0 plus one chord; only the ring is a tour.
        let coords = [(0.0, 0.0), (2.0, 0.0), (3.0, 2.0), (1.0, 3.0), (-1.0, 2.0)];
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 2)];
        let dm = DistanceMatrix::from_coordinates(&coords, Some(&edges)).unwrap();
        let config = AcoConfig::default().with_n_iterations(30).with_seed(6);

        let result = AcoRunner::run(&dm, &config).unwrap();

        let best = result.best.unwrap();
        assert_eq!(best.distance, dm.tour_length(&best.route));
        assert!(best.distance.is_finite());
        assert_eq!(result.complete_routes + result.stranded_routes, 300);
    }

    #[test]
    fn test_open_path_never_becomes_best() {
        // Path 0 - 1 - 2: from 0 every ant visits all nodes, but there is
        // no edge back from 2 to 0.
        let coords = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let dm = DistanceMatrix::from_coordinates(&coords, Some(&[(0, 1), (1, 2)])).unwrap();
        let config = AcoConfig::default()
            .with_start_city(0)
            .with_n_iterations(10)
            .with_seed(3);

        let result = AcoRunner::run(&dm, &config).unwrap();

        assert_eq!(result.complete_routes, config.n_ants * config.n_iterations);
        assert!(!result.is_feasible());
        assert!(result.cost_history.iter().all(|c| c.is_infinite()));
        assert_eq!(result.pheromone, {
            let mut expected = PheromoneMatrix::new(3, 1.0);
            for _ in 0..10 {
                expected.evaporate(config.evaporation_rate).unwrap();
            }
            expected
        });
    }

    #[test]
    fn test_floored_trail_never_strands_on_complete_graph() {
        let dm = scattered(8, 13);
        let config = AcoConfig::default()
            .with_alpha(2.0)
            .with_evaporation_rate(0.9)
            .with_deposit_constant(0.0)
            .with_n_iterations(400)
            .with_start_city(0)
            .with_seed(17);

        let result = AcoRunner::run(&dm, &config).unwrap();

        assert_eq!(result.stranded_routes, 0);
        assert_eq!(result.complete_routes, config.n_ants * config.n_iterations);
        assert!(result.pheromone.as_slice().iter().all(|&t| t > 0.0));
    }

    #[test]
    fn test_rejects_bad_config() {
        let dm = unit_square();
        assert!(matches!(
            AcoRunner::run(&dm, &AcoConfig::default().with_start_city(4)),
            Err(AcoError::StartCityOutOfRange { start: 4, nodes: 4 })
        ));
        assert!(matches!(
            AcoRunner::run(&dm, &AcoConfig::default().with_evaporation_rate(1.0)),
            Err(AcoError::InvalidEvaporationRate(_))
        ));
        assert!(AcoRunner::run(&dm, &AcoConfig::default().with_n_ants(0)).is_err());
    }

    #[test]
    fn test_cancellation() {
        let config = AcoConfig::default().with_n_iterations(1000).with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));

        let result = AcoRunner::run_with_cancel(&unit_square(), &config, Some(cancel)).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best.is_none());
        assert_eq!(result.pheromone, PheromoneMatrix::new(4, 1.0));
    }

    #[test]
    fn test_cancellation_mid_run_keeps_state_consistent() {
        let dm = scattered(30, 9);
        let config = AcoConfig::default()
            .with_n_iterations(1_000_000)
            .with_seed(42);

        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result = AcoRunner::run_with_cancel(&dm, &config, Some(cancel)).unwrap();

        assert!(result.cancelled);
        let k = result.iterations;
        assert!(k > 0 && k < config.n_iterations, "stopped after {k} iterations");
        assert_eq!(result.cost_history.len(), k);
        assert_eq!(result.complete_routes, k * config.n_ants);
        assert_eq!(result.cost_history.last().copied(), Some(result.best_distance()));

        // The cancelled run is exactly a completed run of k iterations.
        let replay = AcoRunner::run(&dm, &config.clone().with_n_iterations(k)).unwrap();
        assert!(!replay.cancelled);
        assert_eq!(replay.best, result.best);
        assert_eq!(replay.cost_history, result.cost_history);
        assert_eq!(replay.pheromone, result.pheromone);
    }

    #[test]
    fn test_run_with_rng_matches_seeded_run() {
        let dm = scattered(8, 21);
        let config = AcoConfig::default().with_n_iterations(10).with_seed(77);
        let seeded = AcoRunner::run(&dm, &config).unwrap();
        let explicit = AcoRunner::run_with_rng(&dm, &config, &mut create_rng(77), None).unwrap();
        assert_eq!(seeded.best, explicit.best);
    }
}
