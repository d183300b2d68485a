//! Route construction for a single ant.
//!
//! An ant walks the graph from its start node, choosing each next node with
//! probability proportional to
//!
//! ```text
//! w(j) = τ(i, j)^α · (1 / d(i, j))^β
//! ```
//!
//! over the unvisited nodes `j` reachable from the current node `i`. When no
//! such node is left the ant stops and its route is stranded; it never
//! takes a missing edge.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"

use super::pheromone::PheromoneMatrix;
use super::types::Route;
use crate::distance::DistanceMatrix;
use rand::Rng;

/// Floor applied to distances before inversion, so coincident nodes do not
/// divide by zero.
pub const DISTANCE_EPSILON: f64 = 1e-10;

/// Per-ant construction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AntState {
    Active { current: usize },
    Stranded,
    Complete,
}

#[derive(Debug)]
struct Ant {
    route: Vec<usize>,
    visited: Vec<bool>,
    state: AntState,
}

impl Ant {
    fn new(start: usize, n: usize) -> Self {
        let mut visited = vec![false; n];
        visited[start] = true;
        let mut route = Vec::with_capacity(n);
        route.push(start);
        let state = if n == 1 {
            AntState::Complete
        } else {
            AntState::Active { current: start }
        };
        Self {
            route,
            visited,
            state,
        }
    }

    fn visit(&mut self, next: usize) {
        self.visited[next] = true;
        self.route.push(next);
        self.state = if self.route.len() == self.visited.len() {
            AntState::Complete
        } else {
            AntState::Active { current: next }
        };
    }
}

/// Builds candidate routes from read-only views of the distance and
/// pheromone matrices.
///
/// Holds no mutable state: each call to [`construct`](Self::construct) is
/// independent, so one constructor can be shared by ants running on
/// different threads.
#[derive(Debug, Clone, Copy)]
pub struct RouteConstructor<'a> {
    distances: &'a DistanceMatrix,
    pheromone: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
}

impl<'a> RouteConstructor<'a> {
    /// # Panics
    ///
    /// Panics if the two matrices have different sizes.
    pub fn new(
        distances: &'a DistanceMatrix,
        pheromone: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
    ) -> Self {
        assert_eq!(
            distances.size(),
            pheromone.size(),
            "distance and pheromone matrices must have the same size"
        );
        Self {
            distances,
            pheromone,
            alpha,
            beta,
        }
    }

    /// Builds one route.
    ///
    /// Starts at `start`, or at a node drawn uniformly from `rng` when
    /// `None`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is out of range.
    pub fn construct<R: Rng>(&self, start: Option<usize>, rng: &mut R) -> Route {
        let n = self.distances.size();
        let start = start.unwrap_or_else(|| rng.random_range(0..n));
        let mut ant = Ant::new(start, n);
        let mut weights = vec![0.0; n];

        while let AntState::Active { current } = ant.state {
            let total = self.fill_weights(current, &ant.visited, &mut weights);
            match sample_weighted(&weights, total, rng) {
                Some(next) => ant.visit(next),
                None => ant.state = AntState::Stranded,
            }
        }

        match ant.state {
            AntState::Complete => {
                let cost = self.distances.tour_length(&ant.route);
                Route::complete(ant.route, cost)
            }
            _ => Route::stranded(ant.route),
        }
    }

    /// Attractiveness of moving from `from` to `to`; zero for missing edges.
    pub fn move_weight(&self, from: usize, to: usize) -> f64 {
        let d = self.distances.get(from, to);
        if !d.is_finite() {
            return 0.0;
        }
        let tau = self.pheromone.get(from, to);
        let eta = 1.0 / d.max(DISTANCE_EPSILON);
        let w = tau.powf(self.alpha) * eta.powf(self.beta);
        if w.is_nan() {
            0.0
        } else {
            w
        }
    }

    /// Natural log of [`move_weight`](Self::move_weight), computed without
    /// underflow. `None` for missing edges.
    fn log_move_weight(&self, from: usize, to: usize) -> Option<f64> {
        let d = self.distances.get(from, to);
        if !d.is_finite() {
            return None;
        }
        let tau = self.pheromone.get(from, to);
        let log_tau = if self.alpha == 0.0 {
            0.0
        } else {
            self.alpha * tau.ln()
        };
        let log_eta = if self.beta == 0.0 {
            0.0
        } else {
            -self.beta * d.max(DISTANCE_EPSILON).ln()
        };
        let lw = log_tau + log_eta;
        Some(if lw.is_nan() { f64::NEG_INFINITY } else { lw })
    }

    fn fill_weights(&self, from: usize, visited: &[bool], weights: &mut [f64]) -> f64 {
        let mut total = 0.0;
        for (to, w) in weights.iter_mut().enumerate() {
            *w = if visited[to] {
                0.0
            } else {
                self.move_weight(from, to)
            };
            total += *w;
        }
        if total > 0.0 {
            return total;
        }

        // Every candidate underflowed: rescale against the largest weight.
        let mut reachable = false;
        let mut max_log = f64::NEG_INFINITY;
        for (to, w) in weights.iter_mut().enumerate() {
            *w = match self.log_move_weight(from, to) {
                Some(lw) if !visited[to] => {
                    reachable = true;
                    max_log = max_log.max(lw);
                    lw
                }
                _ => f64::NEG_INFINITY,
            };
        }
        if !reachable {
            weights.fill(0.0);
            return 0.0;
        }

        let mut total = 0.0;
        for (to, w) in weights.iter_mut().enumerate() {
            let candidate = !visited[to] && self.distances.has_edge(from, to);
            *w = if !candidate {
                0.0
            } else if max_log == f64::NEG_INFINITY {
                1.0
            } else {
                (*w - max_log).exp()
            };
            total += *w;
        }
        total
    }
}

/// Draws an index with probability proportional to `weights[i]`.
///
/// `total` must be the sum of `weights`. Uses a cumulative scan. Returns
/// `None` when `total` is zero. If the sum overflowed to `+infinity`, the
/// draw is made uniformly among infinite weights, or over the weights
/// rescaled by their maximum when none is infinite.
pub fn sample_weighted<R: Rng>(weights: &[f64], total: f64, rng: &mut R) -> Option<usize> {
    if total.is_nan() || total <= 0.0 {
        return None;
    }

    if total.is_infinite() {
        let infinite: Vec<usize> = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_infinite())
            .map(|(i, _)| i)
            .collect();
        if !infinite.is_empty() {
            return Some(infinite[rng.random_range(0..infinite.len())]);
        }
        let max = weights.iter().copied().fold(0.0, f64::max);
        let scaled: Vec<f64> = weights.iter().map(|w| w / max).collect();
        let scaled_total = scaled.iter().sum();
        return sample_weighted(&scaled, scaled_total, rng);
    }

    let target = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            cumulative += w;
            last = Some(i);
            if target < cumulative {
                return Some(i);
            }
        }
    }
    // Rounding can leave `target` just past the final bucket.
    last
}
