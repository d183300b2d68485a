//! Pheromone trail matrix.

use super::types::Route;
use crate::error::{AcoError, Result};

/// Floor applied to route costs before taking their reciprocal.
pub const COST_EPSILON: f64 = 1e-10;

/// Default trail strength of a fresh matrix.
pub const INIT_PHEROMONE: f64 = 1.0;

/// Symmetric n×n trail-strength matrix.
///
/// Every entry starts at the same positive value. Evaporation scales all
/// entries down, deposit adds to both directions of each edge of a route, so
/// the matrix stays symmetric and nonnegative under any sequence of updates.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
}

impl PheromoneMatrix {
    /// Creates an n×n matrix filled with `initial`.
    pub fn new(size: usize, initial: f64) -> Self {
        Self {
            data: vec![initial; size * size],
            size,
        }
    }

    /// Trail strength on edge `(from, to)`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Multiplies every entry by `1 - rate`.
    ///
    /// Entries that were positive stay positive: the result is floored at
    /// `f64::MIN_POSITIVE` so repeated evaporation never disables an edge.
    ///
    /// # Errors
    ///
    /// Rejects `rate` outside `[0, 1)`.
    pub fn evaporate(&mut self, rate: f64) -> Result<()> {
        if !(0.0..1.0).contains(&rate) {
            return Err(AcoError::InvalidEvaporationRate(rate));
        }
        let keep = 1.0 - rate;
        for tau in &mut self.data {
            if *tau > 0.0 {
                *tau = (*tau * keep).max(f64::MIN_POSITIVE);
            }
        }
        Ok(())
    }

    /// Adds `amount` to both directions of every edge of the closed tour.
    ///
    /// Routes with fewer than two nodes have no edges and leave the matrix
    /// unchanged. Negative or non-finite amounts are ignored.
    pub fn deposit(&mut self, route: &[usize], amount: f64) {
        if route.len() < 2 || !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let closing = [route[route.len() - 1], route[0]];
        for edge in route.windows(2).chain(std::iter::once(&closing[..])) {
            let (i, j) = (edge[0], edge[1]);
            self.data[i * self.size + j] += amount;
            self.data[j * self.size + i] += amount;
        }
    }

    /// Deposits `q / cost` along a complete route.
    ///
    /// Stranded routes are skipped. The cost is floored at [`COST_EPSILON`].
    pub fn reinforce(&mut self, route: &Route, q: f64) {
        if let Some(cost) = route.cost() {
            self.deposit(route.nodes(), q / cost.max(COST_EPSILON));
        }
    }

    /// Row-major view of every entry.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
