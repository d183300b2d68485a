//! Colony configuration.

use crate::error::{AcoError, Result};

/// Configuration for the Ant Colony optimizer.
///
/// # Defaults
///
/// ```
/// use u_aco::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.n_ants, 10);
/// assert_eq!(config.n_iterations, 50);
/// assert_eq!(config.beta, 3.0);
/// assert_eq!(config.start_city, None);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_aco::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_n_ants(20)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_evaporation_rate(0.3)
///     .with_start_city(0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone)]
pub struct AcoConfig {
    /// Ants constructing a route in every iteration. Must be at least 1.
    pub n_ants: usize,

    /// Number of iterations. Must be at least 1; there is no early exit.
    pub n_iterations: usize,

    /// Exponent applied to the pheromone trail when weighting a move.
    pub alpha: f64,

    /// Exponent applied to visibility (`1 / distance`) when weighting a move.
    pub beta: f64,

    /// Fraction of pheromone removed from every edge per iteration, in `[0, 1)`.
    ///
    /// `0.0` disables evaporation.
    pub evaporation_rate: f64,

    /// Deposit constant `Q`. A complete route of cost `c` adds `Q / c` to
    /// each of its edges.
    ///
    /// `0.0` turns the trail into pure evaporation.
    pub deposit_constant: f64,

    /// Trail strength every edge starts with. Must be positive.
    pub initial_pheromone: f64,

    /// Node every ant starts from. `None` draws a start node per ant.
    pub start_city: Option<usize>,

    /// Whether ants of one iteration are built in parallel.
    ///
    /// Only effective with the `parallel` feature. Results do not depend on
    /// this flag.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            n_ants: 10,
            n_iterations: 50,
            alpha: 1.0,
            beta: 3.0,
            evaporation_rate: 0.5,
            deposit_constant: 1.0,
            initial_pheromone: 1.0,
            start_city: None,
            parallel: false,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Sets the number of ants per iteration.
    pub fn with_n_ants(mut self, n: usize) -> Self {
        self.n_ants = n;
        self
    }

    /// Sets the number of iterations.
    pub fn with_n_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the visibility exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_deposit_constant(mut self, q: f64) -> Self {
        self.deposit_constant = q;
        self
    }

    pub fn with_initial_pheromone(mut self, tau: f64) -> Self {
        self.initial_pheromone = tau;
        self
    }

    /// Fixes the start node shared by all ants.
    pub fn with_start_city(mut self, city: usize) -> Self {
        self.start_city = Some(city);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration on its own.
    ///
    /// The range of `start_city` depends on the graph and is checked by
    /// [`validate_for`](Self::validate_for).
    pub fn validate(&self) -> Result<()> {
        if self.n_ants < 1 {
            return Err(AcoError::InvalidConfig("n_ants must be at least 1".into()));
        }
        if self.n_iterations < 1 {
            return Err(AcoError::InvalidConfig(
                "n_iterations must be at least 1".into(),
            ));
        }
        if !self.alpha.is_finite() {
            return Err(AcoError::InvalidConfig(format!(
                "alpha must be finite, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() {
            return Err(AcoError::InvalidConfig(format!(
                "beta must be finite, got {}",
                self.beta
            )));
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(AcoError::InvalidEvaporationRate(self.evaporation_rate));
        }
        if !self.deposit_constant.is_finite() || self.deposit_constant < 0.0 {
            return Err(AcoError::InvalidConfig(format!(
                "deposit_constant must be finite and nonnegative, got {}",
                self.deposit_constant
            )));
        }
        if !self.initial_pheromone.is_finite() || self.initial_pheromone <= 0.0 {
            return Err(AcoError::InvalidConfig(format!(
                "initial_pheromone must be finite and positive, got {}",
                self.initial_pheromone
            )));
        }
        Ok(())
    }

    /// Validates the configuration against a graph of `nodes` nodes.
    pub fn validate_for(&self, nodes: usize) -> Result<()> {
        self.validate()?;
        match self.start_city {
            Some(start) if start >= nodes => Err(AcoError::StartCityOutOfRange { start, nodes }),
            _ => Ok(()),
        }
    }
}
