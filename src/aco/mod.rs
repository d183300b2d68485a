//! Ant Colony Optimization (ACO).
//!
//! A population of ants repeatedly builds tours over a weighted graph,
//! biased by a shared pheromone trail and by edge visibility. Short tours
//! reinforce their edges, all edges evaporate, and the colony gradually
//! concentrates on good tours.
//!
//! The graph may be incomplete. An ant that reaches a node with no
//! unvisited reachable neighbor stops; its stranded route is neither scored
//! nor allowed to deposit pheromone.
//!
//! # Key Types
//!
//! - [`AcoConfig`]: colony parameters
//! - [`PheromoneMatrix`]: trail strengths with evaporation and deposit
//! - [`RouteConstructor`]: builds one route for one ant
//! - [`AcoRunner`]: executes the iteration loop
//! - [`AcoResult`]: best tour and run statistics
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod construct;
mod pheromone;
mod runner;
mod types;

pub use config::AcoConfig;
pub use construct::{sample_weighted, RouteConstructor, DISTANCE_EPSILON};
pub use pheromone::{PheromoneMatrix, COST_EPSILON, INIT_PHEROMONE};
pub use runner::{AcoResult, AcoRunner};
pub use types::{Route, RouteStatus, Tour};
