//! Ant Colony Optimization for tours over weighted graphs.
//!
//! Finds a low-cost closed tour through every node of a graph that may be
//! incomplete (some node pairs have no direct edge):
//!
//! - **Distance**: builds a validated distance matrix from coordinates and
//!   an optional edge list, or from explicit rows.
//! - **ACO**: the colony itself. Pheromone trail, per-ant route
//!   construction, and the iteration loop with global-best tracking.
//! - **Plan**: translation between caller-owned site ids and matrix
//!   indices, for callers that keep their own site records.
//!
//! Every stochastic draw goes through an explicitly seeded RNG, so a fixed
//! seed reproduces a run exactly, with or without the `parallel` feature.
//!
//! # Architecture
//!
//! This crate sits at Layer 2 (Algorithms) in the U-Engine ecosystem. The
//! colony consumes only a distance matrix and a configuration; loading
//! site records and presenting results belong to callers.

pub mod aco;
pub mod distance;
pub mod error;
pub mod plan;
pub mod random;

pub use error::{AcoError, Result};
