//! Route types produced by ants.

/// How a route's construction ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteStatus {
    /// Every node was visited. Carries the closed-tour cost.
    Complete { cost: f64 },

    /// The ant reached a node with no unvisited reachable neighbor.
    Stranded,
}

/// An ordered sequence of distinct node indices built by one ant.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<usize>,
    status: RouteStatus,
}

impl Route {
    pub(crate) fn complete(nodes: Vec<usize>, cost: f64) -> Self {
        Self {
            nodes,
            status: RouteStatus::Complete { cost },
        }
    }

    pub(crate) fn stranded(nodes: Vec<usize>) -> Self {
        Self {
            nodes,
            status: RouteStatus::Stranded,
        }
    }

    /// Visited nodes in order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn status(&self) -> RouteStatus {
        self.status
    }

    /// Whether the route is a Hamiltonian tour.
    pub fn is_complete(&self) -> bool {
        matches!(self.status, RouteStatus::Complete { .. })
    }

    /// Closed-tour cost, or `None` for a stranded route.
    pub fn cost(&self) -> Option<f64> {
        match self.status {
            RouteStatus::Complete { cost } => Some(cost),
            RouteStatus::Stranded => None,
        }
    }

    /// Cost used for ranking: stranded routes rank as `+infinity`.
    pub fn score(&self) -> f64 {
        self.cost().unwrap_or(f64::INFINITY)
    }

    pub fn into_nodes(self) -> Vec<usize> {
        self.nodes
    }
}

/// The best complete tour found by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Node indices in visiting order; the return edge is implicit.
    pub route: Vec<usize>,

    /// Closed-tour length.
    pub distance: f64,
}
