//! Dense distance matrix over a possibly incomplete graph.

use crate::error::{AcoError, Result};

/// Relative tolerance used when checking an explicit matrix for symmetry.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A dense n×n distance matrix stored in row-major order.
///
/// Node pairs without an edge hold `f64::INFINITY`. The diagonal is zero
/// and every other entry is nonnegative. Once built, the matrix is never
/// modified.
///
/// # Examples
///
/// ```
/// use u_aco::distance::DistanceMatrix;
///
/// let coords = [(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)];
/// let dm = DistanceMatrix::from_coordinates(&coords, Some(&[(0, 1), (1, 2)])).unwrap();
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!(dm.get(0, 2).is_infinite());
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a Euclidean distance matrix from 2D coordinates.
    ///
    /// With `edges == None` the graph is complete. Otherwise only the listed
    /// undirected pairs are connected and every other off-diagonal entry is
    /// `+infinity`. A pair `(i, i)` is accepted and ignored.
    ///
    /// # Errors
    ///
    /// Fails when `coords` is empty, a coordinate is not finite, or an edge
    /// names a node outside `0..coords.len()`.
    pub fn from_coordinates(coords: &[(f64, f64)], edges: Option<&[(usize, usize)]>) -> Result<Self> {
        let n = coords.len();
        if n == 0 {
            return Err(AcoError::EmptyInput);
        }
        if let Some(index) = coords.iter().position(|&(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(AcoError::NonFiniteCoordinate { index });
        }

        let euclid = |i: usize, j: usize| {
            let (xi, yi) = coords[i];
            let (xj, yj) = coords[j];
            (xi - xj).hypot(yi - yj)
        };

        let mut dm = Self {
            data: vec![f64::INFINITY; n * n],
            size: n,
        };
        for i in 0..n {
            dm.set(i, i, 0.0);
        }

        match edges {
            None => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        let d = euclid(i, j);
                        dm.set(i, j, d);
                        dm.set(j, i, d);
                    }
                }
            }
            Some(edges) => {
                for &(from, to) in edges {
                    if from >= n || to >= n {
                        return Err(AcoError::EdgeOutOfRange { from, to, nodes: n });
                    }
                    if from == to {
                        continue;
                    }
                    let d = euclid(from, to);
                    dm.set(from, to, d);
                    dm.set(to, from, d);
                }
            }
        }

        Ok(dm)
    }

    /// Validates and wraps an explicit n×n matrix.
    ///
    /// # Errors
    ///
    /// Rejects empty or ragged input, a nonzero diagonal, negative or NaN
    /// entries, and asymmetric pairs.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(AcoError::EmptyInput);
        }
        for (row, r) in rows.iter().enumerate() {
            if r.len() != n {
                return Err(AcoError::NotSquare {
                    row,
                    len: r.len(),
                    expected: n,
                });
            }
        }

        let data: Vec<f64> = rows.into_iter().flatten().collect();
        let dm = Self { data, size: n };

        for i in 0..n {
            let diag = dm.get(i, i);
            if diag != 0.0 {
                return Err(AcoError::NonZeroDiagonal { index: i, value: diag });
            }
            for j in 0..n {
                let value = dm.get(i, j);
                if value.is_nan() || value < 0.0 {
                    return Err(AcoError::InvalidDistance { i, j, value });
                }
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let forward = dm.get(i, j);
                let backward = dm.get(j, i);
                if !approx_equal(forward, backward) {
                    return Err(AcoError::Asymmetric {
                        i,
                        j,
                        forward,
                        backward,
                    });
                }
            }
        }

        Ok(dm)
    }

    /// Returns the distance between `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether a direct edge connects `from` and `to`.
    #[inline]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_finite()
    }

    /// Nodes directly reachable from `from`, excluding `from` itself.
    pub fn neighbors(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&to| to != from && self.has_edge(from, to))
    }

    /// Length of the closed tour through `route`.
    ///
    /// Sums consecutive edges plus the edge from the last node back to the
    /// first. Returns `+infinity` if any of those edges is missing and `0`
    /// for routes with fewer than two nodes.
    pub fn tour_length(&self, route: &[usize]) -> f64 {
        match (route.first(), route.last()) {
            (Some(&first), Some(&last)) if route.len() > 1 => {
                let open: f64 = route.windows(2).map(|w| self.get(w[0], w[1])).sum();
                open + self.get(last, first)
            }
            _ => 0.0,
        }
    }
}

fn approx_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}
