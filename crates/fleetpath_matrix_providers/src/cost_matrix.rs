use fleetpath_core::{InputValidationError, NodeIdx};
use serde::{Deserialize, Serialize};

pub type Cost = f64;

/// N×N travel costs between nodes, stored as a flat row-major vector.
/// To find the index for a pair of nodes, use `from * num_nodes + to`.
///
/// The diagonal is always zero. The matrix is immutable once built and is
/// serialized as a list of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cost>>", into = "Vec<Vec<Cost>>")]
pub struct CostMatrix {
    costs: Vec<Cost>,
    num_nodes: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[Cost], num_nodes: usize) -> bool {
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if matrix[i * num_nodes + j] != matrix[j * num_nodes + i] {
                return false;
            }
        }
    }
    true
}

impl CostMatrix {
    /// `costs.len()` must be `num_nodes²`; callers inside the crate guarantee it.
    pub(crate) fn from_flat(mut costs: Vec<Cost>, num_nodes: usize) -> Self {
        for i in 0..num_nodes {
            costs[i * num_nodes + i] = 0.0;
        }

        let is_symmetric = is_flat_matrix_symmetric(&costs, num_nodes);

        Self {
            costs,
            num_nodes,
            is_symmetric,
        }
    }

    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self, InputValidationError> {
        let num_nodes = rows.len();

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_nodes)
        {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "cost matrix row {} has {} columns, expected {}",
                index,
                row.len(),
                num_nodes
            )));
        }

        if let Some(value) = rows.iter().flatten().find(|value| !value.is_finite()) {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "cost matrix contains a non-finite value: {}",
                value
            )));
        }

        Ok(Self::from_flat(rows.into_iter().flatten().collect(), num_nodes))
    }

    #[inline(always)]
    fn index(&self, from: NodeIdx, to: NodeIdx) -> usize {
        from.get() * self.num_nodes + to.get()
    }

    /// Panics if either node is outside the matrix; see [`CostMatrix::contains`].
    #[inline(always)]
    pub fn cost(&self, from: NodeIdx, to: NodeIdx) -> Cost {
        if from == to {
            return 0.0;
        }

        self.costs[self.index(from, to)]
    }

    pub fn contains(&self, node: NodeIdx) -> bool {
        node.get() < self.num_nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn max_cost(&self) -> Cost {
        self.costs.iter().cloned().fold(0.0, f64::max)
    }

    pub fn rows(&self) -> Vec<Vec<Cost>> {
        if self.num_nodes == 0 {
            return Vec::new();
        }

        self.costs
            .chunks(self.num_nodes)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Whole-unit arc costs, truncated towards zero, as the route solver expects them.
    pub fn arc_costs(&self) -> Vec<Vec<i64>> {
        if self.num_nodes == 0 {
            return Vec::new();
        }

        self.costs
            .chunks(self.num_nodes)
            .map(|row| row.iter().map(|&cost| cost.trunc() as i64).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<Cost>>> for CostMatrix {
    type Error = InputValidationError;

    fn try_from(rows: Vec<Vec<Cost>>) -> Result<Self, Self::Error> {
        CostMatrix::from_rows(rows)
    }
}

impl From<CostMatrix> for Vec<Vec<Cost>> {
    fn from(matrix: CostMatrix) -> Self {
        matrix.rows()
    }
}
