use nalgebra::DMatrix;

/// Resizable square matrix of edge values.
///
/// A value of `0` means "no edge". Negative values are sentinels whose meaning
/// is left to the owning graph (see [`crate::graph::Graph::has_edge`]).
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    data: DMatrix<f64>,
}

impl Default for AdjacencyMatrix {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AdjacencyMatrix {
    /// Creates a `size × size` matrix filled with zeros.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            data: DMatrix::zeros(size, size),
        }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    /// Returns the value stored at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// Writes `value` at `(row, col)`, and at `(col, row)` too when `symmetric`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: f64, symmetric: bool) {
        self.data[(row, col)] = value;
        if symmetric {
            self.data[(col, row)] = value;
        }
    }

    /// Appends one zeroed row and column.
    pub fn expand(&mut self) {
        let n = self.size();
        let data = std::mem::replace(&mut self.data, DMatrix::zeros(0, 0));
        self.data = data.insert_column(n, 0.0).insert_row(n, 0.0);
    }

    /// Deletes row and column `index`; every higher index shifts down by one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) {
        let data = std::mem::replace(&mut self.data, DMatrix::zeros(0, 0));
        self.data = data.remove_column(index).remove_row(index);
    }
}
