//! Compressed sparse row matrix used for document-term features.

use ndarray::Array1;

/// Row-major sparse matrix (CSR layout).
///
/// Column indices inside a row are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// Borrowed view of one matrix row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f64],
}

impl SparseMatrix {
    /// Empty matrix with `n_cols` columns and no rows.
    pub fn new(n_cols: usize) -> Self {
        SparseMatrix {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Append a row given as `(column, value)` pairs in any order.
    ///
    /// Duplicate columns are summed and explicit zeros are dropped. Columns
    /// outside the matrix are ignored.
    pub fn push_row(&mut self, mut entries: Vec<(usize, f64)>) {
        entries.sort_by_key(|&(col, _)| col);
        let mut last: Option<usize> = None;
        for (col, value) in entries {
            if col >= self.n_cols {
                continue;
            }
            if last == Some(col) {
                if let Some(v) = self.data.last_mut() {
                    *v += value;
                }
                continue;
            }
            self.indices.push(col);
            self.data.push(value);
            last = Some(col);
        }

        // drop entries that summed to zero
        let start = *self.indptr.last().unwrap_or(&0);
        let mut write = start;
        for read in start..self.indices.len() {
            if self.data[read] != 0.0 {
                self.indices[write] = self.indices[read];
                self.data[write] = self.data[read];
                write += 1;
            }
        }
        self.indices.truncate(write);
        self.data.truncate(write);
        self.indptr.push(write);
    }

    /// Build a matrix from per-row `(column, value)` lists.
    pub fn from_rows(rows: Vec<Vec<(usize, f64)>>, n_cols: usize) -> Self {
        let mut matrix = SparseMatrix::new(n_cols);
        for row in rows {
            matrix.push_row(row);
        }
        matrix
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols)
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn row(&self, i: usize) -> SparseRow<'_> {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_>> + '_ {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// Scale every stored value of row `i` by `factor`.
    pub fn scale_row(&mut self, i: usize, factor: f64) {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        for v in &mut self.data[start..end] {
            *v *= factor;
        }
    }

    /// Multiply each column `j` by `weights[j]`.
    pub fn scale_columns(&mut self, weights: &[f64]) {
        for (col, v) in self.indices.iter().zip(self.data.iter_mut()) {
            *v *= weights[*col];
        }
    }

    /// Dense copy, for tests and small inspections.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows()
            .map(|row| {
                let mut dense = vec![0.0; self.n_cols];
                for (&c, &v) in row.indices.iter().zip(row.values) {
                    dense[c] = v;
                }
                dense
            })
            .collect()
    }
}

impl<'a> SparseRow<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Dot product with a dense vector of matching width.
    pub fn dot(&self, dense: &Array1<f64>) -> f64 {
        self.iter().map(|(c, v)| v * dense[c]).sum()
    }

    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Value stored at column `col`, or zero.
    pub fn get(&self, col: usize) -> f64 {
        match self.indices.binary_search(&col) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_push_row_sorts_and_merges() {
        let mut m = SparseMatrix::new(4);
        m.push_row(vec![(3, 1.0), (0, 2.0), (3, 1.5), (9, 7.0)]);
        m.push_row(vec![]);
        m.push_row(vec![(1, 1.0), (1, -1.0), (2, 4.0)]);

        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).indices, &[0, 3]);
        assert_eq!(m.row(0).values, &[2.0, 2.5]);
        assert_eq!(m.row(1).nnz(), 0);
        assert_eq!(m.row(2).indices, &[2]);
    }

    #[test]
    fn test_row_operations() {
        let m = SparseMatrix::from_rows(vec![vec![(0, 3.0), (2, 4.0)]], 3);
        let row = m.row(0);
        assert_eq!(row.squared_norm(), 25.0);
        assert_eq!(row.dot(&array![1.0, 10.0, 2.0]), 11.0);
        assert_eq!(row.get(1), 0.0);
        assert_eq!(row.get(2), 4.0);
    }

    #[test]
    fn test_scaling_and_dense() {
        let mut m = SparseMatrix::from_rows(vec![vec![(0, 1.0)], vec![(0, 2.0), (1, 3.0)]], 2);
        m.scale_columns(&[2.0, 0.5]);
        m.scale_row(0, 10.0);
        assert_eq!(m.to_dense(), vec![vec![20.0, 0.0], vec![4.0, 1.5]]);
    }
}
