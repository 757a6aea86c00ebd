use std::fmt;
use std::ops::{AddAssign, Mul, Range};

use crate::math::scalar::Scalar;
use crate::math::triplet::{Triplet, TripletMatrix, MAX_PRINT};

/// Row-major compressed sparse matrix.
///
/// `row_offsets[r]..row_offsets[r + 1]` delimits row `r`'s run inside
/// `values` / `col_indices`, with columns ascending inside each run.
/// Only [`TripletMatrix::to_compressed`] builds one, so the layout is always
/// canonical (one entry per position, `row_offsets.len() == rows + 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedMatrix<T> {
    rows: usize,
    cols: usize,
    pub name: String,
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_offsets: Vec<usize>,
}

impl<T: Scalar> CompressedMatrix<T> {
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        name: String,
        values: Vec<T>,
        col_indices: Vec<usize>,
        row_offsets: Vec<usize>,
    ) -> CompressedMatrix<T> {
        debug_assert_eq!(values.len(), col_indices.len());
        debug_assert_eq!(row_offsets.len(), rows + 1);
        debug_assert_eq!(row_offsets.last().copied(), Some(values.len()));
        CompressedMatrix { rows, cols, name, values, col_indices, row_offsets }
    }

    /// An all-zero matrix with no stored entries.
    pub fn empty(rows: usize, cols: usize, name: impl Into<String>) -> CompressedMatrix<T> {
        TripletMatrix::new(rows, cols, name).to_compressed()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access to the stored values. The sparsity pattern stays fixed.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// Index range of row `r` inside `values` / `col_indices`.
    pub fn row_range(&self, r: usize) -> Range<usize> {
        self.row_offsets[r]..self.row_offsets[r + 1]
    }

    /// Stored value at `(row, col)`, or `None` if the position is not stored.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .binary_search(&col)
            .ok()
            .map(|i| self.values[range.start + i])
    }

    /// Iterates the stored entries in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = Triplet<T>> + '_ {
        (0..self.rows).flat_map(move |r| {
            self.row_range(r)
                .map(move |i| Triplet::new(r, self.col_indices[i], self.values[i]))
        })
    }

    /// True when both matrices store exactly the same positions.
    pub fn same_pattern(&self, other: &CompressedMatrix<T>) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.row_offsets == other.row_offsets
            && self.col_indices == other.col_indices
    }

    /// Copy of this matrix's sparsity pattern with every value set to zero.
    pub fn zeroed_like(&self, name: impl Into<String>) -> CompressedMatrix<T> {
        CompressedMatrix {
            rows: self.rows,
            cols: self.cols,
            name: name.into(),
            values: vec![T::zero(); self.values.len()],
            col_indices: self.col_indices.clone(),
            row_offsets: self.row_offsets.clone(),
        }
    }

    pub fn to_triplet(&self) -> TripletMatrix<T> {
        TripletMatrix::from_entries(self.rows, self.cols, self.name.clone(), self.entries())
    }

    /// Matrix-vector product.
    ///
    /// # Panics
    /// Panics if `v.len() != cols`.
    pub fn multiply(&self, v: &[T]) -> Vec<T> {
        if v.len() != self.cols {
            panic!(
                "Vector of length {} cannot multiply {}x{} matrix '{}'",
                v.len(), self.rows, self.cols, self.name
            );
        }

        (0..self.rows)
            .map(|r| {
                self.row_range(r)
                    .map(|i| self.values[i] * v[self.col_indices[i]])
                    .sum()
            })
            .collect()
    }

    /// Renders the stored entries; with `all == false` stops after [`MAX_PRINT`].
    pub fn dump(&self, all: bool) -> String {
        let limit = if all { self.nnz() } else { MAX_PRINT };
        let mut out = format!("Compressed Matrix - {}:\n", self.name);
        for e in self.entries().take(limit) {
            out.push_str(&format!("({}, {}): {}\n", e.row, e.col, e.value));
        }
        out
    }
}

impl<T: Scalar> Mul<&[T]> for &CompressedMatrix<T> {
    type Output = Vec<T>;

    fn mul(self, rhs: &[T]) -> Self::Output {
        self.multiply(rhs)
    }
}

/// Sums two matrices by merging both entry lists through triplet form.
impl<T: Scalar> AddAssign<&CompressedMatrix<T>> for CompressedMatrix<T> {
    fn add_assign(&mut self, rhs: &CompressedMatrix<T>) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!(
                "Cannot add {}x{} matrix '{}' to {}x{} matrix '{}'",
                rhs.rows, rhs.cols, rhs.name, self.rows, self.cols, self.name
            );
        }

        let mut merged = self.to_triplet();
        for entry in rhs.entries() {
            merged.insert(entry);
        }
        let sum = merged.to_compressed();

        self.values = sum.values;
        self.col_indices = sum.col_indices;
        self.row_offsets = sum.row_offsets;
    }
}

impl<T: Scalar> fmt::Display for CompressedMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(false))
    }
}

/// Renders a dense vector; with `all == false` stops after [`MAX_PRINT`] items.
pub fn format_vector<T: Scalar>(v: &[T], all: bool) -> String {
    let limit = if all { v.len() } else { MAX_PRINT };
    let mut out = format!("Vector - Length = {}\n", v.len());
    for (i, x) in v.iter().enumerate().take(limit) {
        out.push_str(&format!("vec[{}]={}\n", i, x));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csr(rows: usize, cols: usize, entries: &[(usize, usize, f64)]) -> CompressedMatrix<f64> {
        TripletMatrix::from_entries(rows, cols, "m", entries.iter().map(|&e| Triplet::from(e))).to_compressed()
    }

    #[test]
    fn multiply_sums_each_row_run() {
        let m = csr(3, 3, &[(0, 0, 1.0), (0, 2, 2.0), (2, 1, -3.0)]);
        assert_eq!(m.multiply(&[1.0, 2.0, 3.0]), vec![7.0, 0.0, -6.0]);
        assert_eq!(&m * &[1.0, 1.0, 1.0][..], vec![3.0, 0.0, -3.0]);
    }

    #[test]
    #[should_panic(expected = "cannot multiply")]
    fn multiply_rejects_wrong_length() {
        let m = csr(2, 3, &[(0, 0, 1.0)]);
        m.multiply(&[1.0, 2.0]);
    }

    #[test]
    fn get_finds_stored_and_missing_positions() {
        let m = csr(2, 4, &[(0, 1, 5.0), (0, 3, 6.0), (1, 0, 7.0)]);
        assert_eq!(m.get(0, 3), Some(6.0));
        assert_eq!(m.get(0, 2), None);
        assert_eq!(m.get(1, 0), Some(7.0));
    }

    #[test]
    fn add_assign_merges_overlapping_and_disjoint_entries() {
        let mut a = csr(2, 2, &[(0, 0, 1.0), (1, 1, 2.0)]);
        let b = csr(2, 2, &[(0, 0, 4.0), (0, 1, 3.0)]);
        a += &b;
        assert_eq!(a.entries().collect::<Vec<_>>(), vec![
            Triplet::new(0, 0, 5.0),
            Triplet::new(0, 1, 3.0),
            Triplet::new(1, 1, 2.0),
        ]);
        assert_eq!(a.row_offsets(), &[0, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "Cannot add")]
    fn add_assign_rejects_mismatched_shapes() {
        let mut a = csr(2, 2, &[]);
        let b = csr(3, 2, &[]);
        a += &b;
    }

    #[test]
    fn zeroed_like_keeps_pattern() {
        let m = csr(3, 3, &[(0, 1, 1.0), (2, 2, 4.0)]);
        let z = m.zeroed_like("z");
        assert!(z.same_pattern(&m));
        assert!(z.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_matrix_has_full_offsets() {
        let m: CompressedMatrix<f32> = CompressedMatrix::empty(4, 4, "e");
        assert_eq!(m.row_offsets(), &[0, 0, 0, 0, 0]);
        assert_eq!(m.multiply(&[1.0; 4]), vec![0.0; 4]);
    }

    #[test]
    fn format_vector_lists_items() {
        let out = format_vector(&[1.5, 2.0], false);
        assert_eq!(out, "Vector - Length = 2\nvec[0]=1.5\nvec[1]=2\n");
    }
}
