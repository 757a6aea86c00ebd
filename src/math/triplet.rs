use std::fmt;

use crate::math::compressed::CompressedMatrix;
use crate::math::scalar::Scalar;

/// Number of entries printed by `Display` before output is truncated.
pub const MAX_PRINT: usize = 10;

/// One `(row, col, value)` entry of a sparse matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triplet<T> {
    pub row: usize,
    pub col: usize,
    pub value: T,
}

impl<T> Triplet<T> {
    pub fn new(row: usize, col: usize, value: T) -> Triplet<T> {
        Triplet { row, col, value }
    }
}

impl<T> From<(usize, usize, T)> for Triplet<T> {
    fn from((row, col, value): (usize, usize, T)) -> Self {
        Triplet { row, col, value }
    }
}

/// Unordered list of triplets plus declared dimensions.
///
/// This is the construction and merge format. Several entries may share a
/// `(row, col)`; they are additive and get folded together by
/// [`sort_and_combine`](TripletMatrix::sort_and_combine).
///
/// Inserts outside the declared `rows x cols` shape panic. The shape never
/// grows to fit an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletMatrix<T> {
    pub rows: usize,
    pub cols: usize,
    pub name: String,
    entries: Vec<Triplet<T>>,
}

impl<T: Scalar> TripletMatrix<T> {
    pub fn new(rows: usize, cols: usize, name: impl Into<String>) -> TripletMatrix<T> {
        TripletMatrix {
            rows,
            cols,
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Builds a matrix and inserts every entry from `entries`.
    pub fn from_entries<I>(rows: usize, cols: usize, name: impl Into<String>, entries: I) -> TripletMatrix<T>
    where
        I: IntoIterator<Item = Triplet<T>>,
    {
        let mut mat = TripletMatrix::new(rows, cols, name);
        for entry in entries {
            mat.insert(entry);
        }
        mat
    }

    /// Appends an entry.
    ///
    /// # Panics
    /// Panics if `entry.row >= rows` or `entry.col >= cols`.
    pub fn insert(&mut self, entry: Triplet<T>) {
        assert!(
            entry.row < self.rows && entry.col < self.cols,
            "Triplet ({}, {}) is out of bounds for {}x{} matrix '{}'",
            entry.row, entry.col, self.rows, self.cols, self.name
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Triplet<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts entries into row-major order and sums entries sharing a
    /// `(row, col)`, leaving at most one entry per position.
    pub fn sort_and_combine(&mut self) {
        self.entries.sort_unstable_by_key(|e| (e.row, e.col));
        // `dedup_by` hands us (later, kept); fold the later value into the kept one.
        self.entries.dedup_by(|later, kept| {
            if later.row == kept.row && later.col == kept.col {
                kept.value += later.value;
                true
            } else {
                false
            }
        });
    }

    /// Canonicalizes the entries and derives the compressed row form.
    pub fn to_compressed(&mut self) -> CompressedMatrix<T> {
        self.sort_and_combine();

        let nnz = self.entries.len();
        let mut values = Vec::with_capacity(nnz);
        let mut col_indices = Vec::with_capacity(nnz);
        let mut row_offsets = Vec::with_capacity(self.rows + 1);
        row_offsets.push(0);

        let mut row = 0;
        for (i, e) in self.entries.iter().enumerate() {
            // Close every row up to the one this entry lives in.
            while e.row > row {
                row += 1;
                row_offsets.push(i);
            }
            values.push(e.value);
            col_indices.push(e.col);
        }
        // Trailing empty rows.
        while row < self.rows {
            row += 1;
            row_offsets.push(nnz);
        }

        CompressedMatrix::from_parts(self.rows, self.cols, self.name.clone(), values, col_indices, row_offsets)
    }

    /// Renders the entries; with `all == false` stops after [`MAX_PRINT`].
    pub fn dump(&self, all: bool) -> String {
        let limit = if all { self.entries.len() } else { MAX_PRINT };
        let mut out = format!("Triplet Matrix - {}:\n", self.name);
        for e in self.entries.iter().take(limit) {
            out.push_str(&format!("({}, {}): {}\n", e.row, e.col, e.value));
        }
        out
    }
}

impl<T: Scalar> fmt::Display for TripletMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(row: usize, col: usize, value: f64) -> Triplet<f64> {
        Triplet::new(row, col, value)
    }

    #[test]
    fn combine_sums_duplicates_in_row_major_order() {
        let mut mat = TripletMatrix::from_entries(
            3,
            3,
            "dups",
            vec![t(2, 1, 1.0), t(0, 2, 2.0), t(2, 1, 3.0), t(0, 0, 4.0), t(0, 2, -1.0)],
        );
        mat.sort_and_combine();
        assert_eq!(mat.entries(), &[t(0, 0, 4.0), t(0, 2, 1.0), t(2, 1, 4.0)]);
    }

    #[test]
    fn combine_on_empty_matrix_is_noop() {
        let mut mat: TripletMatrix<f64> = TripletMatrix::new(2, 2, "empty");
        mat.sort_and_combine();
        assert!(mat.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn insert_rejects_row_outside_shape() {
        let mut mat: TripletMatrix<f64> = TripletMatrix::new(2, 2, "small");
        mat.insert(t(2, 0, 1.0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn insert_rejects_col_outside_shape() {
        let mut mat: TripletMatrix<f64> = TripletMatrix::new(2, 2, "small");
        mat.insert(t(0, 5, 1.0));
    }

    #[test]
    fn offsets_cover_leading_and_trailing_empty_rows() {
        let mut mat = TripletMatrix::from_entries(5, 4, "sparse", vec![t(1, 3, 1.0), t(1, 0, 2.0), t(3, 2, 5.0)]);
        let csr = mat.to_compressed();
        assert_eq!(csr.row_offsets(), &[0, 0, 2, 2, 3, 3]);
        assert_eq!(csr.col_indices(), &[0, 3, 2]);
        assert_eq!(csr.values(), &[2.0, 1.0, 5.0]);
    }

    #[test]
    fn display_truncates_after_max_print() {
        let entries = (0..20).map(|i| t(i, 0, i as f64));
        let mat = TripletMatrix::from_entries(20, 1, "long", entries);
        let shown = mat.to_string();
        assert_eq!(shown.lines().count(), 1 + MAX_PRINT);
        assert_eq!(mat.dump(true).lines().count(), 21);
    }
}
