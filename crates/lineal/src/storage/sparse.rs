//! Compressed sparse row (CSR) matrix storage.
//!
//! Three arrays describe the stored entries: `row_pointers` (length
//! `rows + 1`, monotonic, first element 0, last element the stored-entry
//! count), `column_indices` and `values`. After [`normalize`] the column
//! indices within each row are strictly increasing with no duplicates;
//! explicitly stored zeros are permitted.
//!
//! [`normalize`]: CsrStorage::normalize

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use std::ops::Range;

/// Compressed sparse row storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrStorage<T: Scalar> {
    rows: usize,
    cols: usize,
    row_pointers: Vec<usize>,
    column_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> CsrStorage<T> {
    /// Create sparse storage with no stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDimensions`] if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            row_pointers: vec![0; rows + 1],
            column_indices: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Build from raw CSR arrays, validating the layout invariants and
    /// normalizing the result. Duplicate columns within a row are
    /// accumulated by summation; explicitly stored zeros are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSparseLayout`] when the arrays violate the
    /// CSR invariants, [`Error::EmptyDimensions`] for a zero dimension.
    pub fn of_csr(
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimensions { rows, cols });
        }
        if row_pointers.len() != rows + 1 {
            return Err(Error::InvalidSparseLayout {
                reason: "row pointer array must have rows + 1 entries",
            });
        }
        if row_pointers[0] != 0 {
            return Err(Error::InvalidSparseLayout {
                reason: "first row pointer must be zero",
            });
        }
        if row_pointers[rows] != values.len() {
            return Err(Error::InvalidSparseLayout {
                reason: "last row pointer must equal the stored-entry count",
            });
        }
        if row_pointers.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidSparseLayout {
                reason: "row pointers must be monotonically non-decreasing",
            });
        }
        if column_indices.len() != values.len() {
            return Err(Error::InvalidSparseLayout {
                reason: "column index and value arrays must have equal length",
            });
        }
        if column_indices.iter().any(|&c| c >= cols) {
            return Err(Error::InvalidSparseLayout {
                reason: "column index out of range",
            });
        }
        let mut storage = Self {
            rows,
            cols,
            row_pointers,
            column_indices,
            values,
        };
        storage.normalize();
        Ok(storage)
    }

    /// Build from coordinate-format triples `(row, col, value)`.
    ///
    /// Duplicate `(row, col)` entries accumulate by summation - they are
    /// never silently dropped. Explicitly supplied zeros are stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for a coordinate outside the
    /// shape, [`Error::EmptyDimensions`] for a zero dimension.
    pub fn of_coo(rows: usize, cols: usize, entries: &[(usize, usize, T)]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimensions { rows, cols });
        }
        for &(row, col, _) in entries {
            if row >= rows {
                return Err(Error::IndexOutOfBounds {
                    index: row,
                    bound: rows,
                });
            }
            if col >= cols {
                return Err(Error::IndexOutOfBounds {
                    index: col,
                    bound: cols,
                });
            }
        }

        let mut sorted: Vec<(usize, usize, T)> = entries.to_vec();
        sorted.sort_by_key(|&(row, col, _)| (row, col));

        let mut row_pointers = vec![0usize; rows + 1];
        let mut column_indices = Vec::with_capacity(sorted.len());
        let mut values: Vec<T> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for (row, col, value) in sorted {
            if last == Some((row, col)) {
                // Duplicate coordinate: accumulate, never drop.
                *values
                    .last_mut()
                    .expect("duplicate coordinate follows a stored entry") += value;
            } else {
                column_indices.push(col);
                values.push(value);
                row_pointers[row + 1] += 1;
                last = Some((row, col));
            }
        }
        for r in 0..rows {
            row_pointers[r + 1] += row_pointers[r];
        }
        Ok(Self {
            rows,
            cols,
            row_pointers,
            column_indices,
            values,
        })
    }

    /// Build from compressed sparse column arrays by transposing the
    /// layout into CSR via a counting pass.
    ///
    /// # Errors
    ///
    /// Same conditions as [`of_csr`](Self::of_csr), with the column
    /// pointer array playing the role of the row pointers.
    pub fn of_csc(
        rows: usize,
        cols: usize,
        col_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimensions { rows, cols });
        }
        if col_pointers.len() != cols + 1 {
            return Err(Error::InvalidSparseLayout {
                reason: "column pointer array must have cols + 1 entries",
            });
        }
        if col_pointers[0] != 0 || col_pointers[cols] != values.len() {
            return Err(Error::InvalidSparseLayout {
                reason: "column pointers must start at zero and end at the stored-entry count",
            });
        }
        if col_pointers.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidSparseLayout {
                reason: "column pointers must be monotonically non-decreasing",
            });
        }
        if row_indices.len() != values.len() {
            return Err(Error::InvalidSparseLayout {
                reason: "row index and value arrays must have equal length",
            });
        }
        if row_indices.iter().any(|&r| r >= rows) {
            return Err(Error::InvalidSparseLayout {
                reason: "row index out of range",
            });
        }

        // Counting pass: entries per row, then prefix sums, then scatter.
        let mut row_pointers = vec![0usize; rows + 1];
        for &row in &row_indices {
            row_pointers[row + 1] += 1;
        }
        for r in 0..rows {
            row_pointers[r + 1] += row_pointers[r];
        }
        let nnz = values.len();
        let mut column_indices = vec![0usize; nnz];
        let mut out_values = vec![T::zero(); nnz];
        let mut next = row_pointers.clone();
        for col in 0..cols {
            for k in col_pointers[col]..col_pointers[col + 1] {
                let row = row_indices[k];
                let pos = next[row];
                column_indices[pos] = col;
                out_values[pos] = values[k];
                next[row] += 1;
            }
        }
        let mut storage = Self {
            rows,
            cols,
            row_pointers,
            column_indices,
            values: out_values,
        };
        // Columns scatter in ascending order already, but duplicates may
        // still need merging.
        storage.normalize();
        Ok(storage)
    }

    /// Assemble from already-valid parts. Kernels use this after building
    /// the three arrays themselves; the caller guarantees the invariants
    /// (or follows up with [`normalize`](Self::normalize)).
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_pointers.len(), rows + 1);
        debug_assert_eq!(column_indices.len(), values.len());
        Self {
            rows,
            cols,
            row_pointers,
            column_indices,
            values,
        }
    }

    /// Row count.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries (explicit zeros included).
    #[inline]
    pub fn nonzero_count(&self) -> usize {
        self.values.len()
    }

    /// Range of positions in the value array belonging to `row`.
    #[inline]
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_pointers[row]..self.row_pointers[row + 1]
    }

    /// Column indices and values stored for `row`.
    #[inline]
    pub fn row_entries(&self, row: usize) -> (&[usize], &[T]) {
        let range = self.row_range(row);
        (&self.column_indices[range.clone()], &self.values[range])
    }

    /// The row pointer array.
    #[inline]
    pub fn row_pointers(&self) -> &[usize] {
        &self.row_pointers
    }

    /// The column index array.
    #[inline]
    pub fn column_indices(&self) -> &[usize] {
        &self.column_indices
    }

    /// The value array.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable view of the value array. Structure (pointers, indices) is
    /// untouched, so this is safe for stored-values-only maps.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Position of `(row, col)` in the value array, or the insertion point
    /// within the row if absent. Requires normalized storage.
    fn find(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let range = self.row_range(row);
        let slice = &self.column_indices[range.clone()];
        match slice.binary_search(&col) {
            Ok(offset) => Ok(range.start + offset),
            Err(offset) => Err(range.start + offset),
        }
    }

    /// Element at `(row, col)`; zero if no entry is stored there.
    pub fn at(&self, row: usize, col: usize) -> T {
        match self.find(row, col) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    /// Write the element at `(row, col)`.
    ///
    /// Writing zero removes an existing entry; writing a nonzero value
    /// overwrites or inserts. (Construction from coordinate or compressed
    /// formats, by contrast, preserves explicitly supplied zeros.)
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        match self.find(row, col) {
            Ok(pos) => {
                if value.is_zero() {
                    self.remove_at(row, pos);
                } else {
                    self.values[pos] = value;
                }
            }
            Err(pos) => {
                if !value.is_zero() {
                    self.insert_at(row, pos, col, value);
                }
            }
        }
    }

    /// Add `value` to the element at `(row, col)`.
    pub fn add_at(&mut self, row: usize, col: usize, value: T) {
        match self.find(row, col) {
            Ok(pos) => {
                let sum = self.values[pos] + value;
                if sum.is_zero() {
                    self.remove_at(row, pos);
                } else {
                    self.values[pos] = sum;
                }
            }
            Err(pos) => {
                if !value.is_zero() {
                    self.insert_at(row, pos, col, value);
                }
            }
        }
    }

    fn insert_at(&mut self, row: usize, pos: usize, col: usize, value: T) {
        self.column_indices.insert(pos, col);
        self.values.insert(pos, value);
        for p in &mut self.row_pointers[row + 1..] {
            *p += 1;
        }
    }

    fn remove_at(&mut self, row: usize, pos: usize) {
        self.column_indices.remove(pos);
        self.values.remove(pos);
        for p in &mut self.row_pointers[row + 1..] {
            *p -= 1;
        }
    }

    /// Reset to the empty matrix, keeping the shape.
    pub fn clear(&mut self) {
        self.row_pointers.iter_mut().for_each(|p| *p = 0);
        self.column_indices.clear();
        self.values.clear();
    }

    /// Sort each row's entries by column and merge duplicates by
    /// summation. Kernels that populate rows in discovery order call this
    /// before the storage is relied upon by row-pointer arithmetic.
    pub fn normalize(&mut self) {
        let mut scratch: Vec<(usize, T)> = Vec::new();
        let mut write = 0usize;
        let mut new_pointers = vec![0usize; self.rows + 1];
        for row in 0..self.rows {
            let range = self.row_range(row);
            scratch.clear();
            for k in range {
                scratch.push((self.column_indices[k], self.values[k]));
            }
            scratch.sort_by_key(|&(col, _)| col);

            let row_start = write;
            for &(col, value) in scratch.iter() {
                if write > row_start && self.column_indices[write - 1] == col {
                    let merged = self.values[write - 1] + value;
                    self.values[write - 1] = merged;
                } else {
                    self.column_indices[write] = col;
                    self.values[write] = value;
                    write += 1;
                }
            }
            new_pointers[row + 1] = write;
        }
        self.column_indices.truncate(write);
        self.values.truncate(write);
        self.row_pointers = new_pointers;
    }

    /// Iterate over stored entries as `(row, col, value)` triples, in row
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.rows).flat_map(move |row| {
            self.row_range(row)
                .map(move |k| (row, self.column_indices[k], self.values[k]))
        })
    }

    /// Transpose into a new CSR storage of the flipped shape via a
    /// counting pass over the stored entries.
    pub fn transpose(&self) -> Self {
        let nnz = self.values.len();
        let mut row_pointers = vec![0usize; self.cols + 1];
        for &col in &self.column_indices {
            row_pointers[col + 1] += 1;
        }
        for c in 0..self.cols {
            row_pointers[c + 1] += row_pointers[c];
        }
        let mut column_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut next = row_pointers.clone();
        for (row, col, value) in self.iter() {
            let pos = next[col];
            column_indices[pos] = row;
            values[pos] = value;
            next[col] += 1;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            row_pointers,
            column_indices,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let s: CsrStorage<f64> = CsrStorage::zeros(3, 4).unwrap();
        assert_eq!(s.rows(), 3);
        assert_eq!(s.cols(), 4);
        assert_eq!(s.nonzero_count(), 0);
        assert_eq!(s.at(2, 3), 0.0);
    }

    #[test]
    fn test_of_coo_basic() {
        let s = CsrStorage::of_coo(2, 3, &[(0, 1, 2.0), (1, 0, 3.0), (0, 2, 4.0)]).unwrap();
        assert_eq!(s.nonzero_count(), 3);
        assert_eq!(s.at(0, 1), 2.0);
        assert_eq!(s.at(0, 2), 4.0);
        assert_eq!(s.at(1, 0), 3.0);
        assert_eq!(s.at(0, 0), 0.0);
        assert_eq!(s.row_pointers(), &[0, 2, 3]);
    }

    #[test]
    fn test_of_coo_duplicates_accumulate() {
        let s = CsrStorage::of_coo(2, 2, &[(0, 0, 1.5), (0, 0, 2.5), (1, 1, 1.0)]).unwrap();
        assert_eq!(s.at(0, 0), 4.0);
        assert_eq!(s.nonzero_count(), 2);
    }

    #[test]
    fn test_of_coo_explicit_zero_preserved() {
        let s = CsrStorage::of_coo(2, 2, &[(0, 1, 0.0f64)]).unwrap();
        assert_eq!(s.nonzero_count(), 1);
        assert_eq!(s.at(0, 1), 0.0);
    }

    #[test]
    fn test_of_coo_out_of_bounds() {
        let result = CsrStorage::of_coo(2, 2, &[(2, 0, 1.0f64)]);
        assert!(matches!(
            result,
            Err(Error::IndexOutOfBounds { index: 2, bound: 2 })
        ));
    }

    #[test]
    fn test_of_csr_round_trip() {
        // [1, 0, 2]
        // [0, 0, 3]   <- (1, 1) is an explicitly stored zero
        // [4, 5, 0]
        let s = CsrStorage::of_csr(
            3,
            3,
            vec![0, 2, 4, 6],
            vec![0, 2, 1, 2, 0, 1],
            vec![1.0, 2.0, 0.0, 3.0, 4.0, 5.0],
        )
        .unwrap();
        assert_eq!(s.at(0, 0), 1.0);
        assert_eq!(s.at(0, 2), 2.0);
        assert_eq!(s.at(1, 2), 3.0);
        assert_eq!(s.at(2, 0), 4.0);
        assert_eq!(s.at(2, 1), 5.0);
        assert_eq!(s.at(1, 1), 0.0);
        // The explicit zero survives as a stored entry.
        assert_eq!(s.nonzero_count(), 6);
    }

    #[test]
    fn test_of_csr_invalid_pointers() {
        let result = CsrStorage::of_csr(2, 2, vec![0, 2], vec![0, 1], vec![1.0f64, 2.0]);
        assert!(matches!(result, Err(Error::InvalidSparseLayout { .. })));

        let result = CsrStorage::of_csr(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0f64, 2.0]);
        assert!(matches!(result, Err(Error::InvalidSparseLayout { .. })));
    }

    #[test]
    fn test_of_csr_unsorted_columns_normalized() {
        let s = CsrStorage::of_csr(1, 4, vec![0, 3], vec![2, 0, 3], vec![2.0, 1.0, 3.0]).unwrap();
        assert_eq!(s.column_indices(), &[0, 2, 3]);
        assert_eq!(s.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_of_csc_transposes_layout() {
        // Column-compressed form of:
        // [1, 0]   <- (0, 1) is an explicitly stored zero
        // [5, 1]
        let s = CsrStorage::of_csc(
            2,
            2,
            vec![0, 2, 4],
            vec![0, 1, 0, 1],
            vec![1.0, 5.0, 0.0, 1.0],
        )
        .unwrap();
        assert_eq!(s.at(0, 0), 1.0);
        assert_eq!(s.at(1, 0), 5.0);
        assert_eq!(s.at(1, 1), 1.0);
        assert_eq!(s.at(0, 1), 0.0);
        assert_eq!(s.row_pointers(), &[0, 2, 4]);
        // The explicit zero survives the transpose into row layout.
        assert_eq!(s.nonzero_count(), 4);
    }

    #[test]
    fn test_set_insert_overwrite_remove() {
        let mut s: CsrStorage<f64> = CsrStorage::zeros(2, 3).unwrap();
        s.set(0, 1, 2.0);
        s.set(1, 2, 3.0);
        assert_eq!(s.nonzero_count(), 2);
        assert_eq!(s.at(0, 1), 2.0);

        s.set(0, 1, 7.0);
        assert_eq!(s.at(0, 1), 7.0);
        assert_eq!(s.nonzero_count(), 2);

        s.set(0, 1, 0.0);
        assert_eq!(s.nonzero_count(), 1);
        assert_eq!(s.at(0, 1), 0.0);
        assert_eq!(s.at(1, 2), 3.0);
    }

    #[test]
    fn test_add_at_accumulates() {
        let mut s: CsrStorage<f64> = CsrStorage::zeros(2, 2).unwrap();
        s.add_at(0, 0, 1.0);
        s.add_at(0, 0, 2.0);
        assert_eq!(s.at(0, 0), 3.0);
        s.add_at(0, 0, -3.0);
        assert_eq!(s.nonzero_count(), 0);
    }

    #[test]
    fn test_normalize_sorts_and_merges() {
        let mut s = CsrStorage::from_parts(
            2,
            3,
            vec![0, 3, 4],
            vec![2, 0, 2, 1],
            vec![1.0, 5.0, 2.0, 4.0],
        );
        s.normalize();
        assert_eq!(s.row_pointers(), &[0, 2, 3]);
        assert_eq!(s.column_indices(), &[0, 2, 1]);
        assert_eq!(s.values(), &[5.0, 3.0, 4.0]);
    }

    #[test]
    fn test_iter_row_order() {
        let s = CsrStorage::of_coo(2, 2, &[(1, 0, 3.0), (0, 1, 2.0)]).unwrap();
        let entries: Vec<(usize, usize, f64)> = s.iter().collect();
        assert_eq!(entries, vec![(0, 1, 2.0), (1, 0, 3.0)]);
    }

    #[test]
    fn test_transpose() {
        // [1, 0, 2]
        // [0, 3, 0]
        let s = CsrStorage::of_coo(2, 3, &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)]).unwrap();
        let t = s.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.at(0, 0), 1.0);
        assert_eq!(t.at(2, 0), 2.0);
        assert_eq!(t.at(1, 1), 3.0);
        assert_eq!(t.nonzero_count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut s = CsrStorage::of_coo(2, 2, &[(0, 0, 1.0)]).unwrap();
        s.clear();
        assert_eq!(s.nonzero_count(), 0);
        assert_eq!(s.at(0, 0), 0.0);
        assert_eq!(s.row_pointers(), &[0, 0, 0]);
    }
}
