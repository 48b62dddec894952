//! Rectangular numeric tables.
use std::fmt;

use thiserror::Error;

/// Errors while assembling a [`Table`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("row {} has {} columns while previous rows have {} columns", row, len, expected)]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// A rectangular table of numbers stored row-major.
///
/// This is the form in which a caller hands the unary, pairwise, coefficient and clique
/// assignment data to the inference. A table with zero rows is considered empty regardless of its
/// column count.
#[derive(Clone, Default, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Table {
        Table::default()
    }

    /// Create a table of the given shape filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Table {
        Table {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a table from an iterator of rows.
    ///
    /// All rows need to have the same length.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Table, TableError>
    where
        R: AsRef<[f64]>,
    {
        let mut table = Table::new();
        for row in rows {
            table.push_row(row.as_ref())?;
        }
        Ok(table)
    }

    /// Appends a row.
    ///
    /// The first row pushed to an empty table determines the column count.
    pub fn push_row(&mut self, row: &[f64]) -> Result<(), TableError> {
        if self.rows == 0 {
            self.cols = row.len();
        } else if row.len() != self.cols {
            return Err(TableError::RaggedRow {
                row: self.rows,
                len: row.len(),
                expected: self.cols,
            });
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The entry at the given 0-based position.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    /// Mutable access to the entry at the given 0-based position.
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }

    /// A single row.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterator over all rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |row| self.row(row))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)?;
        f.debug_list().entries(self.iter_rows()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows() {
        let table = Table::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.get(1, 0), 3.0);
        assert_eq!(table.row(2), &[5.0, 6.0]);
        assert_eq!(table.iter_rows().count(), 3);
    }

    #[test]
    fn ragged_rows() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        match Table::from_rows(&rows) {
            Err(TableError::RaggedRow {
                row: 1,
                len: 1,
                expected: 2,
            }) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn zero_columns() {
        let rows: Vec<Vec<f64>> = vec![vec![], vec![], vec![]];
        let table = Table::from_rows(&rows).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 0);
        assert_eq!(table.iter_rows().count(), 3);
        assert!(table.iter_rows().all(|row| row.is_empty()));
    }
}
