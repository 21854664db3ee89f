//! In-memory matrix built from one uploaded CSV file.
//!
//! Cells stay as the original text tokens. Only [`Matrix::sum`] and [`Matrix::product`] read
//! them as numbers, so a matrix holding non-numeric cells can still be rendered, transposed and
//! flattened.

use crate::error::{MatrixError, MatrixResult};

/// A grid of textual cells in row-major order.
///
/// Rectangularity is not enforced here; see [`Matrix::transpose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<String>>,
}

impl Matrix {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the first row, 0 for an empty matrix.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV text: cells joined by `,`, every row (the last included) ending in `\n`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    /// Swap rows and columns.
    ///
    /// The column count is taken from the first row. A later row shorter than that is reported
    /// as [`MatrixError::RaggedRow`]; extra cells in longer rows are ignored.
    pub fn transpose(&self) -> MatrixResult<Matrix> {
        let columns = self.column_count();

        if let Some((row, found)) = self
            .rows
            .iter()
            .enumerate()
            .find_map(|(i, r)| (r.len() < columns).then_some((i, r.len())))
        {
            return Err(MatrixError::RaggedRow {
                row,
                expected: columns,
                found,
            });
        }

        let rows = (0..columns)
            .map(|i| self.rows.iter().map(|r| r[i].clone()).collect())
            .collect();

        Ok(Matrix { rows })
    }

    /// Every cell in row-major order joined by `,`, with no trailing newline.
    pub fn flatten(&self) -> String {
        self.cells().collect::<Vec<_>>().join(",")
    }

    /// Sum of all cells. Stops at the first cell that is not an integer.
    pub fn sum(&self) -> MatrixResult<i64> {
        self.fold_numbers(0, i64::checked_add)
    }

    /// Product of all cells, 1 for an empty matrix. Stops at the first cell that is not an
    /// integer.
    pub fn product(&self) -> MatrixResult<i64> {
        self.fold_numbers(1, i64::checked_mul)
    }

    fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    fn fold_numbers(&self, init: i64, op: fn(i64, i64) -> Option<i64>) -> MatrixResult<i64> {
        self.cells().try_fold(init, |acc, cell| {
            let number = parse_cell(cell)?;
            op(acc, number).ok_or(MatrixError::Overflow)
        })
    }
}

impl From<Vec<Vec<String>>> for Matrix {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Parse one cell as a base-10 signed integer.
pub fn parse_cell(cell: &str) -> MatrixResult<i64> {
    cell.parse::<i64>()
        .map_err(|source| MatrixError::NonNumericCell {
            value: cell.to_string(),
            source,
        })
}
