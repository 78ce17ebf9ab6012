//! Matrix literals, their elementary operations, and deferred matrix operations.

use std::fmt;

use serde::Serialize;

use crate::{fold, Expr, Shape};

/// A row-major matrix literal. Rows always have equal length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Matrix {
    rows: Vec<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    Ragged,
    RowOutOfRange { index: usize, rows: usize },
    ColOutOfRange { index: usize, cols: usize },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::Ragged => write!(f, "Matrix rows must all have the same length"),
            MatrixError::RowOutOfRange { index, rows } => {
                write!(f, "Row index {} out of range for a matrix with {} rows", index + 1, rows)
            }
            MatrixError::ColOutOfRange { index, cols } => {
                write!(f, "Column index {} out of range for a matrix with {} columns", index + 1, cols)
            }
        }
    }
}

impl std::error::Error for MatrixError {}

impl Matrix {
    pub fn new(rows: Vec<Vec<Expr>>) -> Result<Matrix, MatrixError> {
        if let Some(first) = rows.first() {
            if rows.iter().any(|r| r.len() != first.len()) {
                return Err(MatrixError::Ragged);
            }
        }
        Ok(Matrix { rows })
    }

    pub fn filled(rows: usize, cols: usize, value: Expr) -> Matrix {
        Matrix {
            rows: vec![vec![value; cols]; rows],
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| Expr::integer(i64::from(i == j)))
                    .collect()
            })
            .collect();
        Matrix { rows }
    }

    /// Block-diagonal matrix; scalar entries are 1x1 blocks.
    pub fn diag(blocks: &[Expr]) -> Option<Matrix> {
        let blocks: Vec<Matrix> = blocks
            .iter()
            .map(|b| match b {
                Expr::Matrix(m) => Some(m.clone()),
                other if other.shape() == Shape::Scalar => Some(Matrix {
                    rows: vec![vec![other.clone()]],
                }),
                _ => None,
            })
            .collect::<Option<_>>()?;

        let total_rows: usize = blocks.iter().map(|b| b.dims().0).sum();
        let total_cols: usize = blocks.iter().map(|b| b.dims().1).sum();
        let mut out = Matrix::filled(total_rows, total_cols, Expr::integer(0));
        let (mut r0, mut c0) = (0, 0);
        for block in &blocks {
            for (i, row) in block.rows.iter().enumerate() {
                for (j, v) in row.iter().enumerate() {
                    out.rows[r0 + i][c0 + j] = v.clone();
                }
            }
            let (r, c) = block.dims();
            r0 += r;
            c0 += c;
        }
        Some(out)
    }

    /// Side-by-side concatenation of literals with equal row counts.
    pub fn hstack(parts: &[Matrix]) -> Option<Matrix> {
        let first = parts.first()?;
        let height = first.dims().0;
        if parts.iter().any(|p| p.dims().0 != height) {
            return None;
        }
        let rows = (0..height)
            .map(|i| parts.iter().flat_map(|p| p.rows[i].iter().cloned()).collect())
            .collect();
        Some(Matrix { rows })
    }

    /// Top-to-bottom concatenation of literals with equal column counts.
    pub fn vstack(parts: &[Matrix]) -> Option<Matrix> {
        let first = parts.first()?;
        let width = first.dims().1;
        if parts.iter().any(|p| p.dims().1 != width) {
            return None;
        }
        let rows = parts.iter().flat_map(|p| p.rows.iter().cloned()).collect();
        Some(Matrix { rows })
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    pub fn rows(&self) -> &[Vec<Expr>] {
        &self.rows
    }

    pub fn columns(&self) -> Vec<Matrix> {
        let (_, cols) = self.dims();
        (0..cols)
            .map(|j| Matrix {
                rows: self.rows.iter().map(|r| vec![r[j].clone()]).collect(),
            })
            .collect()
    }

    pub fn transpose(&self) -> Matrix {
        let (rows, cols) = self.dims();
        Matrix {
            rows: (0..cols)
                .map(|j| (0..rows).map(|i| self.rows[i][j].clone()).collect())
                .collect(),
        }
    }

    pub fn map(&self, f: impl Fn(&Expr) -> Expr) -> Matrix {
        Matrix {
            rows: self.rows.iter().map(|r| r.iter().map(&f).collect()).collect(),
        }
    }

    fn check_row(&self, index: usize) -> Result<(), MatrixError> {
        let rows = self.dims().0;
        if index < rows {
            Ok(())
        } else {
            Err(MatrixError::RowOutOfRange { index, rows })
        }
    }

    fn check_col(&self, index: usize) -> Result<(), MatrixError> {
        let cols = self.dims().1;
        if index < cols {
            Ok(())
        } else {
            Err(MatrixError::ColOutOfRange { index, cols })
        }
    }

    /// `r_i <- k * r_i` (0-based).
    pub fn scale_row(&mut self, i: usize, k: &Expr) -> Result<(), MatrixError> {
        self.check_row(i)?;
        for v in &mut self.rows[i] {
            *v = fold::times(k, v);
        }
        Ok(())
    }

    /// `c_j <- k * c_j` (0-based).
    pub fn scale_col(&mut self, j: usize, k: &Expr) -> Result<(), MatrixError> {
        self.check_col(j)?;
        for row in &mut self.rows {
            row[j] = fold::times(k, &row[j]);
        }
        Ok(())
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<(), MatrixError> {
        self.check_row(i)?;
        self.check_row(j)?;
        self.rows.swap(i, j);
        Ok(())
    }

    pub fn swap_cols(&mut self, i: usize, j: usize) -> Result<(), MatrixError> {
        self.check_col(i)?;
        self.check_col(j)?;
        for row in &mut self.rows {
            row.swap(i, j);
        }
        Ok(())
    }

    /// `r_target <- r_target + k * r_source` (0-based).
    pub fn add_row_multiple(&mut self, target: usize, source: usize, k: &Expr) -> Result<(), MatrixError> {
        self.check_row(target)?;
        self.check_row(source)?;
        let src = self.rows[source].clone();
        for (v, s) in self.rows[target].iter_mut().zip(src.iter()) {
            *v = fold::plus(v, &fold::times(k, s));
        }
        Ok(())
    }

    /// `c_target <- c_target + k * c_source` (0-based).
    pub fn add_col_multiple(&mut self, target: usize, source: usize, k: &Expr) -> Result<(), MatrixError> {
        self.check_col(target)?;
        self.check_col(source)?;
        for row in &mut self.rows {
            let s = fold::times(k, &row[source]);
            row[target] = fold::plus(&row[target], &s);
        }
        Ok(())
    }
}

/// Matrix operations the algebra engine performs later; kept as a tag plus
/// arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatrixOp {
    Transpose,
    Det,
    Trace,
    Rank,
    Rref,
    Nullspace,
    Norm,
    Diagonalize,
    Eigenvals,
    Eigenvects,
    Svd,
    Rows,
    Cols,
    GramSchmidt,
    Identity,
    Zeros,
    Ones,
    Diag,
    HStack,
    VStack,
}

impl MatrixOp {
    pub fn name(self) -> &'static str {
        match self {
            MatrixOp::Transpose => "transpose",
            MatrixOp::Det => "det",
            MatrixOp::Trace => "trace",
            MatrixOp::Rank => "rank",
            MatrixOp::Rref => "rref",
            MatrixOp::Nullspace => "nullspace",
            MatrixOp::Norm => "norm",
            MatrixOp::Diagonalize => "diagonalize",
            MatrixOp::Eigenvals => "eigenvals",
            MatrixOp::Eigenvects => "eigenvects",
            MatrixOp::Svd => "singular_value_decomposition",
            MatrixOp::Rows => "rows",
            MatrixOp::Cols => "cols",
            MatrixOp::GramSchmidt => "GramSchmidt",
            MatrixOp::Identity => "eye",
            MatrixOp::Zeros => "zeros",
            MatrixOp::Ones => "ones",
            MatrixOp::Diag => "diag",
            MatrixOp::HStack => "hstack",
            MatrixOp::VStack => "vstack",
        }
    }

    pub fn result_shape(self) -> Shape {
        match self {
            MatrixOp::Transpose
            | MatrixOp::Rref
            | MatrixOp::Identity
            | MatrixOp::Zeros
            | MatrixOp::Ones
            | MatrixOp::Diag
            | MatrixOp::HStack
            | MatrixOp::VStack => Shape::Matrix,
            _ => Shape::Scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int_matrix(rows: &[&[i64]]) -> Matrix {
        Matrix::new(
            rows.iter()
                .map(|r| r.iter().map(|v| Expr::integer(*v)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![Expr::integer(1), Expr::integer(2)], vec![Expr::integer(3)]];
        assert_eq!(Matrix::new(rows), Err(MatrixError::Ragged));
    }

    #[test]
    fn test_row_operations_fold_numbers() {
        let mut m = int_matrix(&[&[1, 2], &[3, 4]]);
        m.scale_row(0, &Expr::integer(2)).unwrap();
        assert_eq!(m, int_matrix(&[&[2, 4], &[3, 4]]));
        m.add_row_multiple(1, 0, &Expr::integer(-1)).unwrap();
        assert_eq!(m, int_matrix(&[&[2, 4], &[1, 0]]));
        m.swap_rows(0, 1).unwrap();
        assert_eq!(m, int_matrix(&[&[1, 0], &[2, 4]]));
    }

    #[test]
    fn test_column_operations() {
        let mut m = int_matrix(&[&[1, 2], &[3, 4]]);
        m.swap_cols(0, 1).unwrap();
        assert_eq!(m, int_matrix(&[&[2, 1], &[4, 3]]));
        m.scale_col(1, &Expr::integer(3)).unwrap();
        assert_eq!(m, int_matrix(&[&[2, 3], &[4, 9]]));
    }

    #[test]
    fn test_out_of_range_index() {
        let mut m = int_matrix(&[&[1, 2]]);
        assert_eq!(
            m.swap_rows(0, 1),
            Err(MatrixError::RowOutOfRange { index: 1, rows: 1 })
        );
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Matrix::identity(2), int_matrix(&[&[1, 0], &[0, 1]]));
        let d = Matrix::diag(&[Expr::integer(1), Expr::integer(2)]).unwrap();
        assert_eq!(d, int_matrix(&[&[1, 0], &[0, 2]]));
        let h = Matrix::hstack(&[int_matrix(&[&[1], &[2]]), int_matrix(&[&[3], &[4]])]).unwrap();
        assert_eq!(h, int_matrix(&[&[1, 3], &[2, 4]]));
        assert_eq!(int_matrix(&[&[1, 2], &[3, 4]]).transpose(), int_matrix(&[&[1, 3], &[2, 4]]));
    }
}
