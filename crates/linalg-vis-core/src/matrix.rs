//! The 2x2 board matrix and its derived quantities.
//!
//! Convention: the matrix acts on column vectors (`p' = M * p`), so the
//! columns of `M` are the images of the standard basis vectors. The base
//! vector indicators on the board therefore show the matrix columns.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tolerance for treating two eigenvalues as equal.
const EIGEN_EPSILON: f64 = 1e-12;

/// Matrix validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Expected a 2x2 matrix, got row lengths {0:?}")]
    Dimension(Vec<usize>),
    #[error("Matrix entry ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
}

/// A 2x2 real matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2 {
    rows: [[f64; 2]; 2],
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2 {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a matrix `[[a, b], [c, d]]`.
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            rows: [[a, b], [c, d]],
        }
    }

    /// Create a matrix whose columns are the images of `(1, 0)` and `(0, 1)`.
    pub fn from_columns(i: Vec2, j: Vec2) -> Self {
        Self::new(i.x, j.x, i.y, j.y)
    }

    /// Build a matrix from untyped rows, checking the 2x2 shape.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        if rows.len() != 2 || rows.iter().any(|row| row.len() != 2) {
            return Err(MatrixError::Dimension(rows.iter().map(Vec::len).collect()));
        }
        let matrix = Self::new(rows[0][0], rows[0][1], rows[1][0], rows[1][1]);
        matrix.validate()?;
        Ok(matrix)
    }

    /// Reject matrices containing NaN or infinite entries.
    pub fn validate(&self) -> Result<(), MatrixError> {
        for (row, values) in self.rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(MatrixError::NonFinite { row, col });
                }
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> [[f64; 2]; 2] {
        self.rows
    }

    /// Entry at `(row, col)`, or `None` outside the 2x2 range.
    pub fn element_at(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Images of the standard basis vectors.
    pub fn columns(&self) -> (Vec2, Vec2) {
        let [[a, b], [c, d]] = self.rows;
        (Vec2::new(a, c), Vec2::new(b, d))
    }

    pub fn determinant(&self) -> f64 {
        let [[a, b], [c, d]] = self.rows;
        a * d - b * c
    }

    pub fn trace(&self) -> f64 {
        self.rows[0][0] + self.rows[1][1]
    }

    /// Rank derived from the determinant: 2 if invertible, 0 for the zero
    /// matrix, 1 otherwise.
    pub fn rank(&self) -> u8 {
        if self.determinant() != 0.0 {
            2
        } else if self.rows.iter().flatten().all(|&v| v == 0.0) {
            0
        } else {
            1
        }
    }

    /// The equivalent kurbo transform (no translation).
    pub fn to_affine(&self) -> Affine {
        let [[a, b], [c, d]] = self.rows;
        Affine::new([a, c, b, d, 0.0, 0.0])
    }

    /// Apply the matrix to a point treated as a column vector.
    pub fn apply(&self, point: Point) -> Point {
        self.to_affine() * point
    }

    /// Eigenvalues and (real) eigenvectors, for display.
    pub fn eigen_decomposition(&self) -> EigenDecomposition {
        let half_trace = self.trace() / 2.0;
        let discriminant = half_trace * half_trace - self.determinant();
        if discriminant < 0.0 {
            return EigenDecomposition {
                values: Eigenvalues::Complex {
                    re: half_trace,
                    im: (-discriminant).sqrt(),
                },
                vectors: Vec::new(),
            };
        }

        let root = discriminant.sqrt();
        let (l1, l2) = (half_trace + root, half_trace - root);
        let vectors = if (l1 - l2).abs() < EIGEN_EPSILON {
            self.eigenvectors_for(l1)
        } else {
            let mut vectors = self.eigenvectors_for(l1);
            vectors.extend(self.eigenvectors_for(l2));
            vectors
        };
        EigenDecomposition {
            values: Eigenvalues::Real(l1, l2),
            vectors,
        }
    }

    /// Unit eigenvectors for a real eigenvalue.
    fn eigenvectors_for(&self, lambda: f64) -> Vec<Vec2> {
        let [[a, b], [c, d]] = self.rows;
        let raw = if b.abs() > EIGEN_EPSILON {
            vec![Vec2::new(b, lambda - a)]
        } else if c.abs() > EIGEN_EPSILON {
            vec![Vec2::new(lambda - d, c)]
        } else if (a - d).abs() < EIGEN_EPSILON {
            // Scalar matrix: every direction is an eigenvector.
            vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]
        } else if (lambda - a).abs() < (lambda - d).abs() {
            vec![Vec2::new(1.0, 0.0)]
        } else {
            vec![Vec2::new(0.0, 1.0)]
        };
        raw.into_iter()
            .filter(|v| v.hypot() > EIGEN_EPSILON)
            .map(Vec2::normalize)
            .collect()
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[a, b], [c, d]] = self.rows;
        write!(f, "[[{a}, {b}], [{c}, {d}]]")
    }
}

/// Eigenvalues of a real 2x2 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Eigenvalues {
    /// Two real eigenvalues, larger first.
    Real(f64, f64),
    /// A complex conjugate pair `re ± im·i`.
    Complex { re: f64, im: f64 },
}

impl fmt::Display for Eigenvalues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eigenvalues::Real(l1, l2) => write!(f, "{l1}, {l2}"),
            Eigenvalues::Complex { re, im } => write!(f, "{re} ± {im}i"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenDecomposition {
    pub values: Eigenvalues,
    /// Unit eigenvectors; empty for complex eigenvalues, one entry for a
    /// defective matrix.
    pub vectors: Vec<Vec2>,
}
