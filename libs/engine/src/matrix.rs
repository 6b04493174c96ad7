//! Rectangular matrices over scalar values
//!
//! Cells are scalar [`Value`]s (rationals or complexes); the constructor
//! rejects anything else, so matrix arithmetic can lean on the scalar value
//! algebra for every cell operation. Storage is a flat row-major `Vec` with
//! explicit dimensions, and every operation preserves rectangularity.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::error::{Error, Result};
use crate::value::Value;

/// A rows × cols matrix of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<Value>,
}

impl Matrix {
    /// Build from nested rows, validating shape and cell types.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Error::Shape("a matrix needs at least one cell".into()));
        }
        let cols = rows[0].len();
        if rows.iter().any(|row| row.len() != cols) {
            return Err(Error::Shape(
                "matrix rows must all have the same length".into(),
            ));
        }
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            for cell in row {
                if !cell.is_scalar() {
                    return Err(Error::Type(format!(
                        "matrix cells must be scalars, found a {}",
                        cell.type_name()
                    )));
                }
                cells.push(cell.clone());
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// The n × n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut cells = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                cells.push(if r == c {
                    Value::from_integer(1)
                } else {
                    Value::from_integer(0)
                });
            }
        }
        Self {
            rows: n,
            cols: n,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn get(&self, r: usize, c: usize) -> &Value {
        &self.cells[r * self.cols + c]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter()
    }

    fn same_shape(&self, other: &Self, op: &str) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Error::Shape(format!(
                "cannot {} a {}x{} matrix and a {}x{} matrix",
                op, self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(())
    }

    fn map_cells(&self, f: impl Fn(&Value) -> Result<Value>) -> Result<Self> {
        let cells = self.cells.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.same_shape(other, "add")?;
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.same_shape(other, "subtract")?;
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| a.sub(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    pub fn neg(&self) -> Result<Self> {
        self.map_cells(|cell| cell.neg())
    }

    /// Matrix product; the inner dimensions must match.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(Error::Shape(format!(
                "cannot multiply a {}x{} matrix by a {}x{} matrix",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut cells = Vec::with_capacity(self.rows * other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let mut acc = Value::from_integer(0);
                for k in 0..self.cols {
                    acc = acc.add(&self.get(r, k).mul(other.get(k, c))?)?;
                }
                cells.push(acc);
            }
        }
        Ok(Self {
            rows: self.rows,
            cols: other.cols,
            cells,
        })
    }

    /// Cell-wise multiplication by a scalar value.
    pub fn scale(&self, scalar: &Value) -> Result<Self> {
        self.map_cells(|cell| cell.mul(scalar))
    }

    /// Cell-wise division by a nonzero scalar value.
    pub fn div_scalar(&self, scalar: &Value) -> Result<Self> {
        if scalar.is_zero() {
            return Err(Error::Domain("division by zero".into()));
        }
        self.map_cells(|cell| cell.div(scalar))
    }

    /// Integer power of a square matrix. `M^0` is the identity; negative
    /// exponents invert first.
    pub fn pow(&self, exp: &BigInt) -> Result<Self> {
        if !self.is_square() {
            return Err(Error::Shape(format!(
                "matrix power requires a square matrix, got {}x{}",
                self.rows, self.cols
            )));
        }
        if exp.is_negative() {
            return self.inverse()?.pow(&-exp);
        }
        let e = exp
            .to_u32()
            .ok_or_else(|| Error::Domain("exponent is too large".into()))?;
        let mut acc = Matrix::identity(self.rows);
        for _ in 0..e {
            acc = acc.mul(self)?;
        }
        Ok(acc)
    }

    /// Exact inverse via Gauss-Jordan elimination on `[M | I]`.
    ///
    /// The pivot for each column is the first nonzero entry at or below the
    /// diagonal; a column without one means the matrix is singular. Cell
    /// divisions use the cell field, so rational matrices invert exactly.
    pub fn inverse(&self) -> Result<Self> {
        if !self.is_square() {
            return Err(Error::Shape(format!(
                "only square matrices can be inverted, got {}x{}",
                self.rows, self.cols
            )));
        }
        let n = self.rows;
        let width = 2 * n;
        let mut work: Vec<Vec<Value>> = (0..n)
            .map(|r| {
                (0..width)
                    .map(|c| {
                        if c < n {
                            self.get(r, c).clone()
                        } else if c - n == r {
                            Value::from_integer(1)
                        } else {
                            Value::from_integer(0)
                        }
                    })
                    .collect()
            })
            .collect();

        for col in 0..n {
            let pivot_row = (col..n)
                .find(|&r| !work[r][col].is_zero())
                .ok_or_else(|| Error::Domain("singular matrix".into()))?;
            work.swap(col, pivot_row);

            let pivot = work[col][col].clone();
            for c in 0..width {
                work[col][c] = work[col][c].div(&pivot)?;
            }

            for r in 0..n {
                if r == col || work[r][col].is_zero() {
                    continue;
                }
                let factor = work[r][col].clone();
                for c in 0..width {
                    let scaled = work[col][c].mul(&factor)?;
                    work[r][c] = work[r][c].sub(&scaled)?;
                }
            }
        }

        let cells = work
            .into_iter()
            .flat_map(|row| row.into_iter().skip(n))
            .collect();
        Ok(Self {
            rows: n,
            cols: n,
            cells,
        })
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for r in 0..self.rows {
            if r > 0 {
                write!(f, " ; ")?;
            }
            write!(f, "[ ")?;
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, " , ")?;
                }
                write!(f, "{}", self.get(r, c))?;
            }
            write!(f, " ]")?;
        }
        write!(f, " ]")
    }
}
