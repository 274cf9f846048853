//! Case operand values.

use crate::common::{Error, Result};
use crate::format::FloatFormat;
use crate::interval::Shape;

/// Column-major matrix of `f64` carriers (WGSL `matCxR`).
///
/// `cols` columns of `rows` components each; element (`c`, `r`) is stored at
/// `c * rows + r`. The shape is fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    cols: usize,
    rows: usize,
    elements: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from its columns.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedShape`] when there are no columns, a column is empty,
    /// or the columns differ in length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        if let Some(ragged) = columns.iter().find(|column| column.len() != rows) {
            return Err(Error::MalformedShape(format!(
                "column of {} components in a matrix with {rows} rows",
                ragged.len()
            )));
        }
        Self::from_column_major(cols, rows, columns.into_iter().flatten().collect())
    }

    /// Builds a `cols`×`rows` matrix from column-major elements.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedShape`] for a zero dimension or a wrong element count.
    pub fn from_column_major(cols: usize, rows: usize, elements: Vec<f64>) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::MalformedShape(format!("mat{cols}x{rows}")));
        }
        if elements.len() != cols * rows {
            return Err(Error::MalformedShape(format!(
                "mat{cols}x{rows} needs {} elements, got {}",
                cols * rows,
                elements.len()
            )));
        }
        Ok(Self {
            cols,
            rows,
            elements,
        })
    }

    /// Column count.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row count.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Shape descriptor.
    pub const fn shape(&self) -> Shape {
        Shape::Matrix {
            cols: self.cols,
            rows: self.rows,
        }
    }

    /// Element at (`col`, `row`).
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col < self.cols && row < self.rows {
            self.elements.get(col * self.rows + row).copied()
        } else {
            None
        }
    }

    /// Components of column `col`; empty when out of range.
    pub fn column(&self, col: usize) -> &[f64] {
        let start = (col * self.rows).min(self.elements.len());
        let end = (start + self.rows).min(self.elements.len());
        &self.elements[start..end]
    }

    /// Components of row `row`, one per column.
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.cols).filter_map(|col| self.get(col, row)).collect()
    }

    /// Column-major elements.
    pub fn elements(&self) -> &[f64] {
        &self.elements
    }

    /// Matrix of the same shape with `f` applied to every element.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            cols: self.cols,
            rows: self.rows,
            elements: self.elements.iter().map(|&element| f(element)).collect(),
        }
    }
}

/// One operand of a case.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A scalar.
    Scalar(f64),
    /// A vector.
    Vector(Vec<f64>),
    /// A matrix.
    Matrix(Matrix),
}

impl Value {
    /// Shape descriptor.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Scalar(_) => Shape::Scalar,
            Self::Vector(components) => Shape::Vector(components.len()),
            Self::Matrix(matrix) => matrix.shape(),
        }
    }

    /// Every component, in storage order.
    pub fn components(&self) -> &[f64] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Vector(components) => components,
            Self::Matrix(matrix) => matrix.elements(),
        }
    }

    /// Whether every component is a finite value of `format`.
    pub fn is_finite(&self, format: &FloatFormat) -> bool {
        self.components()
            .iter()
            .all(|&value| value.is_finite() && value.abs() <= format.max_finite())
    }
}
