use crate::utils::ZeroOut;

use rand::Rng;

/// Lower bound of the initial weight interval.
const INIT_LOW: f64 = -0.02;
/// Width of the initial weight interval.
const INIT_WIDTH: f64 = 0.05;

/// Draws a single small initial weight from `[-0.02, 0.03)`.
pub fn random_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>() * INIT_WIDTH + INIT_LOW
}

/// A vector of `len` small random weights.
pub fn randos<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f64> {
    (0..len).map(|_| random_weight(rng)).collect()
}

/// A dense matrix with one row per neuron and one column per incoming
/// connection.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Fills a matrix row by row with small random weights.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: randos(rng, rows * cols),
        }
    }

    /// Builds a matrix from explicit rows, which must all be `cols` long.
    pub fn from_rows(rows: Vec<Vec<f64>>, cols: usize) -> Option<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * cols);
        for row in rows {
            if row.len() != cols {
                return None;
            }
            data.extend(row);
        }
        Some(Mat {
            rows: n,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }
}

impl ZeroOut for Mat {
    fn zero_out(&mut self) {
        self.data.zero_out();
    }
}
