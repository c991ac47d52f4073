//! Dense matrix support for the regression normal equations.
//!
//! A minimal row-major `f64` matrix: just the operations OLS needs
//! (transpose, products, Cholesky solve, SPD inverse). Not a general
//! linear-algebra layer.

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from row-major data.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "matrix data length mismatch");
        Self { rows, cols, data }
    }

    /// Zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        self.data[i * self.cols + j] = v;
    }

    /// Transpose.
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    /// Matrix product `self × other`.
    ///
    /// # Panics
    /// Panics if inner dimensions do not match.
    pub fn mul_mat(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.cols, other.rows, "inner dimension mismatch");
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    let v = out.get(i, j) + a * other.get(k, j);
                    out.set(i, j, v);
                }
            }
        }
        out
    }

    /// Matrix-vector product `self × v`.
    ///
    /// # Panics
    /// Panics if `v.len() != self.cols()`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "vector length mismatch");
        let mut out = vec![0.0; self.rows];
        for i in 0..self.rows {
            let mut sum = 0.0;
            for j in 0..self.cols {
                sum += self.get(i, j) * v[j];
            }
            out[i] = sum;
        }
        out
    }

    /// Cholesky factor L of a symmetric positive-definite matrix
    /// (`self = L·Lᵀ`, L lower-triangular).
    ///
    /// # Returns
    /// - `None` when the matrix is not square or not positive definite
    ///   within tolerance; this is the singularity signal for the
    ///   normal equations.
    pub fn cholesky(&self) -> Option<Matrix> {
        if self.rows != self.cols {
            return None;
        }
        let n = self.rows;
        let mut l = Matrix::zeros(n, n);

        // Scale-relative tolerance on the pivots.
        let scale = (0..n)
            .map(|i| self.get(i, i).abs())
            .fold(0.0_f64, f64::max)
            .max(1.0);
        let tol = 1e-10 * scale;

        for j in 0..n {
            let mut d = self.get(j, j);
            for k in 0..j {
                d -= l.get(j, k) * l.get(j, k);
            }
            if d <= tol {
                return None;
            }
            let diag = d.sqrt();
            l.set(j, j, diag);
            for i in (j + 1)..n {
                let mut v = self.get(i, j);
                for k in 0..j {
                    v -= l.get(i, k) * l.get(j, k);
                }
                l.set(i, j, v / diag);
            }
        }
        Some(l)
    }

    /// Solves `self · x = b` for SPD `self` via Cholesky.
    ///
    /// # Returns
    /// - `None` when the matrix is singular within tolerance.
    pub fn cholesky_solve(&self, b: &[f64]) -> Option<Vec<f64>> {
        let l = self.cholesky()?;
        let n = self.rows;
        if b.len() != n {
            return None;
        }

        // Forward: L·y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= l.get(i, k) * y[k];
            }
            y[i] = sum / l.get(i, i);
        }
        // Back: Lᵀ·x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for k in (i + 1)..n {
                sum -= l.get(k, i) * x[k];
            }
            x[i] = sum / l.get(i, i);
        }
        Some(x)
    }

    /// Inverse of an SPD matrix via Cholesky column solves.
    ///
    /// # Returns
    /// - `None` when the matrix is singular within tolerance.
    pub fn spd_inverse(&self) -> Option<Matrix> {
        let n = self.rows;
        let mut inv = Matrix::zeros(n, n);
        for j in 0..n {
            let mut e = vec![0.0; n];
            e[j] = 1.0;
            let col = self.cholesky_solve(&e)?;
            for i in 0..n {
                inv.set(i, j, col[i]);
            }
        }
        Some(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_and_get() {
        let m = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.get(2, 1), 6.0);
    }

    #[test]
    fn mul_mat_identity() {
        let m = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let id = Matrix::new(2, 2, vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.mul_mat(&id), m);
    }

    #[test]
    fn mul_vec_basic() {
        let m = Matrix::new(2, 3, vec![1.0, 0.0, 2.0, 0.0, 1.0, 1.0]);
        assert_eq!(m.mul_vec(&[1.0, 2.0, 3.0]), vec![7.0, 5.0]);
    }

    #[test]
    fn cholesky_solve_known_system() {
        // [[4, 2], [2, 3]] x = [10, 8] → x = [1.75, 1.5]
        let a = Matrix::new(2, 2, vec![4.0, 2.0, 2.0, 3.0]);
        let x = a.cholesky_solve(&[10.0, 8.0]).unwrap();
        assert!((x[0] - 1.75).abs() < 1e-12);
        assert!((x[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn cholesky_rejects_singular() {
        // Second column is 2× the first.
        let a = Matrix::new(2, 2, vec![1.0, 2.0, 2.0, 4.0]);
        assert!(a.cholesky().is_none());
        assert!(a.cholesky_solve(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn spd_inverse_roundtrip() {
        let a = Matrix::new(2, 2, vec![4.0, 2.0, 2.0, 3.0]);
        let inv = a.spd_inverse().unwrap();
        let prod = a.mul_mat(&inv);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod.get(i, j) - expected).abs() < 1e-10);
            }
        }
    }
}
