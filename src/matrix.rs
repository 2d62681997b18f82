//! Square matrices of rational functions, used for every multiport parameter
//! set.

use crate::error::{Error, Result};
use crate::rational::Rational;
use ndarray::Array2;
use std::fmt;
use std::ops::{Add, Index};

#[derive(Clone, Debug, PartialEq)]
pub struct PortMatrix(Array2<Rational>);

impl PortMatrix {
    pub fn new(arr: Array2<Rational>) -> Result<PortMatrix> {
        match arr.is_square() && arr.nrows() > 0 {
            true => Ok(PortMatrix(arr)),
            false => Err(Error::DimensionMismatch(format!(
                "port matrix must be square, found {}x{}",
                arr.nrows(),
                arr.ncols()
            ))),
        }
    }

    /// 2x2 matrix from its entries in row order
    pub fn from_entries(m11: Rational, m12: Rational, m21: Rational, m22: Rational) -> PortMatrix {
        let mut entries = [Some(m11), Some(m12), Some(m21), Some(m22)].into_iter();
        PortMatrix(Array2::from_shape_fn((2, 2), |_| {
            entries.next().flatten().unwrap_or_else(Rational::zero)
        }))
    }

    pub fn from_fn<F: FnMut((usize, usize)) -> Rational>(n: usize, f: F) -> PortMatrix {
        PortMatrix(Array2::from_shape_fn((n, n), f))
    }

    pub fn zeros(n: usize) -> PortMatrix {
        PortMatrix::from_fn(n, |_| Rational::zero())
    }

    pub fn identity(n: usize) -> PortMatrix {
        PortMatrix::from_fn(n, |(i, j)| match i == j {
            true => Rational::one(),
            false => Rational::zero(),
        })
    }

    pub fn nports(&self) -> usize {
        self.0.nrows()
    }

    pub fn inner(&self) -> &Array2<Rational> {
        &self.0
    }

    /// Entries with common factors removed
    pub fn cancel(&self) -> PortMatrix {
        PortMatrix(self.0.map(|r| r.cancel()))
    }

    /// Copy with one entry replaced
    pub fn with_entry(&self, i: usize, j: usize, val: Rational) -> PortMatrix {
        let mut out = self.0.clone();
        out[(i, j)] = val;
        PortMatrix(out)
    }

    /// Matrix with `row` and `col` deleted
    pub fn minor(&self, row: usize, col: usize) -> PortMatrix {
        let n = self.nports();
        PortMatrix::from_fn(n - 1, |(i, j)| {
            let r = if i < row { i } else { i + 1 };
            let c = if j < col { j } else { j + 1 };
            self.0[(r, c)].clone()
        })
    }

    pub fn remove_port(&self, p: usize) -> PortMatrix {
        self.minor(p, p)
    }

    /// `n x n` matrix holding this 2x2 block at rows and columns `idx`
    pub fn embed(&self, n: usize, idx: [usize; 2]) -> PortMatrix {
        PortMatrix::from_fn(n, |(i, j)| {
            let row = idx.iter().position(|&k| k == i);
            let col = idx.iter().position(|&k| k == j);
            match (row, col) {
                (Some(a), Some(b)) => self.0[(a, b)].clone(),
                _ => Rational::zero(),
            }
        })
    }

    /// Sums of the positive and negative Leibniz terms of the determinant
    fn det_parts(&self) -> (Rational, Rational) {
        let n = self.nports();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut pos = Rational::zero();
        let mut neg = Rational::zero();
        permute(&mut perm, 0, true, &mut |p, even| {
            let term = p
                .iter()
                .enumerate()
                .fold(Rational::one(), |acc, (i, &j)| &acc * &self.0[(i, j)]);
            match even {
                true => pos = &pos + &term,
                false => neg = &neg + &term,
            }
        });
        (pos, neg)
    }

    pub fn det(&self) -> Rational {
        let (pos, neg) = self.det_parts();
        &pos - &neg
    }

    /// True when the determinant vanishes relative to the size of its terms
    pub fn is_singular(&self) -> bool {
        let (pos, neg) = self.det_parts();
        pos.approx_eq(&neg)
    }

    /// Inverse through the adjugate
    pub fn inv(&self) -> Result<PortMatrix> {
        let det = self.det();
        if det.is_zero() {
            return Err(Error::SingularConversion(
                "matrix inverse with zero determinant".to_string(),
            ));
        }
        let det_inv = det.recip()?;
        let n = self.nports();
        if n == 1 {
            return Ok(PortMatrix::from_fn(1, |_| det_inv.clone()));
        }
        Ok(PortMatrix::from_fn(n, |(i, j)| {
            // adjugate is the transposed cofactor matrix
            let cofactor = self.minor(j, i).det();
            let signed = match (i + j) % 2 {
                0 => cofactor,
                _ => -&cofactor,
            };
            &signed * &det_inv
        }))
    }

    pub fn dot(&self, rhs: &PortMatrix) -> PortMatrix {
        let n = self.nports();
        PortMatrix::from_fn(n, |(i, j)| {
            (0..n).fold(Rational::zero(), |acc, k| {
                &acc + &(&self.0[(i, k)] * &rhs.0[(k, j)])
            })
        })
    }

    pub fn dot_vec(&self, v: &[Rational]) -> Vec<Rational> {
        (0..self.nports())
            .map(|i| {
                v.iter()
                    .enumerate()
                    .fold(Rational::zero(), |acc, (k, x)| &acc + &(&self.0[(i, k)] * x))
            })
            .collect()
    }

    pub fn approx_eq(&self, other: &PortMatrix) -> bool {
        self.nports() == other.nports()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(a, b)| a.approx_eq(b))
    }
}

/// Visit every permutation of `perm[k..]` with its parity
fn permute<F: FnMut(&[usize], bool)>(perm: &mut Vec<usize>, k: usize, even: bool, visit: &mut F) {
    if k == perm.len() {
        visit(perm, even);
        return;
    }
    for i in k..perm.len() {
        perm.swap(k, i);
        permute(perm, k + 1, if i == k { even } else { !even }, visit);
        perm.swap(k, i);
    }
}

impl Index<(usize, usize)> for PortMatrix {
    type Output = Rational;

    fn index(&self, idx: (usize, usize)) -> &Rational {
        &self.0[idx]
    }
}

impl<'a> Add<&'a PortMatrix> for &'a PortMatrix {
    type Output = PortMatrix;

    fn add(self, rhs: &'a PortMatrix) -> PortMatrix {
        PortMatrix::from_fn(self.nports(), |idx| &self.0[idx] + &rhs.0[idx])
    }
}

impl fmt::Display for PortMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.rows() {
            let cells: Vec<String> = row.iter().map(|r| r.to_string()).collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}
