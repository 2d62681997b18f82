//! Dense polynomials in the Laplace variable `s` with complex coefficients.
//!
//! Coefficients are stored in ascending order, `coeffs[k]` multiplies `s^k`,
//! and trailing (high order) exact zeros are always trimmed so that the last
//! stored coefficient is the leading one.

use crate::consts::GCD_TOL;
use crate::error::{Error, Result};
use num::complex::{Complex64, c64};
use num::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

pub mod roots;

pub use self::roots::Root;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<Complex64>,
}

impl Polynomial {
    /// Build from ascending coefficients
    pub fn new(mut coeffs: Vec<Complex64>) -> Polynomial {
        while coeffs.last().is_some_and(|c| c.is_zero()) {
            coeffs.pop();
        }
        Polynomial { coeffs }
    }

    /// Build from real ascending coefficients
    pub fn from_real(coeffs: &[f64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| c64(c, 0.0)).collect())
    }

    /// Build from real descending coefficients, highest power first
    ///
    /// `Polynomial::from_desc(&[10.0, 2.0, 1.0, 0.0])` is `10 s^3 + 2 s^2 + s`.
    pub fn from_desc(coeffs: &[f64]) -> Polynomial {
        Polynomial::new(coeffs.iter().rev().map(|&c| c64(c, 0.0)).collect())
    }

    pub fn zero() -> Polynomial {
        Polynomial { coeffs: vec![] }
    }

    pub fn one() -> Polynomial {
        Polynomial::constant(Complex64::one())
    }

    pub fn constant(c: Complex64) -> Polynomial {
        Polynomial::new(vec![c])
    }

    /// `c * s^k`
    pub fn monomial(c: Complex64, k: usize) -> Polynomial {
        let mut coeffs = vec![Complex64::zero(); k + 1];
        coeffs[k] = c;
        Polynomial::new(coeffs)
    }

    /// The Laplace variable itself
    pub fn s() -> Polynomial {
        Polynomial::monomial(Complex64::one(), 1)
    }

    /// `(s - root)^multiplicity`
    pub fn from_root(root: Complex64, multiplicity: usize) -> Polynomial {
        let factor = Polynomial::new(vec![-root, Complex64::one()]);
        (0..multiplicity).fold(Polynomial::one(), |acc, _| &acc * &factor)
    }

    /// Monic polynomial with the given roots, repeated per multiplicity
    pub fn from_roots(roots: &[Root]) -> Polynomial {
        roots.iter().fold(Polynomial::one(), |acc, r| {
            &acc * &Polynomial::from_root(r.value, r.multiplicity)
        })
    }

    pub fn coeffs(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Coefficient of `s^k`, zero beyond the degree
    pub fn coeff(&self, k: usize) -> Complex64 {
        self.coeffs.get(k).copied().unwrap_or_else(Complex64::zero)
    }

    /// Degree, with the zero polynomial reported as degree 0
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    /// Leading coefficient, zero for the zero polynomial
    pub fn lc(&self) -> Complex64 {
        self.coeffs.last().copied().unwrap_or_else(Complex64::zero)
    }

    /// True when every coefficient has an exactly zero imaginary part
    pub fn is_real(&self) -> bool {
        self.coeffs.iter().all(|c| c.im == 0.0)
    }

    /// Largest coefficient modulus
    pub fn norm(&self) -> f64 {
        self.coeffs.iter().map(|c| c.norm()).fold(0.0, f64::max)
    }

    pub fn eval(&self, z: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex64::zero(), |acc, &c| acc * z + c)
    }

    pub fn derivative(&self) -> Polynomial {
        Polynomial::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &c)| c * k as f64)
                .collect(),
        )
    }

    pub fn nth_derivative(&self, n: usize) -> Polynomial {
        (0..n).fold(self.clone(), |acc, _| acc.derivative())
    }

    pub fn scale(&self, c: Complex64) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|&a| a * c).collect())
    }

    /// Divide through by the leading coefficient
    pub fn monic(&self) -> Polynomial {
        match self.is_zero() {
            true => self.clone(),
            false => self.scale(self.lc().inv()),
        }
    }

    /// Number of low order coefficients that are exactly zero, i.e. the
    /// multiplicity of the root at the origin
    pub fn trailing_zeros(&self) -> usize {
        self.coeffs.iter().take_while(|c| c.is_zero()).count()
    }

    /// Drop the `k` lowest coefficients, dividing by `s^k` when they are zero
    pub fn shift_down(&self, k: usize) -> Polynomial {
        Polynomial::new(self.coeffs.iter().skip(k).copied().collect())
    }

    /// Multiply by `s^k`
    pub fn shift_up(&self, k: usize) -> Polynomial {
        if self.is_zero() {
            return self.clone();
        }
        let mut coeffs = vec![Complex64::zero(); k];
        coeffs.extend_from_slice(&self.coeffs);
        Polynomial::new(coeffs)
    }

    /// Coefficients of `p(x + a)`, the Taylor expansion of `p` about `a`
    pub fn taylor_shift(&self, a: Complex64) -> Polynomial {
        let step = Polynomial::new(vec![a, Complex64::one()]);
        self.coeffs.iter().rev().fold(Polynomial::zero(), |acc, &c| {
            &(&acc * &step) + &Polynomial::constant(c)
        })
    }

    /// Euclidean division, `self = q * divisor + r` with `deg r < deg divisor`
    pub fn div_rem(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial)> {
        if divisor.is_zero() {
            return Err(Error::SingularConversion(
                "polynomial division by zero".to_string(),
            ));
        }
        let dd = divisor.degree();
        if self.is_zero() || self.degree() < dd {
            return Ok((Polynomial::zero(), self.clone()));
        }
        let lc_inv = divisor.lc().inv();
        let mut rem = self.coeffs.clone();
        let mut quot = vec![Complex64::zero(); self.degree() - dd + 1];
        for k in (0..quot.len()).rev() {
            let q = rem[k + dd] * lc_inv;
            quot[k] = q;
            for (j, &d) in divisor.coeffs.iter().enumerate() {
                rem[k + j] -= q * d;
            }
        }
        rem.truncate(dd);
        Ok((Polynomial::new(quot), Polynomial::new(rem)))
    }

    /// Monic greatest common divisor, with remainders that are small relative
    /// to the operands treated as zero
    pub fn gcd(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() {
            return other.monic();
        }
        if other.is_zero() {
            return self.monic();
        }
        let (mut a, mut b) = match self.degree() >= other.degree() {
            true => (self.monic(), other.monic()),
            false => (other.monic(), self.monic()),
        };
        loop {
            let r = match a.div_rem(&b) {
                Ok((_, r)) => r,
                Err(_) => return a,
            };
            if r.norm() <= GCD_TOL * a.norm().max(b.norm()) {
                return b;
            }
            a = b;
            b = r.monic();
        }
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &'a Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..n).map(|k| self.coeff(k) + rhs.coeff(k)).collect())
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &'a Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..n).map(|k| self.coeff(k) - rhs.coeff(k)).collect())
    }
}

impl<'a> Mul<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'a Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![Complex64::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::new(coeffs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|&c| -c).collect())
    }
}

pub(crate) fn fmt_coeff(c: &Complex64) -> String {
    if c.im == 0.0 {
        format!("{}", c.re)
    } else if c.re == 0.0 {
        format!("{}j", c.im)
    } else {
        format!("({}{:+}j)", c.re, c.im)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (k, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            let coef = fmt_coeff(c);
            match (k, coef.as_str()) {
                (0, _) => write!(f, "{}", coef)?,
                (1, "1") => write!(f, "s")?,
                (1, _) => write!(f, "{} s", coef)?,
                (_, "1") => write!(f, "s^{}", k)?,
                (_, _) => write!(f, "{} s^{}", coef, k)?,
            }
        }
        Ok(())
    }
}
