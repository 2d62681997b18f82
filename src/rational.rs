//! Rational functions of `s`, the value type carried by every port quantity.

use crate::consts::APPROX_TOL;
use crate::error::{Error, Result};
use crate::poly::Polynomial;
use num::Zero;
use num::complex::{Complex64, c64};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Limit of an expression, either a finite value or divergent
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Limit {
    Finite(Complex64),
    Unbounded,
}

impl Limit {
    pub fn finite(&self) -> Option<Complex64> {
        match self {
            Limit::Finite(val) => Some(*val),
            Limit::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Limit::Unbounded)
    }
}

impl Add for Limit {
    type Output = Limit;

    fn add(self, rhs: Limit) -> Limit {
        match (self, rhs) {
            (Limit::Finite(a), Limit::Finite(b)) => Limit::Finite(a + b),
            _ => Limit::Unbounded,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Finite(val) => write!(f, "{}", crate::poly::fmt_coeff(val)),
            Limit::Unbounded => write!(f, "oo"),
        }
    }
}

/// `num(s) / den(s)` with a nonzero denominator
///
/// Common powers of `s` are always cancelled and a zero numerator forces the
/// denominator to one. General common factors are only removed by
/// [`Rational::cancel`].
#[derive(Clone, Debug, PartialEq)]
pub struct Rational {
    num: Polynomial,
    den: Polynomial,
}

impl Rational {
    pub fn new(num: Polynomial, den: Polynomial) -> Result<Rational> {
        if den.is_zero() {
            return Err(Error::SingularConversion(
                "rational function with zero denominator".to_string(),
            ));
        }
        Ok(Rational::normalized(num, den))
    }

    fn normalized(num: Polynomial, den: Polynomial) -> Rational {
        if num.is_zero() {
            return Rational {
                num,
                den: Polynomial::one(),
            };
        }
        let k = num.trailing_zeros().min(den.trailing_zeros());
        Rational {
            num: num.shift_down(k),
            den: den.shift_down(k),
        }
    }

    pub fn zero() -> Rational {
        Rational::from_poly(Polynomial::zero())
    }

    pub fn one() -> Rational {
        Rational::from_poly(Polynomial::one())
    }

    pub fn constant(c: Complex64) -> Rational {
        Rational::from_poly(Polynomial::constant(c))
    }

    pub fn real(x: f64) -> Rational {
        Rational::constant(c64(x, 0.0))
    }

    pub fn s() -> Rational {
        Rational::from_poly(Polynomial::s())
    }

    pub fn from_poly(num: Polynomial) -> Rational {
        Rational::normalized(num, Polynomial::one())
    }

    pub fn num(&self) -> &Polynomial {
        &self.num
    }

    pub fn den(&self) -> &Polynomial {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Value when the function does not depend on `s`
    pub fn as_constant(&self) -> Option<Complex64> {
        match self.num.is_constant() && self.den.is_constant() {
            true => Some(self.num.coeff(0) / self.den.coeff(0)),
            false => None,
        }
    }

    pub fn eval(&self, s: Complex64) -> Complex64 {
        self.num.eval(s) / self.den.eval(s)
    }

    pub fn recip(&self) -> Result<Rational> {
        if self.is_zero() {
            return Err(Error::SingularConversion(
                "reciprocal of zero".to_string(),
            ));
        }
        Ok(Rational::normalized(self.den.clone(), self.num.clone()))
    }

    pub fn checked_div(&self, rhs: &Rational) -> Result<Rational> {
        Ok(self * &rhs.recip()?)
    }

    pub fn scale(&self, c: Complex64) -> Rational {
        Rational::normalized(self.num.scale(c), self.den.clone())
    }

    /// Multiply by `s`
    pub fn mul_s(&self) -> Rational {
        Rational::normalized(self.num.shift_up(1), self.den.clone())
    }

    /// Divide by `s`
    pub fn div_s(&self) -> Rational {
        Rational::normalized(self.num.clone(), self.den.shift_up(1))
    }

    /// Remove the numerical greatest common divisor of numerator and
    /// denominator
    pub fn cancel(&self) -> Rational {
        let g = self.num.gcd(&self.den);
        if g.degree() == 0 {
            return self.clone();
        }
        match (self.num.div_rem(&g), self.den.div_rem(&g)) {
            (Ok((num, _)), Ok((den, _))) => Rational::normalized(num, den),
            _ => self.clone(),
        }
    }

    /// Cancelled form with a monic denominator
    pub fn canonical(&self) -> Rational {
        let r = self.cancel();
        let k = r.den.lc().inv();
        Rational::normalized(r.num.scale(k), r.den.scale(k))
    }

    /// Split into polynomial quotient plus strictly proper remainder
    pub fn split_strictly_proper(&self) -> (Polynomial, Rational) {
        match self.num.div_rem(&self.den) {
            Ok((quot, rem)) => (quot, Rational::normalized(rem, self.den.clone())),
            Err(_) => (Polynomial::zero(), self.clone()),
        }
    }

    pub fn is_strictly_proper(&self) -> bool {
        self.is_zero() || self.num.degree() < self.den.degree()
    }

    pub fn approx_eq(&self, other: &Rational) -> bool {
        self.approx_eq_tol(other, APPROX_TOL)
    }

    /// Equality of the cross products `a.num * b.den` and `b.num * a.den`
    /// relative to their size
    pub fn approx_eq_tol(&self, other: &Rational, tol: f64) -> bool {
        let lhs = &self.num * &other.den;
        let rhs = &other.num * &self.den;
        (&lhs - &rhs).norm() <= tol * lhs.norm().max(rhs.norm())
    }

    /// Limit as `s` goes to zero
    pub fn limit_at_zero(&self) -> Limit {
        if self.is_zero() {
            return Limit::Finite(Complex64::zero());
        }
        let den0 = self.den.coeff(0);
        match den0.is_zero() {
            false => Limit::Finite(self.num.coeff(0) / den0),
            true => Limit::Unbounded,
        }
    }

    /// Limit as `s` goes to infinity
    pub fn limit_at_infinity(&self) -> Limit {
        if self.is_zero() {
            return Limit::Finite(Complex64::zero());
        }
        let (dn, dd) = (self.num.degree(), self.den.degree());
        if dn < dd {
            Limit::Finite(Complex64::zero())
        } else if dn == dd {
            Limit::Finite(self.num.lc() / self.den.lc())
        } else {
            Limit::Unbounded
        }
    }
}

impl From<f64> for Rational {
    fn from(x: f64) -> Self {
        Rational::real(x)
    }
}

impl From<Complex64> for Rational {
    fn from(c: Complex64) -> Self {
        Rational::constant(c)
    }
}

impl From<Polynomial> for Rational {
    fn from(p: Polynomial) -> Self {
        Rational::from_poly(p)
    }
}

impl<'a> Add<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'a Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::normalized(&self.num + &rhs.num, self.den.clone());
        }
        Rational::normalized(
            &(&self.num * &rhs.den) + &(&rhs.num * &self.den),
            &self.den * &rhs.den,
        )
    }
}

impl<'a> Sub<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'a Rational) -> Rational {
        self + &(-rhs)
    }
}

impl<'a> Mul<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'a Rational) -> Rational {
        Rational::normalized(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &'a Rational) -> Rational {
                (&self).$method(rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_constant() && self.den.coeff(0) == c64(1.0, 0.0) {
            return write!(f, "{}", self.num);
        }
        write!(f, "({}) / ({})", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(num: &[f64], den: &[f64]) -> Rational {
        Rational::new(Polynomial::from_desc(num), Polynomial::from_desc(den)).unwrap()
    }

    #[test]
    fn test_normalize_powers_of_s() {
        let r = ratio(&[1.0, 0.0, 0.0], &[2.0, 0.0]);
        assert_eq!(r.num(), &Polynomial::from_desc(&[1.0, 0.0]));
        assert_eq!(r.den(), &Polynomial::from_desc(&[2.0]));
        assert!(Rational::new(Polynomial::one(), Polynomial::zero()).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = ratio(&[1.0], &[1.0, 1.0]);
        let b = ratio(&[1.0], &[1.0, 2.0]);
        let sum = &a + &b;
        assert!(sum.approx_eq(&ratio(&[2.0, 3.0], &[1.0, 3.0, 2.0])));
        let prod = &a * &b;
        assert!(prod.approx_eq(&ratio(&[1.0], &[1.0, 3.0, 2.0])));
        let diff = &a - &a;
        assert!(diff.is_zero());
        assert!(a.checked_div(&Rational::zero()).is_err());
    }

    #[test]
    fn test_cancel() {
        let r = ratio(&[1.0, 1.0], &[1.0, 3.0, 2.0]).cancel();
        assert_eq!(r.den().degree(), 1);
        assert!(r.approx_eq(&ratio(&[1.0], &[1.0, 2.0])));
        let c = ratio(&[2.0, 2.0], &[4.0, 8.0]).canonical();
        assert_eq!(c.den().lc(), c64(1.0, 0.0));
    }

    #[test]
    fn test_limits() {
        let r = ratio(&[1.0], &[1.0, 1.0]);
        assert_eq!(r.limit_at_zero(), Limit::Finite(c64(1.0, 0.0)));
        assert_eq!(r.limit_at_infinity(), Limit::Finite(c64(0.0, 0.0)));
        assert_eq!(r.div_s().limit_at_zero(), Limit::Unbounded);
        assert_eq!(r.mul_s().mul_s().limit_at_infinity(), Limit::Unbounded);
        assert_eq!(r.mul_s().limit_at_infinity(), Limit::Finite(c64(1.0, 0.0)));
    }

    #[test]
    fn test_split_strictly_proper() {
        let (q, rem) = ratio(&[1.0, 3.0, 1.0], &[1.0, 1.0]).split_strictly_proper();
        assert_eq!(q, Polynomial::from_desc(&[1.0, 2.0]));
        assert!(rem.approx_eq(&ratio(&[-1.0], &[1.0, 1.0])));
        assert!(rem.is_strictly_proper());
    }
}
