//! Sums of delayed rational terms, `sum_k R_k(s) * exp(-tau_k * s)`.
//!
//! This is the general expression form handed to the analysis routines. A
//! single term is a delay times a rational function; several distinct delays
//! cannot be separated into that shape.

use crate::consts::DELAY_TOL;
use crate::error::{Error, Result};
use crate::rational::Rational;
use num::Zero;
use num::complex::{Complex64, c64};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// `ratfun(s) * exp(-delay * s)`
#[derive(Clone, Debug, PartialEq)]
pub struct DelayedTerm {
    ratfun: Rational,
    delay: f64,
}

impl DelayedTerm {
    pub fn new(ratfun: Rational, delay: f64) -> DelayedTerm {
        DelayedTerm { ratfun, delay }
    }

    pub fn ratfun(&self) -> &Rational {
        &self.ratfun
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expr {
    terms: Vec<DelayedTerm>,
}

impl Expr {
    /// Merge equal delays, drop zero terms and order by delay
    pub fn new(terms: Vec<DelayedTerm>) -> Expr {
        let mut merged: Vec<DelayedTerm> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged
                .iter_mut()
                .find(|t| (t.delay - term.delay).abs() <= DELAY_TOL * t.delay.abs().max(1.0))
            {
                Some(t) => t.ratfun = &t.ratfun + &term.ratfun,
                None => merged.push(term),
            }
        }
        merged.retain(|t| !t.ratfun.is_zero());
        merged.sort_by(|a, b| a.delay.total_cmp(&b.delay));
        Expr { terms: merged }
    }

    pub fn zero() -> Expr {
        Expr { terms: vec![] }
    }

    pub fn s() -> Expr {
        Expr::from(Rational::s())
    }

    /// `exp(-tau * s)`
    pub fn delay(tau: f64) -> Expr {
        Expr::new(vec![DelayedTerm::new(Rational::one(), tau)])
    }

    /// `exp(c0 * s + c1)`, a delay of `-c0` with gain `exp(c1)`
    pub fn exp(c0: f64, c1: f64) -> Expr {
        Expr::new(vec![DelayedTerm::new(Rational::real(c1.exp()), -c0)])
    }

    pub fn terms(&self) -> &[DelayedTerm] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// True for an undelayed rational function
    pub fn is_rational(&self) -> bool {
        match self.terms.as_slice() {
            [] => true,
            [term] => term.delay == 0.0,
            _ => false,
        }
    }

    /// Separate into a rational function and a delay
    ///
    /// Fails with [`Error::NotRationalFunction`] when terms with distinct
    /// delays are summed.
    pub fn as_ratfun_delay(&self) -> Result<(Rational, f64)> {
        match self.terms.as_slice() {
            [] => Ok((Rational::zero(), 0.0)),
            [term] => Ok((term.ratfun.clone(), term.delay)),
            terms => Err(Error::NotRationalFunction(format!(
                "expression combines {} distinct delays",
                terms.len()
            ))),
        }
    }

    /// The undelayed rational function, failing for any delay
    pub fn as_ratfun(&self) -> Result<Rational> {
        match self.as_ratfun_delay()? {
            (ratfun, delay) if delay == 0.0 => Ok(ratfun),
            (_, delay) => Err(Error::NotRationalFunction(format!(
                "expression carries a delay of {}",
                delay
            ))),
        }
    }

    pub fn eval(&self, s: Complex64) -> Complex64 {
        self.terms.iter().fold(Complex64::zero(), |acc, t| {
            acc + t.ratfun.eval(s) * (-s * t.delay).exp()
        })
    }

    pub fn checked_div(&self, rhs: &Expr) -> Result<Expr> {
        let (ratfun, delay) = rhs.as_ratfun_delay()?;
        let inv = DelayedTerm::new(ratfun.recip()?, -delay);
        Ok(Expr::new(
            self.terms
                .iter()
                .map(|t| DelayedTerm::new(&t.ratfun * &inv.ratfun, t.delay + inv.delay))
                .collect(),
        ))
    }

    pub fn approx_eq(&self, other: &Expr) -> bool {
        self.terms.len() == other.terms.len()
            && self.terms.iter().zip(other.terms.iter()).all(|(a, b)| {
                (a.delay - b.delay).abs() <= DELAY_TOL * a.delay.abs().max(1.0)
                    && a.ratfun.approx_eq(&b.ratfun)
            })
    }
}

impl From<Rational> for Expr {
    fn from(ratfun: Rational) -> Self {
        Expr::new(vec![DelayedTerm::new(ratfun, 0.0)])
    }
}

impl From<f64> for Expr {
    fn from(x: f64) -> Self {
        Expr::from(Rational::real(x))
    }
}

impl<'a> Add<&'a Expr> for &'a Expr {
    type Output = Expr;

    fn add(self, rhs: &'a Expr) -> Expr {
        Expr::new(self.terms.iter().chain(rhs.terms.iter()).cloned().collect())
    }
}

impl<'a> Sub<&'a Expr> for &'a Expr {
    type Output = Expr;

    fn sub(self, rhs: &'a Expr) -> Expr {
        self + &(-rhs)
    }
}

impl<'a> Mul<&'a Expr> for &'a Expr {
    type Output = Expr;

    fn mul(self, rhs: &'a Expr) -> Expr {
        let mut terms = vec![];
        for a in self.terms.iter() {
            for b in rhs.terms.iter() {
                terms.push(DelayedTerm::new(&a.ratfun * &b.ratfun, a.delay + b.delay));
            }
        }
        Expr::new(terms)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr {
            terms: self
                .terms
                .iter()
                .map(|t| DelayedTerm::new(-&t.ratfun, t.delay))
                .collect(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, t) in self.terms.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            match t.delay == 0.0 {
                true => write!(f, "{}", t.ratfun)?,
                false => write!(f, "[{}] exp({} s)", t.ratfun, -t.delay)?,
            }
        }
        Ok(())
    }
}

/// `j * omega` for a frequency in hertz
pub(crate) fn jw(freq: f64) -> Complex64 {
    c64(0.0, 2.0 * std::f64::consts::PI * freq)
}
