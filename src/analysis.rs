//! Pole, zero, residue and time-domain analysis of s-domain expressions.
//!
//! Functions here take an [`Expr`] and fail with
//! [`Error::NotRationalFunction`](crate::error::Error::NotRationalFunction)
//! when the expression does not reduce to the shape they need. The
//! `rational_*` variants work on a bare [`Rational`] and cannot fail.

use crate::error::Result;
use crate::expr::{Expr, jw};
use crate::poly::Root;
use crate::rational::{Limit, Rational};
use ndarray::Array1;
use num::complex::Complex64;

pub mod laplace;
pub mod residue;
pub mod zpk;

pub use self::laplace::{
    DelayedResponse, Mode, TimeResponse, impulse_response, inverse_laplace, step_response,
    transient_response,
};
pub use self::residue::{
    PartialFraction, ResidueTerm, Residues, partfrac, rational_partfrac, rational_poles,
    rational_residues, rational_zeros, residue_sum, residues,
};
pub use self::zpk::{DcGainForm, ZeroPoleGain, rational_dc_gain_form, rational_zpk, zpk};

/// Poles of the rational part, a delay factor being ignored
pub fn poles(expr: &Expr) -> Result<Vec<Root>> {
    let (ratfun, _) = expr.as_ratfun_delay()?;
    Ok(rational_poles(&ratfun))
}

/// Zeros of the rational part, a delay factor being ignored
pub fn zeros(expr: &Expr) -> Result<Vec<Root>> {
    let (ratfun, _) = expr.as_ratfun_delay()?;
    Ok(rational_zeros(&ratfun))
}

/// Alias of [`zpk`] listing the factors in pole-zero-gain order
pub fn pzk(expr: &Expr) -> Result<ZeroPoleGain> {
    zpk(expr)
}

/// Cancelled form with a monic denominator
pub fn canonical(expr: &Expr) -> Result<Rational> {
    Ok(expr.as_ratfun()?.canonical())
}

/// `lim s->oo s F(s)`
///
/// A term delayed by a positive amount decays faster than any rational
/// growth and contributes zero, while an advanced term diverges.
pub fn initial_value(expr: &Expr) -> Limit {
    expr.terms()
        .iter()
        .fold(Limit::Finite(Complex64::new(0.0, 0.0)), |acc, t| {
            let part = if t.delay() > 0.0 {
                Limit::Finite(Complex64::new(0.0, 0.0))
            } else if t.delay() < 0.0 {
                Limit::Unbounded
            } else {
                t.ratfun().mul_s().limit_at_infinity()
            };
            acc + part
        })
}

/// `lim s->0 s F(s)`, every delay factor tending to one
pub fn final_value(expr: &Expr) -> Limit {
    expr.terms()
        .iter()
        .fold(Rational::zero(), |acc, t| &acc + t.ratfun())
        .mul_s()
        .limit_at_zero()
}

/// Evaluate on the imaginary axis at frequencies given in hertz
pub fn frequency_response(expr: &Expr, freq: &Array1<f64>) -> Array1<Complex64> {
    freq.mapv(|f| expr.eval(jw(f)))
}
