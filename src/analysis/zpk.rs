use crate::error::{Error, Result};
use crate::expr::{DelayedTerm, Expr};
use crate::poly::{Polynomial, Root};
use crate::rational::Rational;
use num::One;
use num::complex::Complex64;

/// `gain * prod (s - z)^m / prod (s - p)^m * exp(-delay * s)`
#[derive(Clone, Debug, PartialEq)]
pub struct ZeroPoleGain {
    pub gain: Complex64,
    pub zeros: Vec<Root>,
    pub poles: Vec<Root>,
    pub delay: f64,
}

impl ZeroPoleGain {
    pub fn ratfun(&self) -> Rational {
        Rational::new(
            Polynomial::from_roots(&self.zeros).scale(self.gain),
            Polynomial::from_roots(&self.poles),
        )
        .unwrap_or_else(|_| Rational::zero())
    }

    pub fn to_expr(&self) -> Expr {
        Expr::new(vec![DelayedTerm::new(self.ratfun(), self.delay)])
    }
}

pub fn rational_zpk(r: &Rational, delay: f64) -> ZeroPoleGain {
    let r = r.cancel();
    let (gain, zeros) = match r.is_zero() {
        true => (Complex64::new(0.0, 0.0), vec![]),
        false => (r.num().lc() / r.den().lc(), r.num().roots()),
    };
    ZeroPoleGain {
        gain,
        zeros,
        poles: r.den().roots(),
        delay,
    }
}

/// Zero-pole-gain factorization, the gain being the ratio of leading
/// coefficients
pub fn zpk(expr: &Expr) -> Result<ZeroPoleGain> {
    let (ratfun, delay) = expr.as_ratfun_delay()?;
    Ok(rational_zpk(&ratfun, delay))
}

/// Time-constant form `k0 * prod (1 - s/z)^m / prod (1 - s/p)^m`
#[derive(Clone, Debug, PartialEq)]
pub struct DcGainForm {
    pub k0: Complex64,
    pub zeros: Vec<Root>,
    pub poles: Vec<Root>,
}

impl DcGainForm {
    pub fn ratfun(&self) -> Rational {
        let factor = |roots: &[Root]| {
            roots.iter().fold(Polynomial::one(), |acc, r| {
                let f = Polynomial::new(vec![Complex64::one(), -r.value.inv()]);
                (0..r.multiplicity).fold(acc, |a, _| &a * &f)
            })
        };
        Rational::new(factor(&self.zeros).scale(self.k0), factor(&self.poles))
            .unwrap_or_else(|_| Rational::zero())
    }
}

/// Rewrite in time-constant form, which needs the DC gain to be finite and
/// nonzero
pub fn rational_dc_gain_form(r: &Rational) -> Result<DcGainForm> {
    let r = r.cancel();
    if r.is_zero() || r.num().coeff(0) == Complex64::new(0.0, 0.0) {
        return Err(Error::UnsupportedOperation(
            "time-constant form with a zero at the origin".to_string(),
        ));
    }
    if r.den().coeff(0) == Complex64::new(0.0, 0.0) {
        return Err(Error::UnsupportedOperation(
            "time-constant form with a pole at the origin".to_string(),
        ));
    }
    Ok(DcGainForm {
        k0: r.num().coeff(0) / r.den().coeff(0),
        zeros: r.num().roots(),
        poles: r.den().roots(),
    })
}
