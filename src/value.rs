//! Tagged port quantities.
//!
//! A [`PortValue`] is a rational function of `s` labelled with the physical
//! quantity it represents. Arithmetic keeps the label of the left operand;
//! constructors of one-ports and multiports check labels and reject
//! mismatches.

use crate::analysis::{
    self, PartialFraction, Residues, TimeResponse, ZeroPoleGain,
};
use crate::diagnostic::Diagnosed;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::poly::Root;
use crate::rational::{Limit, Rational};
use ndarray::Array1;
use num::complex::{Complex64, c64};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    Impedance,
    Admittance,
    Voltage,
    Current,
    VoltageRatio,
    CurrentRatio,
}

impl Quantity {
    pub fn to_str(&self) -> &str {
        match self {
            Quantity::Impedance => "impedance",
            Quantity::Admittance => "admittance",
            Quantity::Voltage => "voltage",
            Quantity::Current => "current",
            Quantity::VoltageRatio => "voltage ratio",
            Quantity::CurrentRatio => "current ratio",
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Quantity::Impedance => "Z",
            Quantity::Admittance => "Y",
            Quantity::Voltage => "V",
            Quantity::Current => "I",
            Quantity::VoltageRatio => "Av",
            Quantity::CurrentRatio => "Ai",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortValue {
    kind: Quantity,
    val: Rational,
}

impl PortValue {
    /// Tag a value, cancelling common factors
    pub fn new(kind: Quantity, val: impl Into<Rational>) -> PortValue {
        PortValue {
            kind,
            val: val.into().cancel(),
        }
    }

    pub fn impedance(val: impl Into<Rational>) -> PortValue {
        PortValue::new(Quantity::Impedance, val)
    }

    pub fn admittance(val: impl Into<Rational>) -> PortValue {
        PortValue::new(Quantity::Admittance, val)
    }

    pub fn voltage(val: impl Into<Rational>) -> PortValue {
        PortValue::new(Quantity::Voltage, val)
    }

    pub fn current(val: impl Into<Rational>) -> PortValue {
        PortValue::new(Quantity::Current, val)
    }

    pub fn voltage_ratio(val: impl Into<Rational>) -> PortValue {
        PortValue::new(Quantity::VoltageRatio, val)
    }

    pub fn current_ratio(val: impl Into<Rational>) -> PortValue {
        PortValue::new(Quantity::CurrentRatio, val)
    }

    pub fn zero(kind: Quantity) -> PortValue {
        PortValue::new(kind, Rational::zero())
    }

    pub fn one(kind: Quantity) -> PortValue {
        PortValue::new(kind, Rational::one())
    }

    pub fn kind(&self) -> Quantity {
        self.kind
    }

    pub fn val(&self) -> &Rational {
        &self.val
    }

    pub fn expr(&self) -> Expr {
        Expr::from(self.val.clone())
    }

    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    /// Check the label, failing with [`Error::TypeMismatch`]
    pub fn expect(&self, kind: Quantity) -> Result<&PortValue> {
        match self.kind == kind {
            true => Ok(self),
            false => Err(Error::TypeMismatch {
                expected: kind,
                found: self.kind,
            }),
        }
    }

    /// Same value under another label
    pub fn retag(&self, kind: Quantity) -> PortValue {
        PortValue {
            kind,
            val: self.val.clone(),
        }
    }

    pub fn checked_div(&self, rhs: &PortValue) -> Result<PortValue> {
        Ok(PortValue::new(self.kind, self.val.checked_div(&rhs.val)?))
    }

    /// `1 / self` labelled as `kind`
    pub fn recip(&self, kind: Quantity) -> Result<PortValue> {
        Ok(PortValue::new(kind, self.val.recip()?))
    }

    /// `a b / (a + b)`, the combination of two impedances in parallel
    pub fn parallel(&self, x: &PortValue) -> Result<PortValue> {
        let sum = &self.val + &x.val;
        Ok(PortValue::new(
            self.kind,
            (&self.val * &x.val).checked_div(&sum)?,
        ))
    }

    /// Multiply by `s`
    pub fn differentiate(&self) -> PortValue {
        PortValue::new(self.kind, self.val.mul_s())
    }

    /// Divide by `s`
    pub fn integrate(&self) -> PortValue {
        PortValue::new(self.kind, self.val.div_s())
    }

    pub fn scale(&self, k: f64) -> PortValue {
        PortValue::new(self.kind, self.val.scale(c64(k, 0.0)))
    }

    pub fn eval(&self, s: Complex64) -> Complex64 {
        self.val.eval(s)
    }

    /// Same label and approximately equal value
    pub fn approx_eq(&self, other: &PortValue) -> bool {
        self.kind == other.kind && self.val.approx_eq(&other.val)
    }

    pub fn poles(&self) -> Vec<Root> {
        analysis::rational_poles(&self.val)
    }

    pub fn zeros(&self) -> Vec<Root> {
        analysis::rational_zeros(&self.val)
    }

    pub fn residues(&self) -> Residues {
        analysis::rational_residues(&self.val)
    }

    pub fn partfrac(&self) -> PartialFraction {
        analysis::rational_partfrac(&self.val, 0.0)
    }

    pub fn zpk(&self) -> ZeroPoleGain {
        analysis::rational_zpk(&self.val, 0.0)
    }

    pub fn canonical(&self) -> PortValue {
        PortValue {
            kind: self.kind,
            val: self.val.canonical(),
        }
    }

    pub fn initial_value(&self) -> Limit {
        analysis::initial_value(&self.expr())
    }

    pub fn final_value(&self) -> Limit {
        analysis::final_value(&self.expr())
    }

    pub fn inverse_laplace(&self) -> Diagnosed<TimeResponse> {
        analysis::inverse_laplace(&self.expr())
    }

    pub fn frequency_response(&self, freq: &Array1<f64>) -> Array1<Complex64> {
        analysis::frequency_response(&self.expr(), freq)
    }

    pub fn transient_response(&self, t: &Array1<f64>) -> Diagnosed<Array1<f64>> {
        analysis::transient_response(&self.expr(), t)
    }
}

impl<'a> Add<&'a PortValue> for &'a PortValue {
    type Output = PortValue;

    fn add(self, rhs: &'a PortValue) -> PortValue {
        PortValue::new(self.kind, &self.val + &rhs.val)
    }
}

impl<'a> Sub<&'a PortValue> for &'a PortValue {
    type Output = PortValue;

    fn sub(self, rhs: &'a PortValue) -> PortValue {
        PortValue::new(self.kind, &self.val - &rhs.val)
    }
}

impl<'a> Mul<&'a PortValue> for &'a PortValue {
    type Output = PortValue;

    fn mul(self, rhs: &'a PortValue) -> PortValue {
        PortValue::new(self.kind, &self.val * &rhs.val)
    }
}

impl Neg for &PortValue {
    type Output = PortValue;

    fn neg(self) -> PortValue {
        PortValue {
            kind: self.kind,
            val: -&self.val,
        }
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.kind.symbol(), self.val)
    }
}
