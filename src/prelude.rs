//! lcnet prelude.
//!
//! This module contains the most used types, traits and functions that you
//! can import easily as a group.
//!
//! ```
//! use lcnet::prelude::*;
//!
//! let out = OnePort::resistor(2.0).series(&OnePort::voltage_source(5.0)).unwrap();
//! assert!(out.is_thevenin());
//! ```

#[doc(no_inline)]
pub use crate::analysis::{
    DcGainForm, PartialFraction, ResidueTerm, Residues, TimeResponse, ZeroPoleGain,
    final_value, frequency_response, impulse_response, initial_value, inverse_laplace, partfrac,
    poles, residues, step_response, transient_response, zeros, zpk,
};

#[doc(no_inline)]
pub use crate::diagnostic::{Diagnosed, Diagnostic, DiagnosticKind};

#[doc(no_inline)]
pub use crate::element::{ElemType, Element, ElementBuilder};

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::expr::{DelayedTerm, Expr};

#[doc(no_inline)]
pub use crate::matrix::PortMatrix;

#[doc(no_inline)]
pub use crate::network::NetworkRef;

#[doc(no_inline)]
pub use crate::oneport::{Load, OnePort, delta_to_wye, wye_to_delta};

#[doc(no_inline)]
pub use crate::poly::{Polynomial, Root};

#[doc(no_inline)]
pub use crate::rational::{Limit, Rational};

#[doc(no_inline)]
pub use crate::scale::{Scale, parse_value};

#[doc(no_inline)]
pub use crate::threeport::ThreePort;

#[doc(no_inline)]
pub use crate::twoport::{Form, TwoPort};

#[doc(no_inline)]
pub use crate::value::{PortValue, Quantity};
