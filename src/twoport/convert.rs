//! Conversions between the six two-port parameter sets and between their
//! internal source pairs.
//!
//! Matrix conventions, with `x = [V1, I1]` at port 1 and `[V2, I2]` at
//! port 2 and currents flowing into the network:
//!
//! | form | relation                        |
//! |------|---------------------------------|
//! | A    | `[V1, I1] = A [V2, -I2]`        |
//! | B    | `[V2, -I2] = B [V1, I1] + [V2b, I2b]` |
//! | G    | `[I1, V2] = G [V1, I2]`         |
//! | H    | `[V1, I2] = H [I1, V2]`         |
//! | Y    | `[I1, I2] = Y [V1, V2] + [I1y, I2y]` |
//! | Z    | `[V1, V2] = Z [I1, I2] + [V1z, V2z]` |

use super::Form;
use crate::diagnostic::{Diagnosed, Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::matrix::PortMatrix;
use crate::rational::Rational;
use std::fmt;

#[derive(Clone, Copy, Debug)]
enum Term {
    M11,
    M12,
    M21,
    M22,
    Det,
    One,
}

use self::Term::{Det, M11, M12, M21, M22, One};

/// Denominator and signed numerators, in row order, of a direct conversion
fn rule(from: Form, to: Form) -> Option<(Term, [(f64, Term); 4])> {
    let rule = match (from, to) {
        (Form::A, Form::G) => (M11, [(1.0, M21), (-1.0, Det), (1.0, One), (1.0, M12)]),
        (Form::A, Form::H) => (M22, [(1.0, M12), (1.0, Det), (-1.0, One), (1.0, M21)]),
        (Form::A, Form::Y) => (M12, [(1.0, M22), (-1.0, Det), (-1.0, One), (1.0, M11)]),
        (Form::A, Form::Z) => (M21, [(1.0, M11), (1.0, Det), (1.0, One), (1.0, M22)]),
        (Form::B, Form::G) => (M22, [(-1.0, M21), (-1.0, One), (1.0, Det), (-1.0, M12)]),
        (Form::B, Form::H) => (M11, [(-1.0, M12), (1.0, One), (-1.0, Det), (-1.0, M21)]),
        (Form::B, Form::Y) => (M12, [(-1.0, M11), (1.0, One), (1.0, Det), (-1.0, M22)]),
        (Form::B, Form::Z) => (M21, [(-1.0, M22), (-1.0, One), (-1.0, Det), (-1.0, M11)]),
        (Form::G, Form::A) => (M21, [(1.0, One), (1.0, M22), (1.0, M11), (1.0, Det)]),
        (Form::G, Form::B) => (M12, [(-1.0, Det), (1.0, M22), (1.0, M11), (-1.0, One)]),
        (Form::G, Form::Y) => (M22, [(1.0, Det), (1.0, M12), (-1.0, M21), (1.0, One)]),
        (Form::G, Form::Z) => (M11, [(1.0, One), (-1.0, M12), (1.0, M21), (1.0, Det)]),
        (Form::H, Form::A) => (M21, [(-1.0, Det), (-1.0, M11), (-1.0, M22), (-1.0, One)]),
        (Form::H, Form::B) => (M12, [(1.0, One), (-1.0, M11), (-1.0, M22), (1.0, Det)]),
        (Form::H, Form::Y) => (M11, [(1.0, One), (-1.0, M12), (1.0, M21), (1.0, Det)]),
        (Form::H, Form::Z) => (M22, [(1.0, Det), (1.0, M12), (-1.0, M21), (1.0, One)]),
        (Form::Y, Form::A) => (M21, [(-1.0, M22), (-1.0, One), (-1.0, Det), (-1.0, M11)]),
        (Form::Y, Form::B) => (M12, [(-1.0, M11), (1.0, One), (1.0, Det), (-1.0, M22)]),
        (Form::Y, Form::G) => (M22, [(1.0, Det), (1.0, M12), (-1.0, M21), (1.0, One)]),
        (Form::Y, Form::H) => (M11, [(1.0, One), (-1.0, M12), (1.0, M21), (1.0, Det)]),
        (Form::Z, Form::A) => (M21, [(1.0, M11), (1.0, Det), (1.0, One), (1.0, M22)]),
        (Form::Z, Form::B) => (M12, [(1.0, M22), (-1.0, Det), (-1.0, One), (1.0, M11)]),
        (Form::Z, Form::G) => (M11, [(1.0, One), (-1.0, M12), (1.0, M21), (1.0, Det)]),
        (Form::Z, Form::H) => (M22, [(1.0, Det), (1.0, M12), (-1.0, M21), (1.0, One)]),
        _ => return None,
    };
    Some(rule)
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            M11 => "11",
            M12 => "12",
            M21 => "21",
            M22 => "22",
            Det => ".det",
            One => ".1",
        };
        write!(f, "{}", label)
    }
}

fn term(m: &PortMatrix, det: &Rational, t: Term) -> Rational {
    match t {
        M11 => m[(0, 0)].clone(),
        M12 => m[(0, 1)].clone(),
        M21 => m[(1, 0)].clone(),
        M22 => m[(1, 1)].clone(),
        Det => det.clone(),
        One => Rational::one(),
    }
}

fn is_inverse_pair(from: Form, to: Form) -> bool {
    matches!(
        (from, to),
        (Form::A, Form::B)
            | (Form::B, Form::A)
            | (Form::G, Form::H)
            | (Form::H, Form::G)
            | (Form::Y, Form::Z)
            | (Form::Z, Form::Y)
    )
}

/// Parameter matrix of `to` from the matrix `m` of `from`
///
/// Dividing by an identically zero entry fails with
/// [`Error::SingularConversion`]. A result with a vanishing determinant has
/// lost information about the network and is flagged as a
/// [`DiagnosticKind::DegenerateConversion`].
pub(crate) fn convert_matrix(from: Form, to: Form, m: &PortMatrix) -> Result<Diagnosed<PortMatrix>> {
    if from == to {
        return Ok(Diagnosed::clean(m.clone()));
    }
    let out = if is_inverse_pair(from, to) {
        m.inv().map_err(|_| {
            Error::SingularConversion(format!("{} to {} with det({}) = 0", from, to, from))
        })?
    } else {
        let (den_term, entries) = rule(from, to).ok_or_else(|| {
            Error::UnsupportedOperation(format!("{} to {} conversion", from, to))
        })?;
        let det = m.det();
        let den = term(m, &det, den_term);
        if den.is_zero() {
            return Err(Error::SingularConversion(format!(
                "{} to {} divides by {}{} = 0",
                from, to, from, den_term
            )));
        }
        let den_inv = den.recip()?;
        let mut vals = entries
            .iter()
            .map(|(sign, t)| term(m, &det, *t).scale((*sign).into()) * &den_inv);
        let mut next = || vals.next().unwrap_or_else(Rational::zero);
        PortMatrix::from_entries(next(), next(), next(), next())
    };
    let mut result = Diagnosed::clean(out.cancel());
    if result.value().is_singular() {
        result.push(Diagnostic::new(
            DiagnosticKind::DegenerateConversion,
            format!("{} to {} conversion gives det({}) = 0", from, to, to),
        ));
    }
    Ok(result)
}

const V1: usize = 0;
const I1: usize = 1;
const V2: usize = 2;
const I2: usize = 3;

/// Dependent and independent port variables of a form, as indices into
/// `[V1, I1, V2, I2]` flagged when negated. The A form shares the B pair.
fn port_vars(form: Form) -> ([(usize, bool); 2], [(usize, bool); 2]) {
    match form {
        Form::A => ([(V1, false), (I1, false)], [(V2, false), (I2, true)]),
        Form::B => ([(V2, false), (I2, true)], [(V1, false), (I1, false)]),
        Form::G => ([(I1, false), (V2, false)], [(V1, false), (I2, false)]),
        Form::H => ([(V1, false), (I2, false)], [(I1, false), (V2, false)]),
        Form::Y => ([(I1, false), (I2, false)], [(V1, false), (V2, false)]),
        Form::Z => ([(V1, false), (V2, false)], [(I1, false), (I2, false)]),
    }
}

fn signed(x: &Rational, negated: bool) -> Rational {
    match negated {
        true => -x,
        false => x.clone(),
    }
}

/// Source pair of `to` from the pair `src` of `from`
///
/// `m` is the parameter matrix of `from`. The pair of `to` is the value of
/// its dependent variables with its independent variables zeroed, found by
/// solving the two port equations of `from` for them. This only needs the
/// `to` relation to exist, so unilateral networks convert between every
/// form they have. For H this gives `I2h = B21 V2b / B11 - I2b` with
/// currents into the network.
pub(crate) fn convert_sources(
    from: Form,
    to: Form,
    m: &PortMatrix,
    src: &[Rational; 2],
) -> Result<[Rational; 2]> {
    let (dep, indep) = port_vars(from);
    // A form: [V1, I1] - A [V2, -I2] = -A [V2b, I2b]
    let rhs = match from {
        Form::A => {
            let r = m.dot_vec(src);
            [-&r[0], -&r[1]]
        }
        _ => src.clone(),
    };
    // rows of `dep - M indep = rhs` over [V1, I1, V2, I2]
    let mut coef: [[Rational; 4]; 2] =
        std::array::from_fn(|_| std::array::from_fn(|_| Rational::zero()));
    for (r, row) in coef.iter_mut().enumerate() {
        let (k, neg) = dep[r];
        row[k] = signed(&Rational::one(), neg);
        for (c, &(k, neg)) in indep.iter().enumerate() {
            row[k] = &row[k] - &signed(&m[(r, c)], neg);
        }
    }

    let target = match to {
        Form::A => Form::B,
        other => other,
    };
    let [(u0, n0), (u1, n1)] = port_vars(target).0;
    let (k00, k01) = (&coef[0][u0], &coef[0][u1]);
    let (k10, k11) = (&coef[1][u0], &coef[1][u1]);
    let det = &(k00 * k11) - &(k01 * k10);
    if det.is_zero() {
        return Err(Error::SingularConversion(format!(
            "{} sources have no {} equivalent",
            from, to
        )));
    }
    let w0 = (&(&rhs[0] * k11) - &(k01 * &rhs[1])).checked_div(&det)?;
    let w1 = (&(k00 * &rhs[1]) - &(k10 * &rhs[0])).checked_div(&det)?;
    Ok([signed(&w0, n0).cancel(), signed(&w1, n1).cancel()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(m11: f64, m12: f64, m21: f64, m22: f64) -> PortMatrix {
        PortMatrix::from_entries(m11.into(), m12.into(), m21.into(), m22.into())
    }

    const FORMS: [Form; 6] = [Form::A, Form::B, Form::G, Form::H, Form::Y, Form::Z];

    #[test]
    fn test_all_pairs_round_trip() {
        let a = real(1.5, 1.0, 0.5, 1.0);
        for &to in FORMS.iter() {
            let there = convert_matrix(Form::A, to, &a).unwrap().into_value();
            for &back in FORMS.iter() {
                let other = convert_matrix(to, back, &there).unwrap().into_value();
                let direct = convert_matrix(Form::A, back, &a).unwrap().into_value();
                assert!(other.approx_eq(&direct), "A -> {} -> {}", to, back);
            }
        }
    }

    #[test]
    fn test_a_to_h() {
        // H11 = A12 / A22, H12 = det / A22, H21 = -1 / A22, H22 = A21 / A22
        let a = real(1.5, 1.0, 0.5, 2.0);
        let h = convert_matrix(Form::A, Form::H, &a).unwrap().into_value();
        assert!(h.approx_eq(&real(0.5, 1.25, -0.5, 0.25)));
    }

    #[test]
    fn test_singular() {
        // series element, A21 = 0
        let a = real(1.0, 2.0, 0.0, 1.0);
        assert!(matches!(
            convert_matrix(Form::A, Form::Z, &a),
            Err(Error::SingularConversion(_))
        ));
        let y = convert_matrix(Form::A, Form::Y, &a).unwrap();
        assert!(y.has(DiagnosticKind::DegenerateConversion));
    }

    #[test]
    fn test_sources_between_forms() {
        let b = real(2.0, -1.0, -2.0, 1.5);
        let src = [Rational::real(-8.0), Rational::real(12.0)];
        let z = convert_matrix(Form::B, Form::Z, &b).unwrap().into_value();
        let vz = convert_sources(Form::B, Form::Z, &b, &src).unwrap();
        assert!(vz[0].approx_eq(&Rational::real(6.0)));
        assert!(vz[1].approx_eq(&Rational::real(4.0)));
        let back = convert_sources(Form::Z, Form::B, &z, &vz).unwrap();
        assert!(back[0].approx_eq(&src[0]));
        assert!(back[1].approx_eq(&src[1]));
        let a = convert_matrix(Form::B, Form::A, &b).unwrap().into_value();
        let shared = convert_sources(Form::A, Form::Z, &a, &src).unwrap();
        assert!(shared[0].approx_eq(&vz[0]));
        assert!(shared[1].approx_eq(&vz[1]));
    }

    #[test]
    fn test_unilateral_sources() {
        // H12 = 0 has no B form
        let h = real(1.0, 0.0, 2.0, 0.5);
        let src = [Rational::real(1.0), Rational::zero()];
        let vz = convert_sources(Form::H, Form::Z, &h, &src).unwrap();
        assert!(vz[0].approx_eq(&Rational::real(1.0)));
        assert!(vz[1].is_zero());
        let iy = convert_sources(Form::H, Form::Y, &h, &src).unwrap();
        assert!(iy[0].approx_eq(&Rational::real(-1.0)));
        assert!(iy[1].approx_eq(&Rational::real(-2.0)));
        assert!(matches!(
            convert_sources(Form::H, Form::B, &h, &src),
            Err(Error::SingularConversion(_))
        ));
    }
}
