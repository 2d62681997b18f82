use super::residue::rational_residues;
use crate::diagnostic::{Diagnosed, Diagnostic, DiagnosticKind};
use crate::expr::{DelayedTerm, Expr};
use crate::rational::Rational;
use ndarray::Array1;
use num::Zero;
use num::complex::Complex64;

/// `sum_k coeffs[k] * tau^k * exp(pole * tau)`
#[derive(Clone, Debug, PartialEq)]
pub struct Mode {
    pub pole: Complex64,
    pub coeffs: Vec<Complex64>,
}

impl Mode {
    pub fn eval(&self, tau: f64) -> Complex64 {
        let envelope = (self.pole * tau).exp();
        self.coeffs
            .iter()
            .enumerate()
            .fold(Complex64::zero(), |acc, (k, c)| acc + *c * tau.powi(k as i32))
            * envelope
    }
}

/// Inverse transform of one delayed rational term, switched on at `delay`
#[derive(Clone, Debug, PartialEq)]
pub struct DelayedResponse {
    pub delay: f64,
    /// `impulses[k]` weights the k-th derivative of the Dirac delta
    pub impulses: Vec<Complex64>,
    pub modes: Vec<Mode>,
}

impl DelayedResponse {
    fn from_rational(ratfun: &Rational, delay: f64) -> DelayedResponse {
        let res = rational_residues(ratfun);
        let mut modes: Vec<Mode> = vec![];
        for term in res.terms.iter() {
            // 1/(s - p)^n transforms to tau^(n-1) exp(p tau) / (n-1)!
            let weight = term.coeff / factorial(term.rank - 1);
            match modes.iter_mut().find(|m| m.pole == term.pole) {
                Some(mode) => {
                    if mode.coeffs.len() < term.rank {
                        mode.coeffs.resize(term.rank, Complex64::zero());
                    }
                    mode.coeffs[term.rank - 1] += weight;
                }
                None => {
                    let mut coeffs = vec![Complex64::zero(); term.rank];
                    coeffs[term.rank - 1] = weight;
                    modes.push(Mode {
                        pole: term.pole,
                        coeffs,
                    });
                }
            }
        }
        DelayedResponse {
            delay,
            impulses: res.quotient.coeffs().to_vec(),
            modes,
        }
    }

    pub fn is_impulsive(&self) -> bool {
        self.impulses.iter().any(|c| !c.is_zero())
    }

    /// Regular part at time `t`, the unit step being one from `t = delay` on
    pub fn eval(&self, t: f64) -> Complex64 {
        let tau = t - self.delay;
        if tau < 0.0 {
            return Complex64::zero();
        }
        self.modes
            .iter()
            .fold(Complex64::zero(), |acc, m| acc + m.eval(tau))
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}

/// Causal time-domain response, a superposition of delayed parts
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeResponse {
    parts: Vec<DelayedResponse>,
}

impl TimeResponse {
    pub fn parts(&self) -> &[DelayedResponse] {
        &self.parts
    }

    pub fn is_impulsive(&self) -> bool {
        self.parts.iter().any(|p| p.is_impulsive())
    }

    /// Regular part of the response at `t`, impulses excluded
    pub fn eval(&self, t: f64) -> Complex64 {
        self.parts
            .iter()
            .fold(Complex64::zero(), |acc, p| acc + p.eval(t))
    }

    /// Real part sampled on a time grid
    pub fn sample(&self, t: &Array1<f64>) -> Array1<f64> {
        t.mapv(|tk| self.eval(tk).re)
    }
}

/// Inverse Laplace transform
///
/// A single delayed rational term is expanded into partial fractions. A sum
/// with distinct delays falls back to transforming each term on its own and
/// superposing the results.
pub fn inverse_laplace(expr: &Expr) -> Diagnosed<TimeResponse> {
    let parts = match expr.as_ratfun_delay() {
        Ok((ratfun, delay)) if !ratfun.is_zero() => {
            vec![DelayedResponse::from_rational(&ratfun, delay)]
        }
        Ok(_) => vec![],
        Err(err) => {
            log::debug!("{}, inverting term by term", err);
            expr.terms()
                .iter()
                .map(|t| DelayedResponse::from_rational(t.ratfun(), t.delay()))
                .collect()
        }
    };
    let response = TimeResponse { parts };
    let mut out = Diagnosed::clean(response);
    if out.value().is_impulsive() {
        out.push(Diagnostic::new(
            DiagnosticKind::ImpulsiveResponse,
            "response has impulses and/or derivatives of impulses",
        ));
    }
    out
}

/// Sample the regular part of the inverse transform on a time grid
pub fn transient_response(expr: &Expr, t: &Array1<f64>) -> Diagnosed<Array1<f64>> {
    let (response, mut diagnostics) = inverse_laplace(expr).into_parts();
    if response.is_impulsive() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnsampledImpulse,
            "impulses are not sampled",
        ));
    }
    Diagnosed::with(response.sample(t), diagnostics)
}

/// Response of a transfer function to a unit impulse
pub fn impulse_response(h: &Expr, t: &Array1<f64>) -> Diagnosed<Array1<f64>> {
    transient_response(h, t)
}

/// Response of a transfer function to a unit step
pub fn step_response(h: &Expr, t: &Array1<f64>) -> Diagnosed<Array1<f64>> {
    let integrated = Expr::new(
        h.terms()
            .iter()
            .map(|term| DelayedTerm::new(term.ratfun().div_s(), term.delay()))
            .collect(),
    );
    transient_response(&integrated, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::Polynomial;
    use crate::util::{comp_c64, comp_f64};
    use float_cmp::F64Margin;
    use ndarray::array;
    use num::complex::c64;

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-9,
        ulps: 4,
    };

    fn ratio(num: &[f64], den: &[f64]) -> Rational {
        Rational::new(Polynomial::from_desc(num), Polynomial::from_desc(den)).unwrap()
    }

    #[test]
    fn test_first_order() {
        let response = inverse_laplace(&Expr::from(ratio(&[1.0], &[1.0, 1.0])));
        assert!(response.is_clean());
        for t in [0.0_f64, 0.5, 2.0] {
            comp_c64(
                &c64((-t).exp(), 0.0),
                &response.value().eval(t),
                MARGIN,
                "first_order",
                &format!("t={}", t),
            );
        }
        comp_c64(&c64(0.0, 0.0), &response.value().eval(-1.0), MARGIN, "first_order", "causal");
    }

    #[test]
    fn test_triple_pole() {
        // 1/(s + 1)^3 is t^2 exp(-t) / 2
        let r = Rational::new(Polynomial::one(), Polynomial::from_desc(&[1.0, 3.0, 3.0, 1.0])).unwrap();
        let response = inverse_laplace(&Expr::from(r)).into_value();
        let t = 1.5_f64;
        comp_f64(
            &(t * t * (-t).exp() / 2.0),
            &response.eval(t).re,
            F64Margin {
                epsilon: 1e-6,
                ulps: 4,
            },
            "triple_pole",
            "t=1.5",
        );
    }

    #[test]
    fn test_oscillator() {
        // 1/(s^2 + 1) is sin(t)
        let response = inverse_laplace(&Expr::from(ratio(&[1.0], &[1.0, 0.0, 1.0])));
        let t = array![0.0, 1.0, 2.5];
        let sampled = response.value().sample(&t);
        for (k, &tk) in t.iter().enumerate() {
            comp_f64(&tk.sin(), &sampled[k], MARGIN, "oscillator", &format!("({})", k));
        }
    }

    #[test]
    fn test_delay_and_impulse() {
        // (s + 2) / (s + 1) exp(-s) = delta(t - 1) + exp(-(t - 1)) u(t - 1)
        let e = &Expr::from(ratio(&[1.0, 2.0], &[1.0, 1.0])) * &Expr::delay(1.0);
        let response = inverse_laplace(&e);
        assert!(response.has(DiagnosticKind::ImpulsiveResponse));
        let part = &response.value().parts()[0];
        assert_eq!(part.impulses, vec![c64(1.0, 0.0)]);
        comp_c64(&c64(0.0, 0.0), &response.value().eval(0.5), MARGIN, "delay", "before");
        comp_c64(&c64((-1.0_f64).exp(), 0.0), &response.value().eval(2.0), MARGIN, "delay", "after");

        let sampled = transient_response(&e, &array![2.0]);
        assert!(sampled.has(DiagnosticKind::UnsampledImpulse));
    }

    #[test]
    fn test_superposition_fallback() {
        // (1 - exp(-s)) / s is a unit pulse of width one
        let step = Expr::from(ratio(&[1.0], &[1.0, 0.0]));
        let pulse = &step - &(&step * &Expr::delay(1.0));
        let response = inverse_laplace(&pulse).into_value();
        assert_eq!(response.parts().len(), 2);
        comp_c64(&c64(1.0, 0.0), &response.eval(0.5), MARGIN, "pulse", "inside");
        comp_c64(&c64(0.0, 0.0), &response.eval(1.5), MARGIN, "pulse", "after");
    }

    #[test]
    fn test_step_response() {
        let h = Expr::from(ratio(&[1.0], &[1.0, 1.0]));
        let t = array![0.0, 1.0, 3.0];
        let step = step_response(&h, &t);
        assert!(step.is_clean());
        for (k, &tk) in t.iter().enumerate() {
            comp_f64(&(1.0 - (-tk).exp()), &step.value()[k], MARGIN, "step", &format!("({})", k));
        }
        let impulse = impulse_response(&h, &t).into_value();
        comp_f64(&(-1.0_f64).exp(), &impulse[1], MARGIN, "impulse", "(1)");
    }
}
