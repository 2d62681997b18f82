use super::Polynomial;
use crate::consts::{ABERTH_MAX_ITER, IMAG_SNAP_TOL, NEWTON_MAX_ITER, ROOT_CLUSTER_TOL, STEP_TOL};
use num::Zero;
use num::complex::Complex64;
use std::f64::consts::PI;
use std::fmt;

/// A polynomial root together with its multiplicity
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Root {
    pub value: Complex64,
    pub multiplicity: usize,
}

impl Root {
    pub fn new(value: Complex64, multiplicity: usize) -> Root {
        Root {
            value,
            multiplicity,
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (x{})",
            super::fmt_coeff(&self.value),
            self.multiplicity
        )
    }
}

impl Polynomial {
    /// Roots grouped by multiplicity
    ///
    /// Roots at the origin are split off exactly and degrees one and two use
    /// closed forms. Higher degrees run Aberth-Ehrlich iteration, after which
    /// approximations closer than [`ROOT_CLUSTER_TOL`] are merged and the
    /// merged value is polished by Newton steps on the derivative of order
    /// `multiplicity - 1`.
    pub fn roots(&self) -> Vec<Root> {
        let mut out = vec![];
        if self.is_constant() {
            return out;
        }
        let nzero = self.trailing_zeros();
        if nzero > 0 {
            out.push(Root::new(Complex64::zero(), nzero));
        }
        let reduced = self.shift_down(nzero);
        let approx = match reduced.degree() {
            0 => vec![],
            1 => vec![-reduced.coeff(0) / reduced.coeff(1)],
            2 => quadratic(reduced.coeff(2), reduced.coeff(1), reduced.coeff(0)),
            _ => aberth(&reduced),
        };
        let real = reduced.is_real();
        for (center, multiplicity) in cluster(&approx) {
            let mut value = polish(&reduced, center, multiplicity);
            if real && value.im.abs() <= IMAG_SNAP_TOL * value.norm().max(1.0) {
                value.im = 0.0;
            }
            out.push(Root::new(value, multiplicity));
        }
        out
    }
}

fn quadratic(a: Complex64, b: Complex64, c: Complex64) -> Vec<Complex64> {
    let disc = b * b - a * c * 4.0;
    if disc.is_zero() {
        let r = -b / (a * 2.0);
        return vec![r, r];
    }
    let sq = disc.sqrt();
    let q = match (b.conj() * sq).re >= 0.0 {
        true => -(b + sq) / 2.0,
        false => -(b - sq) / 2.0,
    };
    vec![q / a, c / q]
}

fn aberth(p: &Polynomial) -> Vec<Complex64> {
    let n = p.degree();
    let dp = p.derivative();
    let radius = (p.coeff(0).norm() / p.lc().norm()).powf(1.0 / n as f64);
    let mut z: Vec<Complex64> = (0..n)
        .map(|k| Complex64::from_polar(radius, 2.0 * PI * k as f64 / n as f64 + 0.4))
        .collect();

    for iter in 0..ABERTH_MAX_ITER {
        let mut worst = 0.0_f64;
        for i in 0..n {
            let zi = z[i];
            let pv = p.eval(zi);
            if pv.is_zero() {
                continue;
            }
            let repulsion: Complex64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| (zi - z[j]).inv())
                .sum();
            let w = (dp.eval(zi) / pv - repulsion).inv();
            if !w.is_finite() {
                continue;
            }
            z[i] = zi - w;
            worst = worst.max(w.norm() / zi.norm().max(1.0));
        }
        if worst <= STEP_TOL {
            log::trace!("aberth converged after {} iterations", iter + 1);
            break;
        }
    }
    z
}

/// Single linkage grouping of root approximations
fn cluster(approx: &[Complex64]) -> Vec<(Complex64, usize)> {
    let close = |a: Complex64, b: Complex64| {
        (a - b).norm() <= ROOT_CLUSTER_TOL * a.norm().max(b.norm()).max(1.0)
    };
    let mut assigned = vec![false; approx.len()];
    let mut out = vec![];
    for i in 0..approx.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![approx[i]];
        let mut k = 0;
        while k < members.len() {
            let anchor = members[k];
            for j in 0..approx.len() {
                if !assigned[j] && close(anchor, approx[j]) {
                    assigned[j] = true;
                    members.push(approx[j]);
                }
            }
            k += 1;
        }
        let center = members.iter().sum::<Complex64>() / members.len() as f64;
        out.push((center, members.len()));
    }
    out
}

fn polish(p: &Polynomial, start: Complex64, multiplicity: usize) -> Complex64 {
    let f = p.nth_derivative(multiplicity - 1);
    let df = f.derivative();
    let mut x = start;
    for _ in 0..NEWTON_MAX_ITER {
        let fx = f.eval(x);
        let dfx = df.eval(x);
        if fx.is_zero() || dfx.is_zero() {
            break;
        }
        let step = fx / dfx;
        if !step.is_finite() {
            break;
        }
        x -= step;
        if step.norm() <= STEP_TOL * x.norm().max(1.0) {
            break;
        }
    }
    // Newton wandered off to a root of the derivative that is not ours
    match (x - start).norm() <= ROOT_CLUSTER_TOL * start.norm().max(1.0) {
        true => x,
        false => start,
    }
}
