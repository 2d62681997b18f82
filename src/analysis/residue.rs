use crate::error::Result;
use crate::expr::{DelayedTerm, Expr};
use crate::poly::{Polynomial, Root};
use crate::rational::Rational;
use num::Zero;
use num::complex::Complex64;

/// Coefficient of `1 / (s - pole)^rank` in a partial fraction expansion
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResidueTerm {
    pub pole: Complex64,
    pub rank: usize,
    pub coeff: Complex64,
}

impl ResidueTerm {
    /// `coeff / (s - pole)^rank`
    pub fn ratfun(&self) -> Rational {
        Rational::new(
            Polynomial::constant(self.coeff),
            Polynomial::from_root(self.pole, self.rank),
        )
        .unwrap_or_else(|_| Rational::zero())
    }
}

/// Residues of every pole plus the polynomial part of an improper function
#[derive(Clone, Debug, PartialEq)]
pub struct Residues {
    pub terms: Vec<ResidueTerm>,
    pub quotient: Polynomial,
}

impl Residues {
    /// Residues of `pole` ordered by rank, empty if it is not a pole
    pub fn at(&self, pole: Complex64) -> Vec<ResidueTerm> {
        self.terms
            .iter()
            .filter(|t| t.pole == pole)
            .copied()
            .collect()
    }
}

/// Partial fraction expansion, optionally delayed
#[derive(Clone, Debug, PartialEq)]
pub struct PartialFraction {
    pub quotient: Polynomial,
    pub terms: Vec<ResidueTerm>,
    pub delay: f64,
}

impl PartialFraction {
    pub fn ratfun(&self) -> Rational {
        self.terms
            .iter()
            .fold(Rational::from_poly(self.quotient.clone()), |acc, t| {
                &acc + &t.ratfun()
            })
    }

    /// Recombine into `(Q(s) + sum_k r_k / (s - p_k)^n_k) * exp(-delay * s)`
    pub fn to_expr(&self) -> Expr {
        Expr::new(vec![DelayedTerm::new(self.ratfun(), self.delay)])
    }
}

/// Residues of a rational function
///
/// The function is cancelled first, so removable singularities are not
/// reported. For a pole `p` of multiplicity `m` the rank `n` coefficient is
/// `g^(m-n)(p) / (m-n)!` with `g = (s - p)^m R(s)`, read off the Taylor
/// series of the numerator over the remaining denominator factors.
pub fn rational_residues(r: &Rational) -> Residues {
    let r = r.cancel();
    let (quotient, proper) = r.split_strictly_proper();
    let num = proper.num();
    let den = proper.den();
    let poles = den.roots();

    let mut terms = vec![];
    for (idx, pole) in poles.iter().enumerate() {
        let others = poles
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != idx)
            .fold(Polynomial::constant(den.lc()), |acc, (_, q)| {
                &acc * &Polynomial::from_root(q.value, q.multiplicity)
            });
        let series = series_quotient(
            &num.taylor_shift(pole.value),
            &others.taylor_shift(pole.value),
            pole.multiplicity,
        );
        for rank in 1..=pole.multiplicity {
            terms.push(ResidueTerm {
                pole: pole.value,
                rank,
                coeff: series[pole.multiplicity - rank],
            });
        }
    }
    Residues { terms, quotient }
}

/// First `n` coefficients of the power series `a(x) / b(x)`, `b(0) != 0`
fn series_quotient(a: &Polynomial, b: &Polynomial, n: usize) -> Vec<Complex64> {
    let b0_inv = b.coeff(0).inv();
    let mut c: Vec<Complex64> = Vec::with_capacity(n);
    for k in 0..n {
        let acc = (1..=k).fold(a.coeff(k), |acc, j| acc - b.coeff(j) * c[k - j]);
        c.push(acc * b0_inv);
    }
    c
}

/// Residues of an undelayed rational expression
pub fn residues(expr: &Expr) -> Result<Residues> {
    Ok(rational_residues(&expr.as_ratfun()?))
}

pub fn rational_partfrac(r: &Rational, delay: f64) -> PartialFraction {
    let Residues { terms, quotient } = rational_residues(r);
    PartialFraction {
        quotient,
        terms,
        delay,
    }
}

/// Partial fraction expansion keeping any single delay factor
pub fn partfrac(expr: &Expr) -> Result<PartialFraction> {
    let (ratfun, delay) = expr.as_ratfun_delay()?;
    Ok(rational_partfrac(&ratfun, delay))
}

/// Poles of the cancelled rational part
pub fn rational_poles(r: &Rational) -> Vec<Root> {
    r.cancel().den().roots()
}

/// Zeros of the cancelled rational part
pub fn rational_zeros(r: &Rational) -> Vec<Root> {
    let r = r.cancel();
    match r.is_zero() {
        true => vec![],
        false => r.num().roots(),
    }
}

/// Sum of all rank 1 residues, zero for a strictly proper function whose
/// denominator exceeds the numerator by two or more degrees
pub fn residue_sum(res: &Residues) -> Complex64 {
    res.terms
        .iter()
        .filter(|t| t.rank == 1)
        .fold(Complex64::zero(), |acc, t| acc + t.coeff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::comp_c64;
    use float_cmp::F64Margin;
    use num::complex::c64;

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-9,
        ulps: 4,
    };

    fn ratio(num: &[f64], den: &[f64]) -> Rational {
        Rational::new(Polynomial::from_desc(num), Polynomial::from_desc(den)).unwrap()
    }

    #[test]
    fn test_simple_poles() {
        // 1 / ((s + 1)(s + 2)) = 1/(s + 1) - 1/(s + 2)
        let res = rational_residues(&ratio(&[1.0], &[1.0, 3.0, 2.0]));
        assert!(res.quotient.is_zero());
        let at1 = res.at(c64(-1.0, 0.0));
        let at2 = res.at(c64(-2.0, 0.0));
        comp_c64(&c64(1.0, 0.0), &at1[0].coeff, MARGIN, "simple", "r(-1)");
        comp_c64(&c64(-1.0, 0.0), &at2[0].coeff, MARGIN, "simple", "r(-2)");
        comp_c64(&c64(0.0, 0.0), &residue_sum(&res), MARGIN, "simple", "sum");
    }

    #[test]
    fn test_repeated_pole() {
        // 1 / ((s + 1)^2 (s + 2)) = 1/(s+1)^2 - 1/(s+1) + 1/(s+2)
        let r = ratio(&[1.0], &[1.0, 4.0, 5.0, 2.0]);
        let res = rational_residues(&r);
        let double = res
            .terms
            .iter()
            .filter(|t| (t.pole - c64(-1.0, 0.0)).norm() < 1e-9)
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(double.len(), 2);
        assert_eq!(double[0].rank, 1);
        comp_c64(&c64(-1.0, 0.0), &double[0].coeff, MARGIN, "repeated", "rank1");
        comp_c64(&c64(1.0, 0.0), &double[1].coeff, MARGIN, "repeated", "rank2");
        assert!(rational_partfrac(&r, 0.0).ratfun().approx_eq(&r));
    }

    #[test]
    fn test_improper() {
        let r = ratio(&[1.0, 3.0, 1.0], &[1.0, 1.0]);
        let pf = rational_partfrac(&r, 0.0);
        assert_eq!(pf.quotient, Polynomial::from_desc(&[1.0, 2.0]));
        assert_eq!(pf.terms.len(), 1);
        comp_c64(&c64(-1.0, 0.0), &pf.terms[0].coeff, MARGIN, "improper", "r");
        assert!(pf.ratfun().approx_eq(&r));
    }

    #[test]
    fn test_removable_singularity() {
        let r = ratio(&[1.0, 1.0], &[1.0, 3.0, 2.0]);
        assert_eq!(rational_poles(&r).len(), 1);
        assert!(rational_zeros(&r).is_empty());
    }

    #[test]
    fn test_residues_reject_delay() {
        let e = &Expr::from(ratio(&[1.0], &[1.0, 1.0])) * &Expr::delay(1.0);
        assert!(residues(&e).is_err());
        let pf = partfrac(&e).unwrap();
        assert_eq!(pf.delay, 1.0);
        assert!(pf.to_expr().approx_eq(&e));
    }
}
