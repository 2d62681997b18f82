use crate::poly::Root;
use crate::value::PortValue;
use float_cmp::{F64Margin, approx_eq};
use ndarray::prelude::*;
use num::complex::Complex64;

pub fn comp_value(exemplar: &PortValue, calc: &PortValue, test: &str) {
    assert!(
        exemplar.approx_eq(calc),
        " Failed test {}\n  exemplar: {}\n      calc: {}",
        test,
        exemplar,
        calc
    );
}

pub fn comp_roots(exemplar: &[Root], calc: &[Root], precision: F64Margin, test: &str) {
    assert_eq!(
        exemplar.len(),
        calc.len(),
        " Failed test {}: number of roots does not match",
        test
    );
    for (k, e) in exemplar.iter().enumerate() {
        let found = calc.iter().find(|c| {
            c.multiplicity == e.multiplicity
                && approx_eq!(f64, c.value.re, e.value.re, precision)
                && approx_eq!(f64, c.value.im, e.value.im, precision)
        });
        assert!(
            found.is_some(),
            " Failed test {} at location ({})\n  exemplar: {}\n      calc: {:?}",
            test,
            k,
            e,
            calc
        );
    }
}

pub fn comp_array_f64(
    exemplar: &Array1<f64>,
    calc: &Array1<f64>,
    precision: F64Margin,
    test: &str,
) {
    azip!((index i, &e in exemplar, &c in calc) {
        comp_f64(&e, &c, precision, test, format!("({})", i).as_str());
    });
}

pub fn comp_array_c64(
    exemplar: &Array1<Complex64>,
    calc: &Array1<Complex64>,
    precision: F64Margin,
    test: &str,
) {
    azip!((index i, &e in exemplar, &c in calc) {
        comp_c64(&e, &c, precision, test, format!("({})", i).as_str());
    });
}

pub fn comp_c64(
    exemplar: &Complex64,
    calc: &Complex64,
    precision: F64Margin,
    test: &str,
    idx: &str,
) {
    comp_f64(
        &(exemplar.re),
        &(calc.re),
        precision,
        test,
        &(idx.to_owned() + ".re"),
    );
    comp_f64(
        &(exemplar.im),
        &(calc.im),
        precision,
        test,
        &(idx.to_owned() + ".im"),
    );
}

pub fn comp_f64(exemplar: &f64, calc: &f64, precision: F64Margin, test: &str, idx: &str) {
    assert!(
        approx_eq!(f64, *calc, *exemplar, precision),
        " Failed test {} at location {}\n  exemplar: {}\n      calc: {}",
        test,
        idx,
        exemplar,
        calc
    );
}
