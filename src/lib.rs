pub mod analysis;
pub mod consts;
pub mod diagnostic;
pub mod element;
pub mod error;
pub mod expr;
pub mod matrix;
pub mod network;
pub mod oneport;
pub mod poly;
pub mod prelude;
pub mod rational;
pub mod scale;
pub mod threeport;
pub mod twoport;
pub mod util;
pub mod value;

/// Create a **[`Polynomial`](crate::poly::Polynomial)** in `s` from real
/// coefficients, highest power first.
///
/// ```
/// use lcnet::poly;
/// let p = poly![10.0, 2.0, 1.0, 0.0];
///
/// assert_eq!(p.degree(), 3);
/// ```
#[macro_export]
macro_rules! poly {
    ($($x:expr),+ $(,)*) => {{
        $crate::poly::Polynomial::from_desc(&[$($x as f64,)*])
    }};
}

/// Create a **[`Rational`](crate::rational::Rational)** from real numerator
/// and denominator coefficients, highest power first.
///
/// ```
/// use lcnet::ratfun;
/// let r = ratfun![[1.0]; [1.0, 1.0]].unwrap();
///
/// assert_eq!(r.den().degree(), 1);
/// ```
///
/// Returns an error when the denominator is zero.
#[macro_export]
macro_rules! ratfun {
    ([$($n:expr),+ $(,)*]; [$($d:expr),+ $(,)*]) => {{
        $crate::rational::Rational::new(
            $crate::poly::Polynomial::from_desc(&[$($n as f64,)*]),
            $crate::poly::Polynomial::from_desc(&[$($d as f64,)*]),
        )
    }};
}
