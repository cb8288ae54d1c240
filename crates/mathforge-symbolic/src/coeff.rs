//! Coefficient representation for symbolic expressions
//!
//! Coefficients stay exact rationals as long as the arithmetic fits in
//! `i64`; anything larger or transcendental falls back to floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Greatest common divisor using the Euclidean algorithm
fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a.max(1)
}

/// A numeric coefficient in a symbolic expression
///
/// Invariant for `Rational(n, d)`: `d > 0` and `gcd(n, d) == 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Coefficient {
    /// Exact rational number (numerator, denominator)
    Rational(i64, i64),
    /// Floating-point approximation
    Float(f64),
}

impl Coefficient {
    /// Create an integer coefficient
    pub fn int(n: i64) -> Self {
        Coefficient::Rational(n, 1)
    }

    /// Create a rational coefficient, reducing and normalizing sign
    pub fn rational(num: i64, den: i64) -> Self {
        if den == 0 {
            return Coefficient::Float(if num >= 0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            });
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num, den);
        Coefficient::Rational(num / g, den / g)
    }

    /// Create a floating-point coefficient
    pub fn float(f: f64) -> Self {
        Coefficient::Float(f)
    }

    /// Convert an `f64` to an exact integer coefficient when possible
    pub fn from_f64_exact(f: f64) -> Self {
        if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
            Coefficient::int(f as i64)
        } else {
            Coefficient::Float(f)
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coefficient::Rational(n, _) => *n == 0,
            Coefficient::Float(f) => *f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Coefficient::Rational(n, d) => *n == 1 && *d == 1,
            Coefficient::Float(f) => (*f - 1.0).abs() < 1e-15,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Coefficient::Rational(n, _) => *n < 0,
            Coefficient::Float(f) => *f < 0.0,
        }
    }

    /// The exact integer value, if this coefficient is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Coefficient::Rational(n, d) if *d == 1 => Some(*n),
            Coefficient::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Coefficient::Rational(n, d) => *n as f64 / *d as f64,
            Coefficient::Float(f) => *f,
        }
    }

    /// Power with integer exponent, staying exact where possible
    pub fn pow_int(&self, exp: i32) -> Self {
        if exp == 0 {
            return Coefficient::int(1);
        }
        if exp < 0 {
            return Coefficient::int(1) / self.pow_int(-exp);
        }
        match self {
            Coefficient::Rational(n, d) => {
                let e = exp as u32;
                if let (Some(num), Some(den)) = (n.checked_pow(e), d.checked_pow(e)) {
                    Coefficient::Rational(num, den)
                } else {
                    Coefficient::Float(self.to_f64().powi(exp))
                }
            }
            Coefficient::Float(f) => Coefficient::Float(f.powi(exp)),
        }
    }

    pub fn abs(&self) -> Self {
        match self {
            Coefficient::Rational(n, d) => Coefficient::Rational(n.abs(), *d),
            Coefficient::Float(f) => Coefficient::Float(f.abs()),
        }
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => n1 == n2 && d1 == d2,
            (Coefficient::Float(f1), Coefficient::Float(f2)) => {
                (f1 - f2).abs() < 1e-15 || (f1.is_nan() && f2.is_nan())
            }
            _ => (self.to_f64() - other.to_f64()).abs() < 1e-15,
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::int(0)
    }
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Coefficient::int(n)
    }
}

impl From<f64> for Coefficient {
    fn from(f: f64) -> Self {
        Coefficient::from_f64_exact(f)
    }
}

impl Neg for Coefficient {
    type Output = Coefficient;

    fn neg(self) -> Self::Output {
        match self {
            Coefficient::Rational(n, d) => Coefficient::Rational(-n, d),
            Coefficient::Float(f) => Coefficient::Float(-f),
        }
    }
}

impl Add for Coefficient {
    type Output = Coefficient;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => {
                if let (Some(nd1), Some(nd2), Some(dd)) =
                    (n1.checked_mul(d2), n2.checked_mul(d1), d1.checked_mul(d2))
                {
                    if let Some(num) = nd1.checked_add(nd2) {
                        return Coefficient::rational(num, dd);
                    }
                }
                Coefficient::Float(n1 as f64 / d1 as f64 + n2 as f64 / d2 as f64)
            }
            (a, b) => Coefficient::Float(a.to_f64() + b.to_f64()),
        }
    }
}

impl Sub for Coefficient {
    type Output = Coefficient;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Coefficient {
    type Output = Coefficient;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => {
                // Cross-reduce first to keep the intermediate products small
                let g1 = gcd(n1, d2);
                let g2 = gcd(n2, d1);
                let (n1, d2) = (n1 / g1, d2 / g1);
                let (n2, d1) = (n2 / g2, d1 / g2);
                if let (Some(num), Some(den)) = (n1.checked_mul(n2), d1.checked_mul(d2)) {
                    Coefficient::rational(num, den)
                } else {
                    Coefficient::Float(n1 as f64 * n2 as f64 / (d1 as f64 * d2 as f64))
                }
            }
            (a, b) => Coefficient::Float(a.to_f64() * b.to_f64()),
        }
    }
}

impl Div for Coefficient {
    type Output = Coefficient;

    fn div(self, rhs: Self) -> Self::Output {
        match rhs {
            Coefficient::Rational(n, d) => self * Coefficient::rational(d, n),
            Coefficient::Float(f) => Coefficient::Float(self.to_f64() / f),
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Rational(n, d) => {
                if *d == 1 {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Coefficient::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_arithmetic() {
        let a = Coefficient::rational(1, 2);
        let b = Coefficient::rational(1, 3);

        assert_eq!(a.clone() + b.clone(), Coefficient::rational(5, 6));
        assert_eq!(a.clone() * b.clone(), Coefficient::rational(1, 6));
        assert_eq!(a / b, Coefficient::rational(3, 2));
    }

    #[test]
    fn test_reduction_and_sign() {
        assert_eq!(Coefficient::rational(4, 6), Coefficient::rational(2, 3));
        assert_eq!(Coefficient::rational(1, -2), Coefficient::rational(-1, 2));
    }

    #[test]
    fn test_power() {
        let a = Coefficient::rational(2, 3);
        assert_eq!(a.pow_int(2), Coefficient::rational(4, 9));
        assert_eq!(a.pow_int(-1), Coefficient::rational(3, 2));
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(Coefficient::int(4).as_integer(), Some(4));
        assert_eq!(Coefficient::rational(1, 2).as_integer(), None);
        assert_eq!(Coefficient::float(3.0).as_integer(), Some(3));
    }
}
