//! Local polynomial (Taylor) approximation
//!
//! Series expansion works by repeated symbolic differentiation with numeric
//! coefficient extraction at the center. Functions without a derivative rule
//! (gamma, zeta, Bessel, the piecewise family) report `NoDerivative`; the
//! caller decides whether to rewrite first or fall back to numeric sampling.

use crate::compiler::compile_with_vars;
use crate::expr::{SymExpr, SymExprKind};
use crate::{Result, SymbolicError};

/// Symbolic derivative of `expr` with respect to `var`
pub fn diff(expr: &SymExpr, var: &str) -> Result<SymExpr> {
    match expr.kind.as_ref() {
        SymExprKind::Num(_) => Ok(SymExpr::int(0)),
        SymExprKind::Var(name) => Ok(if name == var {
            SymExpr::int(1)
        } else {
            SymExpr::int(0)
        }),
        SymExprKind::Add(terms) => {
            let mut out = Vec::with_capacity(terms.len());
            for t in terms {
                out.push(diff(t, var)?);
            }
            Ok(SymExpr::add(out))
        }
        SymExprKind::Neg(inner) => Ok(SymExpr::neg(diff(inner, var)?)),
        SymExprKind::Mul(factors) => {
            // Product rule: sum over each factor differentiated in place
            let mut terms = Vec::with_capacity(factors.len());
            for i in 0..factors.len() {
                let mut parts = factors.clone();
                parts[i] = diff(&factors[i], var)?;
                terms.push(SymExpr::mul(parts));
            }
            Ok(SymExpr::add(terms))
        }
        SymExprKind::Pow(base, exp) => {
            if !exp.contains_var(var) {
                // c * b^(c-1) * b'
                Ok(SymExpr::mul(vec![
                    exp.clone(),
                    SymExpr::pow(base.clone(), exp.clone() - SymExpr::int(1)),
                    diff(base, var)?,
                ]))
            } else {
                // f^g * (g' * ln f + g * f' / f)
                let f_prime = diff(base, var)?;
                let g_prime = diff(exp, var)?;
                Ok(SymExpr::mul(vec![
                    expr.clone(),
                    SymExpr::add(vec![
                        SymExpr::mul(vec![g_prime, SymExpr::ln(base.clone())]),
                        SymExpr::div(
                            SymExpr::mul(vec![exp.clone(), f_prime]),
                            base.clone(),
                        ),
                    ]),
                ]))
            }
        }
        SymExprKind::Func(name, args) => {
            if args.len() != 1 {
                return Err(SymbolicError::NoDerivative(name.clone()));
            }
            let u = &args[0];
            let outer = outer_derivative(name, u)?;
            Ok(SymExpr::mul(vec![outer, diff(u, var)?]))
        }
    }
}

/// d/du of a unary function applied to `u`
fn outer_derivative(name: &str, u: &SymExpr) -> Result<SymExpr> {
    let u = u.clone();
    Ok(match name {
        "sin" => SymExpr::cos(u),
        "cos" => SymExpr::neg(SymExpr::sin(u)),
        "tan" => SymExpr::int(1) + SymExpr::pow(SymExpr::tan(u), SymExpr::int(2)),
        "asin" => SymExpr::pow(
            SymExpr::int(1) - SymExpr::pow(u, SymExpr::int(2)),
            SymExpr::rational(-1, 2),
        ),
        "acos" => SymExpr::neg(SymExpr::pow(
            SymExpr::int(1) - SymExpr::pow(u, SymExpr::int(2)),
            SymExpr::rational(-1, 2),
        )),
        "atan" => SymExpr::div(
            SymExpr::int(1),
            SymExpr::int(1) + SymExpr::pow(u, SymExpr::int(2)),
        ),
        "sinh" => SymExpr::cosh(u),
        "cosh" => SymExpr::sinh(u),
        "tanh" => SymExpr::int(1) - SymExpr::pow(SymExpr::tanh(u), SymExpr::int(2)),
        "sec" => SymExpr::sec(u.clone()) * SymExpr::tan(u),
        "csc" => SymExpr::neg(SymExpr::csc(u.clone()) * SymExpr::cot(u)),
        "cot" => SymExpr::neg(
            SymExpr::int(1) + SymExpr::pow(SymExpr::cot(u), SymExpr::int(2)),
        ),
        "exp" => SymExpr::exp(u),
        "ln" | "log" => SymExpr::div(SymExpr::int(1), u),
        "sqrt" => SymExpr::div(
            SymExpr::int(1),
            SymExpr::int(2) * SymExpr::sqrt(u),
        ),
        "erf" => SymExpr::mul(vec![
            SymExpr::div(SymExpr::int(2), SymExpr::sqrt(SymExpr::pi())),
            SymExpr::exp(SymExpr::neg(SymExpr::pow(u, SymExpr::int(2)))),
        ]),
        "sinc" => SymExpr::sub(
            SymExpr::div(SymExpr::cos(u.clone()), u.clone()),
            SymExpr::div(SymExpr::sin(u.clone()), SymExpr::pow(u, SymExpr::int(2))),
        ),
        other => return Err(SymbolicError::NoDerivative(other.to_string())),
    })
}

/// Taylor polynomial of `expr` about `center`, up to and including `order`
///
/// The expression must have no free variables besides `var`. A non-finite
/// value of any derivative at the center is `UndefinedCenter`, so callers
/// can retry at a shifted expansion point.
pub fn taylor(expr: &SymExpr, var: &str, center: f64, order: usize) -> Result<SymExpr> {
    let vars = expr.free_vars();
    if vars.iter().any(|v| v.as_str() != var) {
        return Err(SymbolicError::InvalidOperation(format!(
            "series expansion in {var} of a multivariate expression ({})",
            vars.join(", ")
        )));
    }

    let offset = if center == 0.0 {
        SymExpr::var(var)
    } else {
        SymExpr::var(var) - SymExpr::float(center)
    };

    let mut terms = Vec::with_capacity(order + 1);
    let mut deriv = expr.clone();
    let mut factorial = 1.0f64;
    for k in 0..=order {
        if k > 0 {
            factorial *= k as f64;
        }
        let value = compile_with_vars(&deriv, &[var]).eval(&[center])?;
        if !value.is_finite() {
            return Err(SymbolicError::UndefinedCenter(center));
        }
        let coeff = value / factorial;
        if coeff != 0.0 {
            terms.push(SymExpr::mul(vec![
                SymExpr::float(coeff),
                SymExpr::pow(offset.clone(), SymExpr::int(k as i64)),
            ]));
        }
        if k < order {
            deriv = diff(&deriv, var)?;
        }
    }
    Ok(SymExpr::add(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_with_vars;

    fn eval1(e: &SymExpr, x: f64) -> f64 {
        compile_with_vars(e, &["x"]).eval(&[x]).unwrap()
    }

    #[test]
    fn test_diff_polynomial() {
        // d/dx (x^3 + 2x) = 3x^2 + 2
        let x = SymExpr::var("x");
        let e = SymExpr::pow(x.clone(), SymExpr::int(3)) + SymExpr::int(2) * x;
        let d = diff(&e, "x").unwrap();
        assert!((eval1(&d, 2.0) - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_diff_chain_rule() {
        // d/dx sin(x^2) = 2x cos(x^2)
        let x = SymExpr::var("x");
        let e = SymExpr::sin(SymExpr::pow(x, SymExpr::int(2)));
        let d = diff(&e, "x").unwrap();
        let expected = 2.0 * 1.5 * (1.5f64 * 1.5).cos();
        assert!((eval1(&d, 1.5) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_taylor_exp() {
        // exp(x) to order 6 is accurate near 0
        let e = SymExpr::exp(SymExpr::var("x"));
        let t = taylor(&e, "x", 0.0, 6).unwrap();
        assert!(t.function_set().is_empty());
        assert!((eval1(&t, 0.5) - 0.5f64.exp()).abs() < 1e-4);
    }

    #[test]
    fn test_taylor_sin_has_odd_terms() {
        let e = SymExpr::sin(SymExpr::var("x"));
        let t = taylor(&e, "x", 0.0, 5).unwrap();
        // x - x^3/6 + x^5/120
        assert!((eval1(&t, 0.3) - 0.3f64.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_taylor_at_pole_is_error() {
        // ln(x) has no expansion about 0
        let e = SymExpr::ln(SymExpr::var("x"));
        assert!(matches!(
            taylor(&e, "x", 0.0, 4),
            Err(SymbolicError::UndefinedCenter(_))
        ));
    }

    #[test]
    fn test_taylor_no_rule_is_error() {
        let e = SymExpr::gamma(SymExpr::var("x"));
        assert!(matches!(
            taylor(&e, "x", 2.0, 4),
            Err(SymbolicError::NoDerivative(_))
        ));
    }

    #[test]
    fn test_taylor_shifted_center() {
        // ln(x) about 1: (x-1) - (x-1)^2/2 + ...
        let e = SymExpr::ln(SymExpr::var("x"));
        let t = taylor(&e, "x", 1.0, 6).unwrap();
        assert!((eval1(&t, 1.2) - 1.2f64.ln()).abs() < 1e-5);
    }
}
