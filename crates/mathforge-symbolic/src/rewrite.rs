//! Exact basis rewrites between function families
//!
//! Each rewrite is a pure structural pass: it maps a function application
//! onto an equivalent form in a different basis and leaves everything it
//! does not recognize untouched. The plotting fallback chain uses these to
//! move an expression into the renderer's supported function set before
//! resorting to lossy approximation.

use crate::expr::{SymExpr, SymExprKind};

/// Target basis for a rewrite pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteBasis {
    /// Hyperbolic functions in terms of `exp`
    Exponential,
    /// Reciprocal trigonometric functions in terms of `sin`/`cos`
    Trig,
    /// `gamma` replaced by Stirling's form `sqrt(2*pi/u) * (u/e)^u`
    Stirling,
}

/// Rewrite `expr` into `basis`, recursively
pub fn rewrite(expr: &SymExpr, basis: RewriteBasis) -> SymExpr {
    let mapped = match expr.kind.as_ref() {
        SymExprKind::Num(_) | SymExprKind::Var(_) => return expr.clone(),
        SymExprKind::Add(terms) => {
            SymExpr::add(terms.iter().map(|t| rewrite(t, basis)).collect())
        }
        SymExprKind::Mul(factors) => {
            SymExpr::mul(factors.iter().map(|f| rewrite(f, basis)).collect())
        }
        SymExprKind::Pow(b, e) => SymExpr::pow(rewrite(b, basis), rewrite(e, basis)),
        SymExprKind::Neg(inner) => SymExpr::neg(rewrite(inner, basis)),
        SymExprKind::Func(name, args) => {
            let args: Vec<SymExpr> = args.iter().map(|a| rewrite(a, basis)).collect();
            return rewrite_func(name, args, basis);
        }
    };
    mapped
}

fn rewrite_func(name: &str, mut args: Vec<SymExpr>, basis: RewriteBasis) -> SymExpr {
    if args.len() != 1 {
        return SymExpr::func(name, args);
    }
    let u = args.pop().unwrap();

    match (basis, name) {
        (RewriteBasis::Exponential, "sinh") => {
            // (exp(u) - exp(-u)) / 2
            SymExpr::div(
                SymExpr::exp(u.clone()) - SymExpr::exp(SymExpr::neg(u)),
                SymExpr::int(2),
            )
        }
        (RewriteBasis::Exponential, "cosh") => SymExpr::div(
            SymExpr::exp(u.clone()) + SymExpr::exp(SymExpr::neg(u)),
            SymExpr::int(2),
        ),
        (RewriteBasis::Exponential, "tanh") => {
            // (exp(2u) - 1) / (exp(2u) + 1)
            let e2u = SymExpr::exp(SymExpr::mul(vec![SymExpr::int(2), u]));
            SymExpr::div(e2u.clone() - SymExpr::int(1), e2u + SymExpr::int(1))
        }
        (RewriteBasis::Trig, "sec") => SymExpr::div(SymExpr::int(1), SymExpr::cos(u)),
        (RewriteBasis::Trig, "csc") => SymExpr::div(SymExpr::int(1), SymExpr::sin(u)),
        (RewriteBasis::Trig, "cot") => {
            SymExpr::div(SymExpr::cos(u.clone()), SymExpr::sin(u))
        }
        (RewriteBasis::Trig, "sinc") => SymExpr::div(SymExpr::sin(u.clone()), u),
        (RewriteBasis::Stirling, "gamma") => {
            // sqrt(2*pi/u) * (u/e)^u
            let two_pi_over_u = SymExpr::div(
                SymExpr::mul(vec![SymExpr::int(2), SymExpr::pi()]),
                u.clone(),
            );
            let u_over_e = SymExpr::div(u.clone(), SymExpr::euler());
            SymExpr::mul(vec![
                SymExpr::sqrt(two_pi_over_u),
                SymExpr::pow(u_over_e, u),
            ])
        }
        _ => SymExpr::func(name, vec![u]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn agree_at(a: &SymExpr, b: &SymExpr, points: &[f64]) {
        let ca = compile(a);
        let cb = compile(b);
        for &x in points {
            let va = ca.eval(&[x]).unwrap();
            let vb = cb.eval(&[x]).unwrap();
            assert!(
                (va - vb).abs() < 1e-9 * va.abs().max(1.0),
                "mismatch at {x}: {va} vs {vb}"
            );
        }
    }

    #[test]
    fn test_sinh_to_exp_is_exact() {
        let e = SymExpr::sinh(SymExpr::var("x"));
        let r = rewrite(&e, RewriteBasis::Exponential);
        assert!(!r.function_set().contains("sinh"));
        assert!(r.function_set().contains("exp"));
        agree_at(&e, &r, &[-2.0, -0.5, 0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_tanh_to_exp_is_exact() {
        let e = SymExpr::tanh(SymExpr::var("x"));
        let r = rewrite(&e, RewriteBasis::Exponential);
        assert!(!r.function_set().contains("tanh"));
        agree_at(&e, &r, &[-3.0, -1.0, 0.0, 0.5, 2.0]);
    }

    #[test]
    fn test_sec_to_trig_is_exact() {
        let e = SymExpr::sec(SymExpr::var("x"));
        let r = rewrite(&e, RewriteBasis::Trig);
        assert!(!r.function_set().contains("sec"));
        assert!(r.function_set().contains("cos"));
        agree_at(&e, &r, &[-1.0, 0.0, 0.3, 1.2]);
    }

    #[test]
    fn test_stirling_gamma_is_close_for_large_arguments() {
        let e = SymExpr::gamma(SymExpr::var("x"));
        let r = rewrite(&e, RewriteBasis::Stirling);
        assert!(!r.function_set().contains("gamma"));
        // Stirling is an asymptotic form; ~1% relative accuracy at x = 10
        let exact = compile(&e).eval(&[10.0]).unwrap();
        let approx = compile(&r).eval(&[10.0]).unwrap();
        assert!((exact - approx).abs() / exact < 0.01);
    }

    #[test]
    fn test_unrelated_functions_untouched() {
        let e = SymExpr::sin(SymExpr::var("x")) + SymExpr::gamma(SymExpr::var("x"));
        let r = rewrite(&e, RewriteBasis::Exponential);
        assert_eq!(e, r);
    }
}
