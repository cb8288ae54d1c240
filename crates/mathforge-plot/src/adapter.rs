//! Adapter from the `mathforge-symbolic` engine to [`PlotExpression`]
//!
//! Compiles the expression to bytecode once at construction so grid
//! evaluation does not re-walk the tree per sample.

use crate::expr::{PlotExpression, RewriteKind};
use mathforge_symbolic::{
    compile_with_vars, rewrite, taylor, CompiledExpr, RewriteBasis, SymExpr,
};
use num_complex::Complex64;
use std::collections::BTreeSet;

/// A symbolic-engine expression wired into the plotting pipeline
pub struct SymExprAdapter {
    expr: SymExpr,
    vars: Vec<String>,
    compiled: CompiledExpr,
}

impl SymExprAdapter {
    pub fn new(expr: SymExpr) -> Self {
        let vars = expr.free_vars();
        let var_refs: Vec<&str> = vars.iter().map(|s| s.as_str()).collect();
        let compiled = compile_with_vars(&expr, &var_refs);
        Self {
            expr,
            vars,
            compiled,
        }
    }

    pub fn expr(&self) -> &SymExpr {
        &self.expr
    }
}

impl PlotExpression for SymExprAdapter {
    fn free_vars(&self) -> Vec<String> {
        self.vars.clone()
    }

    fn function_set(&self) -> BTreeSet<String> {
        self.expr.function_set()
    }

    fn eval(&self, args: &[f64]) -> Option<f64> {
        self.compiled.eval(args).ok()
    }

    fn eval_complex(&self, args: &[Complex64]) -> Option<Complex64> {
        self.compiled.eval_complex(args).ok()
    }

    fn discontinuities(&self, var: &str, lo: f64, hi: f64) -> Option<Vec<f64>> {
        self.expr.denominator_roots(var, lo, hi)
    }

    fn denominator(&self) -> Option<Box<dyn PlotExpression>> {
        let (_, denom) = self.expr.as_numer_denom();
        if denom == SymExpr::int(1) {
            None
        } else {
            Some(Box::new(SymExprAdapter::new(denom)))
        }
    }

    fn rewritten(&self, basis: RewriteKind) -> Option<Box<dyn PlotExpression>> {
        let target = match basis {
            RewriteKind::Exponential => RewriteBasis::Exponential,
            RewriteKind::Trig => RewriteBasis::Trig,
            RewriteKind::Stirling => RewriteBasis::Stirling,
        };
        let rewritten = rewrite(&self.expr, target);
        if rewritten == self.expr {
            None
        } else {
            Some(Box::new(SymExprAdapter::new(rewritten)))
        }
    }

    fn series(&self, var: &str, center: f64, order: usize) -> Option<Box<dyn PlotExpression>> {
        taylor(&self.expr, var, center, order)
            .ok()
            .map(|t| Box::new(SymExprAdapter::new(t)) as Box<dyn PlotExpression>)
    }

    fn render_string(&self) -> String {
        self.expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_binds_sorted_vars() {
        // y - x with sorted binding order [x, y]
        let e = SymExpr::var("y") - SymExpr::var("x");
        let a = SymExprAdapter::new(e);
        assert_eq!(a.free_vars(), vec!["x", "y"]);
        assert!((a.eval(&[1.0, 5.0]).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_denominator_of_quotient() {
        let e = SymExpr::int(1) / SymExpr::var("x");
        let a = SymExprAdapter::new(e);
        let d = a.denominator().unwrap();
        assert_eq!(d.render_string(), "x");
    }

    #[test]
    fn test_rewritten_none_when_unchanged() {
        let a = SymExprAdapter::new(SymExpr::sin(SymExpr::var("x")));
        assert!(a.rewritten(RewriteKind::Exponential).is_none());
    }

    #[test]
    fn test_series_produces_polynomial() {
        let a = SymExprAdapter::new(SymExpr::exp(SymExpr::var("x")));
        let s = a.series("x", 0.0, 4).unwrap();
        assert!(s.function_set().is_empty());
        let approx = s.eval(&[0.2]).unwrap();
        assert!((approx - 0.2f64.exp()).abs() < 1e-4);
    }
}
