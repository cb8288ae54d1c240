//! Capability interface for the symbolic expression collaborator
//!
//! The pipeline consumes expressions through this trait only, so any
//! computer-algebra engine can sit behind it. Arguments to the evaluation
//! methods bind to [`PlotExpression::free_vars`] order.

use num_complex::Complex64;
use std::collections::BTreeSet;

/// Function basis targeted by a structural rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteKind {
    /// Re-express in terms of the exponential function
    Exponential,
    /// Re-express in terms of sine/cosine/tangent
    Trig,
    /// Substitute Stirling's form for gamma-like factors
    Stirling,
}

/// An opaque symbolic expression with the capabilities the pipeline needs
pub trait PlotExpression: Send + Sync {
    /// Sorted, deduplicated free variable names
    fn free_vars(&self) -> Vec<String>;

    /// The set of function symbols applied anywhere in the expression
    fn function_set(&self) -> BTreeSet<String>;

    /// Evaluate at a real point; `None` means evaluation failed outright.
    /// A successful evaluation may still be non-finite.
    fn eval(&self, args: &[f64]) -> Option<f64>;

    /// Evaluate at a complex point
    fn eval_complex(&self, args: &[Complex64]) -> Option<Complex64>;

    /// Exact real roots of structural discontinuities in `var` strictly
    /// inside `(lo, hi)`; `None` when no closed form is available
    fn discontinuities(&self, var: &str, lo: f64, hi: f64) -> Option<Vec<f64>>;

    /// The expression's denominator as a standalone expression, if it has
    /// a non-trivial one
    fn denominator(&self) -> Option<Box<dyn PlotExpression>>;

    /// Structurally rewrite into `basis`; `None` when nothing changed
    fn rewritten(&self, basis: RewriteKind) -> Option<Box<dyn PlotExpression>>;

    /// Local polynomial approximation about `center` to the given order;
    /// `None` when the expansion does not exist there
    fn series(&self, var: &str, center: f64, order: usize) -> Option<Box<dyn PlotExpression>>;

    /// Render in the algebra syntax the native emitter embeds in draw
    /// directives
    fn render_string(&self) -> String;
}
