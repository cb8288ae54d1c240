//! Renderer-compatibility classification
//!
//! The native vector renderer evaluates a fixed algebra: trigonometric and
//! inverse trigonometric functions, exponential and logarithm, absolute
//! value, floor/ceiling, square root, and polynomial arithmetic. Anything
//! outside that set must go through the approximation fallback chain or be
//! materialized numerically.

use crate::expr::PlotExpression;

/// Function symbols the native renderer evaluates itself
const NATIVE_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "exp", "ln", "log", "log10", "log2", "sqrt",
    "abs", "floor", "ceil",
];

/// True iff every applied function is in the native renderer's set
///
/// Pure and O(size of the function set); arithmetic nodes are always
/// compatible so only function applications matter.
pub fn is_native_renderable(expr: &dyn PlotExpression) -> bool {
    expr.function_set()
        .iter()
        .all(|f| NATIVE_FUNCTIONS.contains(&f.as_str()))
}
