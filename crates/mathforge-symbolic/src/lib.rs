//! MathForge symbolic expression engine
//!
//! This crate provides the symbolic side of MathForge's plot compiler:
//! an immutable expression tree, a stack-bytecode evaluator for fast
//! numeric sampling (real and complex), exact basis rewrites, and local
//! polynomial (Taylor) approximation.
//!
//! # Architecture
//!
//! - Compact coefficient representation (exact rational + float fallback)
//! - Tree-based expressions with lightweight smart constructors
//! - Bytecode compilation for grid evaluation
//! - Pure structural rewrites between function bases
//!
//! The plotting pipeline consumes this engine through a capability trait
//! defined on its own side; nothing in this crate knows about plotting.

mod coeff;
mod compiler;
mod expr;
mod rewrite;
mod series;

pub use coeff::Coefficient;
pub use compiler::{compile, compile_with_vars, BytecodeOp, CompiledExpr};
pub use expr::{SymExpr, SymExprKind};
pub use rewrite::{rewrite, RewriteBasis};
pub use series::{diff, taylor};

/// Error type for symbolic operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum SymbolicError {
    #[error("unknown function: {0}/{1}")]
    UnknownFunction(String, usize),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("no derivative rule for function: {0}")]
    NoDerivative(String),

    #[error("series expansion undefined at center {0}")]
    UndefinedCenter(f64),

    #[error("expected {expected} variable values, got {got}")]
    ArgCount { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SymbolicError>;
