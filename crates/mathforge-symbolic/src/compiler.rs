//! Symbolic-to-numeric bytecode compiler
//!
//! Compiles expression trees to stack-based bytecode so grid sampling does
//! not re-walk the tree per point. Evaluation comes in a real (`f64`) and a
//! complex (`Complex64`) flavor over the same instruction stream.
//!
//! Domain violations (log of a negative number, a pole of gamma) produce
//! IEEE non-finite values rather than errors; only structural problems
//! (unknown function, wrong arity, bad variable binding) are `Err`.

use crate::expr::{SymExpr, SymExprKind};
use crate::{Result, SymbolicError};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Bytecode instruction for the expression evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BytecodeOp {
    /// Push a constant onto the stack
    PushConst(usize),
    /// Load a variable onto the stack
    LoadVar(usize),
    /// Binary operations (pop 2, push 1)
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Unary negation (pop 1, push 1)
    Neg,
    /// Function call (pop n args, push 1 result)
    Call(String, usize),
}

/// Compiled bytecode representation of a symbolic expression
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    /// Bytecode instructions
    pub ops: Vec<BytecodeOp>,
    /// Constant pool
    pub constants: Vec<f64>,
    /// Variable names, in binding order
    pub variables: Vec<String>,
    /// Maximum stack depth required
    pub max_stack: usize,
}

impl CompiledExpr {
    /// Evaluate with real variable bindings
    pub fn eval(&self, var_values: &[f64]) -> Result<f64> {
        if var_values.len() != self.variables.len() {
            return Err(SymbolicError::ArgCount {
                expected: self.variables.len(),
                got: var_values.len(),
            });
        }

        let mut stack: Vec<f64> = Vec::with_capacity(self.max_stack);
        for op in &self.ops {
            match op {
                BytecodeOp::PushConst(idx) => stack.push(self.constants[*idx]),
                BytecodeOp::LoadVar(idx) => stack.push(var_values[*idx]),
                BytecodeOp::Add => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a + b);
                }
                BytecodeOp::Sub => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a - b);
                }
                BytecodeOp::Mul => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a * b);
                }
                BytecodeOp::Div => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a / b);
                }
                BytecodeOp::Pow => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a.powf(b));
                }
                BytecodeOp::Neg => {
                    let a = pop1(&mut stack)?;
                    stack.push(-a);
                }
                BytecodeOp::Call(name, argc) => {
                    let mut args = Vec::with_capacity(*argc);
                    for _ in 0..*argc {
                        args.push(pop1(&mut stack)?);
                    }
                    args.reverse();
                    stack.push(call_real(name, &args)?);
                }
            }
        }
        pop1(&mut stack)
    }

    /// Evaluate with complex variable bindings
    pub fn eval_complex(&self, var_values: &[Complex64]) -> Result<Complex64> {
        if var_values.len() != self.variables.len() {
            return Err(SymbolicError::ArgCount {
                expected: self.variables.len(),
                got: var_values.len(),
            });
        }

        let mut stack: Vec<Complex64> = Vec::with_capacity(self.max_stack);
        for op in &self.ops {
            match op {
                BytecodeOp::PushConst(idx) => {
                    stack.push(Complex64::new(self.constants[*idx], 0.0))
                }
                BytecodeOp::LoadVar(idx) => stack.push(var_values[*idx]),
                BytecodeOp::Add => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a + b);
                }
                BytecodeOp::Sub => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a - b);
                }
                BytecodeOp::Mul => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a * b);
                }
                BytecodeOp::Div => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a / b);
                }
                BytecodeOp::Pow => {
                    let (b, a) = pop2(&mut stack)?;
                    stack.push(a.powc(b));
                }
                BytecodeOp::Neg => {
                    let a = pop1(&mut stack)?;
                    stack.push(-a);
                }
                BytecodeOp::Call(name, argc) => {
                    let mut args = Vec::with_capacity(*argc);
                    for _ in 0..*argc {
                        args.push(pop1(&mut stack)?);
                    }
                    args.reverse();
                    stack.push(call_complex(name, &args)?);
                }
            }
        }
        pop1(&mut stack)
    }

    /// Evaluate a single-variable expression over a slice of values
    pub fn eval_range(&self, values: &[f64]) -> Result<Vec<f64>> {
        if self.variables.len() != 1 {
            return Err(SymbolicError::InvalidOperation(format!(
                "eval_range requires a single-variable expression, got {} variables",
                self.variables.len()
            )));
        }
        values.iter().map(|v| self.eval(std::slice::from_ref(v))).collect()
    }

    /// Variable names for binding
    pub fn variable_names(&self) -> &[String] {
        &self.variables
    }
}

fn pop1<T: Copy>(stack: &mut Vec<T>) -> Result<T> {
    stack
        .pop()
        .ok_or_else(|| SymbolicError::InvalidOperation("stack underflow".into()))
}

fn pop2<T: Copy>(stack: &mut Vec<T>) -> Result<(T, T)> {
    let b = pop1(stack)?;
    let a = pop1(stack)?;
    Ok((b, a))
}

/// Evaluate a built-in function over real arguments
fn call_real(name: &str, args: &[f64]) -> Result<f64> {
    let unary = |f: fn(f64) -> f64| -> Result<f64> {
        if args.len() == 1 {
            Ok(f(args[0]))
        } else {
            Err(SymbolicError::UnknownFunction(name.to_string(), args.len()))
        }
    };

    match name {
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "asin" => unary(f64::asin),
        "acos" => unary(f64::acos),
        "atan" => unary(f64::atan),
        "sinh" => unary(f64::sinh),
        "cosh" => unary(f64::cosh),
        "tanh" => unary(f64::tanh),
        "sec" => unary(|x| 1.0 / x.cos()),
        "csc" => unary(|x| 1.0 / x.sin()),
        "cot" => unary(|x| x.cos() / x.sin()),
        "sinc" => unary(|x| if x == 0.0 { 1.0 } else { x.sin() / x }),
        "exp" => unary(f64::exp),
        "ln" | "log" => unary(f64::ln),
        "log10" => unary(f64::log10),
        "log2" => unary(f64::log2),
        "sqrt" => unary(f64::sqrt),
        "abs" => unary(f64::abs),
        "sign" => unary(f64::signum),
        "floor" => unary(f64::floor),
        "ceil" => unary(f64::ceil),
        "round" => unary(f64::round),
        "gamma" => unary(gamma_real),
        "zeta" => unary(|x| zeta_complex(Complex64::new(x, 0.0)).re),
        "erf" => unary(erf_real),
        "besselj0" => unary(besselj0),
        "besselj1" => unary(besselj1),
        "atan2" if args.len() == 2 => Ok(args[0].atan2(args[1])),
        "max" if args.len() == 2 => Ok(args[0].max(args[1])),
        "min" if args.len() == 2 => Ok(args[0].min(args[1])),
        _ => Err(SymbolicError::UnknownFunction(name.to_string(), args.len())),
    }
}

/// Evaluate a built-in function over complex arguments
///
/// Functions with no sensible complex continuation here (Bessel, atan2,
/// min/max) report an error; the sampler records such points as non-finite.
fn call_complex(name: &str, args: &[Complex64]) -> Result<Complex64> {
    let unary = |f: &dyn Fn(Complex64) -> Complex64| -> Result<Complex64> {
        if args.len() == 1 {
            Ok(f(args[0]))
        } else {
            Err(SymbolicError::UnknownFunction(name.to_string(), args.len()))
        }
    };

    match name {
        "sin" => unary(&Complex64::sin),
        "cos" => unary(&Complex64::cos),
        "tan" => unary(&Complex64::tan),
        "asin" => unary(&Complex64::asin),
        "acos" => unary(&Complex64::acos),
        "atan" => unary(&Complex64::atan),
        "sinh" => unary(&Complex64::sinh),
        "cosh" => unary(&Complex64::cosh),
        "tanh" => unary(&Complex64::tanh),
        "sec" => unary(&|z: Complex64| Complex64::new(1.0, 0.0) / z.cos()),
        "csc" => unary(&|z: Complex64| Complex64::new(1.0, 0.0) / z.sin()),
        "cot" => unary(&|z: Complex64| z.cos() / z.sin()),
        "sinc" => unary(&|z: Complex64| {
            if z.norm() == 0.0 {
                Complex64::new(1.0, 0.0)
            } else {
                z.sin() / z
            }
        }),
        "exp" => unary(&Complex64::exp),
        "ln" | "log" => unary(&Complex64::ln),
        "log10" => unary(&|z: Complex64| z.ln() / std::f64::consts::LN_10),
        "log2" => unary(&|z: Complex64| z.ln() / std::f64::consts::LN_2),
        "sqrt" => unary(&Complex64::sqrt),
        "abs" => unary(&|z: Complex64| Complex64::new(z.norm(), 0.0)),
        "sign" => unary(&|z: Complex64| {
            let n = z.norm();
            if n == 0.0 {
                Complex64::new(0.0, 0.0)
            } else {
                z / n
            }
        }),
        "floor" => unary(&|z: Complex64| Complex64::new(z.re.floor(), z.im.floor())),
        "ceil" => unary(&|z: Complex64| Complex64::new(z.re.ceil(), z.im.ceil())),
        "round" => unary(&|z: Complex64| Complex64::new(z.re.round(), z.im.round())),
        "gamma" => unary(&gamma_complex),
        "zeta" => unary(&zeta_complex),
        "erf" => unary(&erf_complex),
        _ => Err(SymbolicError::UnknownFunction(name.to_string(), args.len())),
    }
}

// --- special function numerics -------------------------------------------
//
// Standard published approximations: Lanczos for gamma, Borwein's
// alternating-series algorithm (plus the functional equation) for zeta,
// Abramowitz & Stegun 7.1.26 for erf, rational/asymptotic fits for J0/J1.

const LANCZOS_G: f64 = 7.0;
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

fn gamma_real(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection; at non-positive integers sin(pi*x) vanishes and the
        // quotient diverges, which is exactly the behavior samplers expect.
        PI / ((PI * x).sin() * gamma_real(1.0 - x))
    } else {
        let x = x - 1.0;
        let mut acc = LANCZOS[0];
        for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
            acc += c / (x + i as f64);
        }
        let t = x + LANCZOS_G + 0.5;
        (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
    }
}

fn gamma_complex(z: Complex64) -> Complex64 {
    if z.re < 0.5 {
        PI / ((PI * z).sin() * gamma_complex(Complex64::new(1.0, 0.0) - z))
    } else {
        let z = z - 1.0;
        let mut acc = Complex64::new(LANCZOS[0], 0.0);
        for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
            acc += c / (z + i as f64);
        }
        let t = z + LANCZOS_G + 0.5;
        (2.0 * PI).sqrt() * t.powc(z + 0.5) * (-t).exp() * acc
    }
}

/// Riemann zeta via Borwein's algorithm for Re(s) >= 1/2, functional
/// equation elsewhere. The simple pole at s = 1 falls out of the
/// `1 - 2^(1-s)` factor.
fn zeta_complex(s: Complex64) -> Complex64 {
    if s.re < 0.5 {
        // zeta(s) = 2^s pi^(s-1) sin(pi s / 2) gamma(1 - s) zeta(1 - s)
        let one = Complex64::new(1.0, 0.0);
        let two = Complex64::new(2.0, 0.0);
        let pi_c = Complex64::new(PI, 0.0);
        return two.powc(s)
            * pi_c.powc(s - one)
            * (pi_c * s / 2.0).sin()
            * gamma_complex(one - s)
            * zeta_complex(one - s);
    }

    const N: usize = 32;
    let mut d = [0.0f64; N + 1];
    let mut term = 1.0f64;
    let mut acc = term;
    // d_k = n * sum_{j=0..k} (n + j - 1)! 4^j / ((n - j)! (2j)!)
    d[0] = acc;
    for j in 1..=N {
        term *= (N + j - 1) as f64 * (N - j + 1) as f64 * 4.0
            / ((2 * j - 1) as f64 * (2 * j) as f64);
        acc += term;
        d[j] = acc;
    }

    let mut sum = Complex64::new(0.0, 0.0);
    for k in 0..N {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign * (d[k] - d[N]) * Complex64::new((k + 1) as f64, 0.0).powc(-s);
    }
    let one = Complex64::new(1.0, 0.0);
    let factor = d[N] * (one - Complex64::new(2.0, 0.0).powc(one - s));
    -sum / factor
}

fn erf_real(x: f64) -> f64 {
    // Abramowitz & Stegun 7.1.26, max error ~1.5e-7
    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Maclaurin series; adequate on the default raster region (|z| up to ~4)
fn erf_complex(z: Complex64) -> Complex64 {
    let two_over_sqrt_pi = 2.0 / PI.sqrt();
    let z2 = z * z;
    let mut term = z;
    let mut sum = z;
    for n in 1..=80 {
        term *= -z2 / n as f64;
        let contrib = term / (2 * n + 1) as f64;
        sum += contrib;
        if contrib.norm() < 1e-16 * sum.norm() {
            break;
        }
    }
    two_over_sqrt_pi * sum
}

fn besselj0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let p1 = -2_957_821_389.0
            + y * (7_062_834_065.0
                + y * (-512_359_803.6 + y * (10_879_881.29 + y * (-86_327.92757 + y * 228.462_273_3))));
        let p2 = 40_076_544_269.0
            + y * (745_249_964.8 + y * (7_189_466.438 + y * (47_447.2647 + y * (226.103_0244 + y))));
        p1 / p2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 0.785_398_164;
        let p1 = 1.0
            + y * (-0.109_862_862_7e-2
                + y * (0.273_451_040_7e-4 + y * (-0.207_337_063_9e-5 + y * 0.209_388_721_1e-6)));
        let p2 = -0.156_249_999_5e-1
            + y * (0.143_048_876_5e-3
                + y * (-0.691_114_765_1e-5 + y * (0.762_109_516_1e-6 + y * -0.934_935_152e-7)));
        (0.636_619_772 / ax).sqrt() * (xx.cos() * p1 - z * xx.sin() * p2)
    }
}

fn besselj1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let p1 = x
            * (72_362_614_232.0
                + y * (-7_895_059_235.0
                    + y * (242_396_853.1
                        + y * (-2_972_611.439 + y * (15_704.482_6 + y * -30.160_366_06)))));
        let p2 = 144_725_228_442.0
            + y * (2_300_535_178.0
                + y * (18_583_304.74 + y * (99_447.433_94 + y * (376.999_139_7 + y))));
        p1 / p2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356_194_491;
        let p1 = 1.0
            + y * (0.183_105e-2
                + y * (-0.351_639_649_6e-4 + y * (0.245_752_017_4e-5 + y * -0.240_337_019e-6)));
        let p2 = 0.046_874_999_95
            + y * (-0.200_269_087_3e-3
                + y * (0.844_919_909_6e-5 + y * (-0.882_289_87e-6 + y * 0.105_787_412e-6)));
        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        sign * (0.636_619_772 / ax).sqrt() * (xx.cos() * p1 - z * xx.sin() * p2)
    }
}

/// Bytecode compiler for symbolic expressions
#[derive(Debug, Default)]
pub struct BytecodeCompiler {
    constants: Vec<f64>,
    const_map: HashMap<u64, usize>,
    variables: Vec<String>,
    var_map: HashMap<String, usize>,
}

impl BytecodeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile an expression; variables register in discovery order
    pub fn compile(&mut self, expr: &SymExpr) -> CompiledExpr {
        let mut ops = Vec::new();
        let mut max_stack = 0;
        let mut current = 0;
        self.compile_expr(expr, &mut ops, &mut current, &mut max_stack);
        CompiledExpr {
            ops,
            constants: self.constants.clone(),
            variables: self.variables.clone(),
            max_stack,
        }
    }

    /// Compile with an explicit variable binding order
    pub fn compile_with_vars(&mut self, expr: &SymExpr, var_order: &[&str]) -> CompiledExpr {
        for v in var_order {
            if !self.var_map.contains_key(*v) {
                let idx = self.variables.len();
                self.variables.push(v.to_string());
                self.var_map.insert(v.to_string(), idx);
            }
        }
        self.compile(expr)
    }

    fn add_constant(&mut self, value: f64) -> usize {
        let bits = value.to_bits();
        if let Some(&idx) = self.const_map.get(&bits) {
            return idx;
        }
        let idx = self.constants.len();
        self.constants.push(value);
        self.const_map.insert(bits, idx);
        idx
    }

    fn add_variable(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.var_map.get(name) {
            return idx;
        }
        let idx = self.variables.len();
        self.variables.push(name.to_string());
        self.var_map.insert(name.to_string(), idx);
        idx
    }

    fn compile_expr(
        &mut self,
        expr: &SymExpr,
        ops: &mut Vec<BytecodeOp>,
        current: &mut usize,
        max_stack: &mut usize,
    ) {
        match expr.kind.as_ref() {
            SymExprKind::Num(c) => {
                let idx = self.add_constant(c.to_f64());
                ops.push(BytecodeOp::PushConst(idx));
                *current += 1;
                *max_stack = (*max_stack).max(*current);
            }
            SymExprKind::Var(name) => {
                let idx = self.add_variable(name);
                ops.push(BytecodeOp::LoadVar(idx));
                *current += 1;
                *max_stack = (*max_stack).max(*current);
            }
            SymExprKind::Add(terms) => {
                if terms.is_empty() {
                    let idx = self.add_constant(0.0);
                    ops.push(BytecodeOp::PushConst(idx));
                    *current += 1;
                    *max_stack = (*max_stack).max(*current);
                    return;
                }
                self.compile_expr(&terms[0], ops, current, max_stack);
                for t in &terms[1..] {
                    self.compile_expr(t, ops, current, max_stack);
                    ops.push(BytecodeOp::Add);
                    *current -= 1;
                }
            }
            SymExprKind::Mul(factors) => {
                if factors.is_empty() {
                    let idx = self.add_constant(1.0);
                    ops.push(BytecodeOp::PushConst(idx));
                    *current += 1;
                    *max_stack = (*max_stack).max(*current);
                    return;
                }
                self.compile_expr(&factors[0], ops, current, max_stack);
                for f in &factors[1..] {
                    self.compile_expr(f, ops, current, max_stack);
                    ops.push(BytecodeOp::Mul);
                    *current -= 1;
                }
            }
            SymExprKind::Pow(base, exp) => {
                self.compile_expr(base, ops, current, max_stack);
                self.compile_expr(exp, ops, current, max_stack);
                ops.push(BytecodeOp::Pow);
                *current -= 1;
            }
            SymExprKind::Neg(inner) => {
                self.compile_expr(inner, ops, current, max_stack);
                ops.push(BytecodeOp::Neg);
            }
            SymExprKind::Func(name, args) => {
                for arg in args {
                    self.compile_expr(arg, ops, current, max_stack);
                }
                ops.push(BytecodeOp::Call(name.clone(), args.len()));
                *current -= args.len();
                *current += 1;
                *max_stack = (*max_stack).max(*current);
            }
        }
    }
}

/// Convenience: compile with variables in discovery order
pub fn compile(expr: &SymExpr) -> CompiledExpr {
    BytecodeCompiler::new().compile(expr)
}

/// Convenience: compile with an explicit variable order
pub fn compile_with_vars(expr: &SymExpr, var_order: &[&str]) -> CompiledExpr {
    BytecodeCompiler::new().compile_with_vars(expr, var_order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_polynomial() {
        // x^2 + 2*x + 1 at x = 3
        let x = SymExpr::var("x");
        let expr = SymExpr::add(vec![
            SymExpr::pow(x.clone(), SymExpr::int(2)),
            SymExpr::mul(vec![SymExpr::int(2), x.clone()]),
            SymExpr::int(1),
        ]);
        let compiled = compile(&expr);
        assert_eq!(compiled.variables, vec!["x"]);
        let result = compiled.eval(&[3.0]).unwrap();
        assert!((result - 16.0).abs() < 1e-10);
    }

    #[test]
    fn test_compile_function() {
        let expr = SymExpr::sin(SymExpr::var("x"));
        let compiled = compile(&expr);
        let result = compiled.eval(&[PI / 2.0]).unwrap();
        assert!((result - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_compile_with_var_order() {
        let x = SymExpr::var("x");
        let y = SymExpr::var("y");
        let expr = y - x;
        let compiled = compile_with_vars(&expr, &["x", "y"]);
        assert_eq!(compiled.variables, vec!["x", "y"]);
        let result = compiled.eval(&[1.0, 5.0]).unwrap();
        assert!((result - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_division_by_zero_is_nonfinite() {
        let expr = SymExpr::int(1) / SymExpr::var("x");
        let compiled = compile(&expr);
        assert!(!compiled.eval(&[0.0]).unwrap().is_finite());
    }

    #[test]
    fn test_unknown_function_is_error() {
        let expr = SymExpr::func("frobnicate", vec![SymExpr::var("x")]);
        let compiled = compile(&expr);
        assert!(compiled.eval(&[1.0]).is_err());
    }

    #[test]
    fn test_gamma_values() {
        assert!((gamma_real(1.0) - 1.0).abs() < 1e-10);
        assert!((gamma_real(5.0) - 24.0).abs() < 1e-8);
        assert!((gamma_real(0.5) - PI.sqrt()).abs() < 1e-9);
        // Divergence at the pole
        assert!(!gamma_real(0.0).is_finite());
    }

    #[test]
    fn test_zeta_values() {
        // zeta(2) = pi^2/6
        let z2 = zeta_complex(Complex64::new(2.0, 0.0));
        assert!((z2.re - PI * PI / 6.0).abs() < 1e-10);
        assert!(z2.im.abs() < 1e-10);
        // zeta(-1) = -1/12 via the functional equation
        let zm1 = zeta_complex(Complex64::new(-1.0, 0.0));
        assert!((zm1.re + 1.0 / 12.0).abs() < 1e-8);
    }

    #[test]
    fn test_erf_values() {
        assert!(erf_real(0.0).abs() < 1e-12);
        assert!((erf_real(1.0) - 0.842_700_79).abs() < 1e-6);
        assert!((erf_real(-1.0) + 0.842_700_79).abs() < 1e-6);
        let ec = erf_complex(Complex64::new(1.0, 0.0));
        assert!((ec.re - 0.842_700_79).abs() < 1e-6);
    }

    #[test]
    fn test_besselj_values() {
        assert!((besselj0(0.0) - 1.0).abs() < 1e-9);
        // First zero of J0 near 2.404826
        assert!(besselj0(2.404_825_557_695_773).abs() < 1e-7);
        assert!(besselj1(0.0).abs() < 1e-9);
    }

    #[test]
    fn test_complex_eval() {
        // exp(i*pi) = -1
        let expr = SymExpr::exp(SymExpr::var("z"));
        let compiled = compile(&expr);
        let w = compiled.eval_complex(&[Complex64::new(0.0, PI)]).unwrap();
        assert!((w.re + 1.0).abs() < 1e-10);
        assert!(w.im.abs() < 1e-10);
    }
}
