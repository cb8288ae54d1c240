//! Immutable symbolic expression tree
//!
//! Expressions are `Arc`-shared trees with lightweight smart constructors.
//! The constructors fold the obvious identities (zero terms, unit factors,
//! numeric powers) so that series output and rewrites stay readable, but
//! anything beyond that is left to explicit passes.

use crate::coeff::Coefficient;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A symbolic expression
#[derive(Debug, Clone, PartialEq)]
pub struct SymExpr {
    pub kind: Arc<SymExprKind>,
}

/// Expression node kinds
///
/// Quotients are represented as `Mul(a, Pow(b, -1))`; subtraction as
/// `Add(a, Neg(b))`.
#[derive(Debug, Clone, PartialEq)]
pub enum SymExprKind {
    Num(Coefficient),
    Var(String),
    Add(Vec<SymExpr>),
    Mul(Vec<SymExpr>),
    Pow(SymExpr, SymExpr),
    Neg(SymExpr),
    Func(String, Vec<SymExpr>),
}

impl SymExpr {
    fn new(kind: SymExprKind) -> Self {
        SymExpr {
            kind: Arc::new(kind),
        }
    }

    /// Integer literal
    pub fn int(n: i64) -> Self {
        Self::new(SymExprKind::Num(Coefficient::int(n)))
    }

    /// Exact rational literal
    pub fn rational(num: i64, den: i64) -> Self {
        Self::new(SymExprKind::Num(Coefficient::rational(num, den)))
    }

    /// Floating-point literal
    pub fn float(f: f64) -> Self {
        Self::new(SymExprKind::Num(Coefficient::from_f64_exact(f)))
    }

    pub fn num(c: Coefficient) -> Self {
        Self::new(SymExprKind::Num(c))
    }

    /// Free variable
    pub fn var<S: Into<String>>(name: S) -> Self {
        Self::new(SymExprKind::Var(name.into()))
    }

    /// The circle constant as a numeric literal
    pub fn pi() -> Self {
        Self::float(std::f64::consts::PI)
    }

    /// Euler's number as a numeric literal
    pub fn euler() -> Self {
        Self::float(std::f64::consts::E)
    }

    /// Sum of terms; flattens nested sums, folds numeric terms, drops zeros
    pub fn add(terms: Vec<SymExpr>) -> Self {
        let mut out: Vec<SymExpr> = Vec::new();
        let mut num = Coefficient::int(0);
        let mut stack = terms;
        stack.reverse();
        while let Some(t) = stack.pop() {
            match t.kind.as_ref() {
                SymExprKind::Add(inner) => {
                    for e in inner.iter().rev() {
                        stack.push(e.clone());
                    }
                }
                SymExprKind::Num(c) => num = num + c.clone(),
                _ => out.push(t),
            }
        }
        if !num.is_zero() {
            out.push(Self::num(num));
        }
        match out.len() {
            0 => Self::int(0),
            1 => out.into_iter().next().unwrap(),
            _ => Self::new(SymExprKind::Add(out)),
        }
    }

    /// Product of factors; flattens, folds numeric factors, short-circuits zero
    pub fn mul(factors: Vec<SymExpr>) -> Self {
        let mut out: Vec<SymExpr> = Vec::new();
        let mut num = Coefficient::int(1);
        let mut stack = factors;
        stack.reverse();
        while let Some(f) = stack.pop() {
            match f.kind.as_ref() {
                SymExprKind::Mul(inner) => {
                    for e in inner.iter().rev() {
                        stack.push(e.clone());
                    }
                }
                SymExprKind::Num(c) => {
                    if c.is_zero() {
                        return Self::int(0);
                    }
                    num = num * c.clone();
                }
                _ => out.push(f),
            }
        }
        if !num.is_one() {
            out.insert(0, Self::num(num));
        }
        match out.len() {
            0 => Self::int(1),
            1 => out.into_iter().next().unwrap(),
            _ => Self::new(SymExprKind::Mul(out)),
        }
    }

    /// Power; folds `e^0`, `e^1` and fully numeric integer powers
    pub fn pow(base: SymExpr, exp: SymExpr) -> Self {
        if let SymExprKind::Num(e) = exp.kind.as_ref() {
            if e.is_zero() {
                return Self::int(1);
            }
            if e.is_one() {
                return base;
            }
            if let (SymExprKind::Num(b), Some(k)) = (base.kind.as_ref(), e.as_integer()) {
                if k.abs() <= 64 {
                    return Self::num(b.pow_int(k as i32));
                }
            }
        }
        Self::new(SymExprKind::Pow(base, exp))
    }

    /// Negation; folds numeric literals and double negation
    pub fn neg(e: SymExpr) -> Self {
        match e.kind.as_ref() {
            SymExprKind::Num(c) => Self::num(-c.clone()),
            SymExprKind::Neg(inner) => inner.clone(),
            _ => Self::new(SymExprKind::Neg(e)),
        }
    }

    pub fn sub(a: SymExpr, b: SymExpr) -> Self {
        Self::add(vec![a, Self::neg(b)])
    }

    /// Quotient, represented as `a * b^-1`
    pub fn div(a: SymExpr, b: SymExpr) -> Self {
        Self::mul(vec![a, Self::pow(b, Self::int(-1))])
    }

    /// Function application
    pub fn func<S: Into<String>>(name: S, args: Vec<SymExpr>) -> Self {
        Self::new(SymExprKind::Func(name.into(), args))
    }

    pub fn sin(e: SymExpr) -> Self {
        Self::func("sin", vec![e])
    }
    pub fn cos(e: SymExpr) -> Self {
        Self::func("cos", vec![e])
    }
    pub fn tan(e: SymExpr) -> Self {
        Self::func("tan", vec![e])
    }
    pub fn exp(e: SymExpr) -> Self {
        Self::func("exp", vec![e])
    }
    pub fn ln(e: SymExpr) -> Self {
        Self::func("ln", vec![e])
    }
    pub fn sqrt(e: SymExpr) -> Self {
        Self::func("sqrt", vec![e])
    }
    pub fn abs(e: SymExpr) -> Self {
        Self::func("abs", vec![e])
    }
    pub fn floor(e: SymExpr) -> Self {
        Self::func("floor", vec![e])
    }
    pub fn ceil(e: SymExpr) -> Self {
        Self::func("ceil", vec![e])
    }
    pub fn sinh(e: SymExpr) -> Self {
        Self::func("sinh", vec![e])
    }
    pub fn cosh(e: SymExpr) -> Self {
        Self::func("cosh", vec![e])
    }
    pub fn tanh(e: SymExpr) -> Self {
        Self::func("tanh", vec![e])
    }
    pub fn sec(e: SymExpr) -> Self {
        Self::func("sec", vec![e])
    }
    pub fn csc(e: SymExpr) -> Self {
        Self::func("csc", vec![e])
    }
    pub fn cot(e: SymExpr) -> Self {
        Self::func("cot", vec![e])
    }
    pub fn gamma(e: SymExpr) -> Self {
        Self::func("gamma", vec![e])
    }
    pub fn zeta(e: SymExpr) -> Self {
        Self::func("zeta", vec![e])
    }
    pub fn erf(e: SymExpr) -> Self {
        Self::func("erf", vec![e])
    }
    pub fn besselj0(e: SymExpr) -> Self {
        Self::func("besselj0", vec![e])
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + match self.kind.as_ref() {
            SymExprKind::Num(_) | SymExprKind::Var(_) => 0,
            SymExprKind::Add(v) | SymExprKind::Mul(v) => {
                v.iter().map(|e| e.node_count()).sum::<usize>()
            }
            SymExprKind::Pow(b, e) => b.node_count() + e.node_count(),
            SymExprKind::Neg(e) => e.node_count(),
            SymExprKind::Func(_, args) => args.iter().map(|e| e.node_count()).sum::<usize>(),
        }
    }

    /// Sorted, deduplicated free variable names
    pub fn free_vars(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        self.collect_vars(&mut set);
        set.into_iter().collect()
    }

    fn collect_vars(&self, set: &mut BTreeSet<String>) {
        match self.kind.as_ref() {
            SymExprKind::Num(_) => {}
            SymExprKind::Var(name) => {
                set.insert(name.clone());
            }
            SymExprKind::Add(v) | SymExprKind::Mul(v) => {
                for e in v {
                    e.collect_vars(set);
                }
            }
            SymExprKind::Pow(b, e) => {
                b.collect_vars(set);
                e.collect_vars(set);
            }
            SymExprKind::Neg(e) => e.collect_vars(set),
            SymExprKind::Func(_, args) => {
                for e in args {
                    e.collect_vars(set);
                }
            }
        }
    }

    pub fn contains_var(&self, var: &str) -> bool {
        match self.kind.as_ref() {
            SymExprKind::Num(_) => false,
            SymExprKind::Var(name) => name == var,
            SymExprKind::Add(v) | SymExprKind::Mul(v) => v.iter().any(|e| e.contains_var(var)),
            SymExprKind::Pow(b, e) => b.contains_var(var) || e.contains_var(var),
            SymExprKind::Neg(e) => e.contains_var(var),
            SymExprKind::Func(_, args) => args.iter().any(|e| e.contains_var(var)),
        }
    }

    /// The set of function names applied anywhere in the tree
    pub fn function_set(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_funcs(&mut set);
        set
    }

    fn collect_funcs(&self, set: &mut BTreeSet<String>) {
        match self.kind.as_ref() {
            SymExprKind::Num(_) | SymExprKind::Var(_) => {}
            SymExprKind::Add(v) | SymExprKind::Mul(v) => {
                for e in v {
                    e.collect_funcs(set);
                }
            }
            SymExprKind::Pow(b, e) => {
                b.collect_funcs(set);
                e.collect_funcs(set);
            }
            SymExprKind::Neg(e) => e.collect_funcs(set),
            SymExprKind::Func(name, args) => {
                set.insert(name.clone());
                for e in args {
                    e.collect_funcs(set);
                }
            }
        }
    }

    /// Replace every occurrence of `var` with `replacement`
    pub fn substitute(&self, var: &str, replacement: &SymExpr) -> SymExpr {
        match self.kind.as_ref() {
            SymExprKind::Num(_) => self.clone(),
            SymExprKind::Var(name) => {
                if name == var {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            SymExprKind::Add(v) => {
                SymExpr::add(v.iter().map(|e| e.substitute(var, replacement)).collect())
            }
            SymExprKind::Mul(v) => {
                SymExpr::mul(v.iter().map(|e| e.substitute(var, replacement)).collect())
            }
            SymExprKind::Pow(b, e) => SymExpr::pow(
                b.substitute(var, replacement),
                e.substitute(var, replacement),
            ),
            SymExprKind::Neg(e) => SymExpr::neg(e.substitute(var, replacement)),
            SymExprKind::Func(name, args) => SymExpr::func(
                name.clone(),
                args.iter().map(|e| e.substitute(var, replacement)).collect(),
            ),
        }
    }

    /// Structural numerator/denominator split
    ///
    /// Splits products and negative powers; sums are not placed over a
    /// common denominator (callers that need the roots of a sum's
    /// denominator go through the numeric root-finding stage instead).
    pub fn as_numer_denom(&self) -> (SymExpr, SymExpr) {
        match self.kind.as_ref() {
            SymExprKind::Num(Coefficient::Rational(n, d)) if *d != 1 => {
                (SymExpr::int(*n), SymExpr::int(*d))
            }
            SymExprKind::Neg(inner) => {
                let (n, d) = inner.as_numer_denom();
                (SymExpr::neg(n), d)
            }
            SymExprKind::Mul(factors) => {
                let mut numers = Vec::new();
                let mut denoms = Vec::new();
                for f in factors {
                    let (n, d) = f.as_numer_denom();
                    numers.push(n);
                    denoms.push(d);
                }
                (SymExpr::mul(numers), SymExpr::mul(denoms))
            }
            SymExprKind::Pow(base, exp) => match exp.kind.as_ref() {
                SymExprKind::Num(c) if c.is_negative() => {
                    (SymExpr::int(1), SymExpr::pow(base.clone(), SymExpr::num(-c.clone())))
                }
                SymExprKind::Neg(e) => (SymExpr::int(1), SymExpr::pow(base.clone(), e.clone())),
                _ => (self.clone(), SymExpr::int(1)),
            },
            _ => (self.clone(), SymExpr::int(1)),
        }
    }

    /// Dense polynomial coefficients in `var` (constant term first)
    ///
    /// Returns `None` when the expression is not polynomial in `var` or the
    /// degree exceeds the internal cap. Variable-free subtrees are folded
    /// numerically.
    pub fn poly_coeffs(&self, var: &str) -> Option<Vec<f64>> {
        const MAX_DEGREE: usize = 16;

        if !self.contains_var(var) {
            let v = crate::compiler::compile(self).eval(&[]).ok()?;
            return if v.is_finite() { Some(vec![v]) } else { None };
        }

        match self.kind.as_ref() {
            SymExprKind::Var(name) if name == var => Some(vec![0.0, 1.0]),
            SymExprKind::Add(terms) => {
                let mut acc = vec![0.0];
                for t in terms {
                    let c = t.poly_coeffs(var)?;
                    if c.len() > acc.len() {
                        acc.resize(c.len(), 0.0);
                    }
                    for (i, v) in c.iter().enumerate() {
                        acc[i] += v;
                    }
                }
                Some(acc)
            }
            SymExprKind::Mul(factors) => {
                let mut acc = vec![1.0];
                for f in factors {
                    let c = f.poly_coeffs(var)?;
                    if acc.len() + c.len() - 1 > MAX_DEGREE + 1 {
                        return None;
                    }
                    acc = convolve(&acc, &c);
                }
                Some(acc)
            }
            SymExprKind::Pow(base, exp) => {
                let k = match exp.kind.as_ref() {
                    SymExprKind::Num(c) => c.as_integer()?,
                    _ => return None,
                };
                if k < 0 || k as usize > MAX_DEGREE {
                    return None;
                }
                let b = base.poly_coeffs(var)?;
                let mut acc = vec![1.0];
                for _ in 0..k {
                    if acc.len() + b.len() - 1 > MAX_DEGREE + 1 {
                        return None;
                    }
                    acc = convolve(&acc, &b);
                }
                Some(acc)
            }
            SymExprKind::Neg(inner) => {
                let mut c = inner.poly_coeffs(var)?;
                for v in &mut c {
                    *v = -*v;
                }
                Some(c)
            }
            _ => None,
        }
    }

    /// Closed-form real roots of this expression's denominator in `var`,
    /// strictly inside `(lo, hi)`
    ///
    /// Returns `None` when some denominator factor has no closed form
    /// (higher-degree or transcendental); callers then fall back to numeric
    /// root finding on the denominator.
    pub fn denominator_roots(&self, var: &str, lo: f64, hi: f64) -> Option<Vec<f64>> {
        let (_, denom) = self.as_numer_denom();
        let mut roots = Vec::new();
        collect_factor_roots(&denom, var, &mut roots)?;
        roots.retain(|r| *r > lo && *r < hi);
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        roots.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        Some(roots)
    }
}

fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Roots of each multiplicative factor of `denom`; `None` bails the whole
/// closed-form attempt.
fn collect_factor_roots(denom: &SymExpr, var: &str, roots: &mut Vec<f64>) -> Option<()> {
    match denom.kind.as_ref() {
        SymExprKind::Mul(factors) => {
            for f in factors {
                collect_factor_roots(f, var, roots)?;
            }
            Some(())
        }
        SymExprKind::Pow(base, _) => collect_factor_roots(base, var, roots),
        SymExprKind::Neg(inner) => collect_factor_roots(inner, var, roots),
        _ => {
            if !denom.contains_var(var) {
                return Some(());
            }
            let coeffs = denom.poly_coeffs(var)?;
            polynomial_roots(&coeffs, roots)
        }
    }
}

/// Real roots of a dense polynomial, closed-form up to degree two
fn polynomial_roots(coeffs: &[f64], roots: &mut Vec<f64>) -> Option<()> {
    let mut c = coeffs.to_vec();
    while c.last().is_some_and(|v| *v == 0.0) {
        c.pop();
    }
    match c.len() {
        0 | 1 => Some(()),
        2 => {
            roots.push(-c[0] / c[1]);
            Some(())
        }
        3 => {
            let (a, b, k) = (c[2], c[1], c[0]);
            let disc = b * b - 4.0 * a * k;
            if disc >= 0.0 {
                let sq = disc.sqrt();
                roots.push((-b - sq) / (2.0 * a));
                roots.push((-b + sq) / (2.0 * a));
            }
            Some(())
        }
        _ => None,
    }
}

impl std::ops::Add for SymExpr {
    type Output = SymExpr;
    fn add(self, rhs: SymExpr) -> SymExpr {
        SymExpr::add(vec![self, rhs])
    }
}

impl std::ops::Sub for SymExpr {
    type Output = SymExpr;
    fn sub(self, rhs: SymExpr) -> SymExpr {
        SymExpr::sub(self, rhs)
    }
}

impl std::ops::Mul for SymExpr {
    type Output = SymExpr;
    fn mul(self, rhs: SymExpr) -> SymExpr {
        SymExpr::mul(vec![self, rhs])
    }
}

impl std::ops::Div for SymExpr {
    type Output = SymExpr;
    fn div(self, rhs: SymExpr) -> SymExpr {
        SymExpr::div(self, rhs)
    }
}

impl std::ops::Neg for SymExpr {
    type Output = SymExpr;
    fn neg(self) -> SymExpr {
        SymExpr::neg(self)
    }
}

// Rendering precedence: Add < Neg < Mul < Pow < atoms. The output syntax is
// the renderer algebra the native emitter embeds in draw directives (`^` for
// powers, explicit `*`, function-call notation).
const PREC_ADD: u8 = 1;
const PREC_NEG: u8 = 2;
const PREC_MUL: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

impl SymExpr {
    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        let prec = self.precedence();
        let parens = prec < parent;
        if parens {
            write!(f, "(")?;
        }
        match self.kind.as_ref() {
            SymExprKind::Num(c) => write!(f, "{c}")?,
            SymExprKind::Var(name) => write!(f, "{name}")?,
            SymExprKind::Add(terms) => {
                for (i, t) in terms.iter().enumerate() {
                    if let Some(flipped) = t.as_negated() {
                        write!(f, "{}", if i == 0 { "-" } else { " - " })?;
                        flipped.fmt_prec(f, PREC_NEG + 1)?;
                    } else {
                        if i > 0 {
                            write!(f, " + ")?;
                        }
                        t.fmt_prec(f, PREC_ADD + 1)?;
                    }
                }
            }
            SymExprKind::Mul(factors) => {
                for (i, x) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    x.fmt_prec(f, PREC_MUL)?;
                }
            }
            SymExprKind::Pow(base, exp) => {
                base.fmt_prec(f, PREC_ATOM)?;
                write!(f, "^")?;
                exp.fmt_prec(f, PREC_ATOM)?;
            }
            SymExprKind::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_prec(f, PREC_NEG + 1)?;
            }
            SymExprKind::Func(name, args) => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    a.fmt_prec(f, 0)?;
                }
                write!(f, ")")?;
            }
        }
        if parens {
            write!(f, ")")?;
        }
        Ok(())
    }

    /// The term with its sign flipped, when the sign is syntactically
    /// leading (used to print `a - b` instead of `a + -b`)
    fn as_negated(&self) -> Option<SymExpr> {
        match self.kind.as_ref() {
            SymExprKind::Neg(inner) => Some(inner.clone()),
            SymExprKind::Num(c) if c.is_negative() => Some(SymExpr::num(-c.clone())),
            SymExprKind::Mul(factors) => match factors.first().map(|h| h.kind.as_ref()) {
                Some(SymExprKind::Num(c)) if c.is_negative() => {
                    let mut flipped = factors.clone();
                    flipped[0] = SymExpr::num(-c.clone());
                    Some(SymExpr::mul(flipped))
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self.kind.as_ref() {
            SymExprKind::Add(_) => PREC_ADD,
            SymExprKind::Neg(_) => PREC_NEG,
            SymExprKind::Mul(_) => PREC_MUL,
            SymExprKind::Num(c) => {
                if c.is_negative() {
                    PREC_NEG
                } else if matches!(c, Coefficient::Rational(_, d) if *d != 1) {
                    PREC_MUL
                } else {
                    PREC_ATOM
                }
            }
            SymExprKind::Pow(_, _) => PREC_POW,
            SymExprKind::Var(_) | SymExprKind::Func(_, _) => PREC_ATOM,
        }
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_constructors() {
        let x = SymExpr::var("x");
        assert_eq!(SymExpr::add(vec![x.clone(), SymExpr::int(0)]), x);
        assert_eq!(
            SymExpr::mul(vec![x.clone(), SymExpr::int(0)]),
            SymExpr::int(0)
        );
        assert_eq!(SymExpr::pow(x.clone(), SymExpr::int(1)), x);
        assert_eq!(SymExpr::pow(SymExpr::int(2), SymExpr::int(3)), SymExpr::int(8));
        assert_eq!(SymExpr::neg(SymExpr::neg(x.clone())), x);
    }

    #[test]
    fn test_free_vars_sorted() {
        let e = SymExpr::var("y") * SymExpr::var("x") + SymExpr::sin(SymExpr::var("x"));
        assert_eq!(e.free_vars(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_function_set() {
        let x = SymExpr::var("x");
        let e = SymExpr::sin(x.clone()) + SymExpr::gamma(x.clone()) * SymExpr::exp(x);
        let fs = e.function_set();
        assert!(fs.contains("sin"));
        assert!(fs.contains("gamma"));
        assert!(fs.contains("exp"));
        assert_eq!(fs.len(), 3);
    }

    #[test]
    fn test_numer_denom_split() {
        let x = SymExpr::var("x");
        let e = SymExpr::int(1) / x.clone();
        let (n, d) = e.as_numer_denom();
        assert_eq!(n, SymExpr::int(1));
        assert_eq!(d, x);
    }

    #[test]
    fn test_denominator_roots_linear() {
        let x = SymExpr::var("x");
        let e = SymExpr::int(1) / x;
        let roots = e.denominator_roots("x", -5.0, 5.0).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].abs() < 1e-12);
    }

    #[test]
    fn test_denominator_roots_quadratic() {
        // 1 / (x^2 - 1): roots at -1 and 1
        let x = SymExpr::var("x");
        let denom = x.clone() * x - SymExpr::int(1);
        let e = SymExpr::int(1) / denom;
        let roots = e.denominator_roots("x", -5.0, 5.0).unwrap();
        assert_eq!(roots.len(), 2);
        assert!((roots[0] + 1.0).abs() < 1e-12);
        assert!((roots[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_denominator_no_closed_form() {
        // 1 / sin(x): transcendental denominator has no closed form here
        let e = SymExpr::int(1) / SymExpr::sin(SymExpr::var("x"));
        assert!(e.denominator_roots("x", -5.0, 5.0).is_none());
    }

    #[test]
    fn test_display_syntax() {
        let x = SymExpr::var("x");
        let e = SymExpr::pow(x.clone(), SymExpr::int(2)) + SymExpr::int(1);
        assert_eq!(e.to_string(), "x^2 + 1");

        let q = SymExpr::sin(x.clone()) / x.clone();
        assert_eq!(q.to_string(), "sin(x)*x^(-1)");

        let p = (x.clone() + SymExpr::int(1)) * x;
        assert_eq!(p.to_string(), "(x + 1)*x");
    }

    #[test]
    fn test_substitute() {
        let x = SymExpr::var("x");
        let e = SymExpr::sin(x.clone()) + x.clone();
        let sub = e.substitute("x", &SymExpr::int(0));
        assert_eq!(sub, SymExpr::sin(SymExpr::int(0)));
    }
}
