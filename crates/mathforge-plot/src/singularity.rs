//! Singularity detection
//!
//! Locates real discontinuities of an expression with respect to one
//! variable inside a closed domain. Four stages run in order and their
//! results are unioned: exact structural roots from the expression itself,
//! numeric root finding on the denominator, known analytic pole families
//! keyed off the function set, and a coarse evaluation scan that catches
//! whatever the symbolic stages missed.

use crate::expr::PlotExpression;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::f64::consts::PI;

/// Tunable knobs for the detector
///
/// The safety-net thresholds are best-effort heuristics, not guaranteed
/// detection; they are exposed here rather than hard-coded.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Singularities closer than this merge into one
    pub dedup_eps: f64,
    /// Number of evaluation steps in the safety-net scan
    pub scan_points: usize,
    /// Magnitude both sides of a sign flip must exceed to count as an
    /// unresolved pole crossing
    pub blowup_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dedup_eps: 1e-6,
            scan_points: 1000,
            blowup_threshold: 1e6,
        }
    }
}

/// A function family with a known analytic pole set
pub struct PoleFamily {
    pub name: &'static str,
    /// Does this family apply to the given applied-function set?
    pub applies: fn(&BTreeSet<String>) -> bool,
    /// Members of the pole set inside `[lo, hi]`
    pub poles_in: fn(f64, f64) -> Vec<f64>,
}

/// Registry of known pole families
///
/// New families are added here without touching the detector loop. The
/// generators assume the function is applied to the plot variable itself;
/// composed arguments are the safety-net scan's problem.
static POLE_FAMILIES: Lazy<Vec<PoleFamily>> = Lazy::new(|| {
    vec![
        PoleFamily {
            name: "gamma",
            applies: |fs| fs.contains("gamma"),
            poles_in: nonpositive_integers_in,
        },
        PoleFamily {
            name: "tangent",
            applies: |fs| fs.contains("tan") || fs.contains("sec"),
            poles_in: odd_half_pi_multiples_in,
        },
        PoleFamily {
            name: "cotangent",
            applies: |fs| fs.contains("cot") || fs.contains("csc"),
            poles_in: pi_multiples_in,
        },
        PoleFamily {
            name: "zeta",
            applies: |fs| fs.contains("zeta"),
            poles_in: |lo, hi| {
                if lo <= 1.0 && 1.0 <= hi {
                    vec![1.0]
                } else {
                    Vec::new()
                }
            },
        },
    ]
});

fn nonpositive_integers_in(lo: f64, hi: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if hi < f64::from(i32::MIN) {
        return out;
    }
    let start = (-hi).ceil().max(0.0) as i64;
    let end = (-lo).floor() as i64;
    for k in start..=end {
        out.push(-(k as f64));
    }
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

fn odd_half_pi_multiples_in(lo: f64, hi: f64) -> Vec<f64> {
    // pi/2 + k*pi
    let start = ((lo - PI / 2.0) / PI).ceil() as i64;
    let end = ((hi - PI / 2.0) / PI).floor() as i64;
    (start..=end).map(|k| PI / 2.0 + k as f64 * PI).collect()
}

fn pi_multiples_in(lo: f64, hi: f64) -> Vec<f64> {
    let start = (lo / PI).ceil() as i64;
    let end = (hi / PI).floor() as i64;
    (start..=end).map(|k| k as f64 * PI).collect()
}

/// Detect singularities of `expr` w.r.t. `var` inside `[lo, hi]`
///
/// The result is ascending and deduplicated; an empty list means none were
/// found and is not an error.
pub fn detect_singularities(
    expr: &dyn PlotExpression,
    var: &str,
    (lo, hi): (f64, f64),
    config: &DetectorConfig,
) -> Vec<f64> {
    let mut sings: Vec<f64> = Vec::new();

    // Stage 1: exact structural roots
    let exact = expr.discontinuities(var, lo, hi);
    match &exact {
        Some(roots) => sings.extend(roots.iter().copied()),
        None => {
            // Stage 2: numeric root finding on the denominator
            if let Some(denom) = expr.denominator() {
                sings.extend(denominator_zero_scan(denom.as_ref(), lo, hi, config.scan_points));
            }
        }
    }

    // Stage 3: known analytic pole sets
    let fs = expr.function_set();
    for family in POLE_FAMILIES.iter() {
        if (family.applies)(&fs) {
            let poles = (family.poles_in)(lo, hi);
            if !poles.is_empty() {
                log::debug!(
                    target: "mathforge_plot",
                    "pole family {} contributed {} candidate(s)",
                    family.name,
                    poles.len()
                );
                sings.extend(poles);
            }
        }
    }

    // Stage 4: evaluation scan safety net. Candidates within one scan step
    // of an already-known singularity are the same point at scan
    // resolution and are skipped.
    let step = (hi - lo) / config.scan_points as f64;
    let known = sings.clone();
    for candidate in evaluation_scan(expr, lo, hi, config) {
        if !known.iter().any(|s| (s - candidate).abs() <= step) {
            sings.push(candidate);
        }
    }

    sings.retain(|s| *s > lo && *s < hi && s.is_finite());
    sings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sings.dedup_by(|a, b| (*a - *b).abs() < config.dedup_eps);

    log::debug!(
        target: "mathforge_plot",
        "detected {} singularit{} in [{lo}, {hi}]",
        sings.len(),
        if sings.len() == 1 { "y" } else { "ies" }
    );
    sings
}

/// Zeros of the denominator found by scanning for sign changes and
/// bisecting each bracket
fn denominator_zero_scan(
    denom: &dyn PlotExpression,
    lo: f64,
    hi: f64,
    scan_points: usize,
) -> Vec<f64> {
    let nvars = denom.free_vars().len();
    if nvars > 1 {
        return Vec::new();
    }
    let eval1 = |x: f64| -> Option<f64> {
        if nvars == 0 {
            denom.eval(&[])
        } else {
            denom.eval(&[x])
        }
    };

    let n = scan_points.max(2);
    let step = (hi - lo) / n as f64;
    let mut roots = Vec::new();
    let mut prev: Option<(f64, f64)> = None;
    for i in 0..=n {
        let x = lo + step * i as f64;
        let v = match eval1(x) {
            Some(v) if v.is_finite() => v,
            _ => {
                prev = None;
                continue;
            }
        };
        if v == 0.0 {
            roots.push(x);
            prev = None;
            continue;
        }
        if let Some((px, pv)) = prev {
            if pv.signum() != v.signum() {
                if let Some(root) = bisect_zero(&eval1, px, x) {
                    roots.push(root);
                }
            }
        }
        prev = Some((x, v));
    }
    roots
}

fn bisect_zero(eval1: &dyn Fn(f64) -> Option<f64>, mut a: f64, mut b: f64) -> Option<f64> {
    let mut fa = eval1(a)?;
    for _ in 0..60 {
        let mid = 0.5 * (a + b);
        let fm = eval1(mid)?;
        if fm == 0.0 {
            return Some(mid);
        }
        if fa.signum() == fm.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    Some(0.5 * (a + b))
}

/// Coarse scan flagging non-finite run boundaries and high-magnitude sign
/// flips
///
/// A contiguous run of non-finite values (a function undefined on part of
/// the domain) contributes only its boundary points, not every sample in
/// the run; an isolated non-finite point contributes itself.
fn evaluation_scan(
    expr: &dyn PlotExpression,
    lo: f64,
    hi: f64,
    config: &DetectorConfig,
) -> Vec<f64> {
    let nvars = expr.free_vars().len();
    if nvars > 1 {
        return Vec::new();
    }
    let eval1 = |x: f64| -> Option<f64> {
        if nvars == 0 {
            expr.eval(&[])
        } else {
            expr.eval(&[x])
        }
    };

    let n = config.scan_points.max(2);
    let step = (hi - lo) / n as f64;
    let mut found = Vec::new();
    let mut prev_good: Option<(f64, f64)> = None;
    let mut last_bad: Option<f64> = None;
    for i in 0..=n {
        let x = lo + step * i as f64;
        match eval1(x) {
            Some(v) if v.is_finite() => {
                if let Some(b) = last_bad.take() {
                    // Leaving a non-finite run
                    found.push(b);
                }
                if let Some((px, pv)) = prev_good {
                    // Opposite signs at large magnitude on both sides of a
                    // step reads as an unresolved pole crossing
                    if pv.signum() != v.signum()
                        && pv.abs() > config.blowup_threshold
                        && v.abs() > config.blowup_threshold
                    {
                        found.push(0.5 * (px + x));
                    }
                }
                prev_good = Some((x, v));
            }
            _ => {
                if last_bad.is_none() && prev_good.is_some() {
                    // Entering a non-finite run from finite territory
                    found.push(x);
                }
                last_bad = Some(x);
                prev_good = None;
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SymExprAdapter;
    use mathforge_symbolic::SymExpr;

    fn adapt(e: SymExpr) -> SymExprAdapter {
        SymExprAdapter::new(e)
    }

    #[test]
    fn test_reciprocal_has_one_singularity() {
        let e = adapt(SymExpr::int(1) / SymExpr::var("x"));
        let sings = detect_singularities(&e, "x", (-5.0, 5.0), &DetectorConfig::default());
        assert_eq!(sings.len(), 1);
        assert!(sings[0].abs() < 1e-9);
    }

    #[test]
    fn test_tangent_pole_in_window() {
        let e = adapt(SymExpr::tan(SymExpr::var("x")));
        let sings = detect_singularities(&e, "x", (-2.0, 2.0), &DetectorConfig::default());
        assert_eq!(sings.len(), 2);
        assert!((sings[0] + PI / 2.0).abs() < 1e-9);
        assert!((sings[1] - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_poles_are_nonpositive_integers() {
        let e = adapt(SymExpr::gamma(SymExpr::var("x")));
        let sings = detect_singularities(&e, "x", (-3.5, 2.0), &DetectorConfig::default());
        // Poles at -3, -2, -1, 0
        assert_eq!(sings.len(), 4);
        for (s, expected) in sings.iter().zip([-3.0, -2.0, -1.0, 0.0]) {
            assert!((s - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smooth_function_has_none() {
        let e = adapt(SymExpr::sin(SymExpr::var("x")) + SymExpr::exp(SymExpr::var("x")));
        let sings = detect_singularities(&e, "x", (-5.0, 5.0), &DetectorConfig::default());
        assert!(sings.is_empty());
    }

    #[test]
    fn test_transcendental_denominator_found_numerically() {
        // 1/sin(x) has no closed-form denominator roots here, but the
        // numeric stage pins 0 and +/-pi (plus the csc-free scan net)
        let e = adapt(SymExpr::int(1) / SymExpr::sin(SymExpr::var("x")));
        let sings = detect_singularities(&e, "x", (-4.0, 4.0), &DetectorConfig::default());
        assert_eq!(sings.len(), 3);
        assert!((sings[0] + PI).abs() < 1e-6);
        assert!(sings[1].abs() < 1e-6);
        assert!((sings[2] - PI).abs() < 1e-6);
    }

    #[test]
    fn test_quadratic_denominator_both_roots() {
        // 1/(x^2 - 1)
        let x = SymExpr::var("x");
        let e = adapt(SymExpr::int(1) / (x.clone() * x - SymExpr::int(1)));
        let sings = detect_singularities(&e, "x", (-5.0, 5.0), &DetectorConfig::default());
        assert_eq!(sings.len(), 2);
        assert!((sings[0] + 1.0).abs() < 1e-9);
        assert!((sings[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dedup_merges_stage_overlap() {
        // tan also trips the safety net near its pole; the result must
        // still be a single point per pole
        let e = adapt(SymExpr::tan(SymExpr::var("x")));
        let sings = detect_singularities(&e, "x", (0.0, 2.0), &DetectorConfig::default());
        assert_eq!(sings.len(), 1);
    }
}
