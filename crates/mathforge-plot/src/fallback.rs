//! Staged approximation fallback chain
//!
//! When the classifier rejects an expression, the chain tries increasingly
//! lossy strategies: exact basis rewrites first (exponential, then
//! trigonometric), a local series approximation second, and dense numeric
//! sampling last. Exact-form rendering wins whenever it is reachable — it
//! has the smallest payload and is resolution-independent — so the chain
//! only pays for approximation when the function family demands it.

use crate::classify::is_native_renderable;
use crate::expr::{PlotExpression, RewriteKind};
use crate::options::{ApproxMethod, PlotOptions};
use std::fmt;

/// Series expansion order used by the fallback chain
pub const SERIES_ORDER: usize = 6;

/// Which strategy produced the renderable form
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackStage {
    /// The expression was natively renderable as given
    Native,
    /// An exact (or, for Stirling, asymptotic) basis rewrite sufficed
    Rewritten(RewriteKind),
    /// A local polynomial approximation was substituted
    Series { center: f64, order: usize },
    /// Native rendering is infeasible; the sampler takes over
    Numeric,
}

impl fmt::Display for FallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackStage::Native => write!(f, "native"),
            FallbackStage::Rewritten(RewriteKind::Exponential) => {
                write!(f, "rewritten into the exponential basis")
            }
            FallbackStage::Rewritten(RewriteKind::Trig) => {
                write!(f, "rewritten into the trigonometric basis")
            }
            FallbackStage::Rewritten(RewriteKind::Stirling) => {
                write!(f, "Stirling approximation substituted")
            }
            FallbackStage::Series { center, order } => {
                write!(f, "order-{order} series about {center:.3}")
            }
            FallbackStage::Numeric => write!(f, "numeric sampling"),
        }
    }
}

/// Result of walking the fallback chain
pub struct FallbackOutcome {
    /// Replacement expression when a symbolic stage rewrote the input;
    /// `None` for `Native` (render the original) and `Numeric`
    pub replacement: Option<Box<dyn PlotExpression>>,
    pub stage: FallbackStage,
    /// Advisory notes attached to the artifact; never fatal
    pub warnings: Vec<String>,
}

impl FallbackOutcome {
    fn numeric(warnings: Vec<String>) -> Self {
        FallbackOutcome {
            replacement: None,
            stage: FallbackStage::Numeric,
            warnings,
        }
    }

    /// True when a native vector rendering is feasible
    pub fn is_native(&self) -> bool {
        self.stage != FallbackStage::Numeric
    }
}

/// Resolve an expression to a natively renderable form, or decide that
/// numeric materialization is required
pub fn resolve(
    expr: &dyn PlotExpression,
    var: &str,
    domain: (f64, f64),
    opts: &PlotOptions,
) -> FallbackOutcome {
    let mut warnings: Vec<String> = Vec::new();

    // Numeric mode short-circuits: explicit request, or a sample density
    // past what the native renderer handles well.
    if opts.force_numeric {
        return FallbackOutcome::numeric(warnings);
    }
    if opts.samples > opts.native_sample_limit {
        log::debug!(
            target: "mathforge_plot",
            "requested {} samples exceeds the native limit of {}; off-loading to a numeric table",
            opts.samples,
            opts.native_sample_limit
        );
        return FallbackOutcome::numeric(warnings);
    }

    let mut candidate: Option<Box<dyn PlotExpression>> = None;
    let mut stage = FallbackStage::Native;

    // A caller-forced approximation method runs before classification.
    if let Some(method) = opts.approx {
        match method {
            ApproxMethod::Exponential => {
                apply_rewrite(expr, RewriteKind::Exponential, &mut candidate, &mut stage);
            }
            ApproxMethod::Trig => {
                apply_rewrite(expr, RewriteKind::Trig, &mut candidate, &mut stage);
            }
            ApproxMethod::Stirling => {
                if apply_rewrite(expr, RewriteKind::Stirling, &mut candidate, &mut stage) {
                    warnings.push(
                        "gamma-like factors replaced by Stirling's approximation; accuracy degrades toward the poles".to_string(),
                    );
                }
            }
            ApproxMethod::Taylor => {
                if let Some((series, center)) = find_series(expr, var, domain) {
                    warnings.push(series_note(center));
                    return FallbackOutcome {
                        replacement: Some(series),
                        stage: FallbackStage::Series {
                            center,
                            order: SERIES_ORDER,
                        },
                        warnings,
                    };
                }
                warnings.push(
                    "requested series approximation does not exist on this domain".to_string(),
                );
            }
        }
    }

    if is_native_renderable(current(&candidate, expr)) {
        return FallbackOutcome {
            replacement: candidate,
            stage,
            warnings,
        };
    }

    // Stage 1: exact rewrites, exponential basis then trigonometric
    for kind in [RewriteKind::Exponential, RewriteKind::Trig] {
        if let Some(r) = current(&candidate, expr).rewritten(kind) {
            let compatible = is_native_renderable(r.as_ref());
            candidate = Some(r);
            stage = FallbackStage::Rewritten(kind);
            if compatible {
                log::debug!(target: "mathforge_plot", "fallback resolved: {stage}");
                return FallbackOutcome {
                    replacement: candidate,
                    stage,
                    warnings,
                };
            }
        }
    }

    // Stage 2: local polynomial approximation
    if let Some((series, center)) = find_series(current(&candidate, expr), var, domain) {
        if is_native_renderable(series.as_ref()) {
            warnings.push(series_note(center));
            log::debug!(
                target: "mathforge_plot",
                "fallback resolved: order-{SERIES_ORDER} series about {center:.3}"
            );
            return FallbackOutcome {
                replacement: Some(series),
                stage: FallbackStage::Series {
                    center,
                    order: SERIES_ORDER,
                },
                warnings,
            };
        }
    }

    // Stage 3: dense numeric sampling
    log::debug!(target: "mathforge_plot", "fallback exhausted; materializing numerically");
    FallbackOutcome::numeric(warnings)
}

fn current<'a>(
    candidate: &'a Option<Box<dyn PlotExpression>>,
    original: &'a dyn PlotExpression,
) -> &'a dyn PlotExpression {
    candidate.as_deref().unwrap_or(original)
}

fn apply_rewrite(
    expr: &dyn PlotExpression,
    kind: RewriteKind,
    candidate: &mut Option<Box<dyn PlotExpression>>,
    stage: &mut FallbackStage,
) -> bool {
    match expr.rewritten(kind) {
        Some(r) => {
            *candidate = Some(r);
            *stage = FallbackStage::Rewritten(kind);
            true
        }
        None => false,
    }
}

/// Try the domain midpoint first, then nearby centers when the midpoint is
/// itself a bad expansion point
fn find_series(
    expr: &dyn PlotExpression,
    var: &str,
    (lo, hi): (f64, f64),
) -> Option<(Box<dyn PlotExpression>, f64)> {
    let width = hi - lo;
    let mid = 0.5 * (lo + hi);
    let centers = [
        mid,
        mid + 0.1 * width,
        mid - 0.1 * width,
        mid + 0.25 * width,
        mid - 0.25 * width,
    ];
    for center in centers {
        if let Some(series) = expr.series(var, center, SERIES_ORDER) {
            return Some((series, center));
        }
    }
    None
}

fn series_note(center: f64) -> String {
    format!(
        "replaced by an order-{SERIES_ORDER} series expansion about {center:.3}; accuracy degrades away from the expansion point"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SymExprAdapter;
    use mathforge_symbolic::SymExpr;

    fn opts() -> PlotOptions {
        PlotOptions::default()
    }

    #[test]
    fn test_native_expression_passes_through() {
        let e = SymExprAdapter::new(SymExpr::sin(SymExpr::var("x")) + SymExpr::exp(SymExpr::var("x")));
        let out = resolve(&e, "x", (-5.0, 5.0), &opts());
        assert_eq!(out.stage, FallbackStage::Native);
        assert!(out.replacement.is_none());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_sinh_resolves_via_exponential_rewrite() {
        let e = SymExprAdapter::new(SymExpr::sinh(SymExpr::var("x")));
        let out = resolve(&e, "x", (-5.0, 5.0), &opts());
        assert_eq!(out.stage, FallbackStage::Rewritten(RewriteKind::Exponential));
        let r = out.replacement.unwrap();
        assert!(is_native_renderable(r.as_ref()));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_sec_resolves_via_trig_rewrite() {
        let e = SymExprAdapter::new(SymExpr::sec(SymExpr::var("x")));
        let out = resolve(&e, "x", (-1.0, 1.0), &opts());
        assert_eq!(out.stage, FallbackStage::Rewritten(RewriteKind::Trig));
    }

    #[test]
    fn test_erf_resolves_via_series_with_warning() {
        let e = SymExprAdapter::new(SymExpr::erf(SymExpr::var("x")));
        let out = resolve(&e, "x", (-1.0, 1.0), &opts());
        assert!(matches!(out.stage, FallbackStage::Series { order: 6, .. }));
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("series"));
    }

    #[test]
    fn test_gamma_falls_through_to_numeric() {
        let e = SymExprAdapter::new(SymExpr::gamma(SymExpr::var("x")));
        let out = resolve(&e, "x", (-5.0, 5.0), &opts());
        assert_eq!(out.stage, FallbackStage::Numeric);
        assert!(!out.is_native());
    }

    #[test]
    fn test_forced_stirling_renders_gamma_natively() {
        let mut o = opts();
        o.approx = Some(ApproxMethod::Stirling);
        let e = SymExprAdapter::new(SymExpr::gamma(SymExpr::var("x")));
        let out = resolve(&e, "x", (0.5, 6.0), &o);
        assert_eq!(out.stage, FallbackStage::Rewritten(RewriteKind::Stirling));
        assert!(is_native_renderable(out.replacement.unwrap().as_ref()));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_high_sample_density_forces_numeric() {
        let mut o = opts();
        o.samples = 500;
        let e = SymExprAdapter::new(SymExpr::sin(SymExpr::var("x")));
        let out = resolve(&e, "x", (-5.0, 5.0), &o);
        assert_eq!(out.stage, FallbackStage::Numeric);
    }

    #[test]
    fn test_explicit_numeric_flag() {
        let mut o = opts();
        o.force_numeric = true;
        let e = SymExprAdapter::new(SymExpr::sin(SymExpr::var("x")));
        let out = resolve(&e, "x", (-5.0, 5.0), &o);
        assert_eq!(out.stage, FallbackStage::Numeric);
    }
}
