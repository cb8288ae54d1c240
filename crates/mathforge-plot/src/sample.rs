//! Numeric sampling and materialization
//!
//! Evaluates an expression over coordinate grids and records the results
//! with non-finite handling: a failed or divergent sample becomes a
//! sentinel instead of aborting the plot. Output buffers are allocated up
//! front and filled by index so parallel evaluation keeps a stable order.

use crate::expr::PlotExpression;
use crate::partition::Interval;
use crate::{PlotError, Result};
use num_complex::Complex64;
use rayon::prelude::*;

/// Evenly spaced coordinates over `[lo, hi]`, endpoints included
pub(crate) fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n)
        .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
        .collect()
}

/// One contiguous run of samples between segment breaks
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSegment {
    /// `(x, y)` pairs; `None` is the non-finite sentinel
    pub points: Vec<(f64, Option<f64>)>,
}

/// A 2D sample table with segment breaks at removed singularities
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    pub segments: Vec<SampleSegment>,
}

impl SampleTable {
    /// Total number of sample rows across all segments
    pub fn row_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }

    /// Render as tab-separated text: header `x\ty`, one row per sample,
    /// non-finite samples as the literal `inf`, and a blank line between
    /// segments so a downstream renderer breaks the line there.
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("x\ty\n");
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for (x, y) in &segment.points {
                match y {
                    Some(v) => out.push_str(&format!("{x:.6}\t{v:.6}\n")),
                    None => out.push_str(&format!("{x:.6}\tinf\n")),
                }
            }
        }
        out
    }
}

/// Materialize a 2D sample table over partitioned intervals
///
/// Finite values are clipped to `[-clip, clip]` preserving sign; failed or
/// non-finite evaluations become the sentinel. The expression here is the
/// caller's original one, never a fallback substitute, so the table keeps
/// full fidelity.
pub fn sample_table(
    expr: &dyn PlotExpression,
    intervals: &[Interval],
    clip: f64,
) -> SampleTable {
    let nvars = expr.free_vars().len();

    let segments = intervals
        .iter()
        .map(|iv| {
            let xs = linspace(iv.lo, iv.hi, iv.samples);
            let points: Vec<(f64, Option<f64>)> = xs
                .into_par_iter()
                .map(|x| {
                    let value = if nvars == 0 {
                        expr.eval(&[])
                    } else {
                        expr.eval(&[x])
                    };
                    let y = match value {
                        Some(v) if v.is_finite() => Some(v.clamp(-clip, clip)),
                        _ => None,
                    };
                    (x, y)
                })
                .collect();
            SampleSegment { points }
        })
        .collect();

    let table = SampleTable { segments };
    log::trace!(
        target: "mathforge_plot",
        "materialized {} rows across {} segment(s)",
        table.row_count(),
        table.segments.len()
    );
    table
}

/// Complex-plane evaluation grid, row-major with the imaginary axis as the
/// outer (row) loop in ascending order
#[derive(Debug, Clone)]
pub struct ComplexField {
    pub re_axis: Vec<f64>,
    pub im_axis: Vec<f64>,
    /// `values[row * width + col]`; failed samples hold NaN components
    pub values: Vec<Complex64>,
}

impl ComplexField {
    pub fn width(&self) -> usize {
        self.re_axis.len()
    }

    pub fn height(&self) -> usize {
        self.im_axis.len()
    }
}

/// Evaluate an expression over a rectangular region of the complex plane
///
/// A single free variable is bound to the complex coordinate; two free
/// variables are bound to `(re, im)` as independent real inputs and the
/// result is treated as a real-valued field.
pub fn sample_complex_grid(
    expr: &dyn PlotExpression,
    re_range: (f64, f64),
    im_range: (f64, f64),
    (nx, ny): (usize, usize),
    max_cells: usize,
) -> Result<ComplexField> {
    let cells = nx.checked_mul(ny).unwrap_or(usize::MAX);
    if cells > max_cells {
        return Err(PlotError::Resource(format!(
            "complex raster of {nx}x{ny} cells exceeds the limit of {max_cells}"
        )));
    }
    let nvars = expr.free_vars().len();
    if nvars > 2 {
        return Err(PlotError::input(
            "free-variables",
            format!(
                "complex-plane plotting supports at most two free variables, found {nvars}"
            ),
        ));
    }

    let re_axis = linspace(re_range.0, re_range.1, nx);
    let im_axis = linspace(im_range.0, im_range.1, ny);
    let bad = Complex64::new(f64::NAN, f64::NAN);

    let values: Vec<Complex64> = im_axis
        .par_iter()
        .flat_map_iter(|&im| {
            let re_axis = &re_axis;
            re_axis.iter().map(move |&re| match nvars {
                0 => expr.eval_complex(&[]).unwrap_or(bad),
                1 => expr
                    .eval_complex(&[Complex64::new(re, im)])
                    .unwrap_or(bad),
                _ => expr
                    .eval(&[re, im])
                    .map(|w| Complex64::new(w, 0.0))
                    .unwrap_or(bad),
            })
        })
        .collect();

    log::trace!(
        target: "mathforge_plot",
        "complex grid evaluated: {nx}x{ny}"
    );

    Ok(ComplexField {
        re_axis,
        im_axis,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SymExprAdapter;
    use mathforge_symbolic::SymExpr;

    fn iv(lo: f64, hi: f64, samples: usize) -> Interval {
        Interval { lo, hi, samples }
    }

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(-1.0, 1.0, 5);
        assert_eq!(xs.len(), 5);
        assert_eq!(xs[0], -1.0);
        assert_eq!(xs[4], 1.0);
    }

    #[test]
    fn test_table_clips_preserving_sign() {
        // x^3 over [-5, 5] exceeds a clip bound of 15 on both sides
        let x = SymExpr::var("x");
        let e = SymExprAdapter::new(SymExpr::pow(x, SymExpr::int(3)));
        let table = sample_table(&e, &[iv(-5.0, 5.0, 11)], 15.0);
        let points = &table.segments[0].points;
        assert_eq!(points[0].1, Some(-15.0));
        assert_eq!(points[10].1, Some(15.0));
        // Interior values within the bound pass through
        assert_eq!(points[5].1, Some(0.0));
    }

    #[test]
    fn test_nonfinite_becomes_sentinel() {
        // 1/x sampled across zero
        let e = SymExprAdapter::new(SymExpr::int(1) / SymExpr::var("x"));
        let table = sample_table(&e, &[iv(-1.0, 1.0, 3)], 100.0);
        let points = &table.segments[0].points;
        assert_eq!(points[1].0, 0.0);
        assert_eq!(points[1].1, None);
    }

    #[test]
    fn test_tsv_format() {
        let e = SymExprAdapter::new(SymExpr::int(1) / SymExpr::var("x"));
        let table = sample_table(&e, &[iv(-1.0, -0.5, 2), iv(0.5, 1.0, 2)], 100.0);
        let tsv = table.to_tsv();
        assert!(tsv.starts_with("x\ty\n"));
        assert!(tsv.contains("-1.000000\t-1.000000\n"));
        // Blank separator row between the two segments
        assert!(tsv.contains("\n\n"));
        assert!(!tsv.contains("NaN"));
        assert!(!tsv.contains("nan"));
    }

    #[test]
    fn test_constant_expression_table() {
        let e = SymExprAdapter::new(SymExpr::int(3));
        let table = sample_table(&e, &[iv(0.0, 1.0, 4)], 15.0);
        for (_, y) in &table.segments[0].points {
            assert_eq!(*y, Some(3.0));
        }
    }

    #[test]
    fn test_complex_grid_single_variable() {
        // f(z) = z over a 3x3 grid centered at the origin
        let e = SymExprAdapter::new(SymExpr::var("z"));
        let field = sample_complex_grid(&e, (-1.0, 1.0), (-1.0, 1.0), (3, 3), 1_000_000).unwrap();
        assert_eq!(field.width(), 3);
        assert_eq!(field.height(), 3);
        // Center pixel is 0 + 0i, corner (0,0) is -1 - 1i
        let center = field.values[4];
        assert!(center.norm() < 1e-12);
        let corner = field.values[0];
        assert!((corner.re + 1.0).abs() < 1e-12);
        assert!((corner.im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_complex_grid_two_variables_is_real_field() {
        // f(x, y) = x + y: two real inputs
        let e = SymExprAdapter::new(SymExpr::var("x") + SymExpr::var("y"));
        let field = sample_complex_grid(&e, (0.0, 1.0), (0.0, 1.0), (2, 2), 1_000_000).unwrap();
        assert!((field.values[3].re - 2.0).abs() < 1e-12);
        assert_eq!(field.values[3].im, 0.0);
    }

    #[test]
    fn test_grid_size_limit() {
        let e = SymExprAdapter::new(SymExpr::var("z"));
        let result = sample_complex_grid(&e, (-1.0, 1.0), (-1.0, 1.0), (3000, 3000), 1_000_000);
        assert!(matches!(result, Err(PlotError::Resource(_))));
    }
}
