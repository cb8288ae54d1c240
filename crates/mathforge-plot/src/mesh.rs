//! 3D surface materialization
//!
//! Builds a rectangular height grid over an (x, y) region. Non-finite
//! heights are replaced rather than propagated, and everything is clipped
//! to the configured z-range plus a 50% guard so extreme outliers cannot
//! flatten the visible surface while moderate overshoot still reads as
//! off-scale.

use crate::expr::PlotExpression;
use crate::sample::linspace;
use crate::{PlotError, Result};
use rayon::prelude::*;

/// A rectangular height field; `zs[row][col]` with rows along y
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub zs: Vec<Vec<f64>>,
}

impl SurfaceGrid {
    /// Grid dimensions as `[nx, ny]`
    pub fn grid_size(&self) -> [usize; 2] {
        [self.xs.len(), self.ys.len()]
    }
}

/// Evaluate an expression over a rectangular grid
///
/// A single free variable varies along x (constant along y); two free
/// variables bind to `(x, y)` in sorted-name order. NaN heights become
/// `nonfinite_fallback`; infinities snap to the z-range edge; all heights
/// clip to the z-range widened by half its span on each side.
pub fn sample_surface(
    expr: &dyn PlotExpression,
    x_range: (f64, f64),
    y_range: (f64, f64),
    (nx, ny): (usize, usize),
    z_range: (f64, f64),
    nonfinite_fallback: f64,
    max_cells: usize,
) -> Result<SurfaceGrid> {
    if nx < 2 || ny < 2 {
        return Err(PlotError::input(
            "invalid-resolution",
            format!("surface resolution must be at least 2x2, got {nx}x{ny}"),
        ));
    }
    let cells = nx.checked_mul(ny).unwrap_or(usize::MAX);
    if cells > max_cells {
        return Err(PlotError::Resource(format!(
            "surface grid of {nx}x{ny} cells exceeds the limit of {max_cells}"
        )));
    }
    let nvars = expr.free_vars().len();
    if nvars > 2 {
        return Err(PlotError::input(
            "free-variables",
            format!("surface plotting supports at most two free variables, found {nvars}"),
        ));
    }

    let (z_lo, z_hi) = z_range;
    let guard = 0.5 * (z_hi - z_lo);
    let (clip_lo, clip_hi) = (z_lo - guard, z_hi + guard);

    let xs = linspace(x_range.0, x_range.1, nx);
    let ys = linspace(y_range.0, y_range.1, ny);

    let zs: Vec<Vec<f64>> = ys
        .par_iter()
        .map(|&y| {
            xs.iter()
                .map(|&x| {
                    let value = match nvars {
                        0 => expr.eval(&[]),
                        1 => expr.eval(&[x]),
                        _ => expr.eval(&[x, y]),
                    };
                    let z = match value {
                        Some(v) if v.is_finite() => v,
                        Some(v) if v == f64::INFINITY => z_hi,
                        Some(v) if v == f64::NEG_INFINITY => z_lo,
                        _ => nonfinite_fallback,
                    };
                    z.clamp(clip_lo, clip_hi)
                })
                .collect()
        })
        .collect();

    log::trace!(target: "mathforge_plot", "surface grid evaluated: {nx}x{ny}");
    Ok(SurfaceGrid { xs, ys, zs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SymExprAdapter;
    use mathforge_symbolic::SymExpr;

    #[test]
    fn test_paraboloid_grid() {
        // x^2 + y^2 on [-2,2]^2
        let x = SymExpr::var("x");
        let y = SymExpr::var("y");
        let e = SymExprAdapter::new(
            SymExpr::pow(x, SymExpr::int(2)) + SymExpr::pow(y, SymExpr::int(2)),
        );
        let grid = sample_surface(
            &e,
            (-2.0, 2.0),
            (-2.0, 2.0),
            (5, 5),
            (-10.0, 10.0),
            0.0,
            1_000_000,
        )
        .unwrap();
        assert_eq!(grid.grid_size(), [5, 5]);
        // Corner (x=-2, y=-2) -> 8; center -> 0
        assert!((grid.zs[0][0] - 8.0).abs() < 1e-12);
        assert!((grid.zs[2][2]).abs() < 1e-12);
    }

    #[test]
    fn test_single_variable_varies_along_x() {
        let e = SymExprAdapter::new(SymExpr::var("x"));
        let grid = sample_surface(
            &e,
            (0.0, 1.0),
            (0.0, 1.0),
            (3, 3),
            (-10.0, 10.0),
            0.0,
            1_000_000,
        )
        .unwrap();
        // Rows identical; columns follow x
        assert_eq!(grid.zs[0], grid.zs[2]);
        assert!((grid.zs[0][0]).abs() < 1e-12);
        assert!((grid.zs[0][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nonfinite_replacement_and_clipping() {
        // 1/x over a grid crossing zero: the pole column is replaced, and
        // neighbors clip into the guarded range
        let e = SymExprAdapter::new(SymExpr::int(1) / SymExpr::var("x"));
        let grid = sample_surface(
            &e,
            (-1.0, 1.0),
            (-1.0, 1.0),
            (3, 3),
            (-10.0, 10.0),
            0.0,
            1_000_000,
        )
        .unwrap();
        // x = 0 column: 1/0 = +inf snaps to z_hi
        assert_eq!(grid.zs[0][1], 10.0);
        // Finite values stay within [z_lo - guard, z_hi + guard]
        for row in &grid.zs {
            for &z in row {
                assert!((-20.0..=20.0).contains(&z));
            }
        }
    }

    #[test]
    fn test_nan_uses_fallback() {
        // sqrt(x) is NaN for negative x
        let e = SymExprAdapter::new(SymExpr::sqrt(SymExpr::var("x")));
        let grid = sample_surface(
            &e,
            (-1.0, 1.0),
            (0.0, 1.0),
            (3, 2),
            (-10.0, 10.0),
            0.5,
            1_000_000,
        )
        .unwrap();
        assert_eq!(grid.zs[0][0], 0.5);
    }

    #[test]
    fn test_resolution_validation() {
        let e = SymExprAdapter::new(SymExpr::var("x"));
        assert!(sample_surface(
            &e,
            (0.0, 1.0),
            (0.0, 1.0),
            (1, 5),
            (-10.0, 10.0),
            0.0,
            1_000_000
        )
        .is_err());
    }

    #[test]
    fn test_cell_limit() {
        let e = SymExprAdapter::new(SymExpr::var("x"));
        let result = sample_surface(
            &e,
            (0.0, 1.0),
            (0.0, 1.0),
            (3000, 3000),
            (-10.0, 10.0),
            0.0,
            1_000_000,
        );
        assert!(matches!(result, Err(PlotError::Resource(_))));
    }
}
