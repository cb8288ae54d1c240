//! Plot compilation entry point
//!
//! Wires the components together: detection and classification on the
//! input expression, the fallback chain when the native renderer cannot
//! evaluate it, singularity-avoiding partitioning for 2D, numeric
//! materialization with color mapping for 3D and complex output, and
//! final artifact assembly with provenance metadata.
//!
//! One call consumes one expression plus options and returns one
//! artifact; nothing is retained across requests, and identical requests
//! produce byte-identical artifacts.

use crate::artifact::{AxisMetadata, MeshData, PlotArtifact, RasterImage, VectorCode};
use crate::color::{
    map_complex_colors, map_surface_colors, ColorPreset, ColorScheme, ColorSource,
};
use crate::emit::emit_directives;
use crate::expr::PlotExpression;
use crate::fallback::{self, FallbackStage};
use crate::mesh::sample_surface;
use crate::options::{PlotOptions, SchemeKind};
use crate::partition::partition;
use crate::sample::{sample_complex_grid, sample_table};
use crate::singularity::detect_singularities;
use crate::{PlotError, Result};

/// Output mode, a closed set so dispatch is exhaustiveness-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    Plot2d,
    Plot3d,
    ComplexDomain,
}

impl PlotMode {
    /// Parse the wire-level mode token
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "2d" => Some(PlotMode::Plot2d),
            "3d" => Some(PlotMode::Plot3d),
            "complex" | "c" => Some(PlotMode::ComplexDomain),
            _ => None,
        }
    }
}

/// Compile an expression into a plot artifact
pub fn compile_plot(
    expr: &dyn PlotExpression,
    mode: PlotMode,
    opts: &PlotOptions,
) -> Result<PlotArtifact> {
    match mode {
        PlotMode::Plot2d => compile_2d(expr, opts),
        PlotMode::Plot3d => compile_3d(expr, opts),
        PlotMode::ComplexDomain => compile_complex(expr, opts),
    }
}

fn validate_range(code: &'static str, (lo, hi): (f64, f64)) -> Result<()> {
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(PlotError::input(
            code,
            format!("invalid range [{lo}, {hi}]"),
        ));
    }
    Ok(())
}

fn compile_2d(expr: &dyn PlotExpression, opts: &PlotOptions) -> Result<PlotArtifact> {
    let vars = expr.free_vars();
    if vars.len() > 1 {
        return Err(PlotError::Input {
            code: "free-variables",
            message: format!(
                "2D plotting requires a single free variable, found {}",
                vars.len()
            ),
            detail: Some(vars.join(", ")),
        });
    }
    let var = vars.first().cloned().unwrap_or_else(|| "x".to_string());

    let domain = opts.x_range.unwrap_or((-10.0, 10.0));
    validate_range("invalid-domain", domain)?;
    if opts.samples > opts.max_cells {
        return Err(PlotError::Resource(format!(
            "{} samples exceeds the limit of {}",
            opts.samples, opts.max_cells
        )));
    }

    log::debug!(
        target: "mathforge_plot",
        "2d compile: var={var} domain=[{}, {}] samples={}",
        domain.0,
        domain.1,
        opts.samples
    );

    let singularities = detect_singularities(expr, &var, domain, &opts.detector);
    let outcome = fallback::resolve(expr, &var, domain, opts);
    let intervals = partition(domain, &singularities, opts.guard, opts.samples);

    let axis = AxisMetadata {
        x_label: var.clone(),
        y_label: format!("f({var})"),
        x_range: domain,
        y_range: None,
        value_clip: Some((-opts.clip, opts.clip)),
        warnings: outcome.warnings.clone(),
        provenance: outcome.stage.to_string(),
    };

    if outcome.is_native() {
        let expr_str = outcome
            .replacement
            .as_deref()
            .map(|r| r.render_string())
            .unwrap_or_else(|| expr.render_string());
        let fragments = emit_directives(&expr_str, &intervals);
        Ok(PlotArtifact::VectorCode(VectorCode { fragments, axis }))
    } else {
        // Numeric materialization samples the original expression, never
        // a fallback substitute, to preserve fidelity.
        let table = sample_table(expr, &intervals, opts.clip);
        Ok(PlotArtifact::NumericTable { table, axis })
    }
}

/// Resolve the color source shared by 3D and complex schemes
fn color_source(opts: &PlotOptions) -> ColorSource {
    if let Some(stops) = &opts.stops {
        ColorSource::Stops(stops.clone())
    } else {
        ColorSource::Preset(opts.preset.unwrap_or(ColorPreset::Viridis))
    }
}

fn surface_scheme(opts: &PlotOptions) -> ColorScheme {
    let source = color_source(opts);
    match opts.scheme {
        SchemeKind::Uniform => ColorScheme::Uniform(
            opts.uniform_color
                .unwrap_or(glam::Vec3::new(0.267, 0.005, 0.329)),
        ),
        SchemeKind::Gradient => ColorScheme::GradientMagnitude(source),
        SchemeKind::Height => ColorScheme::Height {
            source,
            clip: opts.z_range,
        },
        SchemeKind::Complex => {
            log::debug!(
                target: "mathforge_plot",
                "complex scheme requested for a real surface; using height mapping"
            );
            ColorScheme::Height {
                source,
                clip: opts.z_range,
            }
        }
        SchemeKind::Auto => match opts.uniform_color {
            Some(color) => ColorScheme::Uniform(color),
            None => ColorScheme::Height {
                source,
                clip: opts.z_range,
            },
        },
    }
}

fn compile_3d(expr: &dyn PlotExpression, opts: &PlotOptions) -> Result<PlotArtifact> {
    let vars = expr.free_vars();
    if vars.len() > 2 {
        return Err(PlotError::Input {
            code: "free-variables",
            message: format!(
                "3D plotting requires at most two free variables, found {}",
                vars.len()
            ),
            detail: Some(vars.join(", ")),
        });
    }

    let x_range = opts.x_range.unwrap_or((-5.0, 5.0));
    let y_range = opts.y_range.unwrap_or((-5.0, 5.0));
    let z_range = opts.z_range.unwrap_or((-10.0, 10.0));
    validate_range("invalid-domain", x_range)?;
    validate_range("invalid-domain", y_range)?;
    validate_range("invalid-domain", z_range)?;
    let res = opts.resolution.unwrap_or(30);

    log::debug!(
        target: "mathforge_plot",
        "3d compile: vars={vars:?} grid={res}x{res}"
    );

    let grid = sample_surface(
        expr,
        x_range,
        y_range,
        (res, res),
        z_range,
        opts.nonfinite_fallback,
        opts.max_cells,
    )?;
    let scheme = surface_scheme(opts);
    let colors = map_surface_colors(&grid, &scheme);

    let raster = if opts.export {
        Some(RasterImage::from_colors(
            grid.xs.len(),
            grid.ys.len(),
            &colors,
        ))
    } else {
        None
    };

    let axis = AxisMetadata {
        x_label: vars.first().cloned().unwrap_or_else(|| "x".to_string()),
        y_label: vars.get(1).cloned().unwrap_or_else(|| "y".to_string()),
        x_range,
        y_range: Some(y_range),
        value_clip: Some(z_range),
        warnings: Vec::new(),
        provenance: FallbackStage::Numeric.to_string(),
    };
    let mesh = MeshData::from_grid(&grid, colors, expr.render_string());

    Ok(PlotArtifact::Mesh { mesh, axis, raster })
}

fn compile_complex(expr: &dyn PlotExpression, opts: &PlotOptions) -> Result<PlotArtifact> {
    let re_range = opts.x_range.unwrap_or((-2.0, 2.0));
    let im_range = opts.y_range.unwrap_or((-2.0, 2.0));
    validate_range("invalid-domain", re_range)?;
    validate_range("invalid-domain", im_range)?;
    let res = opts.resolution.unwrap_or(100);

    log::debug!(
        target: "mathforge_plot",
        "complex compile: grid={res}x{res} mode={:?}",
        opts.complex_mode
    );

    let field = sample_complex_grid(expr, re_range, im_range, (res, res), opts.max_cells)?;
    let colors = map_complex_colors(&field, opts.complex_mode, &color_source(opts));
    let image = RasterImage::from_colors(field.width(), field.height(), &colors);

    let png = if opts.export {
        Some(image.to_png_bytes()?)
    } else {
        None
    };

    let axis = AxisMetadata {
        x_label: "Re".to_string(),
        y_label: "Im".to_string(),
        x_range: re_range,
        y_range: Some(im_range),
        value_clip: None,
        warnings: Vec::new(),
        provenance: FallbackStage::Numeric.to_string(),
    };

    Ok(PlotArtifact::Raster { image, axis, png })
}
