//! Per-sample color mapping
//!
//! Derives an RGB triple for every sample of a height field or complex
//! field from a configurable scheme: a uniform color, a colormap over the
//! height or its gradient magnitude, or a complex-plane decomposition that
//! maps phase to hue.

use crate::mesh::SurfaceGrid;
use crate::sample::ComplexField;
use glam::Vec3;
use num_complex::Complex64;
use std::f64::consts::TAU;

/// Named colormap presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPreset {
    Jet,
    Hot,
    Cool,
    Gray,
    Viridis,
    Plasma,
    Turbo,
}

impl ColorPreset {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "jet" => Some(ColorPreset::Jet),
            "hot" => Some(ColorPreset::Hot),
            "cool" => Some(ColorPreset::Cool),
            "gray" | "grey" => Some(ColorPreset::Gray),
            "viridis" => Some(ColorPreset::Viridis),
            "plasma" => Some(ColorPreset::Plasma),
            "turbo" => Some(ColorPreset::Turbo),
            _ => None,
        }
    }

    /// Map a normalized value [0,1] to a color
    pub fn map_value(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorPreset::Jet => {
                let r = (1.5 - 4.0 * (t - 0.75).abs()).clamp(0.0, 1.0);
                let g = (1.5 - 4.0 * (t - 0.5).abs()).clamp(0.0, 1.0);
                let b = (1.5 - 4.0 * (t - 0.25).abs()).clamp(0.0, 1.0);
                Vec3::new(r, g, b)
            }
            ColorPreset::Hot => {
                if t < 1.0 / 3.0 {
                    Vec3::new(3.0 * t, 0.0, 0.0)
                } else if t < 2.0 / 3.0 {
                    Vec3::new(1.0, 3.0 * t - 1.0, 0.0)
                } else {
                    Vec3::new(1.0, 1.0, 3.0 * t - 2.0)
                }
            }
            ColorPreset::Cool => Vec3::new(t, 1.0 - t, 1.0),
            ColorPreset::Gray => Vec3::splat(t),
            ColorPreset::Viridis => {
                let r = (0.267004 + t * (0.993248 - 0.267004)).clamp(0.0, 1.0);
                let g = (0.004874 + t * (0.906157 - 0.004874)).clamp(0.0, 1.0);
                let b = (0.329415 + t * (0.143936 - 0.329415) + t * t * 0.5).clamp(0.0, 1.0);
                Vec3::new(r, g, b)
            }
            ColorPreset::Plasma => {
                let r = (0.050383 + t * (0.940015 - 0.050383)).clamp(0.0, 1.0);
                let g = (0.029803 + t * (0.975158 - 0.029803) * (1.0 - t)).clamp(0.0, 1.0);
                let b = (0.527975 + t * (0.131326 - 0.527975)).clamp(0.0, 1.0);
                Vec3::new(r, g, b)
            }
            ColorPreset::Turbo => {
                let r = if t < 0.5 {
                    (0.13 + 0.87 * (2.0 * t).powf(0.25)).clamp(0.0, 1.0)
                } else {
                    (0.8685 + 0.1315 * (2.0 * (1.0 - t)).powf(0.25)).clamp(0.0, 1.0)
                };
                let g = if t < 0.25 {
                    4.0 * t
                } else if t < 0.75 {
                    1.0
                } else {
                    1.0 - 4.0 * (t - 0.75)
                }
                .clamp(0.0, 1.0);
                let b = if t < 0.5 {
                    (0.8 * (1.0 - 2.0 * t).powf(0.25)).clamp(0.0, 1.0)
                } else {
                    (0.1 + 0.9 * (2.0 * t - 1.0).powf(0.25)).clamp(0.0, 1.0)
                };
                Vec3::new(r, g, b)
            }
        }
    }
}

/// A color gradient stop at a normalized position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub pos: f64,
    pub color: Vec3,
}

/// Interpolate a sorted stop list at `v` (clamped to [0,1])
///
/// Queries at or beyond the outermost stops return those stops' colors;
/// queries exactly at a stop position return that stop's color without
/// interpolation error.
pub fn interpolate_stops(stops: &[ColorStop], v: f64) -> Vec3 {
    if stops.is_empty() {
        return Vec3::splat(0.5);
    }
    let v = v.clamp(0.0, 1.0);
    if v <= stops[0].pos {
        return stops[0].color;
    }
    let last = stops[stops.len() - 1];
    if v >= last.pos {
        return last.color;
    }
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if v == a.pos {
            return a.color;
        }
        if v < b.pos {
            let t = ((v - a.pos) / (b.pos - a.pos)) as f32;
            return a.color.lerp(b.color, t);
        }
    }
    last.color
}

/// Where normalized values get their colors from
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    Preset(ColorPreset),
    Stops(Vec<ColorStop>),
}

impl ColorSource {
    pub fn map(&self, t: f64) -> Vec3 {
        match self {
            ColorSource::Preset(p) => p.map_value(t as f32),
            ColorSource::Stops(stops) => interpolate_stops(stops, t),
        }
    }
}

/// How a complex value decomposes into height and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexDecomposition {
    /// Height = magnitude, hue = phase
    AbsPhase,
    /// Height = real part, color = imaginary part
    RealImag,
    /// Height = imaginary part, color = real part
    ImagReal,
}

impl ComplexDecomposition {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "abs-phase" => Some(ComplexDecomposition::AbsPhase),
            "real-imag" => Some(ComplexDecomposition::RealImag),
            "imag-real" => Some(ComplexDecomposition::ImagReal),
            _ => None,
        }
    }
}

/// Color scheme for 3D and complex output
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScheme {
    /// Constant color for every sample
    Uniform(Vec3),
    /// Colormap over the finite-difference gradient magnitude
    GradientMagnitude(ColorSource),
    /// Colormap over the raw height, normalized by an explicit range when
    /// provided, else by the field's observed extrema
    Height {
        source: ColorSource,
        clip: Option<(f64, f64)>,
    },
    /// Complex decomposition (the raster pipeline)
    ComplexDomain(ComplexDecomposition),
}

/// Per-vertex colors for a surface grid, in the grid's row-major
/// (y-outer, x-inner) order
pub fn map_surface_colors(grid: &SurfaceGrid, scheme: &ColorScheme) -> Vec<Vec3> {
    match scheme {
        ColorScheme::Uniform(color) => vec![*color; grid.ys.len() * grid.xs.len()],
        ColorScheme::GradientMagnitude(source) => {
            let mags = gradient_magnitude(grid);
            let flat: Vec<f64> = mags.iter().flatten().copied().collect();
            let norm = Normalizer::observed(&flat);
            flat.iter().map(|&m| source.map(norm.apply(m))).collect()
        }
        ColorScheme::Height { source, clip } => {
            let flat: Vec<f64> = grid.zs.iter().flatten().copied().collect();
            let norm = match clip {
                Some(range) => Normalizer::fixed(*range),
                None => Normalizer::observed(&flat),
            };
            flat.iter().map(|&z| source.map(norm.apply(z))).collect()
        }
        // Complex decomposition has no meaning for a real height field;
        // treat it as a plain height mapping.
        ColorScheme::ComplexDomain(_) => map_surface_colors(
            grid,
            &ColorScheme::Height {
                source: ColorSource::Preset(ColorPreset::Viridis),
                clip: None,
            },
        ),
    }
}

/// Per-pixel colors for a complex field, row-major in the field's order.
/// Samples that failed to evaluate render black.
pub fn map_complex_colors(
    field: &ComplexField,
    mode: ComplexDecomposition,
    source: &ColorSource,
) -> Vec<Vec3> {
    match mode {
        ComplexDecomposition::AbsPhase => field
            .values
            .iter()
            .map(|w| {
                if w.re.is_finite() && w.im.is_finite() {
                    domain_color(*w)
                } else {
                    Vec3::ZERO
                }
            })
            .collect(),
        ComplexDecomposition::RealImag | ComplexDecomposition::ImagReal => {
            let channel: Vec<f64> = field
                .values
                .iter()
                .map(|w| match mode {
                    ComplexDecomposition::RealImag => w.im,
                    _ => w.re,
                })
                .collect();
            let finite: Vec<f64> = channel.iter().copied().filter(|v| v.is_finite()).collect();
            let norm = Normalizer::observed(&finite);
            channel
                .iter()
                .map(|&v| {
                    if v.is_finite() {
                        source.map(norm.apply(v))
                    } else {
                        Vec3::ZERO
                    }
                })
                .collect()
        }
    }
}

/// Classic domain coloring: hue from phase, brightness from magnitude
fn domain_color(w: Complex64) -> Vec3 {
    let phase = (w.arg() / TAU).rem_euclid(1.0);
    let mag = w.norm();
    let value = mag / (1.0 + mag);
    hsv_to_rgb(phase, 0.8, value)
}

/// HSV to RGB with h in [0,1), s and v in [0,1]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Vec3 {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Vec3::new(r as f32, g as f32, b as f32)
}

/// Finite-difference gradient magnitude over the height field
///
/// Central differences in the interior, one-sided at the edges; non-finite
/// heights contribute a zero gradient rather than poisoning neighbors.
fn gradient_magnitude(grid: &SurfaceGrid) -> Vec<Vec<f64>> {
    let ny = grid.ys.len();
    let nx = grid.xs.len();
    let z = &grid.zs;

    let diff = |a: f64, b: f64, da: f64| -> f64 {
        if a.is_finite() && b.is_finite() && da != 0.0 {
            (b - a) / da
        } else {
            0.0
        }
    };

    let mut out = vec![vec![0.0; nx]; ny];
    for j in 0..ny {
        for i in 0..nx {
            let gx = if nx < 2 {
                0.0
            } else if i == 0 {
                diff(z[j][0], z[j][1], grid.xs[1] - grid.xs[0])
            } else if i == nx - 1 {
                diff(z[j][nx - 2], z[j][nx - 1], grid.xs[nx - 1] - grid.xs[nx - 2])
            } else {
                diff(z[j][i - 1], z[j][i + 1], grid.xs[i + 1] - grid.xs[i - 1])
            };
            let gy = if ny < 2 {
                0.0
            } else if j == 0 {
                diff(z[0][i], z[1][i], grid.ys[1] - grid.ys[0])
            } else if j == ny - 1 {
                diff(z[ny - 2][i], z[ny - 1][i], grid.ys[ny - 1] - grid.ys[ny - 2])
            } else {
                diff(z[j - 1][i], z[j + 1][i], grid.ys[j + 1] - grid.ys[j - 1])
            };
            out[j][i] = gx.hypot(gy);
        }
    }
    out
}

/// Normalization of raw field values into [0,1]
struct Normalizer {
    lo: f64,
    span: f64,
}

impl Normalizer {
    /// From the field's own extrema; a constant field falls back to the
    /// identity range [0,1]
    fn observed(values: &[f64]) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in values {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        if !lo.is_finite() || !hi.is_finite() || (hi - lo) < 1e-12 {
            Normalizer { lo: 0.0, span: 1.0 }
        } else {
            Normalizer { lo, span: hi - lo }
        }
    }

    fn fixed((lo, hi): (f64, f64)) -> Self {
        if hi - lo < 1e-12 {
            Normalizer { lo: 0.0, span: 1.0 }
        } else {
            Normalizer { lo, span: hi - lo }
        }
    }

    fn apply(&self, v: f64) -> f64 {
        ((v - self.lo) / self.span).clamp(0.0, 1.0)
    }
}
