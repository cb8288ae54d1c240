//! Plot request options
//!
//! A typed options struct with sensible defaults, plus a tolerant parser
//! for the `key=value` strings the request-framing collaborator hands
//! through. Unknown keys are logged and ignored; strict validation of the
//! outer request shape belongs to the framing layer, not here.

use crate::color::{ColorPreset, ColorStop, ComplexDecomposition};
use crate::singularity::DetectorConfig;
use glam::Vec3;

/// Caller-forced approximation method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproxMethod {
    Taylor,
    Stirling,
    Exponential,
    Trig,
}

/// Color scheme selection; `Auto` resolves per mode at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    Auto,
    Uniform,
    Gradient,
    Height,
    Complex,
}

/// All recognized plot options
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Total 2D sample budget, divided across partitioned intervals
    pub samples: usize,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    /// Explicit z-range; also the color clip range for height mapping
    pub z_range: Option<(f64, f64)>,
    /// Grid resolution per axis for 3D and complex output
    pub resolution: Option<usize>,
    /// Magnitude bound for 2D table values
    pub clip: f64,
    pub scheme: SchemeKind,
    pub preset: Option<ColorPreset>,
    pub stops: Option<Vec<ColorStop>>,
    pub uniform_color: Option<Vec3>,
    pub complex_mode: ComplexDecomposition,
    /// Also produce a static raster/PNG
    pub export: bool,
    /// Force numeric materialization regardless of classification
    pub force_numeric: bool,
    pub approx: Option<ApproxMethod>,
    /// Sample densities above this go numeric even for compatible
    /// expressions
    pub native_sample_limit: usize,
    /// Guard band subtracted/added around each singularity
    pub guard: f64,
    /// Replacement height for NaN results in 3D grids
    pub nonfinite_fallback: f64,
    /// Upper bound on grid cells per request
    pub max_cells: usize,
    pub detector: DetectorConfig,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            samples: 100,
            x_range: None,
            y_range: None,
            z_range: None,
            resolution: None,
            clip: 15.0,
            scheme: SchemeKind::Auto,
            preset: None,
            stops: None,
            uniform_color: None,
            complex_mode: ComplexDecomposition::AbsPhase,
            export: false,
            force_numeric: false,
            approx: None,
            native_sample_limit: 100,
            guard: 0.05,
            nonfinite_fallback: 0.0,
            max_cells: 4_000_000,
            detector: DetectorConfig::default(),
        }
    }
}

impl PlotOptions {
    /// Parse `key=value` pairs and bare flags, tolerantly
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Self {
        let mut opts = Self::default();
        for pair in pairs {
            let pair = pair.as_ref().trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (pair, None),
            };
            match (key, value) {
                ("samples", Some(v)) => {
                    if let Ok(n) = v.parse() {
                        opts.samples = n;
                    }
                }
                ("resolution", Some(v)) => opts.resolution = v.parse().ok(),
                ("x", Some(v)) => opts.x_range = parse_range(v),
                ("y", Some(v)) => opts.y_range = parse_range(v),
                ("z", Some(v)) => opts.z_range = parse_range(v),
                ("clip", Some(v)) => {
                    if let Ok(c) = v.parse() {
                        opts.clip = c;
                    }
                }
                ("scheme", Some(v)) => {
                    opts.scheme = match v {
                        "uniform" => SchemeKind::Uniform,
                        "gradient" => SchemeKind::Gradient,
                        "height" => SchemeKind::Height,
                        "complex" => SchemeKind::Complex,
                        other => {
                            log::debug!(target: "mathforge_plot", "unknown scheme: {other}");
                            opts.scheme
                        }
                    }
                }
                ("preset", Some(v)) => opts.preset = ColorPreset::parse(v),
                ("stops", Some(v)) => opts.stops = parse_stops(v),
                ("color", Some(v)) => opts.uniform_color = parse_color(v),
                ("complex", Some(v)) => {
                    if let Some(mode) = ComplexDecomposition::parse(v) {
                        opts.complex_mode = mode;
                    }
                }
                ("approx", Some(v)) => {
                    opts.approx = match v {
                        "taylor" => Some(ApproxMethod::Taylor),
                        "stirling" => Some(ApproxMethod::Stirling),
                        "exp" => Some(ApproxMethod::Exponential),
                        "trig" => Some(ApproxMethod::Trig),
                        other => {
                            log::debug!(target: "mathforge_plot", "unknown approximation method: {other}");
                            None
                        }
                    }
                }
                ("export", None) => opts.export = true,
                ("use_dat", None) => opts.force_numeric = true,
                _ => {
                    log::debug!(target: "mathforge_plot", "ignoring unrecognized option: {pair}");
                }
            }
        }
        opts
    }
}

fn parse_range(s: &str) -> Option<(f64, f64)> {
    let (lo, hi) = s.split_once(',')?;
    let lo: f64 = lo.trim().parse().ok()?;
    let hi: f64 = hi.trim().parse().ok()?;
    Some((lo, hi))
}

/// A color is either a named constant or `r,g,b` components in [0,1]
fn parse_color(s: &str) -> Option<Vec3> {
    match s {
        "black" => return Some(Vec3::new(0.0, 0.0, 0.0)),
        "white" => return Some(Vec3::new(1.0, 1.0, 1.0)),
        "red" => return Some(Vec3::new(1.0, 0.0, 0.0)),
        "green" => return Some(Vec3::new(0.0, 0.5, 0.0)),
        "blue" => return Some(Vec3::new(0.0, 0.0, 1.0)),
        "cyan" => return Some(Vec3::new(0.0, 0.75, 0.75)),
        "magenta" => return Some(Vec3::new(0.75, 0.0, 0.75)),
        "yellow" => return Some(Vec3::new(0.75, 0.75, 0.0)),
        "orange" => return Some(Vec3::new(1.0, 0.5, 0.0)),
        "gray" | "grey" => return Some(Vec3::new(0.5, 0.5, 0.5)),
        _ => {}
    }
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return None;
    }
    let r: f64 = parts[0].trim().parse().ok()?;
    let g: f64 = parts[1].trim().parse().ok()?;
    let b: f64 = parts[2].trim().parse().ok()?;
    Some(Vec3::new(r as f32, g as f32, b as f32))
}

/// Stop lists look like `0:blue;0.5:1,0.5,0;1:red`
fn parse_stops(s: &str) -> Option<Vec<ColorStop>> {
    let mut stops = Vec::new();
    for part in s.split(';') {
        let (pos, color) = part.split_once(':')?;
        let pos: f64 = pos.trim().parse().ok()?;
        let color = parse_color(color.trim())?;
        stops.push(ColorStop {
            pos: pos.clamp(0.0, 1.0),
            color,
        });
    }
    if stops.is_empty() {
        return None;
    }
    stops.sort_by(|a, b| a.pos.partial_cmp(&b.pos).unwrap_or(std::cmp::Ordering::Equal));
    Some(stops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = PlotOptions::default();
        assert_eq!(o.samples, 100);
        assert_eq!(o.clip, 15.0);
        assert!(!o.force_numeric);
        assert_eq!(o.complex_mode, ComplexDecomposition::AbsPhase);
    }

    #[test]
    fn test_parse_pairs() {
        let o = PlotOptions::from_pairs(&["samples=200", "x=-5,5", "use_dat", "export"]);
        assert_eq!(o.samples, 200);
        assert_eq!(o.x_range, Some((-5.0, 5.0)));
        assert!(o.force_numeric);
        assert!(o.export);
    }

    #[test]
    fn test_parse_color_and_scheme() {
        let o = PlotOptions::from_pairs(&["scheme=gradient", "preset=plasma", "color=0.1,0.2,0.3"]);
        assert_eq!(o.scheme, SchemeKind::Gradient);
        assert_eq!(o.preset, Some(ColorPreset::Plasma));
        let c = o.uniform_color.unwrap();
        assert!((c.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_parse_stops_sorted() {
        let o = PlotOptions::from_pairs(&["stops=1:red;0:blue"]);
        let stops = o.stops.unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].pos, 0.0);
        assert_eq!(stops[1].pos, 1.0);
    }

    #[test]
    fn test_parse_approx() {
        let o = PlotOptions::from_pairs(&["approx=stirling"]);
        assert_eq!(o.approx, Some(ApproxMethod::Stirling));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let o = PlotOptions::from_pairs(&["frobnicate=7", "mystery"]);
        assert_eq!(o.samples, 100);
    }

    #[test]
    fn test_complex_mode() {
        let o = PlotOptions::from_pairs(&["complex=real-imag"]);
        assert_eq!(o.complex_mode, ComplexDecomposition::RealImag);
    }
}
