//! Plot artifacts
//!
//! The immutable output of one compilation request: native vector code, a
//! numeric sample table, a colored surface mesh, or an RGB raster. Each
//! artifact carries axis metadata with any advisory warnings and the
//! provenance of the fallback stage that produced it.

use crate::mesh::SurfaceGrid;
use crate::sample::SampleTable;
use crate::{PlotError, Result};
use glam::Vec3;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use serde::Serialize;

/// Axis and provenance metadata riding on every artifact
#[derive(Debug, Clone, Serialize)]
pub struct AxisMetadata {
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: Option<(f64, f64)>,
    /// Value-axis restriction applied during materialization, if any
    pub value_clip: Option<(f64, f64)>,
    /// Advisory notes (approximation substitutions and the like)
    pub warnings: Vec<String>,
    /// Which fallback stage produced the renderable form
    pub provenance: String,
}

/// Native draw directives plus axis metadata
#[derive(Debug, Clone, Serialize)]
pub struct VectorCode {
    /// Ordered draw-directive fragments; the caller wraps them in
    /// renderer-specific boilerplate
    pub fragments: Vec<String>,
    pub axis: AxisMetadata,
}

impl VectorCode {
    /// All fragments joined into one code block
    pub fn code(&self) -> String {
        self.fragments.join("\n")
    }
}

/// Surface mesh in the interchange shape the viewer consumes: row-major
/// points (y outer, x inner), a parallel color array, and the grid
/// dimensions as `[nx, ny]`
#[derive(Debug, Clone, Serialize)]
pub struct MeshData {
    pub points: Vec<[f64; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub grid_size: [usize; 2],
    pub expr: String,
}

impl MeshData {
    pub fn from_grid(grid: &SurfaceGrid, colors: Vec<Vec3>, expr: String) -> Self {
        let mut points = Vec::with_capacity(grid.xs.len() * grid.ys.len());
        for (j, &y) in grid.ys.iter().enumerate() {
            for (i, &x) in grid.xs.iter().enumerate() {
                points.push([x, y, grid.zs[j][i]]);
            }
        }
        MeshData {
            points,
            colors: colors.into_iter().map(|c| c.to_array()).collect(),
            grid_size: grid.grid_size(),
            expr,
        }
    }
}

/// RGB pixel buffer, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// `3 * width * height` bytes
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Pack per-pixel colors (row-major) into an RGB buffer
    pub fn from_colors(width: usize, height: usize, colors: &[Vec3]) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 3);
        for c in colors {
            pixels.push((c.x.clamp(0.0, 1.0) * 255.0).round() as u8);
            pixels.push((c.y.clamp(0.0, 1.0) * 255.0).round() as u8);
            pixels.push((c.z.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
        RasterImage {
            width: width as u32,
            height: height as u32,
            pixels,
        }
    }

    /// Encode as PNG for static export
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(&self.pixels, self.width, self.height, ColorType::Rgb8)
            .map_err(|e| PlotError::Resource(format!("png encoding failed: {e}")))?;
        Ok(buf)
    }
}

/// The final, immutable result of one plot compilation
#[derive(Debug)]
pub enum PlotArtifact {
    /// Draw directives for the native vector renderer
    VectorCode(VectorCode),
    /// Pre-computed sample rows with segment breaks
    NumericTable {
        table: SampleTable,
        axis: AxisMetadata,
    },
    /// Colored 3D surface mesh, plus a raster of the color grid when a
    /// static export was requested
    Mesh {
        mesh: MeshData,
        axis: AxisMetadata,
        raster: Option<RasterImage>,
    },
    /// Complex-domain-coloring raster, plus PNG bytes when a static
    /// export was requested
    Raster {
        image: RasterImage,
        axis: AxisMetadata,
        png: Option<Vec<u8>>,
    },
}

impl PlotArtifact {
    pub fn axis(&self) -> &AxisMetadata {
        match self {
            PlotArtifact::VectorCode(vc) => &vc.axis,
            PlotArtifact::NumericTable { axis, .. } => axis,
            PlotArtifact::Mesh { axis, .. } => axis,
            PlotArtifact::Raster { axis, .. } => axis,
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.axis().warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_point_order_is_y_outer_x_inner() {
        let grid = SurfaceGrid {
            xs: vec![0.0, 1.0],
            ys: vec![10.0, 11.0],
            zs: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        };
        let colors = vec![Vec3::ZERO; 4];
        let mesh = MeshData::from_grid(&grid, colors, "f".into());
        assert_eq!(mesh.grid_size, [2, 2]);
        assert_eq!(mesh.points[0], [0.0, 10.0, 1.0]);
        assert_eq!(mesh.points[1], [1.0, 10.0, 2.0]);
        assert_eq!(mesh.points[2], [0.0, 11.0, 3.0]);
        assert_eq!(mesh.points[3], [1.0, 11.0, 4.0]);
    }

    #[test]
    fn test_raster_packing() {
        let colors = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.5, 0.5, 0.5),
        ];
        let img = RasterImage::from_colors(2, 2, &colors);
        assert_eq!(img.pixels.len(), 12);
        assert_eq!(&img.pixels[0..3], &[255, 0, 0]);
        assert_eq!(&img.pixels[3..6], &[0, 255, 0]);
        assert_eq!(&img.pixels[9..12], &[128, 128, 128]);
    }

    #[test]
    fn test_png_bytes_have_signature() {
        let img = RasterImage::from_colors(2, 2, &[Vec3::ONE; 4]);
        let png = img.to_png_bytes().unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_mesh_serializes() {
        let grid = SurfaceGrid {
            xs: vec![0.0, 1.0],
            ys: vec![0.0, 1.0],
            zs: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        };
        let mesh = MeshData::from_grid(&grid, vec![Vec3::ZERO; 4], "f".into());
        let json = serde_json::to_string(&mesh).unwrap();
        assert!(json.contains("\"grid_size\":[2,2]"));
        assert!(json.contains("\"points\""));
    }
}
