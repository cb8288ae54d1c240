//! MathForge plot compilation pipeline
//!
//! Turns a symbolic expression into a renderable artifact: native 2D draw
//! directives for a vector renderer, a numeric sample table, a colored 3D
//! surface mesh, or a complex-domain-coloring raster.
//!
//! The pipeline is a pure function of (expression, mode, options): it
//! detects real singularities, classifies the expression against the
//! native renderer's function set, walks a staged approximation fallback
//! when classification fails, partitions the domain around singularities,
//! and materializes either draw directives or numeric samples with
//! per-sample color mapping for 3D and complex output.
//!
//! Expressions enter through the [`PlotExpression`] capability trait; the
//! pipeline never assumes a concrete symbolic representation. An adapter
//! for the `mathforge-symbolic` engine is provided in [`adapter`].

pub mod adapter;
pub mod artifact;
pub mod classify;
pub mod color;
pub mod emit;
pub mod expr;
pub mod fallback;
pub mod mesh;
pub mod options;
pub mod partition;
pub mod pipeline;
pub mod sample;
pub mod singularity;

pub use adapter::SymExprAdapter;
pub use artifact::{AxisMetadata, MeshData, PlotArtifact, RasterImage, VectorCode};
pub use classify::is_native_renderable;
pub use color::{ColorPreset, ColorScheme, ColorSource, ColorStop, ComplexDecomposition};
pub use expr::{PlotExpression, RewriteKind};
pub use fallback::{FallbackOutcome, FallbackStage};
pub use options::{ApproxMethod, PlotOptions, SchemeKind};
pub use partition::Interval;
pub use pipeline::{compile_plot, PlotMode};
pub use singularity::{detect_singularities, DetectorConfig};

/// Error type for plot compilation
///
/// Per-sample evaluation failures are not errors: they are recovered
/// locally as non-finite sentinels so a single bad point never aborts a
/// plot. Only request-level problems surface here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlotError {
    /// The request itself is unusable (bad variable set, empty domain, ...)
    #[error("input error [{code}]: {message}")]
    Input {
        code: &'static str,
        message: String,
        detail: Option<String>,
    },

    /// The requested grid exceeds configured limits
    #[error("resource limit exceeded: {0}")]
    Resource(String),
}

impl PlotError {
    pub(crate) fn input(code: &'static str, message: impl Into<String>) -> Self {
        PlotError::Input {
            code,
            message: message.into(),
            detail: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
