//! Export functionality for Tapeloom diagrams.
//!
//! The [`Exporter`] trait turns a [`Diagram`] snapshot into an output
//! format. Exporters only read the diagram: every shape is derived from
//! node positions and control offsets at export time.
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`TapeloomError::Export`] at the crate
//! boundary.
//!
//! [`TapeloomError::Export`]: crate::TapeloomError::Export

/// SVG export backend.
pub mod svg;

use thiserror::Error;

use crate::diagram::Diagram;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Exports the current state of a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the diagram cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_diagram(&mut self, diagram: &Diagram) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug, Error)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error encountered while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
