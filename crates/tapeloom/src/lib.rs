//! Tapeloom - the synchronization core of a visual Turing-machine editor.
//!
//! A [`Diagram`] mirrors an automaton model. Edit intents go down to the
//! model through an [`Editor`]; the model confirms every change by
//! publishing typed notifications on a synchronous [`bus::EventBus`], and
//! the diagram updates itself from those notifications only.
//!
//! ```text
//! gesture ─▶ Editor ─▶ model mutator ─▶ Notification ─▶ Diagram
//!             │                                          ▲
//!             └──── PendingCreation (positions, controls, colors) ┘
//! ```

pub mod bus;
pub mod config;
pub mod diagram;
pub mod editor;
pub mod export;
pub mod machine;
pub mod model;
pub mod pending;
pub mod scenario;

mod error;

pub use tapeloom_core::{color, curve, geometry, registry};

pub use diagram::Diagram;
pub use editor::Editor;
pub use error::{ConsistencyError, EditorError, TapeloomError};
pub use machine::Machine;
pub use scenario::Scenario;

use log::{debug, info};

use config::AppConfig;
use export::{Exporter, svg::SvgBuilder};

/// Builder for configured editing sessions and their export.
///
/// # Examples
///
/// ```
/// use tapeloom::{SessionBuilder, config::AppConfig};
///
/// let builder = SessionBuilder::new(AppConfig::default());
/// let mut editor = builder.editor().unwrap();
/// editor.request_add_state(12.0, 34.0, Some("q0")).unwrap();
///
/// let svg = builder.render_svg(editor.diagram()).unwrap();
/// assert!(svg.contains("q0"));
/// ```
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: AppConfig,
}

impl SessionBuilder {
    /// Create a new session builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates an editor over an empty reference [`Machine`].
    ///
    /// # Errors
    ///
    /// Returns [`TapeloomError::Config`] if the head palette is invalid.
    pub fn editor(&self) -> Result<Editor<Machine>, TapeloomError> {
        let diagram = self.config.diagram().map_err(TapeloomError::Config)?;
        Ok(Editor::new(Machine::new(), diagram))
    }

    /// Replays a scenario into a fresh editor.
    ///
    /// # Errors
    ///
    /// Returns [`TapeloomError::Edit`] for the first step that fails.
    pub fn replay(&self, scenario: &Scenario) -> Result<Editor<Machine>, TapeloomError> {
        let mut editor = self.editor()?;
        scenario.replay(&mut editor)?;
        Ok(editor)
    }

    /// Render a diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`TapeloomError::Export`] if the style configuration is invalid.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, TapeloomError> {
        let svg = SvgBuilder::new("")
            .with_style(self.config.style())
            .build()?
            .render_to_string(diagram);
        debug!(length = svg.len(); "SVG rendered");
        Ok(svg)
    }

    /// Render a diagram and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TapeloomError::Export`] for style or I/O failures.
    pub fn export_svg(&self, diagram: &Diagram, path: &str) -> Result<(), TapeloomError> {
        info!(path; "Exporting diagram");
        let mut exporter = SvgBuilder::new(path)
            .with_style(self.config.style())
            .build()?;
        exporter.export_diagram(diagram)?;
        Ok(())
    }
}
