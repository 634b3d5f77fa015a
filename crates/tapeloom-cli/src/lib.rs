//! CLI logic for the Tapeloom scenario runner.
//!
//! Replays a scripted editing session against a fresh editor and writes the
//! resulting diagram as SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use tapeloom::{Scenario, SessionBuilder, TapeloomError};

/// Run the Tapeloom CLI application
///
/// # Errors
///
/// Returns `TapeloomError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scenario files
/// - Refused or failing edit steps
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), TapeloomError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Replaying scenario"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let scenario: Scenario =
        toml::from_str(&source).map_err(|err| TapeloomError::Scenario(err.to_string()))?;

    let builder = SessionBuilder::new(app_config);
    let editor = builder.replay(&scenario)?;

    builder.export_svg(editor.diagram(), &args.output)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
