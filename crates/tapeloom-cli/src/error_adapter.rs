//! Error adapter for converting [`TapeloomError`] to miette diagnostics.
//!
//! The library reports errors through plain [`std::error::Error`] types.
//! This module bridges them to miette's graphical report handler used by
//! the CLI binary.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use tapeloom::TapeloomError;

/// Adapter giving a [`TapeloomError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a TapeloomError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TapeloomError::Io(_) => "tapeloom::io",
            TapeloomError::Config(_) => "tapeloom::config",
            TapeloomError::Scenario(_) => "tapeloom::scenario",
            TapeloomError::Edit { .. } => "tapeloom::edit",
            TapeloomError::Export(_) => "tapeloom::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TapeloomError::Config(_) => "check the [geometry] and [style] tables of the configuration file",
            TapeloomError::Scenario(_) => "each step is a [[step]] table with an `op` key",
            TapeloomError::Edit { .. } => {
                "states are named by their displayed name; tapes and transitions by the name the scenario gave them"
            }
            TapeloomError::Io(_) | TapeloomError::Export(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`TapeloomError`] into a list of reportable errors.
pub fn to_reportables(err: &TapeloomError) -> Vec<Reportable<'_>> {
    vec![Reportable::Error(ErrorAdapter(err))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_error_code_and_help() {
        let err = TapeloomError::Edit {
            step: 3,
            message: "no state named `q9`".to_string(),
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let reportable = &reportables[0];
        assert_eq!(
            reportable.to_string(),
            "Edit failed at step 3: no state named `q9`"
        );
        assert_eq!(reportable.code().unwrap().to_string(), "tapeloom::edit");
        assert!(reportable.help().is_some());
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = TapeloomError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));

        let reportables = to_reportables(&err);
        let reportable = &reportables[0];
        assert_eq!(reportable.code().unwrap().to_string(), "tapeloom::io");
        assert!(reportable.help().is_none());
        assert!(reportable.labels().is_none());
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = TapeloomError::Scenario("missing field `op`".to_string());
        let reporter = miette::GraphicalReportHandler::new();

        let mut writer = String::new();
        for reportable in to_reportables(&err) {
            reporter.render_report(&mut writer, &reportable).unwrap();
        }

        assert!(writer.contains("missing field `op`"));
        assert!(writer.contains("tapeloom::scenario"));
    }
}
