//! Error adapter for converting CanopyError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Scenario errors
//! carry their TOML source and are rendered with a labelled snippet.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};

use canopy::CanopyError;

/// Adapter wrapping a [`CanopyError`] for rich reporting.
pub struct ErrorAdapter(pub CanopyError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.0)
    }
}

impl Diagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CanopyError::Io(_) => "canopy::io",
            CanopyError::Graph(_) => "canopy::graph",
            CanopyError::Config(_) => "canopy::config",
            CanopyError::Scenario { .. } => "canopy::scenario",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CanopyError::Scenario { .. } => Some(Box::new(
                "scenarios are TOML files with `nodes`, `edges` and `steps` arrays",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            CanopyError::Scenario { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CanopyError::Scenario {
            message,
            span: Some(span),
            ..
        } = &self.0
        else {
            return None;
        };

        let label = LabeledSpan::new_primary_with_span(
            Some(message.clone()),
            SourceSpan::from(span.clone()),
        );
        Some(Box::new(std::iter::once(label)))
    }
}
