//! Error types for Canopy operations.
//!
//! [`CanopyError`] is the error surfaced to hosts (loading configuration,
//! building graphs, reading scenarios). [`SyncError`] describes recoverable
//! failures inside the tree synchronization; those never reach the caller of
//! a sync operation and are reported as diagnostics instead.

use std::{io, ops::Range};

use thiserror::Error;

use canopy_core::{graph::GraphError, identifier::Id};

/// The main error type for Canopy operations.
///
/// # Diagnostic Variants
///
/// The `Scenario` variant keeps the offending source text and, when known,
/// the byte span of the error so that front ends can render a labelled
/// report.
#[derive(Debug, Error)]
pub enum CanopyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}")]
    Scenario {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },
}

impl CanopyError {
    /// Create a new `Scenario` error with the associated source text.
    pub fn new_scenario_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Scenario {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}

/// Recoverable failure while applying a change to the tree projection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Parent item `{parent}` of `{child}` is not in the tree")]
    MissingParentItem { parent: Id, child: Id },

    #[error("Node `{0}` is not in the graph")]
    UnknownNode(Id),
}
