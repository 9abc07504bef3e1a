//! Canopy - a tree explorer kept in sync with a diagram graph.
//!
//! A diagram is an attributed directed graph; its containment edges form a
//! forest. Canopy projects that forest onto a navigable outline and keeps
//! the outline consistent as nodes are added, updated, removed or cleared,
//! without re-walking the whole graph for every change. It also bridges
//! selection between the outline and the diagram canvas.
//!
//! The pieces, leaves first:
//!
//! - [`traverse`]: deterministic depth-first containment traversal
//! - [`classify`]: leaf/container classification and item labels
//! - [`glyph`]: icon resolution seam
//! - [`tree`]: tree items, the [`tree::TreeView`] surface and the in-memory
//!   [`tree::Projection`]
//! - [`sync`]: [`sync::TreeSyncController`], the incremental update engine
//! - [`selection`] and [`scope`]: selection bridge and context filtering
//! - [`Explorer`]: the session object tying them to one bound canvas

pub mod canvas;
pub mod classify;
pub mod config;
pub mod glyph;
pub mod scope;
pub mod selection;
pub mod sync;
pub mod traverse;
pub mod tree;

mod error;
mod explorer;

pub use canopy_core::{definition, graph, identifier};

pub use error::{CanopyError, SyncError};
pub use explorer::Explorer;
