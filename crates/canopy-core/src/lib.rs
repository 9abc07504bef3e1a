//! Canopy Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Canopy explorer
//! and its hosts. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Definitions**: Node content payloads ([`definition::Definition`])
//! - **Graph**: The containment graph contract and an in-memory
//!   implementation ([`graph`] module)

pub mod definition;
pub mod graph;
pub mod identifier;
