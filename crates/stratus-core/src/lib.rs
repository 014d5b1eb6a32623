//! Stratus Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Stratus placement
//! validator and layout engine. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Nodes**: The diagram node model ([`node::DiagramNode`], [`node::NodeKind`])
//! - **Catalog**: The static service registry ([`catalog`] module)
//! - **Errors**: Parse errors for the textual forms of the above ([`error::ParseError`])

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod node;

pub use error::ParseError;
