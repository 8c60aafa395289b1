//! Document Model - rich-text tree addressed by flat text offsets
//!
//! This crate provides the document collaborator consumed by the find and
//! replace engine: a tagged-variant node tree with stable node IDs, text runs
//! with inline marks, and a document-order traversal that maps every run to
//! its position in the flat offset space.

mod node;
mod node_id;
mod run;
mod selection;
mod traverse;
mod tree;
mod error;

pub use node::*;
pub use node_id::*;
pub use run::*;
pub use selection::*;
pub use traverse::*;
pub use tree::*;
pub use error::*;
