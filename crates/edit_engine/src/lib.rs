//! Edit Engine - commands, the editing host, and find/replace
//!
//! Commands build a new [`doc_model::DocumentTree`] from the current one and
//! the [`EditingEngine`] swaps it in only when the command succeeds. The
//! `find_replace` module drives any [`EditorHost`] through a
//! [`FindReplaceSession`].

mod command;
mod executor;
mod host;
mod error;
mod find_replace;

pub use command::*;
pub use executor::*;
pub use host::*;
pub use error::*;
pub use find_replace::*;
