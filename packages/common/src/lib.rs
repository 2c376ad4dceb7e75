//! Shared traversal over parsed markup trees.

pub mod visitor;

pub use visitor::*;
