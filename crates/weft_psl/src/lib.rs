//! The PSL property node family.
//!
//! Property nodes form small expression trees: directives and temporal
//! operators wrap one operand, SEREs and implications hold an ordered operand
//! list, and HDL expressions point into the host language's syntax tree
//! through an opaque [`ForeignRef`](weft_object::ForeignRef).

#![warn(missing_docs)]

pub mod graph;
pub mod kind;
pub mod node;

pub use graph::PslGraph;
pub use kind::{PslClass, PslKind, PSL_CLASS};
pub use node::{PslId, PslNode};
