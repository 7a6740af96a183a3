//! Reflective node storage shared by the weft node families.
//!
//! A family (netlist e-nodes, PSL nodes) is a Rust sum type whose variants
//! carry exactly the attributes legal for their kind. This crate supplies
//! the attribute-addressable layer on top of that: class descriptors with
//! per-kind legal masks, an arena-backed [`Store`] with typed accessors and
//! ordered reference collections, a write-barrier hook, a compacting
//! collector and the identity-preserving image format.

#![warn(missing_docs)]

pub mod arena;
pub mod barrier;
pub mod class;
pub mod collect;
pub mod error;
pub mod family;
pub mod image;
pub mod store;
pub mod value;

#[cfg(test)]
mod toy;

pub use arena::{Arena, ArenaId};
pub use barrier::{BarrierLog, NoBarrier, WriteBarrier};
pub use class::{AttrKey, AttrMask, ClassDescriptor, ObjectTag};
pub use collect::Relocation;
pub use error::{ImageError, ObjectError, OrFatal};
pub use family::{Family, Kind};
pub use image::{ImageHeader, ImageReader, ImageWriter, IMAGE_FORMAT_VERSION};
pub use store::Store;
pub use value::{ForeignRef, ObjectRef, SlotMut, TypeRef, Value};
