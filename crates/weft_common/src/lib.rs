//! Foundational types shared by every node family in weft.
//!
//! Provides interned identifiers, source locations attached to every node, and
//! the content hash used to checksum persisted node images.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod loc;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use loc::{FileId, Loc};
