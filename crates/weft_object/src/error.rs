//! Errors raised by the attribute store and the image reader and writer.
//!
//! Every [`ObjectError`] indicates a bug in the calling pass, never bad user
//! input. Family accessors turn them into panics through [`OrFatal`]; the
//! `Result` form exists so the generic engine and its tests can inspect them.
//! [`ImageError`] covers I/O and malformed image files, which callers handle.

use crate::class::{AttrKey, ObjectTag};
use std::path::PathBuf;

/// A misuse of the node store, naming the offending kind and attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// The key is not in the legal mask of the node's kind.
    #[error("{class} kind {kind} does not have attribute {key}")]
    IllegalAttr {
        /// Family name.
        class: &'static str,
        /// Kind display name.
        kind: &'static str,
        /// The rejected key.
        key: AttrKey,
    },

    /// The key is legal but holds a different representation.
    #[error("attribute {key} of {kind} is not {expected}")]
    ShapeMismatch {
        /// Kind display name.
        kind: &'static str,
        /// The key accessed.
        key: AttrKey,
        /// The representation the caller asked for.
        expected: &'static str,
    },

    /// A mandatory attribute was read before it was assigned.
    #[error("{kind} attribute {key} was never set")]
    UnsetAttr {
        /// Kind display name.
        kind: &'static str,
        /// The unset key.
        key: AttrKey,
    },

    /// `insert_after` could not find its anchor.
    #[error("anchor node {anchor} not found in {key} of {kind}")]
    AnchorNotFound {
        /// Kind display name of the collection owner.
        kind: &'static str,
        /// Collection key.
        key: AttrKey,
        /// Raw handle of the missing anchor.
        anchor: u32,
    },

    /// A positional access past the end of a collection.
    #[error("index {index} out of range for {key} of {kind} with {len} elements")]
    IndexOutOfRange {
        /// Kind display name of the collection owner.
        kind: &'static str,
        /// Collection key.
        key: AttrKey,
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },

    /// A node of the wrong kind was stored into a relation.
    #[error("{kind} cannot hold {target} in {key}")]
    IllegalTarget {
        /// Kind display name of the owner.
        kind: &'static str,
        /// Relation key.
        key: AttrKey,
        /// Kind display name of the rejected node.
        target: &'static str,
    },

    /// The family does not permit this kind transition.
    #[error("{class} node cannot change kind from {from} to {to}")]
    KindChange {
        /// Family name.
        class: &'static str,
        /// Current kind display name.
        from: &'static str,
        /// Requested kind display name.
        to: &'static str,
    },
}

/// Errors raised while writing or reading a persisted node image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// An I/O error on the underlying stream.
    #[error("image I/O error at {path}: {source}")]
    Io {
        /// Name associated with the stream.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The stream does not start with the image magic bytes.
    #[error("{path} is not a weft image")]
    BadMagic {
        /// Name associated with the stream.
        path: PathBuf,
    },

    /// The image was written by an incompatible format version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Name associated with the stream.
        path: PathBuf,
        /// The version this build reads.
        expected: u32,
        /// The version found in the header.
        actual: u32,
    },

    /// The image holds a different node family than the caller asked for.
    #[error("{path} holds {actual} nodes, expected {expected}")]
    TagMismatch {
        /// Name associated with the stream.
        path: PathBuf,
        /// The family the caller reads.
        expected: ObjectTag,
        /// The family recorded in the header.
        actual: ObjectTag,
    },

    /// The payload does not hash to the checksum in the header.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Name associated with the stream.
        path: PathBuf,
        /// Checksum recorded in the header.
        expected: String,
        /// Checksum of the payload actually read.
        actual: String,
    },

    /// The payload decoded but describes an impossible graph.
    #[error("corrupt image {path}: {reason}")]
    Corrupt {
        /// Name associated with the stream.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// bincode failed to encode or decode.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// A node holds an identifier the supplied interner never issued.
    #[error("identifier {raw} is unknown to the interner")]
    UnknownIdent {
        /// Raw key of the identifier.
        raw: u32,
    },

    /// The store rejected an attribute access while walking the graph.
    #[error(transparent)]
    Object(#[from] ObjectError),
}

/// Converts a store result into its value, panicking on contract violations.
pub trait OrFatal<T> {
    /// Returns the value or panics with the error text.
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for Result<T, ObjectError> {
    #[track_caller]
    fn or_fatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}
