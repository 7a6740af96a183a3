//! The attribute-addressable interface every node family implements.
//!
//! A family's node type is a Rust enum whose variants hold exactly the
//! attributes legal for that kind. [`Family::slot`] and [`Family::slot_mut`]
//! expose those fields by [`AttrKey`] so the store, the collector and the image
//! codec can treat every family alike. Their answers must match the family's
//! [`ClassDescriptor::has_map`] exactly.

use crate::arena::ArenaId;
use crate::class::{AttrKey, ClassDescriptor};
use crate::value::{SlotMut, Value};
use std::fmt;
use std::hash::Hash;

/// A family's kind enumeration.
pub trait Kind: Copy + Eq + fmt::Debug + 'static {
    /// Index into the family's descriptor tables.
    fn index(self) -> u16;

    /// Inverse of [`index`](Self::index).
    fn from_index(index: u16) -> Option<Self>;
}

/// A node family: one sum type plus its static descriptor.
pub trait Family: Sized {
    /// Handle type for nodes of this family.
    type Id: ArenaId + Eq + Hash + fmt::Debug;
    /// Kind enumeration.
    type Kind: Kind;

    /// Static metadata for the family.
    const CLASS: &'static ClassDescriptor;

    /// Creates an empty node of `kind`: identifiers and references unset,
    /// collections empty, integers at their sentinel.
    fn new(kind: Self::Kind) -> Self;

    /// The node's kind.
    fn kind(&self) -> Self::Kind;

    /// Reads the slot for `key`, or `None` if the kind has no such attribute.
    fn slot(&self, key: AttrKey) -> Option<Value<'_, Self::Id>>;

    /// Mutable access to the slot for `key`, or `None` if the kind has no such
    /// attribute.
    fn slot_mut(&mut self, key: AttrKey) -> Option<SlotMut<'_, Self::Id>>;
}

/// Copies the value of one slot into another of the same shape.
///
/// Returns `false` if the shapes differ.
pub(crate) fn assign<R: Copy>(dst: SlotMut<'_, R>, src: Value<'_, R>) -> bool {
    match (dst, src) {
        (SlotMut::Ident(d), Value::Ident(s)) => *d = s,
        (SlotMut::Int(d), Value::Int(s)) => *d = s,
        (SlotMut::Ref(d), Value::Ref(s)) => *d = s,
        (SlotMut::Refs(d), Value::Refs(s)) => *d = s.to_vec(),
        (SlotMut::Idents(d), Value::Idents(s)) => *d = s.to_vec(),
        (SlotMut::Type(d), Value::Type(s)) => *d = s,
        (SlotMut::Foreign(d), Value::Foreign(s)) => *d = s,
        _ => return false,
    }
    true
}
