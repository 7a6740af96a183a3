//! Attribute values as seen through the generic [`Family`](crate::Family) interface.

use crate::class::ObjectTag;
use serde::{Deserialize, Serialize};
use weft_common::Ident;

/// Opaque handle into the external type system.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TypeRef(u32);

impl TypeRef {
    /// Creates a handle from a raw value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Opaque reference to a node of a foreign family (the HDL syntax tree).
///
/// Stored and returned verbatim; this crate never looks inside.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ForeignRef(u32);

impl ForeignRef {
    /// Creates a reference from a raw value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Family-tagged untyped reference, used in write-barrier records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjectRef {
    /// Family of the referenced node.
    pub tag: ObjectTag,
    /// Raw handle within that family.
    pub index: u32,
}

impl ObjectRef {
    /// Creates a reference.
    pub fn new(tag: ObjectTag, index: u32) -> Self {
        Self { tag, index }
    }
}

/// Read view of one attribute slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Value<'a, R> {
    /// An identifier, `None` until assigned.
    Ident(Option<Ident>),
    /// An integer; unset positions use a family sentinel.
    Int(u32),
    /// A single node reference.
    Ref(Option<R>),
    /// An ordered node collection.
    Refs(&'a [R]),
    /// An ordered identifier collection.
    Idents(&'a [Ident]),
    /// A type handle.
    Type(Option<TypeRef>),
    /// A cross-family reference.
    Foreign(Option<ForeignRef>),
}

impl<R> Value<'_, R> {
    /// Short name of the representation for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Ident(_) => "an identifier",
            Value::Int(_) => "an integer",
            Value::Ref(_) => "a node reference",
            Value::Refs(_) => "a node collection",
            Value::Idents(_) => "an identifier collection",
            Value::Type(_) => "a type",
            Value::Foreign(_) => "a foreign reference",
        }
    }
}

/// Mutable view of one attribute slot.
#[derive(Debug)]
pub enum SlotMut<'a, R> {
    /// An identifier.
    Ident(&'a mut Option<Ident>),
    /// An integer.
    Int(&'a mut u32),
    /// A single node reference.
    Ref(&'a mut Option<R>),
    /// An ordered node collection.
    Refs(&'a mut Vec<R>),
    /// An ordered identifier collection.
    Idents(&'a mut Vec<Ident>),
    /// A type handle.
    Type(&'a mut Option<TypeRef>),
    /// A cross-family reference.
    Foreign(&'a mut Option<ForeignRef>),
}

impl<R> SlotMut<'_, R> {
    /// Short name of the representation for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            SlotMut::Ident(_) => "an identifier",
            SlotMut::Int(_) => "an integer",
            SlotMut::Ref(_) => "a node reference",
            SlotMut::Refs(_) => "a node collection",
            SlotMut::Idents(_) => "an identifier collection",
            SlotMut::Type(_) => "a type",
            SlotMut::Foreign(_) => "a foreign reference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&TypeRef::from_raw(42)).unwrap(), "42");
        let back: ForeignRef = serde_json::from_str("7").unwrap();
        assert_eq!(back, ForeignRef::from_raw(7));
    }

    #[test]
    fn optional_handles_roundtrip_through_json() {
        let refs = vec![Some(TypeRef::from_raw(3)), None];
        let json = serde_json::to_string(&refs).unwrap();
        assert_eq!(json, "[3,null]");
        let back: Vec<Option<TypeRef>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, refs);
    }

    #[test]
    fn read_and_write_views_agree_on_shape() {
        let mut list: Vec<u32> = vec![1];
        let shape = Value::Refs(&list[..]).shape();
        assert_eq!(SlotMut::Refs(&mut list).shape(), shape);
        let mut ty = None;
        assert_eq!(SlotMut::<u32>::Type(&mut ty).shape(), "a type");
    }
}
