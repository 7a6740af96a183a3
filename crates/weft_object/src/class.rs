//! Static per-family metadata: attribute keys, legal-attribute masks and the
//! [`ClassDescriptor`] that ties them to a family's kind enumeration.

use crate::error::ObjectError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distinguishes node families inside a persisted image and in barrier records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ObjectTag {
    /// Elaborated-design netlist nodes.
    ENode,
    /// Property specification nodes.
    Psl,
    /// Foreign HDL syntax tree nodes, referenced but never stored here.
    Tree,
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectTag::ENode => "e-node",
            ObjectTag::Psl => "psl",
            ObjectTag::Tree => "tree",
        })
    }
}

/// Symbolic name of one attribute slot.
///
/// The same key can mean different things in different families (`IVal` is a
/// width in the netlist); which keys a node has is decided by its kind's
/// [`AttrMask`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum AttrKey {
    /// Primary identifier.
    Ident,
    /// Secondary identifier (instance name).
    Ident2,
    /// Hierarchical path.
    Path,
    /// Identifier list of dependencies.
    Deps,
    /// Child scopes.
    Scopes,
    /// Signals.
    Signals,
    /// Processes.
    Procs,
    /// Nexus list.
    Nexus,
    /// Driving sources.
    Sources,
    /// Parent node.
    Parent,
    /// Integer value, usually a width.
    IVal,
    /// Position index.
    Pos,
    /// Byte size.
    Size,
    /// Flag bits.
    Flags,
    /// Name of the generated code unit.
    Vcode,
    /// Type handle.
    Type,
    /// Single child value.
    Value,
    /// Reference into a foreign family.
    Foreign,
    /// Classification tag.
    Class,
    /// Numeric subkind.
    Subkind,
    /// Ordered operand list.
    Params,
}

impl AttrKey {
    /// Every key in declaration order. Masks iterate in this order.
    pub const ALL: [AttrKey; 21] = [
        AttrKey::Ident,
        AttrKey::Ident2,
        AttrKey::Path,
        AttrKey::Deps,
        AttrKey::Scopes,
        AttrKey::Signals,
        AttrKey::Procs,
        AttrKey::Nexus,
        AttrKey::Sources,
        AttrKey::Parent,
        AttrKey::IVal,
        AttrKey::Pos,
        AttrKey::Size,
        AttrKey::Flags,
        AttrKey::Vcode,
        AttrKey::Type,
        AttrKey::Value,
        AttrKey::Foreign,
        AttrKey::Class,
        AttrKey::Subkind,
        AttrKey::Params,
    ];

    /// The key's single bit within an [`AttrMask`].
    pub const fn bit(self) -> u64 {
        1u64 << (self as u8)
    }

    /// Diagnostic name, e.g. `I_IDENT`.
    pub fn name(self) -> &'static str {
        match self {
            AttrKey::Ident => "I_IDENT",
            AttrKey::Ident2 => "I_IDENT2",
            AttrKey::Path => "I_PATH",
            AttrKey::Deps => "I_DEPS",
            AttrKey::Scopes => "I_SCOPES",
            AttrKey::Signals => "I_SIGNALS",
            AttrKey::Procs => "I_PROCS",
            AttrKey::Nexus => "I_NEXUS",
            AttrKey::Sources => "I_SOURCES",
            AttrKey::Parent => "I_PARENT",
            AttrKey::IVal => "I_IVAL",
            AttrKey::Pos => "I_POS",
            AttrKey::Size => "I_SIZE",
            AttrKey::Flags => "I_FLAGS",
            AttrKey::Vcode => "I_VCODE",
            AttrKey::Type => "I_TYPE",
            AttrKey::Value => "I_VALUE",
            AttrKey::Foreign => "I_FOREIGN",
            AttrKey::Class => "I_CLASS",
            AttrKey::Subkind => "I_SUBKIND",
            AttrKey::Params => "I_PARAMS",
        }
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of attribute keys legal for one kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttrMask(u64);

impl AttrMask {
    /// The mask with no keys.
    pub const EMPTY: AttrMask = AttrMask(0);

    /// Builds a mask from a list of keys. Usable in `static` tables.
    pub const fn of(keys: &[AttrKey]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < keys.len() {
            bits |= keys[i].bit();
            i += 1;
        }
        AttrMask(bits)
    }

    /// Returns `true` if `key` is in the mask.
    pub const fn contains(self, key: AttrKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Keys shared by both masks.
    pub const fn intersect(self, other: AttrMask) -> AttrMask {
        AttrMask(self.0 & other.0)
    }

    /// Number of keys in the mask.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the mask has no keys.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the keys in [`AttrKey::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = AttrKey> {
        AttrKey::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for AttrMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(AttrKey::name)).finish()
    }
}

/// Immutable description of one node family.
///
/// Kinds are addressed by their `u16` index into `kind_names`/`has_map`.
#[derive(Debug)]
pub struct ClassDescriptor {
    /// Family name used in diagnostics.
    pub name: &'static str,
    /// Tag written into images of this family.
    pub tag: ObjectTag,
    /// Display name of each kind.
    pub kind_names: &'static [&'static str],
    /// Legal attributes of each kind.
    pub has_map: &'static [AttrMask],
    /// `(from, to)` kind pairs a node may move between after creation.
    pub change_allowed: &'static [(u16, u16)],
    /// Kinds that seed collector reachability.
    pub gc_roots: &'static [u16],
}

impl ClassDescriptor {
    /// Number of kinds in the family.
    pub fn last_kind(&self) -> usize {
        self.kind_names.len()
    }

    /// Display name of `kind`.
    pub fn kind_name(&self, kind: u16) -> &'static str {
        self.kind_names.get(kind as usize).copied().unwrap_or("<bad kind>")
    }

    /// Reverse of [`kind_name`](Self::kind_name).
    pub fn kind_from_name(&self, name: &str) -> Option<u16> {
        self.kind_names
            .iter()
            .position(|n| *n == name)
            .map(|i| i as u16)
    }

    /// Legal-attribute mask of `kind`; empty for out-of-range kinds.
    pub fn mask(&self, kind: u16) -> AttrMask {
        self.has_map
            .get(kind as usize)
            .copied()
            .unwrap_or(AttrMask::EMPTY)
    }

    /// Returns `true` if nodes of `kind` carry `key`.
    pub fn has(&self, kind: u16, key: AttrKey) -> bool {
        self.mask(kind).contains(key)
    }

    /// Fails with [`ObjectError::IllegalAttr`] unless `kind` carries `key`.
    pub fn check(&self, kind: u16, key: AttrKey) -> Result<(), ObjectError> {
        if self.has(kind, key) {
            Ok(())
        } else {
            Err(ObjectError::IllegalAttr {
                class: self.name,
                kind: self.kind_name(kind),
                key,
            })
        }
    }

    /// Returns `true` if a node may change from `from` to `to`.
    pub fn change_allowed(&self, from: u16, to: u16) -> bool {
        self.change_allowed.contains(&(from, to))
    }

    /// Returns `true` if `kind` seeds collector reachability.
    pub fn is_root(&self, kind: u16) -> bool {
        self.gc_roots.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static HAS_MAP: [AttrMask; 2] = [
        AttrMask::of(&[AttrKey::Ident, AttrKey::Scopes]),
        AttrMask::of(&[AttrKey::IVal]),
    ];

    static CLASS: ClassDescriptor = ClassDescriptor {
        name: "test",
        tag: ObjectTag::ENode,
        kind_names: &["T_ROOT", "T_LEAF"],
        has_map: &HAS_MAP,
        change_allowed: &[(1, 0)],
        gc_roots: &[0],
    };

    #[test]
    fn mask_membership() {
        let m = AttrMask::of(&[AttrKey::Ident, AttrKey::Pos]);
        assert!(m.contains(AttrKey::Ident));
        assert!(m.contains(AttrKey::Pos));
        assert!(!m.contains(AttrKey::Ident2));
        assert_eq!(m.len(), 2);
        assert!(AttrMask::EMPTY.is_empty());
    }

    #[test]
    fn mask_iterates_in_key_order() {
        let m = AttrMask::of(&[AttrKey::Params, AttrKey::Ident, AttrKey::Size]);
        let keys: Vec<_> = m.iter().collect();
        assert_eq!(keys, vec![AttrKey::Ident, AttrKey::Size, AttrKey::Params]);
    }

    #[test]
    fn all_keys_have_distinct_bits() {
        let all = AttrMask::of(&AttrKey::ALL);
        assert_eq!(all.len(), AttrKey::ALL.len());
    }

    #[test]
    fn kind_names_roundtrip() {
        assert_eq!(CLASS.kind_name(1), "T_LEAF");
        assert_eq!(CLASS.kind_from_name("T_LEAF"), Some(1));
        assert_eq!(CLASS.kind_from_name("T_NONE"), None);
        assert_eq!(CLASS.last_kind(), 2);
    }

    #[test]
    fn check_reports_kind_and_key() {
        assert!(CLASS.check(0, AttrKey::Scopes).is_ok());
        let err = CLASS.check(1, AttrKey::Scopes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test kind T_LEAF does not have attribute I_SCOPES"
        );
    }

    #[test]
    fn object_tag_serde_and_display() {
        for tag in [ObjectTag::ENode, ObjectTag::Psl, ObjectTag::Tree] {
            let json = serde_json::to_string(&tag).unwrap();
            let back: ObjectTag = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tag);
        }
        assert_eq!(serde_json::to_string(&ObjectTag::Psl).unwrap(), "\"Psl\"");
        assert_eq!(ObjectTag::ENode.to_string(), "e-node");
    }

    #[test]
    fn change_and_roots() {
        assert!(CLASS.change_allowed(1, 0));
        assert!(!CLASS.change_allowed(0, 1));
        assert!(CLASS.is_root(0));
        assert!(!CLASS.is_root(1));
    }
}
