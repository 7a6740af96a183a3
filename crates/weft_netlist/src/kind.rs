//! E-node kinds, their legal attributes and the signal/process flag set.

use std::fmt;
use std::ops::BitOr;

use weft_object::{AttrKey, AttrMask, ClassDescriptor, Kind, ObjectTag};

/// Sentinel stored in a nexus position that has not been assigned yet.
pub const NEXUS_POS_INVALID: u32 = u32::MAX;

/// The kind of an e-node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EKind {
    /// Top-level container of one elaborated design unit.
    Root,
    /// Hierarchical instantiation boundary.
    Scope,
    /// A signal split across one or more nexuses.
    Signal,
    /// A process driving nexuses.
    Process,
    /// A contiguous bit range with a uniform driver set.
    Nexus,
    /// Unconnected bits inside a signal's nexus list.
    Padding,
}

impl EKind {
    /// Every kind in declaration order.
    pub const ALL: [EKind; 6] = [
        EKind::Root,
        EKind::Scope,
        EKind::Signal,
        EKind::Process,
        EKind::Nexus,
        EKind::Padding,
    ];

    /// Display name, e.g. `E_NEXUS`.
    pub fn as_str(self) -> &'static str {
        E_NODE_CLASS.kind_name(self.index())
    }

    /// Parses a display name back into a kind.
    pub fn from_name(name: &str) -> Option<EKind> {
        E_NODE_CLASS
            .kind_from_name(name)
            .and_then(EKind::from_index)
    }
}

impl Kind for EKind {
    fn index(self) -> u16 {
        self as u16
    }

    fn from_index(index: u16) -> Option<Self> {
        EKind::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for EKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const HAS_MAP: [AttrMask; 6] = [
    // E_ROOT
    AttrMask::of(&[AttrKey::Ident, AttrKey::Scopes, AttrKey::Nexus, AttrKey::Deps]),
    // E_SCOPE
    AttrMask::of(&[
        AttrKey::Parent,
        AttrKey::Signals,
        AttrKey::Scopes,
        AttrKey::Procs,
        AttrKey::Ident2,
        AttrKey::Path,
        AttrKey::Vcode,
    ]),
    // E_SIGNAL
    AttrMask::of(&[
        AttrKey::Ident,
        AttrKey::Nexus,
        AttrKey::IVal,
        AttrKey::Ident2,
        AttrKey::Path,
        AttrKey::Flags,
        AttrKey::Type,
    ]),
    // E_PROCESS
    AttrMask::of(&[
        AttrKey::Ident,
        AttrKey::Ident2,
        AttrKey::Path,
        AttrKey::Nexus,
        AttrKey::Vcode,
        AttrKey::Parent,
        AttrKey::Flags,
    ]),
    // E_NEXUS
    AttrMask::of(&[
        AttrKey::Ident,
        AttrKey::IVal,
        AttrKey::Signals,
        AttrKey::Pos,
        AttrKey::Size,
        AttrKey::Sources,
    ]),
    // E_PADDING
    AttrMask::of(&[AttrKey::IVal, AttrKey::Size]),
];

/// Class descriptor of the e-node family.
pub const E_NODE_CLASS: ClassDescriptor = ClassDescriptor {
    name: "e-node",
    tag: ObjectTag::ENode,
    kind_names: &[
        "E_ROOT",
        "E_SCOPE",
        "E_SIGNAL",
        "E_PROCESS",
        "E_NEXUS",
        "E_PADDING",
    ],
    has_map: &HAS_MAP,
    change_allowed: &[],
    gc_roots: &[EKind::Root as u16],
};

/// Flag bits carried by signals and processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EFlags(u32);

impl EFlags {
    /// No flags set.
    pub const NONE: EFlags = EFlags(0);
    /// Process runs in the postponed phase.
    pub const POSTPONED: EFlags = EFlags(1 << 0);
    /// Signal needs its previous value tracked.
    pub const LAST_VALUE: EFlags = EFlags(1 << 1);
    /// Signal storage is one contiguous block.
    pub const CONTIGUOUS: EFlags = EFlags(1 << 2);

    /// Creates a flag set from raw bits.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    pub fn contains(self, other: EFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EFlags {
    type Output = EFlags;

    fn bitor(self, rhs: EFlags) -> EFlags {
        EFlags(self.0 | rhs.0)
    }
}
