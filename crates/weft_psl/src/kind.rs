//! PSL node kinds and HDL expression classes.

use std::fmt;

use weft_object::{AttrKey, AttrMask, ClassDescriptor, Kind, ObjectTag};

/// The kind of a PSL node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PslKind {
    /// `assert` directive.
    Assert,
    /// `always` operator.
    Always,
    /// An expression in the host HDL.
    HdlExpr,
    /// Default clock declaration.
    ClockDecl,
    /// `next` family operator with a delay.
    Next,
    /// `never` operator.
    Never,
    /// `eventually!` operator.
    Eventually,
    /// `next_a` operator.
    NextA,
    /// `next_e` operator.
    NextE,
    /// `next_event` operator.
    NextEvent,
    /// Sequential extended regular expression.
    Sere,
    /// Suffix or logical implication.
    Implication,
}

impl PslKind {
    /// Every kind in declaration order.
    pub const ALL: [PslKind; 12] = [
        PslKind::Assert,
        PslKind::Always,
        PslKind::HdlExpr,
        PslKind::ClockDecl,
        PslKind::Next,
        PslKind::Never,
        PslKind::Eventually,
        PslKind::NextA,
        PslKind::NextE,
        PslKind::NextEvent,
        PslKind::Sere,
        PslKind::Implication,
    ];

    /// Display name, e.g. `P_NEXT_EVENT`.
    pub fn as_str(self) -> &'static str {
        PSL_CLASS.kind_name(self.index())
    }

    /// Parses a display name back into a kind.
    pub fn from_name(name: &str) -> Option<PslKind> {
        PSL_CLASS.kind_from_name(name).and_then(PslKind::from_index)
    }
}

impl Kind for PslKind {
    fn index(self) -> u16 {
        self as u16
    }

    fn from_index(index: u16) -> Option<Self> {
        PslKind::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for PslKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const UNARY: AttrMask = AttrMask::of(&[AttrKey::Value]);
const DELAYED: AttrMask = AttrMask::of(&[AttrKey::Subkind, AttrKey::Value]);

const HAS_MAP: [AttrMask; 12] = [
    // P_ASSERT
    UNARY,
    // P_ALWAYS
    UNARY,
    // P_HDL_EXPR
    AttrMask::of(&[AttrKey::Foreign, AttrKey::Class]),
    // P_CLOCK_DECL
    AttrMask::of(&[AttrKey::Foreign]),
    // P_NEXT
    DELAYED,
    // P_NEVER
    UNARY,
    // P_EVENTUALLY
    UNARY,
    // P_NEXT_A
    DELAYED,
    // P_NEXT_E
    DELAYED,
    // P_NEXT_EVENT
    DELAYED,
    // P_SERE
    AttrMask::of(&[AttrKey::Params]),
    // P_IMPLICATION
    AttrMask::of(&[AttrKey::Subkind, AttrKey::Params]),
];

/// Class descriptor of the PSL family. It declares no root kinds; callers
/// collect with the property roots they hold.
pub const PSL_CLASS: ClassDescriptor = ClassDescriptor {
    name: "psl",
    tag: ObjectTag::Psl,
    kind_names: &[
        "P_ASSERT",
        "P_ALWAYS",
        "P_HDL_EXPR",
        "P_CLOCK_DECL",
        "P_NEXT",
        "P_NEVER",
        "P_EVENTUALLY",
        "P_NEXT_A",
        "P_NEXT_E",
        "P_NEXT_EVENT",
        "P_SERE",
        "P_IMPLICATION",
    ],
    has_map: &HAS_MAP,
    change_allowed: &[],
    gc_roots: &[],
};

/// Type class of an HDL expression embedded in a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum PslClass {
    /// A boolean condition.
    #[default]
    Boolean,
    /// A single bit.
    Bit,
    /// A bit vector.
    BitVector,
    /// An integer.
    Numeric,
    /// A string.
    String,
}

impl PslClass {
    /// Decodes the stored representation.
    pub fn from_raw(raw: u32) -> Option<PslClass> {
        [
            PslClass::Boolean,
            PslClass::Bit,
            PslClass::BitVector,
            PslClass::Numeric,
            PslClass::String,
        ]
        .get(raw as usize)
        .copied()
    }

    /// The stored representation.
    pub fn as_raw(self) -> u32 {
        self as u32
    }
}
