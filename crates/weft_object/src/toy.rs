//! Minimal three-kind family exercising every slot shape in engine tests.

use crate::class::{AttrKey, AttrMask, ClassDescriptor, ObjectTag};
use crate::family::{Family, Kind};
use crate::value::{ForeignRef, SlotMut, TypeRef, Value};
use weft_common::Ident;

crate::define_id!(
    /// Handle of a toy node.
    ToyId
);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToyKind {
    Root,
    Leaf,
    Bud,
}

impl Kind for ToyKind {
    fn index(self) -> u16 {
        self as u16
    }

    fn from_index(index: u16) -> Option<Self> {
        [ToyKind::Root, ToyKind::Leaf, ToyKind::Bud]
            .get(index as usize)
            .copied()
    }
}

const HAS_MAP: [AttrMask; 3] = [
    AttrMask::of(&[AttrKey::Ident, AttrKey::Deps, AttrKey::Params]),
    AttrMask::of(&[
        AttrKey::Ident,
        AttrKey::Parent,
        AttrKey::Pos,
        AttrKey::Type,
        AttrKey::Foreign,
    ]),
    AttrMask::of(&[AttrKey::Ident, AttrKey::Size]),
];

const TOY_CLASS: ClassDescriptor = ClassDescriptor {
    name: "toy",
    tag: ObjectTag::ENode,
    kind_names: &["T_ROOT", "T_LEAF", "T_BUD"],
    has_map: &HAS_MAP,
    change_allowed: &[(2, 1)],
    gc_roots: &[0],
};

#[derive(Debug, Clone, PartialEq)]
pub enum Toy {
    Root {
        ident: Option<Ident>,
        deps: Vec<Ident>,
        params: Vec<ToyId>,
    },
    Leaf {
        ident: Option<Ident>,
        parent: Option<ToyId>,
        pos: u32,
        ty: Option<TypeRef>,
        foreign: Option<ForeignRef>,
    },
    Bud {
        ident: Option<Ident>,
        size: u32,
    },
}

impl Family for Toy {
    type Id = ToyId;
    type Kind = ToyKind;

    const CLASS: &'static ClassDescriptor = &TOY_CLASS;

    fn new(kind: ToyKind) -> Self {
        match kind {
            ToyKind::Root => Toy::Root {
                ident: None,
                deps: Vec::new(),
                params: Vec::new(),
            },
            ToyKind::Leaf => Toy::Leaf {
                ident: None,
                parent: None,
                pos: u32::MAX,
                ty: None,
                foreign: None,
            },
            ToyKind::Bud => Toy::Bud {
                ident: None,
                size: 0,
            },
        }
    }

    fn kind(&self) -> ToyKind {
        match self {
            Toy::Root { .. } => ToyKind::Root,
            Toy::Leaf { .. } => ToyKind::Leaf,
            Toy::Bud { .. } => ToyKind::Bud,
        }
    }

    fn slot(&self, key: AttrKey) -> Option<Value<'_, ToyId>> {
        use AttrKey as K;
        Some(match (self, key) {
            (Toy::Root { ident, .. }, K::Ident)
            | (Toy::Leaf { ident, .. }, K::Ident)
            | (Toy::Bud { ident, .. }, K::Ident) => Value::Ident(*ident),
            (Toy::Root { deps, .. }, K::Deps) => Value::Idents(deps),
            (Toy::Root { params, .. }, K::Params) => Value::Refs(params),
            (Toy::Leaf { parent, .. }, K::Parent) => Value::Ref(*parent),
            (Toy::Leaf { pos, .. }, K::Pos) => Value::Int(*pos),
            (Toy::Leaf { ty, .. }, K::Type) => Value::Type(*ty),
            (Toy::Leaf { foreign, .. }, K::Foreign) => Value::Foreign(*foreign),
            (Toy::Bud { size, .. }, K::Size) => Value::Int(*size),
            _ => return None,
        })
    }

    fn slot_mut(&mut self, key: AttrKey) -> Option<SlotMut<'_, ToyId>> {
        use AttrKey as K;
        Some(match (self, key) {
            (Toy::Root { ident, .. }, K::Ident)
            | (Toy::Leaf { ident, .. }, K::Ident)
            | (Toy::Bud { ident, .. }, K::Ident) => SlotMut::Ident(ident),
            (Toy::Root { deps, .. }, K::Deps) => SlotMut::Idents(deps),
            (Toy::Root { params, .. }, K::Params) => SlotMut::Refs(params),
            (Toy::Leaf { parent, .. }, K::Parent) => SlotMut::Ref(parent),
            (Toy::Leaf { pos, .. }, K::Pos) => SlotMut::Int(pos),
            (Toy::Leaf { ty, .. }, K::Type) => SlotMut::Type(ty),
            (Toy::Leaf { foreign, .. }, K::Foreign) => SlotMut::Foreign(foreign),
            (Toy::Bud { size, .. }, K::Size) => SlotMut::Int(size),
            _ => return None,
        })
    }
}
