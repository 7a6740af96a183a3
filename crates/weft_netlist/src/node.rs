//! The e-node sum type and its attribute-addressable view.

use weft_common::Ident;
use weft_object::{AttrKey, ClassDescriptor, Family, SlotMut, TypeRef, Value};

use crate::kind::{EKind, E_NODE_CLASS, NEXUS_POS_INVALID};

weft_object::define_id!(
    /// Handle of an e-node within a [`Netlist`](crate::Netlist).
    ENodeId
);

/// One elaborated-design node. Each variant holds exactly the attributes
/// legal for its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ENode {
    /// Design unit root.
    Root {
        /// Design unit name.
        ident: Option<Ident>,
        /// Top-level scopes.
        scopes: Vec<ENodeId>,
        /// Every nexus of the design, ordered by bit adjacency.
        nexus: Vec<ENodeId>,
        /// Library units this design depends on.
        deps: Vec<Ident>,
    },
    /// Instantiation boundary.
    Scope {
        /// Enclosing scope.
        parent: Option<ENodeId>,
        /// Signals declared here.
        signals: Vec<ENodeId>,
        /// Nested scopes.
        scopes: Vec<ENodeId>,
        /// Processes declared here.
        procs: Vec<ENodeId>,
        /// Instance name.
        instance: Option<Ident>,
        /// Hierarchical path.
        path: Option<Ident>,
        /// Generated code unit.
        vcode: Option<Ident>,
    },
    /// A signal.
    Signal {
        /// Signal name.
        ident: Option<Ident>,
        /// Nexuses and paddings covering the signal, in bit order.
        nexus: Vec<ENodeId>,
        /// Width in scalar elements.
        width: u32,
        /// Instance name.
        instance: Option<Ident>,
        /// Hierarchical path.
        path: Option<Ident>,
        /// [`EFlags`](crate::EFlags) bits.
        flags: u32,
        /// Declared type.
        ty: Option<TypeRef>,
    },
    /// A process.
    Process {
        /// Process label.
        ident: Option<Ident>,
        /// Instance name.
        instance: Option<Ident>,
        /// Hierarchical path.
        path: Option<Ident>,
        /// Nexuses driven by this process.
        nexus: Vec<ENodeId>,
        /// Generated code unit.
        vcode: Option<Ident>,
        /// Enclosing scope.
        parent: Option<ENodeId>,
        /// [`EFlags`](crate::EFlags) bits.
        flags: u32,
    },
    /// A connectivity nexus.
    Nexus {
        /// Name, shared by every piece split from one nexus.
        ident: Option<Ident>,
        /// Width in scalar elements.
        width: u32,
        /// Signals overlapping this nexus.
        signals: Vec<ENodeId>,
        /// Assigned position, or [`NEXUS_POS_INVALID`].
        pos: u32,
        /// Size in bytes of one element.
        size: u32,
        /// Driving processes and input ports.
        sources: Vec<ENodeId>,
    },
    /// Unconnected bits.
    Padding {
        /// Width in scalar elements.
        width: u32,
        /// Size in bytes of one element.
        size: u32,
    },
}

impl Family for ENode {
    type Id = ENodeId;
    type Kind = EKind;

    const CLASS: &'static ClassDescriptor = &E_NODE_CLASS;

    fn new(kind: EKind) -> Self {
        match kind {
            EKind::Root => ENode::Root {
                ident: None,
                scopes: Vec::new(),
                nexus: Vec::new(),
                deps: Vec::new(),
            },
            EKind::Scope => ENode::Scope {
                parent: None,
                signals: Vec::new(),
                scopes: Vec::new(),
                procs: Vec::new(),
                instance: None,
                path: None,
                vcode: None,
            },
            EKind::Signal => ENode::Signal {
                ident: None,
                nexus: Vec::new(),
                width: 0,
                instance: None,
                path: None,
                flags: 0,
                ty: None,
            },
            EKind::Process => ENode::Process {
                ident: None,
                instance: None,
                path: None,
                nexus: Vec::new(),
                vcode: None,
                parent: None,
                flags: 0,
            },
            EKind::Nexus => ENode::Nexus {
                ident: None,
                width: 0,
                signals: Vec::new(),
                pos: NEXUS_POS_INVALID,
                size: 0,
                sources: Vec::new(),
            },
            EKind::Padding => ENode::Padding { width: 0, size: 0 },
        }
    }

    fn kind(&self) -> EKind {
        match self {
            ENode::Root { .. } => EKind::Root,
            ENode::Scope { .. } => EKind::Scope,
            ENode::Signal { .. } => EKind::Signal,
            ENode::Process { .. } => EKind::Process,
            ENode::Nexus { .. } => EKind::Nexus,
            ENode::Padding { .. } => EKind::Padding,
        }
    }

    fn slot(&self, key: AttrKey) -> Option<Value<'_, ENodeId>> {
        use AttrKey as K;
        use ENode as E;
        Some(match (self, key) {
            (E::Root { ident, .. }, K::Ident)
            | (E::Signal { ident, .. }, K::Ident)
            | (E::Process { ident, .. }, K::Ident)
            | (E::Nexus { ident, .. }, K::Ident) => Value::Ident(*ident),
            (E::Scope { instance, .. }, K::Ident2)
            | (E::Signal { instance, .. }, K::Ident2)
            | (E::Process { instance, .. }, K::Ident2) => Value::Ident(*instance),
            (E::Scope { path, .. }, K::Path)
            | (E::Signal { path, .. }, K::Path)
            | (E::Process { path, .. }, K::Path) => Value::Ident(*path),
            (E::Scope { vcode, .. }, K::Vcode) | (E::Process { vcode, .. }, K::Vcode) => {
                Value::Ident(*vcode)
            }
            (E::Root { deps, .. }, K::Deps) => Value::Idents(deps),
            (E::Root { scopes, .. }, K::Scopes) | (E::Scope { scopes, .. }, K::Scopes) => {
                Value::Refs(scopes)
            }
            (E::Root { nexus, .. }, K::Nexus)
            | (E::Signal { nexus, .. }, K::Nexus)
            | (E::Process { nexus, .. }, K::Nexus) => Value::Refs(nexus),
            (E::Scope { signals, .. }, K::Signals) | (E::Nexus { signals, .. }, K::Signals) => {
                Value::Refs(signals)
            }
            (E::Scope { procs, .. }, K::Procs) => Value::Refs(procs),
            (E::Nexus { sources, .. }, K::Sources) => Value::Refs(sources),
            (E::Scope { parent, .. }, K::Parent) | (E::Process { parent, .. }, K::Parent) => {
                Value::Ref(*parent)
            }
            (E::Signal { width, .. }, K::IVal)
            | (E::Nexus { width, .. }, K::IVal)
            | (E::Padding { width, .. }, K::IVal) => Value::Int(*width),
            (E::Signal { flags, .. }, K::Flags) | (E::Process { flags, .. }, K::Flags) => {
                Value::Int(*flags)
            }
            (E::Nexus { pos, .. }, K::Pos) => Value::Int(*pos),
            (E::Nexus { size, .. }, K::Size) | (E::Padding { size, .. }, K::Size) => {
                Value::Int(*size)
            }
            (E::Signal { ty, .. }, K::Type) => Value::Type(*ty),
            _ => return None,
        })
    }

    fn slot_mut(&mut self, key: AttrKey) -> Option<SlotMut<'_, ENodeId>> {
        use AttrKey as K;
        use ENode as E;
        Some(match (self, key) {
            (E::Root { ident, .. }, K::Ident)
            | (E::Signal { ident, .. }, K::Ident)
            | (E::Process { ident, .. }, K::Ident)
            | (E::Nexus { ident, .. }, K::Ident) => SlotMut::Ident(ident),
            (E::Scope { instance, .. }, K::Ident2)
            | (E::Signal { instance, .. }, K::Ident2)
            | (E::Process { instance, .. }, K::Ident2) => SlotMut::Ident(instance),
            (E::Scope { path, .. }, K::Path)
            | (E::Signal { path, .. }, K::Path)
            | (E::Process { path, .. }, K::Path) => SlotMut::Ident(path),
            (E::Scope { vcode, .. }, K::Vcode) | (E::Process { vcode, .. }, K::Vcode) => {
                SlotMut::Ident(vcode)
            }
            (E::Root { deps, .. }, K::Deps) => SlotMut::Idents(deps),
            (E::Root { scopes, .. }, K::Scopes) | (E::Scope { scopes, .. }, K::Scopes) => {
                SlotMut::Refs(scopes)
            }
            (E::Root { nexus, .. }, K::Nexus)
            | (E::Signal { nexus, .. }, K::Nexus)
            | (E::Process { nexus, .. }, K::Nexus) => SlotMut::Refs(nexus),
            (E::Scope { signals, .. }, K::Signals) | (E::Nexus { signals, .. }, K::Signals) => {
                SlotMut::Refs(signals)
            }
            (E::Scope { procs, .. }, K::Procs) => SlotMut::Refs(procs),
            (E::Nexus { sources, .. }, K::Sources) => SlotMut::Refs(sources),
            (E::Scope { parent, .. }, K::Parent) | (E::Process { parent, .. }, K::Parent) => {
                SlotMut::Ref(parent)
            }
            (E::Signal { width, .. }, K::IVal)
            | (E::Nexus { width, .. }, K::IVal)
            | (E::Padding { width, .. }, K::IVal) => SlotMut::Int(width),
            (E::Signal { flags, .. }, K::Flags) | (E::Process { flags, .. }, K::Flags) => {
                SlotMut::Int(flags)
            }
            (E::Nexus { pos, .. }, K::Pos) => SlotMut::Int(pos),
            (E::Nexus { size, .. }, K::Size) | (E::Padding { size, .. }, K::Size) => {
                SlotMut::Int(size)
            }
            (E::Signal { ty, .. }, K::Type) => SlotMut::Type(ty),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_object::Kind;

    #[test]
    fn slots_agree_with_descriptor() {
        for kind in EKind::ALL {
            let mut node = ENode::new(kind);
            assert_eq!(node.kind(), kind);
            for key in AttrKey::ALL {
                let legal = E_NODE_CLASS.has(kind.index(), key);
                assert_eq!(node.slot(key).is_some(), legal, "{kind} {key}");
                assert_eq!(node.slot_mut(key).is_some(), legal, "{kind} {key} (mut)");
            }
        }
    }

    #[test]
    fn fresh_nexus_has_invalid_position() {
        let node = ENode::new(EKind::Nexus);
        assert_eq!(node.slot(AttrKey::Pos), Some(Value::Int(NEXUS_POS_INVALID)));
        assert_eq!(node.slot(AttrKey::IVal), Some(Value::Int(0)));
    }
}
