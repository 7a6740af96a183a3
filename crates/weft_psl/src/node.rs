//! The PSL node sum type.

use weft_object::{AttrKey, ClassDescriptor, Family, ForeignRef, SlotMut, Value};

use crate::kind::{PslKind, PSL_CLASS};

weft_object::define_id!(
    /// Handle of a PSL node within a [`PslGraph`](crate::PslGraph).
    PslId
);

/// One property node. Each variant holds exactly the attributes legal for
/// its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PslNode {
    /// `assert` directive.
    Assert {
        /// Asserted property.
        value: Option<PslId>,
    },
    /// `always` operator.
    Always {
        /// Property that must hold at every cycle.
        value: Option<PslId>,
    },
    /// Expression in the host HDL.
    HdlExpr {
        /// The wrapped syntax-tree node.
        tree: Option<ForeignRef>,
        /// Raw [`PslClass`](crate::PslClass) of the expression.
        class: u32,
    },
    /// Default clock declaration.
    ClockDecl {
        /// Clock expression in the host HDL.
        tree: Option<ForeignRef>,
    },
    /// `next` with a cycle delay.
    Next {
        /// Delay in cycles.
        subkind: u32,
        /// Delayed operand.
        value: Option<PslId>,
    },
    /// `never` operator.
    Never {
        /// Property that must never hold.
        value: Option<PslId>,
    },
    /// `eventually!` operator.
    Eventually {
        /// Property that must hold at some later cycle.
        value: Option<PslId>,
    },
    /// `next_a` operator.
    NextA {
        /// Delay range selector.
        subkind: u32,
        /// Operand checked over the range.
        value: Option<PslId>,
    },
    /// `next_e` operator.
    NextE {
        /// Delay range selector.
        subkind: u32,
        /// Operand required somewhere in the range.
        value: Option<PslId>,
    },
    /// `next_event` operator.
    NextEvent {
        /// Occurrence count of the event.
        subkind: u32,
        /// Operand checked at that occurrence.
        value: Option<PslId>,
    },
    /// Sequential extended regular expression.
    Sere {
        /// Elements of the sequence, in order.
        operands: Vec<PslId>,
    },
    /// Suffix or logical implication.
    Implication {
        /// Operator variant.
        subkind: u32,
        /// Antecedent then consequent.
        operands: Vec<PslId>,
    },
}

impl Family for PslNode {
    type Id = PslId;
    type Kind = PslKind;

    const CLASS: &'static ClassDescriptor = &PSL_CLASS;

    fn new(kind: PslKind) -> Self {
        use PslNode as P;
        match kind {
            PslKind::Assert => P::Assert { value: None },
            PslKind::Always => P::Always { value: None },
            PslKind::HdlExpr => P::HdlExpr {
                tree: None,
                class: 0,
            },
            PslKind::ClockDecl => P::ClockDecl { tree: None },
            PslKind::Next => P::Next {
                subkind: 0,
                value: None,
            },
            PslKind::Never => P::Never { value: None },
            PslKind::Eventually => P::Eventually { value: None },
            PslKind::NextA => P::NextA {
                subkind: 0,
                value: None,
            },
            PslKind::NextE => P::NextE {
                subkind: 0,
                value: None,
            },
            PslKind::NextEvent => P::NextEvent {
                subkind: 0,
                value: None,
            },
            PslKind::Sere => P::Sere {
                operands: Vec::new(),
            },
            PslKind::Implication => P::Implication {
                subkind: 0,
                operands: Vec::new(),
            },
        }
    }

    fn kind(&self) -> PslKind {
        match self {
            PslNode::Assert { .. } => PslKind::Assert,
            PslNode::Always { .. } => PslKind::Always,
            PslNode::HdlExpr { .. } => PslKind::HdlExpr,
            PslNode::ClockDecl { .. } => PslKind::ClockDecl,
            PslNode::Next { .. } => PslKind::Next,
            PslNode::Never { .. } => PslKind::Never,
            PslNode::Eventually { .. } => PslKind::Eventually,
            PslNode::NextA { .. } => PslKind::NextA,
            PslNode::NextE { .. } => PslKind::NextE,
            PslNode::NextEvent { .. } => PslKind::NextEvent,
            PslNode::Sere { .. } => PslKind::Sere,
            PslNode::Implication { .. } => PslKind::Implication,
        }
    }

    fn slot(&self, key: AttrKey) -> Option<Value<'_, PslId>> {
        use AttrKey as K;
        use PslNode as P;
        Some(match (self, key) {
            (P::Assert { value }, K::Value)
            | (P::Always { value }, K::Value)
            | (P::Never { value }, K::Value)
            | (P::Eventually { value }, K::Value)
            | (P::Next { value, .. }, K::Value)
            | (P::NextA { value, .. }, K::Value)
            | (P::NextE { value, .. }, K::Value)
            | (P::NextEvent { value, .. }, K::Value) => Value::Ref(*value),
            (P::Next { subkind, .. }, K::Subkind)
            | (P::NextA { subkind, .. }, K::Subkind)
            | (P::NextE { subkind, .. }, K::Subkind)
            | (P::NextEvent { subkind, .. }, K::Subkind)
            | (P::Implication { subkind, .. }, K::Subkind) => Value::Int(*subkind),
            (P::HdlExpr { tree, .. }, K::Foreign) | (P::ClockDecl { tree }, K::Foreign) => {
                Value::Foreign(*tree)
            }
            (P::HdlExpr { class, .. }, K::Class) => Value::Int(*class),
            (P::Sere { operands }, K::Params) | (P::Implication { operands, .. }, K::Params) => {
                Value::Refs(operands)
            }
            _ => return None,
        })
    }

    fn slot_mut(&mut self, key: AttrKey) -> Option<SlotMut<'_, PslId>> {
        use AttrKey as K;
        use PslNode as P;
        Some(match (self, key) {
            (P::Assert { value }, K::Value)
            | (P::Always { value }, K::Value)
            | (P::Never { value }, K::Value)
            | (P::Eventually { value }, K::Value)
            | (P::Next { value, .. }, K::Value)
            | (P::NextA { value, .. }, K::Value)
            | (P::NextE { value, .. }, K::Value)
            | (P::NextEvent { value, .. }, K::Value) => SlotMut::Ref(value),
            (P::Next { subkind, .. }, K::Subkind)
            | (P::NextA { subkind, .. }, K::Subkind)
            | (P::NextE { subkind, .. }, K::Subkind)
            | (P::NextEvent { subkind, .. }, K::Subkind)
            | (P::Implication { subkind, .. }, K::Subkind) => SlotMut::Int(subkind),
            (P::HdlExpr { tree, .. }, K::Foreign) | (P::ClockDecl { tree }, K::Foreign) => {
                SlotMut::Foreign(tree)
            }
            (P::HdlExpr { class, .. }, K::Class) => SlotMut::Int(class),
            (P::Sere { operands }, K::Params) | (P::Implication { operands, .. }, K::Params) => {
                SlotMut::Refs(operands)
            }
            _ => return None,
        })
    }
}
