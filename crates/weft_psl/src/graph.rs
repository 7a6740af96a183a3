//! The [`PslGraph`] container and its typed accessors.

use std::io::{Read, Write};

use weft_common::{Interner, Loc};
use weft_object::{
    AttrKey, ForeignRef, ImageError, ImageHeader, ImageReader, ImageWriter, OrFatal, Relocation,
    Store, WriteBarrier,
};

use crate::kind::{PslClass, PslKind};
use crate::node::{PslId, PslNode};

/// Every PSL node parsed from one design unit.
#[derive(Default)]
pub struct PslGraph {
    store: Store<PslNode>,
}

impl PslGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying attribute store.
    pub fn store(&self) -> &Store<PslNode> {
        &self.store
    }

    /// Installs the barrier notified on every reference mutation.
    pub fn set_barrier(&mut self, barrier: impl WriteBarrier + 'static) {
        self.store.set_barrier(barrier);
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Allocates an empty node of `kind`.
    pub fn alloc(&mut self, kind: PslKind) -> PslId {
        self.store.alloc(kind)
    }

    /// Kind of `p`.
    pub fn kind(&self, p: PslId) -> PslKind {
        self.store.kind(p)
    }

    /// Display name of a kind.
    pub fn kind_str(kind: PslKind) -> &'static str {
        kind.as_str()
    }

    /// Source location of `p`.
    pub fn loc(&self, p: PslId) -> &Loc {
        self.store.loc(p)
    }

    /// Replaces the source location of `p`.
    pub fn set_loc(&mut self, p: PslId, loc: Loc) {
        self.store.set_loc(p, loc);
    }

    /// Delay count or operator variant of a `next` or implication node.
    #[track_caller]
    pub fn subkind(&self, p: PslId) -> u32 {
        self.store.int(p, AttrKey::Subkind).or_fatal()
    }

    /// Sets the subkind of `p`.
    #[track_caller]
    pub fn set_subkind(&mut self, p: PslId, subkind: u32) {
        self.store.set_int(p, AttrKey::Subkind, subkind).or_fatal();
    }

    /// Type class of an HDL expression.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not an HDL expression or holds an unknown class.
    #[track_caller]
    pub fn class(&self, p: PslId) -> PslClass {
        let raw = self.store.int(p, AttrKey::Class).or_fatal();
        match PslClass::from_raw(raw) {
            Some(class) => class,
            None => panic!("P_HDL_EXPR holds unknown class {raw}"),
        }
    }

    /// Sets the type class of an HDL expression.
    #[track_caller]
    pub fn set_class(&mut self, p: PslId, class: PslClass) {
        self.store
            .set_int(p, AttrKey::Class, class.as_raw())
            .or_fatal();
    }

    /// The HDL syntax-tree node an expression or clock declaration wraps.
    #[track_caller]
    pub fn tree(&self, p: PslId) -> ForeignRef {
        self.store.foreign(p, AttrKey::Foreign).or_fatal()
    }

    /// Points `p` at an HDL syntax-tree node.
    #[track_caller]
    pub fn set_tree(&mut self, p: PslId, tree: ForeignRef) {
        self.store
            .set_foreign(p, AttrKey::Foreign, tree)
            .or_fatal();
    }

    /// Operand of a unary temporal operator or directive.
    #[track_caller]
    pub fn value(&self, p: PslId) -> PslId {
        self.store.node_ref(p, AttrKey::Value).or_fatal()
    }

    /// Sets the operand of `p`.
    #[track_caller]
    pub fn set_value(&mut self, p: PslId, value: PslId) {
        self.store.set_ref(p, AttrKey::Value, value).or_fatal();
    }

    /// Operands of a SERE or implication.
    #[track_caller]
    pub fn operands(&self, p: PslId) -> &[PslId] {
        self.store.refs(p, AttrKey::Params).or_fatal()
    }

    /// The `n`th operand of a SERE or implication.
    #[track_caller]
    pub fn operand(&self, p: PslId, n: usize) -> PslId {
        self.store.nth(p, AttrKey::Params, n).or_fatal()
    }

    /// Appends an operand.
    #[track_caller]
    pub fn add_operand(&mut self, p: PslId, operand: PslId) {
        self.store.append(p, AttrKey::Params, operand).or_fatal();
    }

    /// Drops every node unreachable from `roots`, compacting the graph.
    pub fn collect(&mut self, roots: &[PslId]) -> Relocation<PslId> {
        self.store.collect(roots)
    }

    /// Writes `root` and everything reachable from it as one image.
    pub fn write<W: Write>(
        &self,
        root: PslId,
        out: &mut ImageWriter<W>,
        interner: &Interner,
    ) -> Result<ImageHeader, ImageError> {
        out.write(&self.store, root, interner)
    }

    /// Reads one PSL image into this graph, returning its top-level node.
    pub fn read<R: Read>(
        &mut self,
        input: &mut ImageReader<R>,
        interner: &Interner,
    ) -> Result<PslId, ImageError> {
        input.read(&mut self.store, interner)
    }
}
