//! The [`Netlist`] container and its typed accessors.
//!
//! Every accessor is a thin wrapper over the generic [`Store`], so the legal
//! attribute mask is checked in exactly one place. Misuse is a bug in the
//! calling pass: accessors panic with a message naming the kind and the
//! attribute involved.

use std::io::{Read, Write};

use weft_common::{Ident, Interner, Loc};
use weft_object::{
    AttrKey, Family, ImageError, ImageHeader, ImageReader, ImageWriter, ObjectError, OrFatal,
    Relocation, Store, TypeRef, WriteBarrier,
};

use crate::kind::{EFlags, EKind, NEXUS_POS_INVALID};
use crate::node::{ENode, ENodeId};

/// Every e-node of one elaborated design.
#[derive(Default)]
pub struct Netlist {
    store: Store<ENode>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying attribute store.
    pub fn store(&self) -> &Store<ENode> {
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

    /// Returns `true` if the netlist holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Allocates an empty node of `kind`.
    pub fn alloc(&mut self, kind: EKind) -> ENodeId {
        self.store.alloc(kind)
    }

    /// Kind of `e`.
    pub fn kind(&self, e: ENodeId) -> EKind {
        self.store.kind(e)
    }

    /// Display name of a kind.
    pub fn kind_str(kind: EKind) -> &'static str {
        kind.as_str()
    }

    /// Source location of `e`.
    pub fn loc(&self, e: ENodeId) -> &Loc {
        self.store.loc(e)
    }

    /// Replaces the source location of `e`.
    pub fn set_loc(&mut self, e: ENodeId, loc: Loc) {
        self.store.set_loc(e, loc);
    }

    #[track_caller]
    fn expect_kind(&self, owner: ENodeId, key: AttrKey, target: ENodeId, allowed: &[EKind]) {
        let kind = self.kind(target);
        if !allowed.contains(&kind) {
            let err: Result<(), ObjectError> = Err(ObjectError::IllegalTarget {
                kind: self.kind(owner).as_str(),
                key,
                target: kind.as_str(),
            });
            err.or_fatal();
        }
    }

    // -- identifiers --

    /// Name of a root, signal, process or nexus.
    ///
    /// # Panics
    ///
    /// Panics if the kind has no name or it was never set.
    #[track_caller]
    pub fn ident(&self, e: ENodeId) -> Ident {
        self.store.ident(e, AttrKey::Ident).or_fatal()
    }

    /// Sets the name of `e`.
    #[track_caller]
    pub fn set_ident(&mut self, e: ENodeId, ident: Ident) {
        self.store.set_ident(e, AttrKey::Ident, ident).or_fatal();
    }

    /// Instance name of a scope, signal or process.
    #[track_caller]
    pub fn instance(&self, e: ENodeId) -> Ident {
        self.store.ident(e, AttrKey::Ident2).or_fatal()
    }

    /// Sets the instance name of `e`.
    #[track_caller]
    pub fn set_instance(&mut self, e: ENodeId, ident: Ident) {
        self.store.set_ident(e, AttrKey::Ident2, ident).or_fatal();
    }

    /// Hierarchical path of a scope, signal or process.
    #[track_caller]
    pub fn path(&self, e: ENodeId) -> Ident {
        self.store.ident(e, AttrKey::Path).or_fatal()
    }

    /// Sets the hierarchical path of `e`.
    #[track_caller]
    pub fn set_path(&mut self, e: ENodeId, ident: Ident) {
        self.store.set_ident(e, AttrKey::Path, ident).or_fatal();
    }

    /// Generated code unit of a scope or process.
    #[track_caller]
    pub fn vcode(&self, e: ENodeId) -> Ident {
        self.store.ident(e, AttrKey::Vcode).or_fatal()
    }

    /// Sets the generated code unit of `e`.
    #[track_caller]
    pub fn set_vcode(&mut self, e: ENodeId, unit: Ident) {
        self.store.set_ident(e, AttrKey::Vcode, unit).or_fatal();
    }

    /// Library units a root depends on.
    #[track_caller]
    pub fn deps(&self, e: ENodeId) -> &[Ident] {
        self.store.idents(e, AttrKey::Deps).or_fatal()
    }

    /// Records a dependency of a root.
    #[track_caller]
    pub fn add_dep(&mut self, e: ENodeId, dep: Ident) {
        self.store.add_ident(e, AttrKey::Deps, dep).or_fatal();
    }

    // -- scalar attributes --

    /// Position assigned to a nexus.
    ///
    /// # Panics
    ///
    /// Panics if no position was assigned; check [`has_pos`](Self::has_pos).
    #[track_caller]
    pub fn pos(&self, e: ENodeId) -> u32 {
        let pos = self.store.int(e, AttrKey::Pos).or_fatal();
        assert!(pos != NEXUS_POS_INVALID, "nexus position was never assigned");
        pos
    }

    /// Assigns the position of a nexus.
    #[track_caller]
    pub fn set_pos(&mut self, e: ENodeId, pos: u32) {
        self.store.set_int(e, AttrKey::Pos, pos).or_fatal();
    }

    /// Returns `true` once a nexus has a position.
    #[track_caller]
    pub fn has_pos(&self, e: ENodeId) -> bool {
        self.store.int(e, AttrKey::Pos).or_fatal() != NEXUS_POS_INVALID
    }

    /// Flags of a signal or process.
    #[track_caller]
    pub fn flags(&self, e: ENodeId) -> EFlags {
        EFlags::from_bits(self.store.int(e, AttrKey::Flags).or_fatal())
    }

    /// Sets `flags` on a signal or process, keeping those already set.
    #[track_caller]
    pub fn set_flag(&mut self, e: ENodeId, flags: EFlags) {
        self.store
            .update_int(e, AttrKey::Flags, |bits| *bits |= flags.bits())
            .or_fatal();
    }

    /// Width of a signal, nexus or padding.
    #[track_caller]
    pub fn width(&self, e: ENodeId) -> u32 {
        self.store.int(e, AttrKey::IVal).or_fatal()
    }

    /// Sets the width of a signal, nexus or padding.
    ///
    /// # Panics
    ///
    /// Panics if `width` does not fit in an `i32`.
    #[track_caller]
    pub fn set_width(&mut self, e: ENodeId, width: u32) {
        assert!(width < i32::MAX as u32, "width {width} out of range");
        self.store.set_int(e, AttrKey::IVal, width).or_fatal();
    }

    /// Element size in bytes of a nexus or padding.
    #[track_caller]
    pub fn size(&self, e: ENodeId) -> u32 {
        self.store.int(e, AttrKey::Size).or_fatal()
    }

    /// Sets the element size of a nexus or padding.
    #[track_caller]
    pub fn set_size(&mut self, e: ENodeId, size: u32) {
        self.store.set_int(e, AttrKey::Size, size).or_fatal();
    }

    /// Declared type of a signal, if assigned.
    #[track_caller]
    pub fn ty(&self, e: ENodeId) -> Option<TypeRef> {
        self.store.type_ref(e, AttrKey::Type).or_fatal()
    }

    /// Sets the declared type of a signal.
    #[track_caller]
    pub fn set_type(&mut self, e: ENodeId, ty: TypeRef) {
        self.store.set_type(e, AttrKey::Type, ty).or_fatal();
    }

    // -- relations --

    /// Enclosing scope of a scope or process.
    ///
    /// # Panics
    ///
    /// Panics if the parent was never set; check [`has_parent`](Self::has_parent).
    #[track_caller]
    pub fn parent(&self, e: ENodeId) -> ENodeId {
        self.store.node_ref(e, AttrKey::Parent).or_fatal()
    }

    /// Sets the enclosing scope of `e`.
    #[track_caller]
    pub fn set_parent(&mut self, e: ENodeId, parent: ENodeId) {
        self.store.set_ref(e, AttrKey::Parent, parent).or_fatal();
    }

    /// Returns `true` if `e` has an enclosing scope.
    #[track_caller]
    pub fn has_parent(&self, e: ENodeId) -> bool {
        self.store
            .node_ref_opt(e, AttrKey::Parent)
            .or_fatal()
            .is_some()
    }

    /// Child scopes of a root or scope.
    #[track_caller]
    pub fn scopes(&self, e: ENodeId) -> &[ENodeId] {
        self.store.refs(e, AttrKey::Scopes).or_fatal()
    }

    /// Appends a child scope.
    #[track_caller]
    pub fn add_scope(&mut self, e: ENodeId, scope: ENodeId) {
        self.expect_kind(e, AttrKey::Scopes, scope, &[EKind::Scope]);
        self.store.append(e, AttrKey::Scopes, scope).or_fatal();
    }

    /// Processes of a scope.
    #[track_caller]
    pub fn procs(&self, e: ENodeId) -> &[ENodeId] {
        self.store.refs(e, AttrKey::Procs).or_fatal()
    }

    /// Appends a process to a scope.
    #[track_caller]
    pub fn add_proc(&mut self, e: ENodeId, process: ENodeId) {
        self.expect_kind(e, AttrKey::Procs, process, &[EKind::Process]);
        self.store.append(e, AttrKey::Procs, process).or_fatal();
    }

    /// Drivers and ports of a nexus.
    #[track_caller]
    pub fn sources(&self, e: ENodeId) -> &[ENodeId] {
        self.store.refs(e, AttrKey::Sources).or_fatal()
    }

    /// Records a signal (port) or process (driver) as a source of a nexus.
    #[track_caller]
    pub fn add_source(&mut self, e: ENodeId, source: ENodeId) {
        self.expect_kind(
            e,
            AttrKey::Sources,
            source,
            &[EKind::Process, EKind::Signal],
        );
        self.store.append(e, AttrKey::Sources, source).or_fatal();
    }

    /// Signals of a scope, or signals overlapping a nexus.
    #[track_caller]
    pub fn signals(&self, e: ENodeId) -> &[ENodeId] {
        self.store.refs(e, AttrKey::Signals).or_fatal()
    }

    /// Appends a signal.
    #[track_caller]
    pub fn add_signal(&mut self, e: ENodeId, signal: ENodeId) {
        self.expect_kind(e, AttrKey::Signals, signal, &[EKind::Signal]);
        self.store.append(e, AttrKey::Signals, signal).or_fatal();
    }

    /// Nexus list of a root, signal or process.
    #[track_caller]
    pub fn nexuses(&self, e: ENodeId) -> &[ENodeId] {
        self.store.refs(e, AttrKey::Nexus).or_fatal()
    }

    /// Appends a nexus or padding to the nexus list of `e`.
    #[track_caller]
    pub fn add_nexus(&mut self, e: ENodeId, nexus: ENodeId) {
        self.expect_kind(e, AttrKey::Nexus, nexus, &[EKind::Nexus, EKind::Padding]);
        self.store.append(e, AttrKey::Nexus, nexus).or_fatal();
    }

    /// Replaces element `index` of the nexus list of `e`.
    #[track_caller]
    pub fn change_nexus(&mut self, e: ENodeId, index: usize, nexus: ENodeId) {
        self.expect_kind(e, AttrKey::Nexus, nexus, &[EKind::Nexus]);
        self.store
            .replace_at(e, AttrKey::Nexus, index, nexus)
            .or_fatal();
    }

    /// Inserts `new` directly after `after` in the nexus list of `e`.
    ///
    /// # Panics
    ///
    /// Panics if `after` is not in the list.
    #[track_caller]
    pub fn insert_nexus(&mut self, e: ENodeId, after: ENodeId, new: ENodeId) {
        let allowed = [EKind::Nexus, EKind::Padding];
        self.expect_kind(e, AttrKey::Nexus, after, &allowed);
        self.expect_kind(e, AttrKey::Nexus, new, &allowed);
        self.store
            .insert_after(e, AttrKey::Nexus, after, new)
            .or_fatal();
    }

    // -- lifetime and persistence --

    /// Drops every node unreachable from a root, compacting the netlist.
    ///
    /// Handles held outside the netlist must be translated through the result.
    pub fn collect(&mut self) -> Relocation<ENodeId> {
        self.store.collect(&[])
    }

    /// Writes `root` and everything reachable from it as one image.
    pub fn write<W: Write>(
        &self,
        root: ENodeId,
        out: &mut ImageWriter<W>,
        interner: &Interner,
    ) -> Result<ImageHeader, ImageError> {
        out.write(&self.store, root, interner)
    }

    /// Reads one e-node image into this netlist, returning its root.
    pub fn read<R: Read>(
        &mut self,
        input: &mut ImageReader<R>,
        interner: &Interner,
    ) -> Result<ENodeId, ImageError> {
        input.read(&mut self.store, interner)
    }
}

impl ENode {
    /// Display name of this node's kind.
    pub fn kind_str(&self) -> &'static str {
        Family::kind(self).as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::FileId;
    use weft_object::{BarrierLog, Kind, ObjectRef, ObjectTag};

    #[test]
    fn access_succeeds_iff_key_in_mask() {
        let mut n = Netlist::new();
        for kind in EKind::ALL {
            let e = n.alloc(kind);
            for key in AttrKey::ALL {
                let legal = ENode::CLASS.has(kind.index(), key);
                assert_eq!(n.store().lookup(e, key).is_ok(), legal, "{kind} {key}");
            }
        }
    }

    #[test]
    fn parent_unset_reports_false() {
        let mut n = Netlist::new();
        let scope = n.alloc(EKind::Scope);
        assert!(!n.has_parent(scope));
        let outer = n.alloc(EKind::Scope);
        n.set_parent(scope, outer);
        assert!(n.has_parent(scope));
        assert_eq!(n.parent(scope), outer);
    }

    #[test]
    #[should_panic(expected = "E_SCOPE attribute I_PARENT was never set")]
    fn strict_parent_getter_panics() {
        let mut n = Netlist::new();
        let scope = n.alloc(EKind::Scope);
        n.parent(scope);
    }

    #[test]
    #[should_panic(expected = "e-node kind E_PADDING does not have attribute I_IDENT")]
    fn padding_has_no_ident() {
        let mut n = Netlist::new();
        let pad = n.alloc(EKind::Padding);
        n.ident(pad);
    }

    #[test]
    #[should_panic(expected = "E_NEXUS cannot hold E_SCOPE in I_SOURCES")]
    fn nexus_source_must_be_signal_or_process() {
        let mut n = Netlist::new();
        let nexus = n.alloc(EKind::Nexus);
        let scope = n.alloc(EKind::Scope);
        n.add_source(nexus, scope);
    }

    #[test]
    #[should_panic(expected = "E_ROOT cannot hold E_SIGNAL in I_SCOPES")]
    fn add_scope_checks_kind() {
        let mut n = Netlist::new();
        let root = n.alloc(EKind::Root);
        let sig = n.alloc(EKind::Signal);
        n.add_scope(root, sig);
    }

    #[test]
    #[should_panic(expected = "E_NEXUS cannot hold E_PROCESS in I_SIGNALS")]
    fn add_signal_checks_kind() {
        let mut n = Netlist::new();
        let nexus = n.alloc(EKind::Nexus);
        let process = n.alloc(EKind::Process);
        n.add_signal(nexus, process);
    }

    #[test]
    #[should_panic(expected = "E_SCOPE cannot hold E_ROOT in I_SIGNALS")]
    fn scope_signals_check_kind() {
        let mut n = Netlist::new();
        let scope = n.alloc(EKind::Scope);
        let root = n.alloc(EKind::Root);
        n.add_signal(scope, root);
    }

    #[test]
    fn position_sentinel() {
        let mut n = Netlist::new();
        let nexus = n.alloc(EKind::Nexus);
        assert!(!n.has_pos(nexus));
        n.set_pos(nexus, 17);
        assert!(n.has_pos(nexus));
        assert_eq!(n.pos(nexus), 17);
    }

    #[test]
    #[should_panic(expected = "nexus position was never assigned")]
    fn unassigned_position_panics() {
        let mut n = Netlist::new();
        let nexus = n.alloc(EKind::Nexus);
        n.pos(nexus);
    }

    #[test]
    fn set_flag_accumulates() {
        let mut n = Netlist::new();
        let sig = n.alloc(EKind::Signal);
        assert!(n.flags(sig).is_empty());
        n.set_flag(sig, EFlags::LAST_VALUE);
        n.set_flag(sig, EFlags::CONTIGUOUS);
        assert_eq!(n.flags(sig), EFlags::LAST_VALUE | EFlags::CONTIGUOUS);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn width_must_fit_i32() {
        let mut n = Netlist::new();
        let sig = n.alloc(EKind::Signal);
        n.set_width(sig, u32::MAX - 1);
    }

    #[test]
    fn change_and_insert_nexus() {
        let mut n = Netlist::new();
        let sig = n.alloc(EKind::Signal);
        let [a, b, c] = [(); 3].map(|_| n.alloc(EKind::Nexus));
        let pad = n.alloc(EKind::Padding);
        n.add_nexus(sig, a);
        n.add_nexus(sig, pad);
        n.insert_nexus(sig, a, b);
        assert_eq!(n.nexuses(sig), &[a, b, pad]);
        n.change_nexus(sig, 1, c);
        assert_eq!(n.nexuses(sig), &[a, c, pad]);
    }

    #[test]
    fn scalar_and_ident_attributes() {
        let interner = Interner::new();
        let mut n = Netlist::new();
        let process = n.alloc(EKind::Process);
        n.set_ident(process, interner.get_or_intern("p0"));
        n.set_instance(process, interner.get_or_intern("TOP"));
        n.set_path(process, interner.get_or_intern(":top:p0"));
        n.set_vcode(process, interner.get_or_intern("WORK.TOP.P0"));
        n.set_flag(process, EFlags::POSTPONED);
        n.set_loc(process, Loc::new(FileId::from_raw(0), 4, 2, 10));
        assert_eq!(interner.resolve(n.path(process)), ":top:p0");
        assert_eq!(interner.resolve(n.vcode(process)), "WORK.TOP.P0");
        assert_eq!(interner.resolve(n.instance(process)), "TOP");
        assert!(n.flags(process).contains(EFlags::POSTPONED));
        assert_eq!(n.loc(process).first_line, 4);
        assert_eq!(n.store().node(process).kind_str(), "E_PROCESS");
        assert_eq!(Netlist::kind_str(n.kind(process)), "E_PROCESS");

        let sig = n.alloc(EKind::Signal);
        assert_eq!(n.ty(sig), None);
        n.set_type(sig, TypeRef::from_raw(3));
        assert_eq!(n.ty(sig), Some(TypeRef::from_raw(3)));

        let root = n.alloc(EKind::Root);
        n.add_dep(root, interner.get_or_intern("IEEE.STD_LOGIC_1164"));
        assert_eq!(n.deps(root).len(), 1);
    }

    #[test]
    fn reference_mutations_hit_the_barrier() {
        let log = BarrierLog::new();
        let mut n = Netlist::new();
        n.set_barrier(log.clone());
        let scope = n.alloc(EKind::Scope);
        let process = n.alloc(EKind::Process);
        n.add_proc(scope, process);
        n.set_parent(process, scope);
        assert_eq!(
            log.edges(),
            vec![
                (
                    ObjectRef::new(ObjectTag::ENode, scope.as_raw()),
                    ObjectRef::new(ObjectTag::ENode, process.as_raw())
                ),
                (
                    ObjectRef::new(ObjectTag::ENode, process.as_raw()),
                    ObjectRef::new(ObjectTag::ENode, scope.as_raw())
                ),
            ]
        );
    }

    #[test]
    fn collect_keeps_root_reachable_nodes() {
        let mut n = Netlist::new();
        let root = n.alloc(EKind::Root);
        let stray = n.alloc(EKind::Nexus);
        let scope = n.alloc(EKind::Scope);
        n.add_scope(root, scope);
        let reloc = n.collect();
        assert!(reloc.is_reclaimed(stray));
        assert_eq!(n.len(), 2);
        let root = reloc.get(root).unwrap();
        assert_eq!(n.scopes(root), &[reloc.get(scope).unwrap()]);
    }
}
