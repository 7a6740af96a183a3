//! The attribute store: one arena of nodes of a single family.
//!
//! Every accessor goes through [`Store::lookup`] or its mutable twin, which
//! check the key against the kind's legal mask before touching the node. That
//! single check is what makes illegal attribute access fail uniformly.

use crate::arena::{Arena, ArenaId};
use crate::barrier::{NoBarrier, WriteBarrier};
use crate::class::{AttrKey, ObjectTag};
use crate::error::ObjectError;
use crate::family::{assign, Family, Kind};
use crate::value::{ForeignRef, ObjectRef, SlotMut, TypeRef, Value};
use weft_common::{Ident, Loc};

struct Entry<F> {
    loc: Loc,
    node: F,
}

/// Owner of every node of one family within a compilation unit.
pub struct Store<F: Family> {
    nodes: Arena<F::Id, Entry<F>>,
    barrier: Box<dyn WriteBarrier>,
}

impl<F: Family> Default for Store<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Family> Store<F> {
    /// Creates an empty store with no write barrier installed.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            barrier: Box::new(NoBarrier),
        }
    }

    /// Installs the barrier notified on every reference mutation.
    pub fn set_barrier(&mut self, barrier: impl WriteBarrier + 'static) {
        self.barrier = Box::new(barrier);
    }

    /// Number of nodes in the store.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every node handle in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = F::Id> + '_ {
        self.nodes.ids()
    }

    /// Returns `true` if `id` names a node of this store.
    pub fn contains(&self, id: F::Id) -> bool {
        self.nodes.contains(id)
    }

    /// Allocates an empty node of `kind` with an invalid location.
    pub fn alloc(&mut self, kind: F::Kind) -> F::Id {
        self.nodes.alloc(Entry {
            loc: Loc::INVALID,
            node: F::new(kind),
        })
    }

    pub(crate) fn alloc_node(&mut self, loc: Loc, node: F) -> F::Id {
        self.nodes.alloc(Entry { loc, node })
    }

    /// Kind of `id`.
    pub fn kind(&self, id: F::Id) -> F::Kind {
        self.nodes[id].node.kind()
    }

    /// Display name of the kind of `id`.
    pub fn kind_name(&self, id: F::Id) -> &'static str {
        F::CLASS.kind_name(self.kind(id).index())
    }

    /// Read-only access to the node itself.
    pub fn node(&self, id: F::Id) -> &F {
        &self.nodes[id].node
    }

    /// Source location of `id`.
    pub fn loc(&self, id: F::Id) -> &Loc {
        &self.nodes[id].loc
    }

    /// Replaces the source location of `id`.
    pub fn set_loc(&mut self, id: F::Id, loc: Loc) {
        self.nodes[id].loc = loc;
    }

    /// Reads attribute `key` of `id`, failing if the kind does not carry it.
    pub fn lookup(&self, id: F::Id, key: AttrKey) -> Result<Value<'_, F::Id>, ObjectError> {
        let node = &self.nodes[id].node;
        let kind = node.kind().index();
        F::CLASS.check(kind, key)?;
        node.slot(key).ok_or_else(|| ObjectError::IllegalAttr {
            class: F::CLASS.name,
            kind: F::CLASS.kind_name(kind),
            key,
        })
    }

    pub(crate) fn lookup_mut(
        &mut self,
        id: F::Id,
        key: AttrKey,
    ) -> Result<SlotMut<'_, F::Id>, ObjectError> {
        let node = &mut self.nodes[id].node;
        let kind = node.kind().index();
        F::CLASS.check(kind, key)?;
        node.slot_mut(key).ok_or_else(|| ObjectError::IllegalAttr {
            class: F::CLASS.name,
            kind: F::CLASS.kind_name(kind),
            key,
        })
    }

    /// Overwrites attribute `key` of `id` with `value`.
    ///
    /// A reference or a non-empty reference collection stored this way issues
    /// one barrier notification naming its first target.
    pub fn update(
        &mut self,
        id: F::Id,
        key: AttrKey,
        value: Value<'_, F::Id>,
    ) -> Result<(), ObjectError> {
        let kind = self.kind_name(id);
        let slot = self.lookup_mut(id, key)?;
        if !assign(slot, value) {
            return Err(ObjectError::ShapeMismatch {
                kind,
                key,
                expected: value.shape(),
            });
        }
        let target = match value {
            Value::Ref(Some(target)) => Some(Self::node_target(target)),
            Value::Refs(list) => list.first().map(|t| Self::node_target(*t)),
            Value::Foreign(Some(target)) => {
                Some(ObjectRef::new(ObjectTag::Tree, target.as_raw()))
            }
            _ => None,
        };
        if let Some(target) = target {
            self.notify(id, target);
        }
        Ok(())
    }

    fn shape_error(&self, id: F::Id, key: AttrKey, expected: &'static str) -> ObjectError {
        ObjectError::ShapeMismatch {
            kind: self.kind_name(id),
            key,
            expected,
        }
    }

    fn unset_error(&self, id: F::Id, key: AttrKey) -> ObjectError {
        ObjectError::UnsetAttr {
            kind: self.kind_name(id),
            key,
        }
    }

    fn notify(&mut self, writer: F::Id, target: ObjectRef) {
        let writer = ObjectRef::new(F::CLASS.tag, writer.as_raw());
        self.barrier.record(writer, target);
    }

    fn node_target(id: F::Id) -> ObjectRef {
        ObjectRef::new(F::CLASS.tag, id.as_raw())
    }

    // -- identifiers --

    /// Identifier attribute, or `None` if never assigned.
    pub fn ident_opt(&self, id: F::Id, key: AttrKey) -> Result<Option<Ident>, ObjectError> {
        match self.lookup(id, key)? {
            Value::Ident(ident) => Ok(ident),
            _ => Err(self.shape_error(id, key, "an identifier")),
        }
    }

    /// Mandatory identifier attribute.
    pub fn ident(&self, id: F::Id, key: AttrKey) -> Result<Ident, ObjectError> {
        self.ident_opt(id, key)?
            .ok_or_else(|| self.unset_error(id, key))
    }

    /// Assigns an identifier attribute.
    pub fn set_ident(&mut self, id: F::Id, key: AttrKey, ident: Ident) -> Result<(), ObjectError> {
        match self.lookup_mut(id, key)? {
            SlotMut::Ident(slot) => {
                *slot = Some(ident);
                Ok(())
            }
            _ => Err(self.shape_error(id, key, "an identifier")),
        }
    }

    /// Identifier collection attribute.
    pub fn idents(&self, id: F::Id, key: AttrKey) -> Result<&[Ident], ObjectError> {
        match self.lookup(id, key)? {
            Value::Idents(list) => Ok(list),
            _ => Err(self.shape_error(id, key, "an identifier collection")),
        }
    }

    /// Appends to an identifier collection attribute.
    pub fn add_ident(&mut self, id: F::Id, key: AttrKey, ident: Ident) -> Result<(), ObjectError> {
        match self.lookup_mut(id, key)? {
            SlotMut::Idents(list) => {
                list.push(ident);
                Ok(())
            }
            _ => Err(self.shape_error(id, key, "an identifier collection")),
        }
    }

    // -- integers and handles --

    /// Integer attribute.
    pub fn int(&self, id: F::Id, key: AttrKey) -> Result<u32, ObjectError> {
        match self.lookup(id, key)? {
            Value::Int(v) => Ok(v),
            _ => Err(self.shape_error(id, key, "an integer")),
        }
    }

    /// Assigns an integer attribute.
    pub fn set_int(&mut self, id: F::Id, key: AttrKey, value: u32) -> Result<(), ObjectError> {
        self.update_int(id, key, |v| *v = value)
    }

    /// Applies `f` to an integer attribute in place.
    pub fn update_int(
        &mut self,
        id: F::Id,
        key: AttrKey,
        f: impl FnOnce(&mut u32),
    ) -> Result<(), ObjectError> {
        match self.lookup_mut(id, key)? {
            SlotMut::Int(slot) => {
                f(slot);
                Ok(())
            }
            _ => Err(self.shape_error(id, key, "an integer")),
        }
    }

    /// Type attribute, or `None` if never assigned.
    pub fn type_ref(&self, id: F::Id, key: AttrKey) -> Result<Option<TypeRef>, ObjectError> {
        match self.lookup(id, key)? {
            Value::Type(ty) => Ok(ty),
            _ => Err(self.shape_error(id, key, "a type")),
        }
    }

    /// Assigns a type attribute.
    pub fn set_type(&mut self, id: F::Id, key: AttrKey, ty: TypeRef) -> Result<(), ObjectError> {
        match self.lookup_mut(id, key)? {
            SlotMut::Type(slot) => {
                *slot = Some(ty);
                Ok(())
            }
            _ => Err(self.shape_error(id, key, "a type")),
        }
    }

    // -- references --

    /// Single-reference attribute, or `None` if never assigned.
    pub fn node_ref_opt(&self, id: F::Id, key: AttrKey) -> Result<Option<F::Id>, ObjectError> {
        match self.lookup(id, key)? {
            Value::Ref(target) => Ok(target),
            _ => Err(self.shape_error(id, key, "a node reference")),
        }
    }

    /// Mandatory single-reference attribute.
    pub fn node_ref(&self, id: F::Id, key: AttrKey) -> Result<F::Id, ObjectError> {
        self.node_ref_opt(id, key)?
            .ok_or_else(|| self.unset_error(id, key))
    }

    /// Points a single-reference attribute at `target`.
    pub fn set_ref(&mut self, id: F::Id, key: AttrKey, target: F::Id) -> Result<(), ObjectError> {
        match self.lookup_mut(id, key)? {
            SlotMut::Ref(slot) => *slot = Some(target),
            _ => return Err(self.shape_error(id, key, "a node reference")),
        }
        self.notify(id, Self::node_target(target));
        Ok(())
    }

    /// Foreign-reference attribute, or `None` if never assigned.
    pub fn foreign_opt(&self, id: F::Id, key: AttrKey) -> Result<Option<ForeignRef>, ObjectError> {
        match self.lookup(id, key)? {
            Value::Foreign(target) => Ok(target),
            _ => Err(self.shape_error(id, key, "a foreign reference")),
        }
    }

    /// Mandatory foreign-reference attribute.
    pub fn foreign(&self, id: F::Id, key: AttrKey) -> Result<ForeignRef, ObjectError> {
        self.foreign_opt(id, key)?
            .ok_or_else(|| self.unset_error(id, key))
    }

    /// Points a foreign-reference attribute at `target`.
    pub fn set_foreign(
        &mut self,
        id: F::Id,
        key: AttrKey,
        target: ForeignRef,
    ) -> Result<(), ObjectError> {
        match self.lookup_mut(id, key)? {
            SlotMut::Foreign(slot) => *slot = Some(target),
            _ => return Err(self.shape_error(id, key, "a foreign reference")),
        }
        self.notify(id, ObjectRef::new(ObjectTag::Tree, target.as_raw()));
        Ok(())
    }

    // -- reference collections --

    /// Node collection attribute in its stored order.
    pub fn refs(&self, id: F::Id, key: AttrKey) -> Result<&[F::Id], ObjectError> {
        match self.lookup(id, key)? {
            Value::Refs(list) => Ok(list),
            _ => Err(self.shape_error(id, key, "a node collection")),
        }
    }

    /// The `n`th element of a node collection.
    pub fn nth(&self, id: F::Id, key: AttrKey, n: usize) -> Result<F::Id, ObjectError> {
        let list = self.refs(id, key)?;
        list.get(n)
            .copied()
            .ok_or_else(|| ObjectError::IndexOutOfRange {
                kind: self.kind_name(id),
                key,
                index: n,
                len: list.len(),
            })
    }

    fn refs_mut(&mut self, id: F::Id, key: AttrKey) -> Result<&mut Vec<F::Id>, ObjectError> {
        let kind = self.kind_name(id);
        match self.lookup_mut(id, key)? {
            SlotMut::Refs(list) => Ok(list),
            _ => Err(ObjectError::ShapeMismatch {
                kind,
                key,
                expected: "a node collection",
            }),
        }
    }

    /// Appends `target` to a node collection.
    pub fn append(&mut self, id: F::Id, key: AttrKey, target: F::Id) -> Result<(), ObjectError> {
        self.refs_mut(id, key)?.push(target);
        self.notify(id, Self::node_target(target));
        Ok(())
    }

    /// Inserts `target` immediately after the first occurrence of `anchor`.
    ///
    /// The anchor is located by identity scan; every other element keeps its
    /// relative order.
    pub fn insert_after(
        &mut self,
        id: F::Id,
        key: AttrKey,
        anchor: F::Id,
        target: F::Id,
    ) -> Result<(), ObjectError> {
        let kind = self.kind_name(id);
        let list = self.refs_mut(id, key)?;
        let pos = list
            .iter()
            .position(|e| *e == anchor)
            .ok_or(ObjectError::AnchorNotFound {
                kind,
                key,
                anchor: anchor.as_raw(),
            })?;
        list.insert(pos + 1, target);
        self.notify(id, Self::node_target(target));
        Ok(())
    }

    /// Overwrites element `index` of a node collection.
    pub fn replace_at(
        &mut self,
        id: F::Id,
        key: AttrKey,
        index: usize,
        target: F::Id,
    ) -> Result<(), ObjectError> {
        let kind = self.kind_name(id);
        let list = self.refs_mut(id, key)?;
        let len = list.len();
        let slot = list.get_mut(index).ok_or(ObjectError::IndexOutOfRange {
            kind,
            key,
            index,
            len,
        })?;
        *slot = target;
        self.notify(id, Self::node_target(target));
        Ok(())
    }

    // -- kind transitions --

    /// Moves `id` to kind `to`, keeping every attribute legal in both kinds.
    ///
    /// Fails unless the family lists `(from, to)` in its `change_allowed` table.
    pub fn change_kind(&mut self, id: F::Id, to: F::Kind) -> Result<(), ObjectError> {
        let from = self.kind(id);
        if from == to {
            return Ok(());
        }
        if !F::CLASS.change_allowed(from.index(), to.index()) {
            return Err(ObjectError::KindChange {
                class: F::CLASS.name,
                from: F::CLASS.kind_name(from.index()),
                to: F::CLASS.kind_name(to.index()),
            });
        }

        let shared = F::CLASS
            .mask(from.index())
            .intersect(F::CLASS.mask(to.index()));
        let old = &self.nodes[id].node;
        let mut fresh = F::new(to);
        for key in shared.iter() {
            if let (Some(dst), Some(src)) = (fresh.slot_mut(key), old.slot(key)) {
                if !assign(dst, src) {
                    return Err(ObjectError::ShapeMismatch {
                        kind: F::CLASS.kind_name(to.index()),
                        key,
                        expected: src.shape(),
                    });
                }
            }
        }
        self.nodes[id].node = fresh;
        Ok(())
    }

    // -- collector support --

    /// Every node handle stored in `id`'s reference attributes, in mask order.
    pub fn references(&self, id: F::Id) -> Vec<F::Id> {
        let node = &self.nodes[id].node;
        let mut out = Vec::new();
        for key in F::CLASS.mask(node.kind().index()).iter() {
            match node.slot(key) {
                Some(Value::Ref(Some(target))) => out.push(target),
                Some(Value::Refs(list)) => out.extend_from_slice(list),
                _ => {}
            }
        }
        out
    }

    pub(crate) fn compact(&mut self, live: &[bool]) -> Vec<Option<F::Id>> {
        let forward = self.nodes.compact(live);
        for (_, entry) in self.nodes.iter_mut() {
            let node = &mut entry.node;
            for key in F::CLASS.mask(node.kind().index()).iter() {
                match node.slot_mut(key) {
                    Some(SlotMut::Ref(slot)) => {
                        *slot = slot.and_then(|old| forward[old.as_raw() as usize]);
                    }
                    Some(SlotMut::Refs(list)) => {
                        list.retain_mut(|old| match forward[old.as_raw() as usize] {
                            Some(new) => {
                                *old = new;
                                true
                            }
                            None => false,
                        });
                    }
                    _ => {}
                }
            }
        }
        forward
    }
}
