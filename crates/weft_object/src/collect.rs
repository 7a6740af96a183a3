//! Reachability-based reclamation of nodes within one [`Store`].
//!
//! Marking starts from every node whose kind is listed in the family's
//! `gc_roots` plus any roots the caller holds outside the store. Unmarked
//! nodes are dropped and survivors slide down in allocation order, so handles
//! held across a collection must be translated through the returned
//! [`Relocation`].

use crate::arena::ArenaId;
use crate::family::{Family, Kind};
use crate::store::Store;

/// Forwarding table produced by [`Store::collect`].
#[derive(Debug, Clone)]
pub struct Relocation<I> {
    forward: Vec<Option<I>>,
    live: usize,
}

impl<I: ArenaId> Relocation<I> {
    /// New handle of a pre-collection node, or `None` if it was reclaimed.
    pub fn get(&self, old: I) -> Option<I> {
        self.forward.get(old.as_raw() as usize).copied().flatten()
    }

    /// Returns `true` if `old` was reclaimed.
    pub fn is_reclaimed(&self, old: I) -> bool {
        self.get(old).is_none()
    }

    /// Number of surviving nodes.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of reclaimed nodes.
    pub fn reclaimed(&self) -> usize {
        self.forward.len() - self.live
    }
}

impl<F: Family> Store<F> {
    /// Marks every node reachable from a root kind or from `extra_roots`.
    pub fn reachable(&self, extra_roots: &[F::Id]) -> Vec<bool> {
        let mut marked = vec![false; self.len()];
        let mut work: Vec<F::Id> = self
            .ids()
            .filter(|id| F::CLASS.is_root(self.kind(*id).index()))
            .chain(extra_roots.iter().copied())
            .collect();

        while let Some(id) = work.pop() {
            let slot = &mut marked[id.as_raw() as usize];
            if *slot {
                continue;
            }
            *slot = true;
            work.extend(
                self.references(id)
                    .into_iter()
                    .filter(|r| !marked[r.as_raw() as usize]),
            );
        }
        marked
    }

    /// Reclaims every node unreachable from the roots and compacts the store.
    ///
    /// Must only run between passes: every handle held outside the store is
    /// invalidated and must be mapped through the returned [`Relocation`].
    pub fn collect(&mut self, extra_roots: &[F::Id]) -> Relocation<F::Id> {
        let marked = self.reachable(extra_roots);
        let live = marked.iter().filter(|m| **m).count();
        let before = self.len();
        let forward = self.compact(&marked);
        tracing::debug!(
            class = F::CLASS.name,
            before,
            live,
            reclaimed = before - live,
            "collected node store"
        );
        Relocation { forward, live }
    }
}
