//! Write-barrier hook for incremental and generational collectors.
//!
//! The store calls [`WriteBarrier::record`] exactly once for every call that
//! stores a node or foreign reference into an attribute.

use crate::value::ObjectRef;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives one notification per reference-attribute mutation.
pub trait WriteBarrier {
    /// `writer` now refers to `target`.
    fn record(&mut self, writer: ObjectRef, target: ObjectRef);
}

/// Barrier that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBarrier;

impl WriteBarrier for NoBarrier {
    fn record(&mut self, _writer: ObjectRef, _target: ObjectRef) {}
}

/// Barrier that remembers every `(writer, target)` edge.
///
/// Clones share one log, so a caller can keep a handle after installing the
/// barrier in a store and read the remembered set later.
#[derive(Debug, Default, Clone)]
pub struct BarrierLog {
    edges: Rc<RefCell<Vec<(ObjectRef, ObjectRef)>>>,
}

impl BarrierLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded edges in notification order.
    pub fn edges(&self) -> Vec<(ObjectRef, ObjectRef)> {
        self.edges.borrow().clone()
    }

    /// Number of notifications received.
    pub fn len(&self) -> usize {
        self.edges.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.edges.borrow().is_empty()
    }

    /// Empties the remembered set, e.g. after a collection.
    pub fn clear(&self) {
        self.edges.borrow_mut().clear();
    }
}

impl WriteBarrier for BarrierLog {
    fn record(&mut self, writer: ObjectRef, target: ObjectRef) {
        self.edges.borrow_mut().push((writer, target));
    }
}
