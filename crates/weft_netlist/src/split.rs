//! Nexus splitting.

use weft_object::{AttrKey, OrFatal};

use crate::kind::EKind;
use crate::netlist::Netlist;
use crate::node::ENodeId;

impl Netlist {
    /// Splits nexus `orig` so that it keeps its first `width` elements and a
    /// new nexus takes the remainder. Returns the new nexus.
    ///
    /// The new nexus carries the name and element size of `orig` and is
    /// placed directly after it in the nexus list of `root` and of every
    /// signal overlapping `orig`, so bit ranges stay adjacent. Each of those
    /// signals is also recorded on the new nexus, and every driving process
    /// of `orig` drives the new nexus too.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not a root, `orig` is not a nexus, `width` is not
    /// strictly between zero and the width of `orig`, or a source of `orig`
    /// is not a process. Nothing is rolled back on panic.
    pub fn split_nexus(&mut self, root: ENodeId, orig: ENodeId, width: u32) -> ENodeId {
        assert_eq!(self.kind(root), EKind::Root, "split root must be E_ROOT");
        assert_eq!(self.kind(orig), EKind::Nexus, "split target must be E_NEXUS");
        let owidth = self.width(orig);
        assert!(
            width > 0 && width < owidth,
            "cannot split nexus of width {owidth} at {width}"
        );

        let new = self.alloc(EKind::Nexus);
        if let Some(ident) = self.store().ident_opt(orig, AttrKey::Ident).or_fatal() {
            self.set_ident(new, ident);
        }
        self.set_width(new, owidth - width);
        let size = self.size(orig);
        self.set_size(new, size);

        self.insert_nexus(root, orig, new);

        let signals = self.signals(orig).to_vec();
        for &signal in &signals {
            self.add_signal(new, signal);
            self.insert_nexus(signal, orig, new);
        }

        let sources = self.sources(orig).to_vec();
        for &source in &sources {
            let kind = self.kind(source);
            assert_eq!(
                kind,
                EKind::Process,
                "nexus source must be E_PROCESS when splitting, found {kind}"
            );
            self.add_source(new, source);
            self.add_nexus(source, new);
        }

        self.set_width(orig, width);

        tracing::debug!(
            orig = orig.as_raw(),
            new = new.as_raw(),
            width,
            remainder = owidth - width,
            signals = signals.len(),
            sources = sources.len(),
            "split nexus"
        );
        new
    }
}
