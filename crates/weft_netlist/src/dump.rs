//! Human-readable tree printer for debugging elaborated designs.
//!
//! The walk visits a root's dependencies, nexuses and scopes, a scope's
//! signals, sub-scopes and processes, and prints each node on its own
//! indented line. The text is for people; nothing parses it.

use std::io::{self, Write};

use weft_common::{Ident, Interner};

use crate::kind::{EFlags, EKind};
use crate::netlist::Netlist;
use crate::node::ENodeId;

/// Presentation knobs for [`Netlist::dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Spaces added per nesting level.
    pub indent: usize,
    /// Append source locations to scope, signal and process lines.
    pub show_locations: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            show_locations: false,
        }
    }
}

struct Printer<'a, W> {
    net: &'a Netlist,
    interner: &'a Interner,
    opts: DumpOptions,
    out: W,
}

fn name(interner: &Interner, ident: Ident) -> &str {
    interner.try_resolve(ident).unwrap_or("<?>")
}

impl<W: Write> Printer<'_, W> {
    fn pad(&mut self, depth: usize) -> io::Result<()> {
        write!(self.out, "{:width$}", "", width = depth * self.opts.indent)
    }

    fn loc_suffix(&mut self, e: ENodeId) -> io::Result<()> {
        let net = self.net;
        let loc = net.loc(e);
        if self.opts.show_locations && !loc.is_invalid() {
            write!(self.out, " @ {loc}")?;
        }
        Ok(())
    }

    fn node(&mut self, e: ENodeId, depth: usize) -> io::Result<()> {
        self.pad(depth)?;
        match self.net.kind(e) {
            EKind::Root => self.root(e, depth),
            EKind::Scope => self.scope(e, depth),
            EKind::Process => self.process(e, depth),
            EKind::Signal => self.signal(e, depth),
            EKind::Nexus => self.nexus(e, depth),
            kind => panic!("cannot dump e-node kind {kind}"),
        }
    }

    fn root(&mut self, e: ENodeId, depth: usize) -> io::Result<()> {
        let (net, i) = (self.net, self.interner);
        writeln!(self.out, "root {}", name(i, net.ident(e)))?;
        self.pad(depth + 1)?;
        writeln!(self.out, "dependencies")?;
        for &dep in net.deps(e) {
            self.pad(depth + 2)?;
            writeln!(self.out, "{}", name(i, dep))?;
        }
        for &n in net.nexuses(e) {
            self.node(n, depth + 1)?;
        }
        for &s in net.scopes(e) {
            self.node(s, depth + 1)?;
        }
        Ok(())
    }

    fn scope(&mut self, e: ENodeId, depth: usize) -> io::Result<()> {
        let (net, i) = (self.net, self.interner);
        write!(self.out, "scope {}", name(i, net.instance(e)))?;
        self.loc_suffix(e)?;
        writeln!(self.out)?;
        for &s in net.signals(e) {
            self.node(s, depth + 1)?;
        }
        for &s in net.scopes(e) {
            self.node(s, depth + 1)?;
        }
        for &p in net.procs(e) {
            self.node(p, depth + 1)?;
        }
        Ok(())
    }

    fn process(&mut self, e: ENodeId, depth: usize) -> io::Result<()> {
        let (net, i) = (self.net, self.interner);
        write!(self.out, "process {}", name(i, net.ident(e)))?;
        if net.flags(e).contains(EFlags::POSTPONED) {
            write!(self.out, " postponed")?;
        }
        self.loc_suffix(e)?;
        writeln!(self.out)?;

        self.pad(depth + 1)?;
        writeln!(self.out, "vcode {}", name(i, net.vcode(e)))?;
        for &n in net.nexuses(e) {
            self.pad(depth + 1)?;
            write!(self.out, "drives {}", name(i, net.ident(n)))?;
            if net.has_pos(n) {
                write!(self.out, " id {}", net.pos(n))?;
            }
            writeln!(self.out, " width {}", net.width(n))?;
        }
        Ok(())
    }

    fn signal(&mut self, e: ENodeId, depth: usize) -> io::Result<()> {
        let (net, i) = (self.net, self.interner);
        let width = net.width(e);
        write!(self.out, "signal {} width {width}", name(i, net.ident(e)))?;
        let flags = net.flags(e);
        if flags.contains(EFlags::LAST_VALUE) {
            write!(self.out, " last-value")?;
        }
        if !flags.contains(EFlags::CONTIGUOUS) {
            write!(self.out, " non-contiguous")?;
        }
        self.loc_suffix(e)?;

        // A single nexus spanning a plain signal goes on the same line.
        let pieces = net.nexuses(e);
        let inline = pieces.len() == 1 && flags.is_empty();
        if inline {
            write!(self.out, " ")?;
        } else {
            writeln!(self.out)?;
        }
        for &n in pieces {
            if !inline {
                self.pad(depth + 1)?;
            }
            let is_nexus = net.kind(n) == EKind::Nexus;
            if is_nexus {
                write!(self.out, "nexus {}", name(i, net.ident(n)))?;
            } else {
                write!(self.out, "padding")?;
            }
            if !inline || net.width(n) != width {
                if is_nexus && net.has_pos(n) {
                    write!(self.out, " id {}", net.pos(n))?;
                }
                write!(self.out, " width {} size {}", net.width(n), net.size(n))?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn nexus(&mut self, e: ENodeId, depth: usize) -> io::Result<()> {
        let (net, i) = (self.net, self.interner);
        write!(self.out, "nexus {}", name(i, net.ident(e)))?;
        if net.has_pos(e) {
            write!(self.out, " id {}", net.pos(e))?;
        }
        writeln!(self.out, " width {} size {}", net.width(e), net.size(e))?;

        for &s in net.signals(e) {
            self.pad(depth + 1)?;
            writeln!(self.out, "signal {}", name(i, net.path(s)))?;
        }
        for &s in net.sources(e) {
            self.pad(depth + 1)?;
            let role = match net.kind(s) {
                EKind::Signal => "port",
                EKind::Process => "driver",
                kind => panic!("unexpected source kind {kind}"),
            };
            writeln!(self.out, "{role} {}", name(i, net.path(s)))?;
        }
        Ok(())
    }
}

impl Netlist {
    /// Prints `e` and everything below it as an indented tree.
    ///
    /// # Panics
    ///
    /// Panics on a padding node at the top of the walk, on a nexus source
    /// that is neither a signal nor a process, and on any unset mandatory
    /// attribute met along the way.
    pub fn dump<W: Write>(
        &self,
        e: ENodeId,
        interner: &Interner,
        opts: DumpOptions,
        out: W,
    ) -> io::Result<()> {
        let mut printer = Printer {
            net: self,
            interner,
            opts,
            out,
        };
        printer.node(e, 0)?;
        writeln!(printer.out)?;
        printer.out.flush()
    }
}
