//! The elaborated-design node family.
//!
//! An elaborated design is a graph of e-nodes: a [`EKind::Root`] owning scopes
//! and the global nexus list, scopes owning signals and processes, and
//! nexuses tying signal bit ranges to the processes that drive them. The
//! nodes live in a [`Netlist`]; [`Netlist::split_nexus`] is the surgery
//! elaboration performs when a driver set must be partitioned.

#![warn(missing_docs)]

pub mod dump;
pub mod kind;
pub mod netlist;
pub mod node;
mod split;

pub use dump::DumpOptions;
pub use kind::{EFlags, EKind, E_NODE_CLASS, NEXUS_POS_INVALID};
pub use netlist::Netlist;
pub use node::{ENode, ENodeId};
