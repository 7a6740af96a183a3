//! End-to-end netlist workflows: build a design, split nexuses, persist the
//! image to disk and reload it in a fresh netlist.

use tempfile::TempDir;
use weft_common::{FileId, Interner, Loc};
use weft_netlist::{DumpOptions, EFlags, EKind, ENodeId, Netlist};
use weft_object::{AttrKey, ImageError, ImageReader, ImageWriter, ObjectTag, TypeRef};
use weft_psl::PslNode;

// ---------------------------------------------------------------------------
// Helper: the single-signal design most tests start from
// ---------------------------------------------------------------------------

struct Design {
    net: Netlist,
    root: ENodeId,
    top: ENodeId,
    sig: ENodeId,
    n0: ENodeId,
}

fn build(interner: &Interner) -> Design {
    let mut net = Netlist::new();
    let root = net.alloc(EKind::Root);
    net.set_ident(root, interner.get_or_intern("WORK.TOP.elab"));

    let top = net.alloc(EKind::Scope);
    net.set_instance(top, interner.get_or_intern("TOP"));
    net.set_path(top, interner.get_or_intern(":top"));
    net.add_scope(root, top);

    let sig = net.alloc(EKind::Signal);
    net.set_ident(sig, interner.get_or_intern("x"));
    net.set_path(sig, interner.get_or_intern(":top:x"));
    net.set_width(sig, 8);
    net.set_type(sig, TypeRef::from_raw(42));
    net.set_loc(sig, Loc::new(FileId::from_raw(0), 12, 5, 1));
    net.add_signal(top, sig);

    let n0 = net.alloc(EKind::Nexus);
    net.set_ident(n0, interner.get_or_intern("x"));
    net.set_width(n0, 8);
    net.set_size(n0, 1);
    net.add_signal(n0, sig);
    net.add_nexus(sig, n0);
    net.add_nexus(root, n0);

    Design {
        net,
        root,
        top,
        sig,
        n0,
    }
}

// ---------------------------------------------------------------------------
// Nexus splitting
// ---------------------------------------------------------------------------

#[test]
fn split_single_signal_nexus() {
    let interner = Interner::new();
    let Design {
        mut net,
        root,
        sig,
        n0,
        ..
    } = build(&interner);

    let n1 = net.split_nexus(root, n0, 3);

    assert_eq!(net.width(n0), 3);
    assert_eq!(net.width(n1), 5);
    assert_eq!(net.nexuses(sig), &[n0, n1]);
    assert_eq!(net.nexuses(root), &[n0, n1]);
    assert_eq!(net.signals(n1), &[sig]);
}

#[test]
fn split_nexus_without_identifiers() {
    let interner = Interner::new();
    let mut net = Netlist::new();
    let r = net.alloc(EKind::Root);
    let top = net.alloc(EKind::Scope);
    net.set_instance(top, interner.get_or_intern("TOP"));
    net.add_scope(r, top);
    let sig = net.alloc(EKind::Signal);
    net.set_ident(sig, interner.get_or_intern("x"));
    net.set_width(sig, 8);
    net.add_signal(top, sig);
    let n0 = net.alloc(EKind::Nexus);
    net.set_width(n0, 8);
    net.set_size(n0, 1);
    net.add_signal(n0, sig);
    net.add_nexus(sig, n0);
    net.add_nexus(r, n0);

    let n1 = net.split_nexus(r, n0, 3);

    assert_eq!(net.width(n0), 3);
    assert_eq!(net.width(n1), 5);
    assert_eq!(net.size(n1), 1);
    assert_eq!(net.nexuses(sig), &[n0, n1]);
    assert_eq!(net.nexuses(r), &[n0, n1]);
    assert!(net.store().ident_opt(n1, AttrKey::Ident).unwrap().is_none());
}

#[test]
fn split_with_driver_then_split_again() {
    let interner = Interner::new();
    let Design {
        mut net,
        root,
        top,
        sig,
        n0,
    } = build(&interner);

    let drv = net.alloc(EKind::Process);
    net.set_ident(drv, interner.get_or_intern("drv"));
    net.set_path(drv, interner.get_or_intern(":top:drv"));
    net.set_parent(drv, top);
    net.add_proc(top, drv);
    net.add_source(n0, drv);
    net.add_nexus(drv, n0);

    let n1 = net.split_nexus(root, n0, 2);
    let n2 = net.split_nexus(root, n1, 4);

    assert_eq!(net.nexuses(root), &[n0, n1, n2]);
    assert_eq!(net.nexuses(sig), &[n0, n1, n2]);
    assert_eq!(
        [n0, n1, n2].map(|n| net.width(n)),
        [2, 4, 2],
        "widths must partition the signal"
    );
    assert_eq!(net.nexuses(drv), &[n0, n1, n2]);
    for n in [n1, n2] {
        assert_eq!(net.sources(n), &[drv]);
    }
}

#[test]
fn unset_parent_is_reported_not_assumed() {
    let interner = Interner::new();
    let Design { mut net, .. } = build(&interner);
    let orphan = net.alloc(EKind::Process);
    assert!(!net.has_parent(orphan));
    let strict = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| net.parent(orphan)));
    assert!(strict.is_err());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn image_roundtrip_on_disk_preserves_structure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("WORK.TOP.elab");
    let interner = Interner::new();
    let Design {
        mut net,
        root,
        sig,
        n0,
        ..
    } = build(&interner);
    net.split_nexus(root, n0, 3);
    net.set_flag(sig, EFlags::CONTIGUOUS);

    let mut writer = ImageWriter::create(&path).unwrap();
    let header = net.write(root, &mut writer, &interner).unwrap();
    drop(writer);
    assert_eq!(header.tag, ObjectTag::ENode);
    assert_eq!(header.records as usize, net.len());

    let mut reloaded = Netlist::new();
    let mut reader = ImageReader::open(&path).unwrap();
    let root2 = reloaded.read(&mut reader, &interner).unwrap();

    assert_eq!(reloaded.len(), net.len());
    let top2 = reloaded.scopes(root2)[0];
    let sig2 = reloaded.signals(top2)[0];
    let nexus2 = reloaded.nexuses(root2).to_vec();
    assert_eq!(reloaded.nexuses(sig2), nexus2.as_slice());
    assert_eq!(
        nexus2.iter().map(|n| reloaded.width(*n)).collect::<Vec<_>>(),
        [3, 5]
    );
    for n in &nexus2 {
        assert_eq!(reloaded.signals(*n), &[sig2], "signal must stay shared");
    }
    assert_eq!(reloaded.ty(sig2), Some(TypeRef::from_raw(42)));
    assert_eq!(reloaded.loc(sig2), net.loc(sig));
    assert_eq!(reloaded.flags(sig2), EFlags::CONTIGUOUS);

    let opts = DumpOptions::default();
    let mut before = Vec::new();
    let mut after = Vec::new();
    net.dump(root, &interner, opts, &mut before).unwrap();
    reloaded.dump(root2, &interner, opts, &mut after).unwrap();
    assert_eq!(before, after);
}

#[test]
fn reading_an_e_node_image_as_the_wrong_family_fails() {
    let interner = Interner::new();
    let Design { net, root, .. } = build(&interner);
    let mut writer = ImageWriter::new("top.elab", Vec::new());
    net.write(root, &mut writer, &interner).unwrap();
    let bytes = writer.into_inner();

    let mut psl = weft_object::Store::<PslNode>::new();
    let err = ImageReader::new("top.elab", bytes.as_slice())
        .read(&mut psl, &interner)
        .unwrap_err();
    assert!(matches!(
        err,
        ImageError::TagMismatch {
            expected: ObjectTag::Psl,
            actual: ObjectTag::ENode,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[test]
fn collect_drops_nexus_pieces_nobody_links() {
    let interner = Interner::new();
    let Design {
        mut net,
        root,
        top,
        sig,
        ..
    } = build(&interner);
    let scratch = net.alloc(EKind::Nexus);
    net.set_width(scratch, 8);
    let stale = net.alloc(EKind::Scope);
    net.set_instance(stale, interner.get_or_intern("STALE"));
    net.add_scope(root, stale);

    let before = net.len();
    let reloc = net.collect();
    assert_eq!(reloc.reclaimed(), 1);
    assert!(reloc.is_reclaimed(scratch));
    assert_eq!(net.len(), before - 1);

    let root = reloc.get(root).unwrap();
    let top = reloc.get(top).unwrap();
    let sig = reloc.get(sig).unwrap();
    assert_eq!(net.scopes(root)[0], top);
    assert_eq!(net.signals(top), &[sig]);
    assert_eq!(net.width(net.nexuses(sig)[0]), 8);
}
