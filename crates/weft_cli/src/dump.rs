//! The `weft dump` command.

use std::error::Error;
use std::io::Write;

use weft_common::Interner;
use weft_netlist::{DumpOptions, Netlist};
use weft_object::ImageReader;

use crate::{DumpArgs, GlobalArgs};

/// Reads the e-node image at `args.image` and prints its netlist.
pub fn run(
    args: &DumpArgs,
    global: &GlobalArgs,
    out: &mut impl Write,
) -> Result<i32, Box<dyn Error>> {
    let verify = global.config.image.verify_checksum && !args.no_verify;
    let mut reader = ImageReader::open(&args.image)?.verify_checksum(verify);

    let interner = Interner::new();
    let mut net = Netlist::new();
    let root = net.read(&mut reader, &interner)?;
    tracing::debug!(path = %args.image.display(), nodes = net.len(), "loaded netlist");

    let opts = DumpOptions {
        indent: global.config.dump.indent,
        show_locations: global.config.dump.show_locations || args.locations,
    };
    net.dump(root, &interner, opts, &mut *out)?;
    out.flush()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use weft_common::{FileId, Loc};
    use weft_config::WeftConfig;
    use weft_netlist::EKind;
    use weft_object::ImageWriter;

    fn write_image(path: &Path) -> Vec<u8> {
        let interner = Interner::new();
        let mut net = Netlist::new();
        let root = net.alloc(EKind::Root);
        net.set_ident(root, interner.get_or_intern("WORK.TOP.elab"));
        let top = net.alloc(EKind::Scope);
        net.set_instance(top, interner.get_or_intern("TOP"));
        net.set_path(top, interner.get_or_intern(":top"));
        net.set_loc(top, Loc::new(FileId::from_raw(0), 3, 1, 6));
        net.add_scope(root, top);
        let mut writer = ImageWriter::create(path).unwrap();
        net.write(root, &mut writer, &interner).unwrap();

        let mut expected = Vec::new();
        net.dump(root, &interner, DumpOptions::default(), &mut expected)
            .unwrap();
        expected
    }

    fn args(image: PathBuf) -> DumpArgs {
        DumpArgs {
            image,
            locations: false,
            no_verify: false,
        }
    }

    #[test]
    fn dumps_reloaded_netlist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.elab");
        let expected = write_image(&path);

        let global = GlobalArgs {
            config: WeftConfig::default(),
        };
        let mut out = Vec::new();
        assert_eq!(run(&args(path), &global, &mut out).unwrap(), 0);
        assert_eq!(out, expected);
    }

    #[test]
    fn location_flag_adds_locations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.elab");
        let plain = write_image(&path);

        let global = GlobalArgs {
            config: WeftConfig::default(),
        };
        let mut out = Vec::new();
        let mut with_locs = args(path);
        with_locs.locations = true;
        run(&with_locs, &global, &mut out).unwrap();
        assert_ne!(out, plain);
        assert!(String::from_utf8(out).unwrap().contains(" @ "));
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.elab");
        write_image(&path);
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(&path, &bytes).unwrap();

        let global = GlobalArgs {
            config: WeftConfig::default(),
        };
        let err = run(&args(path), &global, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"), "{err}");
    }
}
