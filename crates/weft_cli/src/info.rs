//! The `weft info` command.

use std::error::Error;
use std::io::Write;

use weft_object::ImageReader;

use crate::{GlobalArgs, InfoArgs};

/// Prints the frame header of the first image in `args.image`.
pub fn run(
    args: &InfoArgs,
    global: &GlobalArgs,
    out: &mut impl Write,
) -> Result<i32, Box<dyn Error>> {
    let mut reader =
        ImageReader::open(&args.image)?.verify_checksum(global.config.image.verify_checksum);
    let header = reader.read_header()?;
    tracing::debug!(path = %args.image.display(), records = header.records, "read image header");

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&header)?)?;
    } else {
        writeln!(out, "image:    {}", args.image.display())?;
        writeln!(out, "family:   {}", header.tag)?;
        writeln!(out, "version:  {}", header.format_version)?;
        writeln!(out, "records:  {}", header.records)?;
        writeln!(out, "payload:  {} bytes", header.payload_len)?;
        writeln!(out, "checksum: {}", header.checksum)?;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use weft_common::Interner;
    use weft_config::WeftConfig;
    use weft_netlist::{EKind, Netlist};
    use weft_object::ImageWriter;

    fn write_image(path: &Path) {
        let interner = Interner::new();
        let mut net = Netlist::new();
        let root = net.alloc(EKind::Root);
        net.set_ident(root, interner.get_or_intern("WORK.TOP.elab"));
        let top = net.alloc(EKind::Scope);
        net.set_instance(top, interner.get_or_intern("TOP"));
        net.set_path(top, interner.get_or_intern(":top"));
        net.add_scope(root, top);
        let mut writer = ImageWriter::create(path).unwrap();
        net.write(root, &mut writer, &interner).unwrap();
    }

    fn global() -> GlobalArgs {
        GlobalArgs {
            config: WeftConfig::default(),
        }
    }

    #[test]
    fn prints_text_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.elab");
        write_image(&path);

        let args = InfoArgs {
            image: path,
            json: false,
        };
        let mut out = Vec::new();
        assert_eq!(run(&args, &global(), &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("family:   e-node\n"), "{text}");
        assert!(text.contains("records:  2\n"), "{text}");
    }

    #[test]
    fn prints_json_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.elab");
        write_image(&path);

        let args = InfoArgs {
            image: path,
            json: true,
        };
        let mut out = Vec::new();
        run(&args, &global(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["records"], 2);
        assert_eq!(value["format_version"], weft_object::IMAGE_FORMAT_VERSION);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = InfoArgs {
            image: dir.path().join("absent.elab"),
            json: false,
        };
        assert!(run(&args, &global(), &mut Vec::new()).is_err());
    }
}
