//! Persisted node images.
//!
//! An image holds one node graph of a single family. Encoding runs in two
//! passes: nodes reachable from the root are numbered breadth-first (the root
//! is record 0, a node reached twice keeps its first number), then every node
//! becomes a flat record whose references are those numbers and whose
//! identifiers index a deduplicated string table. Decoding allocates all
//! records before resolving any reference, so cycles and sharing come back
//! exactly as written.
//!
//! On the wire an image is a 4-byte little-endian header length, a bincode
//! [`ImageHeader`], then the bincode payload. The header carries the payload
//! length, so several images (of different families) can follow each other
//! in one stream.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use weft_common::{ContentHash, Ident, Interner, Loc};

use crate::arena::ArenaId;
use crate::class::ObjectTag;
use crate::error::ImageError;
use crate::family::{Family, Kind};
use crate::store::Store;
use crate::value::{ForeignRef, SlotMut, TypeRef, Value};

/// Magic bytes identifying a weft image.
const IMAGE_MAGIC: [u8; 4] = *b"WEFT";

/// Current image format version. Increment on breaking layout changes.
pub const IMAGE_FORMAT_VERSION: u32 = 1;

/// Header preceding every image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHeader {
    /// Must be `b"WEFT"`.
    pub magic: [u8; 4],
    /// Format version of the payload.
    pub format_version: u32,
    /// Node family stored in the payload.
    pub tag: ObjectTag,
    /// Number of node records.
    pub records: u32,
    /// Payload length in bytes.
    pub payload_len: u64,
    /// XXH3 digest of the payload.
    pub checksum: ContentHash,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    strings: Vec<String>,
    records: Vec<Record>,
}

#[derive(Serialize, Deserialize)]
struct Record {
    kind: u16,
    loc: Loc,
    /// One item per legal attribute, in mask order.
    items: Vec<Item>,
}

#[derive(Serialize, Deserialize)]
enum Item {
    Ident(Option<u32>),
    Int(u32),
    Ref(Option<u32>),
    Refs(Vec<u32>),
    Idents(Vec<u32>),
    Type(Option<TypeRef>),
    Foreign(Option<ForeignRef>),
}

/// Deduplicating string table built while encoding.
#[derive(Default)]
struct StringTable {
    strings: Vec<String>,
    index: HashMap<Ident, u32>,
}

impl StringTable {
    fn insert(&mut self, interner: &Interner, ident: Ident) -> Result<u32, ImageError> {
        if let Some(&i) = self.index.get(&ident) {
            return Ok(i);
        }
        let text = interner
            .try_resolve(ident)
            .ok_or(ImageError::UnknownIdent {
                raw: ident.as_raw(),
            })?;
        let i = self.strings.len() as u32;
        self.strings.push(text.to_string());
        self.index.insert(ident, i);
        Ok(i)
    }
}

/// Breadth-first numbering of every node reachable from `root`.
fn number_nodes<F: Family>(store: &Store<F>, root: F::Id) -> (Vec<F::Id>, HashMap<F::Id, u32>) {
    let mut order = vec![root];
    let mut seq = HashMap::from([(root, 0u32)]);
    let mut cursor = 0;
    while cursor < order.len() {
        for target in store.references(order[cursor]) {
            if !seq.contains_key(&target) {
                seq.insert(target, order.len() as u32);
                order.push(target);
            }
        }
        cursor += 1;
    }
    (order, seq)
}

fn encode_payload<F: Family>(
    store: &Store<F>,
    root: F::Id,
    interner: &Interner,
) -> Result<Payload, ImageError> {
    let (order, seq) = number_nodes(store, root);
    let number = |id: F::Id| -> u32 { seq.get(&id).copied().unwrap_or(u32::MAX) };

    let mut strings = StringTable::default();
    let mut records = Vec::with_capacity(order.len());
    for &id in &order {
        let kind = store.kind(id).index();
        let mut items = Vec::new();
        for key in F::CLASS.mask(kind).iter() {
            let item = match store.lookup(id, key)? {
                Value::Ident(ident) => {
                    Item::Ident(ident.map(|i| strings.insert(interner, i)).transpose()?)
                }
                Value::Int(v) => Item::Int(v),
                Value::Ref(target) => Item::Ref(target.map(number)),
                Value::Refs(list) => Item::Refs(list.iter().map(|t| number(*t)).collect()),
                Value::Idents(list) => Item::Idents(
                    list.iter()
                        .map(|i| strings.insert(interner, *i))
                        .collect::<Result<_, _>>()?,
                ),
                Value::Type(ty) => Item::Type(ty),
                Value::Foreign(target) => Item::Foreign(target),
            };
            items.push(item);
        }
        records.push(Record {
            kind,
            loc: *store.loc(id),
            items,
        });
    }

    Ok(Payload {
        strings: strings.strings,
        records,
    })
}

/// Streaming sink for images, associated with a file name for diagnostics.
pub struct ImageWriter<W: Write> {
    name: PathBuf,
    inner: W,
}

impl ImageWriter<BufWriter<File>> {
    /// Creates (or truncates) `path` and writes images into it.
    pub fn create(path: &Path) -> Result<Self, ImageError> {
        let file = File::create(path).map_err(|e| ImageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(path, BufWriter::new(file)))
    }
}

impl<W: Write> ImageWriter<W> {
    /// Wraps an arbitrary stream; `name` only appears in error messages.
    pub fn new(name: impl Into<PathBuf>, inner: W) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Name associated with the stream.
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Unwraps the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn io(&self, source: io::Error) -> ImageError {
        ImageError::Io {
            path: self.name.clone(),
            source,
        }
    }

    /// Writes `root` and everything reachable from it as one image.
    pub fn write<F: Family>(
        &mut self,
        store: &Store<F>,
        root: F::Id,
        interner: &Interner,
    ) -> Result<ImageHeader, ImageError> {
        let payload = encode_payload(store, root, interner)?;
        let records = payload.records.len() as u32;
        let bytes = bincode::serde::encode_to_vec(&payload, bincode::config::standard())
            .map_err(|e| ImageError::Serialization {
                reason: e.to_string(),
            })?;

        let header = ImageHeader {
            magic: IMAGE_MAGIC,
            format_version: IMAGE_FORMAT_VERSION,
            tag: F::CLASS.tag,
            records,
            payload_len: bytes.len() as u64,
            checksum: ContentHash::from_bytes(&bytes),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| ImageError::Serialization {
                reason: e.to_string(),
            })?;

        if let Err(e) = write_frame(&mut self.inner, &header_bytes, &bytes) {
            return Err(self.io(e));
        }

        tracing::debug!(
            path = %self.name.display(),
            tag = %header.tag,
            records,
            bytes = bytes.len(),
            "wrote node image"
        );
        Ok(header)
    }
}

fn write_frame(out: &mut impl Write, header: &[u8], payload: &[u8]) -> io::Result<()> {
    out.write_all(&(header.len() as u32).to_le_bytes())?;
    out.write_all(header)?;
    out.write_all(payload)?;
    out.flush()
}

/// Streaming source of images, associated with a file name for diagnostics.
pub struct ImageReader<R: Read> {
    name: PathBuf,
    inner: R,
    verify_checksum: bool,
}

impl ImageReader<BufReader<File>> {
    /// Opens `path` for reading.
    pub fn open(path: &Path) -> Result<Self, ImageError> {
        let file = File::open(path).map_err(|e| ImageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: Read> ImageReader<R> {
    /// Wraps an arbitrary stream; `name` only appears in error messages.
    pub fn new(name: impl Into<PathBuf>, inner: R) -> Self {
        Self {
            name: name.into(),
            inner,
            verify_checksum: true,
        }
    }

    /// Enables or disables payload checksum verification (on by default).
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Name associated with the stream.
    pub fn name(&self) -> &Path {
        &self.name
    }

    fn io(&self, source: io::Error) -> ImageError {
        ImageError::Io {
            path: self.name.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> ImageError {
        ImageError::Corrupt {
            path: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Reads a `len`-byte section declared by the frame. The buffer grows with
    /// the bytes actually present, so a bogus length cannot force a huge
    /// allocation up front.
    fn read_section(&mut self, what: &str, len: u64) -> Result<Vec<u8>, ImageError> {
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(len).read_to_end(&mut buf);
        read.map_err(|e| self.io(e))?;
        if buf.len() as u64 != len {
            return Err(self.corrupt(format!(
                "{what} declares {len} bytes but only {} remain",
                buf.len()
            )));
        }
        Ok(buf)
    }

    /// Reads one header and its payload, validating magic, version and checksum.
    fn read_raw(&mut self) -> Result<(ImageHeader, Vec<u8>), ImageError> {
        let mut len_bytes = [0u8; 4];
        self.inner
            .read_exact(&mut len_bytes)
            .map_err(|e| self.io(e))?;
        let header_len = u32::from_le_bytes(len_bytes);
        let header_bytes = self.read_section("header", u64::from(header_len))?;
        let header: ImageHeader =
            bincode::serde::decode_from_slice(&header_bytes, bincode::config::standard())
                .map_err(|_| ImageError::BadMagic {
                    path: self.name.clone(),
                })?
                .0;

        if header.magic != IMAGE_MAGIC {
            return Err(ImageError::BadMagic {
                path: self.name.clone(),
            });
        }
        if header.format_version != IMAGE_FORMAT_VERSION {
            return Err(ImageError::VersionMismatch {
                path: self.name.clone(),
                expected: IMAGE_FORMAT_VERSION,
                actual: header.format_version,
            });
        }

        let payload = self.read_section("payload", header.payload_len)?;

        if self.verify_checksum {
            let actual = ContentHash::from_bytes(&payload);
            if actual != header.checksum {
                return Err(ImageError::ChecksumMismatch {
                    path: self.name.clone(),
                    expected: header.checksum.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok((header, payload))
    }

    /// Reads the next image's header, skipping over its payload.
    pub fn read_header(&mut self) -> Result<ImageHeader, ImageError> {
        self.read_raw().map(|(header, _)| header)
    }

    /// Reads the next image into `store`, returning the handle of its root.
    ///
    /// Identifiers are re-interned through `interner`. On error, nodes already
    /// allocated stay in the store unreferenced; the next collection drops them.
    pub fn read<F: Family>(
        &mut self,
        store: &mut Store<F>,
        interner: &Interner,
    ) -> Result<F::Id, ImageError> {
        let (header, bytes) = self.read_raw()?;
        if header.tag != F::CLASS.tag {
            return Err(ImageError::TagMismatch {
                path: self.name.clone(),
                expected: F::CLASS.tag,
                actual: header.tag,
            });
        }

        let payload: Payload =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
                .map_err(|e| ImageError::Serialization {
                    reason: e.to_string(),
                })?
                .0;
        if payload.records.is_empty() {
            return Err(self.corrupt("image has no root record"));
        }

        let idents: Vec<Ident> = payload
            .strings
            .iter()
            .map(|s| interner.get_or_intern(s))
            .collect();

        // First pass: allocate every record so references can resolve forward.
        let mut ids = Vec::with_capacity(payload.records.len());
        for record in &payload.records {
            let kind = F::Kind::from_index(record.kind).ok_or_else(|| {
                self.corrupt(format!("unknown {} kind {}", F::CLASS.name, record.kind))
            })?;
            ids.push(store.alloc_node(record.loc, F::new(kind)));
        }

        // Second pass: fill attributes.
        for (record, &id) in payload.records.iter().zip(&ids) {
            let mask = F::CLASS.mask(record.kind);
            if mask.len() != record.items.len() {
                return Err(self.corrupt(format!(
                    "{} record has {} attributes, expected {}",
                    F::CLASS.kind_name(record.kind),
                    record.items.len(),
                    mask.len()
                )));
            }
            for (key, item) in mask.iter().zip(&record.items) {
                let resolved = fill_slot(store.lookup_mut(id, key)?, item, &ids, &idents);
                if !resolved {
                    return Err(self.corrupt(format!(
                        "bad {key} in {} record",
                        F::CLASS.kind_name(record.kind)
                    )));
                }
            }
        }

        tracing::debug!(
            path = %self.name.display(),
            tag = %header.tag,
            records = ids.len(),
            "read node image"
        );
        Ok(ids[0])
    }
}

/// Stores a decoded item into a slot. Returns `false` on shape mismatch or a
/// dangling record/string number.
fn fill_slot<I: ArenaId>(slot: SlotMut<'_, I>, item: &Item, ids: &[I], idents: &[Ident]) -> bool {
    let node = |n: &u32| ids.get(*n as usize).copied();
    let ident = |n: &u32| idents.get(*n as usize).copied();
    match (slot, item) {
        (SlotMut::Ident(dst), Item::Ident(src)) => match src {
            Some(n) => match ident(n) {
                Some(i) => *dst = Some(i),
                None => return false,
            },
            None => *dst = None,
        },
        (SlotMut::Int(dst), Item::Int(src)) => *dst = *src,
        (SlotMut::Ref(dst), Item::Ref(src)) => match src {
            Some(n) => match node(n) {
                Some(target) => *dst = Some(target),
                None => return false,
            },
            None => *dst = None,
        },
        (SlotMut::Refs(dst), Item::Refs(src)) => {
            match src.iter().map(node).collect::<Option<Vec<_>>>() {
                Some(list) => *dst = list,
                None => return false,
            }
        }
        (SlotMut::Idents(dst), Item::Idents(src)) => {
            match src.iter().map(ident).collect::<Option<Vec<_>>>() {
                Some(list) => *dst = list,
                None => return false,
            }
        }
        (SlotMut::Type(dst), Item::Type(src)) => *dst = *src,
        (SlotMut::Foreign(dst), Item::Foreign(src)) => *dst = *src,
        _ => return false,
    }
    true
}
