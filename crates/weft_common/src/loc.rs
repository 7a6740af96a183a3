//! Source locations carried by every node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a source file owned by the front end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// File reference used for compiler-generated nodes.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A line/column extent within one source file.
///
/// Lines and columns are 1-indexed; the deltas give the extent relative to the
/// first position. Images store every field verbatim so a reloaded node reports
/// exactly the location it was written with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Loc {
    /// The file this location points into.
    pub file: FileId,
    /// First line of the extent.
    pub first_line: u32,
    /// First column of the extent.
    pub first_column: u16,
    /// Number of lines spanned after `first_line`.
    pub line_delta: u16,
    /// Column offset of the end position relative to `first_column`.
    pub column_delta: u16,
}

impl Loc {
    /// Location of nodes that have no source counterpart.
    pub const INVALID: Loc = Loc {
        file: FileId::DUMMY,
        first_line: 0,
        first_column: 0,
        line_delta: 0,
        column_delta: 0,
    };

    /// Creates a location covering a single line.
    pub fn new(file: FileId, line: u32, column: u16, width: u16) -> Self {
        Self {
            file,
            first_line: line,
            first_column: column,
            line_delta: 0,
            column_delta: width,
        }
    }

    /// Returns `true` for [`Loc::INVALID`] and other synthetic locations.
    pub fn is_invalid(&self) -> bool {
        self.file == FileId::DUMMY
    }
}

impl Default for Loc {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            return f.write_str("<invalid>");
        }
        write!(
            f,
            "file{}:{}:{}",
            self.file.as_raw(),
            self.first_line,
            self.first_column
        )
    }
}
