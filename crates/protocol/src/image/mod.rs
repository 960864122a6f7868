//! Image sources and their destinations on the controller.
//!
//! This module turns a hex-literal text file into the raw bytes that are uploaded. It provides:
//! 1. **Decoding:** [`ImageBlob::decode`] extracts every `0x..` literal in source order.
//!    Sources are matched as raw bytes, so comments in any encoding are skipped.
//! 2. **Chunking:** [`ImageBlob::chunks`] yields the paced upload units.
//! 3. **Geometry:** [`Panel`] frame sizes for the supported displays.
//! 4. **Addressing:** [`Sector`] identifiers for the flash region that receives an image.

use std::fs;
use std::path::Path;
use std::slice;
use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::common::{CHUNK_SIZE, ImageError};

/// Display panel geometry.
pub mod panel;
/// Flash sector identifiers.
pub mod sector;

pub use panel::Panel;
pub use sector::Sector;

/// A hex byte literal: `0x` followed by one or more hex digits of either case.
#[allow(clippy::expect_used)]
static HEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x([0-9a-fA-F]+)").expect("hex literal pattern compiles"));

/// Raw image bytes, in the order their literals appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBlob {
    bytes: Vec<u8>,
}

impl ImageBlob {
    /// Decodes every hex literal in `source` into one byte.
    ///
    /// Text that is not part of a literal (braces, commas, comments, declarations) is
    /// ignored, whatever its encoding. A source without literals decodes to an empty blob.
    ///
    /// # Arguments
    ///
    /// * `source` - Source text, typically a C array initializer.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::LiteralOutOfRange`] for a literal above `0xff`.
    pub fn decode<S: AsRef<[u8]>>(source: S) -> Result<Self, ImageError> {
        let bytes = HEX_LITERAL
            .captures_iter(source.as_ref())
            .enumerate()
            .map(|(index, caps)| {
                parse_literal(&caps[1]).ok_or_else(|| ImageError::LiteralOutOfRange {
                    literal: String::from_utf8_lossy(&caps[0]).into_owned(),
                    index,
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self { bytes })
    }

    /// Reads and decodes an image source file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the hex-literal text file.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Read`] when the file cannot be read and
    /// [`ImageError::LiteralOutOfRange`] when a literal does not fit a byte.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let source = fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let blob = Self::decode(&source)?;
        if blob.is_empty() {
            warn!(source = %path.display(), "no hex literals found; image is empty");
        } else {
            debug!(source = %path.display(), bytes = blob.len(), "image decoded");
        }
        Ok(blob)
    }

    /// Returns the decoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the blob and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of bytes in the blob.
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when no literal was decoded.
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consecutive upload chunks of [`CHUNK_SIZE`] bytes; the last may be shorter.
    pub fn chunks(&self) -> slice::Chunks<'_, u8> {
        self.bytes.chunks(CHUNK_SIZE)
    }

    /// Number of chunks an upload of this blob sends.
    pub const fn chunk_count(&self) -> usize {
        self.bytes.len().div_ceil(CHUNK_SIZE)
    }
}

/// Hex digits of one literal; `None` when the value needs more than a byte.
fn parse_literal(digits: &[u8]) -> Option<u8> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| u8::from_str_radix(digits, 16).ok())
}

impl From<Vec<u8>> for ImageBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for ImageBlob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
