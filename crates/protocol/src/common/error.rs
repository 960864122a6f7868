//! Error definitions for the loaders.
//!
//! Errors are grouped by the concern that raises them:
//! 1. **Links:** Opening a binding and moving bytes across it ([`LinkError`]).
//! 2. **Images:** Reading and decoding image sources, sector parsing ([`ImageError`]).
//! 3. **Protocol:** Acknowledgment mismatches and framing limits ([`ProtocolError`]).
//! 4. **Configuration:** Reading and parsing JSON inputs ([`ConfigError`]).
//!
//! Every group converts into the crate-level [`Error`].

use std::io;

use thiserror::Error;

use crate::protocol::Stage;

/// Failures raised by a channel binding.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The character device could not be opened (absent, busy, or permission denied).
    #[error("could not open device '{path}': {source}")]
    Open {
        /// Path that was opened.
        path: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The serial port could not be opened or configured.
    #[error("could not open serial port '{path}': {source}")]
    Serial {
        /// Port name that was opened.
        path: String,
        /// Underlying serial driver error.
        #[source]
        source: serialport::Error,
    },

    /// The channel stopped accepting bytes before the whole frame was written.
    #[error("short write on '{channel}': {len} byte(s) could not be fully transmitted")]
    ShortWrite {
        /// Channel name.
        channel: String,
        /// Length of the frame that was being written.
        len: usize,
    },

    /// The channel reached end-of-stream before the requested bytes arrived.
    #[error("short read on '{channel}': channel closed before {expected} byte(s) arrived")]
    ShortRead {
        /// Channel name.
        channel: String,
        /// Number of bytes that were requested.
        expected: usize,
    },

    /// A serial read gave up waiting for the device.
    #[error("timed out on '{channel}' waiting for {expected} byte(s)")]
    Timeout {
        /// Channel name.
        channel: String,
        /// Number of bytes that were requested.
        expected: usize,
    },

    /// Any other I/O failure on an open channel.
    #[error("I/O error on '{channel}': {source}")]
    Io {
        /// Channel name.
        channel: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Failures raised while reading or interpreting image inputs.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image source file could not be read.
    #[error("could not read image source '{path}': {source}")]
    Read {
        /// Path of the source file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A hex literal holds a value that does not fit in one byte.
    #[error("hex literal #{index} ('{literal}') does not fit in a byte")]
    LiteralOutOfRange {
        /// The literal as it appeared in the source.
        literal: String,
        /// Zero-based position of the literal among all matches.
        index: usize,
    },

    /// A sector number above 255 was requested.
    #[error("sector {0} is out of range (expected 0-255)")]
    SectorOutOfRange(u64),

    /// A sector argument was not a decimal number.
    #[error("'{0}' is not a decimal sector number")]
    InvalidSector(String),
}

/// Failures raised by the framing protocols themselves.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The device answered with a byte other than the acknowledgment the exchange expects.
    #[error(
        "protocol desync during {stage}: expected '{}', device sent '{}'",
        .expected.escape_ascii(),
        .actual.escape_ascii()
    )]
    UnexpectedAck {
        /// Point of the exchange where the byte was read.
        stage: Stage,
        /// Acknowledgment byte the protocol requires.
        expected: u8,
        /// Byte the device actually sent.
        actual: u8,
    },

    /// The command table has more records than the one-byte count can express.
    #[error("command table has {0} records; at most 255 fit in one header")]
    TableTooLarge(usize),
}

/// Failures raised while loading JSON configuration or command tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read '{path}': {source}")]
    Read {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The JSON document was malformed or did not match the expected shape.
    #[error("could not parse {origin}: {source}")]
    Parse {
        /// Where the document came from (a path or `"inline JSON"`).
        origin: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// Crate-level error: any failure an operation can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Channel failure.
    #[error(transparent)]
    Link(#[from] LinkError),
    /// Image input failure.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// Protocol violation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Configuration or table input failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias defaulting to the crate-level [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
