//! Framing vocabulary shared by both exchanges.
//!
//! Both loaders speak a half-duplex request/response protocol: the host writes a
//! frame, the controller answers with a single acknowledgment byte. This module holds:
//! 1. **Frame bytes:** [`Opcode`] lead bytes and the known [`Ack`] bytes.
//! 2. **Exchange position:** [`Stage`], naming each acknowledgment read and what it should be.
//! 3. **Checking:** [`AckPolicy`] and [`read_ack`], which decide what a mismatch means.
//! 4. **Accounting:** [`TransferStats`] for the frames and acks of one exchange.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{trace, warn};

use crate::common::{ProtocolError, Result};
use crate::link::Channel;

/// Image upload exchange.
pub mod upload;

/// Sequence-command table exchange.
pub mod sequence;

pub use sequence::{CommandTable, EventType, SeqCommand, put_seq_commands};
pub use upload::{load_image, read_image, upload_image};

/// Lead byte of a host-to-controller frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Begin an image upload; followed by two hex digits naming the sector.
    Upload = b'u',
    /// Begin a sequence-command table; followed by the record count.
    LoadTable = b'L',
}

impl Opcode {
    /// Wire value of the opcode.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// Acknowledgment bytes with a defined value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ack {
    /// Controller is ready to receive table records.
    TableReady = b'>',
    /// One table record was stored.
    RecordStored = b'.',
    /// The whole table was stored.
    TableComplete = b'<',
}

impl Ack {
    /// Wire value of the acknowledgment.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// Point in an exchange at which an acknowledgment byte is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// After the upload initiation frame.
    UploadStart,
    /// After the given zero-based image chunk.
    Chunk(usize),
    /// After the last chunk, signalling upload completion.
    UploadDone,
    /// After the table header.
    TableReady,
    /// After the given zero-based table record.
    Record(usize),
    /// After the last record, signalling table completion.
    TableDone,
}

impl Stage {
    /// Acknowledgment the controller should send at this stage.
    ///
    /// Upload acknowledgments have no fixed value on the wire, so `None` is returned
    /// for them and they are never checked.
    pub const fn expected(self) -> Option<Ack> {
        match self {
            Self::UploadStart | Self::Chunk(_) | Self::UploadDone => None,
            Self::TableReady => Some(Ack::TableReady),
            Self::Record(_) => Some(Ack::RecordStored),
            Self::TableDone => Some(Ack::TableComplete),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadStart => write!(f, "upload start"),
            Self::Chunk(index) => write!(f, "image chunk {index}"),
            Self::UploadDone => write!(f, "upload completion"),
            Self::TableReady => write!(f, "table header"),
            Self::Record(index) => write!(f, "table record {index}"),
            Self::TableDone => write!(f, "table completion"),
        }
    }
}

/// What to do when an acknowledgment byte differs from the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckPolicy {
    /// Read and discard acknowledgments without looking at them.
    Ignore,
    /// Log a mismatch and carry on.
    #[default]
    Warn,
    /// Abort the exchange with [`ProtocolError::UnexpectedAck`].
    Strict,
}

impl FromStr for AckPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown ack policy '{other}' (expected ignore, warn or strict)"
            )),
        }
    }
}

/// Reads one acknowledgment byte and applies `policy` to it.
///
/// # Arguments
///
/// * `channel` - Channel to read from.
/// * `stage` - Position in the exchange; decides the expected byte.
/// * `policy` - How a mismatch is handled.
///
/// # Returns
///
/// The byte the controller sent (also under [`AckPolicy::Warn`] when it mismatched).
///
/// # Errors
///
/// Fails when no byte can be read, or with [`ProtocolError::UnexpectedAck`] when the
/// byte mismatches under [`AckPolicy::Strict`].
pub fn read_ack<C: Channel + ?Sized>(
    channel: &mut C,
    stage: Stage,
    policy: AckPolicy,
) -> Result<u8> {
    let actual = channel.recv_byte()?;
    trace!(%stage, ack = %actual.escape_ascii(), "ack received");

    let Some(expected) = stage.expected().map(Ack::byte) else {
        return Ok(actual);
    };
    if actual != expected {
        match policy {
            AckPolicy::Ignore => {}
            AckPolicy::Warn => warn!(
                %stage,
                expected = %expected.escape_ascii(),
                actual = %actual.escape_ascii(),
                "unexpected acknowledgment from device"
            ),
            AckPolicy::Strict => {
                return Err(ProtocolError::UnexpectedAck {
                    stage,
                    expected,
                    actual,
                }
                .into());
            }
        }
    }
    Ok(actual)
}

/// Frame and acknowledgment counts for one exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Number of frames (initiation, chunks, header, records) written.
    pub frames_written: usize,
    /// Total bytes written across all frames.
    pub bytes_written: usize,
    /// Number of acknowledgment bytes read.
    pub acks_read: usize,
}

impl fmt::Display for TransferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frame(s), {} byte(s) written, {} ack(s) read",
            self.frames_written, self.bytes_written, self.acks_read
        )
    }
}

/// One in-progress exchange: a borrowed channel plus its running counters.
pub(crate) struct Exchange<'a, C: ?Sized> {
    channel: &'a mut C,
    policy: AckPolicy,
    stats: TransferStats,
}

impl<'a, C: Channel + ?Sized> Exchange<'a, C> {
    pub(crate) fn new(channel: &'a mut C, policy: AckPolicy) -> Self {
        Self {
            channel,
            policy,
            stats: TransferStats::default(),
        }
    }

    /// Writes one frame.
    pub(crate) fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.channel.send(frame)?;
        self.stats.frames_written += 1;
        self.stats.bytes_written += frame.len();
        Ok(())
    }

    /// Reads and checks the acknowledgment for `stage`.
    pub(crate) fn ack(&mut self, stage: Stage) -> Result<()> {
        let _ack = read_ack(&mut *self.channel, stage, self.policy)?;
        self.stats.acks_read += 1;
        Ok(())
    }

    pub(crate) const fn finish(self) -> TransferStats {
        self.stats
    }
}
