//! Sequence-command table exchange.
//!
//! A sequence command tells the controller which image to show next when an event
//! fires while a given image is displayed. The table is sent as:
//!
//! | Direction | Bytes | Meaning |
//! |---|---|---|
//! | host → device | `L` + count | begin table of N records |
//! | device → host | `>` | ready |
//! | host → device | event, arg, source, target | one record, N times |
//! | device → host | `.` per record | record stored |
//! | device → host | `<` | table stored |

use std::fs;
use std::path::Path;
use std::slice;

use serde::Deserialize;
use tracing::debug;

use crate::common::constants::{MAX_TABLE_RECORDS, RECORD_SIZE};
use crate::common::{ConfigError, ProtocolError, Result};
use crate::link::Channel;
use crate::protocol::{AckPolicy, Exchange, Opcode, Stage, TransferStats};

/// Number of images the demo table cycles through.
pub const DEMO_IMAGES: u8 = 5;

/// Event that triggers an image transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EventType {
    /// Timer expiry; the argument is device-defined (e.g. a duration).
    Timer = 1,
    /// Tap detected by the accelerometer.
    Tap = 2,
}

impl EventType {
    /// Wire code of the event.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// One transition rule: on `event` while `source` is shown, switch to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct SeqCommand {
    /// Triggering event.
    pub event: EventType,
    /// Event argument; meaning is defined by the device.
    #[serde(default)]
    pub arg: u8,
    /// Image index that must be displayed for the rule to apply.
    pub source: u8,
    /// Image index to display next.
    pub target: u8,
}

impl SeqCommand {
    /// Creates a rule.
    pub const fn new(event: EventType, arg: u8, source: u8, target: u8) -> Self {
        Self {
            event,
            arg,
            source,
            target,
        }
    }

    /// Wire form: event code, argument, source index, target index.
    pub const fn encode(self) -> [u8; RECORD_SIZE] {
        [self.event.code(), self.arg, self.source, self.target]
    }
}

/// Ordered list of sequence commands sent as one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CommandTable {
    records: Vec<SeqCommand>,
}

impl CommandTable {
    /// Wraps a list of records.
    pub const fn new(records: Vec<SeqCommand>) -> Self {
        Self { records }
    }

    /// Timer-driven slideshow: image `i` advances to `(i + 1) % images`, argument 0.
    ///
    /// # Arguments
    ///
    /// * `images` - Number of resident images to cycle; 0 yields an empty table.
    pub fn demo(images: u8) -> Self {
        (0..images)
            .map(|i| SeqCommand::new(EventType::Timer, 0, i, (i + 1) % images))
            .collect()
    }

    /// Parses a table from a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed records or out-of-range fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: "inline JSON".to_owned(),
            source,
        })
    }

    /// Reads and parses a JSON table file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a JSON array such as
    ///   `[{"event": "timer", "arg": 0, "source": 0, "target": 1}]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Records in send order.
    pub fn records(&self) -> &[SeqCommand] {
        &self.records
    }

    /// Iterates over the records in send order.
    pub fn iter(&self) -> slice::Iter<'_, SeqCommand> {
        self.records.iter()
    }

    /// Number of records.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` for a table without records.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header frame: `L` followed by the record count.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TableTooLarge`] above [`MAX_TABLE_RECORDS`] records.
    pub fn header(&self) -> Result<[u8; 2], ProtocolError> {
        let len = self.records.len();
        match u8::try_from(len) {
            Ok(count) if len <= MAX_TABLE_RECORDS => Ok([Opcode::LoadTable.byte(), count]),
            _ => Err(ProtocolError::TableTooLarge(len)),
        }
    }
}

impl FromIterator<SeqCommand> for CommandTable {
    fn from_iter<I: IntoIterator<Item = SeqCommand>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CommandTable {
    type Item = &'a SeqCommand;
    type IntoIter = slice::Iter<'a, SeqCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Writes `table` to the controller's sequence-command store.
///
/// The table size is validated before anything is written.
///
/// # Arguments
///
/// * `channel` - Open channel to the controller.
/// * `table` - Records to send, in order.
/// * `policy` - How acknowledgment mismatches are handled.
///
/// # Returns
///
/// Frame and acknowledgment counts for the exchange.
///
/// # Errors
///
/// Returns [`ProtocolError::TableTooLarge`] before any write for an oversized table,
/// a link error when a transfer fails, and [`ProtocolError::UnexpectedAck`] for a
/// mismatched acknowledgment under [`AckPolicy::Strict`].
pub fn put_seq_commands<C: Channel + ?Sized>(
    channel: &mut C,
    table: &CommandTable,
    policy: AckPolicy,
) -> Result<TransferStats> {
    let header = table.header()?;
    debug!(channel = channel.name(), records = table.len(), "sending command table");

    let mut exchange = Exchange::new(channel, policy);
    exchange.send(&header)?;
    exchange.ack(Stage::TableReady)?;

    for (index, command) in table.iter().enumerate() {
        exchange.send(&command.encode())?;
        exchange.ack(Stage::Record(index))?;
    }

    exchange.ack(Stage::TableDone)?;
    let stats = exchange.finish();
    debug!(%stats, "command table stored");
    Ok(stats)
}
