//! Byte-channel capability and its bindings.
//!
//! The protocol code only ever talks to a [`Channel`]: a half-duplex byte pipe whose
//! `send` transmits every byte before returning and whose `recv` fills the whole
//! buffer or fails. Two bindings implement it:
//! 1. **Device file:** A character device opened read+write with no client-side buffering.
//! 2. **Serial port:** A port opened at a configured baud rate whose input buffer is
//!    flushed on open so stale bytes from an earlier session are not mistaken for acks.
//!
//! Handles are owned exclusively for one exchange and released on drop; [`with_channel`]
//! scopes that ownership around a closure.

use std::io::{self, Read, Write};
use std::time::Duration;

use tracing::debug;

use crate::common::{LinkError, Result};
use crate::config::{LinkConfig, LinkKind};

/// Raw character-device binding.
pub mod device_file;
/// Serial-port binding.
pub mod serial;

pub use device_file::DeviceFileChannel;
pub use serial::SerialChannel;

/// A blocking, size-exact, bidirectional byte channel to the controller.
pub trait Channel {
    /// Returns a short name for diagnostics (usually the device path).
    fn name(&self) -> &str;

    /// Transmits every byte of `bytes` before returning.
    ///
    /// # Errors
    ///
    /// Fails when the channel accepts fewer bytes than given or the write fails.
    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Blocks until `buf` is completely filled.
    ///
    /// # Errors
    ///
    /// Fails when the channel closes or times out before `buf` is full.
    fn recv(&mut self, buf: &mut [u8]) -> Result<(), LinkError>;

    /// Receives exactly one byte.
    ///
    /// # Errors
    ///
    /// Same as [`Channel::recv`].
    fn recv_byte(&mut self) -> Result<u8, LinkError> {
        let mut byte = [0u8; 1];
        self.recv(&mut byte)?;
        Ok(byte[0])
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        (**self).send(bytes)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        (**self).recv(buf)
    }

    fn recv_byte(&mut self) -> Result<u8, LinkError> {
        (**self).recv_byte()
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        (**self).send(bytes)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        (**self).recv(buf)
    }

    fn recv_byte(&mut self) -> Result<u8, LinkError> {
        (**self).recv_byte()
    }
}

/// Opens the binding selected by `config` on `path`.
///
/// # Arguments
///
/// * `config` - Link settings (binding kind, baud rate, serial timeout).
/// * `path` - Device path or serial port name.
///
/// # Returns
///
/// The opened channel, boxed so either binding can be used interchangeably.
///
/// # Errors
///
/// Returns [`LinkError::Open`] or [`LinkError::Serial`] when the device cannot be opened.
pub fn open(config: &LinkConfig, path: &str) -> Result<Box<dyn Channel>, LinkError> {
    let channel: Box<dyn Channel> = match config.kind {
        LinkKind::DeviceFile => Box::new(DeviceFileChannel::open(path)?),
        LinkKind::Serial => Box::new(SerialChannel::open(
            path,
            config.baud_rate,
            Duration::from_millis(config.timeout_ms),
        )?),
    };
    debug!(channel = channel.name(), kind = ?config.kind, "channel opened");
    Ok(channel)
}

/// Opens a channel, runs `exchange` on it, and releases the handle on every exit path.
///
/// # Arguments
///
/// * `config` - Link settings used to pick and configure the binding.
/// * `path` - Device path or serial port name.
/// * `exchange` - The protocol exchange to run while the channel is held.
///
/// # Returns
///
/// Whatever `exchange` returns; open failures are returned before it runs.
///
/// # Errors
///
/// Open failures from [`open`] and any error raised by `exchange`.
pub fn with_channel<T, F>(config: &LinkConfig, path: &str, exchange: F) -> Result<T>
where
    F: FnOnce(&mut dyn Channel) -> Result<T>,
{
    let mut channel = open(config, path)?;
    let result = exchange(channel.as_mut());
    drop(channel);
    debug!(channel = path, ok = result.is_ok(), "channel closed");
    result
}

/// Writes a whole frame to a stream and flushes it, mapping failures onto [`LinkError`].
pub(crate) fn send_all<W: Write + ?Sized>(
    stream: &mut W,
    channel: &str,
    bytes: &[u8],
) -> Result<(), LinkError> {
    stream
        .write_all(bytes)
        .and_then(|()| stream.flush())
        .map_err(|source| match source.kind() {
            io::ErrorKind::WriteZero => LinkError::ShortWrite {
                channel: channel.to_owned(),
                len: bytes.len(),
            },
            _ => io_failure(channel, bytes.len(), source),
        })
}

/// Fills `buf` from a stream, mapping end-of-stream and timeouts onto [`LinkError`].
pub(crate) fn recv_exact<R: Read + ?Sized>(
    stream: &mut R,
    channel: &str,
    buf: &mut [u8],
) -> Result<(), LinkError> {
    let expected = buf.len();
    stream
        .read_exact(buf)
        .map_err(|source| match source.kind() {
            io::ErrorKind::UnexpectedEof => LinkError::ShortRead {
                channel: channel.to_owned(),
                expected,
            },
            _ => io_failure(channel, expected, source),
        })
}

fn io_failure(channel: &str, expected: usize, source: io::Error) -> LinkError {
    if source.kind() == io::ErrorKind::TimedOut {
        LinkError::Timeout {
            channel: channel.to_owned(),
            expected,
        }
    } else {
        LinkError::Io {
            channel: channel.to_owned(),
            source,
        }
    }
}
