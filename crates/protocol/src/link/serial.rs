//! Serial-port binding.
//!
//! Opens the port at the configured baud rate and discards whatever is sitting in
//! the input buffer before the first frame is sent. Reads block up to the configured
//! timeout and then fail with [`LinkError::Timeout`].

use std::fmt;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tracing::debug;

use crate::common::LinkError;
use crate::link::{Channel, recv_exact, send_all};

/// Channel over a serial port.
pub struct SerialChannel {
    /// Port name (e.g. `/dev/ttyUSB0`, `COM4`).
    name: String,
    /// Open port; closed on drop.
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Opens and configures a serial port, then flushes its input buffer.
    ///
    /// # Arguments
    ///
    /// * `path` - Port name.
    /// * `baud_rate` - Line speed in bits per second.
    /// * `timeout` - Longest time a single read may block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Serial`] when the port cannot be opened or flushed.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, LinkError> {
        let serial_error = |source| LinkError::Serial {
            path: path.to_owned(),
            source,
        };
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(serial_error)?;
        port.clear(ClearBuffer::Input).map_err(serial_error)?;
        debug!(port = path, baud_rate, "serial input buffer flushed");
        Ok(Self {
            name: path.to_owned(),
            port,
        })
    }
}

impl fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialChannel")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate().ok())
            .finish_non_exhaustive()
    }
}

impl Channel for SerialChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        send_all(&mut self.port, &self.name, bytes)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        recv_exact(&mut self.port, &self.name, buf)
    }
}
