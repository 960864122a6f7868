//! Raw character-device binding.
//!
//! The device node is opened for reading and writing without any userspace buffer,
//! so every frame reaches the driver as soon as `send` returns and every `recv`
//! sees only bytes the controller produced after the preceding write.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::common::LinkError;
use crate::link::{Channel, recv_exact, send_all};

/// Channel over a character device such as `/dev/ttyACM0`.
#[derive(Debug)]
pub struct DeviceFileChannel {
    /// Path the device was opened from.
    name: String,
    /// Unbuffered handle; closed on drop.
    file: File,
}

impl DeviceFileChannel {
    /// Opens `path` read+write.
    ///
    /// The node is never created or truncated; a missing device is an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the character device.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Open`] when the node is missing or not accessible.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LinkError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| LinkError::Open {
                path: name.clone(),
                source,
            })?;
        Ok(Self { name, file })
    }
}

impl Channel for DeviceFileChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        send_all(&mut self.file, &self.name, bytes)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        recv_exact(&mut self.file, &self.name, buf)
    }
}
