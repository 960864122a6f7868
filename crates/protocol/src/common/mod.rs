//! Common types shared by the channel bindings and both loaders.
//!
//! 1. **Constants:** Frame sizes and flash geometry of the controller.
//! 2. **Error Handling:** One error type per concern plus the crate-level [`Error`].

/// Protocol and flash constants.
pub mod constants;

/// Error types for links, images, protocol exchanges, and configuration.
pub mod error;

pub use constants::{CHUNK_SIZE, FLASH_SECTOR_SIZE, MAX_TABLE_RECORDS, RECORD_SIZE};
pub use error::{ConfigError, Error, ImageError, LinkError, ProtocolError, Result};
