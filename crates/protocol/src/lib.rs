//! Host-side loaders for a serial-attached e-paper display controller.
//!
//! This crate drives the controller's byte-framed command protocol. It provides:
//! 1. **Channels:** A byte-channel capability with raw device-file and serial-port bindings.
//! 2. **Images:** Decoding of hex-literal image sources into raw blobs, plus sector addressing.
//! 3. **Protocol:** The chunked image-upload exchange and the sequence-command table exchange.
//! 4. **Configuration:** Link selection, acknowledgment policy, and panel geometry.
//!
//! Every exchange is strictly synchronous: one frame is written, one acknowledgment byte
//! is read, and only then does the next frame go out.

/// Common types and constants (errors, frame sizes, flash geometry).
pub mod common;
/// Loader configuration (link binding, ack policy, panel).
pub mod config;
/// Image blob decoding, panel geometry, and sector identifiers.
pub mod image;
/// Byte-channel capability and its device-file and serial bindings.
pub mod link;
/// Framing vocabulary plus the upload and sequence-command exchanges.
pub mod protocol;

/// Crate-level error and result alias.
pub use crate::common::error::{Error, Result};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Byte-channel capability implemented by every binding.
pub use crate::link::Channel;
