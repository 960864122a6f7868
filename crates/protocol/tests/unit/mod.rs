//! # Unit Tests
//!
//! One module per library area: shared types, configuration, image decoding,
//! channel bindings, and the two protocol exchanges.

/// Error display and constants.
pub mod common;

/// Configuration defaults and JSON parsing.
pub mod config;



/// Acknowledgment handling, image upload, and sequence-command tables.
pub mod protocol;
