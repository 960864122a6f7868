//! Constants describing the controller's framing and flash layout.

/// Maximum number of image bytes sent between two acknowledgments.
///
/// The controller's receive buffer is small, so uploads are paced in chunks of
/// this size with one acknowledgment byte per chunk.
pub const CHUNK_SIZE: usize = 8;

/// Wire size of one encoded sequence-command record.
pub const RECORD_SIZE: usize = 4;

/// Largest command table the header can describe (the count is a single byte).
pub const MAX_TABLE_RECORDS: usize = u8::MAX as usize;

/// Shift turning a sector number into a flash byte address.
pub const FLASH_SECTOR_SHIFT: u32 = 12;

/// Size of one erasable flash sector in bytes (4 KiB).
pub const FLASH_SECTOR_SIZE: u32 = 1 << FLASH_SECTOR_SHIFT;
