//! # Constant Tests

use epdload_core::common::constants::{
    CHUNK_SIZE, FLASH_SECTOR_SHIFT, FLASH_SECTOR_SIZE, MAX_TABLE_RECORDS, RECORD_SIZE,
};
use epdload_core::image::Sector;

#[test]
fn test_framing_sizes() {
    assert_eq!(CHUNK_SIZE, 8);
    assert_eq!(RECORD_SIZE, 4);
    assert_eq!(MAX_TABLE_RECORDS, usize::from(u8::MAX));
}

#[test]
fn test_flash_geometry() {
    assert_eq!(FLASH_SECTOR_SIZE, 4096);
    assert_eq!(1u32 << FLASH_SECTOR_SHIFT, FLASH_SECTOR_SIZE);
    // The last u8 sector ends exactly at the top of a 1 MiB flash.
    assert_eq!(
        Sector::new(u8::MAX).flash_address() + FLASH_SECTOR_SIZE,
        1 << 20
    );
}
