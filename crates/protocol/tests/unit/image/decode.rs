//! # Image Decode Tests
//!
//! Hex-literal extraction from image sources, including the surrounding C syntax,
//! malformed and empty sources, and the chunking used by uploads.

use epdload_core::common::ImageError;
use epdload_core::image::ImageBlob;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use tempfile::NamedTempFile;

use crate::common::harness::{c_array, temp_file};

#[test]
fn test_decode_c_array() {
    let source = "const uint8_t img[] = {0x00, 0x1A, 0xff,\n 0x7F}; // trailing comment";
    let blob = ImageBlob::decode(source).unwrap();
    assert_eq!(blob.as_bytes(), &[0x00, 0x1A, 0xFF, 0x7F]);
}

#[test]
fn test_decode_ignores_non_literal_text() {
    let blob = ImageBlob::decode("width 264 height 176 0xZZ x0 0x").unwrap();
    assert!(blob.is_empty());
}

#[test]
fn test_decode_empty_source() {
    let blob = ImageBlob::decode("").unwrap();
    assert_eq!(blob.len(), 0);
    assert_eq!(blob.chunk_count(), 0);
}

#[test]
fn test_decode_mixed_case_digits_and_leading_zeros() {
    let blob = ImageBlob::decode("0xaB 0x0C 0x00ff 0x7").unwrap();
    assert_eq!(blob.into_bytes(), vec![0xAB, 0x0C, 0xFF, 0x07]);
}

#[test]
fn test_decode_rejects_multibyte_literal() {
    let err = ImageBlob::decode("0x01, 0x02, 0x100").unwrap_err();
    match err {
        ImageError::LiteralOutOfRange { literal, index } => {
            assert_eq!(literal, "0x100");
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_decode_literal_embedded_in_identifier() {
    // The pattern is unanchored, so the literal inside `a0x12` still counts.
    let blob = ImageBlob::decode("a0x12").unwrap();
    assert_eq!(blob.as_bytes(), &[0x12]);
}

#[test]
fn test_from_file() {
    let bytes: Vec<u8> = (0..=9).collect();
    let file = temp_file(&c_array("image", &bytes));
    let blob = ImageBlob::from_file(file.path()).unwrap();
    assert_eq!(blob.as_bytes(), bytes.as_slice());
}

#[test]
fn test_from_file_without_literals_is_empty() {
    let file = temp_file("this file has no image data\n");
    let blob = ImageBlob::from_file(file.path()).unwrap();
    assert!(blob.is_empty());
}

#[test]
fn test_from_file_with_non_utf8_comment() {
    // Latin-1 copyright sign in a header comment.
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        b"/* \xa9 2012 */\nconst char img[] = {0x01, 0x02};\n",
    )
    .unwrap();
    let blob = ImageBlob::from_file(file.path()).unwrap();
    assert_eq!(blob.as_bytes(), &[0x01, 0x02]);
}

#[test]
fn test_decode_raw_bytes_between_literals() {
    let blob = ImageBlob::decode(b"\xff\xfe0x10\x80,0x20\xc3").unwrap();
    assert_eq!(blob.as_bytes(), &[0x10, 0x20]);
}

#[test]
fn test_from_missing_file() {
    let err = ImageBlob::from_file("/nonexistent/image.h").unwrap_err();
    assert!(matches!(err, ImageError::Read { ref path, .. } if path == "/nonexistent/image.h"));
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(7, 1)]
#[case(8, 1)]
#[case(9, 2)]
#[case(10, 2)]
#[case(16, 2)]
#[case(5808, 726)]
fn test_chunk_count(#[case] len: usize, #[case] chunks: usize) {
    let blob = ImageBlob::from(vec![0xAA; len]);
    assert_eq!(blob.chunk_count(), chunks);
    assert_eq!(blob.chunks().count(), chunks);
}

#[test]
fn test_last_chunk_is_short() {
    let blob = ImageBlob::from((0u8..10).collect::<Vec<_>>());
    let chunks: Vec<&[u8]> = blob.chunks().collect();
    let expected: Vec<&[u8]> = vec![&[0, 1, 2, 3, 4, 5, 6, 7], &[8, 9]];
    assert_eq!(chunks, expected);
}

proptest! {
    #[test]
    fn prop_decode_preserves_values_and_order(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        upper in any::<bool>(),
    ) {
        let source = bytes
            .iter()
            .map(|b| if upper { format!("0x{b:02X}") } else { format!("0x{b:x}") })
            .collect::<Vec<_>>()
            .join(" , /* filler */ ");
        let blob = ImageBlob::decode(&source).unwrap();
        prop_assert_eq!(blob.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn prop_chunks_cover_blob(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
        let blob = ImageBlob::from(bytes.clone());
        prop_assert_eq!(blob.chunk_count(), bytes.len().div_ceil(8));
        prop_assert!(blob.chunks().all(|c| !c.is_empty() && c.len() <= 8));
        prop_assert_eq!(blob.chunks().flatten().copied().collect::<Vec<_>>(), bytes);
    }
}
