//! # Acknowledgment Tests
//!
//! Which stages carry a fixed acknowledgment byte and how each policy treats a
//! byte that differs from it.

use epdload_core::Error;
use epdload_core::common::{LinkError, ProtocolError};
use epdload_core::protocol::{Ack, AckPolicy, Stage, TransferStats, read_ack};
use rstest::rstest;

use crate::common::mocks::channel::ScriptedChannel;

#[rstest]
#[case(Stage::UploadStart, None)]
#[case(Stage::Chunk(3), None)]
#[case(Stage::UploadDone, None)]
#[case(Stage::TableReady, Some(Ack::TableReady))]
#[case(Stage::Record(0), Some(Ack::RecordStored))]
#[case(Stage::TableDone, Some(Ack::TableComplete))]
fn test_expected_ack(#[case] stage: Stage, #[case] expected: Option<Ack>) {
    assert_eq!(stage.expected(), expected);
}

#[rstest]
#[case(AckPolicy::Ignore)]
#[case(AckPolicy::Warn)]
#[case(AckPolicy::Strict)]
fn test_matching_ack_passes(#[case] policy: AckPolicy) {
    let mut channel = ScriptedChannel::with_replies(b">");
    assert_eq!(read_ack(&mut channel, Stage::TableReady, policy).unwrap(), b'>');
}

#[rstest]
#[case(AckPolicy::Ignore)]
#[case(AckPolicy::Warn)]
fn test_lenient_policies_return_mismatched_byte(#[case] policy: AckPolicy) {
    let mut channel = ScriptedChannel::with_replies(b"x");
    assert_eq!(read_ack(&mut channel, Stage::Record(2), policy).unwrap(), b'x');
}

#[test]
fn test_strict_mismatch_names_stage() {
    let mut channel = ScriptedChannel::with_replies(b"x");
    let err = read_ack(&mut channel, Stage::Record(2), AckPolicy::Strict).unwrap_err();
    match err {
        Error::Protocol(ProtocolError::UnexpectedAck {
            stage,
            expected,
            actual,
        }) => {
            assert_eq!(stage, Stage::Record(2));
            assert_eq!(expected, b'.');
            assert_eq!(actual, b'x');
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_upload_acks_never_checked() {
    let mut channel = ScriptedChannel::with_replies(b"\x00");
    assert_eq!(
        read_ack(&mut channel, Stage::UploadStart, AckPolicy::Strict).unwrap(),
        0
    );
}

#[test]
fn test_missing_ack_is_link_error() {
    let mut channel = ScriptedChannel::default();
    let err = read_ack(&mut channel, Stage::TableReady, AckPolicy::Ignore).unwrap_err();
    assert!(matches!(err, Error::Link(LinkError::ShortRead { .. })));
}

#[rstest]
#[case("ignore", AckPolicy::Ignore)]
#[case("Warn", AckPolicy::Warn)]
#[case(" strict ", AckPolicy::Strict)]
fn test_policy_from_str(#[case] input: &str, #[case] expected: AckPolicy) {
    assert_eq!(input.parse::<AckPolicy>().unwrap(), expected);
}

#[test]
fn test_policy_from_str_rejects_unknown() {
    let err = "paranoid".parse::<AckPolicy>().unwrap_err();
    assert!(err.contains("paranoid"));
}

#[test]
fn test_stats_display() {
    let stats = TransferStats {
        frames_written: 3,
        bytes_written: 13,
        acks_read: 4,
    };
    assert_eq!(
        stats.to_string(),
        "3 frame(s), 13 byte(s) written, 4 ack(s) read"
    );
}
