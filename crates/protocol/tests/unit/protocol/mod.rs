/// Acknowledgment policies and stages.
pub mod ack;
