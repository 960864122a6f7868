//! Image upload exchange.
//!
//! Wire sequence for one upload:
//!
//! | Direction | Bytes | Meaning |
//! |---|---|---|
//! | host → device | `u` + two hex digits | begin upload to sector N |
//! | device → host | 1 byte | ack |
//! | host → device | up to 8 bytes, repeated | image chunk |
//! | device → host | 1 byte per chunk | ack |
//! | device → host | 1 byte | upload complete |
//!
//! Pacing by chunk keeps the controller's small receive buffer from overrunning.

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::common::Result;
use crate::config::Config;
use crate::image::{ImageBlob, Panel, Sector};
use crate::link::Channel;
use crate::protocol::{AckPolicy, Exchange, Stage, TransferStats};

/// Writes `blob` into `sector` using the chunked upload exchange.
///
/// # Arguments
///
/// * `channel` - Open channel to the controller.
/// * `blob` - Image bytes to upload; may be empty.
/// * `sector` - Destination sector.
/// * `policy` - How acknowledgment mismatches are handled.
///
/// # Returns
///
/// Frame and acknowledgment counts for the exchange.
///
/// # Errors
///
/// Fails with a link error when a frame or acknowledgment cannot be transferred, and
/// with a protocol error only when a checked acknowledgment mismatches under
/// [`AckPolicy::Strict`].
pub fn upload_image<C: Channel + ?Sized>(
    channel: &mut C,
    blob: &ImageBlob,
    sector: Sector,
    policy: AckPolicy,
) -> Result<TransferStats> {
    debug!(
        channel = channel.name(),
        %sector,
        flash_address = sector.flash_address(),
        bytes = blob.len(),
        chunks = blob.chunk_count(),
        "upload started"
    );

    let mut exchange = Exchange::new(channel, policy);
    exchange.send(&sector.frame())?;
    exchange.ack(Stage::UploadStart)?;

    for (index, chunk) in blob.chunks().enumerate() {
        exchange.send(chunk)?;
        exchange.ack(Stage::Chunk(index))?;
        trace!(index, len = chunk.len(), "chunk acknowledged");
    }

    exchange.ack(Stage::UploadDone)?;
    let stats = exchange.finish();
    debug!(%sector, %stats, "upload finished");
    Ok(stats)
}

/// Decodes the image source at `image_path` and checks it against the configured panel.
///
/// When `config.panel` is set, a blob whose size differs from the panel's frame
/// size is reported at `warn` level; the blob is still returned.
///
/// # Arguments
///
/// * `image_path` - Hex-literal image source.
/// * `config` - Supplies the optional panel.
///
/// # Errors
///
/// Returns an image error when the source cannot be read or holds a literal above `0xff`.
pub fn read_image<P: AsRef<Path>>(image_path: P, config: &Config) -> Result<ImageBlob> {
    let blob = ImageBlob::from_file(image_path)?;
    if let Some(panel) = config.panel {
        check_frame_size(&blob, panel);
    }
    Ok(blob)
}

/// Decodes the image source at `image_path` and uploads it into `sector`.
///
/// The source is fully decoded before the first frame is written, so a bad source
/// leaves the channel untouched.
///
/// # Arguments
///
/// * `channel` - Open channel to the controller.
/// * `image_path` - Hex-literal image source.
/// * `sector` - Destination sector.
/// * `config` - Supplies the ack policy and the optional panel.
///
/// # Errors
///
/// Everything [`read_image`] and [`upload_image`] can return.
pub fn load_image<C: Channel + ?Sized, P: AsRef<Path>>(
    channel: &mut C,
    image_path: P,
    sector: Sector,
    config: &Config,
) -> Result<TransferStats> {
    let blob = read_image(image_path, config)?;
    upload_image(channel, &blob, sector, config.ack_policy)
}

fn check_frame_size(blob: &ImageBlob, panel: Panel) {
    if blob.len() != panel.image_bytes() {
        warn!(
            %panel,
            expected = panel.image_bytes(),
            actual = blob.len(),
            "image size does not match panel frame size"
        );
    }
}
