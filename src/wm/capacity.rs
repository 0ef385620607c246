// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Read-only capacity queries.
//!
//! Lets a caller pre-flight a message before attempting an embed: how
//! many payload bits an image holds at a given block size, and how much
//! fixed framing overhead to budget on top of the raw message bytes.
//! Every query recomputes from the image; nothing is cached or mutated.

use super::error::WatermarkError;
use super::header::{DetectRange, HEADER_BITS};
use super::payload::{self, SIG_LEN_FIELD_BYTES, TERMINATOR};
use crate::transform::{decompose, pad_to_block, Channel};

/// Signature size assumed by the overhead figure: RSA-2048.
pub const DEFAULT_SIGNATURE_LEN: usize = 256;

/// Capacity of one image at one block size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    /// Usable payload capacity in bits (header and safety margin already
    /// subtracted).
    pub capacity_bits: usize,
    /// Usable payload capacity in whole bytes.
    pub capacity_bytes: usize,
    /// Fixed framing overhead a caller must budget in addition to raw
    /// message bytes: length field + default signature + terminator +
    /// safety margin.
    pub signature_overhead_bytes: usize,
    /// Channel width in samples.
    pub width: usize,
    /// Channel height in samples.
    pub height: usize,
    /// Block size the figures apply to.
    pub block_size: usize,
}

/// Compute the embedding capacity of a channel at a given block size.
///
/// Pure: the channel is only read, and nothing is cached between calls.
///
/// # Errors
/// - [`WatermarkError::InvalidBlockSize`] for sizes outside 2–255.
/// - [`WatermarkError::ImageTooSmall`] when the channel cannot hold a
///   block grid at this size.
pub fn compute_capacity(
    channel: &Channel,
    block_size: usize,
) -> Result<CapacityReport, WatermarkError> {
    crate::wm::validate_block_size(block_size)?;
    crate::wm::validate_dimensions(channel, block_size)?;

    let decomp = decompose(channel);
    let padded = pad_to_block(&decomp.approx, block_size);
    let payload_blocks = padded.total_blocks().saturating_sub(HEADER_BITS);
    let capacity_bits = payload::usable_capacity_bits(payload_blocks, block_size);

    let margin_bytes = payload::safety_margin_bits(block_size).div_ceil(8);
    Ok(CapacityReport {
        capacity_bits,
        capacity_bytes: capacity_bits / 8,
        signature_overhead_bytes: SIG_LEN_FIELD_BYTES
            + DEFAULT_SIGNATURE_LEN
            + TERMINATOR.len()
            + margin_bytes,
        width: channel.width(),
        height: channel.height(),
        block_size,
    })
}

/// Smallest block size in the range whose usable capacity fits a payload
/// of `payload_bytes` bytes, or `None` if none does.
pub fn fit_block_size(
    channel: &Channel,
    payload_bytes: usize,
    range: &DetectRange,
) -> Option<usize> {
    let payload_bits = payload_bytes * 8;
    (range.min..=range.max).find(|&b| {
        matches!(
            compute_capacity(channel, b),
            Ok(report) if report.capacity_bits >= payload_bits
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(side: usize) -> Channel {
        let data = (0..side * side).map(|i| (i % 255) as f32).collect();
        Channel::from_vec(side, side, data)
    }

    #[test]
    fn capacity_subtracts_header_and_margin() {
        // 256x256 channel -> 128x128 subband -> 16x16 blocks of size 8.
        let report = compute_capacity(&channel(256), 8).unwrap();
        assert_eq!(report.capacity_bits, 256 - 8 - 32);
        assert_eq!(report.capacity_bytes, (256 - 8 - 32) / 8);
        assert_eq!(report.block_size, 8);
        assert_eq!(report.width, 256);
        assert_eq!(report.height, 256);
    }

    #[test]
    fn overhead_covers_frame_and_margin() {
        let report = compute_capacity(&channel(256), 8).unwrap();
        // 4 length + 256 signature + 4 terminator + 4 margin bytes.
        assert_eq!(report.signature_overhead_bytes, 268);
    }

    #[test]
    fn capacity_non_increasing_in_block_size() {
        // Fewer, larger blocks: capacity shrinks (or stays) as the block
        // size grows.
        let ch = channel(512);
        let mut prev = usize::MAX;
        for b in 2..=32 {
            let report = compute_capacity(&ch, b).unwrap();
            assert!(
                report.capacity_bits <= prev,
                "capacity grew at block size {b}"
            );
            prev = report.capacity_bits;
        }
    }

    #[test]
    fn too_small_image_rejected() {
        assert!(matches!(
            compute_capacity(&channel(15), 8),
            Err(WatermarkError::ImageTooSmall { .. })
        ));
    }

    #[test]
    fn invalid_block_size_rejected() {
        assert!(matches!(
            compute_capacity(&channel(64), 1),
            Err(WatermarkError::InvalidBlockSize(1))
        ));
        assert!(matches!(
            compute_capacity(&channel(64), 256),
            Err(WatermarkError::InvalidBlockSize(256))
        ));
    }

    #[test]
    fn fit_block_size_picks_smallest_sufficient() {
        let ch = channel(256); // 128x128 subband
        // 40-byte payload = 320 bits. Block size 2: 64*64 blocks = 4096,
        // minus header and margin, easily fits.
        let range = DetectRange::default();
        let fitted = fit_block_size(&ch, 40, &range).unwrap();
        assert_eq!(fitted, range.min);

        // An absurd payload fits nothing.
        assert_eq!(fit_block_size(&ch, 1 << 20, &range), None);
    }

    #[test]
    fn fit_block_size_skips_undersized_candidates() {
        // Payload needing more than block size 2 provides at this image.
        let ch = channel(64); // 32x32 subband
        let range = DetectRange::default();
        // Block 2: 16*16=256 blocks -> 256-8-64 = 184 bits usable.
        // 24 bytes = 192 bits requires block size... none (larger blocks
        // have even less), so None.
        assert_eq!(fit_block_size(&ch, 24, &range), None);
        // 20 bytes = 160 bits fits block size 2.
        assert_eq!(fit_block_size(&ch, 20, &range), Some(2));
    }
}
