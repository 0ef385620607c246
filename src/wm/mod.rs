// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Watermark embedding layer.
//!
//! Everything above the raw transforms: the coefficient codec, the
//! self-describing block-size header, payload framing and capacity
//! accounting, tolerant message recovery, and the embed/extract/verify
//! pipelines. All operations are synchronous and share no mutable state;
//! the only cross-call configuration is read-only (safety-margin table,
//! coefficient-position rule, detection range).

pub mod batch;
pub mod capacity;
pub mod codec;
pub mod error;
pub mod header;
pub mod message;
pub mod payload;
pub mod pipeline;

pub use error::WatermarkError;

/// Smallest supported block size.
pub const MIN_BLOCK_SIZE: usize = 2;

/// Largest supported block size: the header stores the size in 8 bits.
/// Sizes above the detection range (64) still embed and extract, but need
/// an explicit block size on extraction.
pub const MAX_BLOCK_SIZE: usize = 255;

/// Default block size for embedding and the detection fallback.
pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Validate a block size against the supported range.
pub fn validate_block_size(block_size: usize) -> Result<(), WatermarkError> {
    if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size) {
        return Err(WatermarkError::InvalidBlockSize(block_size));
    }
    Ok(())
}

/// Validate that a channel can hold a block grid at this size.
///
/// The subband is half the channel per axis, so the channel must be at
/// least twice the block size in both dimensions.
pub fn validate_dimensions(
    channel: &crate::transform::Channel,
    block_size: usize,
) -> Result<(), WatermarkError> {
    if channel.height() < block_size * 2 || channel.width() < block_size * 2 {
        return Err(WatermarkError::ImageTooSmall {
            width: channel.width(),
            height: channel.height(),
            block_size,
        });
    }
    Ok(())
}
