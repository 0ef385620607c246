// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Error types for the watermarking pipeline.
//!
//! [`WatermarkError`] covers all failure modes from image loading through
//! embedding, extraction and payload parsing. Two conditions are
//! deliberately *not* errors: a signature that fails verification
//! (reported as `valid = false` in [`Verification`]) and message bytes
//! that are not clean UTF-8 (reported via [`RecoveredMessage::clean`]).
//!
//! [`Verification`]: crate::wm::pipeline::Verification
//! [`RecoveredMessage::clean`]: crate::wm::message::RecoveredMessage

use core::fmt;

use crate::crypto::CryptoError;

/// Errors that can occur during watermark embedding or extraction.
#[derive(Debug)]
pub enum WatermarkError {
    /// The image is too small to hold even one block grid at this block size.
    ImageTooSmall {
        width: usize,
        height: usize,
        block_size: usize,
    },
    /// The block size is outside the supported range.
    InvalidBlockSize(usize),
    /// The framed payload does not fit the usable capacity of the image.
    CapacityExceeded {
        required_bits: usize,
        available_bits: usize,
    },
    /// Too little data was recovered to contain a payload at all.
    NoWatermark,
    /// The recovered signature-length field is inconsistent with the
    /// recovered data. Expected when extracting from a non-watermarked
    /// image or with the wrong block size.
    InvalidFormat,
    /// Signing or key handling failed.
    Crypto(CryptoError),
    /// The image file could not be read or written.
    Image(image::ImageError),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageTooSmall {
                width,
                height,
                block_size,
            } => write!(
                f,
                "image {width}x{height} too small for block size {block_size} \
                 (needs at least {0}x{0})",
                block_size * 2
            ),
            Self::InvalidBlockSize(b) => write!(f, "invalid block size {b} (supported: 2-255)"),
            Self::CapacityExceeded {
                required_bits,
                available_bits,
            } => write!(
                f,
                "payload needs {required_bits} bits ({} bytes) but only \
                 {available_bits} bits ({} bytes) are usable",
                required_bits.div_ceil(8),
                available_bits / 8
            ),
            Self::NoWatermark => write!(f, "no watermark found"),
            Self::InvalidFormat => write!(f, "invalid watermark format"),
            Self::Crypto(e) => write!(f, "crypto failure: {e}"),
            Self::Image(e) => write!(f, "image I/O failure: {e}"),
        }
    }
}

impl std::error::Error for WatermarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Crypto(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CryptoError> for WatermarkError {
    fn from(e: CryptoError) -> Self {
        Self::Crypto(e)
    }
}

impl From<image::ImageError> for WatermarkError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}
