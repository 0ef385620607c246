// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Embed / extract / verify pipelines.
//!
//! Embedding: frame the payload, decompose the channel, pad the
//! approximation subband, write the block-size header then the payload
//! bits (one per block, row-major), unpad, reconstruct. Extraction runs
//! the same path in reverse, with the block size either given explicitly
//! or recovered by the self-description search.
//!
//! Every call owns its buffers; there is no state shared across calls.
//! The capacity check runs before any sample is touched, so a rejected
//! embed leaves no partial output.

use log::debug;

use super::codec::{self, DEFAULT_MAGNITUDE};
use super::error::WatermarkError;
use super::header::{self, DetectRange, HEADER_BITS};
use super::message::{self, RecoveredMessage};
use super::payload;
use crate::crypto::{Signer, Verifier};
use crate::transform::{decompose, pad_to_block, reconstruct, Channel, Dct};

/// Embedding parameters. Read-only configuration; the defaults match the
/// calibrated values used throughout the tests.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOptions {
    /// Block size for the subband grid (2–255).
    pub block_size: usize,
    /// Magnitude written into the carrier coefficient.
    pub magnitude: f64,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            block_size: crate::wm::DEFAULT_BLOCK_SIZE,
            magnitude: DEFAULT_MAGNITUDE,
        }
    }
}

/// How extraction determines the block size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSelection {
    /// Use this block size as-is. Required for sizes above the detection
    /// range.
    Explicit(usize),
    /// Run the self-description search over the given candidate range.
    Detect(DetectRange),
}

impl Default for BlockSelection {
    fn default() -> Self {
        Self::Detect(DetectRange::default())
    }
}

/// The result of a successful extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The recovered message.
    pub message: RecoveredMessage,
    /// The recovered signature bytes.
    pub signature: Vec<u8>,
    /// The block size the payload was read with.
    pub block_size: usize,
}

/// The result of extraction plus signature verification.
///
/// A failed signature check is a result, not an error: forged or
/// corrupted payloads are expected to land here with `valid = false`.
#[derive(Debug, Clone)]
pub struct Verification {
    /// The recovered message.
    pub message: RecoveredMessage,
    /// Whether the recovered signature validates the recovered message.
    pub valid: bool,
    /// Length of the recovered signature in bytes.
    pub signature_len: usize,
    /// The block size the payload was read with.
    pub block_size: usize,
}

/// Embed a message and its signature into a channel.
///
/// Returns the watermarked channel; the input is not modified.
///
/// # Errors
/// - [`WatermarkError::InvalidBlockSize`] / [`WatermarkError::ImageTooSmall`]
///   when the options do not fit the channel.
/// - [`WatermarkError::CapacityExceeded`] when the framed payload plus
///   safety margin exceeds the block count. Nothing is embedded and the
///   message is never truncated to fit.
pub fn embed(
    channel: &Channel,
    message: &str,
    signature: &[u8],
    opts: &EmbedOptions,
) -> Result<Channel, WatermarkError> {
    let block_size = opts.block_size;
    crate::wm::validate_block_size(block_size)?;
    crate::wm::validate_dimensions(channel, block_size)?;

    // 1. Frame the payload and convert to bits.
    let payload_bytes = payload::build_payload(signature, message.as_bytes());
    let bits = payload::bytes_to_bits(&payload_bytes);

    // 2. Decompose and pad the approximation subband.
    let mut decomp = decompose(channel);
    let mut padded = pad_to_block(&decomp.approx, block_size);
    let total_blocks = padded.total_blocks();
    if total_blocks < HEADER_BITS {
        return Err(WatermarkError::ImageTooSmall {
            width: channel.width(),
            height: channel.height(),
            block_size,
        });
    }

    // 3. Reject before touching any sample.
    payload::check_capacity(bits.len(), total_blocks - HEADER_BITS, block_size)?;
    debug!(
        "embedding {} payload bits into {} blocks at block size {block_size}",
        bits.len(),
        total_blocks
    );

    // 4. Header bits first, payload bits in the following blocks.
    let mut stream = Vec::with_capacity(HEADER_BITS + bits.len());
    stream.extend_from_slice(&header::header_bits(block_size));
    stream.extend_from_slice(&bits);

    let dct = Dct::new(block_size);
    codec::write_bits(&mut padded, &dct, &stream, opts.magnitude);

    // 5. Rebuild the channel at its exact original shape.
    decomp.approx = padded.unpad();
    Ok(reconstruct(&decomp))
}

/// Embed a message, signing it first with the given signer.
///
/// The signature covers the message bytes only, never the terminator or
/// any per-image data.
pub fn embed_signed(
    channel: &Channel,
    message: &str,
    signer: &dyn Signer,
    opts: &EmbedOptions,
) -> Result<Channel, WatermarkError> {
    let signature = signer.sign(message.as_bytes())?;
    embed(channel, message, &signature, opts)
}

/// Extract the embedded payload from a channel.
///
/// # Errors
/// - [`WatermarkError::NoWatermark`] / [`WatermarkError::InvalidFormat`]
///   when no plausible payload is present — the expected outcome for a
///   non-watermarked image or a wrong block size.
pub fn extract(
    channel: &Channel,
    selection: &BlockSelection,
) -> Result<Extraction, WatermarkError> {
    // 1. Determine the block size.
    let block_size = match selection {
        BlockSelection::Explicit(b) => {
            crate::wm::validate_block_size(*b)?;
            *b
        }
        BlockSelection::Detect(range) => header::detect_block_size(channel, range),
    };
    crate::wm::validate_dimensions(channel, block_size)?;

    // 2. Decompose and pad with the chosen size.
    let decomp = decompose(channel);
    let padded = pad_to_block(&decomp.approx, block_size);
    let total_blocks = padded.total_blocks();
    if total_blocks <= HEADER_BITS {
        return Err(WatermarkError::NoWatermark);
    }

    // 3. Read every block; the payload starts after the header blocks.
    let dct = Dct::new(block_size);
    let bits = codec::read_bits(&padded, &dct, total_blocks);
    let bytes = payload::bits_to_bytes(&bits[HEADER_BITS..]);

    // 4. Split signature from message and recover the text.
    let (signature, message_bytes) = payload::parse_payload(&bytes)?;
    let recovered = message::recover_message(message_bytes);
    debug!(
        "extracted {} byte signature and {} byte message at block size {block_size}",
        signature.len(),
        recovered.text.len()
    );

    Ok(Extraction {
        message: recovered,
        signature: signature.to_vec(),
        block_size,
    })
}

/// Extract the embedded payload and check its signature.
///
/// The signature is checked against the recovered message bytes. A
/// mismatch — tampered image, forged payload, wrong key — yields
/// `valid = false`, never an error.
pub fn verify(
    channel: &Channel,
    verifier: &dyn Verifier,
    selection: &BlockSelection,
) -> Result<Verification, WatermarkError> {
    let extraction = extract(channel, selection)?;
    let valid = verifier.verify(extraction.message.bytes(), &extraction.signature);
    Ok(Verification {
        valid,
        signature_len: extraction.signature.len(),
        message: extraction.message,
        block_size: extraction.block_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic mid-gray test channel; side chosen by callers so the
    /// subband divides evenly into blocks.
    fn test_channel(side: usize) -> Channel {
        let data = (0..side * side)
            .map(|i| 90.0 + ((i * 29 + 7) % 101) as f32)
            .collect();
        Channel::from_vec(side, side, data)
    }

    fn fake_signature(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 + 11) as u8).collect()
    }

    #[test]
    fn embed_extract_roundtrip_explicit() {
        // 512x512 -> 256x256 subband -> 1024 blocks at size 8; the 77-byte
        // payload (616 bits) fits the 984 usable bits comfortably.
        let channel = test_channel(512);
        let signature = fake_signature(64);
        let marked = embed(&channel, "hello", &signature, &EmbedOptions::default()).unwrap();

        let extraction = extract(&marked, &BlockSelection::Explicit(8)).unwrap();
        assert_eq!(extraction.message.text, "hello");
        assert!(extraction.message.terminated);
        assert!(extraction.message.clean);
        assert_eq!(extraction.signature, signature);
        assert_eq!(extraction.block_size, 8);
    }

    #[test]
    fn embed_does_not_modify_input() {
        let channel = test_channel(256);
        let copy = channel.clone();
        let _ = embed(&channel, "x", &fake_signature(8), &EmbedOptions::default()).unwrap();
        assert_eq!(channel, copy);
    }

    #[test]
    fn output_shape_matches_input() {
        // Odd dimensions exercise the crop-after-reconstruct path.
        let data = (0..255 * 251).map(|i| 80.0 + (i % 120) as f32).collect();
        let channel = Channel::from_vec(255, 251, data);
        let marked = embed(&channel, "odd", &fake_signature(8), &EmbedOptions::default()).unwrap();
        assert_eq!(marked.width(), 255);
        assert_eq!(marked.height(), 251);
    }

    #[test]
    fn capacity_rejection_before_any_work() {
        // 64x64 -> 32x32 subband -> 16 blocks at size 8: header alone
        // leaves 8 payload blocks, margin 32 leaves zero usable bits.
        let channel = test_channel(64);
        let err = embed(
            &channel,
            "way too much",
            &fake_signature(256),
            &EmbedOptions::default(),
        )
        .unwrap_err();
        match err {
            WatermarkError::CapacityExceeded {
                required_bits,
                available_bits,
            } => {
                // 4 + 256 + 12 + 4 bytes framed.
                assert_eq!(required_bits, 276 * 8);
                assert_eq!(available_bits, 0);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn image_smaller_than_two_blocks_rejected() {
        let channel = test_channel(15);
        assert!(matches!(
            embed(&channel, "m", &fake_signature(8), &EmbedOptions::default()),
            Err(WatermarkError::ImageTooSmall { .. })
        ));
        assert!(matches!(
            extract(&channel, &BlockSelection::Explicit(8)),
            Err(WatermarkError::ImageTooSmall { .. })
        ));
    }

    #[test]
    fn verify_accepts_matching_signer() {
        use crate::crypto::RsaSigner;

        let signer = RsaSigner::generate(1024).unwrap();
        // 128-byte signature -> 1136 payload bits; 768x768 gives 2264
        // usable bits at block size 8.
        let channel = test_channel(768);
        let marked = embed_signed(&channel, "signed", &signer, &EmbedOptions::default()).unwrap();

        let result = verify(&marked, &signer.verifier(), &BlockSelection::Explicit(8)).unwrap();
        assert!(result.valid);
        assert_eq!(result.message.text, "signed");
        assert_eq!(result.signature_len, 128);
    }

    #[test]
    fn verify_rejects_wrong_key() {
        use crate::crypto::RsaSigner;

        let signer = RsaSigner::generate(1024).unwrap();
        let other = RsaSigner::generate(1024).unwrap();
        let channel = test_channel(768);
        let marked = embed_signed(&channel, "signed", &signer, &EmbedOptions::default()).unwrap();

        let result = verify(&marked, &other.verifier(), &BlockSelection::Explicit(8)).unwrap();
        assert!(!result.valid);
        // The message itself still comes out intact.
        assert_eq!(result.message.text, "signed");
    }
}
