// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Payload framing and capacity accounting.
//!
//! The payload is the byte sequence carried by the watermark. There is
//! exactly one framing version:
//!
//! ```text
//! [4 bytes] signature length (big-endian u32, must be > 0)
//! [N bytes] signature
//! [M bytes] message (UTF-8)
//! [4 bytes] terminator = 0x00000000
//! ```
//!
//! The message has no length field; the terminator is the only delimiter
//! and may legitimately be missing when the message was truncated at the
//! capacity limit. Terminator handling lives in `wm::message`.
//!
//! Capacity accounting reserves a safety margin below the raw block
//! count: the trailing blocks of the grid are the ones clipped or
//! distorted by padding and grid rounding, so embedding never runs right
//! up to the edge. The margin depends on the block size's reliability
//! tier.

use super::error::WatermarkError;

/// Size of the signature length field in bytes.
pub const SIG_LEN_FIELD_BYTES: usize = 4;

/// End-of-message marker: four zero bytes.
pub const TERMINATOR: [u8; 4] = [0u8; 4];

/// Build a payload from a signature and message bytes.
///
/// The signature must be non-empty for the result to parse back; its
/// length must fit a u32, which any real signature does.
pub fn build_payload(signature: &[u8], message: &[u8]) -> Vec<u8> {
    debug_assert!(u32::try_from(signature.len()).is_ok());

    let mut payload =
        Vec::with_capacity(SIG_LEN_FIELD_BYTES + signature.len() + message.len() + TERMINATOR.len());
    payload.extend_from_slice(&(signature.len() as u32).to_be_bytes());
    payload.extend_from_slice(signature);
    payload.extend_from_slice(message);
    payload.extend_from_slice(&TERMINATOR);
    payload
}

/// Split a recovered payload into signature and message bytes.
///
/// Returns [`WatermarkError::NoWatermark`] when there are not even enough
/// bytes for the length field, and [`WatermarkError::InvalidFormat`] when
/// the length field is zero or points past the recovered data — the
/// expected outcomes for a non-watermarked image or a wrong block size.
/// The message part still carries the terminator and any trailing noise;
/// `wm::message` strips those.
pub fn parse_payload(bytes: &[u8]) -> Result<(&[u8], &[u8]), WatermarkError> {
    if bytes.len() < SIG_LEN_FIELD_BYTES {
        return Err(WatermarkError::NoWatermark);
    }

    let sig_len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if sig_len == 0 || sig_len > bytes.len() - SIG_LEN_FIELD_BYTES {
        return Err(WatermarkError::InvalidFormat);
    }

    let signature = &bytes[SIG_LEN_FIELD_BYTES..SIG_LEN_FIELD_BYTES + sig_len];
    let message = &bytes[SIG_LEN_FIELD_BYTES + sig_len..];
    Ok((signature, message))
}

/// Reserved bits subtracted from the raw payload capacity.
///
/// The tiers follow the coefficient-position rule boundaries: mid-size
/// blocks (5–9) extract most reliably, small blocks (2–4) less so, and
/// large blocks (10+) least. The exact values are empirical and tunable;
/// they are validated by the round-trip tests, not derived.
pub fn safety_margin_bits(block_size: usize) -> usize {
    if (5..=9).contains(&block_size) {
        32
    } else if (2..=4).contains(&block_size) {
        64
    } else {
        96
    }
}

/// Usable payload capacity in bits for `num_blocks` payload blocks.
///
/// `num_blocks` is the block count left after the header blocks; the
/// safety margin comes off the top.
pub fn usable_capacity_bits(num_blocks: usize, block_size: usize) -> usize {
    num_blocks.saturating_sub(safety_margin_bits(block_size))
}

/// Check that a payload of `payload_bits_len` bits fits `num_blocks`
/// payload blocks at this block size.
///
/// Fails with accurate required/available diagnostics. Nothing is ever
/// truncated to fit: the caller decides whether to shrink the message,
/// use a smaller block size, or use a larger image.
pub fn check_capacity(
    payload_bits_len: usize,
    num_blocks: usize,
    block_size: usize,
) -> Result<(), WatermarkError> {
    let available_bits = usable_capacity_bits(num_blocks, block_size);
    if payload_bits_len > available_bits {
        return Err(WatermarkError::CapacityExceeded {
            required_bits: payload_bits_len,
            available_bits,
        });
    }
    Ok(())
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_parse_roundtrip() {
        let signature = vec![0xAAu8; 256];
        let message = "hello watermark".as_bytes();
        let payload = build_payload(&signature, message);

        assert_eq!(payload.len(), 4 + 256 + message.len() + 4);
        assert_eq!(&payload[0..4], &[0, 0, 1, 0]); // 256 big-endian

        let (sig, msg) = parse_payload(&payload).unwrap();
        assert_eq!(sig, &signature[..]);
        // Message part keeps the terminator for the decoder to strip.
        assert_eq!(&msg[..message.len()], message);
        assert_eq!(&msg[message.len()..], &TERMINATOR);
    }

    #[test]
    fn short_buffer_is_no_watermark() {
        assert!(matches!(parse_payload(&[]), Err(WatermarkError::NoWatermark)));
        assert!(matches!(
            parse_payload(&[0, 0, 1]),
            Err(WatermarkError::NoWatermark)
        ));
    }

    #[test]
    fn zero_sig_len_is_invalid_format() {
        let bytes = [0u8, 0, 0, 0, 1, 2, 3];
        assert!(matches!(
            parse_payload(&bytes),
            Err(WatermarkError::InvalidFormat)
        ));
    }

    #[test]
    fn sig_len_past_buffer_is_invalid_format() {
        // Claims a 300-byte signature over a 6-byte buffer. A corrupted
        // length field must never index out of bounds.
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(&300u32.to_be_bytes());
        assert!(matches!(
            parse_payload(&bytes),
            Err(WatermarkError::InvalidFormat)
        ));
    }

    #[test]
    fn sig_len_exactly_filling_buffer_parses() {
        let mut bytes = vec![0u8; 4 + 5];
        bytes[0..4].copy_from_slice(&5u32.to_be_bytes());
        bytes[4..].copy_from_slice(&[9, 8, 7, 6, 5]);
        let (sig, msg) = parse_payload(&bytes).unwrap();
        assert_eq!(sig, &[9, 8, 7, 6, 5]);
        assert!(msg.is_empty());
    }

    #[test]
    fn margin_tiers() {
        for b in 5..=9 {
            assert_eq!(safety_margin_bits(b), 32);
        }
        for b in 2..=4 {
            assert_eq!(safety_margin_bits(b), 64);
        }
        assert_eq!(safety_margin_bits(10), 96);
        assert_eq!(safety_margin_bits(64), 96);
    }

    #[test]
    fn usable_capacity_saturates_at_zero() {
        assert_eq!(usable_capacity_bits(2800, 8), 2768);
        assert_eq!(usable_capacity_bits(20, 8), 0);
        assert_eq!(usable_capacity_bits(0, 2), 0);
    }

    #[test]
    fn capacity_monotone_in_margin() {
        // A larger margin can only shrink the usable capacity.
        let blocks = 500;
        let tier_a = usable_capacity_bits(blocks, 8); // 32-bit margin
        let tier_b = usable_capacity_bits(blocks, 4); // 64-bit margin
        let tier_c = usable_capacity_bits(blocks, 16); // 96-bit margin
        assert!(tier_a > tier_b);
        assert!(tier_b > tier_c);
    }

    #[test]
    fn check_capacity_boundary() {
        let usable = usable_capacity_bits(256, 8);
        assert!(check_capacity(usable, 256, 8).is_ok());
        match check_capacity(usable + 1, 256, 8) {
            Err(WatermarkError::CapacityExceeded {
                required_bits,
                available_bits,
            }) => {
                assert_eq!(required_bits, usable + 1);
                assert_eq!(available_bits, usable);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn bytes_bits_roundtrip() {
        let original = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let bits = bytes_to_bits(&original);
        assert_eq!(bits.len(), 32);
        assert_eq!(&bits[0..8], &[1, 1, 0, 1, 1, 1, 1, 0]);
        assert_eq!(bits_to_bytes(&bits), original);
    }

    #[test]
    fn bits_to_bytes_pads_partial_byte() {
        // 10110 -> 1011_0000
        assert_eq!(bits_to_bytes(&[1, 0, 1, 1, 0]), vec![0xB0]);
    }
}
