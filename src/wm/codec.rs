// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Coefficient codec: one bit per block via sign quantization.
//!
//! Each block of the padded approximation subband carries exactly one bit
//! in a single mid-frequency DCT coefficient. Embedding overwrites that
//! coefficient with `+magnitude` (bit 1) or `-magnitude` (bit 0);
//! extraction is a hard sign threshold — strictly positive reads 1,
//! anything else (including signed zero) reads 0. The magnitude must
//! therefore sit well above the numerical drift of the forward/inverse
//! round trip; the default is calibrated by the round-trip tests.
//!
//! The coefficient position depends on the block size and must be the
//! same on both sides. Blocks are visited in row-major order; bit `i`
//! always lands in block `i`.

use crate::transform::{Dct, PaddedSubband};

/// Default embedding magnitude for the overwritten coefficient.
pub const DEFAULT_MAGNITUDE: f64 = 150.0;

/// The single coefficient position carrying the bit, as a function of
/// block size.
///
/// Small blocks use a lower frequency, large blocks a slightly higher
/// one; mid-size blocks sit at (3,3). Both components are clamped to the
/// block bounds, so the rule is total over all supported sizes.
pub fn coefficient_position(block_size: usize) -> (usize, usize) {
    let (u, v) = if block_size <= 4 {
        (1, 2)
    } else if block_size >= 10 {
        (4, 4)
    } else {
        (3, 3)
    };
    (u.min(block_size - 1), v.min(block_size - 1))
}

/// Overwrite the carrier coefficient of one frequency block with the
/// signed magnitude for `bit`. No other coefficient is touched.
pub fn encode_bit(freq: &mut [f64], block_size: usize, bit: u8, magnitude: f64) {
    debug_assert!(bit <= 1);
    let (u, v) = coefficient_position(block_size);
    freq[u * block_size + v] = if bit == 1 { magnitude } else { -magnitude };
}

/// Read one bit from the carrier coefficient of a frequency block.
pub fn decode_bit(freq: &[f64], block_size: usize) -> u8 {
    let (u, v) = coefficient_position(block_size);
    u8::from(freq[u * block_size + v] > 0.0)
}

/// Write `bits` into the first `bits.len()` blocks of the padded subband,
/// row-major, one bit per block: forward DCT, coefficient overwrite,
/// inverse DCT.
///
/// The caller has already checked that `bits.len()` fits
/// `padded.total_blocks()`.
pub fn write_bits(padded: &mut PaddedSubband, dct: &Dct, bits: &[u8], magnitude: f64) {
    debug_assert!(bits.len() <= padded.total_blocks());
    debug_assert_eq!(dct.block_size(), padded.block_size());

    let blocks_wide = padded.blocks_wide();
    let n = padded.block_size();
    for (i, &bit) in bits.iter().enumerate() {
        let br = i / blocks_wide;
        let bc = i % blocks_wide;
        let block = padded.block(br, bc);
        let mut freq = dct.forward(&block);
        encode_bit(&mut freq, n, bit, magnitude);
        padded.write_block(br, bc, &dct.inverse(&freq));
    }
}

/// Read `count` bits from the first `count` blocks of the padded subband,
/// row-major, one bit per block.
pub fn read_bits(padded: &PaddedSubband, dct: &Dct, count: usize) -> Vec<u8> {
    debug_assert!(count <= padded.total_blocks());
    debug_assert_eq!(dct.block_size(), padded.block_size());

    let blocks_wide = padded.blocks_wide();
    let n = padded.block_size();
    let mut bits = Vec::with_capacity(count);
    for i in 0..count {
        let freq = dct.forward(&padded.block(i / blocks_wide, i % blocks_wide));
        bits.push(decode_bit(&freq, n));
    }
    bits
}
