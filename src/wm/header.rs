// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Block-size self-description and auto-detection.
//!
//! The block size used for an embedding is itself embedded, as an 8-bit
//! big-endian header written through the coefficient codec into the first
//! eight blocks of the subband. Detection probes every candidate size in
//! a configured range: decoding the header with the *correct* size
//! reproduces that size's own value, while decoding with a wrong size
//! almost never does by chance. The first self-confirming candidate in
//! ascending order wins.
//!
//! Each probe independently re-decomposes and re-pads the image — probes
//! share no state and are pure functions of `(channel, candidate)`, so
//! under the `parallel` feature they run as a rayon parallel map with the
//! same ascending-order tie-break. Detection never fails: if no candidate
//! self-confirms, it degrades to the configured fallback and lets payload
//! parsing surface the mismatch.

use log::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::codec;
use crate::transform::{decompose, pad_to_block, Channel, Dct};

/// Number of header bits (and header blocks).
pub const HEADER_BITS: usize = 8;

/// Candidate range for block-size detection, plus the fallback used when
/// no candidate self-confirms. Pure configuration: capping the range is
/// how a caller bounds detection cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectRange {
    /// Smallest candidate, inclusive.
    pub min: usize,
    /// Largest candidate, inclusive.
    pub max: usize,
    /// Returned when no candidate matches.
    pub fallback: usize,
}

impl Default for DetectRange {
    /// Candidates 2–64 with fallback 8. Block sizes above 64 are outside
    /// the search and need an explicit block size on extraction.
    fn default() -> Self {
        Self {
            min: crate::wm::MIN_BLOCK_SIZE,
            max: 64,
            fallback: crate::wm::DEFAULT_BLOCK_SIZE,
        }
    }
}

/// The 8-bit header for a block size, MSB first.
pub fn header_bits(block_size: usize) -> [u8; HEADER_BITS] {
    debug_assert!(block_size <= u8::MAX as usize);
    let value = block_size as u8;
    let mut bits = [0u8; HEADER_BITS];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (value >> (HEADER_BITS - 1 - i)) & 1;
    }
    bits
}

/// The numeric value of decoded header bits, MSB first.
pub fn header_value(bits: &[u8]) -> usize {
    debug_assert_eq!(bits.len(), HEADER_BITS);
    bits.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize)
}

/// Probe one candidate: decode the header with the candidate itself as
/// the key and check self-consistency. Pure in `(channel, candidate)`.
fn probe(channel: &Channel, candidate: usize) -> bool {
    // The candidate must leave room for at least the header blocks.
    if channel.height() < candidate * 2 || channel.width() < candidate * 2 {
        return false;
    }
    let decomp = decompose(channel);
    if decomp.approx.height() < candidate || decomp.approx.width() < candidate {
        return false;
    }
    let padded = pad_to_block(&decomp.approx, candidate);
    if padded.total_blocks() < HEADER_BITS {
        return false;
    }

    let dct = Dct::new(candidate);
    let bits = codec::read_bits(&padded, &dct, HEADER_BITS);
    let value = header_value(&bits);
    trace!("block size probe {candidate}: header decodes to {value}");
    value == candidate
}

/// Detect the block size used for an embedding.
///
/// Tries every candidate in `range.min..=range.max` in ascending order and
/// returns the first whose decoded header equals the candidate itself, or
/// `range.fallback` if none matches.
#[cfg(not(feature = "parallel"))]
pub fn detect_block_size(channel: &Channel, range: &DetectRange) -> usize {
    debug!(
        "detecting block size over candidates {}..={}",
        range.min, range.max
    );
    for candidate in range.min..=range.max {
        if probe(channel, candidate) {
            debug!("detected block size {candidate}");
            return candidate;
        }
    }
    debug!("no candidate self-confirmed, falling back to {}", range.fallback);
    range.fallback
}

/// Detect the block size used for an embedding.
///
/// Probes run concurrently; the tie-break is still the smallest
/// self-confirming candidate, independent of completion order.
#[cfg(feature = "parallel")]
pub fn detect_block_size(channel: &Channel, range: &DetectRange) -> usize {
    debug!(
        "detecting block size over candidates {}..={} (parallel)",
        range.min, range.max
    );
    let detected = (range.min..=range.max)
        .into_par_iter()
        .filter(|&candidate| probe(channel, candidate))
        .min();
    match detected {
        Some(b) => {
            debug!("detected block size {b}");
            b
        }
        None => {
            debug!("no candidate self-confirmed, falling back to {}", range.fallback);
            range.fallback
        }
    }
}
