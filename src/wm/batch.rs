// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Batch embedding and verification.
//!
//! A batch is an embarrassingly parallel map over independent images.
//! The signature is computed once per batch and reused — it covers the
//! message only, never per-image data. Each item gets its own
//! disposition; one failing image never aborts the rest. Output order
//! always matches input order, also under the `parallel` feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::error::WatermarkError;
use super::pipeline::{self, BlockSelection, EmbedOptions, Verification};
use crate::crypto::{Signer, Verifier};
use crate::transform::Channel;

/// Embed the same signed message into every channel.
///
/// The outer `Result` covers the one-time signing step; the inner results
/// are the per-item dispositions.
pub fn embed_batch(
    channels: &[Channel],
    message: &str,
    signer: &dyn Signer,
    opts: &EmbedOptions,
) -> Result<Vec<Result<Channel, WatermarkError>>, WatermarkError> {
    // One signature for the whole batch.
    let signature = signer.sign(message.as_bytes())?;

    #[cfg(feature = "parallel")]
    let results = channels
        .par_iter()
        .map(|channel| pipeline::embed(channel, message, &signature, opts))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = channels
        .iter()
        .map(|channel| pipeline::embed(channel, message, &signature, opts))
        .collect();

    Ok(results)
}

/// Extract and verify every channel, one disposition per item.
pub fn verify_batch<V: Verifier + Sync>(
    channels: &[Channel],
    verifier: &V,
    selection: &BlockSelection,
) -> Vec<Result<Verification, WatermarkError>> {
    #[cfg(feature = "parallel")]
    {
        channels
            .par_iter()
            .map(|channel| pipeline::verify(channel, verifier, selection))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        channels
            .iter()
            .map(|channel| pipeline::verify(channel, verifier, selection))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::RsaSigner;

    fn test_channel(side: usize) -> Channel {
        let data = (0..side * side)
            .map(|i| 90.0 + ((i * 29 + 7) % 101) as f32)
            .collect();
        Channel::from_vec(side, side, data)
    }

    #[test]
    fn failing_item_leaves_others_intact() {
        let signer = RsaSigner::generate(1024).unwrap();
        // The middle channel is far too small for the 128-byte signature.
        let channels = vec![test_channel(768), test_channel(64), test_channel(768)];

        let results =
            embed_batch(&channels, "batch message", &signer, &EmbedOptions::default()).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(WatermarkError::CapacityExceeded { .. })
        ));
        assert!(results[2].is_ok());

        // The successful items verify, in order.
        let marked: Vec<Channel> = results
            .into_iter()
            .filter_map(|r| r.ok())
            .collect();
        let verifier = signer.verifier();
        let verdicts = verify_batch(&marked, &verifier, &BlockSelection::Explicit(8));
        assert_eq!(verdicts.len(), 2);
        for verdict in verdicts {
            let v = verdict.unwrap();
            assert!(v.valid);
            assert_eq!(v.message.text, "batch message");
        }
    }
}
