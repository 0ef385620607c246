// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Single-level 2-D Haar wavelet decomposition.
//!
//! Splits one channel into an approximation subband plus horizontal,
//! vertical and diagonal detail subbands, each roughly half resolution per
//! axis, using the orthonormal Haar pair:
//!
//! ```text
//! low  = (even + odd) / sqrt(2)
//! high = (even - odd) / sqrt(2)
//! ```
//!
//! Odd-length axes are handled by symmetric extension of the trailing
//! sample, so subbands are `ceil(n/2)` long and the transform stays
//! losslessly invertible: the extended pair `(x, x)` produces
//! `high = 0`, and the inverse reproduces `x` exactly before the final
//! crop. [`reconstruct`] always crops to the original channel shape —
//! never pads — since the inverse of an odd axis overshoots by one sample.

use super::grid::Channel;

/// One level of 2-D Haar decomposition of a channel.
///
/// Owned exclusively by a single embed/extract operation. The embedding
/// layer mutates `approx` and leaves the detail subbands untouched, then
/// calls [`reconstruct`] to rebuild the channel.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Approximation (low-low) subband. This is where bits are embedded.
    pub approx: Channel,
    /// Horizontal detail (low-high).
    pub detail_h: Channel,
    /// Vertical detail (high-low).
    pub detail_v: Channel,
    /// Diagonal detail (high-high).
    pub detail_d: Channel,
    orig_height: usize,
    orig_width: usize,
}

impl Decomposition {
    /// Dimensions of the channel this decomposition came from.
    pub fn original_dimensions(&self) -> (usize, usize) {
        (self.orig_height, self.orig_width)
    }
}

const SQRT2: f32 = std::f32::consts::SQRT_2;

/// 1-D Haar analysis of one signal into (low, high) halves.
///
/// `out_low` and `out_high` must each hold `ceil(signal.len() / 2)`
/// samples. An odd trailing sample is paired with itself.
fn haar_forward_1d(signal: &[f32], out_low: &mut [f32], out_high: &mut [f32]) {
    let half = signal.len().div_ceil(2);
    debug_assert_eq!(out_low.len(), half);
    debug_assert_eq!(out_high.len(), half);

    for k in 0..half {
        let even = signal[2 * k];
        let odd = if 2 * k + 1 < signal.len() {
            signal[2 * k + 1]
        } else {
            even // symmetric extension
        };
        out_low[k] = (even + odd) / SQRT2;
        out_high[k] = (even - odd) / SQRT2;
    }
}

/// 1-D Haar synthesis; writes `min(out.len(), 2 * low.len())` samples.
fn haar_inverse_1d(low: &[f32], high: &[f32], out: &mut [f32]) {
    debug_assert_eq!(low.len(), high.len());

    for k in 0..low.len() {
        let even = (low[k] + high[k]) / SQRT2;
        let odd = (low[k] - high[k]) / SQRT2;
        out[2 * k] = even;
        if 2 * k + 1 < out.len() {
            out[2 * k + 1] = odd;
        }
    }
}

/// Decompose a channel into one level of Haar subbands.
pub fn decompose(channel: &Channel) -> Decomposition {
    let h = channel.height();
    let w = channel.width();
    let cw = w.div_ceil(2);
    let ch = h.div_ceil(2);

    // Row pass: full height, half width.
    let mut row_low = Channel::new(cw, h);
    let mut row_high = Channel::new(cw, h);
    let mut low = vec![0.0f32; cw];
    let mut high = vec![0.0f32; cw];
    for r in 0..h {
        haar_forward_1d(channel.row(r), &mut low, &mut high);
        for c in 0..cw {
            row_low.set(r, c, low[c]);
            row_high.set(r, c, high[c]);
        }
    }

    // Column pass on each half.
    let mut approx = Channel::new(cw, ch);
    let mut detail_h = Channel::new(cw, ch);
    let mut detail_v = Channel::new(cw, ch);
    let mut detail_d = Channel::new(cw, ch);

    let mut col = vec![0.0f32; h];
    let mut col_low = vec![0.0f32; ch];
    let mut col_high = vec![0.0f32; ch];
    for c in 0..cw {
        for r in 0..h {
            col[r] = row_low.get(r, c);
        }
        haar_forward_1d(&col, &mut col_low, &mut col_high);
        for r in 0..ch {
            approx.set(r, c, col_low[r]);
            detail_h.set(r, c, col_high[r]);
        }

        for r in 0..h {
            col[r] = row_high.get(r, c);
        }
        haar_forward_1d(&col, &mut col_low, &mut col_high);
        for r in 0..ch {
            detail_v.set(r, c, col_low[r]);
            detail_d.set(r, c, col_high[r]);
        }
    }

    Decomposition {
        approx,
        detail_h,
        detail_v,
        detail_d,
        orig_height: h,
        orig_width: w,
    }
}

/// Rebuild the channel from a (possibly modified) decomposition.
///
/// Output is cropped to the original channel dimensions.
pub fn reconstruct(decomp: &Decomposition) -> Channel {
    let h = decomp.orig_height;
    let w = decomp.orig_width;
    let ch = decomp.approx.height();
    let cw = decomp.approx.width();

    // Inverse column pass: back to full height, half width.
    let mut row_low = Channel::new(cw, h);
    let mut row_high = Channel::new(cw, h);

    let mut low = vec![0.0f32; ch];
    let mut high = vec![0.0f32; ch];
    let mut out_col = vec![0.0f32; h];
    for c in 0..cw {
        for r in 0..ch {
            low[r] = decomp.approx.get(r, c);
            high[r] = decomp.detail_h.get(r, c);
        }
        haar_inverse_1d(&low, &high, &mut out_col);
        for r in 0..h {
            row_low.set(r, c, out_col[r]);
        }

        for r in 0..ch {
            low[r] = decomp.detail_v.get(r, c);
            high[r] = decomp.detail_d.get(r, c);
        }
        haar_inverse_1d(&low, &high, &mut out_col);
        for r in 0..h {
            row_high.set(r, c, out_col[r]);
        }
    }

    // Inverse row pass, cropped to the original width.
    let mut out = Channel::new(w, h);
    let mut out_row = vec![0.0f32; w];
    for r in 0..h {
        haar_inverse_1d(row_low.row(r), row_high.row(r), &mut out_row);
        for c in 0..w {
            out.set(r, c, out_row[c]);
        }
    }
    out
}
