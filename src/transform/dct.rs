// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Orthonormal block DCT.
//!
//! Forward DCT-II and inverse DCT-III over one `N×N` block, separable
//! (rows then columns), with orthonormal weights `w(0) = sqrt(1/N)`,
//! `w(k>0) = sqrt(2/N)` so that forward and inverse are exact inverses
//! within floating-point tolerance. Each block is transformed
//! independently — there is no cross-block state.
//!
//! The block size is variable (the embedding layer supports 2–255), so the
//! cosine and weight tables live in a [`Dct`] plan built once per
//! embed/extract call instead of a fixed static table.

use std::f64::consts::PI;

/// A DCT plan for one block size: pre-computed cosine basis and
/// orthonormal weights.
#[derive(Debug, Clone)]
pub struct Dct {
    n: usize,
    /// `cos[u * n + x] = cos((2x + 1) * u * PI / (2n))`
    cos: Vec<f64>,
    /// `norm[0] = sqrt(1/n)`, `norm[u>0] = sqrt(2/n)`
    norm: Vec<f64>,
}

impl Dct {
    /// Build a plan for `n × n` blocks.
    pub fn new(n: usize) -> Self {
        debug_assert!(n >= 1);
        let mut cos = vec![0.0f64; n * n];
        for u in 0..n {
            for x in 0..n {
                cos[u * n + x] = ((2 * x + 1) as f64 * u as f64 * PI / (2.0 * n as f64)).cos();
            }
        }
        let mut norm = vec![(2.0 / n as f64).sqrt(); n];
        norm[0] = (1.0 / n as f64).sqrt();
        Self { n, cos, norm }
    }

    pub fn block_size(&self) -> usize {
        self.n
    }

    /// Forward 2-D DCT-II of one row-major `n*n` block.
    pub fn forward(&self, block: &[f64]) -> Vec<f64> {
        let n = self.n;
        debug_assert_eq!(block.len(), n * n);

        // Rows.
        let mut temp = vec![0.0f64; n * n];
        for r in 0..n {
            for u in 0..n {
                let mut sum = 0.0;
                for x in 0..n {
                    sum += block[r * n + x] * self.cos[u * n + x];
                }
                temp[r * n + u] = self.norm[u] * sum;
            }
        }

        // Columns.
        let mut out = vec![0.0f64; n * n];
        for c in 0..n {
            for u in 0..n {
                let mut sum = 0.0;
                for y in 0..n {
                    sum += temp[y * n + c] * self.cos[u * n + y];
                }
                out[u * n + c] = self.norm[u] * sum;
            }
        }
        out
    }

    /// Inverse 2-D DCT (DCT-III) of one row-major `n*n` frequency block.
    pub fn inverse(&self, block: &[f64]) -> Vec<f64> {
        let n = self.n;
        debug_assert_eq!(block.len(), n * n);

        // Columns.
        let mut temp = vec![0.0f64; n * n];
        for c in 0..n {
            for y in 0..n {
                let mut sum = 0.0;
                for u in 0..n {
                    sum += self.norm[u] * block[u * n + c] * self.cos[u * n + y];
                }
                temp[y * n + c] = sum;
            }
        }

        // Rows.
        let mut out = vec![0.0f64; n * n];
        for r in 0..n {
            for x in 0..n {
                let mut sum = 0.0;
                for u in 0..n {
                    sum += self.norm[u] * temp[r * n + u] * self.cos[u * n + x];
                }
                out[r * n + x] = sum;
            }
        }
        out
    }
}
