// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Transform layer: sample grids, Haar wavelet decomposition and the
//! orthonormal block DCT.
//!
//! This layer knows nothing about payloads or signatures; it only moves
//! samples between the pixel domain, the wavelet domain and the per-block
//! frequency domain. The embedding layer (`wm`) drives it.

pub mod dct;
pub mod dwt;
pub mod grid;

pub use dct::Dct;
pub use dwt::{decompose, reconstruct, Decomposition};
pub use grid::{pad_to_block, Channel, PaddedSubband};
