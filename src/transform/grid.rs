// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Sample grids and block partitioning.
//!
//! Provides [`Channel`] for storing one image channel (or one wavelet
//! subband) as a flat row-major grid of f32 samples, and [`PaddedSubband`]
//! for a channel padded to an exact multiple of the block size with
//! symmetric (mirror) boundary extension.
//!
//! Storage is f32; per-block transform math is done in f64 (see
//! `transform::dct`). Pixel values are 0–255 on input, so the 23-bit f32
//! mantissa loses nothing that matters at the embedding magnitudes in use.

/// One image channel or wavelet subband: a 2-D grid of f32 samples.
///
/// Samples are stored row-major: index = `row * width + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Channel {
    /// Create a new channel initialized to zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0f32; width * height],
        }
    }

    /// Create a channel from existing row-major samples.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height, "sample count mismatch");
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get a sample value.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[self.index(row, col)]
    }

    /// Set a sample value.
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        let idx = self.index(row, col);
        self.data[idx] = val;
    }

    /// Read-only access to one row.
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// Raw read-only access to all samples in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw mutable access to all samples in row-major order.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height, "row {row} >= {}", self.height);
        debug_assert!(col < self.width, "col {col} >= {}", self.width);
        row * self.width + col
    }
}

/// A subband padded so both dimensions are exact multiples of `block_size`.
///
/// Padding uses symmetric (mirror-including-edge) extension on the bottom
/// and right: pad row `h + i` repeats source row `h - 1 - i`. The pad
/// amounts are always in `[0, block_size)`, so [`PaddedSubband::unpad`] is
/// the exact left inverse of [`pad_to_block`].
///
/// Blocks are addressed `(block_row, block_col)`; the row-major scan over
/// all blocks defines the canonical bit order for embedding.
#[derive(Debug, Clone)]
pub struct PaddedSubband {
    grid: Channel,
    block_size: usize,
    pad_rows: usize,
    pad_cols: usize,
}

/// Pad a subband to a multiple of `block_size` with symmetric extension.
///
/// The caller must ensure both subband dimensions are at least
/// `block_size`; the mirror extension reads that far back from the edge.
pub fn pad_to_block(subband: &Channel, block_size: usize) -> PaddedSubband {
    debug_assert!(block_size >= 1);
    debug_assert!(
        subband.height() >= block_size && subband.width() >= block_size,
        "subband {}x{} smaller than block size {block_size}",
        subband.height(),
        subband.width()
    );

    let h = subband.height();
    let w = subband.width();
    let pad_rows = (block_size - h % block_size) % block_size;
    let pad_cols = (block_size - w % block_size) % block_size;

    let ph = h + pad_rows;
    let pw = w + pad_cols;
    let mut grid = Channel::new(pw, ph);

    for row in 0..ph {
        // Mirror row index: rows past the edge reflect back including the edge.
        let src_row = if row < h { row } else { h - 1 - (row - h) };
        for col in 0..pw {
            let src_col = if col < w { col } else { w - 1 - (col - w) };
            grid.set(row, col, subband.get(src_row, src_col));
        }
    }

    PaddedSubband {
        grid,
        block_size,
        pad_rows,
        pad_cols,
    }
}

impl PaddedSubband {
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks vertically.
    pub fn blocks_tall(&self) -> usize {
        self.grid.height() / self.block_size
    }

    /// Number of blocks horizontally.
    pub fn blocks_wide(&self) -> usize {
        self.grid.width() / self.block_size
    }

    /// Total number of blocks.
    pub fn total_blocks(&self) -> usize {
        self.blocks_tall() * self.blocks_wide()
    }

    /// Copy the block at `(block_row, block_col)` into an f64 buffer of
    /// `block_size * block_size` samples in row-major order.
    pub fn block(&self, block_row: usize, block_col: usize) -> Vec<f64> {
        let n = self.block_size;
        debug_assert!(block_row < self.blocks_tall());
        debug_assert!(block_col < self.blocks_wide());

        let mut out = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                out.push(self.grid.get(block_row * n + r, block_col * n + c) as f64);
            }
        }
        out
    }

    /// Write an f64 buffer back into the block at `(block_row, block_col)`.
    pub fn write_block(&mut self, block_row: usize, block_col: usize, samples: &[f64]) {
        let n = self.block_size;
        debug_assert_eq!(samples.len(), n * n);

        for r in 0..n {
            for c in 0..n {
                self.grid
                    .set(block_row * n + r, block_col * n + c, samples[r * n + c] as f32);
            }
        }
    }

    /// Drop the padding, recovering the original subband shape.
    pub fn unpad(self) -> Channel {
        let h = self.grid.height() - self.pad_rows;
        let w = self.grid.width() - self.pad_cols;

        if self.pad_rows == 0 && self.pad_cols == 0 {
            return self.grid;
        }

        let mut out = Channel::new(w, h);
        for row in 0..h {
            for col in 0..w {
                out.set(row, col, self.grid.get(row, col));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Channel {
        let data = (0..width * height).map(|i| i as f32).collect();
        Channel::from_vec(width, height, data)
    }

    #[test]
    fn channel_get_set() {
        let mut ch = Channel::new(4, 3);
        assert_eq!(ch.width(), 4);
        assert_eq!(ch.height(), 3);
        assert_eq!(ch.get(2, 3), 0.0);

        ch.set(1, 2, 42.0);
        assert_eq!(ch.get(1, 2), 42.0);
        assert_eq!(ch.get(1, 1), 0.0);
    }

    #[test]
    fn pad_exact_multiple_is_noop() {
        let ch = ramp(8, 8);
        let padded = pad_to_block(&ch, 4);
        assert_eq!(padded.blocks_tall(), 2);
        assert_eq!(padded.blocks_wide(), 2);
        assert_eq!(padded.total_blocks(), 4);
        assert_eq!(padded.unpad(), ch);
    }

    #[test]
    fn pad_unpad_roundtrip_all_shapes() {
        // Padding then unpadding must be the identity for every pad amount.
        for block_size in [1usize, 2, 3, 5, 8] {
            for extra_h in 0..block_size {
                for extra_w in 0..block_size {
                    let h = block_size + extra_h;
                    let w = block_size + extra_w;
                    let ch = ramp(w, h);
                    let padded = pad_to_block(&ch, block_size);
                    assert_eq!(padded.grid.height() % block_size, 0);
                    assert_eq!(padded.grid.width() % block_size, 0);
                    assert_eq!(padded.unpad(), ch, "b={block_size} h={h} w={w}");
                }
            }
        }
    }

    #[test]
    fn pad_values_mirror_edge() {
        // 3x3 ramp padded to 4x4: pad row repeats row 2, pad col repeats col 2.
        let ch = ramp(3, 3);
        let padded = pad_to_block(&ch, 4);
        assert_eq!(padded.grid.get(3, 0), ch.get(2, 0));
        assert_eq!(padded.grid.get(3, 1), ch.get(2, 1));
        assert_eq!(padded.grid.get(0, 3), ch.get(0, 2));
        // Corner mirrors both axes.
        assert_eq!(padded.grid.get(3, 3), ch.get(2, 2));
    }

    #[test]
    fn block_read_write_roundtrip() {
        let ch = ramp(8, 8);
        let mut padded = pad_to_block(&ch, 4);

        let block = padded.block(1, 1);
        assert_eq!(block.len(), 16);
        assert_eq!(block[0], ch.get(4, 4) as f64);
        assert_eq!(block[15], ch.get(7, 7) as f64);

        let mut modified = block.clone();
        modified[5] = -99.0;
        padded.write_block(1, 1, &modified);
        assert_eq!(padded.block(1, 1)[5], -99.0);
        // Other blocks untouched.
        assert_eq!(padded.block(0, 0), pad_to_block(&ch, 4).block(0, 0));
    }

    #[test]
    fn block_scan_order_is_row_major() {
        let ch = ramp(6, 4);
        let padded = pad_to_block(&ch, 2);
        assert_eq!(padded.blocks_tall(), 2);
        assert_eq!(padded.blocks_wide(), 3);
        // Block (1, 0) starts at sample row 2, col 0.
        assert_eq!(padded.block(1, 0)[0], ch.get(2, 0) as f64);
        assert_eq!(padded.block(0, 2)[0], ch.get(0, 4) as f64);
    }
}
