// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! # sigil-core
//!
//! Pure-Rust authentication watermarking engine. Embeds an RSA-signed
//! UTF-8 message into the wavelet domain of an image channel so that the
//! message and its signature can later be extracted and authenticated
//! without the original image.
//!
//! The codec works on the approximation subband of a single-level Haar
//! decomposition: the subband is tiled into square blocks, each block is
//! DCT-transformed, and one mid-frequency coefficient per block carries
//! one bit by sign. The block size itself is embedded as an 8-bit header,
//! so extraction can auto-detect it by probing candidate sizes until one
//! decodes its own value. The payload is a length-prefixed signature
//! followed by the terminator-delimited message.
//!
//! This is a fragile authentication watermark: any meaningful change to
//! the image breaks the signature check by design. It is not a robust
//! steganographic channel and makes no attempt to survive recompression
//! or geometric attack.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use sigil_core::{embed_signed, verify, BlockSelection, EmbedOptions, RsaSigner};
//! use sigil_core::io::{FsImageIo, ImageSink, ImageSource};
//!
//! let signer = RsaSigner::generate(2048).unwrap();
//! let img = FsImageIo.load("photo.png".as_ref()).unwrap();
//!
//! let marked = embed_signed(
//!     img.embed_channel(),
//!     "© 2026, all rights reserved",
//!     &signer,
//!     &EmbedOptions::default(),
//! ).unwrap();
//! FsImageIo.save("marked.png".as_ref(), &img.with_embed_channel(marked)).unwrap();
//!
//! let reloaded = FsImageIo.load("marked.png".as_ref()).unwrap();
//! let result = verify(
//!     reloaded.embed_channel(),
//!     &signer.verifier(),
//!     &BlockSelection::default(),
//! ).unwrap();
//! assert!(result.valid);
//! ```

pub mod crypto;
pub mod io;
pub mod transform;
pub mod wm;

pub use crypto::{CryptoError, RsaSigner, RsaVerifier, Signer, Verifier, DEFAULT_KEY_BITS};
pub use transform::Channel;
pub use wm::batch::{embed_batch, verify_batch};
pub use wm::capacity::{compute_capacity, fit_block_size, CapacityReport};
pub use wm::error::WatermarkError;
pub use wm::header::{detect_block_size, DetectRange};
pub use wm::message::RecoveredMessage;
pub use wm::pipeline::{
    embed, embed_signed, extract, verify, BlockSelection, EmbedOptions, Extraction, Verification,
};
pub use wm::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};
