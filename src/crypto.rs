// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Message signing and verification.
//!
//! The watermark codec treats signing as an opaque capability: anything
//! implementing [`Signer`] / [`Verifier`] over raw message bytes works.
//! The shipped implementation is RSA with PSS padding over a SHA-256
//! digest ([`RsaSigner`] / [`RsaVerifier`]), with PEM key files: PKCS#8
//! for the private key, SPKI for the public key. Serialized private-key
//! material is held in `Zeroizing` buffers so it is wiped on drop.

use std::fmt;
use std::path::Path;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Default RSA modulus size in bits. Produces 256-byte signatures.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Signs message bytes, producing a fixed-size signature.
pub trait Signer {
    /// Sign the given message bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Length in bytes of every signature this signer produces.
    fn signature_len(&self) -> usize;
}

/// Verifies a signature against message bytes.
///
/// A mismatch is an expected outcome, not an error, so verification
/// returns a plain bool.
pub trait Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

/// Errors from key handling or signing.
#[derive(Debug)]
pub enum CryptoError {
    /// RSA key generation or signing failed.
    Rsa(rsa::Error),
    /// Private key (de)serialization failed.
    Pkcs8(rsa::pkcs8::Error),
    /// Public key (de)serialization failed.
    Spki(rsa::pkcs8::spki::Error),
    /// A key file could not be read or written.
    Io(std::io::Error),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa(e) => write!(f, "RSA failure: {e}"),
            Self::Pkcs8(e) => write!(f, "private key format error: {e}"),
            Self::Spki(e) => write!(f, "public key format error: {e}"),
            Self::Io(e) => write!(f, "key file I/O error: {e}"),
        }
    }
}

impl std::error::Error for CryptoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rsa(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rsa::Error> for CryptoError {
    fn from(e: rsa::Error) -> Self {
        Self::Rsa(e)
    }
}

impl From<rsa::pkcs8::Error> for CryptoError {
    fn from(e: rsa::pkcs8::Error) -> Self {
        Self::Pkcs8(e)
    }
}

impl From<rsa::pkcs8::spki::Error> for CryptoError {
    fn from(e: rsa::pkcs8::spki::Error) -> Self {
        Self::Spki(e)
    }
}

impl From<std::io::Error> for CryptoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// RSA-PSS signer over a SHA-256 message digest.
#[derive(Clone)]
pub struct RsaSigner {
    key: RsaPrivateKey,
}

impl RsaSigner {
    /// Generate a fresh keypair with the given modulus size.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        let key = RsaPrivateKey::new(&mut rand::thread_rng(), bits)?;
        Ok(Self { key })
    }

    /// Parse a PKCS#8 PEM private key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, CryptoError> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)?;
        Ok(Self { key })
    }

    /// Load a PKCS#8 PEM private key from a file.
    pub fn from_pem_file(path: &Path) -> Result<Self, CryptoError> {
        let pem = Zeroizing::new(std::fs::read_to_string(path)?);
        Self::from_pkcs8_pem(&pem)
    }

    /// Serialize the private key as PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<Zeroizing<String>, CryptoError> {
        Ok(self.key.to_pkcs8_pem(LineEnding::LF)?)
    }

    /// Write the private key to a PKCS#8 PEM file.
    pub fn save_pem_file(&self, path: &Path) -> Result<(), CryptoError> {
        let pem = self.to_pkcs8_pem()?;
        std::fs::write(path, pem.as_bytes())?;
        Ok(())
    }

    /// The matching verifier.
    pub fn verifier(&self) -> RsaVerifier {
        RsaVerifier {
            key: self.key.to_public_key(),
        }
    }
}

impl Signer for RsaSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = Sha256::digest(message);
        let sig = self
            .key
            .sign_with_rng(&mut rand::thread_rng(), Pss::new::<Sha256>(), &digest)?;
        Ok(sig)
    }

    fn signature_len(&self) -> usize {
        self.key.size()
    }
}

/// RSA-PSS verifier over a SHA-256 message digest.
#[derive(Clone)]
pub struct RsaVerifier {
    key: RsaPublicKey,
}

impl RsaVerifier {
    /// Parse an SPKI PEM public key.
    pub fn from_public_key_pem(pem: &str) -> Result<Self, CryptoError> {
        let key = RsaPublicKey::from_public_key_pem(pem)?;
        Ok(Self { key })
    }

    /// Load an SPKI PEM public key from a file.
    pub fn from_pem_file(path: &Path) -> Result<Self, CryptoError> {
        let pem = std::fs::read_to_string(path)?;
        Self::from_public_key_pem(&pem)
    }

    /// Serialize the public key as SPKI PEM.
    pub fn to_public_key_pem(&self) -> Result<String, CryptoError> {
        Ok(self.key.to_public_key_pem(LineEnding::LF)?)
    }

    /// Write the public key to an SPKI PEM file.
    pub fn save_pem_file(&self, path: &Path) -> Result<(), CryptoError> {
        std::fs::write(path, self.to_public_key_pem()?)?;
        Ok(())
    }

    pub fn signature_len(&self) -> usize {
        self.key.size()
    }
}

impl Verifier for RsaVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let digest = Sha256::digest(message);
        self.key
            .verify(Pss::new::<Sha256>(), &digest, signature)
            .is_ok()
    }
}
