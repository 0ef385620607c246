// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Tolerant message recovery.
//!
//! The message part of a recovered payload spans the full remaining
//! extraction capacity, so it usually carries trailing noise past the
//! true message. Recovery is best-effort by policy: showing a truncated
//! but valid message beats failing outright, since the terminator is the
//! only delimiter.
//!
//! 1. If a terminator (four consecutive zero bytes) exists, the message
//!    is everything before the *first* one — defined behavior even when
//!    the message bytes themselves happen to contain a four-zero run.
//! 2. Without a terminator (capacity-truncated message), the message is
//!    the longest strict-UTF-8 prefix, stopped early at the first zero
//!    byte — a lone zero is read as the start of a truncated terminator,
//!    not as message content.

use super::payload::TERMINATOR;

/// A message recovered from the payload remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredMessage {
    /// The recovered text (possibly truncated, always valid UTF-8).
    pub text: String,
    /// Whether a terminator was found. `false` means the message was cut
    /// off by the capacity limit before the terminator could be written.
    pub terminated: bool,
    /// Whether the message bytes decoded as UTF-8 without loss. `false`
    /// means `text` is the longest valid prefix of corrupted data.
    pub clean: bool,
}

impl RecoveredMessage {
    /// The exact bytes the recovered text covers — what a signature over
    /// the original message must be checked against.
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Offset of the first four-zero-byte run, if any.
fn find_terminator(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(TERMINATOR.len())
        .position(|w| w == TERMINATOR)
}

/// Longest strict-UTF-8 prefix, stopped at the first zero byte.
fn longest_valid_prefix(bytes: &[u8]) -> &str {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let candidate = &bytes[..end];
    match core::str::from_utf8(candidate) {
        Ok(s) => s,
        // valid_up_to() is exactly where a byte-at-a-time grow would stop.
        Err(e) => core::str::from_utf8(&candidate[..e.valid_up_to()]).unwrap(),
    }
}

/// Recover the message text from the payload remainder after the
/// signature.
pub fn recover_message(message_bytes: &[u8]) -> RecoveredMessage {
    match find_terminator(message_bytes) {
        Some(k) => {
            let body = &message_bytes[..k];
            match core::str::from_utf8(body) {
                Ok(s) => RecoveredMessage {
                    text: s.to_owned(),
                    terminated: true,
                    clean: true,
                },
                Err(_) => RecoveredMessage {
                    text: longest_valid_prefix(body).to_owned(),
                    terminated: true,
                    clean: false,
                },
            }
        }
        None => {
            let prefix = longest_valid_prefix(message_bytes);
            RecoveredMessage {
                // Truncation is not corruption: the prefix itself is clean
                // unless it stopped short of a zero byte on invalid UTF-8.
                clean: prefix.len()
                    == message_bytes
                        .iter()
                        .position(|&b| b == 0)
                        .unwrap_or(message_bytes.len()),
                text: prefix.to_owned(),
                terminated: false,
            }
        }
    }
}
