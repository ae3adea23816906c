//! The crate's only `std::error::Error` type: setup-time failures. Stream
//! exhaustion and parser mismatches are never represented as `Err` — see
//! `Status` and `Option<Key>` respectively.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrError {
    #[error("{0}: not a recognized AU file")]
    NotAnAuFile(String),
    #[error("{0}: unsupported AU encoding {1} (expected 16-bit linear PCM)")]
    UnsupportedEncoding(String, u32),
    #[error("{path}: expected {expected} channel(s), found {found}")]
    WrongChannelCount { path: String, expected: u32, found: u32 },
    #[error("failed to open audio device: {0}")]
    DeviceOpen(String),
    #[error("{0}: malformed layout entry: {1}")]
    LayoutParse(String, String),
}
