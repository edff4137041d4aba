//! Compact signed, optionally encrypted, JSON tokens.
//!
//! A payload object is serialized to JSON, optionally encrypted with
//! AES-256-CBC, tagged with HMAC-SHA256, and base64-encoded into a single
//! string. Decoding verifies the tag before anything else, then decrypts,
//! parses, and enforces the optional expiry stored under `t`.
//!
//! ```
//! use nova_token::{decode, encode, Mode};
//! use serde_json::json;
//!
//! let payload = json!({"user": "alice"}).as_object().cloned().unwrap();
//! let token = encode(payload.clone(), b"my secret", 30, Mode::Encrypted).unwrap();
//!
//! let decoded = decode(&token, b"my secret", Mode::Encrypted).unwrap();
//! assert_eq!(decoded["user"], "alice");
//! assert!(decode(&token, b"wrong secret", Mode::Encrypted).is_err());
//! ```
//!
//! # Security notes
//!
//! With the default [`IvSource::KeyDerived`] the CBC IV is the first 16 bytes
//! of the key, so every encrypted token under one key shares an IV. Equal
//! payload prefixes are visible as equal ciphertext prefixes.
//! [`IvSource::Random`] avoids this at the cost of 16 bytes per token and
//! wire incompatibility with key-derived tokens.

pub mod clock;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod key;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{Mode, Payload, TokenCodec, EXPIRY_FIELD};
pub use config::Settings;
pub use crypto::{CipherError, IvSource};
pub use error::{ConfigError, EncodeError, Rejected};
pub use key::{TokenKey, KEY_LEN};

/// Encode `payload` under `key` with the system clock and default settings.
///
/// `timeout_minutes == 0` produces a token that never expires.
///
/// # Errors
///
/// Returns [`EncodeError`] if the payload cannot be serialized.
pub fn encode(
    payload: Payload,
    key: &[u8],
    timeout_minutes: u32,
    mode: Mode,
) -> Result<String, EncodeError> {
    TokenCodec::new().encode_with(payload, key, timeout_minutes, mode)
}

/// Decode `token` under `key` with the system clock and default settings.
///
/// Total over all inputs: every rejection is the same [`Rejected`].
pub fn decode(token: &str, key: &[u8], mode: Mode) -> Result<Payload, Rejected> {
    TokenCodec::new().decode_with(token, key, mode)
}
