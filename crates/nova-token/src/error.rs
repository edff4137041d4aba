//! Error types for encoding, decoding, and configuration.
//!
//! Decoding has exactly one caller-visible failure, [`Rejected`]. The reason a
//! token was rejected is tracked internally as a [`RejectReason`] and only
//! ever reaches a `tracing` event, so callers cannot tell a tampered token
//! from one signed with a different key.

use thiserror::Error;

use crate::crypto::CipherError;

/// Failure to build a token from caller-supplied data.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The payload could not be serialized to JSON.
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The payload serialized to something other than a JSON object.
    #[error("payload must serialize to a JSON object")]
    NotAnObject,

    /// The crypto layer failed.
    #[error("token encryption failed: {0}")]
    Cipher(#[from] CipherError),
}

/// The uniform decode failure.
///
/// Returned for malformed input, bad signatures, undecryptable bodies,
/// invalid JSON, and expired tokens alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token rejected")]
pub struct Rejected;

/// Why a token was rejected. Internal; logged at `debug` level and dropped.
#[derive(Debug, Error)]
pub(crate) enum RejectReason {
    #[error("token is not valid base64")]
    Malformed,

    #[error("token decodes to {0} bytes, shorter than a tag")]
    TooShort(usize),

    #[error("signature mismatch")]
    BadSignature,

    #[error("body decryption failed: {0}")]
    Decrypt(CipherError),

    #[error("body is not valid JSON: {0}")]
    Deserialize(serde_json::Error),

    #[error("body is not a JSON object")]
    NotAnObject,

    #[error("expiry field is not a number")]
    InvalidExpiry,

    #[error("token expired at {expires_at}, current time is {now}")]
    Expired { expires_at: i64, now: i64 },

    #[error("payload does not match the requested claims type: {0}")]
    Claims(serde_json::Error),
}

/// Failure to load or validate [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment could not be read or deserialized.
    #[error("failed to load token settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The settings are individually valid but contradict each other.
    #[error("invalid token settings: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_carries_no_detail() {
        assert_eq!(Rejected.to_string(), "token rejected");
    }

    #[test]
    fn reject_reason_display_includes_times() {
        let reason = RejectReason::Expired {
            expires_at: 100,
            now: 101,
        };
        let shown = reason.to_string();
        assert!(shown.contains("100"));
        assert!(shown.contains("101"));
    }

    #[test]
    fn encode_error_wraps_cipher_error() {
        let e: EncodeError = CipherError::Rng.into();
        assert!(e.to_string().contains("random number generator"));
    }
}
