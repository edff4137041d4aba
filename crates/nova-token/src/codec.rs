//! [`TokenCodec`]: JSON payload ⇄ signed, optionally encrypted token text.
//!
//! # Token format
//!
//! ```text
//! token = base64(body || HMAC-SHA256(key32, body))
//! body  = AES-256-CBC(key32, iv, json)    Mode::Encrypted
//!       | json                            Mode::SignOnly
//! ```
//!
//! When a timeout is requested the encoder stores the expiry, in epoch
//! seconds, under the reserved payload field [`EXPIRY_FIELD`]. The decoder
//! accepts the token while `now <= t`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::crypto::{cipher, mac, IvSource, TAG_LEN};
use crate::error::{EncodeError, RejectReason, Rejected};
use crate::key::TokenKey;

/// A token payload: a JSON object owned by the caller.
pub type Payload = serde_json::Map<String, Value>;

/// Reserved payload field holding the expiry in epoch seconds.
pub const EXPIRY_FIELD: &str = "t";

/// Whether token bodies are encrypted before signing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Encrypt the JSON body, then sign the ciphertext.
    #[default]
    Encrypted,
    /// Sign the JSON body as-is. The payload is readable by anyone.
    SignOnly,
}

/// Stateless token encoder/decoder.
///
/// Holds only its [`Settings`] and a [`Clock`]; safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct TokenCodec<C = SystemClock> {
    settings: Settings,
    clock: C,
}

impl TokenCodec<SystemClock> {
    /// A codec with default [`Settings`] reading the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec with the given settings reading the system clock.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> TokenCodec<C> {
    /// A codec with default [`Settings`] reading `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            settings: Settings::default(),
            clock,
        }
    }

    /// Replace the settings, keeping the clock.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Use `iv_source` for encrypted bodies.
    pub fn iv_source(mut self, iv_source: IvSource) -> Self {
        self.settings.iv_source = iv_source;
        self
    }

    /// The settings this codec applies to [`encode`](Self::encode) and
    /// [`decode`](Self::decode).
    pub fn current_settings(&self) -> &Settings {
        &self.settings
    }

    /// Encode `payload` using the configured timeout and mode.
    pub fn encode(&self, payload: Payload, key: &[u8]) -> Result<String, EncodeError> {
        self.encode_with(payload, key, self.settings.timeout_minutes, self.settings.mode)
    }

    /// Encode `payload` under `key`.
    ///
    /// A non-zero `timeout_minutes` overwrites any existing `t` field with
    /// `now + timeout_minutes * 60`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the payload cannot be serialized or the
    /// random IV source fails.
    pub fn encode_with(
        &self,
        mut payload: Payload,
        key: &[u8],
        timeout_minutes: u32,
        mode: Mode,
    ) -> Result<String, EncodeError> {
        let key = TokenKey::normalize(key);

        let expires_at = (timeout_minutes > 0)
            .then(|| self.clock.now().saturating_add(i64::from(timeout_minutes) * 60));
        if let Some(t) = expires_at {
            payload.insert(EXPIRY_FIELD.to_owned(), Value::from(t));
        }

        let json = serde_json::to_vec(&payload)?;
        let body = match mode {
            Mode::Encrypted => cipher::encrypt(&json, &key, self.settings.iv_source)?,
            Mode::SignOnly => json,
        };
        let tag = mac::sign(&body, &key)?;

        let mut token = body;
        token.extend_from_slice(&tag);

        trace!(?mode, ?expires_at, "token encoded");
        Ok(STANDARD.encode(token))
    }

    /// Encode any value that serializes to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::NotAnObject`] if `claims` serializes to anything
    /// other than an object, and [`EncodeError::Serialize`] if serde fails.
    pub fn encode_claims<T: Serialize + ?Sized>(
        &self,
        claims: &T,
        key: &[u8],
        timeout_minutes: u32,
        mode: Mode,
    ) -> Result<String, EncodeError> {
        match serde_json::to_value(claims)? {
            Value::Object(payload) => self.encode_with(payload, key, timeout_minutes, mode),
            _ => Err(EncodeError::NotAnObject),
        }
    }

    /// Decode `token` using the configured mode.
    pub fn decode(&self, token: &str, key: &[u8]) -> Result<Payload, Rejected> {
        self.decode_with(token, key, self.settings.mode)
    }

    /// Verify, decrypt, and expiry-check `token` under `key`.
    ///
    /// Every failure yields the same [`Rejected`]; the reason is logged at
    /// `debug` level only.
    pub fn decode_with(&self, token: &str, key: &[u8], mode: Mode) -> Result<Payload, Rejected> {
        self.open(token, key, mode).map_err(reject)
    }

    /// Decode `token` and deserialize the payload into `T`.
    ///
    /// A payload that does not fit `T` is rejected like any other bad token.
    pub fn decode_claims<T: DeserializeOwned>(
        &self,
        token: &str,
        key: &[u8],
        mode: Mode,
    ) -> Result<T, Rejected> {
        let payload = self.decode_with(token, key, mode)?;
        serde_json::from_value(Value::Object(payload))
            .map_err(|e| reject(RejectReason::Claims(e)))
    }

    fn open(&self, token: &str, key: &[u8], mode: Mode) -> Result<Payload, RejectReason> {
        let key = TokenKey::normalize(key);

        let raw = STANDARD.decode(token).map_err(|_| RejectReason::Malformed)?;
        if raw.len() < TAG_LEN {
            return Err(RejectReason::TooShort(raw.len()));
        }
        let (body, tag) = raw.split_at(raw.len() - TAG_LEN);

        mac::verify(body, tag, &key).map_err(|_| RejectReason::BadSignature)?;

        let json = match mode {
            Mode::Encrypted => {
                cipher::decrypt(body, &key, self.settings.iv_source).map_err(RejectReason::Decrypt)?
            }
            Mode::SignOnly => body.to_vec(),
        };

        let payload = match serde_json::from_slice::<Value>(&json).map_err(RejectReason::Deserialize)? {
            Value::Object(payload) => payload,
            _ => return Err(RejectReason::NotAnObject),
        };

        self.check_expiry(&payload)?;
        Ok(payload)
    }

    fn check_expiry(&self, payload: &Payload) -> Result<(), RejectReason> {
        let t = match payload.get(EXPIRY_FIELD) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Number(t)) => t,
            Some(_) => return Err(RejectReason::InvalidExpiry),
        };

        let now = self.clock.now();
        let expired = match (t.as_i64(), t.as_f64()) {
            (Some(t), _) => now > t,
            // Beyond i64::MAX: never reached.
            (None, _) if t.is_u64() => false,
            (None, Some(t)) => now as f64 > t,
            (None, None) => true,
        };

        if expired {
            return Err(RejectReason::Expired {
                expires_at: t.as_i64().unwrap_or_else(|| t.as_f64().unwrap_or_default() as i64),
                now,
            });
        }
        Ok(())
    }
}

fn reject(reason: RejectReason) -> Rejected {
    debug!(reason = %reason, "token rejected");
    Rejected
}
