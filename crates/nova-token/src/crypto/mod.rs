//! Cipher and MAC primitives for token bodies.
//!
//! This module knows nothing about JSON, base64, or expiry. It provides the
//! byte-level operations used by the codec layer.
//!
//! # Body format
//!
//! ```text
//! AES-256-CBC-PKCS7(key32, iv = key32[0..16], plaintext)          KeyDerived
//! iv16 || AES-256-CBC-PKCS7(key32, iv16, plaintext)                Random
//! ```
//!
//! The HMAC-SHA256 tag is always computed over the whole body.

pub mod cipher;
pub mod mac;

pub use cipher::{CipherError, IvSource};
pub use mac::TAG_LEN;
