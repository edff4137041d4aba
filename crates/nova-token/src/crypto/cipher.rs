//! AES-256-CBC encryption and decryption of serialized token bodies.
//!
//! **Default IV derivation:** [`IvSource::KeyDerived`] reuses the first 16
//! bytes of the normalized key as the IV. Every token under one key therefore
//! shares an IV, and equal plaintext prefixes produce equal ciphertext
//! prefixes. This is the original wire format and stays the default.
//!
//! [`IvSource::Random`] draws a fresh IV per token from the OS CSPRNG and
//! prefixes it to the ciphertext. Tokens from the two sources are not
//! interchangeable: the decoder must be configured with the same source.

use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::Deserialize;
use thiserror::Error;

use crate::key::{TokenKey, IV_LEN};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Where the CBC initialization vector comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvSource {
    /// IV = first 16 bytes of the normalized key. Body is the bare ciphertext.
    #[default]
    KeyDerived,
    /// IV drawn at random per token. Body is `iv || ciphertext`.
    Random,
}

/// Errors produced by the crypto layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key or IV handed to the cipher or MAC has the wrong length.
    #[error("invalid key or IV length")]
    InvalidKeyLength,

    /// Ciphertext is not a whole number of blocks or its padding is invalid.
    #[error("invalid ciphertext or padding")]
    BadPadding,

    /// A random-IV body is too short to contain its IV.
    #[error("ciphertext shorter than its IV")]
    MissingIv,

    /// The OS random number generator failed.
    #[error("random number generator failure")]
    Rng,

    /// The MAC tag does not match the data.
    #[error("authentication tag mismatch")]
    BadTag,
}

/// Encrypt `plaintext` under `key` with AES-256-CBC and PKCS#7 padding.
///
/// # Errors
///
/// Returns [`CipherError::Rng`] if a random IV was requested and the OS
/// generator is unavailable.
pub fn encrypt(plaintext: &[u8], key: &TokenKey, iv_source: IvSource) -> Result<Vec<u8>, CipherError> {
    match iv_source {
        IvSource::KeyDerived => encrypt_with_iv(plaintext, key, key.iv()),
        IvSource::Random => {
            let mut iv = [0u8; IV_LEN];
            getrandom::fill(&mut iv).map_err(|_| CipherError::Rng)?;
            let ciphertext = encrypt_with_iv(plaintext, key, &iv)?;

            let mut body = Vec::with_capacity(IV_LEN + ciphertext.len());
            body.extend_from_slice(&iv);
            body.extend_from_slice(&ciphertext);
            Ok(body)
        }
    }
}

/// Decrypt a body produced by [`encrypt`] with the same `iv_source`.
///
/// # Errors
///
/// Returns [`CipherError::BadPadding`] if the ciphertext is not block aligned
/// or unpads incorrectly, and [`CipherError::MissingIv`] if a random-IV body
/// is shorter than its IV.
pub fn decrypt(body: &[u8], key: &TokenKey, iv_source: IvSource) -> Result<Vec<u8>, CipherError> {
    match iv_source {
        IvSource::KeyDerived => decrypt_with_iv(body, key, key.iv()),
        IvSource::Random => {
            if body.len() < IV_LEN {
                return Err(CipherError::MissingIv);
            }
            let (iv, ciphertext) = body.split_at(IV_LEN);
            decrypt_with_iv(ciphertext, key, iv)
        }
    }
}

fn encrypt_with_iv(plaintext: &[u8], key: &TokenKey, iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| CipherError::InvalidKeyLength)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with_iv(ciphertext: &[u8], key: &TokenKey, iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| CipherError::InvalidKeyLength)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::BadPadding)
}
