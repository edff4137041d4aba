//! HMAC-SHA256 tags over token bodies.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::cipher::CipherError;
use crate::key::TokenKey;

type HmacSha256 = Hmac<Sha256>;

/// Byte length of an HMAC-SHA256 tag.
pub const TAG_LEN: usize = 32;

/// Compute the tag for `data` under `key`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if the MAC rejects the key,
/// which HMAC never does for a 32-byte key.
pub fn sign(data: &[u8], key: &TokenKey) -> Result<[u8; TAG_LEN], CipherError> {
    let mut mac = keyed(key)?;
    mac.update(data);
    let out = mac.finalize().into_bytes();

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&out);
    Ok(tag)
}

/// Check `tag` against `data` in constant time.
///
/// # Errors
///
/// Returns [`CipherError::BadTag`] on any mismatch, including a tag of the
/// wrong length.
pub fn verify(data: &[u8], tag: &[u8], key: &TokenKey) -> Result<(), CipherError> {
    let mut mac = keyed(key)?;
    mac.update(data);
    mac.verify_slice(tag).map_err(|_| CipherError::BadTag)
}

fn keyed(key: &TokenKey) -> Result<HmacSha256, CipherError> {
    <HmacSha256 as Mac>::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify() {
        let key = TokenKey::normalize(b"secret");
        let tag = sign(b"body", &key).unwrap();
        assert!(verify(b"body", &tag, &key).is_ok());
    }

    #[test]
    fn rfc4231_case_2() {
        // Key "Jefe" zero-padded to 32 bytes is the same HMAC key as "Jefe".
        let key = TokenKey::normalize(b"Jefe");
        let tag = sign(b"what do ya want for nothing?", &key).unwrap();
        let expected = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(tag, expected);
    }

    #[test]
    fn modified_data_fails() {
        let key = TokenKey::normalize(b"secret");
        let tag = sign(b"body", &key).unwrap();
        assert!(matches!(verify(b"bodY", &tag, &key), Err(CipherError::BadTag)));
    }

    #[test]
    fn truncated_tag_fails() {
        let key = TokenKey::normalize(b"secret");
        let tag = sign(b"body", &key).unwrap();
        assert!(verify(b"body", &tag[..31], &key).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let tag = sign(b"body", &TokenKey::normalize(b"k1")).unwrap();
        assert!(verify(b"body", &tag, &TokenKey::normalize(b"k2")).is_err());
    }
}
