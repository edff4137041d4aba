//! [`TokenKey`]: the fixed-length secret every token operation runs on.
//!
//! Callers hand in keys of any length. Before use they are normalized to
//! exactly [`KEY_LEN`] bytes: shorter keys are right-padded with `0x00`,
//! longer keys are truncated to their first [`KEY_LEN`] bytes. The same
//! normalized key drives the cipher, the key-derived IV, and the MAC.

/// Byte length of a normalized key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the AES block, and therefore of every IV.
pub const IV_LEN: usize = 16;

/// A normalized 32-byte token key.
///
/// Created per call and dropped when the call returns. When this type is
/// dropped, the memory is overwritten with zeroes.
#[derive(Clone)]
pub struct TokenKey(Box<[u8; KEY_LEN]>);

impl TokenKey {
    /// Normalize an arbitrary-length secret to a [`TokenKey`].
    ///
    /// Never fails: `b""` becomes 32 zero bytes, a 1000-byte secret keeps
    /// only its first 32 bytes.
    pub fn normalize(raw: &[u8]) -> Self {
        let mut buf = Box::new([0u8; KEY_LEN]);
        let n = raw.len().min(KEY_LEN);
        buf[..n].copy_from_slice(&raw[..n]);
        Self(buf)
    }

    /// The normalized key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// The key-derived IV: the first [`IV_LEN`] bytes of the normalized key.
    pub fn iv(&self) -> &[u8] {
        &self.0[..IV_LEN]
    }
}

impl Drop for TokenKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenKey([REDACTED])")
    }
}

impl PartialEq for TokenKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for TokenKey {}
