//! Authenticated encryption for post files.
//!
//! Sealed data is laid out as `nonce || ciphertext || tag` using AES-256-GCM
//! with a fresh random 96-bit nonce per call.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

use crate::{BbsError, Result};

/// Length of an encryption key in bytes.
pub const KEY_SIZE: usize = 32;

/// Length of the nonce prefix in bytes.
pub const NONCE_SIZE: usize = 12;

/// AEAD cipher keyed once with an operator-supplied key.
#[derive(Clone)]
pub struct PostCipher {
    cipher: Aes256Gcm,
}

impl PostCipher {
    /// Create a cipher from raw key bytes.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Create a cipher from a hex-encoded key.
    ///
    /// The string must decode to exactly 32 bytes.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| BbsError::Crypto(format!("invalid hex key: {e}")))?;
        let key: [u8; KEY_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            BbsError::Crypto(format!(
                "encryption key must be {KEY_SIZE} bytes ({} hex chars), got {} bytes",
                KEY_SIZE * 2,
                bytes.len()
            ))
        })?;
        Ok(Self::new(&key))
    }

    /// Encrypt `plaintext`, returning `nonce || ciphertext || tag`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| BbsError::Crypto(format!("encryption failed: {e}")))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Verify and decrypt data produced by [`PostCipher::seal`].
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < NONCE_SIZE {
            return Err(BbsError::Crypto("ciphertext too short".to_string()));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| BbsError::Crypto("authentication failed".to_string()))
    }
}

impl fmt::Debug for PostCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PostCipher(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> PostCipher {
        PostCipher::new(&[7u8; KEY_SIZE])
    }

    #[test]
    fn test_seal_open() {
        let cipher = test_cipher();
        let sealed = cipher.seal(b"hello board").unwrap();
        assert_ne!(&sealed[NONCE_SIZE..], b"hello board");
        assert_eq!(cipher.open(&sealed).unwrap(), b"hello board");
    }

    #[test]
    fn test_seal_uses_fresh_nonce() {
        let cipher = test_cipher();
        let a = cipher.seal(b"same").unwrap();
        let b = cipher.seal(b"same").unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_too_short() {
        let result = test_cipher().open(&[0u8; NONCE_SIZE - 1]);
        match result {
            Err(BbsError::Crypto(msg)) => assert!(msg.contains("too short")),
            other => panic!("expected Crypto error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_tampered() {
        let cipher = test_cipher();
        let mut sealed = cipher.seal(b"payload").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(cipher.open(&sealed), Err(BbsError::Crypto(_))));
    }

    #[test]
    fn test_open_wrong_key() {
        let sealed = test_cipher().seal(b"payload").unwrap();
        let other = PostCipher::new(&[9u8; KEY_SIZE]);
        assert!(other.open(&sealed).is_err());
    }

    #[test]
    fn test_from_hex() {
        let key_hex = "00".repeat(KEY_SIZE);
        let cipher = PostCipher::from_hex(&key_hex).unwrap();
        let sealed = cipher.seal(b"x").unwrap();
        assert_eq!(PostCipher::new(&[0u8; KEY_SIZE]).open(&sealed).unwrap(), b"x");
    }

    #[test]
    fn test_from_hex_wrong_length() {
        let result = PostCipher::from_hex(&"ab".repeat(16));
        match result {
            Err(BbsError::Crypto(msg)) => assert!(msg.contains("got 16 bytes")),
            other => panic!("expected Crypto error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_hex_not_hex() {
        assert!(PostCipher::from_hex("not-a-key").is_err());
    }
}
