use crate::error::VaultError;
use crate::keys::{KeyProvider, KeySize};
use aes::{Aes128, Aes192, Aes256};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use cfb_mode::{Decryptor, Encryptor};
use getrandom::fill;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES block size; also the IV length prepended to every envelope.
pub const BLOCK_LEN: usize = 16;

/// Confidentiality-only envelope: `[IV(16)][AES-CFB(plaintext)]`.
///
/// The IV is random per call, so encrypting the same plaintext twice yields different blobs.
/// There is no authentication: decrypting with the wrong key returns garbage instead of an
/// error. Pair with [`crate::Tagger`] (or use [`crate::Vault::seal`]) for tamper detection.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Envelope {
    key: Vec<u8>,
    #[zeroize(skip)]
    size: KeySize,
}

impl Envelope {
    #[must_use]
    pub fn new(keys: &KeyProvider) -> Self {
        Self { key: keys.encryption_key().to_vec(), size: keys.key_size() }
    }

    /// Encrypts `plaintext` and returns `iv || ciphertext`.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] if the system RNG cannot produce an IV.
    pub fn encrypt(&self, plaintext: impl AsRef<[u8]>) -> Result<Vec<u8>, VaultError> {
        let plaintext = plaintext.as_ref();

        let mut iv = [0u8; BLOCK_LEN];
        fill(&mut iv).map_err(|e| VaultError::Encryption {
            message: e.to_string().into(),
            context: Some("System RNG unavailable for IV generation".into()),
        })?;

        let mut blob = Vec::with_capacity(BLOCK_LEN + plaintext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(plaintext);
        self.apply(&iv, &mut blob[BLOCK_LEN..], Direction::Encrypt)?;

        Ok(blob)
    }

    /// Splits the leading IV off `blob` and decrypts the remainder.
    ///
    /// # Errors
    /// * [`VaultError::ShortInput`] if `blob` is shorter than one block.
    pub fn decrypt(&self, blob: impl AsRef<[u8]>) -> Result<Vec<u8>, VaultError> {
        let blob = blob.as_ref();
        if blob.len() < BLOCK_LEN {
            return Err(VaultError::ShortInput {
                message: format!(
                    "Ciphertext too short ({} bytes). Expected at least {BLOCK_LEN} bytes",
                    blob.len()
                )
                .into(),
                context: None,
            });
        }

        let (iv, ciphertext) = blob.split_at(BLOCK_LEN);
        let mut buf = ciphertext.to_vec();
        self.apply(iv, &mut buf, Direction::Decrypt)?;

        Ok(buf)
    }

    fn apply(&self, iv: &[u8], buf: &mut [u8], direction: Direction) -> Result<(), VaultError> {
        let key = self.key.as_slice();
        let applied = match (self.size, direction) {
            (KeySize::Aes128, Direction::Encrypt) => {
                Encryptor::<Aes128>::new_from_slices(key, iv).map(|c| c.encrypt(buf))
            },
            (KeySize::Aes192, Direction::Encrypt) => {
                Encryptor::<Aes192>::new_from_slices(key, iv).map(|c| c.encrypt(buf))
            },
            (KeySize::Aes256, Direction::Encrypt) => {
                Encryptor::<Aes256>::new_from_slices(key, iv).map(|c| c.encrypt(buf))
            },
            (KeySize::Aes128, Direction::Decrypt) => {
                Decryptor::<Aes128>::new_from_slices(key, iv).map(|c| c.decrypt(buf))
            },
            (KeySize::Aes192, Direction::Decrypt) => {
                Decryptor::<Aes192>::new_from_slices(key, iv).map(|c| c.decrypt(buf))
            },
            (KeySize::Aes256, Direction::Decrypt) => {
                Decryptor::<Aes256>::new_from_slices(key, iv).map(|c| c.decrypt(buf))
            },
        };

        applied.map_err(|_| VaultError::Internal {
            message: format!("Key or IV length rejected for {:?}", self.size).into(),
            context: Some("Initializing CFB stream".into()),
        })
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope").field("size", &self.size).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(key: &str) -> Envelope {
        Envelope::new(&KeyProvider::new(key, "mac").unwrap())
    }

    #[test]
    fn test_envelope_layout() {
        let env = envelope("0123456789abcdef");
        let blob = env.encrypt(b"hello").unwrap();
        assert_eq!(blob.len(), BLOCK_LEN + 5);
        assert_ne!(&blob[BLOCK_LEN..], b"hello");
    }

    #[test]
    fn test_iv_is_fresh_per_call() {
        let env = envelope("0123456789abcdef");
        let a = env.encrypt(b"same plaintext").unwrap();
        let b = env.encrypt(b"same plaintext").unwrap();
        assert_ne!(a[..BLOCK_LEN], b[..BLOCK_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_roundtrip_all_key_sizes() {
        for key in ["k".repeat(16), "k".repeat(24), "k".repeat(32)] {
            let env = envelope(&key);
            let blob = env.encrypt(b"budget: 300").unwrap();
            assert_eq!(env.decrypt(&blob).unwrap(), b"budget: 300");
        }
    }

    #[test]
    fn test_empty_plaintext_is_just_an_iv() {
        let env = envelope("0123456789abcdef");
        let blob = env.encrypt(b"").unwrap();
        assert_eq!(blob.len(), BLOCK_LEN);
        assert!(env.decrypt(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_short_input_is_rejected() {
        let env = envelope("0123456789abcdef");
        let err = env.decrypt([0u8; BLOCK_LEN - 1]).unwrap_err();
        assert!(matches!(err, VaultError::ShortInput { .. }));
    }

    #[test]
    fn test_wrong_key_yields_garbage_not_error() {
        let blob = envelope("0123456789abcdef").encrypt(b"confidential").unwrap();
        let other = envelope("fedcba9876543210").decrypt(&blob).unwrap();
        assert_ne!(other, b"confidential");
    }
}
