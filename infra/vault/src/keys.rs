use crate::error::VaultError;
use finman_domain::config::SecurityConfig;
use finman_domain::constants::{ENCRYPTION_KEY_ENV, MAC_KEY_ENV};
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES key sizes accepted for the envelope cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    /// Maps a raw key length in bytes to an AES variant.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }
}

/// Holds the two secrets used by the vault: the envelope encryption key and the MAC key.
///
/// Secrets are resolved and validated once, at construction. Missing or empty keys are a
/// [`VaultError::MissingConfiguration`] rather than a silently empty key. Key bytes are wiped
/// from memory when the provider is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyProvider {
    encryption_key: Vec<u8>,
    mac_key: Vec<u8>,
    #[zeroize(skip)]
    key_size: KeySize,
}

impl KeyProvider {
    /// Builds a provider from explicit key material.
    ///
    /// # Errors
    /// * [`VaultError::MissingConfiguration`] if either key is empty.
    /// * [`VaultError::InvalidConfiguration`] if the encryption key is not 16, 24 or 32 bytes.
    pub fn new(
        encryption_key: impl Into<Vec<u8>>,
        mac_key: impl Into<Vec<u8>>,
    ) -> Result<Self, VaultError> {
        let mut encryption_key: Vec<u8> = encryption_key.into();
        let mut mac_key: Vec<u8> = mac_key.into();

        if encryption_key.is_empty() {
            mac_key.zeroize();
            return Err(missing(ENCRYPTION_KEY_ENV));
        }
        if mac_key.is_empty() {
            encryption_key.zeroize();
            return Err(missing(MAC_KEY_ENV));
        }
        let Some(key_size) = KeySize::from_len(encryption_key.len()) else {
            let len = encryption_key.len();
            encryption_key.zeroize();
            mac_key.zeroize();
            return Err(VaultError::InvalidConfiguration {
                message: format!("Invalid encryption key length {len}, must be 16, 24 or 32 bytes")
                    .into(),
                context: Some(ENCRYPTION_KEY_ENV.into()),
            });
        };

        Ok(Self { encryption_key, mac_key, key_size })
    }

    /// Reads both keys from the `AES_ENCRYPTION_KEY` and `HMAC_KEY` environment variables.
    ///
    /// # Errors
    /// See [`KeyProvider::new`].
    pub fn from_env() -> Result<Self, VaultError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VaultError> {
        Self::resolve_with(&SecurityConfig::default(), lookup)
    }

    /// Resolves keys from configuration, falling back to the environment per key.
    ///
    /// # Errors
    /// See [`KeyProvider::new`].
    pub fn resolve(config: &SecurityConfig) -> Result<Self, VaultError> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Like [`KeyProvider::resolve`], with a custom lookup for the fallback variables.
    ///
    /// # Errors
    /// See [`KeyProvider::new`].
    pub fn resolve_with(
        config: &SecurityConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, VaultError> {
        let pick = |configured: &Option<String>, variable: &str| {
            configured.clone().filter(|key| !key.is_empty()).unwrap_or_else(|| {
                debug!(variable, "Secret not configured, reading environment");
                lookup(variable).unwrap_or_default()
            })
        };

        let encryption_key = pick(&config.encryption_key, ENCRYPTION_KEY_ENV);
        let mac_key = pick(&config.mac_key, MAC_KEY_ENV);

        Self::new(encryption_key, mac_key)
    }

    /// Raw bytes of the envelope encryption key.
    #[must_use]
    pub fn encryption_key(&self) -> &[u8] {
        &self.encryption_key
    }

    /// Raw bytes of the MAC key.
    #[must_use]
    pub fn mac_key(&self) -> &[u8] {
        &self.mac_key
    }

    /// AES variant selected by the encryption key length.
    #[must_use]
    pub const fn key_size(&self) -> KeySize {
        self.key_size
    }
}

impl fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyProvider")
            .field("encryption_key", &"<redacted>")
            .field("key_size", &self.key_size)
            .field("mac_key", &"<redacted>")
            .finish()
    }
}

fn missing(variable: &'static str) -> VaultError {
    VaultError::MissingConfiguration {
        message: format!("{variable} is not set or empty").into(),
        context: Some("Resolving vault keys".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AES_128: &str = "0123456789abcdef";

    fn config(encryption_key: Option<&str>, mac_key: Option<&str>) -> SecurityConfig {
        SecurityConfig {
            encryption_key: encryption_key.map(str::to_owned),
            mac_key: mac_key.map(str::to_owned),
        }
    }

    #[test]
    fn key_sizes_follow_aes_variants() {
        assert_eq!(KeySize::from_len(16), Some(KeySize::Aes128));
        assert_eq!(KeySize::from_len(24), Some(KeySize::Aes192));
        assert_eq!(KeySize::from_len(32), Some(KeySize::Aes256));
        assert_eq!(KeySize::from_len(0), None);
        assert_eq!(KeySize::from_len(31), None);
    }

    #[test]
    fn configured_keys_win_over_environment() {
        let keys = KeyProvider::resolve_with(&config(Some(AES_128), Some("mac")), |_| {
            Some("from-env-should-not-be-used".to_owned())
        })
        .unwrap();

        assert_eq!(keys.encryption_key(), AES_128.as_bytes());
        assert_eq!(keys.mac_key(), b"mac");
        assert_eq!(keys.key_size(), KeySize::Aes128);
    }

    #[test]
    fn falls_back_to_environment_per_key() {
        let keys = KeyProvider::resolve_with(&config(None, Some("mac")), |name| {
            (name == ENCRYPTION_KEY_ENV).then(|| "k".repeat(32))
        })
        .unwrap();

        assert_eq!(keys.key_size(), KeySize::Aes256);
        assert_eq!(keys.mac_key(), b"mac");
    }

    #[test]
    fn missing_keys_fail_fast() {
        let err = KeyProvider::resolve_with(&config(None, None), |_| None).unwrap_err();
        assert!(matches!(err, VaultError::MissingConfiguration { .. }));

        let err = KeyProvider::resolve_with(&config(Some(AES_128), Some("")), |_| None).unwrap_err();
        assert!(matches!(err, VaultError::MissingConfiguration { .. }));
        assert!(err.to_string().contains(MAC_KEY_ENV));
    }

    #[test]
    fn environment_only_lookup() {
        let keys = KeyProvider::from_lookup(|name| match name {
            ENCRYPTION_KEY_ENV => Some("k".repeat(24)),
            MAC_KEY_ENV => Some("env-mac".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(keys.key_size(), KeySize::Aes192);
        assert_eq!(keys.mac_key(), b"env-mac");

        let err = KeyProvider::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, VaultError::MissingConfiguration { .. }));
    }

    #[test]
    fn from_env_matches_process_environment() {
        let expected = KeyProvider::resolve_with(&SecurityConfig::default(), |name| {
            std::env::var(name).ok()
        });

        match (KeyProvider::from_env(), expected) {
            (Ok(keys), Ok(expected)) => {
                assert_eq!(keys.encryption_key(), expected.encryption_key());
                assert_eq!(keys.mac_key(), expected.mac_key());
            },
            (Err(err), Err(expected)) => assert_eq!(err.to_string(), expected.to_string()),
            (got, expected) => panic!("from_env diverged: {got:?} vs {expected:?}"),
        }
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let err = KeyProvider::new("too-short", "mac").unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfiguration { .. }));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let keys = KeyProvider::new(AES_128, "very-secret-mac").unwrap();
        let rendered = format!("{keys:?}");
        assert!(!rendered.contains(AES_128));
        assert!(!rendered.contains("very-secret-mac"));
    }
}
