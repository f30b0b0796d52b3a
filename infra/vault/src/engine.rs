use std::sync::Arc;

use finman_domain::config::SecurityConfig;
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::error::{VaultError, VaultErrorExt};
use crate::keys::KeyProvider;
use crate::tag::Tagger;

#[allow(unreachable_pub)]
#[derive(Debug)]
pub struct VaultInner {
    pub envelope: Envelope,
    pub tagger: Tagger,
}

/// Thread-safe handle combining the AES-CFB envelope with the HMAC tagger.
///
/// `Vault` wraps its state in an [`Arc`], so clones are cheap and can be handed to any number
/// of tasks. Sealing is encrypt-then-MAC:
///
/// ```text
/// [IV(16)][AES-CFB(plaintext)][hex(HMAC-SHA256)(64)]
/// ```
///
/// ### Example
/// ```rust
/// use finman_vault::{KeyProvider, Vault, VaultError};
///
/// # fn main() -> Result<(), VaultError> {
/// let keys = KeyProvider::new("0123456789abcdef", "mac-secret")?;
/// let vault = Vault::new(&keys)?;
///
/// let sealed = vault.seal(b"salary: 4200")?;
/// assert_eq!(vault.open(&sealed)?, b"salary: 4200");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Vault {
    pub(crate) inner: Arc<VaultInner>,
}

impl Vault {
    /// # Errors
    /// Propagates [`Tagger::new`] failures.
    pub fn new(keys: &KeyProvider) -> Result<Self, VaultError> {
        let inner = VaultInner { envelope: Envelope::new(keys), tagger: Tagger::new(keys)? };
        debug!(key_size = ?keys.key_size(), "Vault initialized");
        Ok(Self { inner: Arc::new(inner) })
    }

    /// Resolves keys from `config` (falling back to the environment) and builds the vault.
    ///
    /// # Errors
    /// See [`KeyProvider::resolve`].
    pub fn from_config(config: &SecurityConfig) -> Result<Self, VaultError> {
        let keys = KeyProvider::resolve(config).context("Building vault from configuration")?;
        Self::new(&keys)
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.inner.envelope
    }

    #[must_use]
    pub fn tagger(&self) -> &Tagger {
        &self.inner.tagger
    }

    /// Encrypts `plaintext` and appends an integrity tag over the ciphertext.
    pub fn seal(&self, plaintext: impl AsRef<[u8]>) -> Result<Vec<u8>, VaultError> {
        let blob = self.inner.envelope.encrypt(plaintext).context("Sealing payload")?;
        Ok(self.inner.tagger.add_tag(blob))
    }

    /// Verifies the tag of a sealed payload and decrypts it.
    ///
    /// # Errors
    /// * [`VaultError::Integrity`] if the tag is missing, malformed or does not match.
    /// * [`VaultError::ShortInput`] if the authenticated part is shorter than an IV.
    pub fn open(&self, sealed: impl AsRef<[u8]>) -> Result<Vec<u8>, VaultError> {
        let sealed = sealed.as_ref();
        let Some(blob) = self.inner.tagger.verify_tag(sealed).into_message() else {
            warn!(len = sealed.len(), "Rejected sealed payload with invalid tag");
            return Err(VaultError::Integrity {
                message: "Payload tag does not match its contents".into(),
                context: Some("Opening sealed payload".into()),
            });
        };

        self.inner.envelope.decrypt(blob).context("Opening sealed payload")
    }
}
