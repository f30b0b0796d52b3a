//! Symmetric protection for stored records.
//!
//! Two independent primitives, usable separately or combined through [`Vault`]:
//!
//! * [`Envelope`]: AES-CFB with a fresh random 16-byte IV per call. The IV is prepended to the
//!   ciphertext. The key length (16, 24 or 32 bytes) selects AES-128/192/256. Confidentiality
//!   only, a wrong key decrypts to garbage.
//! * [`Tagger`]: HMAC-SHA256 over a message, appended as 64 lowercase hex characters.
//!   Verification splits on the last 64 bytes and compares in constant time.
//!
//! ```text
//! envelope : [IV(16)][CIPHERTEXT(N)]
//! tagged   : [MESSAGE(N)][HEX TAG(64)]
//! sealed   : [IV(16)][CIPHERTEXT(N)][HEX TAG(64)]
//! ```
//!
//! ## Keys
//!
//! [`KeyProvider`] resolves both secrets once, from configuration or from the
//! `AES_ENCRYPTION_KEY` / `HMAC_KEY` environment variables, and refuses to start with a
//! missing key. Key bytes are zeroized on drop.
//!
//! ## Example
//! ```rust
//! use finman_vault::{Envelope, KeyProvider, Tagger, VaultError};
//!
//! # fn main() -> Result<(), VaultError> {
//! let keys = KeyProvider::new("0123456789abcdef", "mac-secret")?;
//!
//! let envelope = Envelope::new(&keys);
//! let blob = envelope.encrypt(b"groceries")?;
//! assert_eq!(envelope.decrypt(&blob)?, b"groceries");
//!
//! let tagger = Tagger::new(&keys)?;
//! let payload = tagger.add_tag(b"groceries");
//! let check = tagger.verify_tag(&payload);
//! assert!(check.valid);
//! assert_eq!(check.message, b"groceries");
//! # Ok(())
//! # }
//! ```

mod engine;
mod envelope;
mod error;
mod keys;
mod tag;

pub use engine::Vault;
pub use envelope::{BLOCK_LEN, Envelope};
pub use error::{VaultError, VaultErrorExt};
pub use keys::{KeyProvider, KeySize};
pub use tag::{TAG_HEX_LEN, TAG_LEN, Tagger, Verification};

pub mod prelude {
    pub use crate::engine::Vault;
    pub use crate::envelope::Envelope;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::keys::KeyProvider;
    pub use crate::tag::{Tagger, Verification};
}
