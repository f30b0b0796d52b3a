use crate::error::VaultError;
use crate::keys::KeyProvider;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Raw HMAC-SHA256 output length.
pub const TAG_LEN: usize = 32;

/// Length of the lowercase hex tag appended to a tagged payload.
pub const TAG_HEX_LEN: usize = TAG_LEN * 2;

/// Outcome of [`Tagger::verify_tag`].
///
/// `message` borrows everything before the trailing tag, whether or not the tag matched. It is
/// empty only when the payload is too short to carry a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification<'a> {
    pub valid: bool,
    pub message: &'a [u8],
}

impl<'a> Verification<'a> {
    const fn rejected() -> Self {
        Self { valid: false, message: &[] }
    }

    /// The authenticated message, if verification succeeded.
    #[must_use]
    pub const fn into_message(self) -> Option<&'a [u8]> {
        if self.valid { Some(self.message) } else { None }
    }
}

/// Appends and checks hex-encoded HMAC-SHA256 tags: `payload = message || hex(tag)`.
#[derive(Clone)]
pub struct Tagger {
    mac: HmacSha256,
}

impl Tagger {
    /// # Errors
    /// * [`VaultError::Internal`] if the MAC rejects the key.
    pub fn new(keys: &KeyProvider) -> Result<Self, VaultError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(keys.mac_key()).map_err(|e| {
            VaultError::Internal {
                message: e.to_string().into(),
                context: Some("Initializing HMAC-SHA256".into()),
            }
        })?;
        Ok(Self { mac })
    }

    /// Returns `message` followed by the 64 lowercase hex characters of its tag.
    #[must_use]
    pub fn add_tag(&self, message: impl AsRef<[u8]>) -> Vec<u8> {
        let message = message.as_ref();
        let tag = self.compute(message);

        let mut payload = Vec::with_capacity(message.len() + TAG_HEX_LEN);
        payload.extend_from_slice(message);
        payload.extend_from_slice(hex::encode(tag).as_bytes());
        payload
    }

    /// Splits the trailing 64 bytes off `payload` and checks them against the recomputed tag.
    ///
    /// Payloads shorter than a tag report an empty message. Otherwise the prefix is returned
    /// alongside the verdict, which is false for tags that are not lowercase hex or do not match.
    /// Tag comparison is constant-time.
    #[must_use]
    pub fn verify_tag<'a>(&self, payload: &'a [u8]) -> Verification<'a> {
        let Some(split) = payload.len().checked_sub(TAG_HEX_LEN) else {
            return Verification::rejected();
        };
        let (message, received) = payload.split_at(split);

        let mut tag = [0u8; TAG_LEN];
        let decoded = received.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
            && hex::decode_to_slice(received, &mut tag).is_ok();

        let mut mac = self.mac.clone();
        mac.update(message);
        let valid = mac.verify_slice(&tag).is_ok() && decoded;
        Verification { valid, message }
    }

    fn compute(&self, message: &[u8]) -> [u8; TAG_LEN] {
        let mut mac = self.mac.clone();
        mac.update(message);
        mac.finalize().into_bytes().into()
    }
}

impl fmt::Debug for Tagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tagger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger(mac_key: &str) -> Tagger {
        Tagger::new(&KeyProvider::new("0123456789abcdef", mac_key).unwrap()).unwrap()
    }

    #[test]
    fn test_tag_is_lowercase_hex_suffix() {
        let payload = tagger("secret").add_tag(b"hello");
        assert_eq!(payload.len(), 5 + TAG_HEX_LEN);
        assert!(payload.starts_with(b"hello"));
        assert!(payload[5..].iter().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2.
        let payload = tagger("Jefe").add_tag(b"what do ya want for nothing?");
        let tag = std::str::from_utf8(&payload[payload.len() - TAG_HEX_LEN..]).unwrap();
        assert_eq!(tag, "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test]
    fn test_roundtrip() {
        let t = tagger("secret");
        let payload = t.add_tag(b"ledger entry");
        let check = t.verify_tag(&payload);
        assert!(check.valid);
        assert_eq!(check.message, b"ledger entry");
        assert_eq!(check.into_message(), Some(&b"ledger entry"[..]));
    }

    #[test]
    fn test_empty_message() {
        let t = tagger("secret");
        let payload = t.add_tag(b"");
        assert_eq!(payload.len(), TAG_HEX_LEN);
        let check = t.verify_tag(&payload);
        assert!(check.valid);
        assert!(check.message.is_empty());
    }

    #[test]
    fn test_short_payload_is_invalid() {
        let check = tagger("secret").verify_tag(&[b'a'; TAG_HEX_LEN - 1]);
        assert_eq!(check, Verification { valid: false, message: &[] });
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let payload = tagger("secret").add_tag(b"hello");
        assert!(!tagger("other").verify_tag(&payload).valid);
    }

    #[test]
    fn test_uppercase_tag_is_invalid() {
        let t = tagger("secret");
        let mut payload = t.add_tag(b"hello");
        payload[5..].make_ascii_uppercase();
        let check = t.verify_tag(&payload);
        assert!(!check.valid);
        assert_eq!(check.message, b"hello");
    }

    #[test]
    fn test_mismatch_still_reports_prefix() {
        let t = tagger("secret");
        let mut payload = t.add_tag(b"hello");
        let last = payload.len() - 1;
        payload[last] = if payload[last] == b'0' { b'1' } else { b'0' };

        let check = t.verify_tag(&payload);
        assert!(!check.valid);
        assert_eq!(check.message, b"hello");
        assert_eq!(check.into_message(), None);
    }

    #[test]
    fn test_non_hex_tag_reports_prefix() {
        let t = tagger("secret");
        let mut payload = b"hello".to_vec();
        payload.extend_from_slice(&[b'z'; TAG_HEX_LEN]);

        let check = t.verify_tag(&payload);
        assert!(!check.valid);
        assert_eq!(check.message, b"hello");
    }
}
