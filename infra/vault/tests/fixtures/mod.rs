use finman_vault::prelude::*;

pub const ENCRYPTION_KEY: &str = "0123456789abcdef0123456789abcdef";
pub const MAC_KEY: &str = "integration-mac-key";

/// Builds a key provider with AES-256 and a fixed MAC key.
/// # Panics
/// * If the fixed keys are rejected.
#[must_use]
pub fn setup_keys() -> KeyProvider {
    KeyProvider::new(ENCRYPTION_KEY, MAC_KEY).expect("Key setup failed")
}

/// Initializes a Vault instance with predefined keys for testing.
/// # Panics
/// * If Vault setup fails, the function will panic.
#[must_use]
pub fn setup_vault() -> Vault {
    Vault::new(&setup_keys()).expect("Vault setup failed")
}
