//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate for reporting
//! configuration, structural and cryptographic failures.

use std::borrow::Cow;

/// A specialized [`VaultError`] enum for vault-related failures.
#[finman_derive::finman_error]
pub enum VaultError {
    /// A required secret was not configured (unset or empty).
    #[error("Missing configuration{}: {message}", format_context(.context))]
    MissingConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A secret was configured but cannot be used (e.g. wrong AES key length).
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The input is shorter than the minimum structural size.
    #[error("Input too short{}: {message}", format_context(.context))]
    ShortInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A sealed payload failed tag verification.
    #[error("Integrity check failed{}: {message}", format_context(.context))]
    Integrity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the encryption process (e.g. RNG unavailable).
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
