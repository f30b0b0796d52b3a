//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it hosts the layered configuration loader.
//!
//! ## Config loading
//! ```rust,no_run
//! use finman_kernel::config::load_app_config;
//!
//! let cfg = load_app_config(Some("finman.toml")).unwrap_or_default();
//! assert!(!cfg.database.url.is_empty());
//! ```

pub mod config;

pub use finman_domain as domain;
