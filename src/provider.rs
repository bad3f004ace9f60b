//! Token provider configuration: names, grants, client authentication, and validation.
//!
//! Each provider is registered under a [`ProviderName`] with one immutable
//! [`TokenProviderConfig`]. The token service resolves providers by name (ignoring case) and
//! never mutates their configuration after registration.

/// Builder API for assembling provider configurations.
pub mod builder;
/// Provider configuration record.
pub mod config;
/// Grant and client authentication enums.
pub mod grant;
/// Validated provider names.
pub mod name;

pub use builder::*;
pub use config::*;
pub use grant::*;
pub use name::*;

/// Provider name used by the `*_default_*` helpers.
pub const DEFAULT_TOKEN_PROVIDER: &str = "Default-Token-Provider";
