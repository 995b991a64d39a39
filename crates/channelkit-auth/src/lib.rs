//! Credential acquisition, refresh, and caching for ChannelKit.
//!
//! An [`AuthenticationManager`] resolves a schema's
//! [`AuthenticationConfiguration`](channelkit_schema::AuthenticationConfiguration)
//! to a credential through an ordered chain of
//! [`AuthenticationProvider`] strategies, caching results per settings
//! fingerprint with expiry-aware refresh.

pub mod credential;
pub mod direct;
pub mod error;
pub mod manager;
pub mod oauth;
pub mod provider;

pub use credential::{property_keys, refresh_buffer, AuthenticationCredential, REFRESH_BUFFER_SECS};
pub use direct::DirectAuthenticationProvider;
pub use error::{AuthError, AuthenticationResult};
pub use manager::{default_providers, AuthenticationManager};
pub use oauth::ClientCredentialsProvider;
pub use provider::AuthenticationProvider;
