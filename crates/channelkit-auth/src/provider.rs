//! The credential-acquisition strategy interface.

use crate::credential::AuthenticationCredential;
use crate::error::AuthenticationResult;
use async_trait::async_trait;
use channelkit_schema::{AuthenticationConfiguration, ConnectionSettings};
use tokio_util::sync::CancellationToken;

/// A pluggable credential-acquisition strategy.
///
/// The [`AuthenticationManager`](crate::AuthenticationManager) walks its
/// registered providers in order and uses the first whose `can_handle`
/// accepts the configuration.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this provider handles the configuration.
    fn can_handle(&self, config: &AuthenticationConfiguration) -> bool;

    /// Obtain a fresh credential from the settings.
    async fn obtain_credential(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult;

    /// Refresh an existing credential. Providers without a cheaper
    /// refresh path may simply re-obtain.
    async fn refresh_credential(
        &self,
        existing: &AuthenticationCredential,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult;
}
