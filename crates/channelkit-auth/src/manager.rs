//! The authentication manager: provider registry plus credential cache.

use crate::credential::{refresh_buffer, AuthenticationCredential};
use crate::direct::DirectAuthenticationProvider;
use crate::error::{AuthError, AuthenticationResult};
use crate::oauth::ClientCredentialsProvider;
use crate::provider::AuthenticationProvider;
use channelkit_schema::{AuthenticationConfiguration, ConnectionSettings};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// The fixed default provider set, registered when a manager is created
/// with an empty provider list: API key, token, basic, client
/// credentials, in that order.
pub fn default_providers() -> Vec<Arc<dyn AuthenticationProvider>> {
    vec![
        Arc::new(DirectAuthenticationProvider::api_key()),
        Arc::new(DirectAuthenticationProvider::bearer_token()),
        Arc::new(DirectAuthenticationProvider::basic()),
        Arc::new(ClientCredentialsProvider::new()),
    ]
}

/// Obtains, caches, and refreshes credentials for authentication
/// configurations.
///
/// Providers are consulted in registration order; the first whose
/// `can_handle` accepts a configuration is used. Credentials are cached
/// per settings fingerprint; a cached credential inside the 5-minute
/// refresh buffer triggers a refresh instead of a fresh acquisition.
///
/// The cache lock guards only the map itself. Provider calls run outside
/// it, so two concurrent callers holding a just-expired credential may
/// both refresh; the second successful result simply overwrites the
/// first.
pub struct AuthenticationManager {
    providers: Vec<Arc<dyn AuthenticationProvider>>,
    cache: Mutex<HashMap<String, AuthenticationCredential>>,
}

impl Default for AuthenticationManager {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AuthenticationManager {
    /// Create a manager. An empty provider list registers the
    /// [`default_providers`] set.
    pub fn new(providers: Vec<Arc<dyn AuthenticationProvider>>) -> Self {
        let providers = if providers.is_empty() {
            info!("no authentication providers supplied, registering defaults");
            default_providers()
        } else {
            providers
        };
        Self {
            providers,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The first registered provider that handles the configuration.
    fn provider_for(
        &self,
        config: &AuthenticationConfiguration,
    ) -> Result<Arc<dyn AuthenticationProvider>, AuthError> {
        self.providers
            .iter()
            .find(|p| p.can_handle(config))
            .cloned()
            .ok_or(AuthError::Unsupported(config.auth_type))
    }

    /// Deterministic cache key: the authentication type plus a hash of
    /// every settings value the configuration references, sorted by field
    /// name. Identical relevant settings always map to the same key.
    pub fn cache_key(
        config: &AuthenticationConfiguration,
        settings: &ConnectionSettings,
    ) -> String {
        let mut names: Vec<String> = config
            .field_names()
            .iter()
            .map(|n| n.to_ascii_lowercase())
            .collect();
        names.sort_unstable();
        names.dedup();

        let mut hasher = Sha256::new();
        for name in &names {
            let value = settings
                .get(name)
                .map(|v| v.to_string())
                .unwrap_or_default();
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(b";");
        }
        format!("{}:{}", config.auth_type, hex::encode(hasher.finalize()))
    }

    /// Authenticate against the configuration, serving from the cache
    /// when a fresh credential is available.
    pub async fn authenticate(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult {
        let provider = self.provider_for(config)?;
        let key = Self::cache_key(config, settings);

        let stale = {
            let cache = self.cache.lock();
            match cache.get(&key) {
                Some(credential)
                    if !credential.is_expired()
                        && !credential.will_expire_soon(refresh_buffer()) =>
                {
                    debug!(auth_type = %config.auth_type, "credential cache hit");
                    return Ok(credential.clone());
                }
                Some(credential) => {
                    debug!(auth_type = %config.auth_type, "cached credential stale, refreshing");
                    Some(credential.clone())
                }
                None => None,
            }
        };

        let result = match &stale {
            Some(existing) => {
                provider
                    .refresh_credential(existing, settings, config, cancel)
                    .await
            }
            None => provider.obtain_credential(settings, config, cancel).await,
        };

        match result {
            Ok(credential) => {
                self.cache.lock().insert(key, credential.clone());
                Ok(credential)
            }
            // The stale entry stays so a later retry can still refresh.
            Err(e) => Err(e),
        }
    }

    /// Force a refresh of the cached credential (or a fresh acquisition
    /// when nothing is cached), bypassing the freshness check.
    pub async fn refresh(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult {
        let provider = self.provider_for(config)?;
        let key = Self::cache_key(config, settings);
        let existing = self.cache.lock().get(&key).cloned();

        let result = match &existing {
            Some(credential) => {
                provider
                    .refresh_credential(credential, settings, config, cancel)
                    .await
            }
            None => provider.obtain_credential(settings, config, cancel).await,
        };

        match result {
            Ok(credential) => {
                self.cache.lock().insert(key, credential.clone());
                Ok(credential)
            }
            Err(e) => Err(e),
        }
    }

    /// The cached credential for the configuration/settings pair, if any.
    pub fn cached_credential(
        &self,
        config: &AuthenticationConfiguration,
        settings: &ConnectionSettings,
    ) -> Option<AuthenticationCredential> {
        let key = Self::cache_key(config, settings);
        self.cache.lock().get(&key).cloned()
    }

    /// Evict the cached credential for the configuration/settings pair.
    pub fn invalidate_credential(
        &self,
        config: &AuthenticationConfiguration,
        settings: &ConnectionSettings,
    ) -> bool {
        let key = Self::cache_key(config, settings);
        let removed = self.cache.lock().remove(&key).is_some();
        if removed {
            debug!(auth_type = %config.auth_type, "invalidated cached credential");
        }
        removed
    }

    /// Evict every cached credential.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Number of cached credentials.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }
}
