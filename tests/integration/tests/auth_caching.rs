//! Credential cache behavior across repeated authentications.

use channelkit_auth::AuthenticationManager;
use channelkit_integration_tests::{settings_from, CountingProvider};
use channelkit_schema::{AuthenticationConfiguration, AuthenticationField, AuthenticationType};
use chrono::Duration;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn api_key_config() -> AuthenticationConfiguration {
    AuthenticationConfiguration::new(AuthenticationType::ApiKey, "API key")
        .with_required_field(AuthenticationField::api_key("ApiKey"))
}

#[tokio::test]
async fn test_repeated_authenticate_fetches_once() {
    let provider = Arc::new(CountingProvider::non_expiring());
    let manager = AuthenticationManager::new(vec![provider.clone()]);
    let settings = settings_from(&[("ApiKey", "sk-1")]);
    let config = api_key_config();
    let cancel = CancellationToken::new();

    let first = manager
        .authenticate(&settings, &config, &cancel)
        .await
        .unwrap();
    let second = manager
        .authenticate(&settings, &config, &cancel)
        .await
        .unwrap();

    assert_eq!(first.credential_value, second.credential_value);
    assert_eq!(provider.obtain_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_credential_inside_expiry_buffer_is_refreshed() {
    // Two minutes to expiry is inside the 5-minute refresh buffer.
    let provider = Arc::new(CountingProvider::expiring_in(Duration::minutes(2)));
    let manager = AuthenticationManager::new(vec![provider.clone()]);
    let settings = settings_from(&[("ApiKey", "sk-1")]);
    let config = api_key_config();
    let cancel = CancellationToken::new();

    manager
        .authenticate(&settings, &config, &cancel)
        .await
        .unwrap();
    let refreshed = manager
        .authenticate(&settings, &config, &cancel)
        .await
        .unwrap();

    assert!(refreshed.credential_value.starts_with("refreshed-"));
    assert_eq!(provider.obtain_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_distinct_settings_get_distinct_cache_entries() {
    let provider = Arc::new(CountingProvider::non_expiring());
    let manager = AuthenticationManager::new(vec![provider.clone()]);
    let config = api_key_config();
    let cancel = CancellationToken::new();

    let a = settings_from(&[("ApiKey", "sk-1")]);
    let b = settings_from(&[("ApiKey", "sk-2")]);

    manager.authenticate(&a, &config, &cancel).await.unwrap();
    manager.authenticate(&b, &config, &cancel).await.unwrap();

    assert_eq!(provider.obtain_calls.load(Ordering::SeqCst), 2);
    assert_eq!(manager.cache_len(), 2);
}
