//! Connector lifecycle and send-pipeline scenarios.

use channelkit_connector::{error_codes, ChannelConnector, ConnectorState};
use channelkit_core::{Endpoint, MessageContent, MessageContentType, OutboundBatch, OutboundMessage};
use channelkit_integration_tests::{settings_from, strict_basic_sms_schema, CountingHandler};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn connector() -> (ChannelConnector, Arc<CountingHandler>) {
    let handler = Arc::new(CountingHandler::default());
    let connector = ChannelConnector::new(
        Arc::new(strict_basic_sms_schema()),
        settings_from(&[("SenderId", "ACME"), ("Username", "u"), ("Password", "p")]),
        Box::new(SharedHandler(handler.clone())),
    );
    (connector, handler)
}

/// Forwards to a shared counting handler so tests can assert call counts
/// after the connector takes ownership of the box.
struct SharedHandler(Arc<CountingHandler>);

#[async_trait::async_trait]
impl channelkit_connector::ConnectorHandler for SharedHandler {
    async fn send(
        &self,
        ctx: &channelkit_connector::ConnectorContext<'_>,
        message: &dyn channelkit_core::Message,
    ) -> anyhow::Result<channelkit_connector::SendReceipt> {
        self.0.send(ctx, message).await
    }
}

fn sms() -> OutboundMessage {
    OutboundMessage::new(
        Endpoint::phone("+15551230000"),
        MessageContent::new(MessageContentType::PlainText, "hello"),
    )
}

fn token() -> CancellationToken {
    CancellationToken::new()
}

#[tokio::test]
async fn test_second_initialize_rejected_without_state_change() {
    let (connector, _) = connector();

    assert!(connector.initialize(&token()).await.is_success());
    assert_eq!(connector.state(), ConnectorState::Ready);

    let second = connector.initialize(&token()).await;
    assert_eq!(second.error_code(), Some(error_codes::ALREADY_INITIALIZED));
    assert_eq!(connector.state(), ConnectorState::Ready);
}

#[tokio::test]
async fn test_double_shutdown_is_idempotent() {
    let (connector, _) = connector();
    connector.initialize(&token()).await;

    assert!(connector.shutdown(&token()).await.is_success());
    assert_eq!(connector.state(), ConnectorState::Shutdown);

    assert!(connector.shutdown(&token()).await.is_success());
    assert_eq!(connector.state(), ConnectorState::Shutdown);
}

#[tokio::test]
async fn test_batch_send_without_capability_fails_in_any_state() {
    let (connector, handler) = connector();
    let mut batch = OutboundBatch::new();
    batch.push(sms());

    // Before initialization.
    let result = connector.send_batch(&batch, &token()).await;
    assert_eq!(
        result.error_code(),
        Some(error_codes::CAPABILITY_NOT_SUPPORTED)
    );

    // After initialization the capability gate still fires first.
    connector.initialize(&token()).await;
    let result = connector.send_batch(&batch, &token()).await;
    assert_eq!(
        result.error_code(),
        Some(error_codes::CAPABILITY_NOT_SUPPORTED)
    );
    assert_eq!(handler.send_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_undeclared_endpoint_type_blocks_send_hook() {
    let (connector, handler) = connector();
    connector.initialize(&token()).await;

    let email = OutboundMessage::new(
        Endpoint::email("ops@example.com"),
        MessageContent::new(MessageContentType::PlainText, "hello"),
    );
    let result = connector.send_message(&email, &token()).await;

    let error = result.error().expect("send must fail validation");
    assert_eq!(error.code, error_codes::MESSAGE_VALIDATION_FAILED);
    assert!(!error.validation_issues.is_empty());
    assert_eq!(handler.send_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_valid_send_reaches_hook_exactly_once() {
    let (connector, handler) = connector();
    connector.initialize(&token()).await;

    let result = connector.send_message(&sms(), &token()).await;
    assert!(result.is_success());
    assert_eq!(handler.send_calls.load(Ordering::SeqCst), 1);
}
