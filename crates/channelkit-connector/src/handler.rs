//! The provider-implementation seam.

use crate::types::{
    BatchSendReceipt, ConnectorHealth, ReceiveResult, SendReceipt, StatusUpdatesResult,
};
use anyhow::bail;
use async_trait::async_trait;
use channelkit_auth::AuthenticationCredential;
use channelkit_core::{Endpoint, Message, MessageBatch};
use channelkit_schema::{ChannelSchema, ConnectionSettings};

/// Read-only view of the owning connector passed to every hook.
pub struct ConnectorContext<'a> {
    pub schema: &'a ChannelSchema,
    pub settings: &'a ConnectionSettings,

    /// The credential from the most recent successful `authenticate`,
    /// if any.
    pub credential: Option<AuthenticationCredential>,
}

/// Provider-specific behavior behind a
/// [`ChannelConnector`](crate::ChannelConnector).
///
/// Hooks return `anyhow::Result`; the base connector converts failures
/// into standardized error codes and never lets them escape. Hooks are
/// only invoked after the base has passed the capability, state, and
/// validation gates, so implementations can assume their inputs already
/// validated against the schema.
#[async_trait]
pub trait ConnectorHandler: Send + Sync {
    /// One-time setup (open clients, verify settings against the
    /// provider). Default: nothing to set up.
    async fn initialize(&self, _ctx: &ConnectorContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Probe the provider connection. Default: assume reachable.
    async fn test_connection(&self, _ctx: &ConnectorContext<'_>) -> anyhow::Result<bool> {
        Ok(true)
    }

    /// Deliver one validated message.
    async fn send(
        &self,
        ctx: &ConnectorContext<'_>,
        message: &dyn Message,
    ) -> anyhow::Result<SendReceipt>;

    /// Deliver a validated batch. Default: send each message in order and
    /// aggregate the receipts, failing the batch on the first error.
    async fn send_batch(
        &self,
        ctx: &ConnectorContext<'_>,
        batch: &dyn MessageBatch,
    ) -> anyhow::Result<BatchSendReceipt> {
        let mut receipt = BatchSendReceipt::new(batch.id());
        for message in batch.messages() {
            receipt.receipts.push(self.send(ctx, message.as_ref()).await?);
        }
        Ok(receipt)
    }

    /// Look up the delivery-state history of a previously sent message,
    /// oldest update first.
    async fn message_status(
        &self,
        _ctx: &ConnectorContext<'_>,
        message_id: &str,
    ) -> anyhow::Result<StatusUpdatesResult> {
        bail!("message status lookup not implemented for {message_id}")
    }

    /// Pull inbound messages pending for the given source endpoint.
    async fn receive(
        &self,
        _ctx: &ConnectorContext<'_>,
        _source: &Endpoint,
    ) -> anyhow::Result<ReceiveResult> {
        bail!("receive not implemented")
    }

    /// Pull delivery-status updates pending for the given source endpoint.
    async fn receive_status(
        &self,
        _ctx: &ConnectorContext<'_>,
        _source: &Endpoint,
    ) -> anyhow::Result<StatusUpdatesResult> {
        bail!("status receive not implemented")
    }

    /// Provider-specific status detail surfaced alongside the base
    /// connector's state snapshot. Default: no detail.
    async fn status(&self, _ctx: &ConnectorContext<'_>) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    /// Probe provider health. Default: unknown.
    async fn health(&self, _ctx: &ConnectorContext<'_>) -> anyhow::Result<ConnectorHealth> {
        Ok(ConnectorHealth::unknown())
    }

    /// Teardown. Failures are logged and swallowed by the base; the
    /// connector reaches `Shutdown` regardless. Default: nothing to tear
    /// down.
    async fn shutdown(&self, _ctx: &ConnectorContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}
