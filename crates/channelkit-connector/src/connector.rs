//! The base connector: lifecycle state machine, gates, and the
//! validation-before-send pipeline.

use crate::handler::{ConnectorContext, ConnectorHandler};
use crate::result::{error_codes, ConnectorError, ConnectorResult};
use crate::state::ConnectorState;
use crate::types::{
    BatchSendReceipt, ConnectorHealth, ReceiveResult, SendReceipt, StatusInfo,
    StatusUpdatesResult,
};
use channelkit_auth::{AuthenticationCredential, AuthenticationManager};
use channelkit_core::{Capability, Endpoint, Message, MessageBatch, ValidationIssue};
use channelkit_schema::{
    AuthenticationConfiguration, AuthenticationType, ChannelSchema, ConnectionSettings,
};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Base connector for one channel instance.
///
/// Wraps a [`ConnectorHandler`] with the lifecycle state machine,
/// capability and state gates, schema validation before any send, and
/// credential management. Every public operation returns a
/// [`ConnectorResult`]; hook failures are converted to standardized
/// error codes and never propagate.
pub struct ChannelConnector {
    schema: Arc<ChannelSchema>,
    settings: ConnectionSettings,
    auth: Arc<AuthenticationManager>,
    state: Mutex<ConnectorState>,
    credential: Mutex<Option<AuthenticationCredential>>,
    handler: Box<dyn ConnectorHandler>,
}

impl ChannelConnector {
    /// Create a connector with a default authentication manager.
    pub fn new(
        schema: Arc<ChannelSchema>,
        settings: ConnectionSettings,
        handler: Box<dyn ConnectorHandler>,
    ) -> Self {
        Self::with_auth_manager(
            schema,
            settings,
            handler,
            Arc::new(AuthenticationManager::default()),
        )
    }

    /// Create a connector sharing an existing authentication manager.
    pub fn with_auth_manager(
        schema: Arc<ChannelSchema>,
        settings: ConnectionSettings,
        handler: Box<dyn ConnectorHandler>,
        auth: Arc<AuthenticationManager>,
    ) -> Self {
        Self {
            schema,
            settings,
            auth,
            state: Mutex::new(ConnectorState::Uninitialized),
            credential: Mutex::new(None),
            handler,
        }
    }

    pub fn schema(&self) -> &ChannelSchema {
        &self.schema
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectorState {
        *self.state.lock()
    }

    fn transition(state: &mut ConnectorState, next: ConnectorState) {
        if *state != next {
            debug!(from = %state, to = %next, "connector state transition");
            *state = next;
        }
    }

    fn set_state(&self, next: ConnectorState) {
        Self::transition(&mut self.state.lock(), next);
    }

    /// Record that the provider connection was lost. Ignored once
    /// shutdown has begun.
    pub fn mark_disconnected(&self) {
        let mut state = self.state.lock();
        if state.is_operational() {
            Self::transition(&mut state, ConnectorState::Disconnected);
        }
    }

    /// Record that the provider connection was restored.
    pub fn mark_ready(&self) {
        let mut state = self.state.lock();
        if state.is_operational() {
            Self::transition(&mut state, ConnectorState::Ready);
        }
    }

    fn context(&self) -> ConnectorContext<'_> {
        ConnectorContext {
            schema: &self.schema,
            settings: &self.settings,
            credential: self.credential.lock().clone(),
        }
    }

    fn capability_gate(&self, capability: Capability) -> Result<(), ConnectorError> {
        if self.schema.supports(capability) {
            Ok(())
        } else {
            Err(ConnectorError::new(
                error_codes::CAPABILITY_NOT_SUPPORTED,
                format!("channel does not support {capability:?}"),
            ))
        }
    }

    fn operational_gate(&self) -> Result<(), ConnectorError> {
        let state = self.state();
        if state.is_operational() {
            Ok(())
        } else {
            Err(ConnectorError::new(
                error_codes::INVALID_STATE,
                format!("operation not allowed in state {state}"),
            ))
        }
    }

    /// Run a hook, converting its error into the given code and a
    /// triggered cancellation token into `CANCELLED`.
    async fn run_hook<T>(
        &self,
        code: &str,
        cancel: &CancellationToken,
        hook: impl Future<Output = anyhow::Result<T>> + Send,
    ) -> ConnectorResult<T> {
        if cancel.is_cancelled() {
            return ConnectorResult::failure(error_codes::CANCELLED, "operation cancelled");
        }
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                return ConnectorResult::failure(error_codes::CANCELLED, "operation cancelled");
            }
            outcome = hook => outcome,
        };
        match outcome {
            Ok(value) => ConnectorResult::ok(value),
            Err(e) => {
                warn!(code, error = %e, "connector hook failed");
                ConnectorResult::failure(code, e.to_string())
            }
        }
    }

    /// Initialize the connector. Rejects any state but `Uninitialized`;
    /// ends in `Ready` on success and `Error` on hook failure or
    /// cancellation.
    pub async fn initialize(&self, cancel: &CancellationToken) -> ConnectorResult<bool> {
        {
            let mut state = self.state.lock();
            if *state != ConnectorState::Uninitialized {
                return ConnectorResult::failure(
                    error_codes::ALREADY_INITIALIZED,
                    format!("connector already initialized (state {state})"),
                );
            }
            Self::transition(&mut state, ConnectorState::Initializing);
        }

        let ctx = self.context();
        let result = self
            .run_hook(
                error_codes::INITIALIZATION_ERROR,
                cancel,
                self.handler.initialize(&ctx),
            )
            .await;

        let next = if result.is_success() {
            ConnectorState::Ready
        } else {
            ConnectorState::Error
        };
        self.set_state(next);
        result.map(|_| true)
    }

    /// Shut the connector down. Idempotent: a connector already shutting
    /// down (or shut down) reports success without re-running teardown.
    /// Teardown failures are logged and swallowed; the connector always
    /// ends in `Shutdown`.
    pub async fn shutdown(&self, cancel: &CancellationToken) -> ConnectorResult<bool> {
        {
            let mut state = self.state.lock();
            if matches!(
                *state,
                ConnectorState::ShuttingDown | ConnectorState::Shutdown
            ) {
                return ConnectorResult::ok(true);
            }
            Self::transition(&mut state, ConnectorState::ShuttingDown);
        }

        let ctx = self.context();
        let teardown = tokio::select! {
            _ = cancel.cancelled() => Err(anyhow::anyhow!("shutdown cancelled")),
            outcome = self.handler.shutdown(&ctx) => outcome,
        };
        if let Err(e) = teardown {
            warn!(error = %e, "shutdown hook failed, proceeding to shutdown");
        }

        self.set_state(ConnectorState::Shutdown);
        ConnectorResult::ok(true)
    }

    /// Probe the provider connection.
    pub async fn test_connection(&self, cancel: &CancellationToken) -> ConnectorResult<bool> {
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }
        let ctx = self.context();
        self.run_hook(
            error_codes::CONNECTION_TEST_ERROR,
            cancel,
            self.handler.test_connection(&ctx),
        )
        .await
    }

    /// Snapshot the connector's identity and state, with any detail the
    /// handler's `status` hook supplies. Never gated; reports in every
    /// lifecycle state.
    pub async fn get_status(&self, cancel: &CancellationToken) -> ConnectorResult<StatusInfo> {
        let ctx = self.context();
        let result = self
            .run_hook(
                error_codes::GET_STATUS_ERROR,
                cancel,
                self.handler.status(&ctx),
            )
            .await;
        result.map(|detail| StatusInfo {
            provider: self.schema.provider.clone(),
            channel_type: self.schema.channel_type.clone(),
            state: self.state(),
            detail,
        })
    }

    /// Validate a message against the schema. Pure; no gate, no state
    /// change, callable any number of times.
    pub fn validate_message(&self, message: &dyn Message) -> Vec<ValidationIssue> {
        self.schema.validate_message(message)
    }

    /// Send one message. The message must pass schema validation before
    /// the handler is invoked; any validation issue fails the operation
    /// without touching the provider.
    pub async fn send_message(
        &self,
        message: &dyn Message,
        cancel: &CancellationToken,
    ) -> ConnectorResult<SendReceipt> {
        if let Err(e) = self.capability_gate(Capability::Send) {
            return ConnectorResult::failed(e);
        }
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }
        let issues = self.schema.validate_message(message);
        if !issues.is_empty() {
            return ConnectorResult::validation_failure(
                error_codes::MESSAGE_VALIDATION_FAILED,
                issues,
            );
        }
        let ctx = self.context();
        self.run_hook(
            error_codes::SEND_MESSAGE_ERROR,
            cancel,
            self.handler.send(&ctx, message),
        )
        .await
    }

    /// Send a batch. Every message is validated up front; if any fails,
    /// nothing is sent and the aggregated issues carry per-message field
    /// prefixes.
    pub async fn send_batch(
        &self,
        batch: &dyn MessageBatch,
        cancel: &CancellationToken,
    ) -> ConnectorResult<BatchSendReceipt> {
        if let Err(e) = self.capability_gate(Capability::BulkSend) {
            return ConnectorResult::failed(e);
        }
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }

        let mut issues = Vec::new();
        for (i, message) in batch.messages().iter().enumerate() {
            for issue in self.schema.validate_message(message.as_ref()) {
                issues.push(issue.prefixed(&format!("messages[{i}]")));
            }
        }
        if !issues.is_empty() {
            return ConnectorResult::validation_failure(
                error_codes::BATCH_VALIDATION_FAILED,
                issues,
            );
        }

        let ctx = self.context();
        self.run_hook(
            error_codes::SEND_BATCH_ERROR,
            cancel,
            self.handler.send_batch(&ctx, batch),
        )
        .await
    }

    /// Look up the delivery-state history of a previously sent message.
    pub async fn get_message_status(
        &self,
        message_id: &str,
        cancel: &CancellationToken,
    ) -> ConnectorResult<StatusUpdatesResult> {
        if let Err(e) = self.capability_gate(Capability::MessageStatus) {
            return ConnectorResult::failed(e);
        }
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }
        let ctx = self.context();
        self.run_hook(
            error_codes::GET_MESSAGE_STATUS_ERROR,
            cancel,
            self.handler.message_status(&ctx, message_id),
        )
        .await
    }

    /// Pull inbound messages pending for `source`.
    pub async fn receive_messages(
        &self,
        source: &Endpoint,
        cancel: &CancellationToken,
    ) -> ConnectorResult<ReceiveResult> {
        if let Err(e) = self.capability_gate(Capability::Receive) {
            return ConnectorResult::failed(e);
        }
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }
        let ctx = self.context();
        self.run_hook(
            error_codes::RECEIVE_MESSAGES_ERROR,
            cancel,
            self.handler.receive(&ctx, source),
        )
        .await
    }

    /// Pull delivery-status updates pending for `source`.
    pub async fn receive_message_status(
        &self,
        source: &Endpoint,
        cancel: &CancellationToken,
    ) -> ConnectorResult<StatusUpdatesResult> {
        if let Err(e) = self.capability_gate(Capability::ReceiveStatus) {
            return ConnectorResult::failed(e);
        }
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }
        let ctx = self.context();
        self.run_hook(
            error_codes::RECEIVE_STATUS_ERROR,
            cancel,
            self.handler.receive_status(&ctx, source),
        )
        .await
    }

    /// Probe provider health.
    pub async fn get_health(&self, cancel: &CancellationToken) -> ConnectorResult<ConnectorHealth> {
        if let Err(e) = self.capability_gate(Capability::HealthCheck) {
            return ConnectorResult::failed(e);
        }
        if let Err(e) = self.operational_gate() {
            return ConnectorResult::failed(e);
        }
        let ctx = self.context();
        self.run_hook(
            error_codes::GET_HEALTH_ERROR,
            cancel,
            self.handler.health(&ctx),
        )
        .await
    }

    /// The authentication configuration to use: the first in declaration
    /// order (excluding `None`) satisfied by the settings, falling back
    /// to the first configured so the provider can report what is
    /// missing.
    fn select_authentication(&self) -> Option<&AuthenticationConfiguration> {
        let configured: Vec<&AuthenticationConfiguration> = self
            .schema
            .authentication
            .iter()
            .filter(|c| c.auth_type != AuthenticationType::None)
            .collect();
        configured
            .iter()
            .find(|c| c.is_satisfied_by(&self.settings))
            .copied()
            .or_else(|| configured.first().copied())
    }

    /// Obtain (or fetch from cache) a credential for the selected
    /// authentication configuration and remember it for the hooks.
    pub async fn authenticate(
        &self,
        cancel: &CancellationToken,
    ) -> ConnectorResult<AuthenticationCredential> {
        let Some(config) = self.select_authentication() else {
            return ConnectorResult::failure(
                error_codes::AUTHENTICATION_FAILED,
                "no authentication method configured",
            );
        };
        match self.auth.authenticate(&self.settings, config, cancel).await {
            Ok(credential) => {
                *self.credential.lock() = Some(credential.clone());
                ConnectorResult::ok(credential)
            }
            Err(e) => {
                ConnectorResult::failure(error_codes::AUTHENTICATION_FAILED, e.to_string())
            }
        }
    }

    /// Force a credential refresh, bypassing the cache freshness check.
    pub async fn refresh_authentication(
        &self,
        cancel: &CancellationToken,
    ) -> ConnectorResult<AuthenticationCredential> {
        let Some(config) = self.select_authentication() else {
            return ConnectorResult::failure(
                error_codes::AUTHENTICATION_FAILED,
                "no authentication method configured",
            );
        };
        match self.auth.refresh(&self.settings, config, cancel).await {
            Ok(credential) => {
                *self.credential.lock() = Some(credential.clone());
                ConnectorResult::ok(credential)
            }
            Err(e) => {
                ConnectorResult::failure(error_codes::AUTHENTICATION_FAILED, e.to_string())
            }
        }
    }

    /// The credential from the most recent successful `authenticate`.
    pub fn last_credential(&self) -> Option<AuthenticationCredential> {
        self.credential.lock().clone()
    }

    /// `("Authorization", "Bearer <token>")` from the last credential,
    /// honoring a recorded token type.
    pub fn bearer_header(&self) -> Option<(String, String)> {
        let credential = self.credential.lock().clone()?;
        let token_type = credential.token_type().unwrap_or("Bearer").to_string();
        Some((
            "Authorization".to_string(),
            format!("{token_type} {}", credential.credential_value),
        ))
    }

    /// `("Authorization", "Basic <encoded>")` from the last credential,
    /// when it is a Basic credential.
    pub fn basic_header(&self) -> Option<(String, String)> {
        let credential = self.credential.lock().clone()?;
        if credential.auth_type != AuthenticationType::Basic {
            return None;
        }
        Some((
            "Authorization".to_string(),
            format!("Basic {}", credential.credential_value),
        ))
    }
}
