//! Connector lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a connector.
///
/// The only transitions the base connector performs are:
/// `Uninitialized -> Initializing -> Ready | Error`, any state except
/// `ShuttingDown`/`Shutdown` into `ShuttingDown -> Shutdown`, and
/// handler-driven moves between `Ready`, `Error`, and `Disconnected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorState {
    /// Constructed but `initialize` has not run.
    #[default]
    Uninitialized,

    /// `initialize` is in flight.
    Initializing,

    /// Initialized and able to serve operations.
    Ready,

    /// A recoverable failure was recorded; operations are still allowed
    /// so the handler can retry or report.
    Error,

    /// The provider connection was lost; operations are still allowed.
    Disconnected,

    /// `shutdown` is in flight.
    ShuttingDown,

    /// Terminal. No operation runs after this.
    Shutdown,
}

impl ConnectorState {
    /// Whether gated operations may run in this state: everything except
    /// the pre-initialization and shutdown states. `Error` and
    /// `Disconnected` count as operational.
    pub fn is_operational(&self) -> bool {
        !matches!(
            self,
            Self::Uninitialized | Self::Initializing | Self::ShuttingDown | Self::Shutdown
        )
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}

impl fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Disconnected => "disconnected",
            Self::ShuttingDown => "shutting_down",
            Self::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_states() {
        assert!(ConnectorState::Ready.is_operational());
        assert!(ConnectorState::Error.is_operational());
        assert!(ConnectorState::Disconnected.is_operational());
        assert!(!ConnectorState::Uninitialized.is_operational());
        assert!(!ConnectorState::Initializing.is_operational());
        assert!(!ConnectorState::ShuttingDown.is_operational());
        assert!(!ConnectorState::Shutdown.is_operational());
    }

    #[test]
    fn test_only_shutdown_is_terminal() {
        assert!(ConnectorState::Shutdown.is_terminal());
        assert!(!ConnectorState::ShuttingDown.is_terminal());
        assert!(!ConnectorState::Error.is_terminal());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ConnectorState::ShuttingDown).unwrap();
        assert_eq!(json, "\"shutting_down\"");
    }
}
