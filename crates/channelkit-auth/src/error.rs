//! Authentication error types.

use channelkit_schema::AuthenticationType;
use thiserror::Error;

/// Outcome of a credential acquisition or refresh.
pub type AuthenticationResult =
    std::result::Result<crate::credential::AuthenticationCredential, AuthError>;

/// Errors produced by authentication providers and the manager.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The settings lack the fields the provider needs.
    #[error("Missing credential fields for {auth_type}: {detail}")]
    MissingFields {
        /// The authentication method attempted.
        auth_type: AuthenticationType,
        /// Which fields could not be resolved.
        detail: String,
    },

    /// No registered provider can handle the configuration.
    #[error("No provider registered for authentication type {0}")]
    Unsupported(AuthenticationType),

    /// The token endpoint rejected the request.
    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Transport failure talking to the token endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint returned an unusable payload.
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// The operation was cancelled.
    #[error("Authentication cancelled")]
    Cancelled,
}
