use thiserror::Error;

use crate::token_data_client::Provider;
use crate::transport::TransportError;

/// Failure of a single token data call. Validation variants are raised before
/// any network I/O happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenDataError {
    #[error("Invalid Solana address: {0}")]
    InvalidAddress(String),

    #[error("No token addresses provided")]
    NoAddressesProvided,

    #[error("{provider} request to {endpoint} failed: {reason}")]
    ProviderRequestFailed {
        provider: Provider,
        endpoint: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Invalid token {address}: {reason}")]
    InvalidToken { address: String, reason: String },
}

impl TokenDataError {
    /// Only provider/transport faults are worth retrying; the client itself never does.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TokenDataError::ProviderRequestFailed { .. })
    }

    pub(crate) fn provider_status(provider: Provider, endpoint: &str, status: u16) -> Self {
        TokenDataError::ProviderRequestFailed {
            provider,
            endpoint: endpoint.to_string(),
            status: Some(status),
            reason: format!("HTTP {}", status),
        }
    }

    pub(crate) fn provider_fault(
        provider: Provider,
        endpoint: &str,
        reason: impl Into<String>,
    ) -> Self {
        TokenDataError::ProviderRequestFailed {
            provider,
            endpoint: endpoint.to_string(),
            status: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn from_transport(provider: Provider, endpoint: &str, err: TransportError) -> Self {
        Self::provider_fault(provider, endpoint, err.to_string())
    }

    pub(crate) fn invalid_token(address: &str, reason: impl Into<String>) -> Self {
        TokenDataError::InvalidToken {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TokenDataError>;
