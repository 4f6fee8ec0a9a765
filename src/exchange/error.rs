//! Exchange error taxonomy

use thiserror::Error;

/// Failure modes reported by the connectivity collaborator.
///
/// These mirror the categories a ccxt-style client distinguishes; the
/// exchange layer translates them into [`ExchangeError`] before they reach
/// callers.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Account balance is too low for the requested order
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    /// Order parameters were rejected (e.g. would trigger immediately)
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    /// Rate limiting / DDoS protection kicked in
    #[error("DDoS protection triggered: {0}")]
    DdosProtection(String),
    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),
    /// Exchange-side failure that is expected to clear
    #[error("exchange error: {0}")]
    Exchange(String),
    /// Anything the collaborator could not classify
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Translate into the local taxonomy, attaching context to transient
    /// failures so the caller knows which path failed.
    pub(crate) fn into_exchange_err(self, context: &str) -> ExchangeError {
        match self {
            ApiError::DdosProtection(msg) => ExchangeError::DdosProtection(msg),
            e @ (ApiError::Network(_) | ApiError::Exchange(_)) => {
                ExchangeError::Temporary(format!("{context}: {e}"))
            }
            ApiError::InsufficientFunds(msg) => ExchangeError::InsufficientFunds(msg),
            ApiError::InvalidOrder(msg) => ExchangeError::InvalidOrder(msg),
            ApiError::Other(msg) => ExchangeError::Operational(msg),
        }
    }
}

/// Errors surfaced by exchange operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Operational misuse: bad stop/limit ordering, unsupported trading
    /// mode, exhausted bracket scan
    #[error("{0}")]
    Usage(String),
    /// Not enough balance for the requested order
    #[error("{0}")]
    InsufficientFunds(String),
    /// Order parameters rejected, or no bracket data for a pair
    #[error("{0}")]
    InvalidOrder(String),
    /// Rate limited by the exchange
    #[error("DDoS protection: {0}")]
    DdosProtection(String),
    /// Transient failure, safe to retry where policy allows
    #[error("{0}")]
    Temporary(String),
    /// Unclassified collaborator failure
    #[error("{0}")]
    Operational(String),
}

impl ExchangeError {
    /// Whether a bounded retry is allowed for this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DdosProtection(_) | Self::Temporary(_))
    }
}
