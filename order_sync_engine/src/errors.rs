use marketplace_tools::MarketplaceApiError;
use thiserror::Error;

/// Why an order fetch failed. The board only ever shows a generic failure line, but the kind is kept for logging and
/// for callers that want to react differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Could not reach the order backend. {0}")]
    Transport(String),
    #[error("The order backend returned error {status}. {message}")]
    Status { status: u16, message: String },
    #[error("The order list could not be decoded. {0}")]
    Decode(String),
}

impl From<MarketplaceApiError> for FetchError {
    fn from(e: MarketplaceApiError) -> Self {
        match e {
            MarketplaceApiError::Initialization(s) | MarketplaceApiError::Transport(s) => Self::Transport(s),
            MarketplaceApiError::JsonError(s) => Self::Decode(s),
            MarketplaceApiError::QueryError { status, message } => Self::Status { status, message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("The order board has shut down")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("An inventory check is already in progress")]
    CheckInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    #[error("Cannot withdraw {requested} items from {branch}. Between 1 and {available} items can be withdrawn.")]
    InvalidQuantity { branch: String, requested: i64, available: i64 },
    #[error("Branch {0} does not stock this item")]
    UnknownBranch(String),
    #[error("No LINE recipient has been configured for withdrawal requests")]
    NoRecipient,
    #[error("Failed to send the withdrawal request. {0}")]
    SendFailed(String),
}
